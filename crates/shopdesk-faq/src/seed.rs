//! Sample FAQ set used to bootstrap an empty store (`shopdesk seed`,
//! `POST /api/v1/faq/seed`).

use shopdesk_core::types::{Answer, FaqEntry};

fn list(items: &[&str]) -> Answer {
    Answer::List(items.iter().map(|s| s.to_string()).collect())
}

/// Spanish-language sample entries for a multi-campus school storefront.
pub fn sample_faq() -> Vec<FaqEntry> {
    vec![
        FaqEntry::new(
            "¿Cuándo comienza el semestre?",
            list(&[
                "22 de octubre de 2024: estudiantes nuevos",
                "10 de febrero de 2025: inducción de estudiantes nuevos",
                "10 de diciembre de 2024: límite de matrícula para estudiantes antiguos",
                "21 de diciembre de 2024: límite de pago sin recargo para estudiantes antiguos",
            ]),
        ),
        FaqEntry::new(
            "¿Qué servicios manejan?",
            list(&[
                "Aliados",
                "Bienestar estudiantil",
                "Centro cultural",
                "Colegios",
                "Educación digital",
                "Emprendimientos",
                "Proyectos",
            ]),
        ),
        FaqEntry::new(
            "¿Cómo inicio sesión?",
            "Ingresa al portal de estudiantes con tu documento y contraseña.",
        ),
        FaqEntry::new(
            "¿Qué descuentos manejan?",
            list(&[
                "Afiliados a caja de compensación:",
                "Tarifa A: 35%",
                "Tarifa B: 30%",
            ]),
        ),
        FaqEntry::new(
            "¿Cuáles son los medios de pago?",
            list(&[
                "Presencial",
                "Pago en línea con tarjeta de crédito o débito",
                "Pago con cesantías",
                "Consignación bancaria con liquidación impresa",
                "Financiación",
            ]),
        ),
        FaqEntry::new(
            "¿Cuántas sedes tienen?",
            "Contamos con 6 sedes en la región.",
        ),
        FaqEntry::new(
            "¿Dónde están ubicados?",
            list(&["Medellín", "Bello", "Rionegro", "La Pintada", "Apartadó", "Bogotá"]),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_entries_are_valid() {
        let entries = sample_faq();
        assert_eq!(entries.len(), 7);
        for e in &entries {
            assert!(e.validate().is_ok(), "invalid sample entry: {}", e.question);
        }
    }
}
