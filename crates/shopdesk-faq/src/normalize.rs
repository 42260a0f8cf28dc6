//! Text canonicalization applied to queries and stored questions alike.

/// Lowercase, drop everything except word characters and whitespace,
/// collapse whitespace runs and trim.
///
/// Word characters are Unicode alphanumerics plus `_`, so accented letters
/// survive while `¿?¡!.,;:` and symbols are removed.
pub fn normalize(text: &str) -> String {
    let stripped: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}
