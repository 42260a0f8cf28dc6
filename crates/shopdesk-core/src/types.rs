//! Catalog and FAQ domain types.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, ShopDeskError};

/// Collection holding FAQ documents.
pub const FAQ_COLLECTION: &str = "faq";
/// Collection holding product documents.
pub const PRODUCT_COLLECTION: &str = "products";

/// An FAQ answer: a single text or a list of lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Text(String),
    List(Vec<String>),
}

impl Answer {
    pub fn is_empty(&self) -> bool {
        match self {
            Answer::Text(s) => s.trim().is_empty(),
            Answer::List(items) => items.iter().all(|s| s.trim().is_empty()),
        }
    }
}

impl From<&str> for Answer {
    fn from(s: &str) -> Self {
        Answer::Text(s.to_string())
    }
}

impl From<String> for Answer {
    fn from(s: String) -> Self {
        Answer::Text(s)
    }
}

impl From<Vec<String>> for Answer {
    fn from(items: Vec<String>) -> Self {
        Answer::List(items)
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Text(s) => f.write_str(s),
            Answer::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str("\n")?;
                    }
                    write!(f, "- {item}")?;
                }
                Ok(())
            }
        }
    }
}

/// Raw FAQ document as read from the store. Either field may be missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FaqRecord {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub answer: Option<Answer>,
}

impl FaqRecord {
    /// Parse a stored document. Documents of the wrong shape yield `None`.
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    /// Turn into a usable entry; records without a question or answer are dropped.
    pub fn into_entry(self) -> Option<FaqEntry> {
        let question = self.question.filter(|q| !q.trim().is_empty())?;
        let answer = self.answer?;
        Some(FaqEntry { question, answer })
    }
}

/// A question/answer pair used as a matching candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: Answer,
}

impl FaqEntry {
    pub fn new(question: impl Into<String>, answer: impl Into<Answer>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// Reject entries that could never be matched.
    pub fn validate(&self) -> Result<()> {
        if self.question.trim().is_empty() {
            return Err(ShopDeskError::InvalidInput("question must not be empty".into()));
        }
        if self.answer.is_empty() {
            return Err(ShopDeskError::InvalidInput("answer must not be empty".into()));
        }
        Ok(())
    }
}

/// Catalog product. Unknown fields are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    #[serde(alias = "precio")]
    pub price: f64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Product {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
            extra: serde_json::Map::new(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ShopDeskError::InvalidInput("name must not be empty".into()));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(ShopDeskError::InvalidInput(format!(
                "price must be a non-negative number, got {}",
                self.price
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_answer_untagged_forms() {
        let text: Answer = serde_json::from_value(json!("six campuses")).unwrap();
        assert_eq!(text, Answer::Text("six campuses".into()));

        let list: Answer = serde_json::from_value(json!(["cash", "card"])).unwrap();
        assert_eq!(list, Answer::List(vec!["cash".into(), "card".into()]));
        assert_eq!(serde_json::to_value(&list).unwrap(), json!(["cash", "card"]));
    }

    #[test]
    fn test_answer_display() {
        assert_eq!(Answer::from("hi").to_string(), "hi");
        let list = Answer::List(vec!["a".into(), "b".into()]);
        assert_eq!(list.to_string(), "- a\n- b");
    }

    #[test]
    fn test_record_without_question_is_skipped() {
        let rec = FaqRecord::from_value(&json!({"answer": "orphan"})).unwrap();
        assert!(rec.into_entry().is_none());

        let blank = FaqRecord::from_value(&json!({"question": "  ", "answer": "x"})).unwrap();
        assert!(blank.into_entry().is_none());
    }

    #[test]
    fn test_record_with_wrong_shape() {
        assert!(FaqRecord::from_value(&json!({"question": 12, "answer": "x"})).is_none());
    }

    #[test]
    fn test_record_into_entry() {
        let rec = FaqRecord::from_value(&json!({
            "question": "How do I log in?",
            "answer": "Use the portal",
            "timestamp": "2024-10-22T00:00:00Z"
        }))
        .unwrap();
        let entry = rec.into_entry().unwrap();
        assert_eq!(entry.question, "How do I log in?");
        assert_eq!(entry.answer, Answer::from("Use the portal"));
    }

    #[test]
    fn test_entry_validation() {
        assert!(FaqEntry::new("q", "a").validate().is_ok());
        assert!(FaqEntry::new("", "a").validate().is_err());
        assert!(FaqEntry::new("q", Answer::List(vec![])).validate().is_err());
    }

    #[test]
    fn test_product_accepts_legacy_price_field() {
        let p: Product = serde_json::from_value(json!({
            "name": "Notebook",
            "precio": 12.5,
            "stock": 3
        }))
        .unwrap();
        assert_eq!(p.price, 12.5);
        assert_eq!(p.extra["stock"], 3);

        let out = serde_json::to_value(&p).unwrap();
        assert_eq!(out["price"], 12.5);
        assert_eq!(out["stock"], 3);
    }

    #[test]
    fn test_product_validation() {
        assert!(Product::new("Pen", 1.0).validate().is_ok());
        assert!(Product::new(" ", 1.0).validate().is_err());
        assert!(Product::new("Pen", -1.0).validate().is_err());
        assert!(Product::new("Pen", f64::NAN).validate().is_err());
    }
}
