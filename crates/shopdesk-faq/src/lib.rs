//! # ShopDesk FAQ Matcher
//!
//! Answers free-text questions from a set of stored question/answer pairs.
//!
//! ## How it works
//! ```text
//! "¿Cuáles son los MEDIOS de pago?"
//!   ↓ normalize
//! "cuáles son los medios de pago"
//!   ↓ token_set_ratio against every normalized question
//! best score, first occurrence wins ties
//!   ↓ score >= threshold ?
//! stored answer  |  fallback message
//! ```
//!
//! Nothing is cached between calls; callers that answer many queries over the
//! same entries can build a [`FaqIndex`] once and reuse it.

pub mod normalize;
pub mod responder;
pub mod seed;
pub mod selector;
pub mod similarity;

pub use normalize::normalize;
pub use responder::{FaqIndex, MatchPolicy, MatchResult, match_faq, respond};
pub use selector::{BestMatch, best_match};
pub use similarity::{Scorer, partial_ratio, ratio, token_set_ratio, token_sort_ratio, wratio};
