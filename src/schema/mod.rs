//! The response contract between the prompt and the parser.
//!
//! - [`fields`] — the declared field set and the format instructions derived from it.
//! - [`parser`] — turns raw model text into a [`ClassificationResult`](crate::models::ClassificationResult).
//!
//! Both halves read the same [`ResponseSchema`] so the instructions sent to
//! the model and the keys the parser requires cannot drift apart.

pub mod fields;
pub mod parser;

pub use fields::ResponseSchema;
