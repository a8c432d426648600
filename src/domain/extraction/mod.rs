//! Text extraction domain types and traits

mod extractor;
mod format;

pub use extractor::TextExtractor;
pub use format::{extension_of, DocumentFormat};
