//! Tokenizer implementations

mod tiktoken;

pub use tiktoken::TiktokenTokenizer;
