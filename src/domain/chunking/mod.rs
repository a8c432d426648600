//! Token-window chunking domain types

mod chunk;
mod chunker;
mod tokenizer;

pub use chunk::Chunk;
pub use chunker::TokenChunker;
pub use tokenizer::{decode_lossy, Tokenizer, REPLACEMENT};

#[cfg(test)]
pub use tokenizer::mock::ByteTokenizer;
