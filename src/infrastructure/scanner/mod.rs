//! Virus scanner implementations

mod clamd;
mod noop;

pub use clamd::ClamdScanner;
pub use noop::NoopVirusScanner;
