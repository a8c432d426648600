//! Vector store domain models and traits

mod notifier;
mod record;
mod store;

pub use notifier::{AdminAlert, AdminNotifier};
pub use record::{SearchHit, VectorRecord, RESERVED_FIELDS};
pub use store::{CollectionSchema, VectorStore};

#[cfg(test)]
pub use notifier::mock::RecordingNotifier;
#[cfg(test)]
pub use store::mock::MockVectorStore;
