//! Vector store backends, the retrying gateway and admin notifiers

mod gateway;
mod in_memory;
mod milvus;
mod notifier;

pub use gateway::{VectorStoreGateway, VectorStoreSettings};
pub use in_memory::InMemoryVectorStore;
pub use milvus::MilvusVectorStore;
pub use notifier::{LogAdminNotifier, WebhookAdminNotifier};
