//! Blob storage backends for original uploads

mod local;
mod s3;

pub use local::LocalBlobStorage;
pub use s3::S3BlobStorage;
