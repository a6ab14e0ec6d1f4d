//! Object storage for submission files and transparency documents.

mod file_store;
mod minio_client;

#[cfg(test)]
pub use file_store::memory::MemoryFileStore;
pub use file_store::FileStore;
pub use minio_client::{FileVisibility, MinIOClient};
