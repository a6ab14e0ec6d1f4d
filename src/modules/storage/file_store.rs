use async_trait::async_trait;

use crate::core::error::AppError;

/// Read access to stored files by their recorded URL
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AppError>;
}

#[cfg(test)]
pub mod memory {
    use std::collections::HashMap;

    use super::*;

    /// In-memory store keyed by URL
    #[derive(Default)]
    pub struct MemoryFileStore {
        files: HashMap<String, Vec<u8>>,
    }

    impl MemoryFileStore {
        pub fn with(mut self, url: &str, data: &[u8]) -> Self {
            self.files.insert(url.to_string(), data.to_vec());
            self
        }
    }

    #[async_trait]
    impl FileStore for MemoryFileStore {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>, AppError> {
            self.files
                .get(url)
                .cloned()
                .ok_or_else(|| AppError::NotFound(format!("'{}' is not a stored file", url)))
        }
    }

    #[test]
    fn test_memory_store_fetch() {
        let store = MemoryFileStore::default().with("mem://a", b"hello");
        assert_eq!(tokio_test::block_on(store.fetch("mem://a")).unwrap(), b"hello");
        assert!(tokio_test::block_on(store.fetch("mem://b")).is_err());
    }
}
