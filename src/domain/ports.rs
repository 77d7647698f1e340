use crate::domain::model::PayloadItem;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

pub trait Storage: Send + Sync {
    fn exists(&self, path: &Path) -> impl std::future::Future<Output = bool> + Send;
    /// Creates missing parent directories, then writes the file.
    fn write_file(
        &self,
        path: &Path,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Produces the bytes written for one payload.
#[async_trait]
pub trait Loader: Send + Sync {
    async fn load(&self, item: &PayloadItem) -> Result<Vec<u8>>;
}
