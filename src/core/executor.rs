use crate::domain::model::{ExecutionSummary, Payload};
use crate::domain::ports::{Loader, Storage};
use crate::utils::error::Result;
use futures::future::join_all;

pub struct PayloadExecutor<'a, S: Storage> {
    storage: &'a S,
}

impl<'a, S: Storage> PayloadExecutor<'a, S> {
    pub fn new(storage: &'a S) -> Self {
        Self { storage }
    }

    /// Runs every payload concurrently on the current task. A failing payload is
    /// logged and counted; it never stops its siblings and never fails the call.
    pub async fn execute<L: Loader + ?Sized>(
        &self,
        payloads: Vec<Payload>,
        loader: &L,
    ) -> ExecutionSummary {
        let units = payloads.iter().map(|payload| async move {
            let result = self.run_one(payload, loader).await;
            match &result {
                Ok(()) => {
                    tracing::info!("✓ [{}] {}", payload.kind, payload.display_name());
                }
                Err(e) => {
                    tracing::error!("✗ [{}] {}: {}", payload.kind, payload.display_name(), e);
                }
            }
            result.is_ok()
        });

        let outcomes = join_all(units).await;

        let success_count = outcomes.iter().filter(|ok| **ok).count();
        let summary = ExecutionSummary {
            success_count,
            failure_count: outcomes.len() - success_count,
        };

        if summary.failure_count > 0 {
            tracing::error!("{}", summary.message());
        } else {
            tracing::info!("{}", summary.message());
        }
        summary
    }

    async fn run_one<L: Loader + ?Sized>(&self, payload: &Payload, loader: &L) -> Result<()> {
        if !payload.delay.is_zero() {
            tokio::time::sleep(payload.delay).await;
        }

        let data = loader.load(&payload.item).await?;
        self.storage.write_file(&payload.destination, &data).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{PayloadItem, PayloadKind, Post};
    use crate::utils::error::ExportError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<PathBuf, Vec<u8>>>>,
        read_only: Option<PathBuf>,
    }

    impl MockStorage {
        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(Path::new(path)).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn exists(&self, path: &Path) -> bool {
            self.files.lock().await.contains_key(path)
        }

        async fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
            if self.read_only.as_deref() == Some(path) {
                return Err(ExportError::IoError(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    format!("read-only: {}", path.display()),
                )));
            }
            let mut files = self.files.lock().await;
            files.insert(path.to_path_buf(), data.to_vec());
            Ok(())
        }
    }

    struct FlakyImageLoader {
        broken_url: String,
    }

    #[async_trait]
    impl Loader for FlakyImageLoader {
        async fn load(&self, item: &PayloadItem) -> Result<Vec<u8>> {
            match item {
                PayloadItem::Image(url) if *url == self.broken_url => {
                    Err(ExportError::HttpStatusError {
                        url: url.clone(),
                        status: 500,
                    })
                }
                PayloadItem::Image(url) => Ok(url.as_bytes().to_vec()),
                PayloadItem::Post(post) => Ok(post.slug.as_bytes().to_vec()),
            }
        }
    }

    fn image_payload(index: usize) -> Payload {
        Payload {
            item: PayloadItem::Image(format!("https://example.com/{}.png", index)),
            kind: PayloadKind::Image,
            destination: PathBuf::from(format!("out/images/{}.png", index)),
            delay: Duration::from_millis(index as u64),
        }
    }

    #[tokio::test]
    async fn test_one_failing_loader_is_isolated() {
        let storage = MockStorage::default();
        let loader = FlakyImageLoader {
            broken_url: "https://example.com/2.png".to_string(),
        };
        let payloads: Vec<Payload> = (0..5).map(image_payload).collect();

        let summary = PayloadExecutor::new(&storage).execute(payloads, &loader).await;

        assert_eq!(summary.success_count, 4);
        assert_eq!(summary.failure_count, 1);
        assert_eq!(summary.message(), "Done, but with 1 failed.");
        assert!(storage.get_file("out/images/2.png").await.is_none());
        assert_eq!(
            storage.get_file("out/images/4.png").await.unwrap(),
            b"https://example.com/4.png"
        );
    }

    #[tokio::test]
    async fn test_write_failure_is_isolated() {
        let storage = MockStorage {
            read_only: Some(PathBuf::from("out/b.md")),
            ..Default::default()
        };
        let loader = FlakyImageLoader {
            broken_url: String::new(),
        };
        let payloads = ["a", "b", "c"]
            .iter()
            .map(|slug| Payload {
                item: PayloadItem::Post(Arc::new(Post::new(*slug, *slug))),
                kind: PayloadKind::Post,
                destination: PathBuf::from(format!("out/{}.md", slug)),
                delay: Duration::ZERO,
            })
            .collect::<Vec<_>>();

        let summary = PayloadExecutor::new(&storage).execute(payloads, &loader).await;

        assert_eq!(summary.total(), 3);
        assert_eq!(summary.failure_count, 1);
        assert_eq!(storage.get_file("out/a.md").await.unwrap(), b"a");
    }

    #[tokio::test]
    async fn test_empty_payload_list() {
        let storage = MockStorage::default();
        let loader = FlakyImageLoader {
            broken_url: String::new(),
        };

        let summary = PayloadExecutor::new(&storage).execute(Vec::new(), &loader).await;

        assert_eq!(summary, ExecutionSummary::default());
        assert_eq!(summary.message(), "Done, got them all!");
    }
}
