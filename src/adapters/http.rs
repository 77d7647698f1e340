use crate::domain::model::PayloadItem;
use crate::domain::ports::Loader;
use crate::utils::error::{ExportError, Result};
use crate::utils::validation::validate_url;
use async_trait::async_trait;
use reqwest::Client;

/// Downloads image bytes. One client is shared by every request in a run.
pub struct ImageLoader {
    client: Client,
}

impl ImageLoader {
    pub fn new(strict_ssl: bool) -> Result<Self> {
        let client = Client::builder()
            .danger_accept_invalid_certs(!strict_ssl)
            .user_agent(concat!("wp2md/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }

    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        validate_url("image_url", url).map_err(|_| ExportError::InvalidImageUrl {
            url: url.to_string(),
        })?;

        tracing::debug!("Requesting image: {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExportError::HttpStatusError {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl Loader for ImageLoader {
    async fn load(&self, item: &PayloadItem) -> Result<Vec<u8>> {
        match item {
            PayloadItem::Image(url) => self.fetch(url).await,
            PayloadItem::Post(post) => Err(ExportError::InvalidImageUrl {
                url: format!("post:{}", post.id),
            }),
        }
    }
}
