pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::{http::ImageLoader, markdown::MarkdownLoader, storage::LocalStorage};
pub use config::{ExportConfig, ExportSettings, LayoutConfig};
pub use core::exporter::Exporter;
pub use domain::model::{ExecutionSummary, ExportReport, Post};
pub use utils::error::{ExportError, Result};
