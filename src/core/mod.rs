pub mod executor;
pub mod exporter;
pub mod grouper;
pub mod planner;
pub mod resolver;

pub use crate::domain::model::{Payload, PayloadKind, Post, TranslationGroups};
pub use crate::domain::ports::{Loader, Storage};
pub use crate::utils::error::Result;
