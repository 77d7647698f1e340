// Adapters layer: concrete implementations for external systems (filesystem, http, document formats).

pub mod frontmatter;
pub mod http;
pub mod ingest;
pub mod markdown;
pub mod storage;
