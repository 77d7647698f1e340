use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// A single frontmatter value. Each variant has exactly one serialization rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FrontmatterValue {
    String(String),
    Integer(i64),
    Boolean(bool),
    Date(DateTime<FixedOffset>),
    List(Vec<String>),
    Mapping(BTreeMap<String, String>),
    Multiline(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    #[serde(rename = "type", default = "default_post_type")]
    pub post_type: String,
    pub slug: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub translation_group_slug: Option<String>,
    /// Language code to post ID.
    #[serde(default)]
    pub translations: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub frontmatter: BTreeMap<String, FrontmatterValue>,
    #[serde(default)]
    pub meta_content: BTreeMap<String, String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub cover_image_id: Option<String>,
}

fn default_post_type() -> String {
    "post".to_string()
}

impl Post {
    pub fn new(id: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            post_type: default_post_type(),
            slug: slug.into(),
            language: None,
            translation_group_slug: None,
            translations: None,
            frontmatter: BTreeMap::new(),
            meta_content: BTreeMap::new(),
            content: String::new(),
            image_urls: Vec::new(),
            cover_image_id: None,
        }
    }

    pub fn has_translations(&self) -> bool {
        self.translations.as_ref().is_some_and(|map| !map.is_empty())
    }
}

/// What an export document looks like once the WXR file has been parsed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    #[serde(default)]
    pub posts: Vec<Post>,
    /// Translation group slug to its serialized language map.
    #[serde(default)]
    pub translation_groups: HashMap<String, String>,
    /// Attachment ID to its URL, used to resolve cover images.
    #[serde(default)]
    pub attachments: HashMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct TranslationGroup {
    pub key: String,
    pub posts: Vec<Arc<Post>>,
}

impl TranslationGroup {
    pub fn is_multi_member(&self) -> bool {
        self.posts.len() > 1
    }
}

/// Groups in the order their keys first appear in the post collection.
#[derive(Debug, Clone, Default)]
pub struct TranslationGroups {
    groups: Vec<TranslationGroup>,
    index: HashMap<String, usize>,
}

impl TranslationGroups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: String, post: Arc<Post>) {
        match self.index.get(&key) {
            Some(&position) => self.groups[position].posts.push(post),
            None => {
                self.index.insert(key.clone(), self.groups.len());
                self.groups.push(TranslationGroup {
                    key,
                    posts: vec![post],
                });
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&TranslationGroup> {
        self.index.get(key).map(|&position| &self.groups[position])
    }

    pub fn iter(&self) -> impl Iterator<Item = &TranslationGroup> {
        self.groups.iter()
    }

    pub fn keys(&self) -> Vec<&str> {
        self.groups.iter().map(|group| group.key.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn post_count(&self) -> usize {
        self.groups.iter().map(|group| group.posts.len()).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Post,
    Image,
}

impl PayloadKind {
    /// Plural noun used in progress messages.
    pub fn things(&self) -> &'static str {
        match self {
            PayloadKind::Post => "posts",
            PayloadKind::Image => "images",
        }
    }
}

impl std::fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PayloadKind::Post => write!(f, "post"),
            PayloadKind::Image => write!(f, "image"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum PayloadItem {
    Post(Arc<Post>),
    Image(String),
}

#[derive(Debug, Clone)]
pub struct Payload {
    pub item: PayloadItem,
    pub kind: PayloadKind,
    pub destination: PathBuf,
    pub delay: Duration,
}

impl Payload {
    pub fn display_name(&self) -> String {
        match &self.item {
            PayloadItem::Post(post) => match &post.language {
                Some(language) if post.has_translations() => format!("{} ({})", post.slug, language),
                _ => post.slug.clone(),
            },
            PayloadItem::Image(url) => url.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionSummary {
    pub success_count: usize,
    pub failure_count: usize,
}

impl ExecutionSummary {
    pub fn total(&self) -> usize {
        self.success_count + self.failure_count
    }

    pub fn message(&self) -> String {
        if self.failure_count > 0 {
            format!("Done, but with {} failed.", self.failure_count)
        } else {
            "Done, got them all!".to_string()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExportReport {
    pub posts: ExecutionSummary,
    pub posts_already_saved: usize,
    pub images: Option<ExecutionSummary>,
    pub images_already_saved: usize,
}
