use crate::config::LayoutConfig;
use crate::domain::model::{Post, TranslationGroup};
use std::path::PathBuf;
use url::Url;

const UNDETERMINED_LANGUAGE: &str = "und";
const IMAGES_DIR: &str = "images";

/// Maps posts and images to their destination paths under the output root.
#[derive(Debug, Clone)]
pub struct PathResolver {
    layout: LayoutConfig,
}

impl PathResolver {
    pub fn new(layout: LayoutConfig) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn post_path(&self, post: &Post, group: &TranslationGroup) -> PathBuf {
        let root = &self.layout.output_root;

        if group.is_multi_member() {
            let base = self.folder_slug(post, group);
            let language = post.language.as_deref().unwrap_or(UNDETERMINED_LANGUAGE);
            if self.layout.per_post_folders {
                root.join(base).join(format!("index.{}.md", language))
            } else {
                root.join(format!("{}.{}.md", base, language))
            }
        } else if self.layout.per_post_folders {
            root.join(&post.slug).join("index.md")
        } else {
            root.join(format!("{}.md", post.slug))
        }
    }

    /// Translated siblings share one images folder; flat layouts share one at the root.
    pub fn images_dir(&self, post: &Post, group: &TranslationGroup) -> PathBuf {
        let root = &self.layout.output_root;
        if self.layout.per_post_folders {
            root.join(self.folder_slug(post, group)).join(IMAGES_DIR)
        } else {
            root.join(IMAGES_DIR)
        }
    }

    pub fn image_path(&self, post: &Post, group: &TranslationGroup, url: &str) -> Option<PathBuf> {
        image_filename(url).map(|filename| self.images_dir(post, group).join(filename))
    }

    fn folder_slug<'a>(&self, post: &'a Post, group: &'a TranslationGroup) -> &'a str {
        if group.is_multi_member() {
            group
                .base_slug(&self.layout.default_language)
                .unwrap_or(&post.slug)
        } else {
            &post.slug
        }
    }
}

/// Final path segment of the URL, percent-decoded; query and fragment are ignored.
pub fn image_filename(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.next_back()?;
    if segment.is_empty() {
        return None;
    }

    let decoded = urlencoding::decode(segment).ok()?.into_owned();
    if decoded.is_empty() || decoded == "." || decoded == ".." || decoded.contains('/') {
        return None;
    }
    Some(decoded)
}
