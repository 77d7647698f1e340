use crate::domain::model::{Post, TranslationGroup, TranslationGroups};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Partitions posts into translation groups.
///
/// With translations enabled, a post carrying a language map is keyed by the sorted
/// set of every post ID in that map, so all siblings land on the same key whichever
/// one is inspected. Mapped IDs that are not in the collection are kept as-is.
/// Everything else is its own group keyed by its ID.
pub fn group_posts(posts: Vec<Post>, translations_enabled: bool) -> TranslationGroups {
    let mut groups = TranslationGroups::new();

    for post in posts {
        let key = if translations_enabled {
            group_key(&post)
        } else {
            post.id.clone()
        };
        groups.insert(key, Arc::new(post));
    }

    tracing::debug!(
        "Grouped {} posts into {} groups",
        groups.post_count(),
        groups.len()
    );
    groups
}

pub fn group_key(post: &Post) -> String {
    match &post.translations {
        Some(map) if !map.is_empty() => {
            let ids: BTreeSet<&str> = map.values().map(String::as_str).collect();
            ids.into_iter().collect::<Vec<_>>().join(",")
        }
        _ => post.id.clone(),
    }
}

/// The slug of the default-language member, or the first member's slug.
pub fn choose_base_slug<'a>(posts: &'a [Arc<Post>], default_language: &str) -> Option<&'a str> {
    posts
        .iter()
        .find(|post| post.language.as_deref() == Some(default_language))
        .or_else(|| posts.first())
        .map(|post| post.slug.as_str())
}

impl TranslationGroup {
    pub fn base_slug(&self, default_language: &str) -> Option<&str> {
        choose_base_slug(&self.posts, default_language)
    }
}
