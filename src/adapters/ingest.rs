use crate::core::resolver::image_filename;
use crate::domain::model::{ExportDocument, FrontmatterValue, Post};
use crate::utils::error::{ExportError, Result};
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Reads an export document that has already been parsed out of the WXR file.
pub async fn load_export<P: AsRef<Path>>(path: P) -> Result<ExportDocument> {
    let content = tokio::fs::read_to_string(&path).await?;
    let document: ExportDocument = serde_json::from_str(&content)?;

    tracing::debug!(
        "Loaded {} posts and {} translation groups from {}",
        document.posts.len(),
        document.translation_groups.len(),
        path.as_ref().display()
    );
    Ok(document)
}

/// Parses a serialized language map such as `a:2:{s:2:"en";i:1;s:2:"fr";i:2;}`.
/// Post IDs may be stored as integers or strings.
pub fn parse_translation_map(raw: &str) -> Result<BTreeMap<String, String>> {
    let malformed = |reason: &str| ExportError::TranslationError {
        message: format!("{}: {}", reason, raw),
    };

    let outer = Regex::new(r"(?s)^a:(\d+):\{(.*)\}$").map_err(|e| malformed(&e.to_string()))?;
    let entry = Regex::new(r#"s:\d+:"([^"]*)";(?:i:(\d+)|s:\d+:"([^"]*)");"#)
        .map_err(|e| malformed(&e.to_string()))?;

    let caps = outer
        .captures(raw.trim())
        .ok_or_else(|| malformed("Not a serialized array"))?;
    let expected: usize = caps[1]
        .parse()
        .map_err(|_| malformed("Invalid entry count"))?;
    let body = caps.get(2).map(|m| m.as_str()).unwrap_or_default();

    let mut map = BTreeMap::new();
    let mut position = 0;
    for found in entry.captures_iter(body) {
        let whole = found.get(0).ok_or_else(|| malformed("Empty entry"))?;
        if whole.start() != position {
            return Err(malformed("Unexpected data between entries"));
        }
        position = whole.end();

        let language = found[1].to_string();
        let post_id = found
            .get(2)
            .or_else(|| found.get(3))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| malformed("Missing post ID"))?;
        map.insert(language, post_id);
    }

    if position != body.len() {
        return Err(malformed("Trailing data after entries"));
    }
    if map.len() != expected {
        return Err(malformed(&format!(
            "Expected {} entries, found {}",
            expected,
            map.len()
        )));
    }

    Ok(map)
}

/// Attaches each post's translation map from its translation group. A missing or
/// unreadable group leaves the post untranslated.
pub fn enrich(posts: &mut [Post], translation_groups: &HashMap<String, String>) {
    for post in posts.iter_mut() {
        if post.has_translations() {
            continue;
        }
        let Some(group_slug) = &post.translation_group_slug else {
            continue;
        };

        match translation_groups.get(group_slug) {
            Some(raw) => match parse_translation_map(raw) {
                Ok(map) => post.translations = Some(map),
                Err(e) => {
                    tracing::warn!(
                        "⚠️ Ignoring translations for post {} ({}): {}",
                        post.id,
                        post.slug,
                        e
                    );
                }
            },
            None => {
                tracing::warn!(
                    "⚠️ Post {} references unknown translation group {}",
                    post.id,
                    group_slug
                );
            }
        }
    }
}

/// Turns each post's cover image attachment into a `coverImage` filename and makes
/// sure the attachment is downloaded with the post's other images.
pub fn resolve_cover_images(posts: &mut [Post], attachments: &HashMap<String, String>) {
    for post in posts.iter_mut() {
        let Some(attachment_id) = &post.cover_image_id else {
            continue;
        };
        let Some(url) = attachments.get(attachment_id) else {
            tracing::warn!(
                "⚠️ Post {} references unknown cover image attachment {}",
                post.id,
                attachment_id
            );
            continue;
        };
        let Some(filename) = image_filename(url) else {
            tracing::warn!("⚠️ Cover image for post {} has no usable filename: {}", post.id, url);
            continue;
        };

        post.frontmatter
            .entry("coverImage".to_string())
            .or_insert(FrontmatterValue::String(filename));
        if !post.image_urls.contains(url) {
            post.image_urls.push(url.clone());
        }
    }
}
