use crate::core::resolver::PathResolver;
use crate::domain::model::{Payload, PayloadItem, PayloadKind, TranslationGroups};
use crate::domain::ports::Storage;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Payloads still to be written, plus how many destinations already existed.
#[derive(Debug, Clone)]
pub struct Plan {
    pub kind: PayloadKind,
    pub payloads: Vec<Payload>,
    pub already_saved: usize,
    /// Items dropped because an earlier item in this run claimed the same destination.
    pub duplicates: usize,
}

impl Plan {
    pub fn remaining(&self) -> usize {
        self.payloads.len()
    }

    pub fn saving_message(&self) -> String {
        saving_message(self.kind.things(), self.already_saved, self.remaining())
    }
}

pub fn saving_message(things: &str, already_saved: usize, remaining: usize) -> String {
    if already_saved + remaining == 0 {
        format!("No {} to save.", things)
    } else if remaining == 0 {
        format!("All {} {} already saved.", already_saved, things)
    } else {
        format!(
            "{} {} already saved, {} remaining.",
            already_saved, things, remaining
        )
    }
}

pub struct PayloadPlanner<'a, S: Storage> {
    resolver: &'a PathResolver,
    storage: &'a S,
}

impl<'a, S: Storage> PayloadPlanner<'a, S> {
    pub fn new(resolver: &'a PathResolver, storage: &'a S) -> Self {
        Self { resolver, storage }
    }

    /// Walks groups and members in order. Existing files are counted and skipped;
    /// every other destination gets a payload whose delay grows with its position.
    pub async fn plan(&self, groups: &TranslationGroups, kind: PayloadKind) -> Plan {
        let step = Duration::from_millis(match kind {
            PayloadKind::Post => self.resolver.layout().write_delay_ms,
            PayloadKind::Image => self.resolver.layout().request_delay_ms,
        });

        let mut plan = Plan {
            kind,
            payloads: Vec::new(),
            already_saved: 0,
            duplicates: 0,
        };
        // Destination to the post ID or image URL that claimed it first.
        let mut planned: HashMap<PathBuf, String> = HashMap::new();

        for group in groups.iter() {
            for post in &group.posts {
                let candidates: Vec<(PayloadItem, PathBuf)> = match kind {
                    PayloadKind::Post => vec![(
                        PayloadItem::Post(Arc::clone(post)),
                        self.resolver.post_path(post, group),
                    )],
                    PayloadKind::Image => post
                        .image_urls
                        .iter()
                        .filter_map(|url| match self.resolver.image_path(post, group, url) {
                            Some(path) => Some((PayloadItem::Image(url.clone()), path)),
                            None => {
                                tracing::warn!(
                                    "⚠️ Skipping image with no usable filename in post {}: {}",
                                    post.slug,
                                    url
                                );
                                None
                            }
                        })
                        .collect(),
                };

                for (item, destination) in candidates {
                    let owner = match &item {
                        PayloadItem::Post(post) => post.id.clone(),
                        PayloadItem::Image(url) => url.clone(),
                    };
                    if let Some(first) = planned.get(&destination) {
                        plan.duplicates += 1;
                        match &item {
                            PayloadItem::Image(url) if url == first => {
                                tracing::debug!(
                                    "Image {} is shared, already planned at {}",
                                    url,
                                    destination.display()
                                );
                            }
                            PayloadItem::Image(url) => {
                                tracing::warn!(
                                    "⚠️ Image {} collides with {} at {}, skipping it",
                                    url,
                                    first,
                                    destination.display()
                                );
                            }
                            PayloadItem::Post(post) => {
                                tracing::warn!(
                                    "⚠️ Post {} resolves to {} like post {}, skipping it",
                                    post.id,
                                    destination.display(),
                                    first
                                );
                            }
                        }
                        continue;
                    }
                    planned.insert(destination.clone(), owner);

                    if self.storage.exists(&destination).await {
                        plan.already_saved += 1;
                        continue;
                    }

                    let position = plan.payloads.len() as u32;
                    plan.payloads.push(Payload {
                        item,
                        kind,
                        destination,
                        delay: step * position,
                    });
                }
            }
        }

        plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::core::grouper::group_posts;
    use crate::domain::model::Post;
    use crate::utils::error::Result;
    use std::collections::{BTreeMap, HashSet};
    use std::path::Path;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockStorage {
        existing: Mutex<HashSet<PathBuf>>,
    }

    impl MockStorage {
        fn with_existing(paths: &[&str]) -> Self {
            Self {
                existing: Mutex::new(paths.iter().map(PathBuf::from).collect()),
            }
        }
    }

    impl Storage for MockStorage {
        async fn exists(&self, path: &Path) -> bool {
            self.existing.lock().unwrap().contains(path)
        }

        async fn write_file(&self, path: &Path, _data: &[u8]) -> Result<()> {
            self.existing.lock().unwrap().insert(path.to_path_buf());
            Ok(())
        }
    }

    fn resolver(per_post_folders: bool) -> PathResolver {
        PathResolver::new(LayoutConfig {
            per_post_folders,
            output_root: PathBuf::from("out"),
            default_language: "en".to_string(),
            write_delay_ms: 10,
            request_delay_ms: 500,
        })
    }

    #[test]
    fn test_saving_message_wording() {
        assert_eq!(saving_message("posts", 0, 0), "No posts to save.");
        assert_eq!(saving_message("posts", 1, 0), "All 1 posts already saved.");
        assert_eq!(saving_message("images", 2, 3), "2 images already saved, 3 remaining.");
        assert_eq!(saving_message("images", 0, 4), "0 images already saved, 4 remaining.");
    }

    #[tokio::test]
    async fn test_plan_posts_with_stagger() {
        let groups = group_posts(
            vec![Post::new("1", "a"), Post::new("2", "b"), Post::new("3", "c")],
            false,
        );
        let storage = MockStorage::with_existing(&["out/b.md"]);
        let resolver = resolver(false);

        let plan = PayloadPlanner::new(&resolver, &storage)
            .plan(&groups, PayloadKind::Post)
            .await;

        assert_eq!(plan.already_saved, 1);
        let destinations: Vec<&Path> = plan.payloads.iter().map(|p| p.destination.as_path()).collect();
        assert_eq!(destinations, vec![Path::new("out/a.md"), Path::new("out/c.md")]);
        assert_eq!(plan.payloads[0].delay, Duration::ZERO);
        assert_eq!(plan.payloads[1].delay, Duration::from_millis(10));
        assert_eq!(plan.saving_message(), "1 posts already saved, 2 remaining.");
    }

    #[tokio::test]
    async fn test_plan_images_dedupes_shared_destination() {
        let mut first = Post::new("1", "a");
        first.image_urls = vec![
            "https://example.com/2020/cat.png".to_string(),
            "https://example.com/dog.png".to_string(),
            "https://example.com/".to_string(),
        ];
        let mut second = Post::new("2", "b");
        second.image_urls = vec!["https://example.com/2021/cat.png".to_string()];

        let groups = group_posts(vec![first, second], false);
        let storage = MockStorage::default();
        let resolver = resolver(false);

        let plan = PayloadPlanner::new(&resolver, &storage)
            .plan(&groups, PayloadKind::Image)
            .await;

        assert_eq!(plan.remaining(), 2);
        assert_eq!(plan.payloads[0].destination, Path::new("out/images/cat.png"));
        assert_eq!(plan.payloads[1].destination, Path::new("out/images/dog.png"));
        assert_eq!(plan.payloads[1].delay, Duration::from_millis(500));
    }

    #[test]
    fn test_second_plan_after_writes_is_empty() {
        let groups = group_posts(vec![Post::new("1", "hello")], true);
        let storage = MockStorage::default();
        let resolver = resolver(false);
        let planner = PayloadPlanner::new(&resolver, &storage);

        let first = tokio_test::block_on(planner.plan(&groups, PayloadKind::Post));
        assert_eq!(first.saving_message(), "0 posts already saved, 1 remaining.");
        for payload in &first.payloads {
            tokio_test::block_on(storage.write_file(&payload.destination, b"---")).unwrap();
        }

        let second = tokio_test::block_on(planner.plan(&groups, PayloadKind::Post));
        assert!(second.payloads.is_empty());
        assert_eq!(second.saving_message(), "All 1 posts already saved.");
    }

    fn siblings(languages: [Option<&str>; 2]) -> Vec<Post> {
        let map = BTreeMap::from([
            ("en".to_string(), "1".to_string()),
            ("fr".to_string(), "2".to_string()),
        ]);
        ["1", "2"]
            .iter()
            .zip(languages)
            .map(|(id, language)| {
                let mut post = Post::new(*id, format!("post-{}", id));
                post.language = language.map(str::to_string);
                post.translations = Some(map.clone());
                post.image_urls = vec!["https://example.com/uploads/cat.png".to_string()];
                post
            })
            .collect()
    }

    #[tokio::test]
    async fn test_colliding_siblings_are_counted() {
        for languages in [[Some("en"), Some("en")], [None, None]] {
            let groups = group_posts(siblings(languages), true);
            let storage = MockStorage::default();
            let resolver = resolver(true);

            let plan = PayloadPlanner::new(&resolver, &storage)
                .plan(&groups, PayloadKind::Post)
                .await;

            assert_eq!(plan.remaining(), 1);
            assert_eq!(plan.already_saved, 0);
            assert_eq!(plan.duplicates, 1);
            assert_eq!(plan.remaining() + plan.already_saved + plan.duplicates, groups.post_count());
        }
    }

    #[tokio::test]
    async fn test_shared_image_counted_once_on_rerun() {
        let groups = group_posts(siblings([Some("en"), Some("fr")]), true);
        let storage = MockStorage::default();
        let resolver = resolver(true);
        let planner = PayloadPlanner::new(&resolver, &storage);

        let first = planner.plan(&groups, PayloadKind::Image).await;
        assert_eq!(first.remaining(), 1);
        assert_eq!(first.payloads[0].destination, Path::new("out/post-1/images/cat.png"));
        assert_eq!(first.saving_message(), "0 images already saved, 1 remaining.");
        for payload in &first.payloads {
            storage.write_file(&payload.destination, b"png").await.unwrap();
        }

        let second = planner.plan(&groups, PayloadKind::Image).await;
        assert!(second.payloads.is_empty());
        assert_eq!(second.already_saved, 1);
        assert_eq!(second.duplicates, 1);
        assert_eq!(second.saving_message(), "All 1 images already saved.");
    }
}
