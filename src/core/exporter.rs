use crate::config::ExportConfig;
use crate::core::executor::PayloadExecutor;
use crate::core::grouper::group_posts;
use crate::core::planner::PayloadPlanner;
use crate::core::resolver::PathResolver;
use crate::domain::model::{ExportReport, PayloadKind, Post};
use crate::domain::ports::{Loader, Storage};

/// Runs the Markdown phase and then the image phase over one set of posts.
pub struct Exporter<S: Storage, M: Loader, I: Loader> {
    config: ExportConfig,
    resolver: PathResolver,
    storage: S,
    markdown: M,
    images: I,
}

impl<S: Storage, M: Loader, I: Loader> Exporter<S, M, I> {
    pub fn new(config: ExportConfig, storage: S, markdown: M, images: I) -> Self {
        Self {
            resolver: PathResolver::new(config.layout.clone()),
            config,
            storage,
            markdown,
            images,
        }
    }

    pub async fn run(&self, posts: Vec<Post>) -> ExportReport {
        let total = posts.len();
        let posts: Vec<Post> = posts
            .into_iter()
            .filter(|post| self.config.includes_post_type(&post.post_type))
            .collect();
        if posts.len() < total {
            tracing::info!(
                "Skipping {} posts with excluded post types",
                total - posts.len()
            );
        }

        let groups = group_posts(posts, self.config.translations);
        let planner = PayloadPlanner::new(&self.resolver, &self.storage);
        let executor = PayloadExecutor::new(&self.storage);
        let mut report = ExportReport::default();

        tracing::info!("📝 Saving posts...");
        let plan = planner.plan(&groups, PayloadKind::Post).await;
        tracing::info!("{}", plan.saving_message());
        if plan.duplicates > 0 {
            tracing::warn!(
                "⚠️ {} posts skipped because another post has the same output path",
                plan.duplicates
            );
        }
        report.posts_already_saved = plan.already_saved;
        report.posts = executor.execute(plan.payloads, &self.markdown).await;

        if self.config.save_images {
            tracing::info!("🖼️ Saving images...");
            let plan = planner.plan(&groups, PayloadKind::Image).await;
            tracing::info!("{}", plan.saving_message());
            report.images_already_saved = plan.already_saved;
            report.images = Some(executor.execute(plan.payloads, &self.images).await);
        }

        report
    }
}
