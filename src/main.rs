use anyhow::Context;
use clap::Parser;
use wp2md::adapters::ingest::{enrich, load_export, resolve_cover_images};
use wp2md::config::toml_config::TomlConfig;
use wp2md::utils::logger;
use wp2md::{CliConfig, ExportConfig, Exporter, ImageLoader, LocalStorage, MarkdownLoader};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting wp2md");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let (config, input) = match load_config(&cli) {
        Ok(loaded) => loaded,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    let Some(input) = input else {
        eprintln!("❌ No input file given (use --input or [input] path in the config file)");
        std::process::exit(1);
    };

    let document = load_export(&input)
        .await
        .with_context(|| format!("Failed to read export document {}", input))?;
    let mut posts = document.posts;
    if config.translations {
        enrich(&mut posts, &document.translation_groups);
    }
    resolve_cover_images(&mut posts, &document.attachments);
    tracing::info!("📥 Loaded {} posts from {}", posts.len(), input);

    let images = ImageLoader::new(config.strict_ssl).context("Failed to build HTTP client")?;
    let markdown = MarkdownLoader::new(&config);
    let output_root = config.layout.output_root.clone();
    let exporter = Exporter::new(config, LocalStorage::new(), markdown, images);

    let report = exporter.run(posts).await;

    let failed = report.posts.failure_count
        + report.images.map(|summary| summary.failure_count).unwrap_or(0);
    println!("📁 Output saved to: {}", output_root.display());
    if failed > 0 {
        println!("⚠️ {} items failed; re-run to retry them", failed);
    }

    Ok(())
}

fn load_config(cli: &CliConfig) -> wp2md::Result<(ExportConfig, Option<String>)> {
    match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            let file = TomlConfig::from_file(path)?;
            let input = cli
                .input
                .clone()
                .or_else(|| file.input_path().map(str::to_string));
            Ok((file.to_export_config()?, input))
        }
        None => Ok((cli.to_export_config()?, cli.input.clone())),
    }
}
