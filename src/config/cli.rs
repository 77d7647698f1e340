use crate::config::{ExportConfig, ExportSettings, DEFAULT_FRONTMATTER_FIELDS};
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "wp2md")]
#[command(about = "Convert a WordPress export into Markdown files with frontmatter")]
pub struct CliConfig {
    /// Parsed export document (JSON)
    #[arg(long, short = 'i')]
    pub input: Option<String>,

    /// TOML configuration file; replaces the export options below
    #[arg(long, short = 'c')]
    pub config: Option<String>,

    #[arg(long, default_value = "output")]
    pub output: String,

    /// Write each post to its own folder (`slug/index.md`)
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub per_post_folders: bool,

    /// Group translated posts and name them by language
    #[arg(long)]
    pub translations: bool,

    #[arg(long, default_value = "en")]
    pub default_language: String,

    #[arg(long, default_value_t = 10)]
    pub write_delay_ms: u64,

    #[arg(long, default_value_t = 500)]
    pub request_delay_ms: u64,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub save_images: bool,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub strict_ssl: bool,

    #[arg(long, value_delimiter = ',')]
    pub post_types: Vec<String>,

    #[arg(long, value_delimiter = ',', default_values_t = DEFAULT_FRONTMATTER_FIELDS.iter().map(|f| f.to_string()))]
    pub frontmatter_fields: Vec<String>,

    /// strftime pattern for dates
    #[arg(long)]
    pub date_format: Option<String>,

    #[arg(long)]
    pub include_time: bool,

    #[arg(long)]
    pub quote_date: bool,

    /// `utc` or a fixed offset like `+02:00`
    #[arg(long, default_value = "utc")]
    pub timezone: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

impl CliConfig {
    pub fn to_settings(&self) -> ExportSettings {
        ExportSettings {
            output_root: self.output.clone(),
            per_post_folders: self.per_post_folders,
            translations: self.translations,
            default_language: self.default_language.clone(),
            write_delay_ms: self.write_delay_ms,
            request_delay_ms: self.request_delay_ms,
            save_images: self.save_images,
            strict_ssl: self.strict_ssl,
            post_types: self.post_types.clone(),
            frontmatter_fields: self.frontmatter_fields.clone(),
            date_format: self.date_format.clone(),
            include_time: self.include_time,
            quote_date: self.quote_date,
            timezone: self.timezone.clone(),
        }
    }

    pub fn to_export_config(&self) -> Result<ExportConfig> {
        self.validate()?;
        self.to_settings().into_config()
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(input) = &self.input {
            validate_path("input", input)?;
        }
        self.to_settings().validate()
    }
}
