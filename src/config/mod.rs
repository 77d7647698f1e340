#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::adapters::frontmatter::FieldSpec;
use crate::utils::error::{ExportError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_range, Validate,
};
use chrono::format::{Item, StrftimeItems};
use chrono::{FixedOffset, Offset, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_FRONTMATTER_FIELDS: &[&str] =
    &["title", "date", "categories", "tags", "coverImage", "draft"];

const MAX_DELAY_MS: u64 = 60_000;

/// Where and how output files are laid out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutConfig {
    pub per_post_folders: bool,
    pub output_root: PathBuf,
    pub default_language: String,
    pub write_delay_ms: u64,
    pub request_delay_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateSettings {
    /// strftime pattern; ISO output when unset.
    pub format: Option<String>,
    pub include_time: bool,
    pub quote: bool,
    pub offset: FixedOffset,
}

impl Default for DateSettings {
    fn default() -> Self {
        Self {
            format: None,
            include_time: false,
            quote: false,
            offset: utc(),
        }
    }
}

/// Validated, read-only configuration for one export run.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub layout: LayoutConfig,
    pub translations: bool,
    pub save_images: bool,
    pub strict_ssl: bool,
    pub post_types: Vec<String>,
    pub frontmatter_fields: Vec<FieldSpec>,
    pub dates: DateSettings,
}

impl ExportConfig {
    pub fn includes_post_type(&self, post_type: &str) -> bool {
        self.post_types.is_empty() || self.post_types.iter().any(|t| t == post_type)
    }
}

/// Raw settings as collected from the command line or a TOML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub output_root: String,
    pub per_post_folders: bool,
    pub translations: bool,
    pub default_language: String,
    pub write_delay_ms: u64,
    pub request_delay_ms: u64,
    pub save_images: bool,
    pub strict_ssl: bool,
    pub post_types: Vec<String>,
    pub frontmatter_fields: Vec<String>,
    pub date_format: Option<String>,
    pub include_time: bool,
    pub quote_date: bool,
    pub timezone: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            output_root: "output".to_string(),
            per_post_folders: true,
            translations: false,
            default_language: "en".to_string(),
            write_delay_ms: 10,
            request_delay_ms: 500,
            save_images: true,
            strict_ssl: true,
            post_types: Vec::new(),
            frontmatter_fields: DEFAULT_FRONTMATTER_FIELDS
                .iter()
                .map(|field| field.to_string())
                .collect(),
            date_format: None,
            include_time: false,
            quote_date: false,
            timezone: "utc".to_string(),
        }
    }
}

impl ExportSettings {
    /// Validates every setting and produces the immutable run configuration.
    pub fn into_config(self) -> Result<ExportConfig> {
        self.validate()?;

        let frontmatter_fields = self
            .frontmatter_fields
            .iter()
            .map(|raw| raw.parse::<FieldSpec>())
            .collect::<Result<Vec<_>>>()?;

        let date_format = self.date_format.filter(|format| !format.trim().is_empty());

        Ok(ExportConfig {
            layout: LayoutConfig {
                per_post_folders: self.per_post_folders,
                output_root: PathBuf::from(&self.output_root),
                default_language: self.default_language.trim().to_string(),
                write_delay_ms: self.write_delay_ms,
                request_delay_ms: self.request_delay_ms,
            },
            translations: self.translations,
            save_images: self.save_images,
            strict_ssl: self.strict_ssl,
            post_types: self.post_types,
            frontmatter_fields,
            dates: DateSettings {
                format: date_format,
                include_time: self.include_time,
                quote: self.quote_date,
                offset: parse_timezone(&self.timezone)?,
            },
        })
    }
}

impl Validate for ExportSettings {
    fn validate(&self) -> Result<()> {
        validate_path("output_root", &self.output_root)?;
        validate_non_empty_string("default_language", &self.default_language)?;
        validate_range("write_delay_ms", self.write_delay_ms, 0, MAX_DELAY_MS)?;
        validate_range("request_delay_ms", self.request_delay_ms, 0, MAX_DELAY_MS)?;

        if self.frontmatter_fields.is_empty() {
            return Err(ExportError::MissingConfigError {
                field: "frontmatter_fields".to_string(),
            });
        }
        for raw in &self.frontmatter_fields {
            raw.parse::<FieldSpec>()?;
        }

        if let Some(format) = &self.date_format {
            validate_date_format(format)?;
        }
        parse_timezone(&self.timezone)?;

        Ok(())
    }
}

fn utc() -> FixedOffset {
    Utc.fix()
}

fn validate_date_format(format: &str) -> Result<()> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(ExportError::InvalidConfigValueError {
            field: "date_format".to_string(),
            value: format.to_string(),
            reason: "Not a valid strftime pattern".to_string(),
        });
    }
    Ok(())
}

/// Accepts `utc`, `z` or a fixed offset such as `+02:00` / `-0530`.
pub fn parse_timezone(raw: &str) -> Result<FixedOffset> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("utc") || trimmed.eq_ignore_ascii_case("z") {
        return Ok(utc());
    }

    let invalid = |reason: &str| ExportError::InvalidConfigValueError {
        field: "timezone".to_string(),
        value: raw.to_string(),
        reason: reason.to_string(),
    };

    let re = Regex::new(r"^([+-])(\d{2}):?(\d{2})$").map_err(|e| ExportError::ConfigError {
        message: e.to_string(),
    })?;
    let caps = re
        .captures(trimmed)
        .ok_or_else(|| invalid("Expected 'utc' or an offset like +02:00"))?;

    let hours: i32 = caps[2].parse().map_err(|_| invalid("Invalid hours"))?;
    let minutes: i32 = caps[3].parse().map_err(|_| invalid("Invalid minutes"))?;
    if minutes >= 60 {
        return Err(invalid("Minutes must be below 60"));
    }

    let seconds = (hours * 3600 + minutes * 60) * if &caps[1] == "-" { -1 } else { 1 };
    FixedOffset::east_opt(seconds).ok_or_else(|| invalid("Offset out of range"))
}
