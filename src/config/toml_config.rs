use crate::config::{ExportConfig, ExportSettings};
use crate::utils::error::{ExportError, Result};
use crate::utils::validation::{validate_path, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub input: Option<InputConfig>,
    pub output: Option<OutputConfig>,
    pub translations: Option<TranslationsConfig>,
    pub timing: Option<TimingConfig>,
    pub http: Option<HttpConfig>,
    pub frontmatter: Option<FrontmatterConfig>,
    pub filter: Option<FilterConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub root: Option<String>,
    pub per_post_folders: Option<bool>,
    pub save_images: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationsConfig {
    pub enabled: Option<bool>,
    pub default_language: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    pub write_delay_ms: Option<u64>,
    pub request_delay_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub strict_ssl: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrontmatterConfig {
    pub fields: Option<Vec<String>>,
    pub date_format: Option<String>,
    pub include_time: Option<bool>,
    pub quote_date: Option<bool>,
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    pub post_types: Option<Vec<String>>,
}

impl TomlConfig {
    /// Loads a configuration file, substituting `${VAR}` references first.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ExportError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ExportError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn input_path(&self) -> Option<&str> {
        self.input.as_ref().map(|input| input.path.as_str())
    }

    /// Layers the file's values over the defaults.
    pub fn to_settings(&self) -> ExportSettings {
        let mut settings = ExportSettings::default();

        if let Some(output) = &self.output {
            if let Some(root) = &output.root {
                settings.output_root = root.clone();
            }
            if let Some(per_post_folders) = output.per_post_folders {
                settings.per_post_folders = per_post_folders;
            }
            if let Some(save_images) = output.save_images {
                settings.save_images = save_images;
            }
        }

        if let Some(translations) = &self.translations {
            if let Some(enabled) = translations.enabled {
                settings.translations = enabled;
            }
            if let Some(language) = &translations.default_language {
                settings.default_language = language.clone();
            }
        }

        if let Some(timing) = &self.timing {
            if let Some(write_delay_ms) = timing.write_delay_ms {
                settings.write_delay_ms = write_delay_ms;
            }
            if let Some(request_delay_ms) = timing.request_delay_ms {
                settings.request_delay_ms = request_delay_ms;
            }
        }

        if let Some(strict_ssl) = self.http.as_ref().and_then(|http| http.strict_ssl) {
            settings.strict_ssl = strict_ssl;
        }

        if let Some(frontmatter) = &self.frontmatter {
            if let Some(fields) = &frontmatter.fields {
                settings.frontmatter_fields = fields.clone();
            }
            if frontmatter.date_format.is_some() {
                settings.date_format = frontmatter.date_format.clone();
            }
            if let Some(include_time) = frontmatter.include_time {
                settings.include_time = include_time;
            }
            if let Some(quote_date) = frontmatter.quote_date {
                settings.quote_date = quote_date;
            }
            if let Some(timezone) = &frontmatter.timezone {
                settings.timezone = timezone.clone();
            }
        }

        if let Some(post_types) = self.filter.as_ref().and_then(|f| f.post_types.clone()) {
            settings.post_types = post_types;
        }

        settings
    }

    pub fn to_export_config(&self) -> Result<ExportConfig> {
        self.validate()?;
        self.to_settings().into_config()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(path) = self.input_path() {
            validate_path("input.path", path)?;
        }
        self.to_settings().validate()
    }
}
