use crate::adapters::frontmatter::FieldSpec;
use crate::config::{DateSettings, ExportConfig};
use crate::domain::model::{FrontmatterValue, PayloadItem, Post};
use crate::domain::ports::Loader;
use crate::utils::error::{ExportError, Result};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, SecondsFormat};

/// Renders posts into Markdown documents with a frontmatter header.
#[derive(Debug, Clone)]
pub struct MarkdownLoader {
    fields: Vec<FieldSpec>,
    dates: DateSettings,
}

impl MarkdownLoader {
    pub fn new(config: &ExportConfig) -> Self {
        Self {
            fields: config.frontmatter_fields.clone(),
            dates: config.dates.clone(),
        }
    }

    pub fn render(&self, post: &Post) -> String {
        let mut output = String::from("---\n");

        for spec in &self.fields {
            if let Some(value) = spec.field.extract(post) {
                if let Some(line) = render_field(spec.output_key(), &value, &self.dates) {
                    output.push_str(&line);
                }
            }
        }

        output.push_str("---\n\n");
        output.push_str(&post.content);
        output.push('\n');

        for (key, value) in &post.meta_content {
            output.push_str(&format!("\n::{}\n{}\n::\n", key, value));
        }

        output
    }
}

#[async_trait]
impl Loader for MarkdownLoader {
    async fn load(&self, item: &PayloadItem) -> Result<Vec<u8>> {
        match item {
            PayloadItem::Post(post) => Ok(self.render(post).into_bytes()),
            PayloadItem::Image(url) => Err(ExportError::ConfigError {
                message: format!("Markdown loader cannot render image {}", url),
            }),
        }
    }
}

/// One `key: value` entry including its trailing newline, or `None` for empty values.
pub fn render_field(key: &str, value: &FrontmatterValue, dates: &DateSettings) -> Option<String> {
    let rendered = match value {
        FrontmatterValue::String(text) => {
            if text.is_empty() {
                return None;
            }
            format!(" {}", quote(text))
        }
        FrontmatterValue::Integer(number) => format!(" {}", number),
        FrontmatterValue::Boolean(flag) => format!(" {}", flag),
        FrontmatterValue::Date(date) => format!(" {}", format_date(date, dates)),
        FrontmatterValue::List(items) => {
            if items.is_empty() {
                return None;
            }
            items
                .iter()
                .map(|item| format!("\n  - {}", quote(item)))
                .collect()
        }
        FrontmatterValue::Mapping(entries) => {
            if entries.is_empty() {
                return None;
            }
            entries
                .iter()
                .map(|(sub_key, sub_value)| format!("\n  {}: {}", sub_key, quote(sub_value)))
                .collect()
        }
        FrontmatterValue::Multiline(text) => {
            let mut block = String::from(" |");
            for line in text.lines() {
                block.push_str("\n  ");
                block.push_str(line);
            }
            block
        }
    };

    Some(format!("{}:{}\n", key, rendered))
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\\\""))
}

pub fn format_date(date: &DateTime<FixedOffset>, settings: &DateSettings) -> String {
    let local = date.with_timezone(&settings.offset);

    let formatted = match &settings.format {
        Some(format) => local.format(format).to_string(),
        None if settings.include_time => local.to_rfc3339_opts(SecondsFormat::Secs, false),
        None => local.format("%Y-%m-%d").to_string(),
    };

    if settings.quote {
        format!("\"{}\"", formatted)
    } else {
        formatted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{parse_timezone, ExportSettings};
    use std::collections::BTreeMap;

    fn date(raw: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(raw).unwrap()
    }

    fn loader(fields: &[&str]) -> MarkdownLoader {
        let config = ExportSettings {
            frontmatter_fields: fields.iter().map(|f| f.to_string()).collect(),
            ..Default::default()
        }
        .into_config()
        .unwrap();
        MarkdownLoader::new(&config)
    }

    #[test]
    fn test_render_scalars() {
        let dates = DateSettings::default();
        assert_eq!(
            render_field("title", &FrontmatterValue::String("Say \"hi\"".to_string()), &dates),
            Some("title: \"Say \\\"hi\\\"\"\n".to_string())
        );
        assert_eq!(render_field("title", &FrontmatterValue::String(String::new()), &dates), None);
        assert_eq!(
            render_field("id", &FrontmatterValue::Integer(7), &dates),
            Some("id: 7\n".to_string())
        );
        assert_eq!(
            render_field("draft", &FrontmatterValue::Boolean(true), &dates),
            Some("draft: true\n".to_string())
        );
    }

    #[test]
    fn test_render_collections() {
        let dates = DateSettings::default();
        let tags = FrontmatterValue::List(vec!["rust".to_string(), "wp".to_string()]);
        assert_eq!(
            render_field("tags", &tags, &dates),
            Some("tags:\n  - \"rust\"\n  - \"wp\"\n".to_string())
        );
        assert_eq!(render_field("tags", &FrontmatterValue::List(vec![]), &dates), None);

        let map = FrontmatterValue::Mapping(BTreeMap::from([
            ("en".to_string(), "1".to_string()),
            ("fr".to_string(), "2".to_string()),
        ]));
        assert_eq!(
            render_field("translations", &map, &dates),
            Some("translations:\n  en: \"1\"\n  fr: \"2\"\n".to_string())
        );

        let excerpt = FrontmatterValue::Multiline("first\nsecond".to_string());
        assert_eq!(
            render_field("excerpt", &excerpt, &dates),
            Some("excerpt: |\n  first\n  second\n".to_string())
        );
    }

    #[test]
    fn test_format_date_variants() {
        let published = date("2020-12-31T23:30:00+00:00");

        assert_eq!(format_date(&published, &DateSettings::default()), "2020-12-31");

        let with_time = DateSettings {
            include_time: true,
            ..Default::default()
        };
        assert_eq!(format_date(&published, &with_time), "2020-12-31T23:30:00+00:00");

        let shifted = DateSettings {
            offset: parse_timezone("+02:00").unwrap(),
            quote: true,
            ..Default::default()
        };
        assert_eq!(format_date(&published, &shifted), "\"2021-01-01\"");

        let custom = DateSettings {
            format: Some("%d/%m/%Y".to_string()),
            ..Default::default()
        };
        assert_eq!(format_date(&published, &custom), "31/12/2020");
    }

    #[test]
    fn test_render_document() {
        let mut post = Post::new("1", "hello");
        post.content = "Body text.".to_string();
        post.frontmatter.insert(
            "title".to_string(),
            FrontmatterValue::String("Hello".to_string()),
        );
        post.frontmatter.insert(
            "date".to_string(),
            FrontmatterValue::Date(date("2021-03-04T05:06:07+00:00")),
        );
        post.meta_content
            .insert("footnotes".to_string(), "[1] A note.".to_string());
        post.meta_content
            .insert("aside".to_string(), "Side.".to_string());

        let document = loader(&["title", "date:published", "tags"]).render(&post);

        assert_eq!(
            document,
            "---\ntitle: \"Hello\"\npublished: 2021-03-04\n---\n\nBody text.\n\n::aside\nSide.\n::\n\n::footnotes\n[1] A note.\n::\n"
        );
    }

    #[tokio::test]
    async fn test_loader_rejects_images() {
        let markdown = loader(&["title"]);
        let result = markdown
            .load(&PayloadItem::Image("https://example.com/a.png".to_string()))
            .await;
        assert!(result.is_err());
    }
}
