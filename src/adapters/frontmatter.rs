use crate::domain::model::{FrontmatterValue, Post};
use crate::utils::error::{ExportError, Result};
use std::str::FromStr;

/// The closed set of frontmatter fields that can be configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontmatterField {
    Id,
    Title,
    Slug,
    Type,
    Date,
    LastUpdated,
    Author,
    Categories,
    Tags,
    CoverImage,
    Excerpt,
    Draft,
    Language,
    Translations,
}

impl FrontmatterField {
    pub const ALL: [FrontmatterField; 14] = [
        FrontmatterField::Id,
        FrontmatterField::Title,
        FrontmatterField::Slug,
        FrontmatterField::Type,
        FrontmatterField::Date,
        FrontmatterField::LastUpdated,
        FrontmatterField::Author,
        FrontmatterField::Categories,
        FrontmatterField::Tags,
        FrontmatterField::CoverImage,
        FrontmatterField::Excerpt,
        FrontmatterField::Draft,
        FrontmatterField::Language,
        FrontmatterField::Translations,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FrontmatterField::Id => "id",
            FrontmatterField::Title => "title",
            FrontmatterField::Slug => "slug",
            FrontmatterField::Type => "type",
            FrontmatterField::Date => "date",
            FrontmatterField::LastUpdated => "lastUpdated",
            FrontmatterField::Author => "author",
            FrontmatterField::Categories => "categories",
            FrontmatterField::Tags => "tags",
            FrontmatterField::CoverImage => "coverImage",
            FrontmatterField::Excerpt => "excerpt",
            FrontmatterField::Draft => "draft",
            FrontmatterField::Language => "language",
            FrontmatterField::Translations => "translations",
        }
    }

    /// Extracts this field's value from a post, `None` when the post has nothing to say.
    pub fn extract(&self, post: &Post) -> Option<FrontmatterValue> {
        match self {
            FrontmatterField::Id => Some(match post.id.parse::<i64>() {
                Ok(id) => FrontmatterValue::Integer(id),
                Err(_) => FrontmatterValue::String(post.id.clone()),
            }),
            FrontmatterField::Slug => Some(FrontmatterValue::String(post.slug.clone())),
            FrontmatterField::Type => Some(FrontmatterValue::String(post.post_type.clone())),
            FrontmatterField::Language => post.language.clone().map(FrontmatterValue::String),
            FrontmatterField::Translations => post
                .translations
                .as_ref()
                .filter(|map| !map.is_empty())
                .map(|map| FrontmatterValue::Mapping(map.clone())),
            _ => post.frontmatter.get(self.name()).cloned(),
        }
    }
}

impl FromStr for FrontmatterField {
    type Err = ExportError;

    fn from_str(name: &str) -> Result<Self> {
        FrontmatterField::ALL
            .iter()
            .copied()
            .find(|field| field.name() == name)
            .ok_or_else(|| ExportError::UnknownFrontmatterField {
                name: name.to_string(),
            })
    }
}

/// A configured field, optionally written under a different key (`date:published`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub field: FrontmatterField,
    pub alias: Option<String>,
}

impl FieldSpec {
    pub fn output_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(self.field.name())
    }
}

impl FromStr for FieldSpec {
    type Err = ExportError;

    fn from_str(raw: &str) -> Result<Self> {
        let (name, alias) = match raw.split_once(':') {
            Some((name, alias)) => (name.trim(), Some(alias.trim())),
            None => (raw.trim(), None),
        };

        if let Some(alias) = alias {
            if alias.is_empty() {
                return Err(ExportError::InvalidConfigValueError {
                    field: "frontmatter_fields".to_string(),
                    value: raw.to_string(),
                    reason: "Alias cannot be empty".to_string(),
                });
            }
        }

        Ok(FieldSpec {
            field: name.parse()?,
            alias: alias.map(str::to_string),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_parse_field_names() {
        assert_eq!("coverImage".parse::<FrontmatterField>().unwrap(), FrontmatterField::CoverImage);
        assert!("cover_image".parse::<FrontmatterField>().is_err());

        for field in FrontmatterField::ALL {
            assert_eq!(field.name().parse::<FrontmatterField>().unwrap(), field);
        }
    }

    #[test]
    fn test_parse_alias() {
        let spec: FieldSpec = "date:published".parse().unwrap();
        assert_eq!(spec.field, FrontmatterField::Date);
        assert_eq!(spec.output_key(), "published");

        let plain: FieldSpec = "tags".parse().unwrap();
        assert_eq!(plain.output_key(), "tags");

        assert!("date:".parse::<FieldSpec>().is_err());
        assert!("nope:alias".parse::<FieldSpec>().is_err());
    }

    #[test]
    fn test_extract_derived_fields() {
        let mut post = Post::new("42", "hello-world");
        post.language = Some("fr".to_string());
        post.translations = Some(BTreeMap::from([
            ("en".to_string(), "41".to_string()),
            ("fr".to_string(), "42".to_string()),
        ]));
        post.frontmatter.insert(
            "title".to_string(),
            FrontmatterValue::String("Bonjour".to_string()),
        );

        assert_eq!(FrontmatterField::Id.extract(&post), Some(FrontmatterValue::Integer(42)));
        assert_eq!(
            FrontmatterField::Slug.extract(&post),
            Some(FrontmatterValue::String("hello-world".to_string()))
        );
        assert_eq!(
            FrontmatterField::Language.extract(&post),
            Some(FrontmatterValue::String("fr".to_string()))
        );
        assert!(matches!(
            FrontmatterField::Translations.extract(&post),
            Some(FrontmatterValue::Mapping(map)) if map.len() == 2
        ));
        assert_eq!(
            FrontmatterField::Title.extract(&post),
            Some(FrontmatterValue::String("Bonjour".to_string()))
        );
        assert_eq!(FrontmatterField::Tags.extract(&post), None);
    }
}
