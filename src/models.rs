use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BlogPostRow {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub featured_image: Option<String>,
    pub category: String,
    pub tags: String,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub featured_image: Option<String>,
    pub category: Category,
    pub tags: Vec<String>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct BlogImage {
    pub id: String,
    pub post_id: String,
    pub image_url: String,
    pub caption: String,
    pub display_order: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioItem {
    pub id: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub image_url: String,
    pub display_order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UploadedImage {
    pub filename: String,
    pub content_type: String,
    pub size: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    #[default]
    Tips,
    Portfolio,
    LawnCare,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Tips => "tips",
            Category::Portfolio => "portfolio",
            Category::LawnCare => "lawn-care",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "tips" => Ok(Category::Tips),
            "portfolio" => Ok(Category::Portfolio),
            "lawn-care" => Ok(Category::LawnCare),
            other => Err(format!("unknown category `{other}`")),
        }
    }
}

impl From<BlogPostRow> for BlogPost {
    fn from(
        BlogPostRow {
            id,
            title,
            slug,
            content,
            excerpt,
            featured_image,
            category,
            tags,
            published,
            created_at,
            updated_at,
        }: BlogPostRow,
    ) -> Self {
        let tags = if tags.trim().is_empty() {
            Vec::new()
        } else {
            serde_json::from_str(&tags).unwrap_or_else(|e| {
                tracing::warn!(post_id = %id, error = %e, "stored tags are not a JSON array");
                Vec::new()
            })
        };
        let category = category.parse().unwrap_or_else(|e| {
            tracing::warn!(post_id = %id, error = %e, "stored category is invalid");
            Category::default()
        });
        BlogPost {
            id,
            title,
            slug,
            content,
            excerpt,
            featured_image,
            category,
            tags,
            published,
            created_at,
            updated_at,
        }
    }
}
