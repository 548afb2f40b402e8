use serde::{Deserialize, Serialize};

use crate::models::Category;

// ----------------- Auth Request -----------------
#[derive(Deserialize, Serialize, Debug)]
pub struct LoginRequest {
    pub password: String,
}

// ----------------- Blog Request -----------------
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct ListPostsQuery {
    #[serde(default)]
    pub drafts: Option<String>,
}

impl ListPostsQuery {
    pub fn include_drafts(&self) -> bool {
        self.drafts.as_deref() == Some("true")
    }
}

/// Body of both create and update; an update replaces every field.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PostRequest {
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default, alias = "imageUrl")]
    pub featured_image: Option<String>,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub published: Option<bool>,
}

// ----------------- Portfolio Request -----------------
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct CreatePortfolioItemRequest {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    #[serde(alias = "imageUrl")]
    pub image_url: Option<String>,
    #[serde(alias = "displayOrder")]
    pub display_order: Option<i64>,
}

#[derive(Deserialize, Serialize, Debug, Default)]
pub struct DeletePortfolioItemRequest {
    pub id: Option<String>,
}

// ----------------- Image Request -----------------
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct AlignRequest {
    pub before_image_name: Option<String>,
    pub after_image_name: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drafts_flag_must_be_literal_true() {
        let query = |drafts: Option<&str>| ListPostsQuery {
            drafts: drafts.map(str::to_string),
        };
        assert!(query(Some("true")).include_drafts());
        assert!(!query(Some("1")).include_drafts());
        assert!(!query(Some("TRUE")).include_drafts());
        assert!(!query(None).include_drafts());
    }

    #[test]
    fn post_request_accepts_frontend_shape() {
        let request: PostRequest = serde_json::from_str(
            r#"{"title":"Fall Cleanup","content":"x","excerpt":"y","imageUrl":"/a.png",
                "category":"lawn-care","tags":null,"published":true}"#,
        )
        .unwrap();
        assert_eq!(request.featured_image.as_deref(), Some("/a.png"));
        assert_eq!(request.category, Category::LawnCare);
        assert_eq!(request.tags, None);
    }

    #[test]
    fn post_request_rejects_unknown_category() {
        let result: Result<PostRequest, _> =
            serde_json::from_str(r#"{"title":"x","category":"weeds"}"#);
        assert!(result.is_err());
    }
}
