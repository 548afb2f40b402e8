use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::UploadedImage;

#[derive(Deserialize, Serialize, Debug)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PostRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub slug: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ItemRef {
    pub id: String,
}

#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub image_url: String,
    pub file_name: String,
}

#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ImageInfo {
    pub filename: String,
    pub content_type: String,
    pub size: i64,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct ImageLocation {
    pub url: String,
    pub filename: String,
}

#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AlignResponse {
    pub success: bool,
    pub message: String,
    pub recommended_dimensions: Dimensions,
    pub before_image: ImageLocation,
    pub after_image: ImageLocation,
    pub instructions: Vec<String>,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

impl ImageInfo {
    pub fn new(
        UploadedImage {
            filename,
            content_type,
            size,
            created_at,
        }: UploadedImage,
        url: String,
    ) -> Self {
        ImageInfo {
            filename,
            content_type,
            size,
            url,
            created_at,
        }
    }
}

impl AlignResponse {
    pub fn new(before: ImageLocation, after: ImageLocation, dimensions: Dimensions) -> Self {
        let Dimensions { width, height } = dimensions;
        AlignResponse {
            success: true,
            message: "Please download these images, resize them to the same dimensions using an image editor, then re-upload them.".to_string(),
            recommended_dimensions: dimensions,
            before_image: before,
            after_image: after,
            instructions: vec![
                "1. Download both images using the URLs above".to_string(),
                format!("2. Resize both to {width}x{height}px using ImageMagick, GIMP, or Photopea"),
                "3. Re-upload the resized images".to_string(),
                "4. Use the new URLs in your comparison syntax".to_string(),
            ],
        }
    }
}
