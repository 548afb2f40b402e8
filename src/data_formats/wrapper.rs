use serde::{Deserialize, Serialize};

use super::response::{ImageInfo, ItemRef, PostRef};
use crate::content::Block;
use crate::models::{BlogImage, BlogPost, PortfolioItem};

#[derive(Debug, Serialize)]
pub struct PostsWrapper {
    pub posts: Vec<BlogPost>,
}

#[derive(Debug, Serialize)]
pub struct PostWithImagesWrapper {
    pub post: BlogPost,
    pub images: Vec<BlogImage>,
}

#[derive(Debug, Serialize)]
pub struct PostContentWrapper {
    pub slug: String,
    pub blocks: Vec<Block>,
    pub html: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SavedPostWrapper {
    pub success: bool,
    pub post: PostRef,
}

#[derive(Debug, Serialize)]
pub struct PortfolioItemsWrapper {
    pub items: Vec<PortfolioItem>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SavedItemWrapper {
    pub success: bool,
    pub item: ItemRef,
}

#[derive(Debug, Serialize)]
pub struct ImagesWrapper {
    pub images: Vec<ImageInfo>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SuccessWrapper {
    pub success: bool,
}

impl SavedPostWrapper {
    pub fn wrap_with_post_ref(post: PostRef) -> SavedPostWrapper {
        SavedPostWrapper {
            success: true,
            post,
        }
    }
}

impl SavedItemWrapper {
    pub fn wrap_with_item_ref(id: String) -> SavedItemWrapper {
        SavedItemWrapper {
            success: true,
            item: ItemRef { id },
        }
    }
}

impl SuccessWrapper {
    pub fn ok() -> SuccessWrapper {
        SuccessWrapper { success: true }
    }
}
