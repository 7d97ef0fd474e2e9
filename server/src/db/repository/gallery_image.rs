//! Gallery Image Repository

use super::RepoResult;
use crate::db::Db;
use shared::{GalleryImage, GalleryImageCreate, GalleryImageUpdate};

#[derive(Clone)]
pub struct GalleryImageRepository {
    db: Db,
}

impl GalleryImageRepository {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// All gallery images, by display order
    pub async fn find_all(&self) -> RepoResult<Vec<GalleryImage>> {
        let mut images: Vec<GalleryImage> =
            self.db.gallery_images().iter().map(|i| i.clone()).collect();
        images.sort_by_key(|i| i.display_order);
        Ok(images)
    }

    /// Find gallery image by id
    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<GalleryImage>> {
        Ok(self.db.gallery_images().get(&id).map(|i| i.clone()))
    }

    /// Create a new gallery image
    pub async fn create(&self, data: GalleryImageCreate) -> RepoResult<GalleryImage> {
        let id = self.db.next_gallery_image_id();
        let image = GalleryImage {
            id,
            title: data.title,
            image_url: data.image_url,
            alt_text: data.alt_text,
            display_order: data.display_order,
        };
        self.db.gallery_images().insert(id, image.clone());
        Ok(image)
    }

    /// Update a gallery image. Returns `None` when the id does not exist.
    pub async fn update(
        &self,
        id: i64,
        data: GalleryImageUpdate,
    ) -> RepoResult<Option<GalleryImage>> {
        match self.db.gallery_images().get_mut(&id) {
            Some(mut image) => {
                if let Some(title) = data.title {
                    image.title = title;
                }
                if let Some(image_url) = data.image_url {
                    image.image_url = image_url;
                }
                if let Some(alt_text) = data.alt_text {
                    image.alt_text = Some(alt_text);
                }
                if let Some(display_order) = data.display_order {
                    image.display_order = display_order;
                }
                Ok(Some(image.clone()))
            }
            None => Ok(None),
        }
    }

    /// Hard delete a gallery image
    pub async fn delete(&self, id: i64) -> RepoResult<bool> {
        Ok(self.db.gallery_images().remove(&id).is_some())
    }
}
