//! Menu Category Repository

use super::{RepoError, RepoResult};
use crate::db::Db;
use shared::{MenuCategory, MenuCategoryCreate, MenuCategoryUpdate};

#[derive(Clone)]
pub struct MenuCategoryRepository {
    db: Db,
}

impl MenuCategoryRepository {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// All categories, by display order
    pub async fn find_all(&self) -> RepoResult<Vec<MenuCategory>> {
        let mut categories: Vec<MenuCategory> =
            self.db.menu_categories().iter().map(|c| c.clone()).collect();
        categories.sort_by_key(|c| c.display_order);
        Ok(categories)
    }

    /// Find category by id
    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<MenuCategory>> {
        Ok(self.db.menu_categories().get(&id).map(|c| c.clone()))
    }

    /// Create a new category
    pub async fn create(&self, data: MenuCategoryCreate) -> RepoResult<MenuCategory> {
        if self.db.menu_categories().iter().any(|c| c.slug == data.slug) {
            return Err(RepoError::Duplicate(format!(
                "Slug '{}' already exists",
                data.slug
            )));
        }

        let id = self.db.next_menu_category_id();
        let category = MenuCategory {
            id,
            name: data.name,
            slug: data.slug,
            display_order: data.display_order,
        };
        self.db.menu_categories().insert(id, category.clone());
        Ok(category)
    }

    /// Update a category. Returns `None` when the id does not exist.
    pub async fn update(
        &self,
        id: i64,
        data: MenuCategoryUpdate,
    ) -> RepoResult<Option<MenuCategory>> {
        match self.db.menu_categories().get_mut(&id) {
            Some(mut category) => {
                if let Some(name) = data.name {
                    category.name = name;
                }
                if let Some(slug) = data.slug {
                    category.slug = slug;
                }
                if let Some(display_order) = data.display_order {
                    category.display_order = display_order;
                }
                Ok(Some(category.clone()))
            }
            None => Ok(None),
        }
    }

    /// Hard delete a category
    pub async fn delete(&self, id: i64) -> RepoResult<bool> {
        Ok(self.db.menu_categories().remove(&id).is_some())
    }
}
