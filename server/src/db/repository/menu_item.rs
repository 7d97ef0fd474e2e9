//! Menu Item Repository

use super::RepoResult;
use crate::db::Db;
use shared::{MenuItem, MenuItemCreate, MenuItemUpdate};

#[derive(Clone)]
pub struct MenuItemRepository {
    db: Db,
}

impl MenuItemRepository {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// All menu items
    pub async fn find_all(&self) -> RepoResult<Vec<MenuItem>> {
        let mut items: Vec<MenuItem> = self.db.menu_items().iter().map(|i| i.clone()).collect();
        items.sort_by_key(|i| i.id);
        Ok(items)
    }

    /// Find menu item by id
    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<MenuItem>> {
        Ok(self.db.menu_items().get(&id).map(|i| i.clone()))
    }

    /// Items belonging to one category
    pub async fn find_by_category(&self, category_id: i64) -> RepoResult<Vec<MenuItem>> {
        let mut items: Vec<MenuItem> = self
            .db
            .menu_items()
            .iter()
            .filter(|i| i.category_id == category_id)
            .map(|i| i.clone())
            .collect();
        items.sort_by_key(|i| i.id);
        Ok(items)
    }

    /// Create a new menu item
    pub async fn create(&self, data: MenuItemCreate) -> RepoResult<MenuItem> {
        let id = self.db.next_menu_item_id();
        let item = MenuItem {
            id,
            name: data.name,
            description: data.description,
            price: data.price,
            category_id: data.category_id,
            image_url: data.image_url,
            is_popular: data.is_popular,
            is_available: data.is_available,
        };
        self.db.menu_items().insert(id, item.clone());
        Ok(item)
    }

    /// Update a menu item. Returns `None` when the id does not exist.
    pub async fn update(&self, id: i64, data: MenuItemUpdate) -> RepoResult<Option<MenuItem>> {
        match self.db.menu_items().get_mut(&id) {
            Some(mut item) => {
                if let Some(name) = data.name {
                    item.name = name;
                }
                if let Some(description) = data.description {
                    item.description = Some(description);
                }
                if let Some(price) = data.price {
                    item.price = price;
                }
                if let Some(category_id) = data.category_id {
                    item.category_id = category_id;
                }
                if let Some(image_url) = data.image_url {
                    item.image_url = Some(image_url);
                }
                if let Some(is_popular) = data.is_popular {
                    item.is_popular = is_popular;
                }
                if let Some(is_available) = data.is_available {
                    item.is_available = is_available;
                }
                Ok(Some(item.clone()))
            }
            None => Ok(None),
        }
    }

    /// Hard delete a menu item
    pub async fn delete(&self, id: i64) -> RepoResult<bool> {
        Ok(self.db.menu_items().remove(&id).is_some())
    }
}
