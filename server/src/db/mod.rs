//! Database Module
//!
//! In-memory storage engine behind the repository layer.
//!
//! Durability is explicitly out of scope for a single-restaurant deployment;
//! what matters is that every caller goes through a repository so the engine
//! stays interchangeable (a transactional store can slot in behind the same
//! repository surface without touching the services above it).

pub mod repository;

use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use shared::{AdminUser, AdminUserCreate, Courier, GalleryImage, MenuCategory, MenuItem, Order};

use crate::utils::AppError;
use repository::AdminUserRepository;

/// Storage engine: concurrent tables plus per-table id sequences.
///
/// Cloning is cheap (`Arc` internally); repositories hold a clone each.
/// `DashMap::get_mut` gives exclusive access to a single record for one
/// mutator call. Compound read-check-write sequences spanning several calls
/// must additionally hold the order's [`order_lock`](Db::order_lock), or two
/// parallel requests can both pass the same guard check.
#[derive(Clone, Debug, Default)]
pub struct Db {
    inner: Arc<DbInner>,
}

#[derive(Debug, Default)]
struct DbInner {
    orders: DashMap<i64, Order>,
    couriers: DashMap<i64, Courier>,
    admin_users: DashMap<i64, AdminUser>,
    menu_categories: DashMap<i64, MenuCategory>,
    menu_items: DashMap<i64, MenuItem>,
    gallery_images: DashMap<i64, GalleryImage>,

    order_locks: DashMap<i64, Arc<Mutex<()>>>,

    order_seq: AtomicI64,
    courier_seq: AtomicI64,
    admin_user_seq: AtomicI64,
    menu_category_seq: AtomicI64,
    menu_item_seq: AtomicI64,
    gallery_image_seq: AtomicI64,
}

impl Db {
    /// Create an empty storage engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the default admin account if it does not exist yet.
    ///
    /// Credentials come from configuration; the hash is computed here, the
    /// plaintext is never stored.
    pub async fn seed_default_admin(&self, username: &str, password: &str) -> Result<(), AppError> {
        let admins = AdminUserRepository::new(self.clone());
        if admins
            .find_by_username(username)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .is_some()
        {
            return Ok(());
        }

        admins
            .create(AdminUserCreate {
                username: username.to_string(),
                password: password.to_string(),
                role: "admin".to_string(),
                is_active: true,
            })
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(username, "Seeded default admin account");
        Ok(())
    }

    pub(crate) fn orders(&self) -> &DashMap<i64, Order> {
        &self.inner.orders
    }

    pub(crate) fn couriers(&self) -> &DashMap<i64, Courier> {
        &self.inner.couriers
    }

    pub(crate) fn admin_users(&self) -> &DashMap<i64, AdminUser> {
        &self.inner.admin_users
    }

    pub(crate) fn menu_categories(&self) -> &DashMap<i64, MenuCategory> {
        &self.inner.menu_categories
    }

    pub(crate) fn menu_items(&self) -> &DashMap<i64, MenuItem> {
        &self.inner.menu_items
    }

    pub(crate) fn gallery_images(&self) -> &DashMap<i64, GalleryImage> {
        &self.inner.gallery_images
    }

    /// Exclusive lock for one order's compound read-check-write operations.
    ///
    /// Guard checks and the mutations they authorize span several table
    /// calls; every such sequence must run under this lock so two parallel
    /// requests cannot both observe the pre-check state.
    pub(crate) fn order_lock(&self, id: i64) -> Arc<Mutex<()>> {
        self.inner.order_locks.entry(id).or_default().clone()
    }

    /// Drop the lock entry for a deleted order.
    pub(crate) fn discard_order_lock(&self, id: i64) {
        self.inner.order_locks.remove(&id);
    }

    pub(crate) fn next_order_id(&self) -> i64 {
        self.inner.order_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub(crate) fn next_courier_id(&self) -> i64 {
        self.inner.courier_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub(crate) fn next_admin_user_id(&self) -> i64 {
        self.inner.admin_user_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub(crate) fn next_menu_category_id(&self) -> i64 {
        self.inner.menu_category_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub(crate) fn next_menu_item_id(&self) -> i64 {
        self.inner.menu_item_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub(crate) fn next_gallery_image_id(&self) -> i64 {
        self.inner.gallery_image_seq.fetch_add(1, Ordering::SeqCst) + 1
    }
}
