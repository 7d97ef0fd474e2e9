//! Admin User Repository

use chrono::Utc;

use super::{RepoError, RepoResult};
use crate::db::Db;
use shared::{AdminUser, AdminUserCreate};

#[derive(Clone)]
pub struct AdminUserRepository {
    db: Db,
}

impl AdminUserRepository {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Find admin user by username
    pub async fn find_by_username(&self, username: &str) -> RepoResult<Option<AdminUser>> {
        Ok(self
            .db
            .admin_users()
            .iter()
            .find(|u| u.username == username)
            .map(|u| u.clone()))
    }

    /// Create a new admin user
    pub async fn create(&self, data: AdminUserCreate) -> RepoResult<AdminUser> {
        if self.find_by_username(&data.username).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Username '{}' already exists",
                data.username
            )));
        }

        let hash_pass = AdminUser::hash_password(&data.password)
            .map_err(|e| RepoError::Database(format!("Failed to hash password: {e}")))?;

        let id = self.db.next_admin_user_id();
        let admin = AdminUser {
            id,
            username: data.username,
            hash_pass,
            role: data.role,
            is_active: data.is_active,
            created_at: Utc::now(),
        };
        self.db.admin_users().insert(id, admin.clone());
        Ok(admin)
    }
}
