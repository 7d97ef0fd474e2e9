//! Courier Repository

use chrono::Utc;

use super::{RepoError, RepoResult};
use crate::db::Db;
use shared::{Courier, CourierCreate, CourierUpdate};

#[derive(Clone)]
pub struct CourierRepository {
    db: Db,
}

impl CourierRepository {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Active couriers only (the assignment candidate list), sorted by name
    pub async fn find_active(&self) -> RepoResult<Vec<Courier>> {
        let mut couriers: Vec<Courier> = self
            .db
            .couriers()
            .iter()
            .filter(|c| c.is_active)
            .map(|c| c.clone())
            .collect();
        couriers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(couriers)
    }

    /// Find courier by id (active or not)
    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<Courier>> {
        Ok(self.db.couriers().get(&id).map(|c| c.clone()))
    }

    /// Find courier by username
    pub async fn find_by_username(&self, username: &str) -> RepoResult<Option<Courier>> {
        Ok(self
            .db
            .couriers()
            .iter()
            .find(|c| c.username == username)
            .map(|c| c.clone()))
    }

    /// Create a new courier
    pub async fn create(&self, data: CourierCreate) -> RepoResult<Courier> {
        // Check duplicate username / phone
        if self.find_by_username(&data.username).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Username '{}' already exists",
                data.username
            )));
        }
        if self.db.couriers().iter().any(|c| c.phone == data.phone) {
            return Err(RepoError::Duplicate(format!(
                "Phone '{}' already exists",
                data.phone
            )));
        }

        // Hash password
        let hash_pass = Courier::hash_password(&data.password)
            .map_err(|e| RepoError::Database(format!("Failed to hash password: {e}")))?;

        let id = self.db.next_courier_id();
        let courier = Courier {
            id,
            name: data.name,
            phone: data.phone,
            username: data.username,
            hash_pass,
            is_active: data.is_active,
            created_at: Utc::now(),
        };
        self.db.couriers().insert(id, courier.clone());
        Ok(courier)
    }

    /// Update a courier
    pub async fn update(&self, id: i64, data: CourierUpdate) -> RepoResult<Courier> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Courier {id} not found")))?;

        // Check duplicate username / phone if changing
        if let Some(ref new_username) = data.username {
            if new_username != &existing.username
                && self.find_by_username(new_username).await?.is_some()
            {
                return Err(RepoError::Duplicate(format!(
                    "Username '{new_username}' already exists"
                )));
            }
        }
        if let Some(ref new_phone) = data.phone {
            if new_phone != &existing.phone
                && self.db.couriers().iter().any(|c| &c.phone == new_phone)
            {
                return Err(RepoError::Duplicate(format!(
                    "Phone '{new_phone}' already exists"
                )));
            }
        }

        let hash_pass = match data.password {
            Some(ref password) => Some(
                Courier::hash_password(password)
                    .map_err(|e| RepoError::Database(format!("Failed to hash password: {e}")))?,
            ),
            None => None,
        };

        match self.db.couriers().get_mut(&id) {
            Some(mut courier) => {
                if let Some(name) = data.name {
                    courier.name = name;
                }
                if let Some(phone) = data.phone {
                    courier.phone = phone;
                }
                if let Some(username) = data.username {
                    courier.username = username;
                }
                if let Some(hash) = hash_pass {
                    courier.hash_pass = hash;
                }
                if let Some(is_active) = data.is_active {
                    courier.is_active = is_active;
                }
                Ok(courier.clone())
            }
            None => Err(RepoError::NotFound(format!("Courier {id} not found"))),
        }
    }

    /// Hard delete a courier.
    ///
    /// Orders keep their (now dangling) courier id: assignments are weak
    /// references, there is no cascade.
    pub async fn delete(&self, id: i64) -> RepoResult<bool> {
        Ok(self.db.couriers().remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(name: &str, username: &str, phone: &str) -> CourierCreate {
        CourierCreate {
            name: name.to_string(),
            phone: phone.to_string(),
            username: username.to_string(),
            password: "secret1".to_string(),
            is_active: true,
        }
    }

    #[tokio::test]
    async fn duplicate_username_rejected() {
        let repo = CourierRepository::new(Db::new());
        repo.create(create("Raj Kumar", "raj_delivery", "8302718516"))
            .await
            .unwrap();
        let err = repo
            .create(create("Other", "raj_delivery", "9999999999"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn update_rejects_duplicate_phone() {
        let repo = CourierRepository::new(Db::new());
        repo.create(create("Raj Kumar", "raj_delivery", "8302718516"))
            .await
            .unwrap();
        let other = repo
            .create(create("Amit Singh", "amit_delivery", "9876543210"))
            .await
            .unwrap();

        let err = repo
            .update(
                other.id,
                CourierUpdate {
                    phone: Some("8302718516".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));

        // Re-submitting the courier's own phone is not a duplicate
        repo.update(
            other.id,
            CourierUpdate {
                phone: Some("9876543210".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn deactivated_courier_drops_out_of_active_list() {
        let repo = CourierRepository::new(Db::new());
        let courier = repo
            .create(create("Amit Singh", "amit_delivery", "9876543210"))
            .await
            .unwrap();
        assert_eq!(repo.find_active().await.unwrap().len(), 1);

        repo.update(
            courier.id,
            CourierUpdate {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert!(repo.find_active().await.unwrap().is_empty());
        // History remains reachable by id
        assert!(repo.find_by_id(courier.id).await.unwrap().is_some());
    }
}
