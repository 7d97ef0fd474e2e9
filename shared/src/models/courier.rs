//! Courier Model
//!
//! Delivery personnel. `is_active = false` soft-deletes: the courier drops
//! out of assignment candidate lists and roster listings but keeps their
//! order history intact.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Courier {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub hash_pass: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Create courier payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CourierCreate {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub phone: String,
    #[validate(length(min = 1, max = 100))]
    pub username: String,
    #[validate(length(min = 4, max = 128))]
    pub password: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Update courier payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CourierUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100))]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100))]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 4, max = 128))]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl Courier {
    /// Verify password using argon2
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            password_hash::{PasswordHash, PasswordVerifier},
            Argon2,
        };

        let parsed_hash = PasswordHash::new(&self.hash_pass)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash password using argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
            Argon2,
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_verifies_and_rejects() {
        let hash = Courier::hash_password("raj123").unwrap();
        let courier = Courier {
            id: 1,
            name: "Raj Kumar".to_string(),
            phone: "8302718516".to_string(),
            username: "raj_delivery".to_string(),
            hash_pass: hash,
            is_active: true,
            created_at: Utc::now(),
        };
        assert!(courier.verify_password("raj123").unwrap());
        assert!(!courier.verify_password("wrong").unwrap());
    }

    #[test]
    fn hash_is_never_serialized() {
        let courier = Courier {
            id: 1,
            name: "Raj Kumar".to_string(),
            phone: "8302718516".to_string(),
            username: "raj_delivery".to_string(),
            hash_pass: "$argon2id$secret".to_string(),
            is_active: true,
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&courier).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("hashPass"));
    }
}
