//! Order Repository
//!
//! Persistence surface for orders. The repository stores what it is given;
//! total/items consistency and status transition rules are the lifecycle
//! service's responsibility, not the store's.

use chrono::Utc;

use super::{RepoError, RepoResult};
use crate::db::Db;
use shared::{Order, OrderDraft, OrderStatus};

#[derive(Clone)]
pub struct OrderRepository {
    db: Db,
}

impl OrderRepository {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Persist a draft as a new pending order.
    ///
    /// Assigns the next monotonic id, encodes the line items to their text
    /// form and stamps both timestamps with the same instant.
    pub async fn create(&self, draft: OrderDraft) -> RepoResult<Order> {
        let order_items = draft
            .encode_items()
            .map_err(|e| RepoError::Validation(format!("Unencodable order items: {e}")))?;

        let id = self.db.next_order_id();
        let now = Utc::now();
        let order = Order {
            id,
            customer_name: draft.customer_name,
            customer_phone: draft.customer_phone,
            customer_address: draft.customer_address,
            order_items,
            total_amount: draft.total_amount,
            status: OrderStatus::Pending,
            order_type: draft.order_type,
            notes: draft.notes,
            otp: None,
            assigned_courier: None,
            created_at: now,
            updated_at: now,
        };
        self.db.orders().insert(id, order.clone());
        Ok(order)
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<Order>> {
        Ok(self.db.orders().get(&id).map(|o| o.clone()))
    }

    /// All orders, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        let mut orders: Vec<Order> = self.db.orders().iter().map(|o| o.clone()).collect();
        orders.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(orders)
    }

    /// Orders assigned to a courier, newest first
    pub async fn find_for_courier(&self, courier_id: i64) -> RepoResult<Vec<Order>> {
        let mut orders: Vec<Order> = self
            .db
            .orders()
            .iter()
            .filter(|o| o.assigned_courier == Some(courier_id))
            .map(|o| o.clone())
            .collect();
        orders.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(orders)
    }

    /// Set the order status. Returns `None` when the id does not exist.
    pub async fn update_status(&self, id: i64, status: OrderStatus) -> RepoResult<Option<Order>> {
        match self.db.orders().get_mut(&id) {
            Some(mut order) => {
                order.status = status;
                order.updated_at = Utc::now();
                Ok(Some(order.clone()))
            }
            None => Ok(None),
        }
    }

    /// Set or clear the order's OTP. Returns `None` when the id does not exist.
    pub async fn set_otp(&self, id: i64, otp: Option<String>) -> RepoResult<Option<Order>> {
        match self.db.orders().get_mut(&id) {
            Some(mut order) => {
                order.otp = otp;
                order.updated_at = Utc::now();
                Ok(Some(order.clone()))
            }
            None => Ok(None),
        }
    }

    /// Record the assigned courier. Returns `None` when the id does not exist.
    pub async fn assign_courier(&self, id: i64, courier_id: i64) -> RepoResult<Option<Order>> {
        match self.db.orders().get_mut(&id) {
            Some(mut order) => {
                order.assigned_courier = Some(courier_id);
                order.updated_at = Utc::now();
                Ok(Some(order.clone()))
            }
            None => Ok(None),
        }
    }

    /// Hard delete an order regardless of status
    pub async fn delete(&self, id: i64) -> RepoResult<bool> {
        Ok(self.db.orders().remove(&id).is_some())
    }
}
