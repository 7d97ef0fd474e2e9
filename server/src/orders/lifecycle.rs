//! Order Lifecycle Service
//!
//! Orchestrates status transitions and their side effects:
//!
//! ```text
//! place ──> pending ──confirm──> confirmed ──> preparing ──> ready ──verify──> delivered
//!                     │ issue OTP,                                   │ OTP must match
//!                     │ notify customer                              │
//!                     └── any non-terminal state ──cancel──> cancelled
//! ```
//!
//! The OTP invariant is maintained here: an order carries an OTP exactly
//! while its status requires one (issued on confirmation, cleared again on
//! cancellation, retained through delivery for audit).
//!
//! Compound operations serialize per order id (see [`Db::order_lock`]), so
//! two parallel requests can never both pass the same guard check.

use rand::Rng;

use crate::db::repository::{CourierRepository, OrderRepository};
use crate::db::Db;
use crate::orders::OrderError;
use crate::services::WhatsAppService;
use shared::{Order, OrderDraft, OrderStatus, OrderType};

#[derive(Clone)]
pub struct OrderLifecycle {
    db: Db,
    orders: OrderRepository,
    couriers: CourierRepository,
    whatsapp: WhatsAppService,
}

impl OrderLifecycle {
    pub fn new(db: Db, whatsapp: WhatsAppService) -> Self {
        Self {
            orders: OrderRepository::new(db.clone()),
            couriers: CourierRepository::new(db.clone()),
            db,
            whatsapp,
        }
    }

    /// Place a new order.
    ///
    /// Validates the draft, recomputes the total from the line items and
    /// rejects drafts whose
    /// claimed total disagrees. The charged amount must always be derivable
    /// from what was ordered.
    pub async fn create_order(&self, draft: OrderDraft) -> Result<Order, OrderError> {
        validator::Validate::validate(&draft)
            .map_err(|e| OrderError::Validation(e.to_string()))?;

        let computed = draft.computed_total().ok_or_else(|| {
            OrderError::Validation("Order total exceeds the representable amount".to_string())
        })?;
        if draft.total_amount != computed {
            return Err(OrderError::Validation(format!(
                "totalAmount {} does not match item sum {computed}",
                draft.total_amount
            )));
        }

        if draft.order_type == OrderType::Delivery
            && draft
                .customer_address
                .as_deref()
                .map_or(true, |a| a.trim().is_empty())
        {
            return Err(OrderError::Validation(
                "customerAddress is required for delivery orders".to_string(),
            ));
        }

        let order = self.orders.create(draft).await?;
        tracing::info!(order_id = order.id, total = order.total_amount, "Order placed");
        Ok(order)
    }

    /// All orders, newest first.
    pub async fn list_orders(&self) -> Result<Vec<Order>, OrderError> {
        Ok(self.orders.find_all().await?)
    }

    /// Orders assigned to one courier, newest first.
    pub async fn orders_for_courier(&self, courier_id: i64) -> Result<Vec<Order>, OrderError> {
        Ok(self.orders.find_for_courier(courier_id).await?)
    }

    pub async fn get_order(&self, id: i64) -> Result<Order, OrderError> {
        self.orders
            .find_by_id(id)
            .await?
            .ok_or(OrderError::NotFound(id))
    }

    /// Move an order to a new status.
    ///
    /// Transitions are checked against the state machine; terminal states
    /// admit none, and re-confirming is rejected so an already-sent OTP is
    /// never silently rotated. Confirmation issues the OTP and dispatches
    /// the customer notification fire-and-forget: the transition commits
    /// regardless of whether the message can be delivered.
    pub async fn update_status(
        &self,
        id: i64,
        new_status: OrderStatus,
    ) -> Result<Order, OrderError> {
        // Guard check and mutation must not interleave with another request
        // on the same order.
        let lock = self.db.order_lock(id);
        let _guard = lock.lock().await;

        let current = self.get_order(id).await?;
        if !current.status.can_transition_to(new_status) {
            return Err(OrderError::InvalidTransition {
                from: current.status,
                to: new_status,
            });
        }

        match new_status {
            OrderStatus::Confirmed => {
                let otp = generate_otp();
                self.orders.set_otp(id, Some(otp.clone())).await?;
                let order = self
                    .orders
                    .update_status(id, new_status)
                    .await?
                    .ok_or(OrderError::NotFound(id))?;

                let whatsapp = self.whatsapp.clone();
                let phone = order.customer_phone.clone();
                let order_id = order.id;
                tokio::spawn(async move {
                    if !whatsapp
                        .send_order_confirmation(&phone, order_id, &otp)
                        .await
                    {
                        tracing::warn!(
                            order_id,
                            "Order confirmation message not delivered; customer should be called"
                        );
                    }
                });

                tracing::info!(order_id = order.id, "Order confirmed, OTP issued");
                Ok(order)
            }
            OrderStatus::Cancelled => {
                // A cancelled order must not keep a live hand-off code.
                if current.otp.is_some() {
                    self.orders.set_otp(id, None).await?;
                }
                let order = self
                    .orders
                    .update_status(id, new_status)
                    .await?
                    .ok_or(OrderError::NotFound(id))?;
                tracing::info!(order_id = order.id, from = %current.status, "Order cancelled");
                Ok(order)
            }
            _ => {
                let order = self
                    .orders
                    .update_status(id, new_status)
                    .await?
                    .ok_or(OrderError::NotFound(id))?;
                tracing::info!(order_id = order.id, status = %new_status, "Order status updated");
                Ok(order)
            }
        }
    }

    /// Assign a courier to an in-flight order.
    ///
    /// The order must be confirmed/preparing/ready and the courier active.
    /// Plain foreign-key set beyond that; no balancing, no capacity.
    pub async fn assign_courier(
        &self,
        order_id: i64,
        courier_id: i64,
    ) -> Result<Order, OrderError> {
        let lock = self.db.order_lock(order_id);
        let _guard = lock.lock().await;

        let order = self.get_order(order_id).await?;
        if !order.status.is_assignable() {
            return Err(OrderError::NotAssignable {
                id: order_id,
                status: order.status,
            });
        }

        let courier = self
            .couriers
            .find_by_id(courier_id)
            .await?
            .ok_or(OrderError::CourierNotFound(courier_id))?;
        if !courier.is_active {
            return Err(OrderError::CourierInactive(courier_id));
        }

        let order = self
            .orders
            .assign_courier(order_id, courier_id)
            .await?
            .ok_or(OrderError::NotFound(order_id))?;
        tracing::info!(order_id, courier_id, "Courier assigned");
        Ok(order)
    }

    /// Complete delivery against the customer's OTP.
    ///
    /// Succeeds only from `ready` with an exact match on the stored code;
    /// a mismatch leaves the order untouched and is retriable.
    pub async fn verify_delivery(
        &self,
        order_id: i64,
        submitted_otp: &str,
    ) -> Result<Order, OrderError> {
        let lock = self.db.order_lock(order_id);
        let _guard = lock.lock().await;

        let order = self.get_order(order_id).await?;
        if order.status != OrderStatus::Ready {
            return Err(OrderError::InvalidTransition {
                from: order.status,
                to: OrderStatus::Delivered,
            });
        }

        match order.otp.as_deref() {
            Some(otp) if otp == submitted_otp => {
                let order = self
                    .orders
                    .update_status(order_id, OrderStatus::Delivered)
                    .await?
                    .ok_or(OrderError::NotFound(order_id))?;
                tracing::info!(order_id, "Delivery completed");
                Ok(order)
            }
            _ => Err(OrderError::InvalidOtp),
        }
    }

    /// Administrative hard delete, no status guard.
    pub async fn delete_order(&self, id: i64) -> Result<bool, OrderError> {
        let lock = self.db.order_lock(id);
        let _guard = lock.lock().await;

        let deleted = self.orders.delete(id).await?;
        if deleted {
            self.db.discard_order_lock(id);
            tracing::info!(order_id = id, "Order deleted");
        }
        Ok(deleted)
    }
}

/// Uniform random 4-digit code, 1000–9999.
fn generate_otp() -> String {
    rand::thread_rng().gen_range(1000..=9999).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::CourierRepository;
    use crate::services::MessageTransport;
    use async_trait::async_trait;
    use shared::{CourierCreate, OrderItem};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Transport whose handshake succeeds but every send fails.
    struct FailingTransport {
        attempts: AtomicUsize,
    }

    #[async_trait]
    impl MessageTransport for FailingTransport {
        async fn connect(&self) -> anyhow::Result<()> {
            Ok(())
        }
        async fn send_text(&self, _number: &str, _body: &str) -> anyhow::Result<()> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            anyhow::bail!("gateway down")
        }
    }

    fn lifecycle() -> (OrderLifecycle, Db) {
        let db = Db::new();
        (
            OrderLifecycle::new(db.clone(), WhatsAppService::disconnected()),
            db,
        )
    }

    fn draft() -> OrderDraft {
        OrderDraft {
            customer_name: "Priya Sharma".to_string(),
            customer_phone: "9876543210".to_string(),
            customer_address: Some("12 MG Road".to_string()),
            items: vec![
                OrderItem {
                    name: "Veg Sandwich".to_string(),
                    price: 40,
                    quantity: 2,
                },
                OrderItem {
                    name: "Lassi".to_string(),
                    price: 30,
                    quantity: 1,
                },
            ],
            total_amount: 110,
            order_type: OrderType::Delivery,
            notes: None,
        }
    }

    async fn active_courier(db: &Db) -> i64 {
        CourierRepository::new(db.clone())
            .create(CourierCreate {
                name: "Raj Kumar".to_string(),
                phone: "8302718516".to_string(),
                username: "raj_delivery".to_string(),
                password: "raj123".to_string(),
                is_active: true,
            })
            .await
            .unwrap()
            .id
    }

    fn assert_otp_invariant(order: &Order) {
        assert_eq!(
            order.otp.is_some(),
            order.status.requires_otp(),
            "otp presence must follow status {}",
            order.status
        );
    }

    #[tokio::test]
    async fn placement_starts_pending_without_otp() {
        let (lc, _) = lifecycle();
        let order = lc.create_order(draft()).await.unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total_amount, 110);
        assert_otp_invariant(&order);
    }

    #[tokio::test]
    async fn client_total_mismatch_is_rejected() {
        let (lc, _) = lifecycle();
        let mut d = draft();
        d.total_amount = 9999;
        let err = lc.create_order(d).await.unwrap_err();
        assert!(matches!(err, OrderError::Validation(_)));
    }

    #[tokio::test]
    async fn overflowing_item_totals_are_rejected() {
        let (lc, _) = lifecycle();
        let mut d = draft();
        d.items[0].price = i64::MAX;
        d.items[0].quantity = 2;
        d.total_amount = i64::MAX;
        let err = lc.create_order(d).await.unwrap_err();
        assert!(matches!(err, OrderError::Validation(_)));
    }

    #[tokio::test]
    async fn delivery_order_requires_address() {
        let (lc, _) = lifecycle();
        let mut d = draft();
        d.customer_address = None;
        let err = lc.create_order(d).await.unwrap_err();
        assert!(matches!(err, OrderError::Validation(_)));
    }

    #[tokio::test]
    async fn confirmation_issues_four_digit_otp() {
        let (lc, _) = lifecycle();
        let order = lc.create_order(draft()).await.unwrap();
        let order = lc
            .update_status(order.id, OrderStatus::Confirmed)
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Confirmed);
        assert_otp_invariant(&order);

        let otp = order.otp.unwrap();
        assert_eq!(otp.len(), 4);
        let value: u32 = otp.parse().unwrap();
        assert!((1000..=9999).contains(&value));
    }

    #[tokio::test]
    async fn otp_survives_preparing_and_ready() {
        let (lc, _) = lifecycle();
        let order = lc.create_order(draft()).await.unwrap();
        lc.update_status(order.id, OrderStatus::Confirmed)
            .await
            .unwrap();
        let otp = lc.get_order(order.id).await.unwrap().otp;

        let order = lc
            .update_status(order.id, OrderStatus::Preparing)
            .await
            .unwrap();
        assert_eq!(order.otp, otp);
        assert_otp_invariant(&order);

        let order = lc
            .update_status(order.id, OrderStatus::Ready)
            .await
            .unwrap();
        assert_eq!(order.otp, otp);
        assert_otp_invariant(&order);
    }

    #[tokio::test]
    async fn reconfirming_is_rejected_and_otp_unchanged() {
        let (lc, _) = lifecycle();
        let order = lc.create_order(draft()).await.unwrap();
        let confirmed = lc
            .update_status(order.id, OrderStatus::Confirmed)
            .await
            .unwrap();

        let err = lc
            .update_status(order.id, OrderStatus::Confirmed)
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::InvalidTransition { .. }));
        assert_eq!(lc.get_order(order.id).await.unwrap().otp, confirmed.otp);
    }

    #[tokio::test]
    async fn cancellation_clears_otp_and_is_terminal() {
        let (lc, _) = lifecycle();
        let order = lc.create_order(draft()).await.unwrap();
        lc.update_status(order.id, OrderStatus::Confirmed)
            .await
            .unwrap();

        let order = lc
            .update_status(order.id, OrderStatus::Cancelled)
            .await
            .unwrap();
        assert_otp_invariant(&order);

        let err = lc
            .update_status(order.id, OrderStatus::Preparing)
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn delivered_order_cannot_be_cancelled() {
        let (lc, _) = lifecycle();
        let order = lc.create_order(draft()).await.unwrap();
        lc.update_status(order.id, OrderStatus::Confirmed)
            .await
            .unwrap();
        lc.update_status(order.id, OrderStatus::Ready).await.unwrap();
        let otp = lc.get_order(order.id).await.unwrap().otp.unwrap();
        lc.verify_delivery(order.id, &otp).await.unwrap();

        let err = lc
            .update_status(order.id, OrderStatus::Cancelled)
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn otp_gate_rejects_mismatch_and_accepts_exact_match() {
        let (lc, _) = lifecycle();
        let order = lc.create_order(draft()).await.unwrap();
        lc.update_status(order.id, OrderStatus::Confirmed)
            .await
            .unwrap();
        lc.update_status(order.id, OrderStatus::Ready).await.unwrap();
        let otp = lc.get_order(order.id).await.unwrap().otp.unwrap();

        let wrong = if otp == "0000" { "1111" } else { "0000" };
        let err = lc.verify_delivery(order.id, wrong).await.unwrap_err();
        assert!(matches!(err, OrderError::InvalidOtp));
        assert_eq!(
            lc.get_order(order.id).await.unwrap().status,
            OrderStatus::Ready
        );

        let order = lc.verify_delivery(order.id, &otp).await.unwrap();
        assert_eq!(order.status, OrderStatus::Delivered);
        assert_otp_invariant(&order);
    }

    #[tokio::test]
    async fn verification_requires_ready_status() {
        let (lc, _) = lifecycle();
        let order = lc.create_order(draft()).await.unwrap();
        lc.update_status(order.id, OrderStatus::Confirmed)
            .await
            .unwrap();
        let otp = lc.get_order(order.id).await.unwrap().otp.unwrap();

        // Right code, wrong stage
        let err = lc.verify_delivery(order.id, &otp).await.unwrap_err();
        assert!(matches!(err, OrderError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn assignment_requires_active_courier_and_in_flight_order() {
        let (lc, db) = lifecycle();
        let courier_id = active_courier(&db).await;
        let order = lc.create_order(draft()).await.unwrap();

        // Pending orders cannot take a courier
        let err = lc.assign_courier(order.id, courier_id).await.unwrap_err();
        assert!(matches!(err, OrderError::NotAssignable { .. }));

        lc.update_status(order.id, OrderStatus::Confirmed)
            .await
            .unwrap();

        // Nonexistent courier
        let err = lc.assign_courier(order.id, 999).await.unwrap_err();
        assert!(matches!(err, OrderError::CourierNotFound(999)));

        // Inactive courier
        CourierRepository::new(db.clone())
            .update(
                courier_id,
                shared::CourierUpdate {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let err = lc.assign_courier(order.id, courier_id).await.unwrap_err();
        assert!(matches!(err, OrderError::CourierInactive(_)));

        // Reactivate and assign; status unchanged
        CourierRepository::new(db.clone())
            .update(
                courier_id,
                shared::CourierUpdate {
                    is_active: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let order = lc.assign_courier(order.id, courier_id).await.unwrap();
        assert_eq!(order.assigned_courier, Some(courier_id));
        assert_eq!(order.status, OrderStatus::Confirmed);
    }

    #[tokio::test]
    async fn notification_failure_does_not_block_confirmation() {
        let transport = Arc::new(FailingTransport {
            attempts: AtomicUsize::new(0),
        });
        let whatsapp = WhatsAppService::new(transport.clone());
        whatsapp.start_handshake();
        for _ in 0..100 {
            if whatsapp.is_ready() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(1)).await;
        }
        assert!(whatsapp.is_ready());

        let lc = OrderLifecycle::new(Db::new(), whatsapp);
        let order = lc.create_order(draft()).await.unwrap();
        let order = lc
            .update_status(order.id, OrderStatus::Confirmed)
            .await
            .unwrap();

        // Transition committed with a fresh OTP despite the dead gateway.
        assert_eq!(order.status, OrderStatus::Confirmed);
        assert!(order.otp.is_some());

        // The send was actually attempted (and failed) in the background.
        for _ in 0..100 {
            if transport.attempts.load(Ordering::SeqCst) > 0 {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(1)).await;
        }
        assert_eq!(transport.attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_confirms_issue_exactly_one_otp() {
        for _ in 0..200 {
            let (lc, _) = lifecycle();
            let id = lc.create_order(draft()).await.unwrap().id;

            let barrier = Arc::new(tokio::sync::Barrier::new(2));
            let spawn_confirm = |lc: OrderLifecycle, barrier: Arc<tokio::sync::Barrier>| {
                tokio::spawn(async move {
                    barrier.wait().await;
                    lc.update_status(id, OrderStatus::Confirmed).await
                })
            };
            let first = spawn_confirm(lc.clone(), barrier.clone());
            let second = spawn_confirm(lc.clone(), barrier);

            let (a, b) = (first.await.unwrap(), second.await.unwrap());
            assert_eq!(
                a.is_ok() as u8 + b.is_ok() as u8,
                1,
                "exactly one of two simultaneous confirms may succeed"
            );
            let loser = if a.is_err() { a } else { b };
            assert!(matches!(
                loser.unwrap_err(),
                OrderError::InvalidTransition { .. }
            ));
            assert_otp_invariant(&lc.get_order(id).await.unwrap());
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_cancel_and_verify_settle_on_one_terminal_state() {
        for _ in 0..100 {
            let (lc, _) = lifecycle();
            let id = lc.create_order(draft()).await.unwrap().id;
            lc.update_status(id, OrderStatus::Confirmed).await.unwrap();
            lc.update_status(id, OrderStatus::Ready).await.unwrap();
            let otp = lc.get_order(id).await.unwrap().otp.unwrap();

            let barrier = Arc::new(tokio::sync::Barrier::new(2));
            let cancel = {
                let (lc, barrier) = (lc.clone(), barrier.clone());
                tokio::spawn(async move {
                    barrier.wait().await;
                    lc.update_status(id, OrderStatus::Cancelled).await
                })
            };
            let verify = {
                let lc = lc.clone();
                tokio::spawn(async move {
                    barrier.wait().await;
                    lc.verify_delivery(id, &otp).await
                })
            };

            let (c, v) = (cancel.await.unwrap(), verify.await.unwrap());
            assert_eq!(
                c.is_ok() as u8 + v.is_ok() as u8,
                1,
                "cancel and verify must not both win"
            );
            let order = lc.get_order(id).await.unwrap();
            assert!(order.status.is_terminal());
            assert_otp_invariant(&order);
        }
    }

    #[tokio::test]
    async fn operations_on_missing_orders_signal_not_found() {
        let (lc, _) = lifecycle();
        assert!(matches!(
            lc.get_order(42).await.unwrap_err(),
            OrderError::NotFound(42)
        ));
        assert!(matches!(
            lc.update_status(42, OrderStatus::Confirmed).await.unwrap_err(),
            OrderError::NotFound(42)
        ));
        assert!(matches!(
            lc.verify_delivery(42, "1234").await.unwrap_err(),
            OrderError::NotFound(42)
        ));
        assert!(!lc.delete_order(42).await.unwrap());
    }

    #[tokio::test]
    async fn delete_is_unguarded_by_status() {
        let (lc, _) = lifecycle();
        let order = lc.create_order(draft()).await.unwrap();
        lc.update_status(order.id, OrderStatus::Confirmed)
            .await
            .unwrap();
        assert!(lc.delete_order(order.id).await.unwrap());
        assert!(matches!(
            lc.get_order(order.id).await.unwrap_err(),
            OrderError::NotFound(_)
        ));
    }
}
