//! End-to-end order lifecycle through a fully initialized `ServerState`.
//!
//! Covers the whole delivery path: intake, confirmation with OTP issuance,
//! courier assignment, preparation, OTP hand-off and the terminal state.

use dfh_server::db::repository::{AdminUserRepository, CourierRepository};
use dfh_server::{Config, OrderError, ServerState};
use shared::{CourierCreate, OrderDraft, OrderItem, OrderStatus, OrderType};

async fn test_state() -> ServerState {
    let config = Config::with_overrides(0, None);
    ServerState::initialize(&config).await
}

fn delivery_draft(name: &str) -> OrderDraft {
    OrderDraft {
        customer_name: name.to_string(),
        customer_phone: "9876543210".to_string(),
        customer_address: Some("12 MG Road".to_string()),
        items: vec![
            OrderItem {
                name: "Paneer Tikka".to_string(),
                price: 180,
                quantity: 1,
            },
            OrderItem {
                name: "Butter Naan".to_string(),
                price: 40,
                quantity: 2,
            },
        ],
        total_amount: 260,
        order_type: OrderType::Delivery,
        notes: None,
    }
}

fn courier_create(username: &str) -> CourierCreate {
    CourierCreate {
        name: "Ravi Kumar".to_string(),
        phone: "9000000001".to_string(),
        username: username.to_string(),
        password: "wheels42".to_string(),
        is_active: true,
    }
}

#[tokio::test]
async fn full_delivery_flow() {
    let state = test_state().await;
    let lifecycle = state.lifecycle();

    let courier = CourierRepository::new(state.db.clone())
        .create(courier_create("ravi"))
        .await
        .unwrap();

    // Intake
    let order = lifecycle.create_order(delivery_draft("Asha")).await.unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    assert!(order.otp.is_none());
    assert_eq!(order.total_amount, 260);

    // Confirmation issues a 4-digit OTP
    let order = lifecycle
        .update_status(order.id, OrderStatus::Confirmed)
        .await
        .unwrap();
    let otp = order.otp.clone().unwrap();
    assert_eq!(otp.len(), 4);
    assert!(otp.parse::<u32>().unwrap() >= 1000);

    // Assignment and preparation
    let order = lifecycle.assign_courier(order.id, courier.id).await.unwrap();
    assert_eq!(order.assigned_courier, Some(courier.id));

    lifecycle
        .update_status(order.id, OrderStatus::Preparing)
        .await
        .unwrap();
    let order = lifecycle
        .update_status(order.id, OrderStatus::Ready)
        .await
        .unwrap();
    assert_eq!(order.otp.as_deref(), Some(otp.as_str()));

    // Courier sees the task
    let tasks = lifecycle.orders_for_courier(courier.id).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, order.id);

    // Wrong code is rejected and changes nothing
    let err = lifecycle.verify_delivery(order.id, "0000").await.unwrap_err();
    assert!(matches!(err, OrderError::InvalidOtp));
    let unchanged = lifecycle.get_order(order.id).await.unwrap();
    assert_eq!(unchanged.status, OrderStatus::Ready);

    // Right code completes the delivery
    let order = lifecycle.verify_delivery(order.id, &otp).await.unwrap();
    assert_eq!(order.status, OrderStatus::Delivered);

    // Terminal: no further transitions
    let err = lifecycle
        .update_status(order.id, OrderStatus::Cancelled)
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::InvalidTransition { .. }));
}

#[tokio::test]
async fn admin_account_is_seeded_at_startup() {
    let state = test_state().await;

    let admin = AdminUserRepository::new(state.db.clone())
        .find_by_username(&state.config.admin_username)
        .await
        .unwrap()
        .expect("seeded admin missing");

    assert!(admin.is_active);
    assert!(admin
        .verify_password(&state.config.admin_password)
        .unwrap());
    assert!(!admin.verify_password("wrong-password").unwrap());
}

#[tokio::test]
async fn order_listing_is_newest_first() {
    let state = test_state().await;
    let lifecycle = state.lifecycle();

    let first = lifecycle.create_order(delivery_draft("One")).await.unwrap();
    let second = lifecycle.create_order(delivery_draft("Two")).await.unwrap();
    let third = lifecycle.create_order(delivery_draft("Three")).await.unwrap();

    let orders = lifecycle.list_orders().await.unwrap();
    let ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
    assert_eq!(ids, vec![third.id, second.id, first.id]);
}

#[tokio::test]
async fn courier_login_credentials_round_trip() {
    let state = test_state().await;
    let repo = CourierRepository::new(state.db.clone());

    let created = repo.create(courier_create("meena")).await.unwrap();
    let found = repo
        .find_by_username("meena")
        .await
        .unwrap()
        .expect("courier missing");

    assert_eq!(found.id, created.id);
    assert!(found.verify_password("wheels42").unwrap());
    assert!(!found.verify_password("wheels43").unwrap());
}
