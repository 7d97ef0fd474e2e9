//! Server State
//!
//! `ServerState` holds shared references to every long-lived component:
//! configuration, the storage engine and the notification service. Cloning
//! is cheap (everything is `Arc` internally), so handlers receive a clone
//! via axum's `State` extractor.

use std::sync::Arc;

use crate::core::Config;
use crate::db::Db;
use crate::orders::OrderLifecycle;
use crate::services::{HttpGatewayTransport, WhatsAppService};

#[derive(Clone, Debug)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Storage engine
    pub db: Db,
    /// WhatsApp notification service
    pub whatsapp: WhatsAppService,
}

impl ServerState {
    /// Initialize the server state.
    ///
    /// Order of initialization:
    /// 1. storage engine
    /// 2. seeded admin account (credentials from config, hash stored)
    /// 3. notification service (disconnected when no gateway is configured)
    ///
    /// # Panics
    ///
    /// Panics when the admin account cannot be seeded; the back office
    /// would be unreachable, so refusing to start is the right failure.
    pub async fn initialize(config: &Config) -> Self {
        let db = Db::new();

        db.seed_default_admin(&config.admin_username, &config.admin_password)
            .await
            .expect("Failed to seed default admin account");

        let whatsapp = match &config.whatsapp_gateway_url {
            Some(url) => WhatsAppService::new(Arc::new(HttpGatewayTransport::new(url.clone()))),
            None => WhatsAppService::disconnected(),
        };

        Self {
            config: config.clone(),
            db,
            whatsapp,
        }
    }

    /// Start background tasks. Must be called before serving requests.
    ///
    /// Currently only the WhatsApp session handshake; the server does not
    /// wait for it; readiness is a property of the notification service,
    /// not of the HTTP surface.
    pub fn start_background_tasks(&self) {
        self.whatsapp.start_handshake();
    }

    /// Order lifecycle service over this state's storage and notifier.
    pub fn lifecycle(&self) -> OrderLifecycle {
        OrderLifecycle::new(self.db.clone(), self.whatsapp.clone())
    }
}
