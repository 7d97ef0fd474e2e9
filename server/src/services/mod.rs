//! Service Layer
//!
//! Long-lived services held by `ServerState`.

pub mod whatsapp;

pub use whatsapp::{HttpGatewayTransport, MessageTransport, WhatsAppService};
