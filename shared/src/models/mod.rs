//! Domain Models

pub mod admin_user;
pub mod courier;
pub mod gallery;
pub mod menu;
pub mod order;
