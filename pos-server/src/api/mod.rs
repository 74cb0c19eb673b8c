//! API route handlers
//!
//! # Structure
//!
//! - [`health`] - liveness check
//! - [`auth`] - login and session info
//! - [`menu_items`] - menu catalog management
//! - [`users`] - user management
//! - [`orders`] - order lifecycle

pub mod auth;
pub mod health;
pub mod menu_items;
pub mod orders;
pub mod users;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};
