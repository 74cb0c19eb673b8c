//! Authentication and authorization
//!
//! - [`jwt`] - bearer-token issuance and validation
//! - [`extractor`] - axum extractor re-fetching the user on every request
//! - [`policy`] - the role × operation permission table

pub mod extractor;
pub mod jwt;
pub mod policy;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
