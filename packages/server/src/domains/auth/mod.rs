//! Auth domain - credential issuance, verification, and recovery
//!
//! Responsibilities:
//! - Signed session tokens and their verification
//! - Password hashing and the login/signup/role-switch actions
//! - SMS one-time-password recovery flow
//! - User records and the in-process credential store

pub mod actions;
pub mod jwt;
pub mod models;
pub mod password;
pub mod roles;

pub use jwt::{Claims, JwtService, TokenError};
pub use roles::derive_active_role;
