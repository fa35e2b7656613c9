// Town Market - API Core
//
// This crate provides the authentication and authorization core for the
// community marketplace platform: credential resolution from the inbound
// carriers, signed session tokens, role/permission evaluation, and the
// SMS one-time-password recovery flow.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
