//! Auth domain actions
//!
//! One file per action. Actions hold the flow logic; storage and token
//! mechanics live in the models and services they call.

pub mod login;
pub mod permissions;
pub mod request_reset;
pub mod signup;
pub mod switch_role;
pub mod verify_reset;

pub use login::{login, LoginOutcome};
pub use permissions::{grant_permission, revoke_permission};
pub use request_reset::request_reset;
pub use signup::signup;
pub use switch_role::switch_role;
pub use verify_reset::verify_reset;
