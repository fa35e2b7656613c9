pub mod auth;
pub mod health;
pub mod users;

pub use auth::{
    grant_permission_handler, login_handler, logout_handler, recover_handler,
    recover_verify_handler, revoke_permission_handler, signup_handler, switch_role_handler,
    verify_token_handler,
};
pub use health::health_handler;
pub use users::user_profile_handler;
