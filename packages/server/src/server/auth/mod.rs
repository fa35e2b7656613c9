// Session cache and credential resolution

pub mod resolver;
pub mod session;

pub use resolver::{resolve, RequestCredentials, ResolvedCredential};
pub use session::{CredentialSource, SessionCache, SessionEntry};
