// Infrastructure: dependency container, service traits, test doubles

pub mod deps;
pub mod test_dependencies;
pub mod traits;

pub use deps::{ServerDeps, TwilioSmsAdapter};
pub use test_dependencies::MockSms;
pub use traits::BaseSms;
