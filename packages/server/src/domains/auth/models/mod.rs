pub mod otp;
pub mod user;

pub use otp::{OtpRecord, OtpStore, OtpVerification};
pub use user::{UserRecord, UserStore};
