//! Recovery request action

use tokio::time::timeout;
use tracing::{error, info};

use crate::common::auth::AuthError;
use crate::domains::auth::models::otp::{generate_code, OTP_TTL_MINUTES};
use crate::kernel::ServerDeps;

/// Begin password recovery: mint a one-time code and text it to the user.
///
/// If SMS dispatch fails or times out, the pending code is rolled back
/// before the error surfaces, so a retry always mints a fresh code and no
/// dangling state the user never received blocks the flow.
pub async fn request_reset(email: &str, deps: &ServerDeps) -> Result<(), AuthError> {
    let email = email.trim().to_lowercase();

    let Some(user) = deps.users.find_by_email(&email).await else {
        return Err(AuthError::NotFound);
    };
    let Some(phone_number) = user.phone_number.clone() else {
        return Err(AuthError::NoPhoneNumber);
    };

    let code = generate_code();
    deps.otps.issue(&user.user_id, &code).await;

    // The code goes into the message body and nowhere else.
    let message = format!(
        "Your Town Market recovery code is {}. It expires in {} minutes.",
        code, OTP_TTL_MINUTES
    );

    match timeout(deps.sms_timeout, deps.sms.send(&phone_number, &message)).await {
        Ok(Ok(())) => {
            info!(user_id = %user.user_id, "recovery code sent");
            Ok(())
        }
        Ok(Err(e)) => {
            error!(user_id = %user.user_id, error = %e, "recovery SMS failed, rolling back code");
            deps.otps.discard(&user.user_id).await;
            Err(AuthError::DeliveryFailure)
        }
        Err(_) => {
            error!(user_id = %user.user_id, "recovery SMS timed out, rolling back code");
            deps.otps.discard(&user.user_id).await;
            Err(AuthError::DeliveryFailure)
        }
    }
}
