//! Outbound email for the password reset flow.

use email_address::EmailAddress;

use crate::{Error, models::ResetCode};

/// Delivers transactional email on behalf of the API.
///
/// The reset flow is the only part of the application that sends mail, so the
/// trait has a single operation.
pub trait Mailer {
    /// Send `code` to `to` so that the owner of the mailbox can reset their
    /// password.
    ///
    /// # Errors
    /// This function will return a [Error::EmailDeliveryError] if the message
    /// could not be handed off for delivery.
    fn send_reset_code(&self, to: &EmailAddress, name: &str, code: &ResetCode)
    -> Result<(), Error>;
}

/// A [Mailer] that writes messages to the application log instead of sending
/// real email.
///
/// Intended for local development and testing where no mail credentials are
/// available. The plaintext reset code appears in the log.
#[derive(Debug, Clone, Default)]
pub struct TracingMailer;

impl Mailer for TracingMailer {
    fn send_reset_code(
        &self,
        to: &EmailAddress,
        name: &str,
        code: &ResetCode,
    ) -> Result<(), Error> {
        tracing::info!("password reset code for {name} <{to}>: {}", code.as_str());

        Ok(())
    }
}

#[cfg(test)]
mod tracing_mailer_tests {
    use email_address::EmailAddress;

    use crate::models::ResetCode;

    use super::{Mailer, TracingMailer};

    #[test]
    fn send_reset_code_succeeds() {
        let mailer = TracingMailer;
        let email = "test@example.com"
            .parse::<EmailAddress>()
            .expect("Could not parse email address.");
        let code = ResetCode::generate();

        let result = mailer.send_reset_code(&email, "Test User", &code);

        assert!(result.is_ok(), "want Ok, got {result:?}");
    }
}
