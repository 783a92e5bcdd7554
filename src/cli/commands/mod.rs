pub mod account;
pub mod auth;
pub mod patient;

/// `✓ <message>` line printed after a successful mutation.
pub(crate) fn done(message: &str) -> String {
    format!("✓ {}", message)
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;
