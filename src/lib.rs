//! # Varco (Multi-Factor Authentication Gateway)
//!
//! `varco` authenticates end users against a third-party MFA backend and
//! exposes the result, plus each user's authenticator inventory, over a small
//! HTTP API.
//!
//! ## Backend integration
//!
//! The backend is reached two ways: a validator endpoint for the native
//! authentication engine (password, grid, OTP, and the two-phase push
//! protocol) and a cookie-authenticated XML/SOAP management service for the
//! authenticator inventory.
//!
//! - **Session:** [`backend::SessionManager`] owns the single logical
//!   session. Cookies are replaced wholesale on each connect and a periodic
//!   keep-alive pings and reconnects with bounded retries.
//! - **Push:** [`push::PushCoordinator`] drives the challenge/response
//!   protocol against the parking service, including its relative-redirect
//!   and retry-after-drop quirks. In challenge-response mode the pending
//!   request's URL round-trips through the caller as base64 opaque state.
//! - **Inventory:** [`inventory::Inventory`] keeps an encrypted on-disk
//!   snapshot of every authenticator and serves per-user presentation
//!   options from an in-memory index, so the gateway answers even while the
//!   backend is briefly unreachable.
//!
//! Backend hiccups never surface as raw errors: every public operation
//! returns a concrete result or a well-defined unavailable/unresolved
//! outcome.

pub mod api;
pub mod backend;
pub mod cli;
pub mod crypto;
pub mod engine;
pub mod inventory;
pub mod push;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        // Should be a hex string (full SHA-1 is 40 chars, but could be short)
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
