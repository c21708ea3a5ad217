//! Command-line argument dispatch and server initialization.
//!
//! This module maps validated CLI arguments onto the typed server action.

use crate::cli::actions::{Action, server::Args};
use crate::cli::commands::{backend, push};
use anyhow::{Context, Result};

fn required(matches: &clap::ArgMatches, name: &str) -> Result<String> {
    matches
        .get_one::<String>(name)
        .cloned()
        .with_context(|| format!("missing required argument: --{name}"))
}

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    crate::cli::commands::validate(matches).map_err(|e| anyhow::anyhow!(e))?;

    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);

    Ok(Action::Server(Args {
        port,
        backend_url: required(matches, backend::ARG_BACKEND_URL)?,
        operator_email: required(matches, backend::ARG_OPERATOR_EMAIL)?,
        operator_otp: required(matches, backend::ARG_OPERATOR_OTP)?,
        encryption_key: required(matches, backend::ARG_ENCRYPTION_KEY)?,
        organization: matches.get_one::<String>(backend::ARG_ORGANIZATION).cloned(),
        request_timeout_secs: matches
            .get_one::<u64>(backend::ARG_REQUEST_TIMEOUT)
            .copied()
            .unwrap_or(30),
        ping_interval_secs: matches
            .get_one::<u64>(backend::ARG_PING_INTERVAL)
            .copied()
            .unwrap_or(300),
        ping_retries: matches
            .get_one::<u32>(backend::ARG_PING_RETRIES)
            .copied()
            .unwrap_or(3),
        ping_timeout_secs: matches
            .get_one::<u64>(backend::ARG_PING_TIMEOUT)
            .copied()
            .unwrap_or(10),
        ping_use_get: matches
            .get_one::<String>(backend::ARG_PING_METHOD)
            .is_none_or(|method| method == "get"),
        sync_interval_secs: matches
            .get_one::<u64>(backend::ARG_SYNC_INTERVAL)
            .copied()
            .unwrap_or(3600),
        page_size: matches
            .get_one::<usize>(backend::ARG_PAGE_SIZE)
            .copied()
            .unwrap_or(100),
        storage_file: required(matches, backend::ARG_STORAGE_FILE)?,
        lockout_max_attempts: matches
            .get_one::<u32>(backend::ARG_LOCKOUT_MAX_ATTEMPTS)
            .copied()
            .unwrap_or(3),
        options_map: required(matches, backend::ARG_OPTIONS_MAP)?,
        default_option: required(matches, backend::ARG_DEFAULT_OPTION)?,
        validator_url: required(matches, push::ARG_VALIDATOR_URL)?,
        validator_failover_url: matches
            .get_one::<String>(push::ARG_VALIDATOR_FAILOVER_URL)
            .cloned(),
        resource_name: matches.get_one::<String>(push::ARG_RESOURCE_NAME).cloned(),
        parking_retries: matches
            .get_one::<u32>(push::ARG_PARKING_RETRIES)
            .copied()
            .unwrap_or(1),
        push_connect_timeout_secs: matches
            .get_one::<u64>(push::ARG_PUSH_CONNECT_TIMEOUT)
            .copied()
            .unwrap_or(10),
        push_read_timeout_secs: matches
            .get_one::<u64>(push::ARG_PUSH_READ_TIMEOUT)
            .copied()
            .unwrap_or(60),
    }))
}
