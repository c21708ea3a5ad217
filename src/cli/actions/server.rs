use crate::{
    api,
    backend::keepalive::KeepAliveConfig,
    cli::globals::GlobalArgs,
    crypto,
    inventory::{OptionsMap, SyncConfig},
    push::PushConfig,
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::path::PathBuf;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub backend_url: String,
    pub operator_email: String,
    pub operator_otp: String,
    pub encryption_key: String,
    pub organization: Option<String>,
    pub request_timeout_secs: u64,
    pub ping_interval_secs: u64,
    pub ping_retries: u32,
    pub ping_timeout_secs: u64,
    pub ping_use_get: bool,
    pub sync_interval_secs: u64,
    pub page_size: usize,
    pub storage_file: String,
    pub lockout_max_attempts: u32,
    pub options_map: String,
    pub default_option: String,
    pub validator_url: String,
    pub validator_failover_url: Option<String>,
    pub resource_name: Option<String>,
    pub parking_retries: u32,
    pub push_connect_timeout_secs: u64,
    pub push_read_timeout_secs: u64,
}

/// Execute the server action.
///
/// # Errors
/// Returns an error if the configuration is unusable (bad key, undecryptable
/// credentials, invalid option mapping) or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    // Fail fast on settings with no safe default: a key that cannot decrypt
    // the operator credentials would otherwise fail on every connect.
    crypto::decrypt(&args.encryption_key, &args.operator_email)
        .context("Unable to decrypt operator email with the provided key")?;
    crypto::decrypt(&args.encryption_key, &args.operator_otp)
        .context("Unable to decrypt operator OTP with the provided key")?;

    let options = OptionsMap::from_json(&args.options_map, args.default_option.clone())
        .context("Invalid presentation-option mapping")?;

    let globals = GlobalArgs {
        backend_url: args.backend_url,
        operator_email: args.operator_email,
        operator_otp: args.operator_otp,
        encryption_key: SecretString::from(args.encryption_key),
        organization: args.organization.clone(),
        request_timeout_secs: args.request_timeout_secs,
    };

    let keep_alive = KeepAliveConfig {
        interval_secs: args.ping_interval_secs,
        max_retries: args.ping_retries,
        ping_timeout_secs: args.ping_timeout_secs,
        use_get: args.ping_use_get,
    };

    let push_config = PushConfig {
        validator_url: args.validator_url,
        failover_url: args.validator_failover_url,
        resource: args.resource_name,
        parking_retries: args.parking_retries,
        connect_timeout_secs: args.push_connect_timeout_secs,
        read_timeout_secs: args.push_read_timeout_secs,
    };

    let sync_config = SyncConfig {
        interval_secs: args.sync_interval_secs,
        page_size: args.page_size,
        organization: args.organization,
        max_lockout_attempts: args.lockout_max_attempts,
    };

    api::new(
        args.port,
        &globals,
        keep_alive,
        push_config,
        sync_config,
        options,
        PathBuf::from(args.storage_file),
    )
    .await
}
