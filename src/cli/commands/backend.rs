use clap::{Arg, Command};

pub const ARG_BACKEND_URL: &str = "backend-url";
pub const ARG_OPERATOR_EMAIL: &str = "operator-email";
pub const ARG_OPERATOR_OTP: &str = "operator-otp";
pub const ARG_ENCRYPTION_KEY: &str = "encryption-key";
pub const ARG_ORGANIZATION: &str = "organization";
pub const ARG_REQUEST_TIMEOUT: &str = "request-timeout";
pub const ARG_PING_INTERVAL: &str = "ping-interval";
pub const ARG_PING_RETRIES: &str = "ping-retries";
pub const ARG_PING_TIMEOUT: &str = "ping-timeout";
pub const ARG_PING_METHOD: &str = "ping-method";
pub const ARG_SYNC_INTERVAL: &str = "sync-interval";
pub const ARG_PAGE_SIZE: &str = "page-size";
pub const ARG_STORAGE_FILE: &str = "storage-file";
pub const ARG_LOCKOUT_MAX_ATTEMPTS: &str = "lockout-max-attempts";
pub const ARG_OPTIONS_MAP: &str = "options-map";
pub const ARG_DEFAULT_OPTION: &str = "default-option";

const DEFAULT_OPTIONS_MAP: &str =
    r#"{"mobilepass":["push","code"],"etoken":["code"],"gold":["grid","code"],"sms":["sms"]}"#;

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_BACKEND_URL)
                .long(ARG_BACKEND_URL)
                .help("Management backend base URL, example: https://backend.tld/console/service.asmx")
                .env("VARCO_BACKEND_URL")
                .required(true),
        )
        .arg(
            Arg::new(ARG_OPERATOR_EMAIL)
                .long(ARG_OPERATOR_EMAIL)
                .help("Operator email, encrypted with the encryption key (IV:ciphertext)")
                .env("VARCO_OPERATOR_EMAIL")
                .required(true),
        )
        .arg(
            Arg::new(ARG_OPERATOR_OTP)
                .long(ARG_OPERATOR_OTP)
                .help("Operator OTP or password, encrypted with the encryption key (IV:ciphertext)")
                .env("VARCO_OPERATOR_OTP")
                .required(true),
        )
        .arg(
            Arg::new(ARG_ENCRYPTION_KEY)
                .long(ARG_ENCRYPTION_KEY)
                .help("Base64 256-bit key protecting credentials and the inventory cache")
                .env("VARCO_ENCRYPTION_KEY")
                .required(true),
        )
        .arg(
            Arg::new(ARG_ORGANIZATION)
                .long(ARG_ORGANIZATION)
                .help("Default virtual server (organization) for backend queries")
                .env("VARCO_ORGANIZATION"),
        )
        .arg(
            Arg::new(ARG_REQUEST_TIMEOUT)
                .long(ARG_REQUEST_TIMEOUT)
                .help("Timeout in seconds for backend requests")
                .env("VARCO_REQUEST_TIMEOUT")
                .default_value("30")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_PING_INTERVAL)
                .long(ARG_PING_INTERVAL)
                .help("Seconds between keep-alive cycles")
                .env("VARCO_PING_INTERVAL")
                .default_value("300")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_PING_RETRIES)
                .long(ARG_PING_RETRIES)
                .help("Ping/reconnect attempts per keep-alive cycle")
                .env("VARCO_PING_RETRIES")
                .default_value("3")
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new(ARG_PING_TIMEOUT)
                .long(ARG_PING_TIMEOUT)
                .help("Timeout in seconds for a single ping")
                .env("VARCO_PING_TIMEOUT")
                .default_value("10")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_PING_METHOD)
                .long(ARG_PING_METHOD)
                .help("HTTP method for the liveness check")
                .env("VARCO_PING_METHOD")
                .default_value("get")
                .value_parser(["get", "post"]),
        )
        .arg(
            Arg::new(ARG_SYNC_INTERVAL)
                .long(ARG_SYNC_INTERVAL)
                .help("Seconds between full inventory synchronizations")
                .env("VARCO_SYNC_INTERVAL")
                .default_value("3600")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_PAGE_SIZE)
                .long(ARG_PAGE_SIZE)
                .help("Records per page when fetching the inventory")
                .env("VARCO_PAGE_SIZE")
                .default_value("100")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new(ARG_STORAGE_FILE)
                .long(ARG_STORAGE_FILE)
                .help("Path of the encrypted inventory cache file")
                .env("VARCO_STORAGE_FILE")
                .default_value("tokens.enc"),
        )
        .arg(
            Arg::new(ARG_LOCKOUT_MAX_ATTEMPTS)
                .long(ARG_LOCKOUT_MAX_ATTEMPTS)
                .help("Maximum failed attempts before an account locks out")
                .env("VARCO_LOCKOUT_MAX_ATTEMPTS")
                .default_value("3")
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new(ARG_OPTIONS_MAP)
                .long(ARG_OPTIONS_MAP)
                .help("JSON map of token type to presentation options")
                .env("VARCO_OPTIONS_MAP")
                .default_value(DEFAULT_OPTIONS_MAP),
        )
        .arg(
            Arg::new(ARG_DEFAULT_OPTION)
                .long(ARG_DEFAULT_OPTION)
                .help("Presentation option for unrecognized token types")
                .env("VARCO_DEFAULT_OPTION")
                .default_value("code"),
        )
}
