use clap::{Arg, Command};

pub const ARG_VALIDATOR_URL: &str = "validator-url";
pub const ARG_VALIDATOR_FAILOVER_URL: &str = "validator-failover-url";
pub const ARG_RESOURCE_NAME: &str = "resource-name";
pub const ARG_PARKING_RETRIES: &str = "parking-retries";
pub const ARG_PUSH_CONNECT_TIMEOUT: &str = "push-connect-timeout";
pub const ARG_PUSH_READ_TIMEOUT: &str = "push-read-timeout";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_VALIDATOR_URL)
                .long(ARG_VALIDATOR_URL)
                .help("Primary URL of the engine's token validator endpoint")
                .env("VARCO_VALIDATOR_URL")
                .required(true),
        )
        .arg(
            Arg::new(ARG_VALIDATOR_FAILOVER_URL)
                .long(ARG_VALIDATOR_FAILOVER_URL)
                .help("Failover validator URL, tried when the primary is unreachable")
                .env("VARCO_VALIDATOR_FAILOVER_URL"),
        )
        .arg(
            Arg::new(ARG_RESOURCE_NAME)
                .long(ARG_RESOURCE_NAME)
                .help("Resource name reported to the validator")
                .env("VARCO_RESOURCE_NAME"),
        )
        .arg(
            Arg::new(ARG_PARKING_RETRIES)
                .long(ARG_PARKING_RETRIES)
                .help("Extra polls after the parking service drops the connection")
                .env("VARCO_PARKING_RETRIES")
                .default_value("1")
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new(ARG_PUSH_CONNECT_TIMEOUT)
                .long(ARG_PUSH_CONNECT_TIMEOUT)
                .help("Connect timeout in seconds for push-related calls")
                .env("VARCO_PUSH_CONNECT_TIMEOUT")
                .default_value("10")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_PUSH_READ_TIMEOUT)
                .long(ARG_PUSH_READ_TIMEOUT)
                .help("Read timeout in seconds, sized for the push approval wait")
                .env("VARCO_PUSH_READ_TIMEOUT")
                .default_value("60")
                .value_parser(clap::value_parser!(u64)),
        )
}
