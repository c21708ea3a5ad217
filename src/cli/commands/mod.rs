pub mod backend;
pub mod logging;
pub mod push;

use clap::{
    ColorChoice, Command,
    builder::styling::{AnsiColor, Effects, Styles},
};

/// Cross-argument validation that clap cannot express declaratively.
///
/// # Errors
/// Returns an error string if the backend URL is not an http(s) URL.
pub fn validate(matches: &clap::ArgMatches) -> Result<(), String> {
    let Some(url) = matches.get_one::<String>(backend::ARG_BACKEND_URL) else {
        return Ok(()); // Should be handled by required=true in clap
    };

    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(format!(
            "--{} must be an http(s) URL",
            backend::ARG_BACKEND_URL
        ));
    }

    Ok(())
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("varco")
        .about("Multi-factor authentication gateway")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            clap::Arg::new("port")
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("VARCO_PORT")
                .value_parser(clap::value_parser!(u16)),
        );

    let command = backend::with_args(command);
    let command = push::with_args(command);
    logging::with_args(command)
}
