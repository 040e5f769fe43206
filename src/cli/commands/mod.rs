pub mod auth0;
pub mod backend;
pub mod logging;

use clap::{
    Arg, ColorChoice, Command,
    builder::{
        PossibleValuesParser,
        styling::{AnsiColor, Effects, Styles},
    },
};

pub const ARG_PORT: &str = "port";
pub const ARG_ENVIRONMENT: &str = "environment";

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

    let command = Command::new("stellarcompass")
        .about("Stellar Compass web gateway")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("STELLAR_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_ENVIRONMENT)
                .long("environment")
                .help("Deployment environment, production marks session cookies Secure")
                .env("STELLAR_ENV")
                .default_value("development")
                .value_parser(PossibleValuesParser::new(["development", "production"])),
        );

    let command = auth0::with_args(command);
    let command = backend::with_args(command);
    logging::with_args(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use auth0::{ARG_AUTH0_CLIENT_ID, ARG_AUTH0_DOMAIN, ARG_SIGNUP_SETTLE_MS};
    use backend::{ARG_API_BASE_URL, ARG_UPSTREAM_TIMEOUT};

    const REQUIRED_ENV: [(&str, Option<&str>); 3] = [
        ("AUTH0_DOMAIN", Some("stellar.eu.auth0.com")),
        ("AUTH0_CLIENT_ID", Some("client-id")),
        ("API_BASE_URL", Some("http://localhost:8080")),
    ];

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "stellarcompass");
        assert_eq!(
            command.get_about().map(ToString::to_string),
            Some("Stellar Compass web gateway".to_string())
        );
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn test_check_args() {
        temp_env::with_vars_unset(
            [
                "AUTH0_DOMAIN",
                "AUTH0_CLIENT_ID",
                "API_BASE_URL",
                "STELLAR_PORT",
                "STELLAR_ENV",
                "STELLAR_SIGNUP_SETTLE_MS",
                "STELLAR_UPSTREAM_TIMEOUT_SECONDS",
            ],
            || {
                let matches = new().get_matches_from(vec![
                    "stellarcompass",
                    "--port",
                    "3000",
                    "--auth0-domain",
                    "stellar.eu.auth0.com",
                    "--auth0-client-id",
                    "client-id",
                    "--api-base-url",
                    "http://localhost:8080",
                    "--environment",
                    "production",
                    "--upstream-timeout-seconds",
                    "10",
                ]);

                assert_eq!(matches.get_one::<u16>(ARG_PORT).copied(), Some(3000));
                assert_eq!(
                    matches.get_one::<String>(ARG_AUTH0_DOMAIN).cloned(),
                    Some("stellar.eu.auth0.com".to_string())
                );
                assert_eq!(
                    matches.get_one::<String>(ARG_AUTH0_CLIENT_ID).cloned(),
                    Some("client-id".to_string())
                );
                assert_eq!(
                    matches.get_one::<String>(ARG_API_BASE_URL).cloned(),
                    Some("http://localhost:8080".to_string())
                );
                assert_eq!(
                    matches.get_one::<String>(ARG_ENVIRONMENT).cloned(),
                    Some("production".to_string())
                );
                assert_eq!(
                    matches.get_one::<u64>(ARG_SIGNUP_SETTLE_MS).copied(),
                    Some(2000)
                );
                assert_eq!(
                    matches.get_one::<u64>(ARG_UPSTREAM_TIMEOUT).copied(),
                    Some(10)
                );
            },
        );
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                REQUIRED_ENV[0],
                REQUIRED_ENV[1],
                REQUIRED_ENV[2],
                ("STELLAR_PORT", Some("443")),
                ("STELLAR_ENV", Some("development")),
                ("STELLAR_SIGNUP_SETTLE_MS", Some("0")),
                ("STELLAR_LOG_LEVEL", Some("info")),
            ],
            || {
                let matches = new().get_matches_from(vec!["stellarcompass"]);
                assert_eq!(matches.get_one::<u16>(ARG_PORT).copied(), Some(443));
                assert_eq!(
                    matches.get_one::<u64>(ARG_SIGNUP_SETTLE_MS).copied(),
                    Some(0)
                );
                assert_eq!(
                    matches.get_one::<String>(ARG_API_BASE_URL).cloned(),
                    Some("http://localhost:8080".to_string())
                );
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(2)
                );
            },
        );
    }

    #[test]
    fn test_missing_auth0_domain() {
        temp_env::with_vars(
            [
                ("AUTH0_DOMAIN", None),
                REQUIRED_ENV[1],
                REQUIRED_ENV[2],
            ],
            || {
                let result = new().try_get_matches_from(vec!["stellarcompass"]);
                assert!(result.is_err());
            },
        );
    }

    #[test]
    fn test_unknown_environment() {
        temp_env::with_vars(REQUIRED_ENV, || {
            let result = new().try_get_matches_from(vec![
                "stellarcompass",
                "--environment",
                "staging",
            ]);
            assert!(result.is_err());
        });
    }

    #[test]
    fn test_check_log_level_env() {
        let levels = ["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars(
                [
                    ("STELLAR_LOG_LEVEL", Some(level)),
                    REQUIRED_ENV[0],
                    REQUIRED_ENV[1],
                    REQUIRED_ENV[2],
                ],
                || {
                    let matches = new().get_matches_from(vec!["stellarcompass"]);
                    assert_eq!(
                        matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                        u8::try_from(index).ok()
                    );
                },
            );
        }
    }

    #[test]
    fn test_check_log_level_verbosity() {
        for index in 0..5_usize {
            temp_env::with_vars(
                [
                    ("STELLAR_LOG_LEVEL", None),
                    REQUIRED_ENV[0],
                    REQUIRED_ENV[1],
                    REQUIRED_ENV[2],
                ],
                || {
                    let mut args = vec!["stellarcompass".to_string()];

                    // Add the appropriate number of "-v" flags based on the index
                    if index > 0 {
                        args.push(format!("-{}", "v".repeat(index)));
                    }

                    let matches = new().get_matches_from(args);

                    assert_eq!(
                        matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                        u8::try_from(index).ok()
                    );
                },
            );
        }
    }
}
