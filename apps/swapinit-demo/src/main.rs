//! swapinit demo
//!
//! Creates a Vulkan instance, picks the first physical device, opens a small
//! window, creates a surface for it and reports which queue families render
//! and present. Exits as soon as that is known.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p swapinit-demo -- [OPTIONS]
//! ```
//!
//! ## Options
//!
//! - `--validation`: Enable the validation layer and debug messenger
//! - `--no-validation`: Disable both
//! - `--width <N>`: Window width (default: 64)
//! - `--height <N>`: Window height (default: 64)
//! - `-h, --help`: Print help message
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: Set log level (e.g., info, debug, trace)

use anyhow::{bail, Context};
use swapinit_app::{run_app, AppConfig};

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Help,
    Run(AppConfig),
}

fn main() -> anyhow::Result<()> {
    match parse_args(std::env::args().skip(1))? {
        Command::Help => print_help(),
        Command::Run(config) => {
            let report = run_app(config)?;
            println!("{report}");
        }
    }
    Ok(())
}

fn parse_args<I>(args: I) -> anyhow::Result<Command>
where
    I: IntoIterator<Item = String>,
{
    let mut config = AppConfig::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "--validation" => {
                config = config.with_validation(true).with_debug_messenger(true);
            }
            "--no-validation" => {
                config = config.with_validation(false).with_debug_messenger(false);
            }
            "--width" => config.width = parse_dimension(&arg, args.next())?,
            "--height" => config.height = parse_dimension(&arg, args.next())?,
            other => bail!("Unknown option: {other} (see --help)"),
        }
    }

    Ok(Command::Run(config))
}

fn parse_dimension(flag: &str, value: Option<String>) -> anyhow::Result<u32> {
    let value = value.with_context(|| format!("{flag} needs a value"))?;
    let parsed: u32 = value
        .parse()
        .with_context(|| format!("Invalid value for {flag}: {value}"))?;
    if parsed == 0 {
        bail!("{flag} must be greater than zero");
    }
    Ok(parsed)
}

fn print_help() {
    eprintln!(
        "swapinit demo: Vulkan instance, window and surface setup

USAGE:
    cargo run -p swapinit-demo -- [OPTIONS]

OPTIONS:
    --validation            Enable the validation layer and debug messenger
    --no-validation         Disable the validation layer and debug messenger
                            Default: enabled in debug builds only
    --width <N>             Window width (default: 64)
    --height <N>            Window height (default: 64)
    -h, --help              Print this help message

ENVIRONMENT VARIABLES:
    RUST_LOG                Set log level (e.g., info, debug, trace)"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> anyhow::Result<Command> {
        parse_args(args.iter().map(|s| (*s).to_string()))
    }

    #[test]
    fn no_arguments_uses_defaults() {
        assert_eq!(parse(&[]).unwrap(), Command::Run(AppConfig::default()));
    }

    #[test]
    fn help_wins() {
        assert_eq!(parse(&["--width", "10", "--help"]).unwrap(), Command::Help);
        assert_eq!(parse(&["-h"]).unwrap(), Command::Help);
    }

    #[test]
    fn validation_flags_toggle_both_settings() {
        let Command::Run(config) = parse(&["--no-validation"]).unwrap() else {
            panic!("expected run");
        };
        assert!(!config.validation);
        assert!(!config.debug_messenger);

        let Command::Run(config) = parse(&["--no-validation", "--validation"]).unwrap() else {
            panic!("expected run");
        };
        assert!(config.validation);
        assert!(config.debug_messenger);
    }

    #[test]
    fn window_size_flags() {
        let Command::Run(config) = parse(&["--width", "320", "--height", "200"]).unwrap() else {
            panic!("expected run");
        };
        assert_eq!((config.width, config.height), (320, 200));
    }

    #[test]
    fn bad_arguments_are_rejected() {
        assert!(parse(&["--width"]).is_err());
        assert!(parse(&["--width", "wide"]).is_err());
        assert!(parse(&["--height", "0"]).is_err());
        assert!(parse(&["--frames", "3"]).is_err());
    }
}
