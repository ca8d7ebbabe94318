// Copyright (c) 2026 rezky_nightky

use std::io::IsTerminal;

use clap::Parser;

pub const CONTROLS_HELP: &str = "\
CONTROLS:
  a / d      Move the bucket left / right
  b          Toggle blocking input (one tick per key press)
  o          Open the command line (Enter submits, Esc cancels)
  q          Quit

COMMANDS:
  blocking   Switch to blocking input
  background Switch back to timed ticks";

pub fn color_disabled_by_env() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return true;
    }
    matches!(std::env::var("CLICOLOR").ok().as_deref(), Some("0"))
}

pub fn color_enabled_stdout() -> bool {
    !color_disabled_by_env() && std::io::stdout().is_terminal()
}

pub fn default_to_ascii() -> bool {
    let lang = std::env::var("LANG").unwrap_or_default();
    !lang.to_ascii_uppercase().contains("UTF")
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceMode {
    /// Trace only when stderr is redirected away from the terminal.
    #[value(name = "auto")]
    Auto,
    #[value(name = "on")]
    On,
    #[value(name = "off")]
    Off,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "snowcatch", version, disable_version_flag = true)]
pub struct Args {
    #[arg(
        long = "seed",
        help_heading = "GENERAL",
        help = "Seed for snowflake placement (default: random)"
    )]
    pub seed: Option<u64>,

    #[arg(
        long = "blocking",
        help_heading = "GENERAL",
        help = "Start in blocking input mode"
    )]
    pub blocking: bool,

    #[arg(
        long = "ascii",
        help_heading = "APPEARANCE",
        help = "Draw snowflakes as '*' (default when LANG is not UTF-8)"
    )]
    pub ascii: bool,

    #[arg(
        long = "trace",
        default_value_t = TraceMode::Auto,
        value_enum,
        help_heading = "DIAGNOSTICS",
        help = "Diagnostic lines on stderr (auto, on, off)"
    )]
    pub trace: TraceMode,

    #[arg(
        long = "info",
        short = 'i',
        help_heading = "HELP",
        help = "Print version info and exit"
    )]
    pub info: bool,

    #[arg(
        long = "version",
        short = 'v',
        help_heading = "HELP",
        help = "Print version and exit"
    )]
    pub version: bool,
}

impl Args {
    pub fn use_ascii(&self) -> bool {
        self.ascii || default_to_ascii()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["snowcatch"]).unwrap();
        assert_eq!(args.seed, None);
        assert!(!args.blocking);
        assert_eq!(args.trace, TraceMode::Auto);
    }

    #[test]
    fn parses_flags() {
        let args =
            Args::try_parse_from(["snowcatch", "--seed", "9", "--blocking", "--trace", "on"])
                .unwrap();
        assert_eq!(args.seed, Some(9));
        assert!(args.blocking);
        assert_eq!(args.trace, TraceMode::On);
    }

    #[test]
    fn rejects_bad_trace_mode() {
        assert!(Args::try_parse_from(["snowcatch", "--trace", "loud"]).is_err());
    }
}
