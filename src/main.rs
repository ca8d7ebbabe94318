// Copyright (c) 2026 rezky_nightky

mod cell;
mod config;
mod entity;
mod frame;
mod game;
mod input;
mod render;
mod runtime;
mod scheduler;
mod session;
mod terminal;
mod trace;

use std::io::stdout;

#[cfg(unix)]
use std::thread;

use clap::builder::styling::{AnsiColor as ClapAnsiColor, Color as ClapColor};
use clap::builder::styling::{Effects as ClapEffects, Style as ClapStyle};
use clap::builder::Styles as ClapStyles;
use clap::{CommandFactory, FromArgMatches};
use rand::{rngs::StdRng, SeedableRng};

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

use crate::config::{color_disabled_by_env, color_enabled_stdout, Args, CONTROLS_HELP};
use crate::game::Game;
use crate::render::{write_game_over, Glyphs};
use crate::runtime::ReadMode;
use crate::session::Session;
use crate::terminal::{check_size, restore_terminal_best_effort, Keyboard, Terminal};
use crate::trace::Trace;

const HELP_TEMPLATE_PLAIN: &str = "\
{before-help}{about-with-newline}
USAGE:
  {usage}

{all-args}{after-help}";

const HELP_TEMPLATE_COLOR: &str = "\
{before-help}{about-with-newline}
\x1b[1;36mUSAGE:\x1b[0m
  {usage}

{all-args}{after-help}";

fn build_info() -> &'static str {
    env!("SNOWCATCH_BUILD")
}

fn git_sha() -> &'static str {
    env!("SNOWCATCH_GIT_SHA")
}

fn clap_styles() -> ClapStyles {
    ClapStyles::styled()
        .header(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Cyan))),
        )
        .usage(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Green))),
        )
        .literal(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Yellow))))
        .placeholder(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Magenta))))
}

fn parse_args() -> Args {
    let mut cmd = Args::command();
    cmd = cmd.styles(clap_styles());
    cmd = cmd.about(env!("CARGO_PKG_DESCRIPTION"));
    cmd = cmd.after_help(CONTROLS_HELP);
    let help_template = if color_enabled_stdout() {
        HELP_TEMPLATE_COLOR
    } else {
        HELP_TEMPLATE_PLAIN
    };
    cmd = cmd.help_template(help_template);
    cmd.build();

    if cmd.get_arguments().any(|a| a.get_id().as_str() == "help") {
        cmd = cmd.mut_arg("help", |a| a.help_heading("HELP"));
    }
    cmd.build();

    let matches = cmd.get_matches();
    Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
}

fn main() -> std::io::Result<()> {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal_best_effort();
        eprintln!("{}", info);
    }));

    #[cfg(unix)]
    {
        if let Ok(mut signals) = Signals::new([SIGINT, SIGTERM, SIGHUP]) {
            thread::spawn(move || {
                if let Some(sig) = signals.forever().next() {
                    restore_terminal_best_effort();
                    std::process::exit(128 + sig);
                }
            });
        }
    }

    #[cfg(windows)]
    {
        if let Err(e) = ctrlc::set_handler(|| {
            restore_terminal_best_effort();
            std::process::exit(130);
        }) {
            eprintln!("failed to install Ctrl-C handler: {}", e);
        }
    }

    let args = parse_args();

    if args.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if args.info {
        println!("Version: v{}", env!("CARGO_PKG_VERSION"));
        println!("Build: {}", build_info());
        if !git_sha().is_empty() {
            println!("Commit: {}", git_sha());
        }
        println!("Copyright: (c) 2026 {}", env!("CARGO_PKG_AUTHORS"));
        println!("License: {}", env!("CARGO_PKG_LICENSE"));
        return Ok(());
    }

    let ascii = args.use_ascii();
    let read_mode = if args.blocking {
        ReadMode::Blocking
    } else {
        ReadMode::Background
    };
    let mut trace = Trace::from_mode(args.trace);
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut term = Terminal::new()?;
    let (w, h) = term.size()?;
    if let Err(msg) = check_size(w, h) {
        drop(term);
        eprintln!("{}", msg);
        std::process::exit(1);
    }
    trace.line(format_args!(
        "terminal [{}x{}] mode [{}] seed [{}]",
        w,
        h,
        read_mode.label(),
        args.seed.map(|s| s.to_string()).unwrap_or_else(|| "random".to_string()),
    ));

    let glyphs = Glyphs::new(ascii, !color_disabled_by_env());
    let mut session = Session::new(Game::new(rng), (w, h), glyphs, read_mode, trace);
    session.run(&mut Keyboard, &mut term)?;

    drop(term);
    write_game_over(
        &mut stdout(),
        session.game.points,
        ascii,
        color_enabled_stdout(),
    )
}
