// Copyright (c) 2026 rezky_nightky

use std::io::{Result, Write};

use crossterm::style::Color;

use crate::cell::Cell;
use crate::entity::Position;
use crate::frame::Frame;
use crate::game::Game;

pub const BUCKET_TOP: &str = "\\       /";
pub const BUCKET_BOTTOM: &str = " \\_____/ ";

const GAME_OVER_BANNER: [&str; 6] = [
    " ██████╗  █████╗ ███╗   ███╗███████╗   █████╗ ██╗   ██╗███████╗██████╗ ",
    "██╔════╝ ██╔══██╗████╗ ████║██╔════╝  ██╔══██╗██║   ██║██╔════╝██╔══██╗",
    "██║  ██╗ ███████║██╔████╔██║█████╗    ██║  ██║╚██╗ ██╔╝█████╗  ██████╔╝",
    "██║  ╚██╗██╔══██║██║╚██╔╝██║██╔══╝    ██║  ██║ ╚████╔╝ ██╔══╝  ██╔══██╗",
    "╚██████╔╝██║  ██║██║ ╚═╝ ██║███████╗  ╚█████╔╝  ╚██╔╝  ███████╗██║  ██║",
    " ╚═════╝ ╚═╝  ╚═╝╚═╝     ╚═╝╚══════╝   ╚════╝    ╚═╝   ╚══════╝╚═╝  ╚═╝",
];

const GAME_OVER_ASCII: [&str; 1] = ["G A M E   O V E R"];

/// Where finished frames go. The terminal is one implementation; tests use
/// [`MemoryDisplay`].
pub trait Display {
    fn present(&mut self, frame: &Frame) -> Result<()>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Glyphs {
    pub snowflake: char,
    pub color: bool,
}

impl Glyphs {
    pub fn new(ascii: bool, color: bool) -> Self {
        Self {
            snowflake: if ascii { '*' } else { '❄' },
            color,
        }
    }

    fn tint(&self, color: Color) -> Option<Color> {
        self.color.then_some(color)
    }
}

fn to_xy(pos: Position) -> Option<(u16, u16)> {
    let x = u16::try_from(pos.col.checked_sub(1)?).ok()?;
    let y = u16::try_from(pos.row.checked_sub(1)?).ok()?;
    Some((x, y))
}

/// Redraws the whole scene: bucket, snowflakes, score, lives and, when
/// open, the command prompt under the lives line.
pub fn draw_scene(frame: &mut Frame, game: &Game, glyphs: &Glyphs, command: Option<&str>) {
    frame.clear();

    let bucket_cell = Cell::styled(' ', glyphs.tint(game.bucket.color));
    if let Some((x, y)) = to_xy(game.bucket.pos) {
        frame.put_str(x, y, BUCKET_TOP, bucket_cell);
        if let Some(below) = y.checked_add(1) {
            frame.put_str(x, below, BUCKET_BOTTOM, bucket_cell);
        }
    }

    for flake in &game.snowflakes {
        if let Some((x, y)) = to_xy(flake.pos) {
            frame.set(x, y, Cell::styled(glyphs.snowflake, glyphs.tint(flake.color)));
        }
    }

    frame.put_str(0, 0, &format!("Points: {}", game.points), Cell::BLANK);
    frame.put_str(0, 1, &format!("Lives: {}", game.lives), Cell::BLANK);

    if let Some(line) = command {
        frame.put_str(0, 2, &format!("> {}", line), Cell::BLANK);
    }
}

pub fn write_game_over<W: Write>(
    out: &mut W,
    points: u32,
    ascii: bool,
    color: bool,
) -> Result<()> {
    let banner: &[&str] = if ascii {
        &GAME_OVER_ASCII
    } else {
        &GAME_OVER_BANNER
    };

    writeln!(out)?;
    if color {
        write!(out, "\x1b[1;31m")?;
    }
    for line in banner {
        writeln!(out, "{}", line)?;
    }
    if color {
        write!(out, "\x1b[0m")?;
    }
    writeln!(out)?;
    writeln!(out, "{:>30}Score: {}", "", points)?;
    out.flush()
}

/// Keeps the most recent frame in memory.
#[cfg(test)]
#[derive(Clone, Debug, Default)]
pub struct MemoryDisplay {
    pub last: Option<Frame>,
    pub presented: usize,
}

#[cfg(test)]
impl Display for MemoryDisplay {
    fn present(&mut self, frame: &Frame) -> Result<()> {
        self.last = Some(frame.clone());
        self.presented += 1;
        Ok(())
    }
}
