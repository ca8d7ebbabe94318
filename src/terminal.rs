// Copyright (c) 2026 rezky_nightky

use std::io::{stdout, Result, Stdout, Write};
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal, ExecutableCommand, QueueableCommand,
};

use crate::frame::Frame;
use crate::input::{InputSource, Key};
use crate::render::Display;

pub const MIN_ROWS: u16 = 30;
pub const MIN_COLS: u16 = 50;

/// Fails when `(cols, rows)` cannot hold the playfield.
pub fn check_size(cols: u16, rows: u16) -> std::result::Result<(), String> {
    if rows < MIN_ROWS || cols < MIN_COLS {
        return Err(format!(
            "Terminal window must be at least {} by {} to run this game",
            MIN_ROWS, MIN_COLS
        ));
    }
    Ok(())
}

/// Raw mode plus alternate screen for as long as the value lives.
pub struct Terminal {
    stdout: Stdout,
}

impl Terminal {
    pub fn new() -> Result<Self> {
        let mut out = stdout();
        terminal::enable_raw_mode()?;
        let init_res: Result<()> = (|| {
            out.execute(terminal::EnterAlternateScreen)?;
            out.execute(cursor::Hide)?;
            let _ = out.execute(terminal::DisableLineWrap);
            out.execute(SetAttribute(Attribute::Reset))?;
            out.execute(ResetColor)?;
            out.execute(terminal::Clear(terminal::ClearType::All))?;
            out.flush()?;
            Ok(())
        })();
        if let Err(e) = init_res {
            restore_terminal_best_effort();
            return Err(e);
        }
        Ok(Self { stdout: out })
    }

    /// Returns `(cols, rows)`.
    pub fn size(&self) -> Result<(u16, u16)> {
        terminal::size()
    }

    pub fn draw(&mut self, frame: &Frame) -> Result<()> {
        let mut cur_fg: Option<Color> = None;
        let mut cur_bold = false;

        for y in 0..frame.height {
            self.stdout.queue(cursor::MoveTo(0, y))?;
            for x in 0..frame.width {
                let Some(cell) = frame.get(x, y) else {
                    continue;
                };

                if cell.fg != cur_fg {
                    self.stdout
                        .queue(SetForegroundColor(cell.fg.unwrap_or(Color::Reset)))?;
                    cur_fg = cell.fg;
                }

                if cell.bold != cur_bold {
                    self.stdout.queue(SetAttribute(if cell.bold {
                        Attribute::Bold
                    } else {
                        Attribute::NormalIntensity
                    }))?;
                    cur_bold = cell.bold;
                }

                self.stdout.queue(Print(cell.ch))?;
            }
        }

        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(ResetColor)?;
        self.stdout.flush()
    }
}

fn map_key(k: KeyEvent) -> Option<Key> {
    match (k.code, k.modifiers) {
        (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => Some(Key::Interrupt),
        (KeyCode::Char(c), _) => Some(Key::Char(c)),
        (KeyCode::Enter, _) => Some(Key::Enter),
        (KeyCode::Backspace, _) => Some(Key::Backspace),
        (KeyCode::Esc, _) => Some(Key::Esc),
        _ => None,
    }
}

/// Key reader over crossterm's global event queue. Only meaningful while a
/// [`Terminal`] holds raw mode.
pub struct Keyboard;

impl InputSource for Keyboard {
    fn next_key(&mut self, timeout: Option<Duration>) -> Result<Option<Key>> {
        loop {
            if let Some(t) = timeout {
                if !event::poll(t)? {
                    return Ok(None);
                }
            }
            if let Event::Key(k) = event::read()? {
                if k.kind == KeyEventKind::Press {
                    if let Some(key) = map_key(k) {
                        return Ok(Some(key));
                    }
                }
            }
            // With a deadline, any other event ends the wait.
            if timeout.is_some() {
                return Ok(None);
            }
        }
    }
}

impl Display for Terminal {
    fn present(&mut self, frame: &Frame) -> Result<()> {
        self.draw(frame)
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.stdout.execute(SetAttribute(Attribute::Reset));
        let _ = self.stdout.execute(ResetColor);
        let _ = self.stdout.execute(cursor::Show);
        let _ = self.stdout.execute(terminal::EnableLineWrap);
        let _ = self.stdout.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        let _ = self.stdout.flush();
    }
}

pub fn restore_terminal_best_effort() {
    let mut out = stdout();
    let _ = out.execute(SetAttribute(Attribute::Reset));
    let _ = out.execute(ResetColor);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::EnableLineWrap);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}
