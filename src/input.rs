// Copyright (c) 2026 rezky_nightky

#[cfg(test)]
use std::collections::VecDeque;
use std::io::Result;
use std::time::Duration;

use crate::entity::Steer;

pub const LEFT_CHAR: char = 'a';
pub const RIGHT_CHAR: char = 'd';
pub const QUIT_CHAR: char = 'q';
pub const BLOCKING_CHAR: char = 'b';
pub const COMMAND_CHAR: char = 'o';

/// A key press, reduced to what the game distinguishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Backspace,
    Esc,
    Interrupt,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Move(Steer),
    Quit,
    ToggleBlocking,
    OpenCommand,
    Other,
}

pub fn control_for(ch: char) -> Control {
    match ch {
        LEFT_CHAR => Control::Move(Steer::Left),
        RIGHT_CHAR => Control::Move(Steer::Right),
        QUIT_CHAR => Control::Quit,
        BLOCKING_CHAR => Control::ToggleBlocking,
        COMMAND_CHAR => Control::OpenCommand,
        _ => Control::Other,
    }
}

pub fn steer_for(input: Option<char>) -> Steer {
    match input.map(control_for) {
        Some(Control::Move(s)) => s,
        _ => Steer::Still,
    }
}

pub trait InputSource {
    /// Waits up to `timeout` for a key; `None` waits indefinitely.
    /// A zero timeout is a non-blocking poll.
    fn next_key(&mut self, timeout: Option<Duration>) -> Result<Option<Key>>;
}

/// Replays a fixed key sequence. Once exhausted, every read reports
/// [`Key::Interrupt`] so a blocking loop cannot hang.
#[cfg(test)]
#[derive(Clone, Debug, Default)]
pub struct ScriptedInput {
    keys: VecDeque<Key>,
}

#[cfg(test)]
impl ScriptedInput {
    pub fn new(keys: impl IntoIterator<Item = Key>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    pub fn from_chars(s: &str) -> Self {
        Self::new(s.chars().map(Key::Char))
    }

    pub fn remaining(&self) -> usize {
        self.keys.len()
    }
}

#[cfg(test)]
impl InputSource for ScriptedInput {
    fn next_key(&mut self, _timeout: Option<Duration>) -> Result<Option<Key>> {
        Ok(Some(self.keys.pop_front().unwrap_or(Key::Interrupt)))
    }
}
