// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

pub const BUCKET_ROW: i32 = 30;
pub const BUCKET_MIN_COL: i32 = 1;
pub const BUCKET_MAX_COL: i32 = 40;
pub const BUCKET_START_COL: i32 = 25;

pub const SPAWN_ROW: i32 = 1;
pub const SPAWN_MIN_COL: i32 = 3;
pub const SPAWN_MAX_COL: i32 = 47;

pub const ENTITY_COLOR: Color = Color::Blue;

/// Grid coordinates, 1-based, origin top-left.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Steer {
    Left,
    Right,
    Still,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Snowflake {
    pub pos: Position,
    pub color: Color,
}

impl Snowflake {
    pub fn at_column(col: i32) -> Self {
        Self {
            pos: Position {
                row: SPAWN_ROW,
                col,
            },
            color: ENTITY_COLOR,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bucket {
    pub pos: Position,
    pub color: Color,
}

impl Default for Bucket {
    fn default() -> Self {
        Self {
            pos: Position {
                row: BUCKET_ROW,
                col: BUCKET_START_COL,
            },
            color: ENTITY_COLOR,
        }
    }
}

impl Bucket {
    pub fn steer(&mut self, steer: Steer) {
        let delta = match steer {
            Steer::Left => -1,
            Steer::Right => 1,
            Steer::Still => 0,
        };
        self.pos.col = (self.pos.col + delta).clamp(BUCKET_MIN_COL, BUCKET_MAX_COL);
    }
}
