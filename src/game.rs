// Copyright (c) 2026 rezky_nightky

use rand::{
    distr::{Distribution, Uniform},
    rngs::StdRng,
};

use crate::entity::{Bucket, Snowflake, Steer, SPAWN_MAX_COL, SPAWN_MIN_COL};

pub const START_LIVES: u32 = 3;
pub const GRAVITY_EVERY: u64 = 5;
pub const SPAWN_EVERY: u64 = 25;

pub const CATCH_ROW: i32 = 29;
pub const GROUND_ROW: i32 = 30;
/// The catch zone is centred this many columns right of the bucket's left
/// edge and reaches the same distance either side.
pub const CATCH_REACH: i32 = 4;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    pub gravity: bool,
    pub spawned: bool,
    pub caught: u32,
    pub missed: u32,
}

pub struct Game {
    pub bucket: Bucket,
    pub snowflakes: Vec<Snowflake>,
    pub points: u32,
    pub lives: u32,
    pub ticks: u64,

    rng: StdRng,
    rand_col: Uniform<i32>,
}

impl Game {
    pub fn new(rng: StdRng) -> Self {
        Self {
            bucket: Bucket::default(),
            snowflakes: Vec::new(),
            points: 0,
            lives: START_LIVES,
            ticks: 0,
            rng,
            rand_col: Uniform::new_inclusive(SPAWN_MIN_COL, SPAWN_MAX_COL).expect("valid range"),
        }
    }

    pub fn is_over(&self) -> bool {
        self.lives == 0
    }

    /// Advances the world by one tick. Does nothing once the game is over.
    pub fn step(&mut self, steer: Steer) -> StepReport {
        let mut report = StepReport::default();
        if self.is_over() {
            return report;
        }

        self.ticks += 1;
        self.bucket.steer(steer);

        if self.ticks % GRAVITY_EVERY == 0 {
            self.apply_gravity();
            let (caught, missed) = self.resolve();
            report.gravity = true;
            report.caught = caught;
            report.missed = missed;
        }

        if self.ticks % SPAWN_EVERY == 0 {
            self.spawn();
            report.spawned = true;
        }

        report
    }

    pub fn apply_gravity(&mut self) {
        for flake in &mut self.snowflakes {
            if flake.pos.row <= GROUND_ROW {
                flake.pos.row += 1;
            }
        }
    }

    pub fn in_catch_zone(&self, flake: &Snowflake) -> bool {
        flake.pos.row == CATCH_ROW
            && (flake.pos.col - self.bucket.pos.col - CATCH_REACH).abs() <= CATCH_REACH
    }

    /// Converts catches into points and ground hits into lost lives.
    /// Returns `(caught, missed)`.
    pub fn resolve(&mut self) -> (u32, u32) {
        let mut caught = 0u32;
        let mut missed = 0u32;
        let mut kept = Vec::with_capacity(self.snowflakes.len());

        for flake in std::mem::take(&mut self.snowflakes) {
            if self.in_catch_zone(&flake) {
                caught += 1;
            } else if flake.pos.row <= GROUND_ROW {
                if flake.pos.row == GROUND_ROW {
                    missed += 1;
                }
                kept.push(flake);
            }
        }

        self.snowflakes = kept;
        self.points = self.points.saturating_add(caught);
        self.lives = self.lives.saturating_sub(missed);
        (caught, missed)
    }

    pub fn spawn(&mut self) {
        let col = self.rand_col.sample(&mut self.rng);
        self.snowflakes.push(Snowflake::at_column(col));
    }
}
