// Copyright (c) 2025 rezk_nightky

/// How the loop waits for input between ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadMode {
    /// Poll without blocking; ticks are paced by the scheduler.
    Background,
    /// Block for one key, then run exactly one tick.
    Blocking,
}

impl ReadMode {
    pub fn toggled(self) -> Self {
        match self {
            ReadMode::Background => ReadMode::Blocking,
            ReadMode::Blocking => ReadMode::Background,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReadMode::Background => "background",
            ReadMode::Blocking => "blocking",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Running,
    CommandEntry,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Quit,
    GameOver,
}
