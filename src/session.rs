// Copyright (c) 2026 rezky_nightky

use std::io::Result;
use std::time::Duration;

use crate::frame::Frame;
use crate::game::{Game, StepReport};
use crate::input::{control_for, steer_for, Control, InputSource, Key, BLOCKING_CHAR};
use crate::render::{draw_scene, Display, Glyphs};
use crate::runtime::{Flow, Mode, Outcome, ReadMode};
use crate::scheduler::{Clock, Scheduler, SystemClock};
use crate::trace::Trace;

/// One game from first frame to quit or game over.
pub struct Session {
    pub game: Game,
    pub mode: Mode,
    pub read_mode: ReadMode,

    scheduler: Scheduler,
    pending: Option<char>,
    command: String,
    frame: Frame,
    glyphs: Glyphs,
    trace: Trace,
}

impl Session {
    pub fn new(
        game: Game,
        size: (u16, u16),
        glyphs: Glyphs,
        read_mode: ReadMode,
        trace: Trace,
    ) -> Self {
        let (w, h) = size;
        let mut s = Self {
            game,
            mode: Mode::Running,
            read_mode,
            scheduler: Scheduler::default(),
            pending: None,
            command: String::new(),
            frame: Frame::new(w, h),
            glyphs,
            trace,
        };
        s.redraw();
        s
    }

    #[allow(dead_code)]
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    #[allow(dead_code)]
    pub fn pending_input(&self) -> Option<char> {
        self.pending
    }

    #[allow(dead_code)]
    pub fn command_line(&self) -> Option<&str> {
        (self.mode == Mode::CommandEntry).then_some(self.command.as_str())
    }

    fn redraw(&mut self) {
        let command = (self.mode == Mode::CommandEntry).then_some(self.command.as_str());
        draw_scene(&mut self.frame, &self.game, &self.glyphs, command);
    }

    fn set_read_mode(&mut self, mode: ReadMode) {
        if self.read_mode != mode {
            self.read_mode = mode;
            self.scheduler.reset();
            self.trace.line(format_args!("read mode [{}]", mode.label()));
        }
    }

    /// Dispatches one key. After game over the state is final and keys are
    /// ignored.
    pub fn handle_key(&mut self, key: Key) -> Flow {
        match self.mode {
            Mode::GameOver => Flow::Continue,
            Mode::CommandEntry => self.handle_command_key(key),
            Mode::Running => self.handle_running_key(key),
        }
    }

    fn handle_running_key(&mut self, key: Key) -> Flow {
        let ch = match key {
            Key::Interrupt => return Flow::Quit,
            Key::Char(c) => c,
            Key::Enter => '\n',
            Key::Backspace => '\x08',
            Key::Esc => '\x1b',
        };
        match control_for(ch) {
            Control::Quit => return Flow::Quit,
            Control::OpenCommand => {
                self.mode = Mode::CommandEntry;
                self.command.clear();
                self.redraw();
            }
            Control::Move(_) | Control::ToggleBlocking | Control::Other => {
                self.pending = Some(ch);
            }
        }
        Flow::Continue
    }

    fn handle_command_key(&mut self, key: Key) -> Flow {
        match key {
            Key::Char(c) if control_for(c) == Control::Quit => return Flow::Quit,
            Key::Char(c) => self.command.push(c),
            Key::Backspace => {
                self.command.pop();
            }
            Key::Esc => self.close_command(),
            Key::Enter => {
                let line = std::mem::take(&mut self.command);
                self.trace.line(format_args!("command [{}]", line));
                self.run_command(line.trim());
                self.close_command();
            }
            Key::Interrupt => return Flow::Quit,
        }
        self.redraw();
        Flow::Continue
    }

    fn close_command(&mut self) {
        self.mode = Mode::Running;
        self.command.clear();
        self.scheduler.reset();
        self.redraw();
    }

    fn run_command(&mut self, line: &str) {
        match line {
            "" => {}
            "blocking" => self.set_read_mode(ReadMode::Blocking),
            "background" => self.set_read_mode(ReadMode::Background),
            other => self.trace.line(format_args!("unknown command [{}]", other)),
        }
    }

    /// Runs one simulation tick with the latched input, then redraws.
    /// Ticks are skipped while the command line is open or after game over.
    /// `elapsed` is the time since the previous tick, used for tracing only.
    pub fn tick(&mut self, elapsed: Duration) -> StepReport {
        if self.mode != Mode::Running {
            return StepReport::default();
        }

        let input = self.pending.take();
        if self.trace.enabled() {
            self.trace.line(format_args!(
                "ticks [{}] mode [{}] elapsed_ms [{}] input [{}]",
                self.game.ticks + 1,
                self.read_mode.label(),
                elapsed.as_millis(),
                input.map(|c| c.escape_default().to_string()).unwrap_or_default(),
            ));
        }

        if input == Some(BLOCKING_CHAR) {
            self.set_read_mode(self.read_mode.toggled());
        }

        let report = self.game.step(steer_for(input));
        if report.spawned {
            let n = self.game.snowflakes.len();
            self.trace.line(format_args!("spawned [{}]", n));
        }
        if report.gravity && (report.caught > 0 || report.missed > 0) {
            self.trace.line(format_args!(
                "caught [{}] missed [{}] points [{}] lives [{}]",
                report.caught, report.missed, self.game.points, self.game.lives
            ));
        }

        self.redraw();
        if self.game.is_over() {
            self.mode = Mode::GameOver;
        }
        report
    }

    pub fn run<I: InputSource, D: Display>(
        &mut self,
        input: &mut I,
        display: &mut D,
    ) -> Result<Outcome> {
        self.run_with_clock(input, display, &mut SystemClock)
    }

    pub fn run_with_clock<I: InputSource, D: Display, C: Clock>(
        &mut self,
        input: &mut I,
        display: &mut D,
        clock: &mut C,
    ) -> Result<Outcome> {
        display.present(&self.frame)?;
        let mut last = clock.now();
        let mut since_tick = Duration::ZERO;

        loop {
            let key = match self.read_mode {
                ReadMode::Blocking => input.next_key(None)?,
                ReadMode::Background => input.next_key(Some(self.scheduler.time_until_next()))?,
            };

            let mut dirty = false;
            let mut typed_while_running = false;
            if let Some(k) = key {
                let before = self.mode;
                if self.handle_key(k) == Flow::Quit {
                    self.trace.line(format_args!("quit"));
                    return Ok(Outcome::Quit);
                }
                typed_while_running = before == Mode::Running;
                dirty = before == Mode::CommandEntry || self.mode == Mode::CommandEntry;
            }

            let now = clock.now();
            let elapsed = now.saturating_duration_since(last);
            last = now;
            since_tick = since_tick.saturating_add(elapsed);

            let due = match self.read_mode {
                ReadMode::Blocking => typed_while_running,
                ReadMode::Background => self.scheduler.advance(elapsed),
            };
            if due && self.mode == Mode::Running {
                self.tick(since_tick);
                since_tick = Duration::ZERO;
                dirty = true;
            }

            if dirty {
                display.present(&self.frame)?;
            }

            if self.mode == Mode::GameOver {
                let points = self.game.points;
                self.trace.line(format_args!("game over points [{}]", points));
                return Ok(Outcome::GameOver);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::collections::VecDeque;
    use std::rc::Rc;
    use std::time::Instant;

    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::entity::{Position, Snowflake, BUCKET_START_COL};
    use crate::input::ScriptedInput;
    use crate::render::MemoryDisplay;
    use crate::trace::SharedBuf;

    fn session(read_mode: ReadMode) -> Session {
        traced_session(read_mode, Trace::off())
    }

    fn traced_session(read_mode: ReadMode, trace: Trace) -> Session {
        Session::new(
            Game::new(StdRng::seed_from_u64(11)),
            (50, 30),
            Glyphs::new(true, false),
            read_mode,
            trace,
        )
    }

    struct FakeClock(Rc<Cell<Instant>>);

    impl Clock for FakeClock {
        fn now(&mut self) -> Instant {
            self.0.get()
        }
    }

    enum Step {
        /// Nothing typed before the poll timeout runs out.
        Idle,
        /// A key arriving after the given number of milliseconds.
        After(u64, Key),
    }

    /// Input that moves a shared fake clock forward as it is read, so the
    /// background loop can be driven without sleeping. Exhausted scripts
    /// report [`Key::Interrupt`].
    struct TimedInput {
        now: Rc<Cell<Instant>>,
        steps: VecDeque<Step>,
    }

    impl TimedInput {
        fn new(steps: impl IntoIterator<Item = Step>) -> (Self, FakeClock) {
            let now = Rc::new(Cell::new(Instant::now()));
            let input = Self {
                now: Rc::clone(&now),
                steps: steps.into_iter().collect(),
            };
            (input, FakeClock(now))
        }

        fn wait(&self, d: Duration) {
            self.now.set(self.now.get() + d);
        }
    }

    impl InputSource for TimedInput {
        fn next_key(&mut self, timeout: Option<Duration>) -> Result<Option<Key>> {
            match self.steps.pop_front() {
                Some(Step::Idle) => {
                    let t = timeout.expect("idle step needs a poll timeout");
                    self.wait(t);
                    Ok(None)
                }
                Some(Step::After(ms, key)) => {
                    let d = Duration::from_millis(ms);
                    if let Some(t) = timeout {
                        assert!(d <= t, "key scripted after the poll timeout");
                    }
                    self.wait(d);
                    Ok(Some(key))
                }
                None => Ok(Some(Key::Interrupt)),
            }
        }
    }

    fn flake(row: i32, col: i32) -> Snowflake {
        Snowflake {
            pos: Position { row, col },
            ..Snowflake::at_column(col)
        }
    }

    #[test]
    fn quit_key_ends_run_without_touching_state() {
        let mut s = session(ReadMode::Blocking);
        let mut input = ScriptedInput::from_chars("q");
        let mut display = MemoryDisplay::default();

        assert_eq!(s.run(&mut input, &mut display).unwrap(), Outcome::Quit);
        assert_eq!(s.game.ticks, 0);
        assert_eq!(s.game.bucket.pos.col, BUCKET_START_COL);
        assert_eq!(display.presented, 1);
    }

    #[test]
    fn blocking_run_ticks_once_per_key() {
        let mut s = session(ReadMode::Blocking);
        let keys = format!("{}q", "z".repeat(25));
        let mut input = ScriptedInput::from_chars(&keys);
        let mut display = MemoryDisplay::default();

        assert_eq!(s.run(&mut input, &mut display).unwrap(), Outcome::Quit);
        assert_eq!(s.game.ticks, 25);
        assert_eq!(s.game.snowflakes.len(), 1);
        assert_eq!(display.presented, 26);
    }

    #[test]
    fn five_blocking_ticks_apply_gravity_once() {
        let mut s = session(ReadMode::Blocking);
        s.game.snowflakes = vec![flake(3, 45)];
        let mut input = ScriptedInput::from_chars("zzzzzq");
        s.run(&mut input, &mut MemoryDisplay::default()).unwrap();
        assert_eq!(s.game.snowflakes[0].pos.row, 4);
    }

    #[test]
    fn last_input_before_tick_wins() {
        let mut s = session(ReadMode::Background);
        s.handle_key(Key::Char('a'));
        s.handle_key(Key::Char('d'));
        s.tick(Duration::ZERO);
        assert_eq!(s.game.bucket.pos.col, BUCKET_START_COL + 1);
        assert_eq!(s.pending_input(), None);

        s.tick(Duration::ZERO);
        assert_eq!(s.game.bucket.pos.col, BUCKET_START_COL + 1);
    }

    #[test]
    fn toggle_applies_at_next_tick() {
        let mut s = session(ReadMode::Background);
        s.handle_key(Key::Char('b'));
        assert_eq!(s.read_mode, ReadMode::Background);
        s.tick(Duration::ZERO);
        assert_eq!(s.read_mode, ReadMode::Blocking);
        assert_eq!(s.game.ticks, 1);
    }

    #[test]
    fn command_line_pauses_simulation() {
        let mut s = session(ReadMode::Background);
        s.handle_key(Key::Char('o'));
        assert_eq!(s.mode, Mode::CommandEntry);
        s.handle_key(Key::Char('x'));
        s.handle_key(Key::Char('y'));
        s.handle_key(Key::Backspace);
        assert_eq!(s.command_line(), Some("x"));
        assert!(s.frame().row_text(2).starts_with("> x"));

        s.tick(Duration::from_millis(100));
        assert_eq!(s.game.ticks, 0);

        s.handle_key(Key::Esc);
        assert_eq!(s.mode, Mode::Running);
        assert_eq!(s.command_line(), None);
        s.tick(Duration::from_millis(100));
        assert_eq!(s.game.ticks, 1);
    }

    #[test]
    fn commands_switch_read_mode() {
        let mut s = session(ReadMode::Background);
        s.handle_key(Key::Char('o'));
        for c in "blocking".chars() {
            s.handle_key(Key::Char(c));
        }
        s.handle_key(Key::Enter);
        assert_eq!(s.mode, Mode::Running);
        assert_eq!(s.read_mode, ReadMode::Blocking);

        s.handle_key(Key::Char('o'));
        for c in "bogus".chars() {
            s.handle_key(Key::Char(c));
        }
        s.handle_key(Key::Enter);
        assert_eq!(s.read_mode, ReadMode::Blocking);
    }

    #[test]
    fn closing_command_line_does_not_tick() {
        let mut s = session(ReadMode::Blocking);
        let mut input = ScriptedInput::new([
            Key::Char('o'),
            Key::Char('x'),
            Key::Esc,
            Key::Char('o'),
            Key::Enter,
            Key::Char('d'),
            Key::Char('q'),
        ]);
        let mut display = MemoryDisplay::default();
        s.run(&mut input, &mut display).unwrap();
        assert_eq!(s.game.ticks, 1);
        assert_eq!(s.game.bucket.pos.col, BUCKET_START_COL + 1);
        // initial, five command-line keys, one tick
        assert_eq!(display.presented, 7);
    }

    #[test]
    fn quit_char_works_inside_command_line() {
        let mut s = session(ReadMode::Blocking);
        let mut input = ScriptedInput::from_chars("oabq");
        assert_eq!(
            s.run(&mut input, &mut MemoryDisplay::default()).unwrap(),
            Outcome::Quit
        );
        assert_eq!(s.game.ticks, 0);
    }

    #[test]
    fn losing_last_life_ends_the_run() {
        let mut s = session(ReadMode::Blocking);
        s.game.lives = 1;
        s.game.snowflakes = vec![flake(29, 45)];
        let mut input = ScriptedInput::from_chars(&"z".repeat(20));
        let mut display = MemoryDisplay::default();

        assert_eq!(s.run(&mut input, &mut display).unwrap(), Outcome::GameOver);
        assert_eq!(s.mode, Mode::GameOver);
        assert_eq!(s.game.ticks, 5);
        assert_eq!(s.game.lives, 0);
        assert_eq!(input.remaining(), 15);

        let frame = display.last.unwrap();
        assert!(frame.row_text(1).starts_with("Lives: 0"));

        assert_eq!(s.handle_key(Key::Char('a')), Flow::Continue);
        assert_eq!(s.handle_key(Key::Char('o')), Flow::Continue);
        assert_eq!(s.pending_input(), None);
        assert_eq!(s.mode, Mode::GameOver);
        s.tick(Duration::ZERO);
        assert_eq!(s.game.ticks, 5);
        assert_eq!(s.game.bucket.pos.col, BUCKET_START_COL);
    }

    #[test]
    fn catching_scores_through_the_loop() {
        let mut s = session(ReadMode::Blocking);
        s.game.snowflakes = vec![flake(28, BUCKET_START_COL + 4)];
        let mut input = ScriptedInput::from_chars("zzzzzq");
        s.run(&mut input, &mut MemoryDisplay::default()).unwrap();
        assert_eq!(s.game.points, 1);
        assert!(s.game.snowflakes.is_empty());
    }

    #[test]
    fn background_run_ticks_once_per_interval_of_idle_time() {
        let mut s = session(ReadMode::Background);
        let steps = (0..12)
            .map(|_| Step::Idle)
            .chain([Step::After(0, Key::Char('q'))]);
        let (mut input, mut clock) = TimedInput::new(steps);
        let mut display = MemoryDisplay::default();

        let outcome = s.run_with_clock(&mut input, &mut display, &mut clock);
        assert_eq!(outcome.unwrap(), Outcome::Quit);
        assert_eq!(s.game.ticks, 12);
        assert_eq!(display.presented, 13);
    }

    #[test]
    fn keys_between_ticks_wait_for_the_interval() {
        let sink = SharedBuf::default();
        let mut s = traced_session(ReadMode::Background, Trace::to(Box::new(sink.clone())));
        let (mut input, mut clock) = TimedInput::new([
            Step::Idle,
            Step::After(40, Key::Char('a')),
            Step::After(30, Key::Char('d')),
            Step::Idle,
            Step::After(0, Key::Char('q')),
        ]);
        let mut display = MemoryDisplay::default();

        s.run_with_clock(&mut input, &mut display, &mut clock).unwrap();
        assert_eq!(s.game.ticks, 2);
        assert_eq!(s.game.bucket.pos.col, BUCKET_START_COL + 1);
        assert_eq!(display.presented, 3);

        // the last tick reports the full interval, not the final 30 ms poll
        let text = sink.text();
        assert!(text.contains("ticks [1] mode [background] elapsed_ms [100] input []"));
        assert!(text.contains("ticks [2] mode [background] elapsed_ms [100] input [d]"));
    }

    #[test]
    fn toggle_in_background_switches_to_blocking_at_next_tick() {
        let mut s = session(ReadMode::Background);
        let (mut input, mut clock) = TimedInput::new([
            Step::Idle,
            Step::After(10, Key::Char('b')),
            Step::Idle,
            Step::After(0, Key::Char('d')),
            Step::After(0, Key::Char('d')),
            Step::After(0, Key::Char('q')),
        ]);

        s.run_with_clock(&mut input, &mut MemoryDisplay::default(), &mut clock)
            .unwrap();
        assert_eq!(s.read_mode, ReadMode::Blocking);
        // two timed ticks, then one tick per key with no time passing
        assert_eq!(s.game.ticks, 4);
        assert_eq!(s.game.bucket.pos.col, BUCKET_START_COL + 2);
    }
}
