// Copyright (c) 2026 rezky_nightky

use std::fmt;
use std::io::{self, IsTerminal, Write};

use crate::config::TraceMode;

/// Advisory diagnostic lines. Writes go to any `Write` sink (stderr in the
/// binary); failures are ignored.
pub struct Trace {
    out: Option<Box<dyn Write>>,
}

impl Trace {
    pub fn from_mode(mode: TraceMode) -> Self {
        let on = match mode {
            TraceMode::On => true,
            TraceMode::Off => false,
            TraceMode::Auto => !io::stderr().is_terminal(),
        };
        if on {
            Self::to(Box::new(io::stderr()))
        } else {
            Self::off()
        }
    }

    pub fn to(out: Box<dyn Write>) -> Self {
        Self { out: Some(out) }
    }

    pub fn off() -> Self {
        Self { out: None }
    }

    pub fn enabled(&self) -> bool {
        self.out.is_some()
    }

    pub fn line(&mut self, args: fmt::Arguments<'_>) {
        if let Some(out) = self.out.as_mut() {
            let _ = out.write_fmt(args);
            let _ = out.write_all(b"\n");
            let _ = out.flush();
        }
    }
}

/// In-memory trace sink whose clones share one buffer.
#[cfg(test)]
#[derive(Clone, Debug, Default)]
pub struct SharedBuf(std::rc::Rc<std::cell::RefCell<Vec<u8>>>);

#[cfg(test)]
impl SharedBuf {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

#[cfg(test)]
impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_one_line_per_call() {
        let sink = SharedBuf::default();
        let mut t = Trace::to(Box::new(sink.clone()));
        t.line(format_args!("ticks [{}]", 3));
        t.line(format_args!("done"));
        assert_eq!(sink.text(), "ticks [3]\ndone\n");
    }

    #[test]
    fn off_writes_nothing() {
        let mut t = Trace::from_mode(TraceMode::Off);
        assert!(!t.enabled());
        t.line(format_args!("ignored"));
    }
}
