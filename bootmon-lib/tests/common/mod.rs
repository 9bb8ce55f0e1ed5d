#![allow(dead_code)]

use bootmon_lib::{ControlLine, ControlLines, Error, LineBuffer, LineSource, Result};
use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Line(ControlLine, bool),
    Read,
}

/// What a scripted read returns.
pub enum Step {
    Data(Vec<u8>),
    Timeout,
    Fail(io::ErrorKind),
}

/// Observations that outlive the port.
#[derive(Clone, Default)]
pub struct Probe {
    events: Arc<Mutex<Vec<(Instant, Event)>>>,
    drops: Arc<AtomicUsize>,
}

impl Probe {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().iter().map(|(_, e)| e.clone()).collect()
    }

    pub fn timed_events(&self) -> Vec<(Instant, Event)> {
        self.events.lock().unwrap().clone()
    }

    pub fn drops(&self) -> usize {
        self.drops.load(Ordering::SeqCst)
    }

    fn record(&self, event: Event) {
        self.events.lock().unwrap().push((Instant::now(), event));
    }
}

/// A port that replays a script of read results, then times out forever.
pub struct MockPort {
    script: VecDeque<Step>,
    read_timeout: Duration,
    failing_line: Option<ControlLine>,
    probe: Probe,
}

impl MockPort {
    pub fn new(script: Vec<Step>) -> (Self, Probe) {
        let probe = Probe::default();
        let port = Self {
            script: script.into(),
            read_timeout: Duration::from_millis(10),
            failing_line: None,
            probe: probe.clone(),
        };
        (port, probe)
    }

    pub fn silent() -> (Self, Probe) {
        Self::new(Vec::new())
    }

    /// Makes every attempt to drive `line` fail.
    pub fn failing_line(mut self, line: ControlLine) -> Self {
        self.failing_line = Some(line);
        self
    }

    fn set_line(&mut self, line: ControlLine, level: bool) -> Result<()> {
        if self.failing_line == Some(line) {
            return Err(Error::control_line(
                line,
                serialport::Error::new(serialport::ErrorKind::Unknown, "ioctl failed"),
            ));
        }
        self.probe.record(Event::Line(line, level));
        Ok(())
    }
}

impl ControlLines for MockPort {
    fn set_dtr(&mut self, level: bool) -> Result<()> {
        self.set_line(ControlLine::Dtr, level)
    }

    fn set_rts(&mut self, level: bool) -> Result<()> {
        self.set_line(ControlLine::Rts, level)
    }
}

impl LineSource for MockPort {
    fn read_line(&mut self) -> Result<Option<Vec<u8>>> {
        self.probe.record(Event::Read);
        match self.script.pop_front() {
            Some(Step::Data(data)) => Ok(Some(data)),
            Some(Step::Fail(kind)) => Err(io::Error::new(kind, "scripted failure").into()),
            Some(Step::Timeout) | None => {
                std::thread::sleep(self.read_timeout);
                Ok(None)
            }
        }
    }
}

impl Drop for MockPort {
    fn drop(&mut self) {
        self.probe.drops.fetch_add(1, Ordering::SeqCst);
    }
}

/// Sends one byte after every `gap`, never a newline.
pub struct DripReader {
    pub gap: Duration,
}

impl Read for DripReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        std::thread::sleep(self.gap);
        buf[0] = b'.';
        Ok(1)
    }
}

/// A device behind a real `LineBuffer` that prints progress dots forever.
pub struct DripPort {
    reader: DripReader,
    buffer: LineBuffer,
    probe: Probe,
}

impl DripPort {
    pub fn new(gap: Duration, read_timeout: Duration) -> (Self, Probe) {
        let probe = Probe::default();
        let port = Self {
            reader: DripReader { gap },
            buffer: LineBuffer::new(read_timeout),
            probe: probe.clone(),
        };
        (port, probe)
    }
}

impl ControlLines for DripPort {
    fn set_dtr(&mut self, level: bool) -> Result<()> {
        self.probe.record(Event::Line(ControlLine::Dtr, level));
        Ok(())
    }

    fn set_rts(&mut self, level: bool) -> Result<()> {
        self.probe.record(Event::Line(ControlLine::Rts, level));
        Ok(())
    }
}

impl LineSource for DripPort {
    fn read_line(&mut self) -> Result<Option<Vec<u8>>> {
        self.probe.record(Event::Read);
        self.buffer.read_line_from(&mut self.reader)
    }
}

impl Drop for DripPort {
    fn drop(&mut self) {
        self.probe.drops.fetch_add(1, Ordering::SeqCst);
    }
}

/// Stdout stand-in whose writes always fail.
pub struct BrokenPipe;

impl Write for BrokenPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdout closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
