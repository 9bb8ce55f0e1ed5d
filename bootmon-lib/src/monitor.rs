//! Reset the target, then stream its output for a bounded window.

use crate::Defaults;
use crate::decode::decode_line;
use crate::error::Result;
use crate::port::MonitorPort;
use crate::reset::ResetOps;
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Timing of a monitor run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorOptions {
    /// How long to stream output, measured from the end of the reset pulse
    pub window: Duration,
    /// Pause between polls when a read returned nothing
    pub idle_sleep: Duration,
    /// How long the reset lines are held asserted
    pub reset_hold: Duration,
}

impl Default for MonitorOptions {
    fn default() -> Self {
        Self {
            window: Defaults::WINDOW,
            idle_sleep: Defaults::IDLE_SLEEP,
            reset_hold: Defaults::RESET_HOLD,
        }
    }
}

/// What a run saw
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorSummary {
    pub lines: usize,
    pub bytes: usize,
    /// Lines printed with replacement characters
    pub malformed_lines: usize,
    /// The run ended because the stop flag was raised
    pub interrupted: bool,
    /// Time spent streaming, excluding the reset pulse
    pub elapsed: Duration,
}

pub struct Monitor {
    options: MonitorOptions,
    stop: Arc<AtomicBool>,
}

impl Monitor {
    pub fn new(options: MonitorOptions) -> Self {
        Self {
            options,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Share an externally owned stop flag, e.g. one raised from a signal handler.
    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = stop;
        self
    }

    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Resets the target and copies its output to `out` until the window
    /// elapses or the stop flag is raised.
    ///
    /// Takes ownership of `port`; it is dropped before this returns, on
    /// success and on every error path.
    pub fn run<P, W>(&self, mut port: P, out: &mut W) -> Result<MonitorSummary>
    where
        P: MonitorPort,
        W: Write + ?Sized,
    {
        let result = self.reset_and_stream(&mut port, out);
        drop(port);
        result
    }

    fn reset_and_stream<P, W>(&self, port: &mut P, out: &mut W) -> Result<MonitorSummary>
    where
        P: MonitorPort,
        W: Write + ?Sized,
    {
        ResetOps::pulse(port, self.options.reset_hold)?;

        let start = Instant::now();
        let deadline = start + self.options.window;
        let mut summary = MonitorSummary::default();

        loop {
            if self.stop.load(Ordering::SeqCst) {
                tracing::warn!("monitor interrupted");
                summary.interrupted = true;
                break;
            }
            if Instant::now() >= deadline {
                break;
            }

            match port.read_line()? {
                Some(line) => {
                    summary.lines += 1;
                    summary.bytes += line.len();

                    let (text, err) = decode_line(&line);
                    if let Some(err) = err {
                        summary.malformed_lines += 1;
                        tracing::debug!(%err, "replaced malformed bytes");
                    }
                    out.write_all(text.as_bytes())?;
                    out.flush()?;
                }
                None => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    std::thread::sleep(self.options.idle_sleep.min(remaining));
                }
            }
        }

        summary.elapsed = start.elapsed();
        tracing::info!(
            lines = summary.lines,
            bytes = summary.bytes,
            malformed = summary.malformed_lines,
            interrupted = summary.interrupted,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "monitor finished"
        );
        Ok(summary)
    }
}

impl Default for Monitor {
    fn default() -> Self {
        Self::new(MonitorOptions::default())
    }
}
