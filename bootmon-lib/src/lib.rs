//! Reset a board through the DTR/RTS lines of its USB-to-serial adapter and
//! capture what it prints while booting.

pub mod decode;
pub mod error;
pub mod monitor;
pub mod port;
pub mod reset;

use std::time::Duration;

pub use decode::decode_line;
pub use error::{ControlLine, DecodeError, Error, Result};
pub use monitor::{Monitor, MonitorOptions, MonitorSummary};
pub use port::{ControlLines, LineBuffer, LineSource, LinkConfig, MonitorPort, SerialLink};
pub use reset::ResetOps;

/// Fixed link and timing values
pub struct Defaults;

impl Defaults {
    #[cfg(windows)]
    pub const PORT: &'static str = "COM1";
    #[cfg(not(windows))]
    pub const PORT: &'static str = "/dev/ttyUSB0";
    pub const BAUD: u32 = 115200;
    pub const READ_TIMEOUT: Duration = Duration::from_millis(100);
    pub const RESET_HOLD: Duration = Duration::from_millis(50);
    pub const IDLE_SLEEP: Duration = Duration::from_millis(50);
    pub const WINDOW: Duration = Duration::from_secs(15);
}
