use strum::Display;
use thiserror::Error;

/// Convenient result type for `bootmon-lib`.
pub type Result<T> = std::result::Result<T, Error>;

/// Modem control lines used for the reset pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ControlLine {
    #[strum(serialize = "DTR")]
    Dtr,
    #[strum(serialize = "RTS")]
    Rts,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to open serial device `{path}`: {source}")]
    DeviceOpen {
        path: String,
        #[source]
        source: serialport::Error,
    },

    #[error("failed to drive {line} line: {source}")]
    ControlLine {
        line: ControlLine,
        #[source]
        source: serialport::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn device_open(path: impl Into<String>, source: serialport::Error) -> Self {
        Self::DeviceOpen {
            path: path.into(),
            source,
        }
    }

    pub fn control_line(line: ControlLine, source: serialport::Error) -> Self {
        Self::ControlLine { line, source }
    }
}

/// Malformed UTF-8 in the serial stream.
///
/// Never fatal: the offending bytes are replaced with U+FFFD and the line is
/// still printed.
#[derive(Debug, Clone, Error)]
#[error("malformed UTF-8 in serial stream: {0}")]
pub struct DecodeError(#[from] pub std::str::Utf8Error);
