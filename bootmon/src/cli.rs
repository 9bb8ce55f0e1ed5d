use bootmon_lib::Defaults;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Reset a board over DTR/RTS and print its boot log for 15 seconds",
    long_about = None
)]
pub struct Cli {
    /// Serial port device (default: /dev/ttyUSB0, COM1 on Windows)
    #[arg(value_name = "PORT")]
    pub port: Option<String>,
}

impl Cli {
    /// The device to open, used verbatim when given
    pub fn port_path(&self) -> String {
        self.port
            .clone()
            .unwrap_or_else(|| Defaults::PORT.to_string())
    }
}
