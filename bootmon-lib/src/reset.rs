use crate::error::Result;
use crate::port::ControlLines;
use std::time::Duration;

/// Control-line reset sequences.
pub struct ResetOps;

impl ResetOps {
    /// Pulses the target's reset input through the usual auto-reset wiring of
    /// USB-to-serial adapters: DTR high / RTS low, hold, then DTR low / RTS
    /// high. The hold is a lower bound, scheduling may stretch it.
    pub fn pulse<T>(port: &mut T, hold: Duration) -> Result<()>
    where
        T: ControlLines + ?Sized,
    {
        tracing::debug!("reset pulse: DTR=1 RTS=0");
        port.set_dtr(true)?;
        port.set_rts(false)?;
        std::thread::sleep(hold);
        tracing::debug!(hold_ms = hold.as_millis() as u64, "reset pulse: DTR=0 RTS=1");
        port.set_dtr(false)?;
        port.set_rts(true)?;
        Ok(())
    }
}
