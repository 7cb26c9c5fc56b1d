//! Status LED heartbeat jobs
//!
//! The original hardware shows liveness by blinking PCB LEDs: RUN blinks
//! while the daemon is alive, WEB while the control API is up. Each
//! heartbeat is a tokio interval task toggling one LED; a failed write is
//! logged and the blinking continues, since a dead status LED is not worth
//! taking the daemon down for.

use orv_core::OnboardLed;
use orv_hardware::HardwareInterface;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::warn;

/// Toggle period of the status LEDs.
pub const HEARTBEAT_PERIOD: Duration = Duration::from_millis(500);

/// Spawn a task that toggles `led` every `period` until aborted.
pub fn spawn_led_heartbeat(
    interface: Arc<dyn HardwareInterface>,
    led: OnboardLed,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        let mut on = false;

        loop {
            ticker.tick().await;
            on = !on;
            if let Err(e) = interface.set_onboard_led(led, on) {
                warn!("Heartbeat write to {} LED failed: {}", led, e);
            }
        }
    })
}
