//! Pin drivers for low-level hardware transactions
//!
//! `PinDriver` is the seam between the resolved hardware interface and the
//! physical board. Every operation is a blocking call that performs its
//! transaction and returns; there is no cancellation or timeout at this
//! layer. Each mutating call returns the list of low-level commands it
//! issued, which the control APIs surface as a diagnostic trace.

use orv_core::{OrvError, Result};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::debug;

/// A PWM output channel, addressed by Linux pwmchip and channel index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PwmChannel {
    pub chip: u8,
    pub channel: u8,
    /// PWM period in nanoseconds (25 kHz for fan control).
    pub period_ns: u32,
}

impl fmt::Display for PwmChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pwmchip{}/pwm{}", self.chip, self.channel)
    }
}

/// An ADC input channel, addressed by IIO voltage index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AdcChannel {
    pub voltage_index: u8,
}

impl fmt::Display for AdcChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "in_voltage{}_raw", self.voltage_index)
    }
}

/// An LED under the Linux LED class, addressed by sysfs name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LedHandle {
    pub name: &'static str,
}

/// Blocking pin-level operations against a board.
///
/// `duty` is the normalized drive power in [0, 1] after range validation;
/// active-low inversion is the driver's concern, callers always speak in
/// "1.0 = full blast" terms.
pub trait PinDriver: Send + Sync {
    /// Drive a PWM channel. Returns the commands issued.
    fn set_pwm(&self, channel: PwmChannel, duty: f64) -> Result<Vec<String>>;

    /// Take one raw sample from an ADC channel.
    fn read_adc(&self, channel: AdcChannel) -> Result<u16>;

    /// Switch an LED on or off. Returns the commands issued.
    fn set_led(&self, led: LedHandle, on: bool) -> Result<Vec<String>>;
}

/// Driver backed by the Linux sysfs PWM, IIO, and LED class interfaces.
///
/// Construction never touches the filesystem; channels are exported lazily
/// on first write. Roots are configurable so tests can point the driver at
/// a scratch directory.
pub struct SysfsDriver {
    pwm_root: PathBuf,
    iio_root: PathBuf,
    led_root: PathBuf,
    /// Channels already exported this run; avoids re-writing `export`,
    /// which the kernel rejects with EBUSY.
    exported: Mutex<HashSet<PwmChannel>>,
}

impl SysfsDriver {
    /// Driver against the real sysfs mount points.
    pub fn new() -> Self {
        Self::with_roots(
            PathBuf::from("/sys/class/pwm"),
            PathBuf::from("/sys/bus/iio/devices/iio:device0"),
            PathBuf::from("/sys/class/leds"),
        )
    }

    /// Driver against arbitrary roots (used by tests).
    pub fn with_roots(pwm_root: PathBuf, iio_root: PathBuf, led_root: PathBuf) -> Self {
        Self {
            pwm_root,
            iio_root,
            led_root,
            exported: Mutex::new(HashSet::new()),
        }
    }

    fn channel_dir(&self, channel: PwmChannel) -> PathBuf {
        self.pwm_root
            .join(format!("pwmchip{}", channel.chip))
            .join(format!("pwm{}", channel.channel))
    }

    fn export_if_needed(&self, channel: PwmChannel, trace: &mut Vec<String>) -> Result<()> {
        let mut exported = self
            .exported
            .lock()
            .map_err(|_| OrvError::Hardware("PWM export state poisoned".to_string()))?;
        if exported.contains(&channel) {
            return Ok(());
        }

        if !self.channel_dir(channel).exists() {
            let export_path = self
                .pwm_root
                .join(format!("pwmchip{}", channel.chip))
                .join("export");
            std::fs::write(&export_path, channel.channel.to_string())?;
            trace.push(format!("pwmchip{}: export {}", channel.chip, channel.channel));
        }

        exported.insert(channel);
        Ok(())
    }
}

impl Default for SysfsDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl PinDriver for SysfsDriver {
    fn set_pwm(&self, channel: PwmChannel, duty: f64) -> Result<Vec<String>> {
        let mut trace = Vec::new();
        self.export_if_needed(channel, &mut trace)?;

        let dir = self.channel_dir(channel);

        // The headers are active-low: full drive power means minimum
        // on-time at the pin.
        let on_time_ns = (f64::from(channel.period_ns) * (1.0 - duty)).round() as u32;

        std::fs::write(dir.join("period"), channel.period_ns.to_string())?;
        trace.push(format!("{channel}: period={}", channel.period_ns));

        std::fs::write(dir.join("duty_cycle"), on_time_ns.to_string())?;
        trace.push(format!("{channel}: duty_cycle={on_time_ns}"));

        std::fs::write(dir.join("enable"), "1")?;
        trace.push(format!("{channel}: enable=1"));

        debug!("PWM write: {} duty={:.3} ({} ns)", channel, duty, on_time_ns);
        Ok(trace)
    }

    fn read_adc(&self, channel: AdcChannel) -> Result<u16> {
        let path = self.iio_root.join(channel.to_string());
        let raw = std::fs::read_to_string(&path)?;
        let counts: u16 = raw
            .trim()
            .parse()
            .map_err(|_| OrvError::Hardware(format!("bad ADC sample from {channel}: {raw:?}")))?;

        debug!("ADC read: {} counts={}", channel, counts);
        Ok(counts)
    }

    fn set_led(&self, led: LedHandle, on: bool) -> Result<Vec<String>> {
        let brightness = if on { "1" } else { "0" };
        let path = self.led_root.join(led.name).join("brightness");
        std::fs::write(&path, brightness)?;

        debug!("LED write: {} brightness={}", led.name, brightness);
        Ok(vec![format!("{}: brightness={}", led.name, brightness)])
    }
}

/// In-memory driver for tests and `--mock` daemon runs.
///
/// Records every command it would have issued and serves scripted ADC
/// counts. Cloning shares the underlying state, so a test can keep a handle
/// while the interface owns another.
#[derive(Clone, Default)]
pub struct MockDriver {
    state: std::sync::Arc<MockState>,
}

#[derive(Default)]
struct MockState {
    commands: Mutex<Vec<String>>,
    adc_counts: Mutex<HashMap<AdcChannel, u16>>,
    failing_adc: Mutex<HashSet<AdcChannel>>,
}

/// ADC count served when a channel has not been scripted: half scale, which
/// reads as room temperature on the reference circuit.
const DEFAULT_MOCK_COUNTS: u16 = 2048;

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the counts returned for a channel.
    pub fn set_adc_counts(&self, channel: AdcChannel, counts: u16) {
        self.state
            .adc_counts
            .lock()
            .expect("mock state poisoned")
            .insert(channel, counts);
    }

    /// Script a channel to fail on read.
    pub fn fail_adc_channel(&self, channel: AdcChannel) {
        self.state
            .failing_adc
            .lock()
            .expect("mock state poisoned")
            .insert(channel);
    }

    /// Every command issued so far, in order.
    pub fn issued_commands(&self) -> Vec<String> {
        self.state
            .commands
            .lock()
            .expect("mock state poisoned")
            .clone()
    }

    fn record(&self, commands: &[String]) {
        self.state
            .commands
            .lock()
            .expect("mock state poisoned")
            .extend_from_slice(commands);
    }
}

impl PinDriver for MockDriver {
    fn set_pwm(&self, channel: PwmChannel, duty: f64) -> Result<Vec<String>> {
        let trace = vec![format!("{channel}: duty={duty:.3}")];
        self.record(&trace);
        Ok(trace)
    }

    fn read_adc(&self, channel: AdcChannel) -> Result<u16> {
        if self
            .state
            .failing_adc
            .lock()
            .expect("mock state poisoned")
            .contains(&channel)
        {
            return Err(OrvError::Hardware(format!("scripted failure on {channel}")));
        }

        Ok(self
            .state
            .adc_counts
            .lock()
            .expect("mock state poisoned")
            .get(&channel)
            .copied()
            .unwrap_or(DEFAULT_MOCK_COUNTS))
    }

    fn set_led(&self, led: LedHandle, on: bool) -> Result<Vec<String>> {
        let trace = vec![format!("{}: brightness={}", led.name, u8::from(on))];
        self.record(&trace);
        Ok(trace)
    }
}
