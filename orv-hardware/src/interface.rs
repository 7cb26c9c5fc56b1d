//! The unified hardware interface and its builder
//!
//! `HardwareInterface` is the platform-independent contract every higher
//! layer (web API, scheduler) drives: set a status LED, drive a rack
//! location's fans, read a rack location's temperatures. It is built once at
//! startup from the wire mapping and never mutated afterward; invoking an
//! operation is the only thing that touches hardware.

use crate::beaglebone;
use crate::driver::{AdcChannel, LedHandle, PinDriver, PwmChannel};
use orv_core::{
    HardwarePlatform, OnboardLed, OrvError, PcbRevision, PwmMarking, RackLocation, Result,
    TemperatureConverter, ThermistorMarking, WireMapping,
};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, info};

/// Platform-independent contract over the resolved board.
///
/// Operations are blocking and perform their hardware transaction inline.
/// Mutating operations return the low-level command trace for diagnostics.
pub trait HardwareInterface: Send + Sync {
    /// Switch one of the PCB status LEDs.
    fn set_onboard_led(&self, led: OnboardLed, on: bool) -> Result<Vec<String>>;

    /// Drive every fan configured at a location to `power` in [0, 1].
    ///
    /// Out-of-range power is rejected before any command is issued. If any
    /// underlying channel fails, the whole call fails; there is no
    /// partial-success masking.
    fn drive_fans(&self, location: RackLocation, power: f64) -> Result<Vec<String>>;

    /// Read every temperature sensor configured at a location.
    ///
    /// One entry per configured sensor, in wiring order. A failed read
    /// degrades to `None`; aggregation (averaging, `None` policy) is the
    /// caller's decision.
    fn read_temperatures(&self, location: RackLocation) -> Result<Vec<Option<f64>>>;

    /// Locations with configured fans, with their channel counts.
    fn fan_locations(&self) -> Vec<(RackLocation, usize)>;

    /// Locations with configured sensors, with their channel counts.
    fn sensor_locations(&self) -> Vec<(RackLocation, usize)>;
}

/// A resolved fan output: the marking it came from, the channel behind it,
/// and a lock serializing concurrent writes to the same physical output.
struct FanOutput {
    marking: PwmMarking,
    channel: PwmChannel,
    lock: Mutex<()>,
}

/// A resolved temperature input. Reads are idempotent, so no lock.
struct SensorInput {
    marking: ThermistorMarking,
    channel: AdcChannel,
}

/// A resolved status LED with its write lock (the heartbeat jobs and the
/// control APIs write LEDs concurrently).
struct LedOutput {
    handle: LedHandle,
    lock: Mutex<()>,
}

/// The resolved interface for one board, generic over the pin driver.
pub struct BoardInterface<D: PinDriver> {
    driver: D,
    converter: TemperatureConverter,
    leds: HashMap<OnboardLed, LedOutput>,
    fans: HashMap<RackLocation, Vec<FanOutput>>,
    sensors: HashMap<RackLocation, Vec<SensorInput>>,
}

impl<D: PinDriver> HardwareInterface for BoardInterface<D> {
    fn set_onboard_led(&self, led: OnboardLed, on: bool) -> Result<Vec<String>> {
        let output = self
            .leds
            .get(&led)
            .ok_or(OrvError::UnknownMarking(led.as_str().to_string()))?;

        let _guard = output
            .lock
            .lock()
            .map_err(|_| OrvError::Hardware("LED lock poisoned".to_string()))?;
        self.driver.set_led(output.handle, on)
    }

    fn drive_fans(&self, location: RackLocation, power: f64) -> Result<Vec<String>> {
        if !(0.0..=1.0).contains(&power) {
            return Err(OrvError::PowerOutOfRange(power));
        }

        let outputs = self
            .fans
            .get(&location)
            .ok_or(OrvError::LocationNotConfigured {
                location,
                kind: "fans",
            })?;

        let mut trace = Vec::new();
        for output in outputs {
            let _guard = output
                .lock
                .lock()
                .map_err(|_| OrvError::Hardware("fan lock poisoned".to_string()))?;
            debug!("Driving {} ({}) to {:.3}", output.marking, output.channel, power);
            trace.extend(self.driver.set_pwm(output.channel, power)?);
        }

        Ok(trace)
    }

    fn read_temperatures(&self, location: RackLocation) -> Result<Vec<Option<f64>>> {
        let inputs = self
            .sensors
            .get(&location)
            .ok_or(OrvError::LocationNotConfigured {
                location,
                kind: "thermistors",
            })?;

        let readings = inputs
            .iter()
            .map(|input| {
                let counts = match self.driver.read_adc(input.channel) {
                    Ok(counts) => counts,
                    Err(e) => {
                        debug!("Read failed on {} ({}): {}", input.marking, input.channel, e);
                        return None;
                    }
                };
                self.converter.convert(counts)
            })
            .collect();

        Ok(readings)
    }

    fn fan_locations(&self) -> Vec<(RackLocation, usize)> {
        RackLocation::ALL
            .iter()
            .filter_map(|&location| {
                self.fans
                    .get(&location)
                    .map(|outputs| (location, outputs.len()))
            })
            .collect()
    }

    fn sensor_locations(&self) -> Vec<(RackLocation, usize)> {
        RackLocation::ALL
            .iter()
            .filter_map(|&location| {
                self.sensors
                    .get(&location)
                    .map(|inputs| (location, inputs.len()))
            })
            .collect()
    }
}

/// Build the unified hardware interface for a board.
///
/// Resolution is eager: every marking the wiring references is looked up in
/// the registry here, so configuration errors surface at startup rather
/// than on first use. No hardware I/O happens during construction.
pub fn build_interface<D: PinDriver>(
    platform: HardwarePlatform,
    revision: PcbRevision,
    mapping: &WireMapping,
    driver: D,
) -> Result<BoardInterface<D>> {
    match (platform, revision) {
        (HardwarePlatform::BeagleBoneBlack, PcbRevision::V100) => {}
        (platform, revision) => {
            return Err(OrvError::UnsupportedPlatform { platform, revision });
        }
    }

    // Re-validated here so a hand-assembled mapping cannot smuggle a
    // double-assigned pin past the JSON constructor.
    mapping.validate()?;

    let mut fans: HashMap<RackLocation, Vec<FanOutput>> = HashMap::new();
    for (&location, markings) in &mapping.fans {
        let outputs = markings
            .iter()
            .map(|&marking| {
                let channel = beaglebone::pwm_channel(marking)
                    .ok_or_else(|| OrvError::UnknownMarking(marking.as_str().to_string()))?;
                Ok(FanOutput {
                    marking,
                    channel,
                    lock: Mutex::new(()),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        fans.insert(location, outputs);
    }

    let mut sensors: HashMap<RackLocation, Vec<SensorInput>> = HashMap::new();
    for (&location, markings) in &mapping.thermistors {
        let inputs = markings
            .iter()
            .map(|&marking| {
                let channel = beaglebone::thermistor_channel(marking)
                    .ok_or_else(|| OrvError::UnknownMarking(marking.as_str().to_string()))?;
                Ok(SensorInput { marking, channel })
            })
            .collect::<Result<Vec<_>>>()?;
        sensors.insert(location, inputs);
    }

    let leds = [OnboardLed::Run, OnboardLed::Web, OnboardLed::Fault]
        .into_iter()
        .map(|led| {
            (
                led,
                LedOutput {
                    handle: beaglebone::led_handle(led),
                    lock: Mutex::new(()),
                },
            )
        })
        .collect();

    let converter = TemperatureConverter::for_reference_circuit()?;

    info!(
        "Hardware interface built: {} / {}, {} fan location(s), {} sensor location(s)",
        platform,
        revision,
        fans.len(),
        sensors.len()
    );

    Ok(BoardInterface {
        driver,
        converter,
        leds,
        fans,
        sensors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::MockDriver;

    fn mapping() -> WireMapping {
        WireMapping::default()
    }

    #[test]
    fn test_build_succeeds_for_supported_pair() {
        let interface = build_interface(
            HardwarePlatform::BeagleBoneBlack,
            PcbRevision::V100,
            &mapping(),
            MockDriver::new(),
        )
        .unwrap();

        assert_eq!(
            interface.fan_locations(),
            vec![(RackLocation::IntakeLower, 2), (RackLocation::IntakeUpper, 2)]
        );
        assert_eq!(
            interface.sensor_locations(),
            vec![(RackLocation::IntakeLower, 2), (RackLocation::IntakeUpper, 2)]
        );
    }

    #[test]
    fn test_build_rejects_unsupported_revision_without_io() {
        let driver = MockDriver::new();
        let handle = driver.clone();

        let result = build_interface(
            HardwarePlatform::BeagleBoneBlack,
            PcbRevision::V110,
            &mapping(),
            driver,
        );

        assert!(matches!(
            result.err(),
            Some(OrvError::UnsupportedPlatform { .. })
        ));
        assert!(handle.issued_commands().is_empty());
    }

    #[test]
    fn test_build_performs_no_hardware_io() {
        let driver = MockDriver::new();
        let handle = driver.clone();

        build_interface(
            HardwarePlatform::BeagleBoneBlack,
            PcbRevision::V100,
            &mapping(),
            driver,
        )
        .unwrap();

        assert!(handle.issued_commands().is_empty());
    }

    #[test]
    fn test_build_rejects_duplicate_assignment() {
        let mut mapping = mapping();
        // PN2 is already assigned to intake_lower.
        mapping
            .fans
            .insert(RackLocation::ExhaustUpper, vec![PwmMarking::Pn2]);

        let result = build_interface(
            HardwarePlatform::BeagleBoneBlack,
            PcbRevision::V100,
            &mapping,
            MockDriver::new(),
        );

        assert!(matches!(result.err(), Some(OrvError::DuplicateMarking(_))));
    }
}
