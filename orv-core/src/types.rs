//! Core domain types for the Open Rack Vent system
//!
//! Rack locations, supported hardware platforms and PCB revisions, and the
//! board markings printed on the ORV PCB silkscreen. All of these are closed
//! enumerations: the wiring configuration and the registries in
//! `orv-hardware` refer to pins exclusively through these names, never
//! through raw pin numbers.

use crate::error::OrvError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A physical zone inside the rack enclosure.
///
/// Intake vs. exhaust is the hot/cold side of the rack; upper vs. lower is
/// the vertical position. Heat rises, so the most temperature-sensitive gear
/// typically sits in the lower positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RackLocation {
    IntakeLower,
    IntakeUpper,
    ExhaustLower,
    ExhaustUpper,
}

impl RackLocation {
    /// All locations, in a fixed order useful for stable output.
    pub const ALL: [RackLocation; 4] = [
        RackLocation::IntakeLower,
        RackLocation::IntakeUpper,
        RackLocation::ExhaustLower,
        RackLocation::ExhaustUpper,
    ];

    /// The wire-format string for this location.
    pub fn as_str(&self) -> &'static str {
        match self {
            RackLocation::IntakeLower => "intake_lower",
            RackLocation::IntakeUpper => "intake_upper",
            RackLocation::ExhaustLower => "exhaust_lower",
            RackLocation::ExhaustUpper => "exhaust_upper",
        }
    }
}

impl fmt::Display for RackLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RackLocation {
    type Err = OrvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "intake_lower" => Ok(RackLocation::IntakeLower),
            "intake_upper" => Ok(RackLocation::IntakeUpper),
            "exhaust_lower" => Ok(RackLocation::ExhaustLower),
            "exhaust_upper" => Ok(RackLocation::ExhaustUpper),
            other => Err(OrvError::Parse(format!("unknown rack location: {other}"))),
        }
    }
}

/// Hardware platforms that can drive an ORV PCB.
///
/// Mostly future-proofing for the interface builder; there is no intent to
/// support additional platforms at the time of writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HardwarePlatform {
    #[serde(rename = "BeagleBoneBlack")]
    BeagleBoneBlack,
}

impl HardwarePlatform {
    pub fn as_str(&self) -> &'static str {
        match self {
            HardwarePlatform::BeagleBoneBlack => "BeagleBoneBlack",
        }
    }
}

impl fmt::Display for HardwarePlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HardwarePlatform {
    type Err = OrvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BeagleBoneBlack" => Ok(HardwarePlatform::BeagleBoneBlack),
            other => Err(OrvError::Parse(format!("unknown hardware platform: {other}"))),
        }
    }
}

/// Revisions of the ORV PCB.
///
/// `V110` is the next board spin; its marking registry has not shipped yet,
/// so building an interface for it is rejected as unsupported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PcbRevision {
    #[serde(rename = "v1.0.0")]
    V100,
    #[serde(rename = "v1.1.0")]
    V110,
}

impl PcbRevision {
    pub fn as_str(&self) -> &'static str {
        match self {
            PcbRevision::V100 => "v1.0.0",
            PcbRevision::V110 => "v1.1.0",
        }
    }
}

impl fmt::Display for PcbRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PcbRevision {
    type Err = OrvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "v1.0.0" => Ok(PcbRevision::V100),
            "v1.1.0" => Ok(PcbRevision::V110),
            other => Err(OrvError::Parse(format!("unknown PCB revision: {other}"))),
        }
    }
}

/// Status LEDs mounted on the ORV PCB itself (not rack hardware).
///
/// RUN blinks while the daemon is alive, WEB blinks while a control API is
/// up, FAULT latches on when the daemon hits an unrecoverable error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnboardLed {
    Run,
    Web,
    Fault,
}

impl OnboardLed {
    pub fn as_str(&self) -> &'static str {
        match self {
            OnboardLed::Run => "run",
            OnboardLed::Web => "web",
            OnboardLed::Fault => "fault",
        }
    }
}

impl fmt::Display for OnboardLed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OnboardLed {
    type Err = OrvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "run" => Ok(OnboardLed::Run),
            "web" => Ok(OnboardLed::Web),
            "fault" => Ok(OnboardLed::Fault),
            other => Err(OrvError::Parse(format!("unknown onboard LED: {other}"))),
        }
    }
}

/// Silkscreen markings for the active-low PWM fan headers.
///
/// `Onboard` is the fan header next to the controller footprint; `PN0`-`PN5`
/// are the panel headers along the board edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PwmMarking {
    #[serde(rename = "ONBOARD")]
    Onboard,
    #[serde(rename = "PN0")]
    Pn0,
    #[serde(rename = "PN1")]
    Pn1,
    #[serde(rename = "PN2")]
    Pn2,
    #[serde(rename = "PN3")]
    Pn3,
    #[serde(rename = "PN4")]
    Pn4,
    #[serde(rename = "PN5")]
    Pn5,
}

impl PwmMarking {
    pub fn as_str(&self) -> &'static str {
        match self {
            PwmMarking::Onboard => "ONBOARD",
            PwmMarking::Pn0 => "PN0",
            PwmMarking::Pn1 => "PN1",
            PwmMarking::Pn2 => "PN2",
            PwmMarking::Pn3 => "PN3",
            PwmMarking::Pn4 => "PN4",
            PwmMarking::Pn5 => "PN5",
        }
    }
}

impl fmt::Display for PwmMarking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Silkscreen markings for the thermistor (analog input) headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThermistorMarking {
    #[serde(rename = "TMP0")]
    Tmp0,
    #[serde(rename = "TMP1")]
    Tmp1,
    #[serde(rename = "TMP2")]
    Tmp2,
    #[serde(rename = "TMP3")]
    Tmp3,
    #[serde(rename = "TMP4")]
    Tmp4,
    #[serde(rename = "TMP5")]
    Tmp5,
}

impl ThermistorMarking {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThermistorMarking::Tmp0 => "TMP0",
            ThermistorMarking::Tmp1 => "TMP1",
            ThermistorMarking::Tmp2 => "TMP2",
            ThermistorMarking::Tmp3 => "TMP3",
            ThermistorMarking::Tmp4 => "TMP4",
            ThermistorMarking::Tmp5 => "TMP5",
        }
    }
}

impl fmt::Display for ThermistorMarking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
