//! Board marking registry for the BeagleBone Black driving an ORV PCB v1.0.0
//!
//! Maps each silkscreen marking on the PCB to the BeagleBone pin behind it.
//! The tables are fixed per (platform, revision) pair; lookups return
//! `Option` so the interface builder can reject a wiring that references a
//! marking this board does not carry. The matches are exhaustive over the
//! marking enums, so adding a marking without routing it here is a compile
//! error.

use crate::driver::{AdcChannel, LedHandle, PwmChannel};
use orv_core::{OnboardLed, PwmMarking, ThermistorMarking};

/// Fan PWM period: 25 kHz, the Intel 4-wire fan specification frequency.
const FAN_PWM_PERIOD_NS: u32 = 40_000;

/// Resolve a PWM marking to its eHRPWM/eCAP channel on the v1.0.0 board.
pub fn pwm_channel(marking: PwmMarking) -> Option<PwmChannel> {
    let (chip, channel) = match marking {
        PwmMarking::Onboard => (0, 0), // ehrpwm0A
        PwmMarking::Pn0 => (0, 1),     // ehrpwm0B
        PwmMarking::Pn1 => (2, 0),     // ehrpwm1A
        PwmMarking::Pn2 => (2, 1),     // ehrpwm1B
        PwmMarking::Pn3 => (4, 0),     // ehrpwm2A
        PwmMarking::Pn4 => (4, 1),     // ehrpwm2B
        PwmMarking::Pn5 => (6, 0),     // ecap0
    };

    Some(PwmChannel {
        chip,
        channel,
        period_ns: FAN_PWM_PERIOD_NS,
    })
}

/// Resolve a thermistor marking to its AM335x analog input channel.
pub fn thermistor_channel(marking: ThermistorMarking) -> Option<AdcChannel> {
    let voltage_index = match marking {
        ThermistorMarking::Tmp0 => 0,
        ThermistorMarking::Tmp1 => 1,
        ThermistorMarking::Tmp2 => 2,
        ThermistorMarking::Tmp3 => 3,
        ThermistorMarking::Tmp4 => 4,
        ThermistorMarking::Tmp5 => 5,
    };

    Some(AdcChannel { voltage_index })
}

/// Resolve a status LED to its LED class entry.
///
/// usr0 is left on its default kernel heartbeat trigger; the daemon drives
/// usr1 through usr3.
pub fn led_handle(led: OnboardLed) -> LedHandle {
    let name = match led {
        OnboardLed::Run => "beaglebone:green:usr1",
        OnboardLed::Web => "beaglebone:green:usr2",
        OnboardLed::Fault => "beaglebone:green:usr3",
    };

    LedHandle { name }
}
