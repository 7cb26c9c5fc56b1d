//! orv-hardware
//!
//! Hardware abstraction crate for the Open Rack Vent PCB: the board marking
//! registries, the pin driver seam (sysfs and mock), and the unified
//! hardware interface the control surfaces drive.
//
//! Public API:
//! - `interface::build_interface` — resolve a wire mapping into a live interface
//! - `interface::HardwareInterface` — the contract consumed by higher layers
//! - `driver::SysfsDriver` / `driver::MockDriver` — pin drivers

pub mod beaglebone;
pub mod driver;
pub mod interface;

pub use driver::{AdcChannel, LedHandle, MockDriver, PinDriver, PwmChannel, SysfsDriver};
pub use interface::{build_interface, BoardInterface, HardwareInterface};
