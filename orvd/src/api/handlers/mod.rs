//! Route handlers for the ORV REST API

pub(crate) mod fans;
pub(crate) mod info;
pub(crate) mod leds;
pub(crate) mod sensors;
