//! Wire types shared between the Sentinel dashboard client and its tools.

pub mod params;
pub mod views;
