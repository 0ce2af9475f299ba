//! Pollmeter - input device polling rate and latency monitor
//!
//! Measures how often connected input devices deliver events over rolling
//! one-second windows and reports the instantaneous rate and derived input
//! latency per device.

pub mod config;
pub mod device;
pub mod engine;
pub mod report;
pub mod ui;

pub use config::Config;
