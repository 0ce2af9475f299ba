//! Measurement engine: samplers, collector and supervisor
//!
//! One sampler thread per device counts events over ~1-second windows and
//! publishes one [`Measurement`] per window into the [`Collector`], a
//! latest-wins per-device mailbox the presentation layer polls on its own
//! cadence. The [`Supervisor`] owns enumeration, thread lifecycle and
//! shutdown.

mod collector;
mod measurement;
mod sampler;
mod supervisor;

pub use collector::Collector;
pub use measurement::Measurement;
pub use sampler::{Sampler, SamplerNotice};
pub use supervisor::{DeviceDesc, Supervisor};
