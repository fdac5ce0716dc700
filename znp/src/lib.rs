//! Host-side driver for Z-Stack ZNP co-processors.
//!
//! Inbound frames are offered to a chain of handlers that correlate them with
//! pending requests or fan them out as events. `ZnpApi` is the session handle,
//! `ZnpPort` connects it to a serial stream.

//payloads are little-endian and deku reads them with native endianness
#[cfg(target_endian = "big")]
compile_error!("znp supports little-endian targets only");

pub mod error;
pub mod types;
pub mod codec;
pub mod handler;
pub mod timer;
pub mod event;
pub mod correlator;
pub mod api;
pub mod config;
pub mod transport;

pub use error::{ Error, Result };
pub use config::ZnpConfig;
pub use api::{ ZnpApi, Events, check_status, check_only_status };
pub use transport::{ MtFrame, ZnpPort };
pub use timer::{ Clock, ManualClock, SystemClock };
