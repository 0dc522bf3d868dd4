#![forbid(unsafe_code)]

#[cfg(feature = "context")]
pub mod context;
#[cfg(feature = "database")]
pub mod database;
#[cfg(feature = "http")]
pub mod http;
#[cfg(feature = "logging")]
pub mod logging;
#[cfg(feature = "prelude")]
pub mod prelude;
#[cfg(feature = "signal")]
pub mod signal;
