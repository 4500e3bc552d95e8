#[cfg(feature = "defmt_logger")]
pub mod defmt_logger;

#[cfg(all(feature = "null_logger", not(feature = "defmt_logger")))]
pub mod null_logger;

#[cfg(all(feature = "serial_logger", not(feature = "defmt_logger")))]
pub mod serial_logger;

pub use log::Level;
