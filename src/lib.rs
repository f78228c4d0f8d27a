pub mod config;
pub mod enums;
pub mod error;
pub mod providers;
pub mod template;
pub mod qr;
pub mod render;
pub mod storage;
pub mod services;
pub mod api;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use enums::{ DeliveryMode, StorageBackend };
pub use error::{ AppError, Result };
