pub mod inmemory;
pub mod key_provider;
pub mod traits;
