pub mod authorize;
pub mod exchange;
pub mod tokens;
pub mod types;
