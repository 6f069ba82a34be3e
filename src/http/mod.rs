pub mod context;
pub mod handler_authorize;
pub mod handler_health;
pub mod handler_logout;
pub mod handler_token;
pub mod handler_userinfo;
pub mod handler_well_known;
pub mod server;
