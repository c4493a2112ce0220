pub mod acquire;
pub mod core;
pub mod error;
pub mod http;
pub mod notify;
pub mod registry;
