pub mod config;
pub mod context;

pub use config::ServiceConfig;
pub use context::AppContext;
