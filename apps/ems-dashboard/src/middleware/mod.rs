//! 中间件模块

pub mod auth;
pub mod rate_limit;

pub use auth::*;
pub use rate_limit::register_rate_limit;
