//! Handlers 模块

pub mod alarms;
pub mod assets;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod monitoring;
pub mod pv;

pub use alarms::*;
pub use assets::*;
pub use auth::*;
pub use dashboard::*;
pub use health::*;
pub use monitoring::*;
pub use pv::*;
