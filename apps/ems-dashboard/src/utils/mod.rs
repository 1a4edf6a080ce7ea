//! 工具模块：响应构造、DTO 转换、请求体提取、输入校验。

pub mod dto;
pub mod json;
pub mod response;
pub mod validation;

pub use validation::*;
