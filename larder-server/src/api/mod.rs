//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查 (数据库连接状态)
//! - [`inventory`] - 库存管理接口 (含批量导入)
//! - [`orders`] - 订单管理接口

pub mod health;
pub mod inventory;
pub mod orders;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};
