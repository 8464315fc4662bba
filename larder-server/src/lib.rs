//! Larder Server - 多租户食品杂货库存与订单服务
//!
//! # 架构概述
//!
//! 本模块是 Larder Server 的主入口，提供以下核心功能：
//!
//! - **库存台账** (`db/repository/item`): 按所有者隔离的库存记录，
//!   名称唯一约束、数量非负不变量、原子数量调整、低库存派生
//! - **批量对账** (`inventory`): 行集按 (owner, name) upsert 合并
//! - **订单生命周期** (`db/repository/order`): 价格快照、状态机、
//!   管理员覆写与用户取消分离
//! - **连接韧性** (`db`): 启动有界重试、运行期断线自动重连
//! - **认证** (`auth`): 外部签发 JWT 的验证与身份解析
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! larder-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 验证、身份上下文
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 连接管理、模型、仓储
//! ├── inventory/     # 批量导入对账
//! └── utils/         # 错误、日志、校验
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod inventory;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService, Role};
pub use core::{Config, Server, ServerState};
pub use db::{DbService, DbSettings};
pub use inventory::Reconciler;
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境 (dotenv + 日志)
pub fn setup_environment() {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    utils::logger::init_logger_with_file(log_level.as_deref(), log_dir.as_deref());
}

pub fn print_banner() {
    println!(
        r#"
    __                   __
   / /   ____ __________/ /__  _____
  / /   / __ `/ ___/ __  / _ \/ ___/
 / /___/ /_/ / /  / /_/ /  __/ /
/_____/\__,_/_/   \__,_/\___/_/
    "#
    );
}
