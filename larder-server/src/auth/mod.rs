//! 认证授权模块
//!
//! 身份上下文的消费端：令牌由外部认证服务签发，这里只验证并解析出
//! [`CurrentUser`]（用户 ID + 角色），供所有业务操作使用。
//!
//! - [`JwtService`] - JWT 令牌验证服务
//! - [`CurrentUser`] - 当前用户上下文
//! - [`Role`] - 调用者角色 (user | admin)

pub mod extractor;
pub mod jwt;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService, Role};
