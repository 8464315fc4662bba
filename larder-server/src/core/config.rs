use crate::auth::JwtConfig;
use crate::db::DbSettings;

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_PORT | 3001 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | MAX_CONNECTIONS | 1000 | 最大并发请求数 |
/// | REQUEST_TIMEOUT_MS | 30000 | 请求超时(毫秒) |
/// | SHUTDOWN_TIMEOUT_MS | 10000 | 关闭排水超时(毫秒) |
///
/// 数据库相关见 [`DbSettings`]，JWT 相关见 [`JwtConfig`]。
///
/// # 示例
///
/// ```ignore
/// HTTP_PORT=8080 SURREAL_URL=db.internal:8000 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 最大并发请求数
    pub max_connections: usize,
    /// 请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
    /// 关闭超时时间 (毫秒) — 超时后强制退出
    pub shutdown_timeout_ms: u64,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 数据存储连接配置
    pub db: DbSettings,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3001),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            max_connections: std::env::var("MAX_CONNECTIONS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(1000),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),
            shutdown_timeout_ms: std::env::var("SHUTDOWN_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10000),
            jwt: JwtConfig::default(),
            db: DbSettings::default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
