use std::sync::Arc;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::utils::AppError;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，每个请求克隆的成本极低。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | DbService | 数据存储连接 (进程级唯一) |
/// | jwt_service | Arc<JwtService> | JWT 验证服务 |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 数据存储连接服务
    pub db: DbService,
    /// JWT 验证服务
    jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 数据库连接按配置做有界重试；全部失败时返回错误，进程应退出
    /// (没有数据存储就没有可用的降级模式)。
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        let db = DbService::connect(config.db.clone()).await?;
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        Ok(Self {
            config: config.clone(),
            db,
            jwt_service,
        })
    }

    /// 启动后台任务
    ///
    /// 必须在 `Server::run()` 内部、开始接受请求之前调用
    ///
    /// 启动的任务：
    /// - 数据库连接看门狗 (断线检测 + 无限重连)
    pub fn start_background_tasks(&self) {
        self.db.spawn_watchdog();
    }

    /// 获取 JWT 服务
    pub fn jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
