//! Database Module
//!
//! 数据存储连接管理。进程级唯一的 SurrealDB (WebSocket) 连接由 [`DbService`]
//! 持有：启动时有界重试，运行期由看门狗任务监测健康并无限重连，
//! 连接状态通过原子标志暴露给健康检查。
//!
//! 除本模块外，任何组件都不得创建、关闭或替换数据库连接；
//! 其他组件只读连接状态。

pub mod models;
pub mod repository;
pub mod schema;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use surrealdb::Surreal;
use surrealdb::engine::remote::ws::{Client, Ws};
use surrealdb::opt::auth::Root;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::utils::AppError;

/// Datastore connection settings
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | SURREAL_URL | 127.0.0.1:8000 | SurrealDB WebSocket 地址 |
/// | SURREAL_NS | larder | 命名空间 |
/// | SURREAL_DB | inventory | 数据库名 |
/// | SURREAL_USER | root | 用户名 |
/// | SURREAL_PASS | root | 密码 |
/// | DB_CONNECT_ATTEMPTS | 5 | 启动时最大连接尝试次数 |
/// | DB_CONNECT_RETRY_MS | 2000 | 启动时重试间隔(毫秒) |
/// | DB_HEALTH_INTERVAL_MS | 5000 | 健康检查间隔(毫秒) |
/// | DB_RECONNECT_DELAY_MS | 5000 | 断线重连间隔(毫秒) |
/// | DB_OP_TIMEOUT_MS | 5000 | 单次数据库操作超时(毫秒) |
#[derive(Debug, Clone)]
pub struct DbSettings {
    pub url: String,
    pub namespace: String,
    pub database: String,
    pub username: String,
    pub password: String,
    pub connect_attempts: u32,
    pub connect_retry_ms: u64,
    pub health_interval_ms: u64,
    pub reconnect_delay_ms: u64,
    pub op_timeout_ms: u64,
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for DbSettings {
    fn default() -> Self {
        Self {
            url: std::env::var("SURREAL_URL").unwrap_or_else(|_| "127.0.0.1:8000".into()),
            namespace: std::env::var("SURREAL_NS").unwrap_or_else(|_| "larder".into()),
            database: std::env::var("SURREAL_DB").unwrap_or_else(|_| "inventory".into()),
            username: std::env::var("SURREAL_USER").unwrap_or_else(|_| "root".into()),
            password: std::env::var("SURREAL_PASS").unwrap_or_else(|_| "root".into()),
            connect_attempts: env_u64("DB_CONNECT_ATTEMPTS", 5) as u32,
            connect_retry_ms: env_u64("DB_CONNECT_RETRY_MS", 2000),
            health_interval_ms: env_u64("DB_HEALTH_INTERVAL_MS", 5000),
            reconnect_delay_ms: env_u64("DB_RECONNECT_DELAY_MS", 5000),
            op_timeout_ms: env_u64("DB_OP_TIMEOUT_MS", 5000),
        }
    }
}

impl DbSettings {
    pub fn connect_retry(&self) -> Duration {
        Duration::from_millis(self.connect_retry_ms)
    }

    pub fn health_interval(&self) -> Duration {
        Duration::from_millis(self.health_interval_ms)
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    pub fn op_timeout(&self) -> Duration {
        Duration::from_millis(self.op_timeout_ms)
    }
}

/// Database service — owns the process-wide datastore connection
///
/// 克隆只是浅拷贝 (Arc)，所有克隆共享同一连接句柄和连接状态。
#[derive(Clone, Debug)]
pub struct DbService {
    settings: DbSettings,
    handle: Arc<RwLock<Surreal<Client>>>,
    connected: Arc<AtomicBool>,
    shutdown: CancellationToken,
}

impl DbService {
    /// Connect at startup with bounded retries.
    ///
    /// Exhausting the attempts is fatal: there is no degraded mode without a
    /// datastore, so the error propagates to `main` and the process exits.
    pub async fn connect(settings: DbSettings) -> Result<Self, AppError> {
        let mut attempt = 1u32;
        let db = loop {
            match Self::try_connect(&settings).await {
                Ok(db) => break db,
                Err(e) if attempt < settings.connect_attempts => {
                    tracing::warn!(
                        attempt,
                        error = %e,
                        "Datastore connection failed, retrying in {:?}",
                        settings.connect_retry()
                    );
                    attempt += 1;
                    tokio::time::sleep(settings.connect_retry()).await;
                }
                Err(e) => {
                    return Err(AppError::unavailable(format!(
                        "Failed to connect to datastore after {} attempts: {e}",
                        settings.connect_attempts
                    )));
                }
            }
        };

        tracing::info!("Datastore connection established ({})", settings.url);

        Ok(Self {
            settings,
            handle: Arc::new(RwLock::new(db)),
            connected: Arc::new(AtomicBool::new(true)),
            shutdown: CancellationToken::new(),
        })
    }

    /// One connection attempt: dial, authenticate, select ns/db, apply schema
    async fn try_connect(settings: &DbSettings) -> Result<Surreal<Client>, surrealdb::Error> {
        let db = Surreal::new::<Ws>(settings.url.as_str()).await?;
        db.signin(Root {
            username: &settings.username,
            password: &settings.password,
        })
        .await?;
        db.use_ns(&settings.namespace)
            .use_db(&settings.database)
            .await?;
        schema::define(&db).await?;
        Ok(db)
    }

    /// Current connection handle.
    ///
    /// Taken fresh per operation so that a watchdog reconnect swap is picked
    /// up by the next request; callers must not cache it.
    pub async fn db(&self) -> Surreal<Client> {
        self.handle.read().await.clone()
    }

    /// Read-only connectivity state for the health surface.
    /// Only the watchdog writes this flag.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    pub fn op_timeout(&self) -> Duration {
        self.settings.op_timeout()
    }

    /// Start the steady-state watchdog.
    ///
    /// Pings the datastore on a fixed interval; on failure flips the liveness
    /// flag and retries reconnection indefinitely (unlike startup, steady
    /// state never gives up). Cancelled by [`shutdown`].
    ///
    /// [`shutdown`]: DbService::shutdown
    pub fn spawn_watchdog(&self) {
        let service = self.clone();
        tokio::spawn(async move {
            service.watchdog_loop().await;
        });
    }

    async fn watchdog_loop(self) {
        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    tracing::info!("Datastore watchdog stopped");
                    return;
                }
                _ = tokio::time::sleep(self.settings.health_interval()) => {}
            }

            let db = self.db().await;
            match tokio::time::timeout(self.settings.op_timeout(), db.health()).await {
                Ok(Ok(())) => continue,
                Ok(Err(e)) => tracing::warn!(error = %e, "Datastore health check failed"),
                Err(_) => tracing::warn!("Datastore health check timed out"),
            }

            self.connected.store(false, Ordering::SeqCst);
            self.reconnect_until_cancelled().await;
        }
    }

    async fn reconnect_until_cancelled(&self) {
        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => return,
                _ = tokio::time::sleep(self.settings.reconnect_delay()) => {}
            }

            match Self::try_connect(&self.settings).await {
                Ok(db) => {
                    *self.handle.write().await = db;
                    self.connected.store(true, Ordering::SeqCst);
                    tracing::info!("Datastore connection re-established");
                    return;
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "Datastore reconnection failed, retrying in {:?}",
                        self.settings.reconnect_delay()
                    );
                }
            }
        }
    }

    /// Stop the watchdog and any in-progress reconnect loop.
    /// The connection handle itself is released when the last clone drops.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}
