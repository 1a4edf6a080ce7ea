//! 能源看板后端：状态装配、路由与中间件。
//!
//! 未配置 `EMS_DATABASE_URL` 时全部使用内存存储；配置 `EMS_REDIS_URL` 时登录失败计数改存 Redis。

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod utils;

use ems_auth::{AuthService, JwtManager, LoginGate, RateLimitPolicy, RateLimiter};
use ems_config::AppConfig;
use ems_storage::{
    AlarmStore, CircuitReadingStore, DashboardStore, DeviceStore, InMemoryAlarmStore,
    InMemoryCircuitReadingStore, InMemoryDashboardStore, InMemoryDeviceStore,
    InMemoryLoginAttemptStore, InMemoryPlantAreaStore, InMemoryPvStore, InMemoryRoleStore,
    InMemorySubstationStore, InMemoryTransformerReadingStore, InMemoryUserStore,
    LoginAttemptStore, PgAlarmStore, PgCircuitReadingStore, PgDashboardStore, PgDeviceStore,
    PgPlantAreaStore, PgPvStore, PgRoleStore, PgSubstationStore, PgTransformerReadingStore,
    PgUserStore, PlantAreaStore, PvStore, RedisLoginAttemptStore, RoleStore, StorageError,
    SubstationStore, TransformerReadingStore, UserStore, connect_pool,
};
use ems_workflow::AlarmWorkflow;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;

pub use routes::create_router as app;

/// 所有存储实例（按后端装配）。
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub roles: Arc<dyn RoleStore>,
    pub alarms: Arc<dyn AlarmStore>,
    pub plant_areas: Arc<dyn PlantAreaStore>,
    pub devices: Arc<dyn DeviceStore>,
    pub substations: Arc<dyn SubstationStore>,
    pub circuits: Arc<dyn CircuitReadingStore>,
    pub transformers: Arc<dyn TransformerReadingStore>,
    pub pv: Arc<dyn PvStore>,
    pub dashboard: Arc<dyn DashboardStore>,
    pub login_attempts: Arc<dyn LoginAttemptStore>,
    pub db_pool: Option<PgPool>,
}

impl Stores {
    /// 内存存储，外键关系通过共享的父表实例模拟。
    pub fn in_memory() -> Self {
        let plant_areas = Arc::new(InMemoryPlantAreaStore::new());
        let devices = Arc::new(InMemoryDeviceStore::new(plant_areas.clone()));
        let substations = Arc::new(InMemorySubstationStore::new(plant_areas.clone()));
        Self {
            users: Arc::new(InMemoryUserStore::new()),
            roles: Arc::new(InMemoryRoleStore::new()),
            alarms: Arc::new(InMemoryAlarmStore::new(devices.clone())),
            circuits: Arc::new(InMemoryCircuitReadingStore::new(substations.clone())),
            transformers: Arc::new(InMemoryTransformerReadingStore::new(substations.clone())),
            plant_areas,
            devices,
            substations,
            pv: Arc::new(InMemoryPvStore::new()),
            dashboard: Arc::new(InMemoryDashboardStore::new()),
            login_attempts: Arc::new(InMemoryLoginAttemptStore::new()),
            db_pool: None,
        }
    }

    /// PostgreSQL 存储（需先执行 migrations）。
    pub async fn postgres(database_url: &str) -> Result<Self, StorageError> {
        let pool = connect_pool(database_url).await?;
        Ok(Self {
            users: Arc::new(PgUserStore::new(pool.clone())),
            roles: Arc::new(PgRoleStore::new(pool.clone())),
            alarms: Arc::new(PgAlarmStore::new(pool.clone())),
            plant_areas: Arc::new(PgPlantAreaStore::new(pool.clone())),
            devices: Arc::new(PgDeviceStore::new(pool.clone())),
            substations: Arc::new(PgSubstationStore::new(pool.clone())),
            circuits: Arc::new(PgCircuitReadingStore::new(pool.clone())),
            transformers: Arc::new(PgTransformerReadingStore::new(pool.clone())),
            pv: Arc::new(PgPvStore::new(pool.clone())),
            dashboard: Arc::new(PgDashboardStore::new(pool.clone())),
            login_attempts: Arc::new(InMemoryLoginAttemptStore::new()),
            db_pool: Some(pool),
        })
    }
}

/// 应用共享状态。
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub workflow: AlarmWorkflow,
    pub plant_areas: Arc<dyn PlantAreaStore>,
    pub devices: Arc<dyn DeviceStore>,
    pub substations: Arc<dyn SubstationStore>,
    pub circuits: Arc<dyn CircuitReadingStore>,
    pub transformers: Arc<dyn TransformerReadingStore>,
    pub pv: Arc<dyn PvStore>,
    pub dashboard: Arc<dyn DashboardStore>,
    /// 注册接口限流（按来源地址）
    pub register_limiter: Arc<RateLimiter>,
    pub db_pool: Option<PgPool>,
}

impl AppState {
    pub fn new(stores: Stores, config: &AppConfig) -> Self {
        let jwt = JwtManager::new(config.jwt_secret.clone(), config.session_ttl_seconds);
        let gate = LoginGate::new(
            stores.login_attempts,
            config.max_login_attempts,
            config.lockout_minutes,
        );
        let auth = Arc::new(AuthService::new(stores.users, stores.roles, jwt, gate));
        let register_limiter = Arc::new(RateLimiter::new(RateLimitPolicy {
            max_requests: config.register_rate_limit,
            window_seconds: config.register_rate_window_seconds,
        }));
        Self {
            auth,
            workflow: AlarmWorkflow::new(stores.alarms),
            plant_areas: stores.plant_areas,
            devices: stores.devices,
            substations: stores.substations,
            circuits: stores.circuits,
            transformers: stores.transformers,
            pv: stores.pv,
            dashboard: stores.dashboard,
            register_limiter,
            db_pool: stores.db_pool,
        }
    }
}

/// 按配置装配存储并完成启动种子（角色表、内存模式下的 admin）。
pub async fn build_state(config: &AppConfig) -> Result<AppState, Box<dyn std::error::Error>> {
    let mut stores = match config.database_url.as_deref() {
        Some(url) => Stores::postgres(url).await?,
        None => {
            info!(target: "ems.http", "database_url not set, using in-memory stores");
            Stores::in_memory()
        }
    };
    if let Some(redis_url) = config.redis_url.as_deref() {
        stores.login_attempts = Arc::new(RedisLoginAttemptStore::connect(
            redis_url,
            config.lockout_minutes * 60,
        )?);
        info!(target: "ems.http", "login attempts stored in redis");
    }
    let in_memory = stores.db_pool.is_none();
    let state = AppState::new(stores, config);

    state.auth.seed_roles().await?;
    if in_memory && let Some(password) = config.seed_admin_password.as_deref() {
        state.auth.ensure_admin(password).await?;
    }
    Ok(state)
}

/// 构造纯内存状态（测试与本地演示）。
pub fn in_memory_state(config: &AppConfig) -> AppState {
    AppState::new(Stores::in_memory(), config)
}
