//! 能源看板 HTTP 服务入口。

use ems_config::AppConfig;
use ems_dashboard::{app, build_state};
use ems_telemetry::init_tracing;
use std::net::SocketAddr;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    // 从环境变量加载运行配置
    let config = AppConfig::from_env()?;
    // 初始化结构化日志
    init_tracing();

    let state = build_state(&config).await?;
    let router = app(state);

    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    tracing::info!(target: "ems.http", addr = %config.http_addr, "listening");
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
