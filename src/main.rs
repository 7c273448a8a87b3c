use std::net::SocketAddr;

use product_api::{build_router, config, infrastructure::logger::Logger, seeded_state};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::load_config()?;

    // 初始化日志
    Logger::init(&config.logging.level);

    let state = seeded_state();
    let app = build_router(state, &config);

    let addr = config.listen_addr();
    let listener = TcpListener::bind(&addr).await?;

    info!("🚀 商品 API 服务器运行在 http://{}", addr);
    info!(
        "   限流: 每 {} 秒最多 {} 次请求",
        config.rate_limit.window_secs, config.rate_limit.max_requests
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("服务器已停止");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("无法监听 Ctrl-C 信号: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("无法监听 SIGTERM 信号: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("收到关闭信号，正在停止服务器...");
}
