//! 控制面 HTTP 服务生命周期

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;

use crate::flow::StreamRegistry;

use super::router::create_control_router;

/// 在指定地址启动控制面 API，直到 `shutdown` 完成
pub async fn serve_control_api<F>(
    addr: SocketAddr,
    registry: Arc<StreamRegistry>,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("绑定控制面端口失败: {}", addr))?;

    tracing::info!("任务输出控制 API 已启动: http://{}", addr);

    axum::serve(listener, create_control_router(registry))
        .with_graceful_shutdown(shutdown)
        .await
        .context("控制面 API 运行失败")?;

    tracing::info!("任务输出控制 API 已停止");
    Ok(())
}

/// 等待 Ctrl+C 或 SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("监听 Ctrl+C 失败: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("监听 SIGTERM 失败: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("收到 Ctrl+C，开始退出"),
        _ = terminate => tracing::info!("收到 SIGTERM，开始退出"),
    }
}
