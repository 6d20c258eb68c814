use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mitm_flow_router::control;
use mitm_flow_router::flow::{FlowRouter, StreamRegistry, ingest::ingest_lines};
use mitm_flow_router::model::{arg::Args, config::Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| Config::default_config_path().to_string());
    let mut config = Config::load(&config_path)?;
    args.apply_overrides(&mut config);
    let addr = config.control_addr()?;

    let registry = Arc::new(
        StreamRegistry::new(&config.results_root)
            .with_context(|| format!("初始化结果目录失败: {}", config.results_root.display()))?,
    );
    let router = Arc::new(FlowRouter::new(registry.clone()));

    if args.ingest_stdin {
        let router = router.clone();
        // 标准输入读取会一直阻塞，使用独立线程，退出时不等待
        std::thread::Builder::new()
            .name("flow-ingest".to_string())
            .spawn(move || {
                let stdin = std::io::stdin();
                ingest_lines(stdin.lock(), &router);
            })
            .context("启动流量输入线程失败")?;
    }

    control::serve_control_api(addr, registry.clone(), control::shutdown_signal()).await?;

    let stats = router.stats();
    tracing::info!(
        written = stats.written,
        dropped = stats.dropped,
        "流量记录器退出"
    );
    registry.shutdown();
    Ok(())
}
