use std::path::PathBuf;

use clap::Parser;

use super::config::Config;

/// 按任务分文件记录代理流量
#[derive(Parser, Debug)]
#[command(name = "mitm-flow-router", version, about)]
pub struct Args {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<String>,

    /// 覆盖配置中的控制面监听地址
    #[arg(long)]
    pub host: Option<String>,

    /// 覆盖配置中的控制面端口
    #[arg(short, long)]
    pub port: Option<u16>,

    /// 覆盖配置中的结果根目录
    #[arg(long)]
    pub results_root: Option<PathBuf>,

    /// 从标准输入读取 JSON 行格式的流量记录
    #[arg(long)]
    pub ingest_stdin: bool,
}

impl Args {
    /// 命令行参数优先于配置文件
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(root) = &self.results_root {
            config.results_root = root.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_take_precedence() {
        let args = Args::parse_from([
            "mitm-flow-router",
            "--port",
            "9000",
            "--results-root",
            "/tmp/results",
        ]);
        let mut config = Config::default();
        args.apply_overrides(&mut config);

        assert_eq!(config.port, 9000);
        assert_eq!(config.results_root, PathBuf::from("/tmp/results"));
        assert_eq!(config.host, "0.0.0.0");
        assert!(!args.ingest_stdin);
    }
}
