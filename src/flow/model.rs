//! 流量记录数据模型

use serde::{Deserialize, Serialize};

/// 代理引擎观察到的一次请求/响应交换
///
/// 只提供只读访问器；路由器不解析也不修改请求/响应体。
pub trait Exchange {
    /// 请求开始时间（Unix 秒，含小数）
    fn timestamp(&self) -> f64;
    fn method(&self) -> &str;
    fn scheme(&self) -> &str;
    fn host(&self) -> &str;
    fn port(&self) -> u16;
    fn path(&self) -> &str;
    /// 完整 URL
    fn url(&self) -> &str;
}

/// 写入 JSONL 的流量记录（每行一条）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowRecord {
    pub ts: f64,
    pub method: String,
    pub scheme: String,
    pub host: String,
    pub port: u16,
    pub path: String,
    pub url: String,
    /// 仅在捕获时存在活跃任务才写入
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
}

impl FlowRecord {
    /// 非有限的时间戳（NaN/inf）无法写成 JSON 数字，用当前时间代替
    pub fn from_exchange<E: Exchange + ?Sized>(exchange: &E, task_id: Option<String>) -> Self {
        let mut ts = exchange.timestamp();
        if !ts.is_finite() {
            tracing::warn!(url = %exchange.url(), "时间戳无效，使用当前时间: {}", ts);
            ts = now_ts();
        }

        Self {
            ts,
            method: exchange.method().to_string(),
            scheme: exchange.scheme().to_string(),
            host: exchange.host().to_string(),
            port: exchange.port(),
            path: exchange.path().to_string(),
            url: exchange.url().to_string(),
            task_id,
        }
    }
}

/// 可反序列化的交换记录，供外部进程通过 JSON 行投递
#[derive(Debug, Clone, Deserialize)]
pub struct ObservedExchange {
    #[serde(default = "now_ts")]
    pub ts: f64,
    pub method: String,
    pub scheme: String,
    pub host: String,
    pub port: u16,
    pub path: String,
    pub url: String,
}

fn now_ts() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

impl Exchange for ObservedExchange {
    fn timestamp(&self) -> f64 {
        self.ts
    }

    fn method(&self) -> &str {
        &self.method
    }

    fn scheme(&self) -> &str {
        &self.scheme
    }

    fn host(&self) -> &str {
        &self.host
    }

    fn port(&self) -> u16 {
        self.port
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn url(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ObservedExchange {
        ObservedExchange {
            ts: 1_700_000_000.25,
            method: "GET".to_string(),
            scheme: "http".to_string(),
            host: "a.example".to_string(),
            port: 80,
            path: "/x".to_string(),
            url: "http://a.example/x".to_string(),
        }
    }

    #[test]
    fn test_record_without_task_omits_field() {
        let record = FlowRecord::from_exchange(&sample(), None);
        let json = serde_json::to_string(&record).unwrap();

        assert!(!json.contains("task_id"));
        assert_eq!(
            json,
            r#"{"ts":1700000000.25,"method":"GET","scheme":"http","host":"a.example","port":80,"path":"/x","url":"http://a.example/x"}"#
        );
    }

    #[test]
    fn test_record_with_task() {
        let record = FlowRecord::from_exchange(&sample(), Some("t1".to_string()));
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["task_id"], "t1");
        assert_eq!(value["port"], 80);
    }

    #[test]
    fn test_infinite_timestamp_replaced_with_now() {
        let mut exchange = sample();
        exchange.ts = f64::INFINITY;

        let record = FlowRecord::from_exchange(&exchange, None);
        assert!(record.ts.is_finite());

        let json = serde_json::to_string(&record).unwrap();
        let back: FlowRecord = serde_json::from_str(&json).unwrap();
        assert!(back.ts > 1_600_000_000.0);
    }

    #[test]
    fn test_observed_exchange_defaults_timestamp() {
        let json = r#"{"method":"POST","scheme":"https","host":"b.example","port":443,"path":"/y","url":"https://b.example/y"}"#;
        let exchange: ObservedExchange = serde_json::from_str(json).unwrap();

        assert!(exchange.timestamp() > 1_600_000_000.0);
        assert_eq!(exchange.method(), "POST");
        assert_eq!(exchange.port(), 443);
    }
}
