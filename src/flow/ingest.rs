//! JSON 行投递入口
//!
//! 代理引擎在独立进程中运行时，可以把每次交换序列化为一行 JSON
//! （字段同 [`ObservedExchange`]）写到本进程的标准输入。

use std::io::BufRead;

use super::model::ObservedExchange;
use super::router::FlowRouter;

/// 逐行读取并分发交换记录，返回成功分发的条数
///
/// 空行忽略；无法解析的行记录日志后跳过，不中断读取。
pub fn ingest_lines<R: BufRead>(reader: R, router: &FlowRouter) -> usize {
    let mut dispatched = 0;

    for (index, line) in reader.lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("读取流量输入失败，停止读取: {}", e);
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<ObservedExchange>(line) {
            Ok(exchange) => {
                router.on_flow_observed(&exchange);
                dispatched += 1;
            }
            Err(e) => tracing::warn!(line = index + 1, "无法解析的流量输入行: {}", e),
        }
    }

    tracing::info!(dispatched, "流量输入已结束");
    dispatched
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::Arc;

    use super::*;
    use crate::flow::model::FlowRecord;
    use crate::flow::registry::StreamRegistry;

    #[test]
    fn test_ingest_skips_blank_and_malformed_lines() {
        let dir = tempfile::tempdir().unwrap();
        let registry = Arc::new(StreamRegistry::new(dir.path()).unwrap());
        let router = FlowRouter::new(registry.clone());

        let input = concat!(
            r#"{"ts":1.5,"method":"GET","scheme":"http","host":"a.example","port":80,"path":"/x","url":"http://a.example/x"}"#,
            "\n",
            "\n",
            "not json\n",
            r#"{"method":"GET"}"#,
            "\n",
            r#"{"ts":2.5,"method":"POST","scheme":"https","host":"b.example","port":443,"path":"/y","url":"https://b.example/y"}"#,
            "\n",
        );

        let count = ingest_lines(Cursor::new(input), &router);
        assert_eq!(count, 2);

        let content = std::fs::read_to_string(registry.default_path()).unwrap();
        let records: Vec<FlowRecord> = content
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].ts, 1.5);
        assert_eq!(records[1].method, "POST");
    }
}
