//! 流量记录路由模块
//!
//! 按当前活跃任务把每条流量写入对应的 JSONL 文件

pub mod error;
pub mod ingest;
pub mod model;
pub mod registry;
pub mod router;
pub mod stream;

pub use error::RegistryError;
pub use model::{Exchange, FlowRecord, ObservedExchange};
pub use registry::{RouteSnapshot, StreamRegistry};
pub use router::{FlowRouter, RouterStats};
pub use stream::OutputStream;
