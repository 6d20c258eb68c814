//! 任务输出控制 API
//!
//! 供外部编排方在任务开始/结束时切换流量输出文件

mod handlers;
mod router;
mod server;
mod types;

pub use router::{ControlState, create_control_router};
pub use server::{serve_control_api, shutdown_signal};
