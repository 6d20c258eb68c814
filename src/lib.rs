//! 代理流量按任务分文件记录
//!
//! - [`flow`]：数据面，把每次观察到的交换写入当前任务的 JSONL 文件
//! - [`control`]：控制面 HTTP API，切换/清除/查询当前任务
//! - [`model`]：配置与命令行参数

pub mod control;
pub mod flow;
pub mod model;
