//! 控制面 API 路由

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::flow::StreamRegistry;

use super::handlers::{clear_output, current_task, not_found, set_output};

/// 控制面共享状态
#[derive(Clone)]
pub struct ControlState {
    pub registry: Arc<StreamRegistry>,
}

/// 创建控制面 API 路由
///
/// # 端点
/// - `POST /set_output` - 切换到任务输出文件
/// - `POST /clear_output` - 回到默认输出文件
/// - `GET /current_task` - 查询当前任务和输出路径
///
/// 其他路径或方法一律返回 404
pub fn create_control_router(registry: Arc<StreamRegistry>) -> Router {
    let state = ControlState { registry };

    Router::new()
        .route("/set_output", post(set_output).fallback(not_found))
        .route("/clear_output", post(clear_output).fallback(not_found))
        .route("/current_task", get(current_task).fallback(not_found))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
