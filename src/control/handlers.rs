//! 控制面 API 处理器

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use crate::flow::RegistryError;

use super::router::ControlState;
use super::types::{CurrentTaskResponse, ErrorResponse, SetOutputResponse, StatusResponse};

/// POST /set_output
/// 切换到任务专属输出文件，body: `{"task_id": "xxx"}`
pub async fn set_output(State(state): State<ControlState>, body: Bytes) -> Response {
    let payload: serde_json::Value = if body.is_empty() {
        serde_json::Value::Null
    } else {
        match serde_json::from_slice(&body) {
            Ok(v) => v,
            Err(e) => {
                tracing::error!("set_output 请求体解析失败: {}", e);
                return internal_error();
            }
        }
    };

    let task_id = match payload.get("task_id").and_then(|v| v.as_str()) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => {
            return (StatusCode::BAD_REQUEST, Json(ErrorResponse::task_id_required()))
                .into_response();
        }
    };

    let registry = state.registry.clone();
    let id = task_id.clone();
    match tokio::task::spawn_blocking(move || registry.switch_to_task(&id)).await {
        Ok(Ok(())) => Json(SetOutputResponse::ok(task_id)).into_response(),
        Ok(Err(e)) => registry_error_response(&e),
        Err(e) => {
            tracing::error!("切换输出任务执行失败: {}", e);
            internal_error()
        }
    }
}

/// POST /clear_output
/// 清除当前任务，回到默认文件（忽略请求体）
pub async fn clear_output(State(state): State<ControlState>) -> Response {
    let registry = state.registry.clone();
    match tokio::task::spawn_blocking(move || registry.clear()).await {
        Ok(Ok(())) => Json(StatusResponse::ok()).into_response(),
        Ok(Err(e)) => registry_error_response(&e),
        Err(e) => {
            tracing::error!("清除输出任务执行失败: {}", e);
            internal_error()
        }
    }
}

/// GET /current_task
pub async fn current_task(State(state): State<ControlState>) -> impl IntoResponse {
    let snapshot = state.registry.current_snapshot();
    Json(CurrentTaskResponse {
        task_id: snapshot.task_id,
        output_path: snapshot.output_path.display().to_string(),
    })
}

/// 未知路径或方法
pub async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

fn registry_error_response(e: &RegistryError) -> Response {
    let body = match e {
        RegistryError::EmptyTaskId => ErrorResponse::task_id_required(),
        RegistryError::UnsafeTaskId(_) => {
            tracing::warn!("拒绝切换输出任务: {}", e);
            ErrorResponse::invalid_task_id()
        }
        // 细节已在 StreamRegistry 中记录，不回传给调用方
        RegistryError::CreateDir { .. } | RegistryError::Open { .. } => ErrorResponse::internal(),
    };
    (e.status_code(), Json(body)).into_response()
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::internal()),
    )
        .into_response()
}
