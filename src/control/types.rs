//! 控制面 API 响应类型

use serde::Serialize;

/// POST /set_output 成功响应
#[derive(Debug, Serialize)]
pub struct SetOutputResponse {
    pub status: &'static str,
    pub task_id: String,
}

impl SetOutputResponse {
    pub fn ok(task_id: impl Into<String>) -> Self {
        Self {
            status: "ok",
            task_id: task_id.into(),
        }
    }
}

/// POST /clear_output 成功响应
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self { status: "ok" }
    }
}

/// GET /current_task 响应（无任务时 task_id 为 null）
#[derive(Debug, Serialize)]
pub struct CurrentTaskResponse {
    pub task_id: Option<String>,
    pub output_path: String,
}

/// 错误响应
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
}

impl ErrorResponse {
    pub fn task_id_required() -> Self {
        Self {
            error: "task_id required",
        }
    }

    pub fn invalid_task_id() -> Self {
        Self {
            error: "invalid task_id",
        }
    }

    pub fn internal() -> Self {
        Self {
            error: "internal error",
        }
    }
}
