//! 输出流切换错误类型

use std::path::PathBuf;

use axum::http::StatusCode;

/// StreamRegistry 操作错误
#[derive(Debug)]
pub enum RegistryError {
    /// task_id 为空
    EmptyTaskId,
    /// task_id 会逃逸出结果目录（含路径分隔符或为 `.` / `..`）
    UnsafeTaskId(String),
    /// 创建目录失败
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    /// 打开输出文件失败
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl RegistryError {
    /// 输入校验错误返回 400，资源错误返回 500
    pub fn status_code(&self) -> StatusCode {
        match self {
            RegistryError::EmptyTaskId | RegistryError::UnsafeTaskId(_) => StatusCode::BAD_REQUEST,
            RegistryError::CreateDir { .. } | RegistryError::Open { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::EmptyTaskId => write!(f, "task_id must not be empty"),
            RegistryError::UnsafeTaskId(id) => write!(f, "task_id is not a plain name: {:?}", id),
            RegistryError::CreateDir { path, source } => {
                write!(f, "failed to create directory {}: {}", path.display(), source)
            }
            RegistryError::Open { path, source } => {
                write!(f, "failed to open {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for RegistryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegistryError::CreateDir { source, .. } | RegistryError::Open { source, .. } => {
                Some(source)
            }
            _ => None,
        }
    }
}
