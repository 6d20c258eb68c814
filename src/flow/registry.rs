//! 当前任务与输出流的注册表
//!
//! 持有 `(task_id, OutputStream)` 二元组，所有修改都在同一把锁内完成。
//! 新文件的目录创建和打开发生在加锁之前，锁内只做替换，
//! 因此数据面读取当前流时最多只会被一次指针交换阻塞。

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use super::error::RegistryError;
use super::stream::OutputStream;

/// 每个任务目录下的记录文件名
pub const FLOWS_FILE_NAME: &str = "flows.jsonl";

/// 路由状态
struct RouterState {
    task_id: Option<String>,
    stream: Arc<OutputStream>,
}

/// 只读的状态快照（用于诊断和 `/current_task`）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSnapshot {
    pub task_id: Option<String>,
    pub output_path: PathBuf,
}

pub struct StreamRegistry {
    results_root: PathBuf,
    state: Mutex<RouterState>,
}

impl StreamRegistry {
    /// 创建注册表并打开默认输出文件（无活跃任务）
    pub fn new(results_root: impl Into<PathBuf>) -> Result<Self, RegistryError> {
        let results_root = results_root.into();
        let stream = OutputStream::open(default_path(&results_root))?;

        tracing::info!(
            results_root = %results_root.display(),
            output_path = %stream.path().display(),
            "流量记录器已启动，使用默认输出文件"
        );

        Ok(Self {
            results_root,
            state: Mutex::new(RouterState {
                task_id: None,
                stream: Arc::new(stream),
            }),
        })
    }

    /// 任务对应的输出路径：`<results-root>/<task_id>/flows.jsonl`
    pub fn task_path(&self, task_id: &str) -> PathBuf {
        self.results_root.join(task_id).join(FLOWS_FILE_NAME)
    }

    /// 默认输出路径：`<results-root>/flows.jsonl`
    pub fn default_path(&self) -> PathBuf {
        default_path(&self.results_root)
    }

    /// 切换到任务专属输出文件
    ///
    /// 对同一个 task_id 重复调用会重新打开同一文件并继续追加。
    /// 打开失败时保留原输出流，错误返回给调用方。
    pub fn switch_to_task(&self, task_id: &str) -> Result<(), RegistryError> {
        validate_task_id(task_id)?;

        let path = self.task_path(task_id);
        let stream = OutputStream::open(&path).inspect_err(|e| {
            tracing::error!(task_id = %task_id, "切换输出文件失败，保留当前输出: {}", e);
        })?;

        let previous = self.install(Some(task_id.to_string()), stream);

        tracing::info!(
            task_id = %task_id,
            output_path = %path.display(),
            previous_task = ?previous,
            "输出已切换到任务"
        );
        Ok(())
    }

    /// 清除当前任务，切回默认输出文件
    pub fn clear(&self) -> Result<(), RegistryError> {
        let stream = OutputStream::open(self.default_path()).inspect_err(|e| {
            tracing::error!("切回默认输出文件失败，保留当前输出: {}", e);
        })?;

        let previous = self.install(None, stream);

        tracing::info!(previous_task = ?previous, "输出任务已清除，回到默认文件");
        Ok(())
    }

    /// 在锁内安装新的 (task_id, stream)，返回被替换的 task_id
    ///
    /// 旧流在锁外释放；仍持有旧句柄的写入方会在写完后关闭它。
    fn install(&self, task_id: Option<String>, stream: OutputStream) -> Option<String> {
        let new_state = RouterState {
            task_id,
            stream: Arc::new(stream),
        };

        let old_state = {
            let mut state = self.state.lock();
            std::mem::replace(&mut *state, new_state)
        };

        if let Err(e) = old_state.stream.sync() {
            tracing::warn!(
                path = %old_state.stream.path().display(),
                "关闭旧输出文件失败: {}",
                e
            );
        }
        old_state.task_id
    }

    /// 当前状态快照
    pub fn current_snapshot(&self) -> RouteSnapshot {
        let state = self.state.lock();
        RouteSnapshot {
            task_id: state.task_id.clone(),
            output_path: state.stream.path().to_path_buf(),
        }
    }

    /// 当前输出流句柄（写入在锁外进行）
    pub fn current_stream(&self) -> Arc<OutputStream> {
        self.state.lock().stream.clone()
    }

    /// 一次加锁同时读取 task_id 和输出流，保证二者一致
    pub fn current_route(&self) -> (Option<String>, Arc<OutputStream>) {
        let state = self.state.lock();
        (state.task_id.clone(), state.stream.clone())
    }

    /// 正常退出时将当前输出流落盘
    pub fn shutdown(&self) {
        let stream = self.current_stream();
        match stream.sync() {
            Ok(()) => tracing::info!(path = %stream.path().display(), "输出文件已落盘"),
            Err(e) => {
                tracing::error!(path = %stream.path().display(), "退出时落盘失败: {}", e)
            }
        }
    }
}

fn default_path(results_root: &Path) -> PathBuf {
    results_root.join(FLOWS_FILE_NAME)
}

/// task_id 必须非空，且只能作为结果目录下的单级目录名
fn validate_task_id(task_id: &str) -> Result<(), RegistryError> {
    if task_id.is_empty() {
        return Err(RegistryError::EmptyTaskId);
    }
    if task_id == "." || task_id == ".." || task_id.contains(['/', '\\', '\0']) {
        return Err(RegistryError::UnsafeTaskId(task_id.to_string()));
    }
    Ok(())
}
