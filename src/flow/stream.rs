//! 追加写入的输出流
//!
//! 每个 OutputStream 绑定一个文件路径，以追加模式打开（不存在则创建，绝不截断）。
//! 每次写入一整行并立即交给操作系统，不在进程内缓冲。
//!
//! 文件句柄在最后一个持有者释放时关闭：切换任务后仍持有旧句柄的写入方
//! 会把这一条记录写进旧文件，而不会丢失。

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use super::error::RegistryError;

pub struct OutputStream {
    path: PathBuf,
    file: Mutex<File>,
}

impl OutputStream {
    /// 打开（必要时创建）输出文件，父目录不存在时一并创建
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, RegistryError> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| RegistryError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| RegistryError::Open {
                path: path.clone(),
                source,
            })?;

        tracing::debug!(path = %path.display(), "输出文件已打开");

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 写入一行（自动追加换行符）并刷新
    ///
    /// 整行通过一次 `write_all` 写出，同一文件上的并发写入不会交错。
    pub fn write_line(&self, line: &str) -> std::io::Result<()> {
        let mut buf = Vec::with_capacity(line.len() + 1);
        buf.extend_from_slice(line.as_bytes());
        buf.push(b'\n');

        let mut file = self.file.lock();
        file.write_all(&buf)?;
        file.flush()
    }

    /// 将已写入的数据同步到磁盘（用于正常退出路径）
    pub fn sync(&self) -> std::io::Result<()> {
        let mut file = self.file.lock();
        file.flush()?;
        file.sync_data()
    }
}

impl std::fmt::Debug for OutputStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputStream")
            .field("path", &self.path)
            .finish()
    }
}

impl Drop for OutputStream {
    fn drop(&mut self) {
        if let Err(e) = self.file.get_mut().flush() {
            tracing::warn!(path = %self.path.display(), "关闭输出文件时刷新失败: {}", e);
        }
        tracing::debug!(path = %self.path.display(), "输出文件已关闭");
    }
}
