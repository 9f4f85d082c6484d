//! 扫描日志服务 - 业务能力层
//!
//! 只负责"记一条扫描摘要"和"读出统计"能力，不保存作业内容

use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, FileError};
use crate::models::{ScanLogEntry, ScanStats};

/// 扫描日志存储
///
/// 职责：
/// - 追加单条日志，只保留最近 `capacity` 条
/// - 文件损坏时从空列表重新开始
/// - 同一进程内的追加串行执行
pub struct ScanLogStore {
    path: PathBuf,
    capacity: usize,
    lock: Mutex<()>,
}

impl ScanLogStore {
    pub fn new(config: &Config) -> Self {
        Self::with_path(&config.scan_log_file, config.scan_log_capacity)
    }

    /// 使用自定义文件路径创建
    pub fn with_path(path: impl AsRef<Path>, capacity: usize) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            capacity,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 追加一条日志
    pub async fn append(&self, entry: ScanLogEntry) -> AppResult<()> {
        let _guard = self.lock.lock().await;

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| AppError::file_write_failed(dir.display().to_string(), e))?;
        }

        // 按原始 JSON 保存，不认识的记录原样保留
        let mut raw = match self.read_raw().await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("⚠️ 扫描日志无法读取，重新开始: {}", e);
                Vec::new()
            }
        };

        let value = serde_json::to_value(&entry).map_err(|source| FileError::JsonFailed {
            path: self.display_path(),
            source,
        })?;
        raw.push(value);
        if raw.len() > self.capacity {
            let excess = raw.len() - self.capacity;
            raw.drain(..excess);
        }

        let json = serde_json::to_string_pretty(&raw).map_err(|source| FileError::JsonFailed {
            path: self.display_path(),
            source,
        })?;

        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| AppError::file_write_failed(self.display_path(), e))?;

        debug!("扫描日志已写入: {} 条", raw.len());
        Ok(())
    }

    /// 读取全部日志，文件不存在时返回空列表
    ///
    /// 文件不是 JSON 数组时报错；数组中无法识别的记录会被跳过
    pub async fn load(&self) -> AppResult<Vec<ScanLogEntry>> {
        let _guard = self.lock.lock().await;
        let raw = self.read_raw().await?;
        Ok(decode_entries(raw))
    }

    /// 统计当前日志，文件无法读取时按空日志统计
    pub async fn stats(&self) -> ScanStats {
        let entries = match self.load().await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("⚠️ 扫描日志无法读取，按空日志统计: {}", e);
                Vec::new()
            }
        };
        ScanStats::from_entries(&entries, Utc::now())
    }

    async fn read_raw(&self) -> AppResult<Vec<serde_json::Value>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(AppError::file_read_failed(self.display_path(), e)),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|source| {
            FileError::JsonFailed {
                path: self.display_path(),
                source,
            }
            .into()
        })
    }

    fn display_path(&self) -> String {
        self.path.display().to_string()
    }
}

/// 逐条解析，跳过无法识别的记录
fn decode_entries(raw: Vec<serde_json::Value>) -> Vec<ScanLogEntry> {
    let total = raw.len();
    let entries: Vec<ScanLogEntry> = raw
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect();

    if entries.len() < total {
        warn!("⚠️ 跳过 {} 条无法识别的扫描日志", total - entries.len());
    }
    entries
}
