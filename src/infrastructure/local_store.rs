//! 本地存储 - 基础设施层
//!
//! 持有唯一的存储文件，只暴露"按键读写字符串"的能力，
//! 相当于浏览器的 localStorage。

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use crate::error::StorageError;
use crate::models::CaseRecord;

/// 当前案例所在的键
pub const CASE_KEY: &str = "casoISO9001";

/// 本地存储
///
/// 职责：
/// - 持有存储文件路径
/// - 以 JSON 对象保存字符串键值
/// - 每次写入都整体落盘（先写临时文件再重命名）
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 读取某个键的值
    pub async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut entries = self.read_all().await?;
        Ok(entries.remove(key))
    }

    /// 写入某个键的值
    pub async fn set(&self, key: &str, value: impl Into<String>) -> Result<(), StorageError> {
        let mut entries = self.read_all().await?;
        entries.insert(key.to_string(), value.into());
        self.write_all(&entries).await
    }

    /// 删除某个键
    pub async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.read_all().await?;
        if entries.remove(key).is_some() {
            self.write_all(&entries).await?;
        }
        Ok(())
    }

    /// 保存当前案例
    pub async fn save_case(&self, case: &CaseRecord) -> Result<(), StorageError> {
        let encoded = case.to_stored().map_err(StorageError::Encode)?;
        self.set(CASE_KEY, encoded).await?;
        debug!("案例已保存 (自定义: {})", case.is_custom);
        Ok(())
    }

    /// 读取当前案例，兼容旧的纯文本格式
    pub async fn load_case(&self) -> Result<Option<CaseRecord>, StorageError> {
        Ok(self
            .get(CASE_KEY)
            .await?
            .map(|raw| CaseRecord::from_stored(&raw)))
    }

    async fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(StorageError::ReadFailed {
                    path: self.path.display().to_string(),
                    source: e,
                })
            }
        };

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content).map_err(|e| StorageError::Corrupted {
            path: self.path.display().to_string(),
            source: e,
        })
    }

    async fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let write_err = |e: std::io::Error| StorageError::WriteFailed {
            path: self.path.display().to_string(),
            source: e,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(write_err)?;
        }

        let content = serde_json::to_string_pretty(entries).map_err(StorageError::Encode)?;
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, content).await.map_err(write_err)?;
        fs::rename(&tmp_path, &self.path).await.map_err(write_err)?;
        Ok(())
    }
}
