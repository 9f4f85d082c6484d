use serde::Deserialize;
use std::path::Path;

use crate::error::{AppResult, FileError};

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    /// OCR 与讲解使用的模型
    pub llm_model_name: String,
    /// 科目/年级分类使用的模型
    pub llm_classifier_model: String,
    // --- 视频搜索配置 ---
    pub youtube_api_key: String,
    pub youtube_api_base_url: String,
    // --- 扫描日志 ---
    pub scan_log_file: String,
    /// 日志最多保留的条数
    pub scan_log_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verbose_logging: false,
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o-mini".to_string(),
            llm_classifier_model: "gpt-3.5-turbo".to_string(),
            youtube_api_key: String::new(),
            youtube_api_base_url: "https://www.googleapis.com/youtube/v3".to_string(),
            scan_log_file: "data/scan_logs.json".to_string(),
            scan_log_capacity: 1000,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            llm_api_key: std::env::var("OPENAI_API_KEY").unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            llm_classifier_model: std::env::var("LLM_CLASSIFIER_MODEL").unwrap_or(default.llm_classifier_model),
            youtube_api_key: std::env::var("YOUTUBE_API_KEY").unwrap_or(default.youtube_api_key),
            youtube_api_base_url: std::env::var("YOUTUBE_API_BASE_URL").unwrap_or(default.youtube_api_base_url),
            scan_log_file: std::env::var("SCAN_LOG_FILE").unwrap_or(default.scan_log_file),
            scan_log_capacity: std::env::var("SCAN_LOG_CAPACITY").ok().and_then(|v| v.parse().ok()).unwrap_or(default.scan_log_capacity),
        }
    }

    /// 从 TOML 文件加载配置，缺失的键使用默认值
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| FileError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content, path)
    }

    fn from_toml_str(content: &str, path: &Path) -> AppResult<Self> {
        let config: Config = toml::from_str(content).map_err(|source| FileError::TomlParseFailed {
            path: path.display().to_string(),
            source,
        })?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = Config::from_toml_str(
            r#"
            llm_model_name = "gpt-4o"
            scan_log_capacity = 50
            "#,
            Path::new("inline.toml"),
        )
        .unwrap();

        assert_eq!(config.llm_model_name, "gpt-4o");
        assert_eq!(config.scan_log_capacity, 50);
        assert_eq!(config.llm_classifier_model, "gpt-3.5-turbo");
        assert_eq!(config.scan_log_file, "data/scan_logs.json");
    }

    #[test]
    fn test_toml_file_roundtrip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "verbose_logging = true").unwrap();

        let config = Config::from_toml_file(file.path()).unwrap();
        assert!(config.verbose_logging);
        assert_eq!(config.scan_log_capacity, 1000);
    }

    #[test]
    fn test_invalid_toml_reports_path() {
        let err = Config::from_toml_str("scan_log_capacity = \"many\"", Path::new("bad.toml"))
            .unwrap_err();
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(Config::from_toml_file(Path::new("/definitely/not/here.toml")).is_err());
    }
}
