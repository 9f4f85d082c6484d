use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::locale::Mode;

/// 单条扫描日志（只保存摘要，不含作业内容）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanLogEntry {
    pub timestamp: DateTime<Utc>,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub mode: Mode,
    #[serde(default = "default_topic")]
    pub topic: String,
    #[serde(default = "default_grade_level")]
    pub grade_level: String,
    #[serde(default = "default_subject")]
    pub subject: String,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_topic() -> String {
    "unknown".to_string()
}

fn default_grade_level() -> String {
    "2".to_string()
}

fn default_subject() -> String {
    "math".to_string()
}

impl ScanLogEntry {
    /// 以当前时间创建日志
    pub fn now(
        language: impl Into<String>,
        mode: Mode,
        topic: impl Into<String>,
        grade_level: impl Into<String>,
        subject: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            language: language.into(),
            mode,
            topic: topic.into(),
            grade_level: grade_level.into(),
            subject: subject.into(),
        }
    }
}

/// 后台统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanStats {
    /// 最近 24 小时
    pub today: usize,
    /// 最近 7 天
    pub week: usize,
    pub total: usize,
    pub subjects: BTreeMap<String, usize>,
    pub modes: BTreeMap<String, usize>,
    /// 最近 10 条，最新的在前
    pub recent: Vec<ScanLogEntry>,
}

impl ScanStats {
    const RECENT_LIMIT: usize = 10;

    pub fn from_entries(entries: &[ScanLogEntry], now: DateTime<Utc>) -> Self {
        let one_day = Duration::days(1);
        let one_week = Duration::days(7);

        let mut today = 0;
        let mut week = 0;
        let mut subjects: BTreeMap<String, usize> = BTreeMap::new();
        let mut modes: BTreeMap<String, usize> = BTreeMap::new();
        modes.insert(Mode::Kid.as_str().to_string(), 0);
        modes.insert(Mode::Parent.as_str().to_string(), 0);

        for entry in entries {
            let age = now - entry.timestamp;
            if age < one_day {
                today += 1;
            }
            if age < one_week {
                week += 1;
            }

            *subjects.entry(entry.subject.clone()).or_insert(0) += 1;
            *modes.entry(entry.mode.as_str().to_string()).or_insert(0) += 1;
        }

        let recent = entries
            .iter()
            .rev()
            .take(Self::RECENT_LIMIT)
            .cloned()
            .collect();

        Self {
            today,
            week,
            total: entries.len(),
            subjects,
            modes,
            recent,
        }
    }
}
