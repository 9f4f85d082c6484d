use serde::{Deserialize, Serialize};

use crate::models::homework::MathLevel;
use crate::services::video_service::VideoMatch;

/// 小游戏难度
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// 解析显式难度，未知值按 medium 处理
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "easy" => Difficulty::Easy,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Medium,
        }
    }

    pub fn from_math_level(level: MathLevel) -> Self {
        match level {
            MathLevel::Early | MathLevel::Basic => Difficulty::Easy,
            MathLevel::Normal => Difficulty::Medium,
            MathLevel::Advanced => Difficulty::Hard,
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 左侧题目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeftItem {
    pub left: String,
    pub left_id: String,
}

/// 右侧答案（已打乱）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RightItem {
    pub text: String,
    pub id: usize,
}

/// 配对小游戏
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcadeGame {
    pub theme: String,
    pub topic: String,
    pub difficulty: Difficulty,
    pub language: String,
    pub pairs: Vec<LeftItem>,
    pub right_items: Vec<RightItem>,
    pub instructions: String,
    pub shuffle_right_side: bool,
    pub video: Option<VideoMatch>,
}
