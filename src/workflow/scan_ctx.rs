//! 扫描处理上下文
//!
//! 封装"用哪种语言、给谁讲"这一信息

use std::fmt::Display;

use crate::models::{Language, Mode};

/// 扫描处理上下文
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanCtx {
    /// 回答语言
    pub language: Language,

    /// 孩子 / 家长模式
    pub mode: Mode,
}

impl ScanCtx {
    pub fn new(language: Language, mode: Mode) -> Self {
        Self { language, mode }
    }

    /// 从请求参数创建（语言代码 + 是否家长模式）
    pub fn from_request(lang: &str, parent: bool) -> Self {
        Self::new(Language::from_code(lang), Mode::from_parent_flag(parent))
    }
}

impl Display for ScanCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[模式 {} | 语言 {}]",
            self.mode.as_str().to_uppercase(),
            self.language
        )
    }
}
