use serde::{Deserialize, Serialize};

/// 回答语言
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Fr,
    De,
    Es,
    Ar,
}

impl Language {
    /// 语言代码
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fr => "fr",
            Language::De => "de",
            Language::Es => "es",
            Language::Ar => "ar",
        }
    }

    /// 用于提示词的英文名称
    pub fn name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Fr => "French",
            Language::De => "German",
            Language::Es => "Spanish",
            Language::Ar => "Arabic",
        }
    }

    /// 从语言代码解析，未知代码回退为英语
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_lowercase().as_str() {
            "fr" => Language::Fr,
            "de" => Language::De,
            "es" => Language::Es,
            "ar" => Language::Ar,
            _ => Language::En,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// 讲解模式：孩子 / 家长
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Kid,
    Parent,
}

impl Mode {
    pub fn from_parent_flag(parent: bool) -> Self {
        if parent {
            Mode::Parent
        } else {
            Mode::Kid
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Kid => "kid",
            Mode::Parent => "parent",
        }
    }

    pub fn is_parent(self) -> bool {
        self == Mode::Parent
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_fallback() {
        assert_eq!(Language::from_code("FR"), Language::Fr);
        assert_eq!(Language::from_code("ar"), Language::Ar);
        assert_eq!(Language::from_code("zh"), Language::En);
        assert_eq!(Language::Es.name(), "Spanish");
    }

    #[test]
    fn test_mode_from_flag() {
        assert_eq!(Mode::from_parent_flag(true), Mode::Parent);
        assert_eq!(Mode::from_parent_flag(false).as_str(), "kid");
    }
}
