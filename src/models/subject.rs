/// 科目枚举（由分类 LLM 给出）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    /// 数学
    #[default]
    Math,
    /// 阅读
    Reading,
    /// 拼读
    Phonics,
    /// 词汇
    Vocabulary,
    /// 语法
    Grammar,
    /// 反义词
    Antonym,
    /// 同义词
    Synonym,
}

impl Subject {
    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            Subject::Math => "math",
            Subject::Reading => "reading",
            Subject::Phonics => "phonics",
            Subject::Vocabulary => "vocabulary",
            Subject::Grammar => "grammar",
            Subject::Antonym => "antonym",
            Subject::Synonym => "synonym",
        }
    }

    /// 尝试从字符串解析科目（精确匹配）
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "math" | "maths" | "mathematics" => Some(Subject::Math),
            "reading" => Some(Subject::Reading),
            "phonics" => Some(Subject::Phonics),
            "vocabulary" => Some(Subject::Vocabulary),
            "grammar" => Some(Subject::Grammar),
            "antonym" | "antonyms" => Some(Subject::Antonym),
            "synonym" | "synonyms" => Some(Subject::Synonym),
            _ => None,
        }
    }

    /// 智能查找科目（支持模糊匹配）
    pub fn find(s: &str) -> Option<Self> {
        // 先尝试精确匹配
        if let Some(subject) = Self::from_str(s) {
            return Some(subject);
        }

        // 模糊匹配
        let s_lower = s.to_lowercase();
        if s_lower.contains("math") {
            return Some(Subject::Math);
        }
        if s_lower.contains("phonic") {
            return Some(Subject::Phonics);
        }
        if s_lower.contains("read") {
            return Some(Subject::Reading);
        }
        if s_lower.contains("vocab") {
            return Some(Subject::Vocabulary);
        }
        if s_lower.contains("grammar") {
            return Some(Subject::Grammar);
        }
        if s_lower.contains("antonym") || s_lower.contains("opposite") {
            return Some(Subject::Antonym);
        }
        if s_lower.contains("synonym") {
            return Some(Subject::Synonym);
        }

        None
    }
}

impl std::fmt::Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
