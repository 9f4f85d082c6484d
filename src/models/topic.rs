use serde::{Deserialize, Serialize};

use crate::models::homework::Operation;

/// 讲解主题
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Topic {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Fractions,
    Decimals,
    Algebra,
    Geometry,
    WordProblem,
    Reading,
    Grammar,
    Science,
    #[default]
    Unknown,
}

/// 主题关键词表，按顺序匹配，先命中者优先
const TOPIC_KEYWORDS: &[(Topic, &[&str])] = &[
    (Topic::Addition, &["addition", "adding", "add", "plus"]),
    (
        Topic::Subtraction,
        &["subtraction", "subtracting", "subtract", "minus", "difference"],
    ),
    (
        Topic::Multiplication,
        &["multiplication", "multiplying", "multiply", "times", "product"],
    ),
    (Topic::Division, &["division", "dividing", "divide", "quotient"]),
    (
        Topic::Fractions,
        &["fractions", "fraction", "half", "third", "quarter"],
    ),
    (Topic::Decimals, &["decimals", "decimal", "point"]),
    (
        Topic::Algebra,
        &["algebra", "algebraic", "variable", "equation"],
    ),
    (
        Topic::Geometry,
        &["geometry", "geometric", "shapes", "angles", "triangle", "circle"],
    ),
    (
        Topic::WordProblem,
        &["word problem", "word-problem", "story problem", "story"],
    ),
    (
        Topic::Reading,
        &["reading", "read", "comprehension", "passage"],
    ),
    (
        Topic::Grammar,
        &["grammar", "grammatical", "sentence", "verb", "noun"],
    ),
    (
        Topic::Science,
        &["science", "scientific", "chemistry", "physics", "biology"],
    ),
];

impl Topic {
    pub fn as_str(self) -> &'static str {
        match self {
            Topic::Addition => "addition",
            Topic::Subtraction => "subtraction",
            Topic::Multiplication => "multiplication",
            Topic::Division => "division",
            Topic::Fractions => "fractions",
            Topic::Decimals => "decimals",
            Topic::Algebra => "algebra",
            Topic::Geometry => "geometry",
            Topic::WordProblem => "word-problem",
            Topic::Reading => "reading",
            Topic::Grammar => "grammar",
            Topic::Science => "science",
            Topic::Unknown => "unknown",
        }
    }

    /// 将 LLM 返回的自由文本主题归一化
    pub fn normalize(raw: &str) -> Self {
        let lower = raw.to_lowercase();
        TOPIC_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|kw| lower.contains(kw)))
            .map(|(topic, _)| *topic)
            .unwrap_or(Topic::Unknown)
    }

    /// 由运算类型得到主题
    pub fn from_operation(operation: Operation) -> Self {
        match operation {
            Operation::Addition => Topic::Addition,
            Operation::Subtraction => Topic::Subtraction,
            Operation::Multiplication => Topic::Multiplication,
            Operation::Division => Topic::Division,
            Operation::Grammar => Topic::Grammar,
            Operation::Reading => Topic::Reading,
            Operation::Unknown => Topic::Unknown,
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
