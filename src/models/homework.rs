use serde::{Deserialize, Serialize};

use crate::models::grade::GradeLevel;

/// 作业运算类型
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// 加法
    Addition,
    /// 减法
    Subtraction,
    /// 乘法
    Multiplication,
    /// 除法
    Division,
    /// 语法
    Grammar,
    /// 阅读
    Reading,
    /// 无法识别
    #[default]
    Unknown,
}

impl Operation {
    /// 获取标准名称
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Addition => "addition",
            Operation::Subtraction => "subtraction",
            Operation::Multiplication => "multiplication",
            Operation::Division => "division",
            Operation::Grammar => "grammar",
            Operation::Reading => "reading",
            Operation::Unknown => "unknown",
        }
    }

    /// 从标准名称解析（忽略大小写和首尾空白）
    pub fn find(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "addition" => Some(Operation::Addition),
            "subtraction" => Some(Operation::Subtraction),
            "multiplication" => Some(Operation::Multiplication),
            "division" => Some(Operation::Division),
            "grammar" => Some(Operation::Grammar),
            "reading" => Some(Operation::Reading),
            "unknown" => Some(Operation::Unknown),
            _ => None,
        }
    }

    /// 是否为算术运算
    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            Operation::Addition
                | Operation::Subtraction
                | Operation::Multiplication
                | Operation::Division
        )
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 细分技能标记
///
/// `None` 序列化为空字符串
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Skill {
    #[default]
    #[serde(rename = "")]
    None,
    /// 退位减法
    #[serde(rename = "borrowing")]
    Borrowing,
    /// 进位加法
    #[serde(rename = "regrouping")]
    Regrouping,
    /// 多位数乘法
    #[serde(rename = "multi_digit")]
    MultiDigit,
}

impl Skill {
    pub fn as_str(self) -> &'static str {
        match self {
            Skill::None => "",
            Skill::Borrowing => "borrowing",
            Skill::Regrouping => "regrouping",
            Skill::MultiDigit => "multi_digit",
        }
    }

    pub fn find(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "borrowing" => Skill::Borrowing,
            "regrouping" => Skill::Regrouping,
            "multi_digit" => Skill::MultiDigit,
            _ => Skill::None,
        }
    }

    pub fn is_empty(self) -> bool {
        self == Skill::None
    }
}

impl std::fmt::Display for Skill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 数学难度等级
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MathLevel {
    Early,
    #[default]
    Basic,
    Normal,
    Advanced,
}

impl MathLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            MathLevel::Early => "early",
            MathLevel::Basic => "basic",
            MathLevel::Normal => "normal",
            MathLevel::Advanced => "advanced",
        }
    }

    pub fn find(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "early" => Some(MathLevel::Early),
            "basic" => Some(MathLevel::Basic),
            "normal" => Some(MathLevel::Normal),
            "advanced" => Some(MathLevel::Advanced),
            _ => None,
        }
    }

    /// 按数字位数推导难度（尚无年级估计时使用）
    ///
    /// 1 位 → early，2 位 → basic，3 位及以上 → normal，其他 → basic
    pub fn from_digits(digits: u8) -> Self {
        match digits {
            1 => MathLevel::Early,
            2 => MathLevel::Basic,
            d if d >= 3 => MathLevel::Normal,
            _ => MathLevel::Basic,
        }
    }

    /// 按年级推导难度（已从外部分类器拿到年级后使用）
    pub fn from_grade(grade: GradeLevel) -> Self {
        match grade.value() {
            0..=1 => MathLevel::Early,
            2..=3 => MathLevel::Basic,
            4..=7 => MathLevel::Normal,
            _ => MathLevel::Advanced,
        }
    }

    /// 直接从年级字符串推导，如 "K"、"3rd"
    pub fn from_grade_str(grade: &str) -> Self {
        Self::from_grade(GradeLevel::parse(grade))
    }
}

impl std::fmt::Display for MathLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 作业结构分析结果
///
/// 每次分析都会生成新值，由调用方独占
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeworkStructure {
    pub operation: Operation,
    /// 最大数字的位数等级（1、2、3）
    pub digits: u8,
    pub skill: Skill,
    /// 文本中出现的所有数字（按出现顺序）
    pub numbers: Vec<u64>,
    /// 按位数推导的难度
    pub math_level: MathLevel,
}

impl Default for HomeworkStructure {
    fn default() -> Self {
        Self {
            operation: Operation::Unknown,
            digits: 1,
            skill: Skill::None,
            numbers: Vec::new(),
            math_level: MathLevel::from_digits(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_math_level_from_digits() {
        assert_eq!(MathLevel::from_digits(1), MathLevel::Early);
        assert_eq!(MathLevel::from_digits(2), MathLevel::Basic);
        assert_eq!(MathLevel::from_digits(3), MathLevel::Normal);
        assert_eq!(MathLevel::from_digits(7), MathLevel::Normal);
        assert_eq!(MathLevel::from_digits(0), MathLevel::Basic);
    }

    #[test]
    fn test_math_level_from_grade_str() {
        assert_eq!(MathLevel::from_grade_str("K"), MathLevel::Early);
        assert_eq!(MathLevel::from_grade_str("1"), MathLevel::Early);
        assert_eq!(MathLevel::from_grade_str("3"), MathLevel::Basic);
        assert_eq!(MathLevel::from_grade_str("7"), MathLevel::Normal);
        assert_eq!(MathLevel::from_grade_str("9"), MathLevel::Advanced);
        assert_eq!(MathLevel::from_grade_str("3rd"), MathLevel::Basic);
        assert_eq!(MathLevel::from_grade_str("banana"), MathLevel::Early);
    }

    #[test]
    fn test_skill_serializes_as_plain_string() {
        assert_eq!(serde_json::to_string(&Skill::None).unwrap(), "\"\"");
        assert_eq!(
            serde_json::to_string(&Skill::MultiDigit).unwrap(),
            "\"multi_digit\""
        );
        let skill: Skill = serde_json::from_str("\"borrowing\"").unwrap();
        assert_eq!(skill, Skill::Borrowing);
    }

    #[test]
    fn test_structure_json_shape() {
        let value = serde_json::to_value(HomeworkStructure::default()).unwrap();
        assert_eq!(value["operation"], "unknown");
        assert_eq!(value["digits"], 1);
        assert_eq!(value["skill"], "");
        assert_eq!(value["numbers"], serde_json::json!([]));
        assert_eq!(value["mathLevel"], "early");
    }
}
