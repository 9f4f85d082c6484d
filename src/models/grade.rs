use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// 年级（0 表示幼儿园 K）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GradeLevel(u8);

impl GradeLevel {
    pub const KINDERGARTEN: GradeLevel = GradeLevel(0);

    pub fn new(value: u8) -> Self {
        Self(value)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// 解析年级字符串
    ///
    /// - "K" / "k" → 0
    /// - 取首部整数："3rd" → 3，"10" → 10
    /// - 无法解析或为负数 → 0
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("k") {
            return Self::KINDERGARTEN;
        }

        let (negative, rest) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };

        let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() || negative {
            return Self::KINDERGARTEN;
        }

        // 超出范围的年级一律视为最高
        Self(digits.parse::<u8>().unwrap_or(u8::MAX))
    }

    /// 展示用标签："K" 或数字
    pub fn label(self) -> String {
        if self.0 == 0 {
            "K".to_string()
        } else {
            self.0.to_string()
        }
    }
}

impl std::fmt::Display for GradeLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Serialize for GradeLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}

impl<'de> Deserialize<'de> for GradeLevel {
    /// LLM 可能返回字符串或数字，两者都接受
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match value {
            serde_json::Value::String(s) => GradeLevel::parse(&s),
            serde_json::Value::Number(n) => match n.as_u64() {
                Some(v) => GradeLevel(u8::try_from(v).unwrap_or(u8::MAX)),
                None => GradeLevel::KINDERGARTEN,
            },
            _ => GradeLevel::KINDERGARTEN,
        })
    }
}
