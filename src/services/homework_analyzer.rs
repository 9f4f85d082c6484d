//! 作业结构分析 - 业务能力层
//!
//! 把 OCR 得到的作业文本解析为结构化分类：运算类型、数字位数、技能标记、
//! 出现的数字以及按位数推导的难度。
//!
//! 纯函数，无 I/O、无共享可变状态，任何输入都不会失败：
//! 无法解析时返回安全默认值。
//!
//! 处理阶段：normalize → extract numbers → operation → digits → skill → math level

use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::models::homework::{HomeworkStructure, MathLevel, Operation, Skill};

/// 仅匹配 ASCII 数字
static NUMBER_RE: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"[0-9]+"));

/// OCR 常见的排版破折号：en dash、em dash、minus sign
const DASH_VARIANTS: [char; 3] = ['\u{2013}', '\u{2014}', '\u{2212}'];

/// 分析作业文本
///
/// # 参数
/// - `text`: OCR 提取的原始文本
///
/// # 返回
/// 结构化分类结果；空文本或乱码返回安全默认值
pub fn analyze(text: &str) -> HomeworkStructure {
    let normalized = normalize(text);

    let Some(runs) = extract_digit_runs(&normalized) else {
        return HomeworkStructure::default();
    };
    let numbers: Vec<u64> = runs.iter().map(|run| parse_run(run)).collect();

    let operation = classify_operation(&normalized);
    let digits = classify_digits(&numbers);
    let skill = classify_skill(operation, digits, &runs);

    debug!(
        "作业结构: operation={}, digits={}, skill={:?}, numbers={}",
        operation,
        digits,
        skill.as_str(),
        numbers.len()
    );

    HomeworkStructure {
        operation,
        digits,
        skill,
        numbers,
        math_level: MathLevel::from_digits(digits),
    }
}

/// 边界形式：接受任意 JSON 值，非字符串（含 null）返回安全默认值
pub fn analyze_value(value: &serde_json::Value) -> HomeworkStructure {
    match value.as_str() {
        Some(text) => analyze(text),
        None => HomeworkStructure::default(),
    }
}

/// 直接从文本推导难度（按位数）
pub fn detect_math_level(text: &str) -> MathLevel {
    MathLevel::from_digits(analyze(text).digits)
}

// ========== 各阶段 ==========

fn normalize(text: &str) -> String {
    text.replace(DASH_VARIANTS, "-")
}

/// 按出现顺序提取连续数字串
fn extract_digit_runs(normalized: &str) -> Option<Vec<&str>> {
    match &*NUMBER_RE {
        Ok(re) => Some(re.find_iter(normalized).map(|m| m.as_str()).collect()),
        Err(e) => {
            warn!("数字正则不可用，返回默认结构: {}", e);
            None
        }
    }
}

/// 数字串只含 ASCII 数字，失败只可能是溢出
fn parse_run(run: &str) -> u64 {
    run.parse::<u64>().unwrap_or(u64::MAX)
}

fn classify_operation(normalized: &str) -> Operation {
    if normalized.contains('-') && !normalized.contains("--") {
        return Operation::Subtraction;
    }
    if normalized.contains('+') {
        return Operation::Addition;
    }
    if normalized.contains(['×', '*']) {
        return Operation::Multiplication;
    }
    if normalized.contains(['÷', '/']) {
        return Operation::Division;
    }

    let lower = normalized.to_lowercase();
    if lower.contains("grammar") || lower.contains("verb") {
        return Operation::Grammar;
    }
    if lower.contains("read") {
        return Operation::Reading;
    }

    Operation::Unknown
}

fn classify_digits(numbers: &[u64]) -> u8 {
    match numbers.iter().max() {
        Some(&max) if max >= 100 => 3,
        Some(&max) if max >= 10 => 2,
        _ => 1,
    }
}

fn classify_skill(operation: Operation, digits: u8, runs: &[&str]) -> Skill {
    if digits < 2 {
        return Skill::None;
    }

    match operation {
        Operation::Subtraction => match runs {
            [first, second, ..] if needs_borrowing(first, second) => Skill::Borrowing,
            _ => Skill::None,
        },
        Operation::Addition => Skill::Regrouping,
        Operation::Multiplication => Skill::MultiDigit,
        _ => Skill::None,
    }
}

/// 简化的退位判断：左对齐逐位比较，不做借位传递
///
/// 只比较第一个数的长度范围，第二个数缺失的位置跳过。
/// 位数不同时结果与真实借位无关，例如 100 − 91 是因为首位 1 < 9 才命中。
fn needs_borrowing(minuend: &str, subtrahend: &str) -> bool {
    let minuend = strip_leading_zeros(minuend);
    let subtrahend = strip_leading_zeros(subtrahend);

    minuend
        .bytes()
        .zip(subtrahend.bytes())
        .any(|(top, bottom)| top < bottom)
}

/// "007" → "7"，"000" → "0"
fn strip_leading_zeros(run: &str) -> &str {
    let trimmed = run.trim_start_matches('0');
    if trimmed.is_empty() {
        "0"
    } else {
        trimmed
    }
}
