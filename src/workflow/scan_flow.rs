//! 作业扫描流程 - 流程层
//!
//! 核心职责：定义"一张作业照片"的完整处理流程
//!
//! 流程顺序：
//! 1. OCR 提取文字
//! 2. 本地结构分析（运算、位数、技能）
//! 3. LLM 生成讲解
//! 4. 写扫描日志（失败不影响结果）

use serde::Serialize;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{AppResult, BusinessError};
use crate::models::{
    GradeLevel, HomeworkStructure, MathLevel, Mode, Operation, ScanLogEntry, Skill, Subject, Topic,
};
use crate::services::homework_analyzer;
use crate::services::{Explanation, LlmService, ScanLogStore};
use crate::utils::{log_banner, truncate_text};
use crate::workflow::scan_ctx::ScanCtx;

/// 提取文本的最短长度（去除首尾空白后）
const MIN_TEXT_LEN: usize = 5;

/// 扫描结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanReport {
    pub success: bool,
    pub extracted_text: String,
    pub simple_answer: String,
    pub explanation: String,
    pub detailed_steps: String,
    pub fun_tip: String,
    pub topic: Topic,
    pub detected_math_level: MathLevel,
    pub mode: Mode,
    pub operation: Operation,
    pub digits: u8,
    pub skill: Skill,
    pub numbers: Vec<u64>,
    pub grade_level: GradeLevel,
    pub subject: Subject,
}

impl ScanReport {
    /// 合并 OCR 文本、结构分析和讲解
    pub fn assemble(
        extracted_text: String,
        structure: HomeworkStructure,
        explanation: Explanation,
        mode: Mode,
    ) -> Self {
        Self {
            success: true,
            extracted_text,
            simple_answer: explanation.simple_answer,
            explanation: explanation.explanation,
            detailed_steps: explanation.detailed_steps,
            fun_tip: explanation.fun_tip,
            topic: explanation.topic,
            detected_math_level: structure.math_level,
            mode,
            operation: structure.operation,
            digits: structure.digits,
            skill: structure.skill,
            numbers: structure.numbers,
            grade_level: GradeLevel::new(2),
            subject: Subject::Math,
        }
    }

    /// 只保存摘要的日志条目
    pub fn log_entry(&self, ctx: &ScanCtx) -> ScanLogEntry {
        ScanLogEntry::now(
            ctx.language.code(),
            ctx.mode,
            self.topic.as_str(),
            self.grade_level.label(),
            self.subject.name(),
        )
    }
}

/// 作业扫描流程
///
/// - 编排 OCR → 分析 → 讲解 → 记日志
/// - 只依赖业务能力（services）
pub struct ScanFlow {
    llm_service: LlmService,
    scan_log: ScanLogStore,
}

impl ScanFlow {
    pub fn new(config: &Config) -> Self {
        Self {
            llm_service: LlmService::new(config),
            scan_log: ScanLogStore::new(config),
        }
    }

    pub async fn run(&self, image: &[u8], ctx: &ScanCtx) -> AppResult<ScanReport> {
        log_banner(&format!("📋 NEW SCAN {}", ctx));

        if image.is_empty() {
            return Err(BusinessError::EmptyImage.into());
        }

        // ========== 1. OCR ==========
        let extracted_text = self.llm_service.extract_text(image).await?;
        let trimmed_len = extracted_text.trim().chars().count();
        if trimmed_len < MIN_TEXT_LEN {
            warn!("{} ⚠️ 提取的文字过短: {} 字符", ctx, trimmed_len);
            return Err(BusinessError::TextTooShort { len: trimmed_len }.into());
        }
        info!("{} 📋 Preview: {}", ctx, truncate_text(&extracted_text, 100));

        // ========== 2. 结构分析 ==========
        let structure = homework_analyzer::analyze(&extracted_text);
        info!(
            "{} ✅ Metadata: operation={} digits={} skill={}",
            ctx, structure.operation, structure.digits, structure.skill
        );

        // ========== 3. 讲解 ==========
        let explanation = self
            .llm_service
            .generate_explanation(&extracted_text, ctx.language, ctx.mode)
            .await?;

        let report = ScanReport::assemble(extracted_text, structure, explanation, ctx.mode);

        // ========== 4. 日志 ==========
        match self.scan_log.append(report.log_entry(ctx)).await {
            Ok(()) => info!("{} ✅ Scan logged", ctx),
            Err(e) => warn!("{} ❌ Failed to save scan log: {}", ctx, e),
        }

        info!(
            "{} ✅ SUCCESS! topic={} math_level={}",
            ctx, report.topic, report.detected_math_level
        );
        Ok(report)
    }
}
