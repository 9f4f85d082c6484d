//! 作业识别流程 - 流程层
//!
//! 已有文本时的轻量流程：本地结构分析 + LLM 估计科目和年级，
//! 难度按年级推导

use serde::Serialize;
use tracing::info;

use crate::config::Config;
use crate::error::{AppResult, BusinessError};
use crate::models::{GradeLevel, HomeworkStructure, Language, MathLevel, Operation, Skill, Subject, Topic};
use crate::services::homework_analyzer;
use crate::services::{LlmService, SubjectGradeEstimate};
use crate::utils::log_banner;

/// 识别结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionReport {
    pub success: bool,
    pub subject: Subject,
    pub topic: Topic,
    pub operation: Operation,
    pub grade_level: GradeLevel,
    /// 按年级推导的难度
    pub math_level: MathLevel,
    pub digits: u8,
    pub skill: Skill,
    pub numbers: Vec<u64>,
    pub confidence: Option<f64>,
    pub language: Language,
}

impl DetectionReport {
    pub fn assemble(
        structure: HomeworkStructure,
        estimate: SubjectGradeEstimate,
        language: Language,
    ) -> Self {
        Self {
            success: true,
            subject: estimate.subject,
            topic: Topic::from_operation(structure.operation),
            operation: structure.operation,
            grade_level: estimate.grade_level,
            math_level: MathLevel::from_grade(estimate.grade_level),
            digits: structure.digits,
            skill: structure.skill,
            numbers: structure.numbers,
            confidence: estimate.confidence,
            language,
        }
    }
}

/// 作业识别流程
pub struct DetectFlow {
    llm_service: LlmService,
}

impl DetectFlow {
    pub fn new(config: &Config) -> Self {
        Self {
            llm_service: LlmService::new(config),
        }
    }

    pub async fn run(&self, text: &str, language: Language) -> AppResult<DetectionReport> {
        log_banner("🔍 DETECT HOMEWORK");

        if text.trim().is_empty() {
            return Err(BusinessError::MissingText.into());
        }

        let structure = homework_analyzer::analyze(text);
        let estimate = self
            .llm_service
            .classify_subject_grade(text, language)
            .await?;

        let report = DetectionReport::assemble(structure, estimate, language);

        info!("📊 FINAL METADATA");
        info!("   Subject: {}", report.subject);
        info!("   Topic: {}", report.topic);
        info!("   Grade: {}", report.grade_level);
        info!("   Math Level: {}", report.math_level);
        info!("   Digits: {}", report.digits);
        info!("   Skill: {}", report.skill);
        info!("   Confidence: {:?}", report.confidence);

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_math_level_follows_grade_not_digits() {
        let structure = homework_analyzer::analyze("472 + 159");
        assert_eq!(structure.math_level, MathLevel::Normal);

        let estimate = SubjectGradeEstimate {
            subject: Subject::Math,
            grade_level: GradeLevel::new(1),
            confidence: Some(0.9),
        };
        let report = DetectionReport::assemble(structure, estimate, Language::En);

        assert_eq!(report.math_level, MathLevel::Early);
        assert_eq!(report.topic, Topic::Addition);
        assert_eq!(report.skill, Skill::Regrouping);
        assert_eq!(report.digits, 3);
    }

    #[test]
    fn test_unknown_operation_maps_to_unknown_topic() {
        let structure = homework_analyzer::analyze("what is your name?");
        let estimate = SubjectGradeEstimate {
            subject: Subject::Vocabulary,
            grade_level: GradeLevel::new(8),
            confidence: None,
        };
        let report = DetectionReport::assemble(structure, estimate, Language::Fr);

        assert_eq!(report.topic, Topic::Unknown);
        assert_eq!(report.math_level, MathLevel::Advanced);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["language"], "fr");
        assert_eq!(json["grade_level"], "8");
        assert!(json["confidence"].is_null());
    }

    #[tokio::test]
    async fn test_empty_text_is_rejected() {
        let flow = DetectFlow::new(&Config::default());
        let err = flow.run("   ", Language::En).await.unwrap_err();
        assert!(matches!(
            err,
            crate::error::AppError::Business(BusinessError::MissingText)
        ));
    }
}
