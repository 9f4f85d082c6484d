//! # Homework Helper
//!
//! 作业照片讲解助手：OCR 提取文字，分析题目结构，生成分步讲解，
//! 并配套教学视频和配对小游戏
//!
//! ## 架构设计
//!
//! 本系统采用三层架构：
//!
//! ### ① 数据模型层（Models）
//! - `models/` - 纯数据类型，不做 I/O
//! - `HomeworkStructure` - 运算 / 位数 / 技能 / 数字 / 难度
//! - `ScanLogEntry` / `ScanStats` - 扫描摘要与统计
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，每个能力只处理一份作业
//! - `homework_analyzer` - 本地启发式结构分析（纯函数，永不失败）
//! - `LlmService` - OCR、讲解、科目年级分类
//! - `VideoService` - 审核频道内的视频搜索
//! - `arcade_service` - 配对小游戏生成
//! - `ScanLogStore` - 扫描日志读写
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义一次请求的完整处理流程
//! - `ScanCtx` - 上下文封装（语言 + 模式）
//! - `ScanFlow` - OCR → 分析 → 讲解 → 记日志
//! - `DetectFlow` - 分析 → 分类 → 按年级推导难度
//! - `PracticeFlow` - 小游戏 + 可选视频
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{HomeworkStructure, MathLevel, Operation, Skill};
pub use services::homework_analyzer::{analyze, analyze_value, detect_math_level};
pub use workflow::{DetectFlow, DetectionReport, PracticeFlow, ScanCtx, ScanFlow, ScanReport};
