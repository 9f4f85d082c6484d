use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use homework_helper::config::Config;
use homework_helper::models::{Language, MathLevel, Skill};
use homework_helper::services::{ArcadeRequest, ScanLogStore, VideoRequest, VideoService};
use homework_helper::utils::logging;
use homework_helper::workflow::{DetectFlow, PracticeFlow, ScanCtx, ScanFlow};
use homework_helper::{analyze, detect_math_level};

/// 作业讲解助手
#[derive(Debug, Parser)]
#[command(name = "homework_helper", version, about)]
struct Cli {
    /// TOML 配置文件；不指定时读取环境变量
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 输出 debug 日志
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 分析作业文本的结构（纯本地）
    Analyze {
        /// 作业文本
        text: String,
    },
    /// 推导难度：默认按数字位数，指定 --grade 时按年级
    MathLevel {
        #[arg(default_value = "")]
        text: String,
        /// 年级（K、1、3rd ...）
        #[arg(long)]
        grade: Option<String>,
    },
    /// 扫描作业照片并生成讲解
    Scan {
        /// 图片路径
        image: PathBuf,
        #[arg(long, default_value = "en")]
        lang: String,
        /// 家长模式
        #[arg(long)]
        parent: bool,
    },
    /// 识别作业科目、年级和难度
    Detect {
        text: String,
        #[arg(long, default_value = "en")]
        lang: String,
    },
    /// 在审核频道中搜索教学视频
    Video {
        #[arg(long, default_value = "addition")]
        topic: String,
        #[arg(long, default_value = "basic")]
        math_level: String,
        #[arg(long, default_value = "en")]
        lang: String,
        #[arg(long, default_value_t = 2)]
        digits: u8,
        #[arg(long, default_value = "")]
        skill: String,
    },
    /// 生成配对小游戏
    Arcade {
        #[arg(long, default_value = "addition")]
        topic: String,
        #[arg(long, default_value = "en")]
        lang: String,
        #[arg(long, default_value = "auto")]
        difficulty: String,
        #[arg(long)]
        math_level: Option<String>,
        /// 用于自动判断难度的题目文本
        #[arg(long, default_value = "")]
        problems: String,
    },
    /// 扫描日志统计
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let config = match &cli.config {
        Some(path) => Config::from_toml_file(path)?,
        None => Config::from_env(),
    };

    // 初始化日志
    logging::init(cli.verbose || config.verbose_logging);

    match cli.command {
        Command::Analyze { text } => print_json(&analyze(&text)),
        Command::MathLevel { text, grade } => match grade {
            Some(grade) => print_json(&MathLevel::from_grade_str(&grade)),
            None => print_json(&detect_math_level(&text)),
        },
        Command::Scan {
            image,
            lang,
            parent,
        } => {
            let bytes = tokio::fs::read(&image)
                .await
                .with_context(|| format!("读取图片失败: {}", image.display()))?;
            let ctx = ScanCtx::from_request(&lang, parent);
            let report = ScanFlow::new(&config).run(&bytes, &ctx).await?;
            print_json(&report)
        }
        Command::Detect { text, lang } => {
            let report = DetectFlow::new(&config)
                .run(&text, Language::from_code(&lang))
                .await?;
            print_json(&report)
        }
        Command::Video {
            topic,
            math_level,
            lang,
            digits,
            skill,
        } => {
            let request = VideoRequest {
                topic,
                math_level: MathLevel::find(&math_level).unwrap_or_default(),
                language: Language::from_code(&lang),
                digits,
                skill: Skill::find(&skill),
            };
            let lookup = VideoService::new(&config).find_video(&request).await?;
            print_json(&lookup)
        }
        Command::Arcade {
            topic,
            lang,
            difficulty,
            math_level,
            problems,
        } => {
            let request = ArcadeRequest {
                topic,
                language: Language::from_code(&lang),
                difficulty,
                math_level,
                problems,
            };
            let game = PracticeFlow::new(&config).run(&request).await;
            print_json(&game)
        }
        Command::Stats => {
            let stats = ScanLogStore::new(&config).stats().await;
            print_json(&stats)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
