//! 视频搜索服务 - 业务能力层
//!
//! 根据运算类型、位数和技能构造搜索词，只在审核过的频道内查找教学视频。

use phf::phf_map;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult, BusinessError};
use crate::models::{Language, MathLevel, Operation, Skill};
use crate::utils::log_banner;

/// 位数标签
static DIGIT_LABELS: phf::Map<&'static str, &'static str> = phf_map! {
    "1" => "one digit",
    "2" => "two digit",
    "3" => "three digit",
};

const MATH_EN: &[&str] = &[
    "UC4a-Gbdw7vOaccHmFo40b9g", // Khan Academy Kids
    "UCyP_9P-sc6nCThfKjZg5V2g", // Scratch Garden
    "UCcp9uUuCKxq_fQF1pg6gY4w", // Happy Learning English
    "UCtl-lJl5mLglH12RdKuZVBA", // Smile and Learn
];
const MATH_ES: &[&str] = &["UCtl-lJl5mLglH12RdKuZVBA", "UC4a-Gbdw7vOaccHmFo40b9g"];
const MATH_FR: &[&str] = &[
    "UCxXZbR5WmF8Izy4D2R_Fe8w", // FrenchFoRKidz
    "UCkjoE10wU8rrEoXlxqvtQLg", // Monsieur Steve
];
const GRAMMAR_EN: &[&str] = &[
    "UCNBFiZk0HOPL3yZ66Fq8rPQ", // LucyMax English
    "UC3b4QtzZomJtL_8YVAyO4uA", // Pebbles Kids Learning
];

/// 数学类审核频道（按语言）
static MATH_CHANNELS: phf::Map<&'static str, &'static [&'static str]> = phf_map! {
    "en" => MATH_EN,
    "es" => MATH_ES,
    "fr" => MATH_FR,
};

/// 语法/阅读类审核频道（按语言）
static GRAMMAR_CHANNELS: phf::Map<&'static str, &'static [&'static str]> = phf_map! {
    "en" => GRAMMAR_EN,
};

/// 视频搜索请求
#[derive(Debug, Clone)]
pub struct VideoRequest {
    pub topic: String,
    pub math_level: MathLevel,
    pub language: Language,
    pub digits: u8,
    pub skill: Skill,
}

impl Default for VideoRequest {
    fn default() -> Self {
        Self {
            topic: "addition".to_string(),
            math_level: MathLevel::Basic,
            language: Language::En,
            digits: 2,
            skill: Skill::None,
        }
    }
}

/// 找到的视频
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoMatch {
    #[serde(rename = "videoId")]
    pub video_id: String,
    pub title: String,
    pub topic: String,
    pub digits: u8,
    pub skill: Skill,
    pub math_level: MathLevel,
    pub language: Language,
    pub verified: bool,
    pub source: String,
    pub channel_id: String,
}

/// 搜索结果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VideoLookup {
    Found(VideoMatch),
    NotFound {
        topic: String,
        query: String,
        channels_searched: usize,
    },
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
    snippet: SearchSnippet,
}

#[derive(Debug, Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchSnippet {
    title: String,
}

/// 视频搜索服务
pub struct VideoService {
    http: reqwest::Client,
    api_key: String,
    api_base_url: String,
}

impl VideoService {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: config.youtube_api_key.clone(),
            api_base_url: config.youtube_api_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// 在审核频道中按顺序搜索，返回第一个命中的视频
    ///
    /// 单个频道失败只记录警告，继续下一个频道
    pub async fn find_video(&self, request: &VideoRequest) -> AppResult<VideoLookup> {
        log_banner("🎬 === VIDEO SEARCH (OPERATION + SKILL AWARE) ===");
        info!("📖 Topic: {}", request.topic);
        info!("🎯 Math Level: {}", request.math_level);
        info!("📊 Digits: {}", request.digits);
        info!("🔧 Skill: {}", request.skill);
        info!("🌍 Language: {}", request.language);

        let topic = request.topic.to_lowercase();
        let operation = Operation::find(&topic).unwrap_or(Operation::Addition);
        let query = build_search_query(operation, request.digits, request.skill, request.language);
        info!("🔍 搜索词: \"{}\"", query);

        let subject = channel_subject(&topic);
        let channels = approved_channels(subject, request.language);
        if channels.is_empty() {
            return Err(BusinessError::NoApprovedChannels {
                subject: subject.to_string(),
            }
            .into());
        }

        for channel_id in channels {
            match self.search_channel(&query, channel_id).await {
                Ok(Some((video_id, title))) => {
                    info!("✅ 找到视频: {} ({})", title, video_id);
                    return Ok(VideoLookup::Found(VideoMatch {
                        video_id,
                        title,
                        topic: request.topic.clone(),
                        digits: request.digits,
                        skill: request.skill,
                        math_level: request.math_level,
                        language: request.language,
                        verified: true,
                        source: "approved_channel".to_string(),
                        channel_id: channel_id.to_string(),
                    }));
                }
                Ok(None) => debug!("频道 {} 无结果", channel_id),
                Err(e) => warn!("⚠️ 搜索频道 {} 失败: {}", channel_id, e),
            }
        }

        warn!("❌ 审核频道中没有找到视频 (共 {} 个频道)", channels.len());
        Ok(VideoLookup::NotFound {
            topic: request.topic.clone(),
            query,
            channels_searched: channels.len(),
        })
    }

    /// 搜索单个频道，返回 (videoId, title)
    async fn search_channel(
        &self,
        query: &str,
        channel_id: &str,
    ) -> AppResult<Option<(String, String)>> {
        let endpoint = format!("{}/search", self.api_base_url);

        let response = self
            .http
            .get(&endpoint)
            .query(&[
                ("part", "snippet"),
                ("q", query),
                ("channelId", channel_id),
                ("type", "video"),
                ("maxResults", "5"),
                ("order", "relevance"),
                ("videoEmbeddable", "true"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(&endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::BadResponse {
                endpoint,
                status: status.as_u16(),
            }
            .into());
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| AppError::api_request_failed(&endpoint, e))?;

        Ok(body
            .items
            .into_iter()
            .find_map(|item| item.id.video_id.map(|id| (id, item.snippet.title))))
    }
}

/// 构造搜索词
///
/// 未知运算使用加法模板，未知语言回退到英语
pub fn build_search_query(
    operation: Operation,
    digits: u8,
    skill: Skill,
    language: Language,
) -> String {
    let digit_label = DIGIT_LABELS
        .get(digits.to_string().as_str())
        .copied()
        .unwrap_or("basic");

    let language = match language {
        Language::Es | Language::Fr => language,
        _ => Language::En,
    };

    match (operation, language) {
        (Operation::Subtraction, Language::Es) if skill == Skill::Borrowing => {
            format!("resta de {digit_label} cifras con préstamo para niños")
        }
        (Operation::Subtraction, Language::Es) => format!("resta de {digit_label} cifras para niños"),
        (Operation::Subtraction, Language::Fr) if skill == Skill::Borrowing => {
            format!("soustraction à {digit_label} chiffres avec emprunt pour enfants")
        }
        (Operation::Subtraction, Language::Fr) => {
            format!("soustraction à {digit_label} chiffres pour enfants")
        }
        (Operation::Subtraction, _) if skill == Skill::Borrowing => {
            format!("{digit_label} subtraction with borrowing for kids")
        }
        (Operation::Subtraction, _) => format!("{digit_label} subtraction for kids"),

        (Operation::Multiplication, Language::Es) => {
            format!("multiplicación de {digit_label} cifras para niños")
        }
        (Operation::Multiplication, Language::Fr) => {
            format!("multiplication à {digit_label} chiffres pour enfants")
        }
        (Operation::Multiplication, _) => format!("{digit_label} multiplication for kids"),

        (Operation::Division, Language::Es) => format!("división de {digit_label} cifras para niños"),
        (Operation::Division, Language::Fr) => {
            format!("division à {digit_label} chiffres pour enfants")
        }
        (Operation::Division, _) => format!("{digit_label} division for kids"),

        (Operation::Grammar, Language::Es) => "gramática inglesa para niños".to_string(),
        (Operation::Grammar, Language::Fr) => "grammaire anglaise pour enfants".to_string(),
        (Operation::Grammar, _) => "english grammar for kids".to_string(),

        (Operation::Reading, Language::Es) => "lectura para niños".to_string(),
        (Operation::Reading, Language::Fr) => "lecture pour enfants".to_string(),
        (Operation::Reading, _) => "reading for kids".to_string(),

        // 加法及未知运算
        (_, Language::Es) if skill == Skill::Regrouping => {
            format!("suma de {digit_label} cifras con reagrupación para niños")
        }
        (_, Language::Es) => format!("suma de {digit_label} cifras para niños"),
        (_, Language::Fr) if skill == Skill::Regrouping => {
            format!("addition à {digit_label} chiffres avec retenue pour enfants")
        }
        (_, Language::Fr) => format!("addition à {digit_label} chiffres pour enfants"),
        (_, _) if skill == Skill::Regrouping => {
            format!("{digit_label} addition with regrouping for kids")
        }
        (_, _) => format!("{digit_label} addition for kids"),
    }
}

/// 语法和阅读走语法频道，其余走数学频道
fn channel_subject(topic: &str) -> &'static str {
    match topic {
        "grammar" | "reading" => "grammar",
        _ => "math",
    }
}

/// 获取审核频道，缺少该语言时回退到英语
pub fn approved_channels(subject: &str, language: Language) -> &'static [&'static str] {
    let table = match subject {
        "grammar" => &GRAMMAR_CHANNELS,
        "math" => &MATH_CHANNELS,
        _ => return &[],
    };

    table
        .get(language.code())
        .or_else(|| table.get(Language::En.code()))
        .copied()
        .unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_with_skill() {
        assert_eq!(
            build_search_query(Operation::Subtraction, 2, Skill::Borrowing, Language::En),
            "two digit subtraction with borrowing for kids"
        );
        assert_eq!(
            build_search_query(Operation::Addition, 3, Skill::Regrouping, Language::Fr),
            "addition à three digit chiffres avec retenue pour enfants"
        );
        assert_eq!(
            build_search_query(Operation::Subtraction, 2, Skill::None, Language::Es),
            "resta de two digit cifras para niños"
        );
    }

    #[test]
    fn test_query_fallbacks() {
        // 未知运算使用加法模板
        assert_eq!(
            build_search_query(Operation::Unknown, 1, Skill::None, Language::En),
            "one digit addition for kids"
        );
        // 未知位数
        assert_eq!(
            build_search_query(Operation::Multiplication, 9, Skill::MultiDigit, Language::En),
            "basic multiplication for kids"
        );
        // 德语回退到英语
        assert_eq!(
            build_search_query(Operation::Reading, 1, Skill::None, Language::De),
            "reading for kids"
        );
        assert_eq!(
            build_search_query(Operation::Grammar, 2, Skill::None, Language::Fr),
            "grammaire anglaise pour enfants"
        );
    }

    #[test]
    fn test_approved_channels_fallback() {
        assert_eq!(approved_channels("math", Language::En).len(), 4);
        assert_eq!(approved_channels("math", Language::Fr).len(), 2);
        assert_eq!(
            approved_channels("math", Language::Ar),
            approved_channels("math", Language::En)
        );
        assert_eq!(
            approved_channels("grammar", Language::Es),
            approved_channels("grammar", Language::En)
        );
        assert!(approved_channels("science", Language::En).is_empty());
    }

    #[test]
    fn test_channel_subject() {
        assert_eq!(channel_subject("grammar"), "grammar");
        assert_eq!(channel_subject("reading"), "grammar");
        assert_eq!(channel_subject("division"), "math");
    }

    #[test]
    fn test_search_response_parsing() {
        let body = r#"{"items": [
            {"id": {"kind": "youtube#channel"}, "snippet": {"title": "Channel"}},
            {"id": {"videoId": "abc123"}, "snippet": {"title": "Borrowing for kids"}}
        ]}"#;
        let parsed: SearchResponse = serde_json::from_str(body).unwrap();
        let hit = parsed
            .items
            .into_iter()
            .find_map(|item| item.id.video_id.map(|id| (id, item.snippet.title)));
        assert_eq!(
            hit,
            Some(("abc123".to_string(), "Borrowing for kids".to_string()))
        );

        let empty: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.items.is_empty());
    }

    /// 测试真实 YouTube 搜索
    #[tokio::test]
    #[ignore]
    async fn test_find_video_live() {
        let _ = tracing_subscriber::fmt::try_init();

        let service = VideoService::new(&Config::from_env());
        let lookup = service
            .find_video(&VideoRequest {
                topic: "subtraction".to_string(),
                skill: Skill::Borrowing,
                ..Default::default()
            })
            .await
            .expect("视频搜索失败");

        println!("{:?}", lookup);
    }
}
