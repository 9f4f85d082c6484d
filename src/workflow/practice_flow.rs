//! 练习流程 - 流程层
//!
//! 生成配对小游戏，并尽量附上一个审核频道的教学视频。
//! 视频是可选的：搜索失败或没有结果时游戏照常返回。

use tracing::{info, warn};

use crate::config::Config;
use crate::models::{ArcadeGame, MathLevel};
use crate::services::arcade_service;
use crate::services::{ArcadeRequest, VideoLookup, VideoRequest, VideoService};

/// 练习流程
pub struct PracticeFlow {
    video_service: Option<VideoService>,
}

impl PracticeFlow {
    /// 未配置 YouTube key 时不搜索视频
    pub fn new(config: &Config) -> Self {
        let video_service = if config.youtube_api_key.is_empty() {
            None
        } else {
            Some(VideoService::new(config))
        };
        Self { video_service }
    }

    pub async fn run(&self, request: &ArcadeRequest) -> ArcadeGame {
        let mut game = arcade_service::generate(request);
        info!(
            "🎮 {} | {} | {} 对",
            game.theme,
            game.difficulty,
            game.pairs.len()
        );

        let Some(video_service) = &self.video_service else {
            return game;
        };

        let video_request = video_request_for(request);
        match video_service.find_video(&video_request).await {
            Ok(VideoLookup::Found(video)) => game.video = Some(video),
            Ok(VideoLookup::NotFound { query, .. }) => {
                info!("没有找到视频 (搜索词: {})，继续返回游戏", query)
            }
            Err(e) => warn!("⚠️ 视频搜索失败，继续返回游戏: {}", e),
        }

        game
    }
}

/// 游戏请求只带主题和语言，其余使用默认值
fn video_request_for(request: &ArcadeRequest) -> VideoRequest {
    let math_level = request
        .math_level
        .as_deref()
        .and_then(MathLevel::find)
        .unwrap_or_default();

    VideoRequest {
        topic: request.topic.clone(),
        language: request.language,
        math_level,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Language, Skill};

    #[test]
    fn test_video_request_defaults() {
        let request = ArcadeRequest {
            topic: "division".to_string(),
            language: Language::Es,
            math_level: Some("normal".to_string()),
            ..Default::default()
        };
        let video = video_request_for(&request);

        assert_eq!(video.topic, "division");
        assert_eq!(video.language, Language::Es);
        assert_eq!(video.math_level, MathLevel::Normal);
        assert_eq!(video.digits, 2);
        assert_eq!(video.skill, Skill::None);

        let video = video_request_for(&ArcadeRequest::default());
        assert_eq!(video.math_level, MathLevel::Basic);
    }

    #[tokio::test]
    async fn test_game_without_video_service() {
        let flow = PracticeFlow::new(&Config::default());
        let game = flow.run(&ArcadeRequest::default()).await;

        assert_eq!(game.theme, "🚀 MATH BLASTER");
        assert_eq!(game.pairs.len(), 6);
        assert!(game.video.is_none());
    }
}
