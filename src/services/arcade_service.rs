//! 配对小游戏服务 - 业务能力层
//!
//! 根据主题和难度生成左右配对题，右侧答案打乱

use phf::phf_map;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

use crate::models::{ArcadeGame, Difficulty, Language, LeftItem, MathLevel, RightItem};

/// 主题文案（按难度：easy / medium / hard）
#[derive(Debug, Clone, Copy)]
struct ThemeSpec {
    theme: &'static str,
    en: &'static str,
    es: &'static str,
}

const fn same_theme(theme: &'static str, en: &'static str, es: &'static str) -> [ThemeSpec; 3] {
    let row = ThemeSpec { theme, en, es };
    [row, row, row]
}

static THEMES: phf::Map<&'static str, [ThemeSpec; 3]> = phf_map! {
    "math" => [
        ThemeSpec { theme: "🚀 MATH BLASTER", en: "Match the problems!", es: "¡Combina los problemas!" },
        ThemeSpec { theme: "🎮 NINJA NUMBERS", en: "Slice through the math!", es: "¡Corta la matemática!" },
        ThemeSpec { theme: "🌌 SPACE RANGER", en: "Split the asteroids!", es: "¡Divide los asteroides!" },
    ],
    "addition" => same_theme("🚀 MATH BLASTER", "Match the problems!", "¡Combina los problemas!"),
    "subtraction" => same_theme("🏴‍☠️ PIRATE MATH", "Find the treasure!", "¡Encuentra el tesoro!"),
    "multiplication" => same_theme("🎮 NINJA NUMBERS", "Slice through!", "¡Corta!"),
    "division" => same_theme("🌌 SPACE RANGER", "Split asteroids!", "¡Divide asteroides!"),
    "vocabulary" => same_theme("🦝 RACCOON WORDS", "Match words!", "¡Combina palabras!"),
    "synonym" => same_theme("✨ MAGIC TWINS", "Find word twins!", "¡Encuentra gemelos!"),
    "antonym" => same_theme("⚖️ OPPOSITE WORLD", "Find opposites!", "¡Encuentra opuestos!"),
    "animal" => same_theme("🦁 WILD KINGDOM", "Know the animals?", "¿Conoces los animales?"),
    "color" => same_theme("🎨 RAINBOW BLAST", "Paint the world!", "¡Pinta el mundo!"),
    "body" => same_theme("💪 SUPERHERO BODY", "Build a hero!", "¡Construye un héroe!"),
    "geography" => same_theme("🗺️ WORLD EXPLORER", "Explore!", "¡Explora!"),
    "reading" => same_theme("📚 READING QUEST", "Read and match!", "¡Lee y combina!"),
};

type Pairs = &'static [(&'static str, &'static str)];

const ADDITION_EASY: Pairs = &[
    ("2 + 1", "3"), ("3 + 2", "5"), ("4 + 1", "5"),
    ("5 + 2", "7"), ("3 + 3", "6"), ("4 + 2", "6"),
];
const ADDITION_MEDIUM: Pairs = &[
    ("12 + 13", "25"), ("15 + 14", "29"), ("20 + 15", "35"),
    ("25 + 16", "41"), ("30 + 20", "50"), ("24 + 13", "37"),
];
const ADDITION_HARD: Pairs = &[
    ("472 + 159", "631"), ("385 + 247", "632"), ("516 + 284", "800"),
    ("623 + 178", "801"), ("745 + 256", "1001"), ("834 + 167", "1001"),
];

const SUBTRACTION_EASY: Pairs = &[
    ("5 - 2", "3"), ("6 - 3", "3"), ("7 - 2", "5"),
    ("8 - 3", "5"), ("10 - 5", "5"), ("9 - 4", "5"),
];
const SUBTRACTION_MEDIUM: Pairs = &[
    ("25 - 12", "13"), ("30 - 15", "15"), ("45 - 20", "25"),
    ("50 - 23", "27"), ("60 - 35", "25"), ("40 - 18", "22"),
];
const SUBTRACTION_HARD: Pairs = &[
    ("500 - 247", "253"), ("600 - 345", "255"), ("750 - 428", "322"),
    ("823 - 467", "356"), ("912 - 589", "323"), ("645 - 378", "267"),
];

const MULTIPLICATION_EASY: Pairs = &[
    ("2 × 2", "4"), ("3 × 3", "9"), ("5 × 2", "10"),
    ("2 × 4", "8"), ("3 × 2", "6"), ("4 × 2", "8"),
];
const MULTIPLICATION_MEDIUM: Pairs = &[
    ("12 × 3", "36"), ("15 × 2", "30"), ("14 × 4", "56"),
    ("11 × 5", "55"), ("13 × 2", "26"), ("16 × 3", "48"),
];
const MULTIPLICATION_HARD: Pairs = &[
    ("45 × 12", "540"), ("32 × 15", "480"), ("28 × 14", "392"),
    ("36 × 13", "468"), ("24 × 16", "384"), ("42 × 11", "462"),
];

const DIVISION_EASY: Pairs = &[
    ("6 ÷ 2", "3"), ("8 ÷ 2", "4"), ("9 ÷ 3", "3"),
    ("10 ÷ 2", "5"), ("12 ÷ 3", "4"), ("15 ÷ 3", "5"),
];
const DIVISION_MEDIUM: Pairs = &[
    ("36 ÷ 3", "12"), ("30 ÷ 2", "15"), ("56 ÷ 4", "14"),
    ("55 ÷ 5", "11"), ("26 ÷ 2", "13"), ("48 ÷ 3", "16"),
];
const DIVISION_HARD: Pairs = &[
    ("360 ÷ 15", "24"), ("576 ÷ 18", "32"), ("378 ÷ 14", "27"),
    ("943 ÷ 23", "41"), ("665 ÷ 19", "35"), ("464 ÷ 16", "29"),
];

const VOCABULARY_EASY: Pairs = &[
    ("happy", "joyful"), ("big", "large"), ("fast", "quick"),
    ("cold", "freezing"), ("loud", "noisy"), ("small", "tiny"),
];
const VOCABULARY_MEDIUM: Pairs = &[
    ("benevolent", "kind"), ("meticulous", "careful"), ("eloquent", "articulate"),
    ("pragmatic", "practical"), ("ambiguous", "unclear"), ("tenacious", "persistent"),
];
const VOCABULARY_HARD: Pairs = &[
    ("ephemeral", "fleeting"), ("ubiquitous", "everywhere"), ("perspicacious", "keen insight"),
    ("sanguine", "optimistic"), ("obfuscate", "make unclear"), ("serendipity", "fortunate chance"),
];

const SYNONYMS: Pairs = &[
    ("tiny", "small"), ("joy", "happiness"), ("furious", "angry"),
    ("chilly", "cold"), ("damp", "wet"), ("brilliant", "smart"),
];
const ANTONYMS: Pairs = &[
    ("big", "small"), ("hot", "cold"), ("happy", "sad"),
    ("fast", "slow"), ("light", "dark"), ("good", "bad"),
];
const ANIMALS: Pairs = &[
    ("Dog", "Barks"), ("Cat", "Meows"), ("Fish", "Swims"),
    ("Bird", "Flies"), ("Lion", "Roars"), ("Kangaroo", "Hops"),
];
const COLORS: Pairs = &[
    ("🔴 Red", "Fire"), ("🔵 Blue", "Sky"), ("🟡 Yellow", "Sun"),
    ("🟢 Green", "Grass"), ("⚫ Black", "Night"), ("⚪ White", "Snow"),
];
const BODY_PARTS: Pairs = &[
    ("Head", "Think"), ("Eyes", "See"), ("Ears", "Hear"),
    ("Nose", "Smell"), ("Hands", "Grab"), ("Feet", "Walk"),
];
const CAPITALS: Pairs = &[
    ("France", "Paris"), ("Spain", "Madrid"), ("Japan", "Tokyo"),
    ("Brazil", "Brasília"), ("Mexico", "Mexico City"), ("Italy", "Rome"),
];

const READING_EASY: Pairs = &[
    ("The cat sat", "Cat is sitting"),
    ("It is raining", "Wet weather"),
    ("She likes to play", "Enjoys playing"),
    ("The sun is bright", "Sunny day"),
    ("Dogs are fun", "Happy animals"),
    ("I like ice cream", "Likes dessert"),
];
const READING_ADVANCED: Pairs = &[
    ("The protagonist embarked", "Hero started journey"),
    ("Despite obstacles, persevered", "Continued despite difficulty"),
    ("The atmosphere was tense", "Scary mood"),
    ("He contemplated", "Thought deeply"),
    ("The revelation shocked", "Unexpected discovery"),
    ("Time seemed to stand still", "Moment felt long"),
];

const DEFAULT_PAIRS: Pairs = &[
    ("Play", "Fun"), ("Learn", "Smart"), ("Win", "Champion"),
    ("Try", "Awesome"), ("Success", "Victory"), ("Challenge", "Goal"),
];

/// 小游戏请求参数
#[derive(Debug, Clone)]
pub struct ArcadeRequest {
    pub topic: String,
    pub language: Language,
    /// 显式难度，"auto" 表示自动判断
    pub difficulty: String,
    /// 已检测的难度，优先级最高
    pub math_level: Option<String>,
    /// 用于自动判断难度的题目文本
    pub problems: String,
}

impl Default for ArcadeRequest {
    fn default() -> Self {
        Self {
            topic: "addition".to_string(),
            language: Language::En,
            difficulty: "auto".to_string(),
            math_level: None,
            problems: String::new(),
        }
    }
}

/// 决定最终难度
///
/// 优先级：math_level > 显式难度（非 auto） > 从题目文本判断
pub fn resolve_difficulty(request: &ArcadeRequest) -> Difficulty {
    if let Some(level) = request.math_level.as_deref().filter(|l| !l.is_empty()) {
        info!("📊 Using detected math_level: {}", level);
        return MathLevel::find(level)
            .map(Difficulty::from_math_level)
            .unwrap_or(Difficulty::Medium);
    }

    let explicit = request.difficulty.trim();
    if !explicit.is_empty() && !explicit.eq_ignore_ascii_case("auto") {
        return Difficulty::parse(explicit);
    }

    detect_difficulty(&request.problems)
}

/// 从题目文本判断难度
///
/// 只看恰好 3 位或 2 位的数字串，4 位及以上不计
pub fn detect_difficulty(problems: &str) -> Difficulty {
    if problems.is_empty() {
        return Difficulty::Medium;
    }

    let run_lengths: Vec<usize> = problems
        .split(|c: char| !c.is_ascii_digit())
        .filter(|run| !run.is_empty())
        .map(str::len)
        .collect();

    if run_lengths.contains(&3) {
        Difficulty::Hard
    } else if run_lengths.contains(&2) {
        Difficulty::Medium
    } else {
        Difficulty::Easy
    }
}

/// 生成小游戏（右侧使用线程随机数打乱）
pub fn generate(request: &ArcadeRequest) -> ArcadeGame {
    generate_with_rng(request, &mut rand::thread_rng())
}

/// 使用指定随机数生成器生成小游戏
pub fn generate_with_rng<R: Rng + ?Sized>(request: &ArcadeRequest, rng: &mut R) -> ArcadeGame {
    let difficulty = resolve_difficulty(request);
    info!("🎮 Final difficulty for generation: {}", difficulty);

    let topic = request.topic.trim().to_lowercase();
    let theme = theme_for(&topic, difficulty);
    let instructions = match request.language {
        Language::Es => theme.es,
        _ => theme.en,
    };

    let table = pairs_for(&topic, difficulty);

    let pairs = table
        .iter()
        .enumerate()
        .map(|(idx, (left, _))| LeftItem {
            left: left.to_string(),
            left_id: format!("item_{idx}"),
        })
        .collect();

    let mut answers: Vec<&str> = table.iter().map(|(_, right)| *right).collect();
    answers.shuffle(rng);
    let right_items = answers
        .into_iter()
        .enumerate()
        .map(|(id, text)| RightItem {
            text: text.to_string(),
            id,
        })
        .collect();

    ArcadeGame {
        theme: theme.theme.to_string(),
        topic: request.topic.clone(),
        difficulty,
        language: request.language.code().to_string(),
        pairs,
        right_items,
        instructions: instructions.to_string(),
        shuffle_right_side: true,
        video: None,
    }
}

fn theme_for(topic: &str, difficulty: Difficulty) -> ThemeSpec {
    let row = THEMES
        .get(topic)
        .or_else(|| THEMES.get("vocabulary"))
        .copied()
        .unwrap_or_else(|| same_theme("🦝 RACCOON WORDS", "Match words!", "¡Combina palabras!"));

    match difficulty {
        Difficulty::Easy => row[0],
        Difficulty::Medium => row[1],
        Difficulty::Hard => row[2],
    }
}

fn pairs_for(topic: &str, difficulty: Difficulty) -> Pairs {
    use Difficulty::{Easy, Hard, Medium};

    match (topic, difficulty) {
        ("addition", Easy) => ADDITION_EASY,
        ("addition", Medium) => ADDITION_MEDIUM,
        ("addition", Hard) => ADDITION_HARD,
        ("subtraction", Easy) => SUBTRACTION_EASY,
        ("subtraction", Medium) => SUBTRACTION_MEDIUM,
        ("subtraction", Hard) => SUBTRACTION_HARD,
        ("multiplication", Easy) => MULTIPLICATION_EASY,
        ("multiplication", Medium) => MULTIPLICATION_MEDIUM,
        ("multiplication", Hard) => MULTIPLICATION_HARD,
        ("division", Easy) => DIVISION_EASY,
        ("division", Medium) => DIVISION_MEDIUM,
        ("division", Hard) => DIVISION_HARD,
        ("vocabulary", Easy) => VOCABULARY_EASY,
        ("vocabulary", Medium) => VOCABULARY_MEDIUM,
        ("vocabulary", Hard) => VOCABULARY_HARD,
        ("synonym", _) => SYNONYMS,
        ("antonym", _) => ANTONYMS,
        ("animal", _) => ANIMALS,
        ("color", _) => COLORS,
        ("body", _) => BODY_PARTS,
        ("geography" | "capital", _) => CAPITALS,
        ("reading", Easy) => READING_EASY,
        ("reading", _) => READING_ADVANCED,
        _ => DEFAULT_PAIRS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn request(topic: &str) -> ArcadeRequest {
        ArcadeRequest {
            topic: topic.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_math_level_has_priority() {
        let req = ArcadeRequest {
            difficulty: "easy".to_string(),
            math_level: Some("advanced".to_string()),
            problems: "1 + 2".to_string(),
            ..request("addition")
        };
        assert_eq!(resolve_difficulty(&req), Difficulty::Hard);

        let req = ArcadeRequest {
            math_level: Some("weird".to_string()),
            ..request("addition")
        };
        assert_eq!(resolve_difficulty(&req), Difficulty::Medium);
    }

    #[test]
    fn test_explicit_difficulty_beats_detection() {
        let req = ArcadeRequest {
            difficulty: "hard".to_string(),
            problems: "1 + 2".to_string(),
            ..request("addition")
        };
        assert_eq!(resolve_difficulty(&req), Difficulty::Hard);

        let req = ArcadeRequest {
            difficulty: "AUTO".to_string(),
            problems: "1 + 2".to_string(),
            ..request("addition")
        };
        assert_eq!(resolve_difficulty(&req), Difficulty::Easy);
    }

    #[test]
    fn test_detect_difficulty_exact_run_lengths() {
        assert_eq!(detect_difficulty(""), Difficulty::Medium);
        assert_eq!(detect_difficulty("7 + 2"), Difficulty::Easy);
        assert_eq!(detect_difficulty("12 + 3"), Difficulty::Medium);
        assert_eq!(detect_difficulty("12 + 345"), Difficulty::Hard);
        // 4 位数不算 3 位
        assert_eq!(detect_difficulty("1234 + 5"), Difficulty::Easy);
        assert_eq!(detect_difficulty("no numbers"), Difficulty::Easy);
    }

    #[test]
    fn test_generate_structure() {
        let mut rng = StdRng::seed_from_u64(7);
        let req = ArcadeRequest {
            difficulty: "hard".to_string(),
            ..request("subtraction")
        };
        let game = generate_with_rng(&req, &mut rng);

        assert_eq!(game.theme, "🏴‍☠️ PIRATE MATH");
        assert_eq!(game.instructions, "Find the treasure!");
        assert_eq!(game.difficulty, Difficulty::Hard);
        assert_eq!(game.pairs.len(), 6);
        assert_eq!(game.pairs[0].left, "500 - 247");
        assert_eq!(game.pairs[5].left_id, "item_5");
        assert!(game.shuffle_right_side);
        assert!(game.video.is_none());

        let ids: Vec<usize> = game.right_items.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4, 5]);

        let mut shuffled: Vec<&str> = game.right_items.iter().map(|r| r.text.as_str()).collect();
        shuffled.sort_unstable();
        let mut expected: Vec<&str> = SUBTRACTION_HARD.iter().map(|(_, r)| *r).collect();
        expected.sort_unstable();
        assert_eq!(shuffled, expected);
    }

    #[test]
    fn test_themes_and_fallbacks() {
        let mut rng = StdRng::seed_from_u64(1);

        let game = generate_with_rng(&request("capital"), &mut rng);
        assert_eq!(game.theme, "🦝 RACCOON WORDS");
        assert_eq!(game.pairs[0].left, "France");

        let game = generate_with_rng(&request("Geography"), &mut rng);
        assert_eq!(game.theme, "🗺️ WORLD EXPLORER");
        assert_eq!(game.topic, "Geography");

        let game = generate_with_rng(&request("dinosaurs"), &mut rng);
        assert_eq!(game.pairs[0].left, "Play");
        assert_eq!(game.theme, "🦝 RACCOON WORDS");
    }

    #[test]
    fn test_math_theme_varies_by_difficulty() {
        assert_eq!(theme_for("math", Difficulty::Easy).theme, "🚀 MATH BLASTER");
        assert_eq!(theme_for("math", Difficulty::Medium).theme, "🎮 NINJA NUMBERS");
        assert_eq!(theme_for("math", Difficulty::Hard).theme, "🌌 SPACE RANGER");
    }

    #[test]
    fn test_spanish_instructions() {
        let mut rng = StdRng::seed_from_u64(3);
        let req = ArcadeRequest {
            language: Language::Es,
            ..request("antonym")
        };
        let game = generate_with_rng(&req, &mut rng);
        assert_eq!(game.instructions, "¡Encuentra opuestos!");
        assert_eq!(game.language, "es");

        let req = ArcadeRequest {
            language: Language::Fr,
            ..request("antonym")
        };
        assert_eq!(generate_with_rng(&req, &mut rng).instructions, "Find opposites!");
    }

    #[test]
    fn test_reading_pairs_by_difficulty() {
        assert_eq!(pairs_for("reading", Difficulty::Easy)[0].0, "The cat sat");
        assert_eq!(pairs_for("reading", Difficulty::Hard)[0].0, "The protagonist embarked");
    }
}
