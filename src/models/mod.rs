pub mod arcade;
pub mod grade;
pub mod homework;
pub mod locale;
pub mod scan_log;
pub mod subject;
pub mod topic;

pub use arcade::{ArcadeGame, Difficulty, LeftItem, RightItem};
pub use grade::GradeLevel;
pub use homework::{HomeworkStructure, MathLevel, Operation, Skill};
pub use locale::{Language, Mode};
pub use scan_log::{ScanLogEntry, ScanStats};
pub use subject::Subject;
pub use topic::Topic;
