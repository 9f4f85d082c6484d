pub mod logging;

pub use logging::{init, log_banner, truncate_text};
