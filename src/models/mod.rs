pub mod config;
pub mod dialect;
pub mod usage;

pub use config::{AiscriptConfig, Credentials};
pub use dialect::{detect_dialect, detect_dialect_for_path, Dialect, Framework, Language};
pub use usage::{UsageMap, UsageRecord};
