// Aiscript - usage-driven component generation
// Scans a source tree for namespaced component references and keeps a
// generated component directory in sync with them

pub mod cli;
pub mod error;
pub mod generator;
pub mod models;
pub mod reconciler;
pub mod scanner;

pub use anyhow::{Context, Result};
pub use colored::Colorize;

// Re-export commonly used types
pub use error::{ComponentError, ConfigError, GenerationError};
pub use generator::{AnthropicGenerator, ComponentGenerator, GenerationRequest};
pub use models::{AiscriptConfig, Credentials, Dialect, UsageMap, UsageRecord};
pub use reconciler::{ReconcilePlan, ReconcileReport, Reconciler};
pub use scanner::Scanner;
