//! 迁移脚本模块
//!
//! 按 glob 模式发现 SQL 迁移脚本，并在 SQLite 上按版本顺序执行

pub mod discovery;
#[cfg(feature = "sqlite-support")]
pub mod runner;

pub use discovery::{MigrationScript, discover_migrations};
#[cfg(feature = "sqlite-support")]
pub use runner::{AppliedMigration, MIGRATIONS_TABLE, MigrationRunner};

/// 默认的迁移脚本发现模式
pub const DEFAULT_MIGRATIONS_PATTERN: &str = "migrations/**/*.sql";
