//! social_datasource - 社交媒体后端的数据源配置
//!
//! 将 SQLite 文件数据库、固定的实体集合与迁移脚本组合成一份只读配置，
//! 并提供把配置交给连接引导、执行迁移的数据源

// 导出所有公共模块
pub mod error;
pub mod config;
pub mod entity;
pub mod subscriber;
pub mod migration;

// 条件编译的模块
#[cfg(feature = "sqlite-support")]
pub mod datasource;

// 重新导出常用类型和函数
pub use error::{DataSourceError, DataSourceResult};
pub use config::{
    DataSourceOptions, DataSourceOptionsBuilder, DatabaseType, Environment, app_data_source,
};
pub use entity::{EntityKind, EntityMeta, EntityRegistry, all_entities};
pub use subscriber::SubscriberDescriptor;
pub use migration::{DEFAULT_MIGRATIONS_PATTERN, MigrationScript, discover_migrations};

#[cfg(feature = "sqlite-support")]
pub use datasource::DataSource;
#[cfg(feature = "sqlite-support")]
pub use migration::AppliedMigration;

// 条件编译调试宏 - 只有在 debug 模式下才输出调试信息
#[cfg(debug_assertions)]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        rat_logger::debug!($($arg)*);
    };
}

#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        // 在 release 模式下不输出调试信息
    };
}

/// 库版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 库名称
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// 获取库信息
pub fn get_info() -> String {
    format!("{} v{}", NAME, VERSION)
}
