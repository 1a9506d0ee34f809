//! # 配置管理模块
//!
//! 提供数据源配置及其构建器
//! 构建器要求所有配置项必须显式设置

pub mod builders;
pub mod core;

pub use builders::DataSourceOptionsBuilder;
pub use self::core::{
    DEFAULT_DATABASE_PATH, DataSourceOptions, DatabaseType, ENVIRONMENT_VAR, Environment,
    app_data_source,
};
