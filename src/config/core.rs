//! # 配置管理模块 - 核心配置类型
//!
//! 数据源配置在进程启动时构建一次，此后只读
//! 运行环境作为显式参数传入，不在构建时隐式读取进程环境

use crate::entity::{EntityKind, EntityMeta};
use crate::error::DataSourceError;
use crate::migration::DEFAULT_MIGRATIONS_PATTERN;
use crate::subscriber::SubscriberDescriptor;
use rat_logger::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 存放运行环境标识的环境变量
pub const ENVIRONMENT_VAR: &str = "APP_ENV";

/// 默认数据库文件路径（相对于工作目录）
pub const DEFAULT_DATABASE_PATH: &str = "database.sqlite";

/// 支持的数据库类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    /// SQLite 文件数据库
    Sqlite,
}

impl DatabaseType {
    /// 获取数据库类型的字符串表示
    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseType::Sqlite => "sqlite",
        }
    }
}

/// 运行环境
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// 开发环境
    Development,
    /// 测试环境
    Testing,
    /// 预发布环境
    Staging,
    /// 生产环境
    Production,
}

impl Environment {
    /// 从环境标识解析运行环境
    ///
    /// 只有精确等于 `"development"` 时才视为开发环境，
    /// 未设置或无法识别的值一律视为生产环境
    pub fn from_value(value: Option<&str>) -> Self {
        match value {
            Some("development") => Environment::Development,
            Some("test") | Some("testing") => Environment::Testing,
            Some("staging") => Environment::Staging,
            _ => Environment::Production,
        }
    }

    /// 从进程环境变量 `APP_ENV` 读取运行环境
    pub fn from_env() -> Self {
        let value = std::env::var(ENVIRONMENT_VAR).ok();
        let environment = Self::from_value(value.as_deref());
        debug!("读取运行环境: {}={:?} -> {:?}", ENVIRONMENT_VAR, value, environment);
        environment
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Testing => "testing",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

/// 数据源配置
///
/// 字段只能通过 [`DataSourceOptions::for_environment`] 或构建器设置，
/// `synchronize` 恒为 `false`，表结构变更只能通过迁移脚本完成
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSourceOptions {
    pub(crate) db_type: DatabaseType,
    pub(crate) database: String,
    pub(crate) synchronize: bool,
    pub(crate) logging: bool,
    pub(crate) entities: Vec<EntityKind>,
    pub(crate) migrations: String,
    pub(crate) subscribers: Vec<SubscriberDescriptor>,
}

impl DataSourceOptions {
    /// 创建数据源配置构建器
    pub fn builder() -> super::builders::DataSourceOptionsBuilder {
        super::builders::DataSourceOptionsBuilder::new()
    }

    /// 应用的数据源配置
    ///
    /// 不会失败，也不打开任何连接
    pub fn for_environment(environment: Environment) -> Self {
        let options = Self {
            db_type: DatabaseType::Sqlite,
            database: DEFAULT_DATABASE_PATH.to_string(),
            synchronize: false,
            logging: environment.is_development(),
            entities: EntityKind::ALL.to_vec(),
            migrations: DEFAULT_MIGRATIONS_PATTERN.to_string(),
            subscribers: Vec::new(),
        };

        debug!(
            "创建数据源配置: 环境={}, 数据库={}, 日志={}",
            environment.as_str(),
            options.database,
            options.logging
        );
        options
    }

    /// 从配置文件加载配置
    ///
    /// 根据扩展名选择 TOML 或 JSON 格式
    ///
    /// # 参数
    ///
    /// * `config_path` - 配置文件路径
    pub fn from_file<P: AsRef<Path>>(config_path: P) -> Result<Self, DataSourceError> {
        let content = std::fs::read_to_string(config_path.as_ref())?;

        let options: DataSourceOptions = if is_toml(config_path.as_ref()) {
            toml::from_str(&content)
                .map_err(|e| crate::ds_error!(config, format!("解析TOML配置文件失败: {}", e)))?
        } else {
            serde_json::from_str(&content)
                .map_err(|e| crate::ds_error!(config, format!("解析JSON配置文件失败: {}", e)))?
        };

        if options.synchronize {
            return Err(crate::ds_error!(config, "不允许启用自动同步表结构，请使用迁移脚本"));
        }

        super::builders::DataSourceOptionsBuilder::validate_values(
            &options.database,
            &options.migrations,
            &options.entities,
            &options.subscribers,
        )?;

        info!("从文件加载数据源配置: {:?}", config_path.as_ref());
        Ok(options)
    }

    /// 保存配置到文件
    ///
    /// # 参数
    ///
    /// * `config_path` - 配置文件路径
    pub fn save_to_file<P: AsRef<Path>>(&self, config_path: P) -> Result<(), DataSourceError> {
        let content = if is_toml(config_path.as_ref()) {
            toml::to_string_pretty(self)
                .map_err(|e| crate::ds_error!(serialization, format!("序列化TOML配置失败: {}", e)))?
        } else {
            serde_json::to_string_pretty(self)
                .map_err(|e| crate::ds_error!(serialization, format!("序列化JSON配置失败: {}", e)))?
        };

        std::fs::write(config_path.as_ref(), content)?;

        info!("保存数据源配置到文件: {:?}", config_path.as_ref());
        Ok(())
    }

    pub fn db_type(&self) -> DatabaseType {
        self.db_type
    }

    /// 数据库文件路径
    pub fn database(&self) -> &str {
        &self.database
    }

    /// 是否自动同步表结构（恒为 false）
    pub fn synchronize(&self) -> bool {
        self.synchronize
    }

    /// 是否启用诊断日志
    pub fn logging(&self) -> bool {
        self.logging
    }

    pub fn entities(&self) -> &[EntityKind] {
        &self.entities
    }

    /// 待注册实体的元数据
    pub fn entity_metas(&self) -> Vec<EntityMeta> {
        self.entities.iter().map(EntityKind::meta).collect()
    }

    /// 迁移脚本的发现模式
    pub fn migrations(&self) -> &str {
        &self.migrations
    }

    pub fn subscribers(&self) -> &[SubscriberDescriptor] {
        &self.subscribers
    }
}

/// 应用的数据源配置，等同于 [`DataSourceOptions::for_environment`]
pub fn app_data_source(environment: Environment) -> DataSourceOptions {
    DataSourceOptions::for_environment(environment)
}

fn is_toml(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_logging_follows_development_marker() {
        let dev = app_data_source(Environment::from_value(Some("development")));
        assert!(dev.logging());

        for value in [None, Some("production"), Some("Development"), Some(""), Some("dev")] {
            let options = app_data_source(Environment::from_value(value));
            assert!(!options.logging(), "值 {:?} 不应启用日志", value);
        }
    }

    #[test]
    fn test_synchronize_always_disabled() {
        for env in [
            Environment::Development,
            Environment::Testing,
            Environment::Staging,
            Environment::Production,
        ] {
            assert!(!app_data_source(env).synchronize());
        }
    }

    #[test]
    fn test_fixed_fields() {
        let options = app_data_source(Environment::Production);
        assert_eq!(options.db_type(), DatabaseType::Sqlite);
        assert_eq!(options.database(), "database.sqlite");
        assert_eq!(options.migrations(), "migrations/**/*.sql");
        assert!(options.subscribers().is_empty());

        let entities: HashSet<EntityKind> = options.entities().iter().copied().collect();
        assert_eq!(options.entities().len(), 6);
        assert_eq!(entities.len(), 6);
        for kind in EntityKind::ALL {
            assert!(entities.contains(&kind));
        }
    }

    #[test]
    fn test_construction_is_idempotent() {
        let env = Environment::from_value(Some("staging"));
        assert_eq!(app_data_source(env), app_data_source(env));
        assert_eq!(
            app_data_source(Environment::Development),
            app_data_source(Environment::Development)
        );
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!(Environment::from_value(Some("test")), Environment::Testing);
        assert_eq!(Environment::from_value(Some("testing")), Environment::Testing);
        assert_eq!(Environment::from_value(Some("staging")), Environment::Staging);
        assert_eq!(Environment::from_value(Some("prod")), Environment::Production);
        assert_eq!(Environment::from_value(None), Environment::Production);
    }

    #[test]
    fn test_database_type_name() {
        assert_eq!(DatabaseType::Sqlite.as_str(), "sqlite");
    }

    #[test]
    fn test_file_round_trip_toml_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let options = app_data_source(Environment::Development);

        let toml_path = dir.path().join("datasource.toml");
        options.save_to_file(&toml_path).unwrap();
        assert_eq!(DataSourceOptions::from_file(&toml_path).unwrap(), options);

        let json_path = dir.path().join("datasource.json");
        options.save_to_file(&json_path).unwrap();
        assert_eq!(DataSourceOptions::from_file(&json_path).unwrap(), options);
    }

    #[test]
    fn test_file_with_synchronize_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("datasource.toml");
        std::fs::write(
            &path,
            r#"
db_type = "sqlite"
database = "database.sqlite"
synchronize = true
logging = false
entities = ["User"]
migrations = "migrations/**/*.sql"
subscribers = []
"#,
        )
        .unwrap();

        let err = DataSourceOptions::from_file(&path).unwrap_err();
        assert!(matches!(err, DataSourceError::ConfigError { .. }));
    }

    #[test]
    fn test_file_with_duplicate_entities_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("datasource.toml");
        std::fs::write(
            &path,
            r#"
db_type = "sqlite"
database = "database.sqlite"
synchronize = false
logging = false
entities = ["User", "User"]
migrations = "migrations/**/*.sql"
subscribers = []
"#,
        )
        .unwrap();

        let err = DataSourceOptions::from_file(&path).unwrap_err();
        assert!(matches!(err, DataSourceError::EntityError { ref entity, .. } if entity == "User"));
    }

    #[test]
    fn test_file_with_invalid_values_rejected() {
        let dir = tempfile::tempdir().unwrap();

        let empty_pattern = dir.path().join("empty_pattern.json");
        std::fs::write(
            &empty_pattern,
            r#"{"db_type":"sqlite","database":"database.sqlite","synchronize":false,"logging":false,
                "entities":["User"],"migrations":"","subscribers":[]}"#,
        )
        .unwrap();
        let err = DataSourceOptions::from_file(&empty_pattern).unwrap_err();
        assert!(matches!(err, DataSourceError::ConfigError { .. }));

        let blank_subscribers = dir.path().join("blank_subscribers.json");
        std::fs::write(
            &blank_subscribers,
            r#"{"db_type":"sqlite","database":"database.sqlite","synchronize":false,"logging":false,
                "entities":["User"],"migrations":"migrations/**/*.sql",
                "subscribers":[{"name":"","listen_to":null},{"name":"","listen_to":null}]}"#,
        )
        .unwrap();
        let err = DataSourceOptions::from_file(&blank_subscribers).unwrap_err();
        assert!(matches!(err, DataSourceError::ConfigError { .. }));

        let no_entities = dir.path().join("no_entities.json");
        std::fs::write(
            &no_entities,
            r#"{"db_type":"sqlite","database":"database.sqlite","synchronize":false,"logging":false,
                "entities":[],"migrations":"migrations/**/*.sql","subscribers":[]}"#,
        )
        .unwrap();
        assert!(DataSourceOptions::from_file(&no_entities).is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = DataSourceOptions::from_file("/nonexistent/datasource.toml").unwrap_err();
        assert!(matches!(err, DataSourceError::IoError(_)));
    }
}
