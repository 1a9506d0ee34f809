//! # 数据源配置构建器模块
//!
//! 提供数据源配置的构建器实现，支持链式调用和严格验证

use crate::config::core::{DataSourceOptions, DatabaseType};
use crate::entity::EntityKind;
use crate::error::DataSourceError;
use crate::subscriber::SubscriberDescriptor;
use rat_logger::info;
use std::collections::HashSet;

/// 数据源配置构建器
///
/// 所有配置项必须显式设置；不提供自动同步表结构的开关
#[derive(Debug)]
pub struct DataSourceOptionsBuilder {
    database: Option<String>,
    logging: Option<bool>,
    entities: Option<Vec<EntityKind>>,
    migrations: Option<String>,
    subscribers: Option<Vec<SubscriberDescriptor>>,
}

impl DataSourceOptionsBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self {
            database: None,
            logging: None,
            entities: None,
            migrations: None,
            subscribers: None,
        }
    }

    /// 设置数据库文件路径
    ///
    /// # 参数
    ///
    /// * `database` - 数据库文件路径
    pub fn database<S: Into<String>>(mut self, database: S) -> Self {
        self.database = Some(database.into());
        self
    }

    /// 设置是否启用诊断日志
    pub fn logging(mut self, logging: bool) -> Self {
        self.logging = Some(logging);
        self
    }

    /// 设置需要注册的实体
    ///
    /// # 参数
    ///
    /// * `entities` - 实体列表
    pub fn entities<I: IntoIterator<Item = EntityKind>>(mut self, entities: I) -> Self {
        self.entities = Some(entities.into_iter().collect());
        self
    }

    /// 设置迁移脚本的发现模式
    ///
    /// # 参数
    ///
    /// * `pattern` - glob 模式，例如 `migrations/**/*.sql`
    pub fn migrations<S: Into<String>>(mut self, pattern: S) -> Self {
        self.migrations = Some(pattern.into());
        self
    }

    /// 设置事件订阅者
    pub fn subscribers<I: IntoIterator<Item = SubscriberDescriptor>>(mut self, subscribers: I) -> Self {
        self.subscribers = Some(subscribers.into_iter().collect());
        self
    }

    /// 构建数据源配置
    ///
    /// # 错误
    ///
    /// 如果任何必需的配置项未设置或取值非法，将返回错误
    pub fn build(self) -> Result<DataSourceOptions, DataSourceError> {
        let database = self
            .database
            .ok_or_else(|| crate::ds_error!(config, "数据库文件路径必须设置"))?;

        let logging = self
            .logging
            .ok_or_else(|| crate::ds_error!(config, "日志选项必须设置"))?;

        let entities = self
            .entities
            .ok_or_else(|| crate::ds_error!(config, "实体列表必须设置"))?;

        let migrations = self
            .migrations
            .ok_or_else(|| crate::ds_error!(config, "迁移脚本模式必须设置"))?;

        let subscribers = self
            .subscribers
            .ok_or_else(|| crate::ds_error!(config, "订阅者列表必须设置"))?;

        Self::validate_values(&database, &migrations, &entities, &subscribers)?;

        info!(
            "创建数据源配置: 数据库={}, 实体数量={}, 日志={}",
            database,
            entities.len(),
            logging
        );

        Ok(DataSourceOptions {
            db_type: DatabaseType::Sqlite,
            database,
            synchronize: false,
            logging,
            entities,
            migrations,
            subscribers,
        })
    }

    /// 校验各配置项的取值，构建器与配置文件加载共用
    pub(crate) fn validate_values(
        database: &str,
        migrations: &str,
        entities: &[EntityKind],
        subscribers: &[SubscriberDescriptor],
    ) -> Result<(), DataSourceError> {
        if database.trim().is_empty() {
            return Err(crate::ds_error!(config, "数据库文件路径不能为空"));
        }

        if migrations.trim().is_empty() {
            return Err(crate::ds_error!(config, "迁移脚本模式不能为空"));
        }

        Self::validate_entities(entities)?;
        Self::validate_subscribers(subscribers)
    }

    fn validate_entities(entities: &[EntityKind]) -> Result<(), DataSourceError> {
        if entities.is_empty() {
            return Err(crate::ds_error!(config, "至少需要注册一个实体"));
        }

        let mut seen = HashSet::new();
        for kind in entities {
            if !seen.insert(*kind) {
                return Err(crate::ds_error!(entity, kind.name(), "实体重复声明"));
            }
        }
        Ok(())
    }

    fn validate_subscribers(subscribers: &[SubscriberDescriptor]) -> Result<(), DataSourceError> {
        let mut seen = HashSet::new();
        for subscriber in subscribers {
            if subscriber.name.trim().is_empty() {
                return Err(crate::ds_error!(config, "订阅者名称不能为空"));
            }
            if !seen.insert(subscriber.name.as_str()) {
                return Err(crate::ds_error!(
                    config,
                    format!("订阅者 '{}' 重复声明", subscriber.name)
                ));
            }
        }
        Ok(())
    }
}

impl Default for DataSourceOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> DataSourceOptionsBuilder {
        DataSourceOptions::builder()
            .database("data/app.sqlite")
            .logging(true)
            .entities(EntityKind::ALL)
            .migrations("db/migrations/*.sql")
            .subscribers(Vec::new())
    }

    #[test]
    fn test_build_complete() {
        let options = complete().build().unwrap();
        assert_eq!(options.database(), "data/app.sqlite");
        assert!(options.logging());
        assert!(!options.synchronize());
        assert_eq!(options.entities().len(), 6);
        assert_eq!(options.migrations(), "db/migrations/*.sql");
    }

    #[test]
    fn test_missing_item_rejected() {
        let err = DataSourceOptions::builder()
            .database("app.sqlite")
            .entities(EntityKind::ALL)
            .migrations("migrations/*.sql")
            .subscribers(Vec::new())
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("日志选项必须设置"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(complete().database("  ").build().is_err());
        assert!(complete().migrations("").build().is_err());
        assert!(complete().entities(Vec::new()).build().is_err());

        let err = complete()
            .entities([EntityKind::User, EntityKind::Post, EntityKind::User])
            .build()
            .unwrap_err();
        assert!(matches!(err, DataSourceError::EntityError { .. }));
    }

    #[test]
    fn test_subscribers_validated() {
        let options = complete()
            .subscribers([SubscriberDescriptor::new("feed", Some(EntityKind::Post))])
            .build()
            .unwrap();
        assert_eq!(options.subscribers().len(), 1);

        let err = complete()
            .subscribers([
                SubscriberDescriptor::new("feed", None),
                SubscriberDescriptor::new("feed", Some(EntityKind::Like)),
            ])
            .build()
            .unwrap_err();
        assert!(matches!(err, DataSourceError::ConfigError { .. }));
    }
}
