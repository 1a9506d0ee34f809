//! 数据源连接引导
//!
//! 接收数据源配置，打开 SQLite 连接池、注册实体并执行迁移

use crate::config::DataSourceOptions;
use crate::entity::EntityRegistry;
use crate::error::DataSourceResult;
use crate::migration::{AppliedMigration, MigrationRunner, MigrationScript, discover_migrations};
use rat_logger::{debug, info, warn};
use sqlx::ConnectOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;

/// 数据源
///
/// 配置在构建后不可变；连接池只在 [`DataSource::initialize`] 之后存在
#[derive(Debug)]
pub struct DataSource {
    options: DataSourceOptions,
    registry: EntityRegistry,
    pool: Option<SqlitePool>,
}

impl DataSource {
    /// 创建数据源，不执行任何 IO
    pub fn new(options: DataSourceOptions) -> Self {
        Self {
            options,
            registry: EntityRegistry::new(),
            pool: None,
        }
    }

    pub fn options(&self) -> &DataSourceOptions {
        &self.options
    }

    /// 实体注册表
    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn is_initialized(&self) -> bool {
        self.pool.is_some()
    }

    /// 获取连接池
    pub fn pool(&self) -> DataSourceResult<&SqlitePool> {
        self.pool
            .as_ref()
            .ok_or_else(|| crate::ds_error!(connection, "数据源尚未初始化"))
    }

    /// 打开数据库连接并注册实体
    ///
    /// 数据库文件不存在时自动创建（包括父目录）
    pub async fn initialize(&mut self) -> DataSourceResult<()> {
        if self.pool.is_some() {
            return Err(crate::ds_error!(connection, "数据源已经初始化"));
        }

        let database = self.options.database().to_string();
        info!("初始化数据源: 类型={}, 数据库={}", self.options.db_type().as_str(), database);

        if let Some(parent) = Path::new(&database).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    crate::ds_error!(connection, format!("创建SQLite数据库目录失败: {}", e))
                })?;
            }
        }

        let mut connect_options = SqliteConnectOptions::new()
            .filename(&database)
            .create_if_missing(true);
        if !self.options.logging() {
            connect_options = connect_options.disable_statement_logging();
        }

        let pool = SqlitePoolOptions::new()
            .connect_with(connect_options)
            .await
            .map_err(|e| crate::ds_error!(connection, format!("SQLite连接失败: {}", e)))?;

        if let Err(e) = self.registry.register_all(&self.options.entity_metas()) {
            pool.close().await;
            self.registry.clear();
            return Err(e);
        }
        debug!("已注册实体: {:?}", self.registry.names());

        if self.options.synchronize() {
            warn!("忽略自动同步表结构选项，表结构变更只能通过迁移完成");
        }

        for subscriber in self.options.subscribers() {
            debug!("事件订阅者: {} -> {:?}", subscriber.name, subscriber.listen_to);
        }

        self.pool = Some(pool);
        info!("数据源初始化完成: 实体数量={}", self.registry.len());
        Ok(())
    }

    /// 发现的迁移脚本中尚未执行的部分
    pub async fn pending_migrations(&self) -> DataSourceResult<Vec<MigrationScript>> {
        let pool = self.pool()?;
        let scripts = self.discover_scripts().await?;
        MigrationRunner::new(pool).pending(&scripts).await
    }

    /// 已执行的迁移
    pub async fn applied_migrations(&self) -> DataSourceResult<Vec<AppliedMigration>> {
        MigrationRunner::new(self.pool()?).applied().await
    }

    /// 执行所有未执行的迁移，返回本次执行的脚本
    pub async fn run_migrations(&self) -> DataSourceResult<Vec<MigrationScript>> {
        let pool = self.pool()?;
        let scripts = self.discover_scripts().await?;
        MigrationRunner::new(pool).run(&scripts).await
    }

    /// 在阻塞线程池中扫描迁移目录
    async fn discover_scripts(&self) -> DataSourceResult<Vec<MigrationScript>> {
        let pattern = self.options.migrations().to_string();
        tokio::task::spawn_blocking(move || discover_migrations(&pattern))
            .await
            .map_err(|e| crate::ds_error!(migration, format!("迁移发现任务失败: {}", e)))?
    }

    /// 关闭连接池，之后可以再次初始化
    pub async fn destroy(&mut self) -> DataSourceResult<()> {
        let pool = self
            .pool
            .take()
            .ok_or_else(|| crate::ds_error!(connection, "数据源尚未初始化"))?;

        pool.close().await;
        self.registry.clear();
        info!("数据源已关闭: {}", self.options.database());
        Ok(())
    }
}
