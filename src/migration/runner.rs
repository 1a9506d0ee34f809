//! 迁移执行器
//!
//! 在 `migrations` 表中记录已执行的脚本，每个脚本在独立事务中执行

use super::discovery::MigrationScript;
use crate::error::DataSourceResult;
use rat_logger::{debug, error, info, warn};
use sqlx::SqlitePool;
use std::collections::HashSet;

/// 迁移记录表名
pub const MIGRATIONS_TABLE: &str = "migrations";

/// 已执行的迁移记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMigration {
    /// 版本号
    pub timestamp: i64,
    /// 迁移名称
    pub name: String,
}

/// SQLite 迁移执行器
#[derive(Debug)]
pub struct MigrationRunner<'a> {
    pool: &'a SqlitePool,
}

impl<'a> MigrationRunner<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// 确保迁移记录表存在
    pub async fn ensure_table(&self) -> DataSourceResult<()> {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS \"{}\" (\
                \"id\" INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL, \
                \"timestamp\" INTEGER NOT NULL, \
                \"name\" TEXT NOT NULL)",
            MIGRATIONS_TABLE
        );
        sqlx::query(&sql)
            .execute(self.pool)
            .await
            .map_err(|e| crate::ds_error!(migration, format!("创建迁移记录表失败: {}", e)))?;
        Ok(())
    }

    /// 查询已执行的迁移，按版本号升序
    pub async fn applied(&self) -> DataSourceResult<Vec<AppliedMigration>> {
        self.ensure_table().await?;

        let sql = format!(
            "SELECT \"timestamp\", \"name\" FROM \"{}\" ORDER BY \"timestamp\" ASC",
            MIGRATIONS_TABLE
        );
        let rows = sqlx::query_as::<_, (i64, String)>(&sql)
            .fetch_all(self.pool)
            .await
            .map_err(|e| crate::ds_error!(migration, format!("查询迁移记录失败: {}", e)))?;

        Ok(rows
            .into_iter()
            .map(|(timestamp, name)| AppliedMigration { timestamp, name })
            .collect())
    }

    /// 过滤出尚未执行的脚本，保持原有顺序
    pub async fn pending(&self, scripts: &[MigrationScript]) -> DataSourceResult<Vec<MigrationScript>> {
        let applied: HashSet<i64> = self
            .applied()
            .await?
            .into_iter()
            .map(|migration| migration.timestamp)
            .collect();

        Ok(scripts
            .iter()
            .filter(|script| !applied.contains(&script.version))
            .cloned()
            .collect())
    }

    /// 依次执行所有未执行的脚本
    ///
    /// 某个脚本失败时回滚该脚本并停止，之前成功的脚本保持已执行状态
    pub async fn run(&self, scripts: &[MigrationScript]) -> DataSourceResult<Vec<MigrationScript>> {
        let pending = self.pending(scripts).await?;
        if pending.is_empty() {
            info!("没有待执行的迁移");
            return Ok(pending);
        }

        info!("待执行迁移数量: {}", pending.len());
        for script in &pending {
            self.apply(script).await?;
        }
        Ok(pending)
    }

    async fn apply(&self, script: &MigrationScript) -> DataSourceResult<()> {
        let sql = script.read_sql().await?;
        debug!("执行迁移: {} ({:?})", script.full_name(), script.path);

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| crate::ds_error!(migration, format!("开启迁移事务失败: {}", e)))?;

        if let Err(e) = sqlx::raw_sql(&sql).execute(&mut *tx).await {
            error!("迁移执行失败，回滚: {}: {}", script.full_name(), e);
            if let Err(rollback_err) = tx.rollback().await {
                warn!("迁移回滚失败: {}: {}", script.full_name(), rollback_err);
            }
            return Err(crate::ds_error!(
                migration,
                format!("执行迁移 {} 失败: {}", script.full_name(), e)
            ));
        }

        let insert = format!(
            "INSERT INTO \"{}\" (\"timestamp\", \"name\") VALUES (?, ?)",
            MIGRATIONS_TABLE
        );
        sqlx::query(&insert)
            .bind(script.version)
            .bind(&script.name)
            .execute(&mut *tx)
            .await
            .map_err(|e| crate::ds_error!(migration, format!("记录迁移失败: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| crate::ds_error!(migration, format!("提交迁移事务失败: {}", e)))?;

        info!("迁移完成: {}", script.full_name());
        Ok(())
    }
}
