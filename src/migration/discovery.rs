//! 迁移脚本发现
//!
//! 按 glob 模式查找脚本文件，文件名格式为 `<版本号>_<名称>.sql`

use crate::error::{DataSourceError, DataSourceResult};
use rat_logger::info;
use regex::Regex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// 迁移脚本
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationScript {
    /// 版本号（通常为毫秒时间戳）
    pub version: i64,
    /// 迁移名称
    pub name: String,
    /// 脚本文件路径
    pub path: PathBuf,
}

impl MigrationScript {
    /// 从文件路径解析迁移脚本
    pub fn from_path<P: AsRef<Path>>(path: P) -> DataSourceResult<Self> {
        static FILE_NAME_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = FILE_NAME_REGEX.get_or_init(|| {
            Regex::new(r"^(\d+)_([A-Za-z0-9_-]+)\.sql$").expect("迁移文件名正则无效")
        });

        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|s| s.to_str())
            .ok_or_else(|| crate::ds_error!(migration, format!("无效的迁移文件路径: {:?}", path)))?;

        let captures = regex.captures(file_name).ok_or_else(|| {
            crate::ds_error!(
                migration,
                format!("迁移文件名格式错误，应为 <版本号>_<名称>.sql: {}", file_name)
            )
        })?;

        let version = captures[1].parse::<i64>().map_err(|e| {
            crate::ds_error!(migration, format!("迁移版本号无效: {} ({})", file_name, e))
        })?;

        Ok(Self {
            version,
            name: captures[2].to_string(),
            path: path.to_path_buf(),
        })
    }

    /// 记录在迁移表中的名称
    pub fn full_name(&self) -> String {
        format!("{}_{}", self.version, self.name)
    }

    /// 读取脚本内容
    pub async fn read_sql(&self) -> DataSourceResult<String> {
        let sql = tokio::fs::read_to_string(&self.path).await?;
        Ok(sql)
    }
}

/// 按模式发现迁移脚本，结果按版本号升序排列
///
/// 没有匹配文件时返回空列表；版本号重复或文件名不合法时返回错误
pub fn discover_migrations(pattern: &str) -> DataSourceResult<Vec<MigrationScript>> {
    let paths = glob::glob(pattern)
        .map_err(|e| crate::ds_error!(migration, format!("迁移脚本模式无效 '{}': {}", pattern, e)))?;

    let mut scripts = Vec::new();
    for entry in paths {
        let path = entry.map_err(|e| {
            crate::ds_error!(migration, format!("读取迁移脚本失败: {}", e))
        })?;
        if !path.is_file() {
            continue;
        }
        scripts.push(MigrationScript::from_path(&path)?);
    }

    scripts.sort_by_key(|script| script.version);
    check_unique_versions(&scripts)?;

    info!("发现迁移脚本: 模式={}, 数量={}", pattern, scripts.len());
    for script in &scripts {
        crate::debug_log!("迁移脚本: 版本={}, 名称={}, 路径={:?}", script.version, script.name, script.path);
    }
    Ok(scripts)
}

fn check_unique_versions(scripts: &[MigrationScript]) -> Result<(), DataSourceError> {
    let mut seen: HashMap<i64, &Path> = HashMap::new();
    for script in scripts {
        if let Some(previous) = seen.insert(script.version, &script.path) {
            return Err(crate::ds_error!(
                migration,
                format!(
                    "迁移版本号 {} 重复: {:?} 与 {:?}",
                    script.version, previous, script.path
                )
            ));
        }
    }
    Ok(())
}
