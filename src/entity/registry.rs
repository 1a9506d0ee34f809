//! 实体注册表

use super::EntityMeta;
use crate::error::DataSourceResult;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rat_logger::debug;
use std::sync::Arc;

/// 实体注册表
///
/// 以实体名称为键，可在多个任务间共享
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    entities: Arc<DashMap<String, EntityMeta>>,
}

impl EntityRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册实体，重复注册返回错误
    pub fn register(&self, meta: EntityMeta) -> DataSourceResult<()> {
        match self.entities.entry(meta.name.to_string()) {
            Entry::Occupied(_) => Err(crate::ds_error!(entity, meta.name, "实体已注册")),
            Entry::Vacant(slot) => {
                slot.insert(meta);
                debug!("注册实体: 名称={}, 表={}", meta.name, meta.table_name);
                Ok(())
            }
        }
    }

    /// 批量注册实体，遇到第一个错误即停止
    pub fn register_all(&self, metas: &[EntityMeta]) -> DataSourceResult<()> {
        for meta in metas {
            self.register(*meta)?;
        }
        Ok(())
    }

    /// 获取实体元数据
    pub fn get(&self, name: &str) -> Option<EntityMeta> {
        self.entities.get(name).map(|entry| *entry.value())
    }

    /// 检查实体是否已注册
    pub fn has(&self, name: &str) -> bool {
        self.entities.contains_key(name)
    }

    /// 已注册的实体名称（排序后）
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entities.iter().map(|entry| entry.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// 清空注册表
    pub fn clear(&self) {
        self.entities.clear();
    }
}
