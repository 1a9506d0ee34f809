//! 实体定义模块
//!
//! 实体集合在编译期已知且封闭，每个实体对应一条注册描述

mod registry;

pub use registry::EntityRegistry;

use crate::error::DataSourceError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 已知实体类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    /// 用户
    User,
    /// 帖子
    Post,
    /// 点赞
    Like,
    /// 关注关系
    Follow,
    /// 话题标签
    Hashtag,
    /// 用户动态
    Activity,
}

impl EntityKind {
    /// 全部实体，按注册顺序排列
    pub const ALL: [EntityKind; 6] = [
        EntityKind::User,
        EntityKind::Post,
        EntityKind::Like,
        EntityKind::Follow,
        EntityKind::Hashtag,
        EntityKind::Activity,
    ];

    /// 实体名称
    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::User => "User",
            EntityKind::Post => "Post",
            EntityKind::Like => "Like",
            EntityKind::Follow => "Follow",
            EntityKind::Hashtag => "Hashtag",
            EntityKind::Activity => "Activity",
        }
    }

    /// 对应的表名
    pub fn table_name(&self) -> &'static str {
        match self {
            EntityKind::User => "user",
            EntityKind::Post => "post",
            EntityKind::Like => "like",
            EntityKind::Follow => "follow",
            EntityKind::Hashtag => "hashtag",
            EntityKind::Activity => "activity",
        }
    }

    /// 生成注册用的实体描述
    pub fn meta(&self) -> EntityMeta {
        EntityMeta {
            kind: *self,
            name: self.name(),
            table_name: self.table_name(),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EntityKind {
    type Err = DataSourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| crate::ds_error!(entity, s, "未知的实体类型"))
    }
}

/// 实体元数据
///
/// 只描述注册所需的标识，不包含字段结构
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct EntityMeta {
    /// 实体类型
    pub kind: EntityKind,
    /// 实体名称
    pub name: &'static str,
    /// 表名
    pub table_name: &'static str,
}

/// 应用注册的全部实体描述
pub fn all_entities() -> Vec<EntityMeta> {
    EntityKind::ALL.iter().map(EntityKind::meta).collect()
}
