//! 事件订阅者描述

use crate::entity::EntityKind;
use serde::{Deserialize, Serialize};

/// 事件订阅者描述
///
/// `listen_to` 为空时表示订阅所有实体的事件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriberDescriptor {
    /// 订阅者名称
    pub name: String,
    /// 监听的实体
    pub listen_to: Option<EntityKind>,
}

impl SubscriberDescriptor {
    pub fn new<S: Into<String>>(name: S, listen_to: Option<EntityKind>) -> Self {
        Self {
            name: name.into(),
            listen_to,
        }
    }

    /// 是否接收指定实体的事件
    pub fn listens_to(&self, kind: EntityKind) -> bool {
        self.listen_to.map_or(true, |target| target == kind)
    }
}
