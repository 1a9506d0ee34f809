//! 错误处理模块
//!
//! 定义数据源的统一错误类型与快捷构造宏

use thiserror::Error;

/// 数据源错误类型
#[derive(Error, Debug)]
pub enum DataSourceError {
    /// 配置错误
    #[error("配置错误: {message}")]
    ConfigError { message: String },

    /// 数据库连接错误
    #[error("数据库连接失败: {message}")]
    ConnectionError { message: String },

    /// 迁移脚本错误
    #[error("迁移失败: {message}")]
    MigrationError { message: String },

    /// 实体注册错误
    #[error("实体 '{entity}' 错误: {message}")]
    EntityError { entity: String, message: String },

    /// 序列化错误
    #[error("数据序列化失败: {message}")]
    SerializationError { message: String },

    /// IO错误
    #[error("IO错误: {0}")]
    IoError(#[from] std::io::Error),

    /// 其他错误
    #[error("未知错误: {0}")]
    Other(#[from] anyhow::Error),
}

/// 数据源结果类型
pub type DataSourceResult<T> = Result<T, DataSourceError>;

/// 快捷构造错误
///
/// ```
/// use social_datasource::ds_error;
///
/// let err = ds_error!(config, "数据库文件路径不能为空");
/// assert!(err.to_string().contains("数据库文件路径不能为空"));
/// ```
#[macro_export]
macro_rules! ds_error {
    (config, $msg:expr) => {
        $crate::error::DataSourceError::ConfigError {
            message: $msg.to_string(),
        }
    };
    (connection, $msg:expr) => {
        $crate::error::DataSourceError::ConnectionError {
            message: $msg.to_string(),
        }
    };
    (migration, $msg:expr) => {
        $crate::error::DataSourceError::MigrationError {
            message: $msg.to_string(),
        }
    };
    (entity, $entity:expr, $msg:expr) => {
        $crate::error::DataSourceError::EntityError {
            entity: $entity.to_string(),
            message: $msg.to_string(),
        }
    };
    (serialization, $msg:expr) => {
        $crate::error::DataSourceError::SerializationError {
            message: $msg.to_string(),
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_macro_variants() {
        let err = ds_error!(entity, "User", "重复注册");
        match err {
            DataSourceError::EntityError { entity, message } => {
                assert_eq!(entity, "User");
                assert_eq!(message, "重复注册");
            }
            other => panic!("意外的错误类型: {:?}", other),
        }

        let err = ds_error!(migration, format!("版本 {} 重复", 42));
        assert_eq!(err.to_string(), "迁移失败: 版本 42 重复");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: DataSourceError = io.into();
        assert!(matches!(err, DataSourceError::IoError(_)));
    }
}
