//! 模式构建错误
//!
//! 定义角色类型层级构建过程中的所有错误类型

use crate::level::{DataType, LevelSet};
use thiserror::Error;

/// 模式错误
///
/// 层级构建中的结构性违规；一旦出现说明模式声明本身有误
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// 已被子类型化的角色类型不可再修改
    #[error("Role type '{id}' is sealed: it already has subtypes")]
    SealedType { id: String },

    /// 级别集合只能扩大
    #[error("Non-monotonic levels on '{id}': {proposed} is not a superset of {current}")]
    NonMonotonicLevels {
        id: String,
        current: LevelSet,
        proposed: LevelSet,
    },

    /// 数据类型只能收窄
    #[error("Non-monotonic data type on '{id}': {proposed} is not a subtype of {current}")]
    NonMonotonicDataType {
        id: String,
        current: DataType,
        proposed: DataType,
    },

    /// 重复的类型标识
    #[error("Duplicate role type id: '{id}'")]
    DuplicateType { id: String },

    /// 未知的类型标识
    #[error("Unknown role type: {id}")]
    UnknownType { id: String },
}

impl SchemaError {
    /// 创建封印错误
    pub fn sealed(id: impl Into<String>) -> Self {
        SchemaError::SealedType { id: id.into() }
    }

    /// 创建未知类型错误
    pub fn unknown(id: impl Into<String>) -> Self {
        SchemaError::UnknownType { id: id.into() }
    }
}

/// 模式操作结果
pub type SchemaResult<T> = Result<T, SchemaError>;
