//! 映射校验错误
//!
//! 属性绑定赋值时的词汇表和必填项错误

use thiserror::Error;

/// 映射错误
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MappingError {
    /// 缺少必填的属性名
    #[error("Mapping attribute requires a non-empty name")]
    MissingName,

    /// 聚合操作不在封闭词汇表内
    #[error("Unknown aggregation '{value}': expected one of sum, avg, min, max")]
    UnknownAggregation { value: String },
}

/// 映射操作结果
pub type MappingResult<T> = Result<T, MappingError>;
