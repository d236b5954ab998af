//! 映射属性绑定
//!
//! 视觉角色映射中的单个数据属性：属性名、聚合操作与反转标志。
//! 聚合操作是封闭词汇表，按值比较。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::{MappingError, MappingResult};

/// 聚合操作
///
/// 封闭词汇表：sum / avg / min / max
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    /// 求和（默认）
    #[default]
    Sum,
    /// 平均
    Avg,
    /// 最小值
    Min,
    /// 最大值
    Max,
}

impl Aggregation {
    /// 操作名称
    pub fn name(&self) -> &'static str {
        match self {
            Aggregation::Sum => "sum",
            Aggregation::Avg => "avg",
            Aggregation::Min => "min",
            Aggregation::Max => "max",
        }
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Aggregation {
    type Err = MappingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sum" => Ok(Aggregation::Sum),
            "avg" => Ok(Aggregation::Avg),
            "min" => Ok(Aggregation::Min),
            "max" => Ok(Aggregation::Max),
            other => Err(MappingError::UnknownAggregation {
                value: other.to_string(),
            }),
        }
    }
}

/// 映射属性绑定
///
/// 按值比较；`name` 必须非空。在映射的属性序列中顺序有意义
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawMappingAttribute")]
pub struct MappingAttribute {
    /// 数据属性名
    name: String,
    /// 聚合操作
    aggregation: Aggregation,
    /// 是否反转
    is_reverse: bool,
}

/// serde 输入形态（经 TryFrom 校验后得到 [`MappingAttribute`]）
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawMappingAttribute {
    name: String,
    #[serde(default)]
    aggregation: Aggregation,
    #[serde(default)]
    is_reverse: bool,
}

impl TryFrom<RawMappingAttribute> for MappingAttribute {
    type Error = MappingError;

    fn try_from(raw: RawMappingAttribute) -> Result<Self, Self::Error> {
        Ok(MappingAttribute::new(raw.name)?
            .with_aggregation(raw.aggregation)
            .with_reverse(raw.is_reverse))
    }
}

impl MappingAttribute {
    /// 创建属性绑定
    ///
    /// 空名称或仅空白的名称失败（[`MappingError::MissingName`]）
    pub fn new(name: impl Into<String>) -> MappingResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(MappingError::MissingName);
        }
        Ok(MappingAttribute {
            name,
            aggregation: Aggregation::default(),
            is_reverse: false,
        })
    }

    /// 指定聚合操作
    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = aggregation;
        self
    }

    /// 指定反转标志
    pub fn with_reverse(mut self, is_reverse: bool) -> Self {
        self.is_reverse = is_reverse;
        self
    }

    /// 数据属性名
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 聚合操作
    pub fn aggregation(&self) -> Aggregation {
        self.aggregation
    }

    /// 是否反转
    pub fn is_reverse(&self) -> bool {
        self.is_reverse
    }
}

impl fmt::Display for MappingAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.aggregation, self.name)
    }
}
