//! 单调继承属性
//!
//! 层级属性的本地值一旦设定，只能沿预定方向继续变化；
//! 节点一旦拥有子类型，属性即被永久冻结。
//! 方向规则由 [`DirectionRule`] 实现提供：级别集合只增不减，
//! 数据类型只能收窄。

use super::errors::{SchemaError, SchemaResult};
use crate::level::{DataType, LevelSet};

/// 单调方向规则
///
/// `allows(baseline, proposed)` 为 true 时，允许从 baseline 变更为 proposed
pub(crate) trait DirectionRule<T> {
    /// 判断变更方向是否合法
    fn allows(&self, baseline: &T, proposed: &T) -> bool;

    /// 构造违反单调性时的错误
    fn violation(&self, id: &str, baseline: &T, proposed: &T) -> SchemaError;
}

/// 可本地化的单调属性槽
///
/// 持有节点的本地值；未本地化时以继承值为基线
#[derive(Debug, Clone)]
pub(crate) struct Monotonic<T> {
    local: Option<T>,
}

impl<T> Default for Monotonic<T> {
    fn default() -> Self {
        Monotonic { local: None }
    }
}

impl<T: Clone> Monotonic<T> {
    /// 本地值（未本地化时为 None）
    pub fn local(&self) -> Option<&T> {
        self.local.as_ref()
    }

    /// 尝试设置本地值
    ///
    /// - `None` 视为"不设置"，直接忽略，永不失败
    /// - 节点已被子类型化时失败（[`SchemaError::SealedType`]）
    /// - 违反方向规则时失败，原值保留
    ///
    /// 基线为已有本地值，否则为调用方给出的继承值。
    /// 返回是否实际发生了变更。
    pub fn try_set<R: DirectionRule<T>>(
        &mut self,
        id: &str,
        sealed: bool,
        inherited: &T,
        proposed: Option<T>,
        rule: &R,
    ) -> SchemaResult<bool> {
        let Some(proposed) = proposed else {
            return Ok(false);
        };
        if sealed {
            return Err(SchemaError::sealed(id));
        }
        let baseline = self.local.as_ref().unwrap_or(inherited);
        if !rule.allows(baseline, &proposed) {
            return Err(rule.violation(id, baseline, &proposed));
        }
        self.local = Some(proposed);
        Ok(true)
    }
}

/// 级别集合方向规则：只增不减
pub(crate) struct WidenLevels;

impl DirectionRule<LevelSet> for WidenLevels {
    fn allows(&self, baseline: &LevelSet, proposed: &LevelSet) -> bool {
        proposed.is_superset_of(baseline)
    }

    fn violation(&self, id: &str, baseline: &LevelSet, proposed: &LevelSet) -> SchemaError {
        SchemaError::NonMonotonicLevels {
            id: id.to_string(),
            current: baseline.clone(),
            proposed: proposed.clone(),
        }
    }
}

/// 数据类型方向规则：只能收窄
pub(crate) struct NarrowDataType;

impl DirectionRule<DataType> for NarrowDataType {
    fn allows(&self, baseline: &DataType, proposed: &DataType) -> bool {
        proposed.is_subtype_of(*baseline)
    }

    fn violation(&self, id: &str, baseline: &DataType, proposed: &DataType) -> SchemaError {
        SchemaError::NonMonotonicDataType {
            id: id.to_string(),
            current: *baseline,
            proposed: *proposed,
        }
    }
}
