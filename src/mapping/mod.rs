//! 视觉角色映射
//!
//! 将具体数据属性绑定到一个角色类型，并推导映射实际生效的度量级别：
//!
//! - [`Mapping`] - 映射实例（角色类型 + 固定级别 + 属性序列）
//! - [`MappingAttribute`](attribute::MappingAttribute) - 单个属性绑定
//! - [`NaturalLevels`] - 外部数据框架注入的天然级别解析能力
//!
//! 映射的*无效状态*（固定级别不在有效级别内、属性不可解析）
//! 是运行期可修正的普通状态：派生访问器返回 `None`，从不报错；
//! 只有显式赋值（属性名、聚合词汇表）才会失败。

pub mod attribute;
pub mod errors;

pub use attribute::{Aggregation, MappingAttribute};
pub use errors::{MappingError, MappingResult};

#[cfg(test)]
mod tests;

use crate::level::{LevelSet, MeasurementLevel};
use crate::schema::{RoleTypeId, SchemaResult, SchemaTree};

/// 数据属性的天然度量级别解析能力
///
/// 由外部数据描述框架注入；返回 `None` 表示属性不可解析，
/// 该属性随即与所有级别不兼容
pub trait NaturalLevels {
    /// 给定属性名，返回底层数据天然支持的级别集合
    fn natural_levels(&self, name: &str) -> Option<LevelSet>;
}

impl<F> NaturalLevels for F
where
    F: Fn(&str) -> Option<LevelSet>,
{
    fn natural_levels(&self, name: &str) -> Option<LevelSet> {
        self(name)
    }
}

/// 候选级别与属性天然级别的匹配策略
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LevelMatch {
    /// 候选级别必须是天然级别集合的成员（默认）
    #[default]
    Member,
    /// 天然级别中存在不低于候选级别者即可（允许降级使用）
    Degrade,
}

impl LevelMatch {
    fn matches(&self, candidate: MeasurementLevel, natural: &LevelSet) -> bool {
        match self {
            LevelMatch::Member => natural.contains(candidate),
            LevelMatch::Degrade => natural.iter().any(|level| level >= candidate),
        }
    }
}

/// 视觉角色映射实例
///
/// 角色类型在构造后不可变；固定级别与属性序列可自由变更。
/// 属性顺序即绑定顺序，有意义。
#[derive(Debug, Clone)]
pub struct Mapping {
    node: RoleTypeId,
    level: Option<MeasurementLevel>,
    attrs: Vec<MappingAttribute>,
}

impl Mapping {
    /// 创建空映射
    pub fn new(node: RoleTypeId) -> Self {
        Mapping {
            node,
            level: None,
            attrs: Vec::new(),
        }
    }

    /// 绑定的角色类型
    pub fn node(&self) -> RoleTypeId {
        self.node
    }

    /// 固定的度量级别（`None` 表示自动推导）
    pub fn level(&self) -> Option<MeasurementLevel> {
        self.level
    }

    /// 固定度量级别（`None` 恢复自动推导）
    pub fn set_level(&mut self, level: Option<MeasurementLevel>) {
        self.level = level;
    }

    /// 属性绑定序列（按绑定顺序）
    pub fn attributes(&self) -> &[MappingAttribute] {
        &self.attrs
    }

    /// 追加属性绑定
    pub fn push_attribute(&mut self, attr: MappingAttribute) {
        self.attrs.push(attr);
    }

    /// 属性绑定序列的可变访问
    pub fn attributes_mut(&mut self) -> &mut Vec<MappingAttribute> {
        &mut self.attrs
    }

    /// 实际生效的度量级别
    ///
    /// 固定级别属于有效级别时返回之；固定级别无效时映射为无效状态，
    /// 返回 `None`；未固定时返回自动推导级别
    pub fn level_effective(
        &self,
        tree: &SchemaTree,
        natural: &dyn NaturalLevels,
    ) -> SchemaResult<Option<MeasurementLevel>> {
        match self.level {
            Some(level) => {
                let effective = tree.levels_effective(self.node)?;
                Ok(effective.contains(&level).then_some(level))
            }
            None => self.level_auto(tree, natural),
        }
    }

    /// 自动推导的度量级别
    ///
    /// 有效级别中自高向低第一个与所有已绑定属性兼容者。
    /// 无属性或映射无效时为 `None`。更高级别表达力更强，优先使用
    pub fn level_auto(
        &self,
        tree: &SchemaTree,
        natural: &dyn NaturalLevels,
    ) -> SchemaResult<Option<MeasurementLevel>> {
        self.level_auto_with(tree, natural, LevelMatch::default())
    }

    /// 按指定匹配策略推导自动级别
    pub fn level_auto_with(
        &self,
        tree: &SchemaTree,
        natural: &dyn NaturalLevels,
        matching: LevelMatch,
    ) -> SchemaResult<Option<MeasurementLevel>> {
        if self.attrs.is_empty() {
            return Ok(None);
        }
        let effective = tree.levels_effective(self.node)?;
        if let Some(level) = self.level {
            if !effective.contains(&level) {
                return Ok(None);
            }
        }

        // 每个属性只解析一次天然级别；不可解析即与所有级别不兼容
        let mut naturals = Vec::with_capacity(self.attrs.len());
        for attr in &self.attrs {
            match natural.natural_levels(attr.name()) {
                Some(set) => naturals.push(set),
                None => return Ok(None),
            }
        }

        for level in effective.iter().rev() {
            if naturals.iter().all(|set| matching.matches(*level, set)) {
                return Ok(Some(*level));
            }
        }
        Ok(None)
    }

    /// 映射当前是否有效
    ///
    /// 固定级别必须属于有效级别，且所有属性必须可解析
    pub fn is_valid(
        &self,
        tree: &SchemaTree,
        natural: &dyn NaturalLevels,
    ) -> SchemaResult<bool> {
        if let Some(level) = self.level {
            let effective = tree.levels_effective(self.node)?;
            if !effective.contains(&level) {
                return Ok(false);
            }
        }
        Ok(self
            .attrs
            .iter()
            .all(|attr| natural.natural_levels(attr.name()).is_some()))
    }
}
