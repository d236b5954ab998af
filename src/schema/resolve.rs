//! 有效级别解析
//!
//! 沿父链解析本地或继承值，并按节点代次缓存有效级别序列。
//! 祖先一旦被子类型化即被封印，继承输入稳定，
//! 因此缓存只需在节点自身的本地值变更时失效。

use std::sync::Arc;
use tracing::debug;

use super::errors::SchemaResult;
use super::node::{RoleTypeId, SchemaTree};
use crate::level::{DataType, LevelSet, MeasurementLevel};

/// 缓存的有效级别序列及其计算时的代次
#[derive(Debug, Clone)]
pub(super) struct EffectiveCache {
    pub(super) generation: u64,
    pub(super) levels: Arc<[MeasurementLevel]>,
}

impl SchemaTree {
    /// 节点的本地或继承级别集合
    ///
    /// 沿父链向上取第一个本地化的值；根类型的空集合为底值
    pub fn inherited_levels(&self, id: RoleTypeId) -> SchemaResult<LevelSet> {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.node(node_id)?;
            if let Some(levels) = node.local_levels() {
                return Ok(levels.clone());
            }
            current = node.parent();
        }
        Ok(LevelSet::new())
    }

    /// 节点的本地或继承数据类型
    ///
    /// 沿父链向上取第一个本地化的值；根类型的 `Value` 为底值
    pub fn inherited_data_type(&self, id: RoleTypeId) -> SchemaResult<DataType> {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.node(node_id)?;
            if let Some(data_type) = node.local_data_type() {
                return Ok(data_type);
            }
            current = node.parent();
        }
        Ok(DataType::Value)
    }

    /// 节点的有效级别序列（升序）
    ///
    /// 继承级别中与继承数据类型兼容者。结果按节点代次缓存；
    /// 本地 levels/data_type 变更后下次访问自动重算。
    /// 返回的序列不可变，可被多个读者共享。
    pub fn levels_effective(&self, id: RoleTypeId) -> SchemaResult<Arc<[MeasurementLevel]>> {
        let node = self.node(id)?;
        let generation = node.generation();
        if let Some(cache) = node.cache.read().as_ref() {
            if cache.generation == generation {
                return Ok(Arc::clone(&cache.levels));
            }
        }

        let levels = self.inherited_levels(id)?;
        let data_type = self.inherited_data_type(id)?;
        let effective: Arc<[MeasurementLevel]> = levels
            .iter()
            .filter(|level| level.is_compatible(data_type))
            .collect::<Vec<_>>()
            .into();

        debug!(
            id = %node.id(),
            generation,
            count = effective.len(),
            "computed effective levels"
        );
        *node.cache.write() = Some(EffectiveCache {
            generation,
            levels: Arc::clone(&effective),
        });
        Ok(effective)
    }
}
