//! 角色类型树
//!
//! [`RoleType`] 节点与 [`SchemaTree`] arena。类型通过 [`SchemaTree::derive`]
//! 派生子类型；首次派生会永久封印父类型的单调属性。
//! 节点按声明顺序存入 arena，父引用为下标，避免所有权环。

use anyhow::Context;
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::Deserialize;
use tracing::debug;

use super::errors::{SchemaError, SchemaResult};
use super::monotonic::{Monotonic, NarrowDataType, WidenLevels};
use super::resolve::EffectiveCache;
use crate::level::{DataType, LevelSet};

/// 角色类型标识（arena 下标）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoleTypeId(pub(crate) usize);

impl RoleTypeId {
    /// arena 下标
    pub fn index(&self) -> usize {
        self.0
    }
}

/// 角色类型声明记录
///
/// 对应一次子类型声明的外部输入；`levels` 和 `data_type`
/// 缺省表示完全继承父类型的值
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RoleSpec {
    /// 类型标识
    pub id: String,
    /// 是否抽象类型
    #[serde(default)]
    pub is_abstract: bool,
    /// 支持的度量级别
    #[serde(default)]
    pub levels: Option<LevelSet>,
    /// 要求的数据类型
    #[serde(default)]
    pub data_type: Option<DataType>,
}

impl RoleSpec {
    /// 创建仅含标识的声明
    pub fn new(id: impl Into<String>) -> Self {
        RoleSpec {
            id: id.into(),
            ..RoleSpec::default()
        }
    }

    /// 声明支持的级别集合
    pub fn with_levels(mut self, levels: LevelSet) -> Self {
        self.levels = Some(levels);
        self
    }

    /// 声明要求的数据类型
    pub fn with_data_type(mut self, data_type: DataType) -> Self {
        self.data_type = Some(data_type);
        self
    }

    /// 声明为抽象类型
    pub fn with_abstract(mut self, is_abstract: bool) -> Self {
        self.is_abstract = is_abstract;
        self
    }
}

/// 角色类型节点
#[derive(Debug)]
pub struct RoleType {
    /// 类型标识
    id: String,
    /// 父类型（根类型为 None）
    parent: Option<RoleTypeId>,
    /// 是否抽象类型
    is_abstract: bool,
    /// 是否已有子类型（只从 false 翻转到 true）
    has_subtypes: bool,
    /// 本地级别集合
    levels: Monotonic<LevelSet>,
    /// 本地数据类型
    data_type: Monotonic<DataType>,
    /// 本地值代次，每次成功变更 +1
    generation: u64,
    /// 有效级别缓存（按代次失效）
    pub(super) cache: RwLock<Option<EffectiveCache>>,
}

impl RoleType {
    fn new(id: String, parent: Option<RoleTypeId>, is_abstract: bool) -> Self {
        RoleType {
            id,
            parent,
            is_abstract,
            has_subtypes: false,
            levels: Monotonic::default(),
            data_type: Monotonic::default(),
            generation: 0,
            cache: RwLock::new(None),
        }
    }

    /// 类型标识
    pub fn id(&self) -> &str {
        &self.id
    }

    /// 父类型
    pub fn parent(&self) -> Option<RoleTypeId> {
        self.parent
    }

    /// 是否抽象类型
    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// 是否已被子类型化（封印）
    pub fn has_subtypes(&self) -> bool {
        self.has_subtypes
    }

    /// 本地级别集合（未本地化时为 None）
    pub fn local_levels(&self) -> Option<&LevelSet> {
        self.levels.local()
    }

    /// 本地数据类型（未本地化时为 None）
    pub fn local_data_type(&self) -> Option<DataType> {
        self.data_type.local().copied()
    }

    /// 本地值代次
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// 根类型的标识
const ROOT_ID: &str = "role";

/// 角色类型树
///
/// 节点 arena。构造时注册根类型：空级别集合加 `Value` 数据类型，
/// 作为整条继承链的底值。树只增不删；模式构建完成后只读。
#[derive(Debug)]
pub struct SchemaTree {
    nodes: IndexMap<String, RoleType>,
}

impl SchemaTree {
    /// 创建只含根类型的树
    pub fn new() -> Self {
        let mut nodes = IndexMap::new();
        nodes.insert(
            ROOT_ID.to_string(),
            RoleType::new(ROOT_ID.to_string(), None, true),
        );
        SchemaTree { nodes }
    }

    /// 根类型标识
    pub fn root(&self) -> RoleTypeId {
        RoleTypeId(0)
    }

    /// 节点数量（含根类型）
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// 树是否为空（恒为 false，根类型始终存在）
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// 按字符串标识查找类型
    pub fn lookup(&self, id: &str) -> Option<RoleTypeId> {
        self.nodes.get_index_of(id).map(RoleTypeId)
    }

    /// 按标识访问节点
    pub fn get(&self, id: RoleTypeId) -> Option<&RoleType> {
        self.nodes.get_index(id.0).map(|(_, node)| node)
    }

    /// 按声明顺序遍历所有类型
    pub fn iter(&self) -> impl Iterator<Item = (RoleTypeId, &RoleType)> {
        self.nodes
            .values()
            .enumerate()
            .map(|(index, node)| (RoleTypeId(index), node))
    }

    pub(super) fn node(&self, id: RoleTypeId) -> SchemaResult<&RoleType> {
        self.get(id)
            .ok_or_else(|| SchemaError::unknown(format!("#{}", id.0)))
    }

    fn node_mut(&mut self, id: RoleTypeId) -> SchemaResult<&mut RoleType> {
        self.nodes
            .get_index_mut(id.0)
            .map(|(_, node)| node)
            .ok_or_else(|| SchemaError::unknown(format!("#{}", id.0)))
    }

    /// 派生子类型
    ///
    /// 声明中的 `levels`/`data_type` 以父类型的生效值为基线做单调检查；
    /// 任一检查失败则整个声明不生效。成功后父类型被永久封印。
    pub fn derive(&mut self, parent: RoleTypeId, spec: RoleSpec) -> SchemaResult<RoleTypeId> {
        self.node(parent)?;
        if self.nodes.contains_key(&spec.id) {
            return Err(SchemaError::DuplicateType { id: spec.id });
        }

        let inherited_levels = self.inherited_levels(parent)?;
        let inherited_data_type = self.inherited_data_type(parent)?;

        let mut levels = Monotonic::default();
        levels.try_set(&spec.id, false, &inherited_levels, spec.levels, &WidenLevels)?;
        let mut data_type = Monotonic::default();
        data_type.try_set(
            &spec.id,
            false,
            &inherited_data_type,
            spec.data_type,
            &NarrowDataType,
        )?;

        let index = self.nodes.len();
        let mut node = RoleType::new(spec.id.clone(), Some(parent), spec.is_abstract);
        node.levels = levels;
        node.data_type = data_type;
        self.nodes.insert(spec.id.clone(), node);
        self.node_mut(parent)?.has_subtypes = true;

        debug!(id = %spec.id, parent = parent.0, "derived role type");
        Ok(RoleTypeId(index))
    }

    /// 从 JSON 声明记录派生子类型
    pub fn derive_from_json(
        &mut self,
        parent: RoleTypeId,
        json: &str,
    ) -> anyhow::Result<RoleTypeId> {
        let spec: RoleSpec =
            serde_json::from_str(json).context("invalid role type spec")?;
        let id = self.derive(parent, spec)?;
        Ok(id)
    }

    /// 设置本地级别集合（只能扩大）
    ///
    /// `None` 视为"不设置"，直接忽略；已封印的类型拒绝任何实际变更
    pub fn set_levels(
        &mut self,
        id: RoleTypeId,
        levels: Option<LevelSet>,
    ) -> SchemaResult<()> {
        let inherited = self.inherited_levels(id)?;
        let node = self.node_mut(id)?;
        let sealed = node.has_subtypes;
        let type_id = node.id.clone();
        let changed = node
            .levels
            .try_set(&type_id, sealed, &inherited, levels, &WidenLevels)?;
        if changed {
            node.generation += 1;
            *node.cache.get_mut() = None;
            debug!(id = %type_id, generation = node.generation, "updated role levels");
        }
        Ok(())
    }

    /// 设置本地数据类型（只能收窄）
    ///
    /// `None` 视为"不设置"，直接忽略；已封印的类型拒绝任何实际变更
    pub fn set_data_type(
        &mut self,
        id: RoleTypeId,
        data_type: Option<DataType>,
    ) -> SchemaResult<()> {
        let inherited = self.inherited_data_type(id)?;
        let node = self.node_mut(id)?;
        let sealed = node.has_subtypes;
        let type_id = node.id.clone();
        let changed =
            node.data_type
                .try_set(&type_id, sealed, &inherited, data_type, &NarrowDataType)?;
        if changed {
            node.generation += 1;
            *node.cache.get_mut() = None;
            debug!(id = %type_id, generation = node.generation, "updated role data type");
        }
        Ok(())
    }
}

impl Default for SchemaTree {
    fn default() -> Self {
        SchemaTree::new()
    }
}
