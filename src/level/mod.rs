//! Measurement levels and data types
//!
//! 度量级别与数据类型的兼容性判定：
//! - [`MeasurementLevel`]: 按表达力全序排列的度量级别
//! - [`LevelSet`]: 有序、去重的级别集合
//! - [`DataType`]: 数据类型树（自反、传递的子类型关系）

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;


/// 度量级别
///
/// 按表达力升序排列：`Nominal < Ordinal < Quantitative`
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementLevel {
    /// 名义级别（仅区分类别）
    Nominal,
    /// 序数级别（类别可排序）
    Ordinal,
    /// 定量级别（差值有意义）
    Quantitative,
}

impl MeasurementLevel {
    /// 全部级别，按表达力升序
    pub const ALL: [MeasurementLevel; 3] = [
        MeasurementLevel::Nominal,
        MeasurementLevel::Ordinal,
        MeasurementLevel::Quantitative,
    ];

    /// 级别名称
    pub fn name(&self) -> &'static str {
        match self {
            MeasurementLevel::Nominal => "nominal",
            MeasurementLevel::Ordinal => "ordinal",
            MeasurementLevel::Quantitative => "quantitative",
        }
    }

    /// 判断该级别能否作用于给定数据类型
    ///
    /// 名义和序数级别接受任何数据类型；定量级别要求数据能参与数值运算
    pub fn is_compatible(&self, data_type: DataType) -> bool {
        match self {
            MeasurementLevel::Nominal | MeasurementLevel::Ordinal => true,
            MeasurementLevel::Quantitative => data_type.is_quantifiable(),
        }
    }
}

impl fmt::Display for MeasurementLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 数据类型树
///
/// `Value` 为根类型；具体简单类型是 `Simple` 的子类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// 根类型（任意值）
    Value,
    /// 简单类型（标量）
    Simple,
    /// 字符串
    String,
    /// 数值
    Number,
    /// 布尔
    Boolean,
    /// 日期
    Date,
    /// 列表
    List,
}

impl DataType {
    /// 类型名称
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Value => "value",
            DataType::Simple => "simple",
            DataType::String => "string",
            DataType::Number => "number",
            DataType::Boolean => "boolean",
            DataType::Date => "date",
            DataType::List => "list",
        }
    }

    /// 父类型（根类型返回 None）
    pub fn parent(&self) -> Option<DataType> {
        match self {
            DataType::Value => None,
            DataType::Simple | DataType::List => Some(DataType::Value),
            DataType::String | DataType::Number | DataType::Boolean | DataType::Date => {
                Some(DataType::Simple)
            }
        }
    }

    /// 子类型判定（自反、传递）
    pub fn is_subtype_of(&self, other: DataType) -> bool {
        let mut current = Some(*self);
        while let Some(data_type) = current {
            if data_type == other {
                return true;
            }
            current = data_type.parent();
        }
        false
    }

    /// 该类型的数据能否参与定量运算
    ///
    /// 抽象类型（Value/Simple）保留定量可能性，由子类型最终裁定
    pub(crate) fn is_quantifiable(&self) -> bool {
        matches!(
            self,
            DataType::Value | DataType::Simple | DataType::Number | DataType::Date
        )
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 有序去重的度量级别集合
///
/// 始终按表达力升序存储；序列化为级别名称数组
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<MeasurementLevel>", into = "Vec<MeasurementLevel>")]
pub struct LevelSet {
    levels: SmallVec<[MeasurementLevel; 3]>,
}

impl LevelSet {
    /// 创建空集合
    pub fn new() -> Self {
        LevelSet::default()
    }

    /// 加入级别，返回集合是否发生变化
    pub fn insert(&mut self, level: MeasurementLevel) -> bool {
        if self.contains(level) {
            return false;
        }
        self.levels.push(level);
        self.levels.sort_unstable();
        true
    }

    /// 是否包含给定级别
    pub fn contains(&self, level: MeasurementLevel) -> bool {
        self.levels.contains(&level)
    }

    /// 是否为 other 的超集
    pub fn is_superset_of(&self, other: &LevelSet) -> bool {
        other.iter().all(|level| self.contains(level))
    }

    /// 两个集合是否相交
    pub fn intersects(&self, other: &LevelSet) -> bool {
        self.iter().any(|level| other.contains(level))
    }

    /// 按升序遍历级别
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = MeasurementLevel> + '_ {
        self.levels.iter().copied()
    }

    /// 级别数量
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// 是否为空集合
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl FromIterator<MeasurementLevel> for LevelSet {
    fn from_iter<I: IntoIterator<Item = MeasurementLevel>>(iter: I) -> Self {
        let mut set = LevelSet::new();
        for level in iter {
            set.insert(level);
        }
        set
    }
}

impl<const N: usize> From<[MeasurementLevel; N]> for LevelSet {
    fn from(levels: [MeasurementLevel; N]) -> Self {
        levels.into_iter().collect()
    }
}

impl From<Vec<MeasurementLevel>> for LevelSet {
    fn from(levels: Vec<MeasurementLevel>) -> Self {
        levels.into_iter().collect()
    }
}

impl From<LevelSet> for Vec<MeasurementLevel> {
    fn from(set: LevelSet) -> Self {
        set.levels.into_vec()
    }
}

impl fmt::Display for LevelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, level) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", level)?;
        }
        write!(f, "}}")
    }
}
