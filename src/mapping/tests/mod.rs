//! 映射单元测试
//!
//! 测试属性绑定校验、自动级别推导与映射无效状态

use crate::level::{DataType, LevelSet};
use crate::mapping::{
    Aggregation, LevelMatch, Mapping, MappingAttribute, MappingError, NaturalLevels,
};
use crate::schema::{RoleSpec, RoleTypeId, SchemaTree};

use crate::level::MeasurementLevel::{Nominal, Ordinal, Quantitative};

/// 构造一棵只有单个具体角色类型的树
fn tree_with_role(levels: LevelSet, data_type: DataType) -> (SchemaTree, RoleTypeId) {
    let mut tree = SchemaTree::new();
    let id = tree
        .derive(
            tree.root(),
            RoleSpec::new("role_under_test")
                .with_levels(levels)
                .with_data_type(data_type),
        )
        .unwrap();
    (tree, id)
}

/// 固定表驱动的天然级别解析器
struct TableLevels(Vec<(&'static str, LevelSet)>);

impl NaturalLevels for TableLevels {
    fn natural_levels(&self, name: &str) -> Option<LevelSet> {
        self.0
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, levels)| levels.clone())
    }
}

#[cfg(test)]
mod attribute_tests {
    use super::*;

    #[test]
    fn test_attribute_defaults() {
        let attr = MappingAttribute::new("sales").unwrap();
        assert_eq!(attr.name(), "sales");
        assert_eq!(attr.aggregation(), Aggregation::Sum);
        assert!(!attr.is_reverse());
    }

    #[test]
    fn test_empty_name_fails() {
        assert_eq!(
            MappingAttribute::new("").unwrap_err(),
            MappingError::MissingName
        );
        assert_eq!(
            MappingAttribute::new("   ").unwrap_err(),
            MappingError::MissingName
        );
    }

    #[test]
    fn test_aggregation_vocabulary() {
        assert_eq!("avg".parse::<Aggregation>().unwrap(), Aggregation::Avg);
        let err = "median".parse::<Aggregation>().unwrap_err();
        assert_eq!(
            err,
            MappingError::UnknownAggregation {
                value: "median".to_string()
            }
        );
    }

    #[test]
    fn test_builder_style() {
        let attr = MappingAttribute::new("profit")
            .unwrap()
            .with_aggregation(Aggregation::Max)
            .with_reverse(true);
        assert_eq!(attr.aggregation(), Aggregation::Max);
        assert!(attr.is_reverse());
    }

    #[test]
    fn test_value_equality() {
        let a = MappingAttribute::new("x").unwrap();
        let b = MappingAttribute::new("x").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, b.clone().with_aggregation(Aggregation::Min));
    }

    #[test]
    fn test_serde_defaults() {
        let attr: MappingAttribute = serde_json::from_str(r#"{"name": "sales"}"#).unwrap();
        assert_eq!(attr.aggregation(), Aggregation::Sum);
        assert!(!attr.is_reverse());
    }

    #[test]
    fn test_serde_rejects_invalid() {
        assert!(serde_json::from_str::<MappingAttribute>(r#"{"name": ""}"#).is_err());
        assert!(serde_json::from_str::<MappingAttribute>(
            r#"{"name": "x", "aggregation": "median"}"#
        )
        .is_err());
    }

    #[test]
    fn test_serde_round_trip() {
        let attr = MappingAttribute::new("qty")
            .unwrap()
            .with_aggregation(Aggregation::Avg)
            .with_reverse(true);
        let json = serde_json::to_string(&attr).unwrap();
        let parsed: MappingAttribute = serde_json::from_str(&json).unwrap();
        assert_eq!(attr, parsed);
    }
}

#[cfg(test)]
mod level_auto_tests {
    use super::*;

    #[test]
    fn test_prefers_highest_compatible() {
        let (tree, role) = tree_with_role(
            [Nominal, Ordinal, Quantitative].into(),
            DataType::Number,
        );
        let natural = TableLevels(vec![("product", [Nominal, Ordinal].into())]);

        let mut mapping = Mapping::new(role);
        mapping.push_attribute(MappingAttribute::new("product").unwrap());

        assert_eq!(mapping.level_auto(&tree, &natural).unwrap(), Some(Ordinal));
    }

    #[test]
    fn test_empty_mapping_has_no_auto_level() {
        let (tree, role) = tree_with_role([Nominal, Ordinal].into(), DataType::String);
        let natural = TableLevels(vec![]);
        let mapping = Mapping::new(role);
        assert_eq!(mapping.level_auto(&tree, &natural).unwrap(), None);
    }

    #[test]
    fn test_unresolved_attribute_has_no_auto_level() {
        let (tree, role) = tree_with_role([Nominal].into(), DataType::String);
        let natural = TableLevels(vec![]);

        let mut mapping = Mapping::new(role);
        mapping.push_attribute(MappingAttribute::new("missing").unwrap());

        assert_eq!(mapping.level_auto(&tree, &natural).unwrap(), None);
        assert!(!mapping.is_valid(&tree, &natural).unwrap());
    }

    #[test]
    fn test_all_attributes_must_agree() {
        let (tree, role) = tree_with_role(
            [Nominal, Ordinal, Quantitative].into(),
            DataType::Number,
        );
        // 两个属性的天然级别没有公共成员
        let natural = TableLevels(vec![
            ("a", [Quantitative].into()),
            ("b", [Nominal, Ordinal].into()),
        ]);

        let mut mapping = Mapping::new(role);
        mapping.push_attribute(MappingAttribute::new("a").unwrap());
        mapping.push_attribute(MappingAttribute::new("b").unwrap());

        assert_eq!(mapping.level_auto(&tree, &natural).unwrap(), None);
    }

    #[test]
    fn test_degrade_matching_allows_lower_candidates() {
        // 有效级别 {nominal, quantitative}，属性天然级别只有 ordinal：
        // 成员匹配失败，降级匹配取 nominal
        let (tree, role) =
            tree_with_role([Nominal, Quantitative].into(), DataType::Number);
        let natural = TableLevels(vec![("rank", [Ordinal].into())]);

        let mut mapping = Mapping::new(role);
        mapping.push_attribute(MappingAttribute::new("rank").unwrap());

        assert_eq!(
            mapping
                .level_auto_with(&tree, &natural, LevelMatch::Member)
                .unwrap(),
            None
        );
        assert_eq!(
            mapping
                .level_auto_with(&tree, &natural, LevelMatch::Degrade)
                .unwrap(),
            Some(Nominal)
        );
    }

    #[test]
    fn test_closure_resolver() {
        let (tree, role) = tree_with_role([Nominal, Ordinal].into(), DataType::String);
        let natural = |_: &str| Some(LevelSet::from([Nominal, Ordinal]));

        let mut mapping = Mapping::new(role);
        mapping.push_attribute(MappingAttribute::new("anything").unwrap());

        assert_eq!(mapping.level_auto(&tree, &natural).unwrap(), Some(Ordinal));
    }
}

#[cfg(test)]
mod level_effective_tests {
    use super::*;

    #[test]
    fn test_fixed_valid_level_wins() {
        let (tree, role) = tree_with_role(
            [Nominal, Ordinal, Quantitative].into(),
            DataType::Number,
        );
        let natural = TableLevels(vec![("v", [Nominal, Ordinal, Quantitative].into())]);

        let mut mapping = Mapping::new(role);
        mapping.push_attribute(MappingAttribute::new("v").unwrap());
        mapping.set_level(Some(Nominal));

        // 固定级别优先于自动推导
        assert_eq!(
            mapping.level_effective(&tree, &natural).unwrap(),
            Some(Nominal)
        );
        assert!(mapping.is_valid(&tree, &natural).unwrap());
    }

    #[test]
    fn test_fixed_invalid_level_is_absent_not_error() {
        let (tree, role) = tree_with_role([Nominal].into(), DataType::String);
        let natural = TableLevels(vec![("v", [Nominal].into())]);

        let mut mapping = Mapping::new(role);
        mapping.push_attribute(MappingAttribute::new("v").unwrap());
        mapping.set_level(Some(Quantitative));

        assert_eq!(mapping.level_effective(&tree, &natural).unwrap(), None);
        assert_eq!(mapping.level_auto(&tree, &natural).unwrap(), None);
        assert!(!mapping.is_valid(&tree, &natural).unwrap());
    }

    #[test]
    fn test_unfixed_falls_back_to_auto() {
        let (tree, role) = tree_with_role(
            [Nominal, Ordinal, Quantitative].into(),
            DataType::Number,
        );
        let natural = TableLevels(vec![("v", [Nominal, Quantitative].into())]);

        let mut mapping = Mapping::new(role);
        mapping.push_attribute(MappingAttribute::new("v").unwrap());

        assert_eq!(
            mapping.level_effective(&tree, &natural).unwrap(),
            Some(Quantitative)
        );
    }

    #[test]
    fn test_clearing_fixed_level_restores_auto() {
        let (tree, role) = tree_with_role([Nominal, Ordinal].into(), DataType::String);
        let natural = TableLevels(vec![("v", [Ordinal].into())]);

        let mut mapping = Mapping::new(role);
        mapping.push_attribute(MappingAttribute::new("v").unwrap());
        mapping.set_level(Some(Nominal));
        assert_eq!(
            mapping.level_effective(&tree, &natural).unwrap(),
            Some(Nominal)
        );

        mapping.set_level(None);
        assert_eq!(
            mapping.level_effective(&tree, &natural).unwrap(),
            Some(Ordinal)
        );
    }
}
