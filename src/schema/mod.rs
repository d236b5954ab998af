//! 角色类型模式
//!
//! 角色类型的声明、单调继承与有效级别解析：
//!
//! - [`SchemaTree`](node::SchemaTree) - 角色类型 arena，根类型为继承底值
//! - [`RoleType`](node::RoleType) - 单个角色类型节点
//! - [`RoleSpec`](node::RoleSpec) - 子类型声明的输入记录
//! - [`SchemaError`](errors::SchemaError) - 结构性违规错误
//!
//! 级别集合与数据类型是*单调*属性：本地化后级别只能扩大、
//! 数据类型只能收窄；类型一旦派生出子类型即被封印。
//! 有效级别由 [`SchemaTree::levels_effective`] 惰性计算并按代次缓存。

pub mod errors;
pub mod node;
pub mod resolve;

mod monotonic;

pub use errors::{SchemaError, SchemaResult};
pub use node::{RoleSpec, RoleType, RoleTypeId, SchemaTree};
