//! # Dependency Model
//!
//! 依赖注入框架的声明式模型层: 描述"如何构建一个对象"的被动
//! 值对象, 以及按接口索引这些定义的注册表。
//!
//! ## 核心类型
//!
//! - [`ArgumentDescriptor`] / [`DependencyCallArgument`] - 参数描述符
//! - [`DependencyCall`] / [`DependencyConstructCall`] - 调用定义
//! - [`Dependency`] - 依赖定义
//! - [`DependencyContainer`] - 依赖注册表

pub mod argument;
pub mod call;
pub mod container;
pub mod dependency;

pub use argument::*;
pub use call::*;
pub use container::*;
pub use dependency::*;
