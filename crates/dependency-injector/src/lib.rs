//! # Dependency Injector
//!
//! 依赖注入框架的解析引擎层: 按需从注册表解析依赖, 缓存实例,
//! 递归装配构造函数与方法参数, 并可选地记录解析配方以跳过
//! 重复的反射开销。
//!
//! ## 核心内容
//!
//! - [`DependencyInjector`] - 解析引擎
//! - [`ArgumentParser`] - 参数解析器协议与内建解析器
//! - [`ExcludeList`] - 解析链排除列表
//! - [`DependencyIntelligence`] - 可选的解析记忆层
//!
//! ## 快速开始
//!
//! ```
//! use std::sync::Arc;
//!
//! use dependency_injector::DependencyInjector;
//! use dependency_model::{Dependency, DependencyContainer};
//! use injection_common::{ClassManifest, Instance, ManifestReflection};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! #[derive(Debug)]
//! struct FileLogger;
//!
//! let mut reflection = ManifestReflection::new();
//! reflection.register_class::<FileLogger>(ClassManifest::new("FileLogger", |_| {
//!     Ok(Arc::new(FileLogger) as Instance)
//! }));
//!
//! let mut container = DependencyContainer::new();
//! let mut dependency = Dependency::new("FileLogger")?;
//! dependency.add_interface("Logger");
//! container.add_dependency(dependency)?;
//!
//! let mut injector = DependencyInjector::with_container(Arc::new(reflection), container);
//!
//! let logger = injector.get("Logger")?;
//! assert!(logger.downcast_ref::<FileLogger>().is_some());
//! # Ok(())
//! # }
//! ```

pub mod argument;
pub mod exclude;
pub mod injector;
pub mod intelligence;

pub use argument::*;
pub use exclude::*;
pub use injector::*;
pub use intelligence::*;
