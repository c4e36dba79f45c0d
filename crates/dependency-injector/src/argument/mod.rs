//! 参数解析器协议
//!
//! 把声明式参数描述符转换为实际值的纯映射。解析器通过类型标签
//! 从开放注册表分发, 需要回访引擎解析嵌套依赖的解析器以显式
//! 参数接收引擎与当前排除列表。

mod array;
mod call;
mod dependencies;
mod dependency;
mod null;
mod scalar;

pub use array::ArrayArgumentParser;
pub use call::CallArgumentParser;
pub use dependencies::DependenciesArgumentParser;
pub use dependency::DependencyArgumentParser;
pub use null::NullArgumentParser;
pub use scalar::ScalarArgumentParser;

use dependency_model::DependencyCallArgument;
use injection_common::{ArgumentValue, DependencyResult};

use crate::exclude::ExcludeList;
use crate::injector::DependencyInjector;
use crate::intelligence::RecordedArgument;

/// 参数解析器 trait
pub trait ArgumentParser: Send + Sync {
    /// 把参数描述符解析为实际值
    fn parse(
        &self,
        argument: &DependencyCallArgument,
        injector: &mut DependencyInjector,
        exclude: &mut ExcludeList,
    ) -> DependencyResult<ArgumentValue>;

    /// 供记忆层记录的可重放形式, 无法表示时返回空
    fn record(&self, argument: &DependencyCallArgument) -> Option<RecordedArgument> {
        let _ = argument;

        None
    }
}
