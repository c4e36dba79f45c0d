//! 单个依赖参数解析器

use dependency_model::{ArgumentDescriptor, DependencyCallArgument};
use injection_common::{ArgumentValue, DependencyError, DependencyResult};

use crate::argument::ArgumentParser;
use crate::exclude::ExcludeList;
use crate::injector::DependencyInjector;
use crate::intelligence::RecordedArgument;

/// 单个依赖参数解析器
///
/// 通过引擎解析 `interface` (可选 `id`) 指定的依赖,
/// 继承当前解析链的排除列表
#[derive(Debug, Default)]
pub struct DependencyArgumentParser;

impl ArgumentParser for DependencyArgumentParser {
    fn parse(
        &self,
        argument: &DependencyCallArgument,
        injector: &mut DependencyInjector,
        exclude: &mut ExcludeList,
    ) -> DependencyResult<ArgumentValue> {
        let ArgumentDescriptor::Dependency { interface, id } = argument.descriptor() else {
            return Err(DependencyError::invalid_properties(format!(
                "参数 {} 不是依赖描述符",
                argument.name()
            )));
        };

        if interface.is_empty() {
            return Err(DependencyError::invalid_properties("请定义 interface 属性"));
        }

        let instance = injector.get_internal(interface, id.as_deref(), None, false, exclude)?;

        Ok(ArgumentValue::Instance(instance))
    }

    fn record(&self, argument: &DependencyCallArgument) -> Option<RecordedArgument> {
        match argument.descriptor() {
            ArgumentDescriptor::Dependency { interface, id } => {
                Some(RecordedArgument::Dependency {
                    interface: interface.clone(),
                    id: id.clone(),
                })
            }
            _ => None,
        }
    }
}
