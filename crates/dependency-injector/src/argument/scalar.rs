//! 标量参数解析器

use dependency_model::{ArgumentDescriptor, DependencyCallArgument};
use injection_common::{ArgumentValue, DependencyError, DependencyResult};

use crate::argument::ArgumentParser;
use crate::exclude::ExcludeList;
use crate::injector::DependencyInjector;
use crate::intelligence::RecordedArgument;

/// 标量参数解析器, 原样产生 `value` 属性
#[derive(Debug, Default)]
pub struct ScalarArgumentParser;

impl ArgumentParser for ScalarArgumentParser {
    fn parse(
        &self,
        argument: &DependencyCallArgument,
        _injector: &mut DependencyInjector,
        _exclude: &mut ExcludeList,
    ) -> DependencyResult<ArgumentValue> {
        let ArgumentDescriptor::Scalar { value } = argument.descriptor() else {
            return Err(DependencyError::invalid_properties(format!(
                "参数 {} 不是标量描述符",
                argument.name()
            )));
        };

        Ok(ArgumentValue::Value(value.clone()))
    }

    fn record(&self, argument: &DependencyCallArgument) -> Option<RecordedArgument> {
        match argument.descriptor() {
            ArgumentDescriptor::Scalar { value } => Some(RecordedArgument::Value(value.clone())),
            _ => None,
        }
    }
}
