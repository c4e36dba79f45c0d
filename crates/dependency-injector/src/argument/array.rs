//! 数组参数解析器

use dependency_model::{ArgumentDescriptor, DependencyCallArgument};
use injection_common::{ArgumentValue, DependencyError, DependencyResult};
use serde_json::Value;

use crate::argument::ArgumentParser;
use crate::exclude::ExcludeList;
use crate::injector::DependencyInjector;
use crate::intelligence::RecordedArgument;

/// 数组参数解析器, 产生完整的属性映射
#[derive(Debug, Default)]
pub struct ArrayArgumentParser;

impl ArgumentParser for ArrayArgumentParser {
    fn parse(
        &self,
        argument: &DependencyCallArgument,
        _injector: &mut DependencyInjector,
        _exclude: &mut ExcludeList,
    ) -> DependencyResult<ArgumentValue> {
        let ArgumentDescriptor::Array { properties } = argument.descriptor() else {
            return Err(DependencyError::invalid_properties(format!(
                "参数 {} 不是数组描述符",
                argument.name()
            )));
        };

        Ok(ArgumentValue::Value(Value::Object(properties.clone())))
    }

    fn record(&self, argument: &DependencyCallArgument) -> Option<RecordedArgument> {
        match argument.descriptor() {
            ArgumentDescriptor::Array { properties } => {
                Some(RecordedArgument::Value(Value::Object(properties.clone())))
            }
            _ => None,
        }
    }
}
