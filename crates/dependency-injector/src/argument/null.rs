//! 空值参数解析器

use dependency_model::DependencyCallArgument;
use injection_common::{ArgumentValue, DependencyResult};
use serde_json::Value;

use crate::argument::ArgumentParser;
use crate::exclude::ExcludeList;
use crate::injector::DependencyInjector;
use crate::intelligence::RecordedArgument;

/// 空值参数解析器, 始终产生空值
#[derive(Debug, Default)]
pub struct NullArgumentParser;

impl ArgumentParser for NullArgumentParser {
    fn parse(
        &self,
        _argument: &DependencyCallArgument,
        _injector: &mut DependencyInjector,
        _exclude: &mut ExcludeList,
    ) -> DependencyResult<ArgumentValue> {
        Ok(ArgumentValue::null())
    }

    fn record(&self, _argument: &DependencyCallArgument) -> Option<RecordedArgument> {
        Some(RecordedArgument::Value(Value::Null))
    }
}
