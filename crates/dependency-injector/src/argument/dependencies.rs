//! 依赖集合参数解析器

use dependency_model::{ArgumentDescriptor, DependencyCallArgument};
use injection_common::{ArgumentValue, DependencyError, DependencyResult};

use crate::argument::ArgumentParser;
use crate::exclude::ExcludeList;
use crate::injector::DependencyInjector;

/// 依赖集合参数解析器
///
/// 未给出标签过滤时解析接口的全部定义, 否则解析按标签筛选的
/// 子集; 每个成员作为独立的顶层解析执行
#[derive(Debug, Default)]
pub struct DependenciesArgumentParser;

impl ArgumentParser for DependenciesArgumentParser {
    fn parse(
        &self,
        argument: &DependencyCallArgument,
        injector: &mut DependencyInjector,
        _exclude: &mut ExcludeList,
    ) -> DependencyResult<ArgumentValue> {
        let ArgumentDescriptor::Dependencies {
            interface,
            include,
            exclude,
        } = argument.descriptor()
        else {
            return Err(DependencyError::invalid_properties(format!(
                "参数 {} 不是依赖集合描述符",
                argument.name()
            )));
        };

        if interface.is_empty() {
            return Err(DependencyError::invalid_properties("请定义 interface 属性"));
        }

        let instances = if include.is_empty() && exclude.is_empty() {
            injector.get_all(interface)?
        } else {
            let include: Vec<&str> = include.iter().map(String::as_str).collect();
            let exclude: Vec<&str> = exclude.iter().map(String::as_str).collect();

            injector.get_by_tag(Some(interface), &include, &exclude)?
        };

        Ok(ArgumentValue::Instances(instances))
    }
}
