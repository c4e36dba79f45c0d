//! 调用参数解析器

use dependency_model::{ArgumentDescriptor, CallTarget, DependencyCallArgument};
use injection_common::{ArgumentValue, Callback, DependencyError, DependencyResult};

use crate::argument::ArgumentParser;
use crate::exclude::ExcludeList;
use crate::injector::DependencyInjector;

/// 调用参数解析器
///
/// 解析调用目标 (依赖方法、类级方法或自由函数), 以嵌套参数映射
/// 调用并产生返回值; 目标依赖的解析与调用都继承当前排除列表
#[derive(Debug, Default)]
pub struct CallArgumentParser;

impl ArgumentParser for CallArgumentParser {
    fn parse(
        &self,
        argument: &DependencyCallArgument,
        injector: &mut DependencyInjector,
        exclude: &mut ExcludeList,
    ) -> DependencyResult<ArgumentValue> {
        let ArgumentDescriptor::Call { target, arguments } = argument.descriptor() else {
            return Err(DependencyError::invalid_properties(format!(
                "参数 {} 不是调用描述符",
                argument.name()
            )));
        };

        let callback = match target {
            CallTarget::Interface {
                interface,
                id,
                method,
            } => {
                if interface.is_empty() {
                    return Err(DependencyError::invalid_properties("请定义 interface 属性"));
                }
                if method.is_empty() {
                    return Err(DependencyError::invalid_properties(
                        "请为类或依赖定义 method 属性",
                    ));
                }

                let instance = injector.get_internal(interface, id.as_deref(), None, false, exclude)?;

                Callback::method(instance, method)
            }
            CallTarget::Class { class, method } => {
                if class.is_empty() || method.is_empty() {
                    return Err(DependencyError::invalid_properties(
                        "请为类或依赖定义 class 与 method 属性",
                    ));
                }

                Callback::class_method(class, method)
            }
            CallTarget::Function { function } => {
                if function.is_empty() {
                    return Err(DependencyError::invalid_properties(
                        "请定义 interface、class 或 function 属性",
                    ));
                }

                Callback::function(function)
            }
        };

        injector.invoke_callback(&callback, Some(arguments.clone()), exclude, false, None)
    }
}
