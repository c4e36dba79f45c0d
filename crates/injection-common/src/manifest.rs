//! 清单式反射实现
//!
//! 反射端口的默认实现: 类与回调在注册时提供显式清单 (形参列表与
//! 构造/调用闭包), 运行期不做任何语言级反射。实例的运行时类型名称
//! 通过 `TypeId` 反查注册表得到。

use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::debug;

use crate::errors::{ReflectionError, ReflectionResult};
use crate::reflection::{Callback, CallbackInvoker, ParameterInfo, ReflectionHelper};
use crate::value::{ArgumentValue, Instance};

/// 构造函数闭包类型
pub type ConstructorFn = Arc<dyn Fn(&[ArgumentValue]) -> ReflectionResult<Instance> + Send + Sync>;

/// 实例方法闭包类型
pub type MethodFn =
    Arc<dyn Fn(&Instance, &[ArgumentValue]) -> ReflectionResult<ArgumentValue> + Send + Sync>;

/// 自由函数闭包类型
pub type FunctionFn =
    Arc<dyn Fn(&[ArgumentValue]) -> ReflectionResult<ArgumentValue> + Send + Sync>;

/// 方法清单
#[derive(Clone)]
pub struct MethodManifest {
    parameters: Vec<ParameterInfo>,
    invoke: MethodFn,
}

impl MethodManifest {
    /// 创建新的方法清单
    pub fn new<F>(parameters: Vec<ParameterInfo>, invoke: F) -> Self
    where
        F: Fn(&Instance, &[ArgumentValue]) -> ReflectionResult<ArgumentValue>
            + Send
            + Sync
            + 'static,
    {
        Self {
            parameters,
            invoke: Arc::new(invoke),
        }
    }
}

/// 类清单
///
/// 一个可实例化类型的注册信息: 实现的接口、构造函数形参与闭包、
/// 以及可通过回调调用的实例方法
#[derive(Clone)]
pub struct ClassManifest {
    name: String,
    interfaces: Vec<String>,
    parameters: Vec<ParameterInfo>,
    constructor: ConstructorFn,
    methods: HashMap<String, MethodManifest>,
}

impl ClassManifest {
    /// 创建新的类清单
    pub fn new<F>(name: impl Into<String>, constructor: F) -> Self
    where
        F: Fn(&[ArgumentValue]) -> ReflectionResult<Instance> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            interfaces: Vec::new(),
            parameters: Vec::new(),
            constructor: Arc::new(constructor),
            methods: HashMap::new(),
        }
    }

    /// 添加实现的接口
    pub fn with_interface(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    /// 添加构造函数形参
    pub fn with_parameter(mut self, parameter: ParameterInfo) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// 添加实例方法
    pub fn with_method<F>(
        mut self,
        name: impl Into<String>,
        parameters: Vec<ParameterInfo>,
        invoke: F,
    ) -> Self
    where
        F: Fn(&Instance, &[ArgumentValue]) -> ReflectionResult<ArgumentValue>
            + Send
            + Sync
            + 'static,
    {
        self.methods
            .insert(name.into(), MethodManifest::new(parameters, invoke));
        self
    }

    /// 类名
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// 清单式反射注册表
///
/// 同时实现 [`ReflectionHelper`] 与 [`CallbackInvoker`] 两个端口。
/// 类级回调 (`Callback::Class`) 以 `"类名::方法名"` 注册为自由函数。
#[derive(Default)]
pub struct ManifestReflection {
    classes: HashMap<String, ClassManifest>,
    abstracts: HashSet<String>,
    functions: HashMap<String, (Vec<ParameterInfo>, FunctionFn)>,
    type_names: HashMap<TypeId, String>,
}

impl ManifestReflection {
    /// 创建空的注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册类清单
    ///
    /// 类型参数绑定运行时 `TypeId` 与类名, 供实例的类型反查使用
    pub fn register_class<T: Any + Send + Sync>(&mut self, manifest: ClassManifest) {
        debug!("注册类清单: {}", manifest.name);

        self.type_names
            .insert(TypeId::of::<T>(), manifest.name.clone());
        self.classes.insert(manifest.name.clone(), manifest);
    }

    /// 注册仅作为接口使用的类型名称
    pub fn register_interface(&mut self, name: impl Into<String>) {
        self.abstracts.insert(name.into());
    }

    /// 注册自由函数
    pub fn register_function<F>(
        &mut self,
        name: impl Into<String>,
        parameters: Vec<ParameterInfo>,
        invoke: F,
    ) where
        F: Fn(&[ArgumentValue]) -> ReflectionResult<ArgumentValue> + Send + Sync + 'static,
    {
        self.functions
            .insert(name.into(), (parameters, Arc::new(invoke)));
    }

    fn class(&self, class_name: &str) -> ReflectionResult<&ClassManifest> {
        self.classes
            .get(class_name)
            .ok_or_else(|| ReflectionError::UnknownClass {
                class_name: class_name.to_string(),
            })
    }

    fn method(&self, instance: &Instance, method: &str) -> ReflectionResult<&MethodManifest> {
        let class_name =
            self.instance_class(instance)
                .ok_or_else(|| ReflectionError::UnknownCallback {
                    callback: format!("<instance>::{method}"),
                })?;

        self.class(&class_name)?
            .methods
            .get(method)
            .ok_or_else(|| ReflectionError::UnknownCallback {
                callback: format!("{class_name}::{method}"),
            })
    }

    fn function(&self, name: &str) -> ReflectionResult<&(Vec<ParameterInfo>, FunctionFn)> {
        self.functions
            .get(name)
            .ok_or_else(|| ReflectionError::UnknownCallback {
                callback: name.to_string(),
            })
    }
}

impl ReflectionHelper for ManifestReflection {
    fn get_constructor_parameters(&self, class_name: &str) -> ReflectionResult<Vec<ParameterInfo>> {
        Ok(self.class(class_name)?.parameters.clone())
    }

    fn instantiate(
        &self,
        class_name: &str,
        arguments: &[ArgumentValue],
    ) -> ReflectionResult<Instance> {
        (self.class(class_name)?.constructor)(arguments)
    }

    fn is_instantiable(&self, class_name: &str) -> ReflectionResult<bool> {
        if self.classes.contains_key(class_name) {
            Ok(true)
        } else if self.abstracts.contains(class_name) {
            Ok(false)
        } else {
            Err(ReflectionError::UnknownClass {
                class_name: class_name.to_string(),
            })
        }
    }

    fn instance_class(&self, instance: &Instance) -> Option<String> {
        self.type_names.get(&instance.as_ref().type_id()).cloned()
    }

    fn instance_satisfies(&self, instance: &Instance, interface: &str) -> bool {
        let Some(class_name) = self.instance_class(instance) else {
            return false;
        };

        if class_name == interface {
            return true;
        }

        self.classes
            .get(&class_name)
            .is_some_and(|manifest| manifest.interfaces.iter().any(|i| i == interface))
    }
}

impl CallbackInvoker for ManifestReflection {
    fn callback_parameters(&self, callback: &Callback) -> ReflectionResult<Vec<ParameterInfo>> {
        match callback {
            Callback::Function(name) => Ok(self.function(name)?.0.clone()),
            Callback::Method(instance, method) => Ok(self.method(instance, method)?.parameters.clone()),
            Callback::Class(class, method) => {
                Ok(self.function(&format!("{class}::{method}"))?.0.clone())
            }
        }
    }

    fn is_invocable(&self, callback: &Callback) -> bool {
        self.callback_parameters(callback).is_ok()
    }

    fn invoke(
        &self,
        callback: &Callback,
        arguments: &[ArgumentValue],
    ) -> ReflectionResult<ArgumentValue> {
        match callback {
            Callback::Function(name) => (self.function(name)?.1)(arguments),
            Callback::Method(instance, method) => {
                (self.method(instance, method)?.invoke)(instance, arguments)
            }
            Callback::Class(class, method) => {
                (self.function(&format!("{class}::{method}"))?.1)(arguments)
            }
        }
    }
}
