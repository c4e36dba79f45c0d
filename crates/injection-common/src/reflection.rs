//! 反射与回调调用端口
//!
//! 解析引擎通过窄接口消费类型自省能力: 构造函数/方法的参数清单、
//! 按类名实例化、实例与接口的匹配判断。端口的具体实现由宿主环境
//! 提供, [`crate::manifest`] 提供基于注册清单的默认实现。

use std::fmt;

use crate::errors::ReflectionResult;
use crate::value::{ArgumentValue, Instance};

/// 形参信息
///
/// 一个构造函数或方法的单个形参: 名称、可选的默认值以及
/// 可选的接口提示 (标注该形参期望一个容器管理的依赖)
#[derive(Debug, Clone)]
pub struct ParameterInfo {
    /// 形参名称
    pub name: String,
    /// 默认值, 存在时该形参为可选
    pub default: Option<ArgumentValue>,
    /// 期望的接口名称
    pub interface: Option<String>,
}

impl ParameterInfo {
    /// 创建新的形参信息
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
            interface: None,
        }
    }

    /// 设置默认值
    pub fn with_default(mut self, default: impl Into<ArgumentValue>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// 设置期望的接口
    pub fn with_interface(mut self, interface: impl Into<String>) -> Self {
        self.interface = Some(interface.into());
        self
    }

    /// 形参是否可选
    pub fn is_optional(&self) -> bool {
        self.default.is_some()
    }
}

/// 可调用引用
#[derive(Clone)]
pub enum Callback {
    /// 注册的自由函数
    Function(String),
    /// 实例上的方法
    Method(Instance, String),
    /// 类级方法 (无实例)
    Class(String, String),
}

impl Callback {
    /// 创建函数回调
    pub fn function(name: impl Into<String>) -> Self {
        Self::Function(name.into())
    }

    /// 创建实例方法回调
    pub fn method(instance: Instance, method: impl Into<String>) -> Self {
        Self::Method(instance, method.into())
    }

    /// 创建类级方法回调
    pub fn class_method(class: impl Into<String>, method: impl Into<String>) -> Self {
        Self::Class(class.into(), method.into())
    }

    /// 获取回调的方法名称
    pub fn method_name(&self) -> &str {
        match self {
            Self::Function(name) => name,
            Self::Method(_, method) | Self::Class(_, method) => method,
        }
    }
}

impl fmt::Display for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Function(name) => write!(f, "{name}"),
            Self::Method(_, method) => write!(f, "<instance>::{method}"),
            Self::Class(class, method) => write!(f, "{class}::{method}"),
        }
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callback({self})")
    }
}

/// 反射端口 trait
///
/// 按类名提供构造信息与实例化能力
pub trait ReflectionHelper: Send + Sync {
    /// 获取类的构造函数形参清单 (按声明顺序)
    fn get_constructor_parameters(&self, class_name: &str) -> ReflectionResult<Vec<ParameterInfo>>;

    /// 按类名实例化
    fn instantiate(
        &self,
        class_name: &str,
        arguments: &[ArgumentValue],
    ) -> ReflectionResult<Instance>;

    /// 类型是否可实例化 (接口类型返回 false, 未知类型返回错误)
    fn is_instantiable(&self, class_name: &str) -> ReflectionResult<bool>;

    /// 获取实例的运行时类型名称
    fn instance_class(&self, instance: &Instance) -> Option<String>;

    /// 实例是否满足指定接口
    fn instance_satisfies(&self, instance: &Instance, interface: &str) -> bool;
}

/// 回调调用端口 trait
pub trait CallbackInvoker: Send + Sync {
    /// 获取回调的形参清单 (按声明顺序)
    fn callback_parameters(&self, callback: &Callback) -> ReflectionResult<Vec<ParameterInfo>>;

    /// 回调是否可调用
    fn is_invocable(&self, callback: &Callback) -> bool;

    /// 以解析好的参数调用回调
    fn invoke(
        &self,
        callback: &Callback,
        arguments: &[ArgumentValue],
    ) -> ReflectionResult<ArgumentValue>;
}

/// 完整的反射后端
pub trait ReflectionBackend: ReflectionHelper + CallbackInvoker {}

impl<T: ReflectionHelper + CallbackInvoker> ReflectionBackend for T {}
