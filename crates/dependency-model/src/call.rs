//! 依赖调用定义

use injection_common::{DependencyError, DependencyResult};

use crate::argument::{Arguments, DependencyCallArgument};

/// 构造函数哨兵方法名
///
/// 以此为方法名的调用被转入构造函数参数槽而不是调用列表
pub const CONSTRUCTOR_METHOD: &str = "new";

/// 依赖调用
///
/// 实例创建后要调用的一个方法及其声明式参数
#[derive(Debug, Clone, PartialEq)]
pub struct DependencyCall {
    method_name: String,
    id: Option<String>,
    arguments: Arguments,
}

impl DependencyCall {
    /// 创建新的依赖调用
    pub fn new(method_name: impl Into<String>) -> DependencyResult<Self> {
        let mut call = Self {
            method_name: String::new(),
            id: None,
            arguments: Arguments::new(),
        };
        call.set_method_name(method_name)?;

        Ok(call)
    }

    /// 设置方法名称
    pub fn set_method_name(&mut self, method_name: impl Into<String>) -> DependencyResult<()> {
        let method_name = method_name.into();
        if method_name.is_empty() {
            return Err(DependencyError::InvalidMethodName);
        }

        self.method_name = method_name;
        Ok(())
    }

    /// 方法名称
    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    /// 设置调用标识
    pub fn set_id(&mut self, id: Option<String>) -> DependencyResult<()> {
        if let Some(id) = &id {
            if id.is_empty() {
                return Err(DependencyError::InvalidId {
                    context: self.method_name.clone(),
                });
            }
        }

        self.id = id;
        Ok(())
    }

    /// 调用标识
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// 添加参数, 以参数自身的名称为键
    pub fn add_argument(&mut self, argument: DependencyCallArgument) {
        self.arguments.set(argument.name().to_string(), argument);
    }

    /// 调用的参数
    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    /// 清空参数
    pub fn clear_arguments(&mut self) {
        self.arguments = Arguments::new();
    }
}

/// 构造依赖的调用
///
/// 通过调用另一个已解析依赖 (工厂) 的方法来构造本依赖,
/// 而不是直接实例化
#[derive(Debug, Clone, PartialEq)]
pub struct DependencyConstructCall {
    interface: String,
    call: DependencyCall,
}

impl DependencyConstructCall {
    /// 创建新的构造调用
    pub fn new(
        interface: impl Into<String>,
        method_name: impl Into<String>,
    ) -> DependencyResult<Self> {
        let interface = interface.into();
        if interface.is_empty() {
            return Err(DependencyError::InvalidInterface);
        }

        Ok(Self {
            interface,
            call: DependencyCall::new(method_name)?,
        })
    }

    /// 工厂的接口名称
    pub fn interface(&self) -> &str {
        &self.interface
    }

    /// 设置工厂依赖的标识
    pub fn set_id(&mut self, id: Option<String>) -> DependencyResult<()> {
        self.call.set_id(id)
    }

    /// 工厂依赖的标识
    pub fn id(&self) -> Option<&str> {
        self.call.id()
    }

    /// 工厂方法名称
    pub fn method_name(&self) -> &str {
        self.call.method_name()
    }

    /// 添加调用参数
    pub fn add_argument(&mut self, argument: DependencyCallArgument) {
        self.call.add_argument(argument);
    }

    /// 调用的参数
    pub fn arguments(&self) -> &Arguments {
        self.call.arguments()
    }
}
