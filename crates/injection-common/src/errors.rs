//! 错误类型定义

use thiserror::Error;

/// 反射端口错误类型
#[derive(Error, Debug)]
pub enum ReflectionError {
    #[error("未知的类: {class_name}")]
    UnknownClass { class_name: String },

    #[error("未知的回调: {callback}")]
    UnknownCallback { callback: String },

    #[error("回调不可调用: {callback}")]
    NotInvocable { callback: String },

    #[error("实例创建失败: {class_name}, 原因: {message}")]
    InstantiationFailed { class_name: String, message: String },

    #[error("回调调用失败: {callback}, 原因: {message}")]
    InvocationFailed { callback: String, message: String },

    #[error("参数值类型不匹配: {message}")]
    ArgumentMismatch { message: String },
}

impl ReflectionError {
    /// 创建实例创建失败错误
    pub fn instantiation_failed(
        class_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InstantiationFailed {
            class_name: class_name.into(),
            message: message.into(),
        }
    }

    /// 创建回调调用失败错误
    pub fn invocation_failed(callback: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvocationFailed {
            callback: callback.into(),
            message: message.into(),
        }
    }

    /// 创建参数类型不匹配错误
    pub fn argument_mismatch(message: impl Into<String>) -> Self {
        Self::ArgumentMismatch {
            message: message.into(),
        }
    }
}

/// 依赖注入错误类型
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("提供的接口名称为空或无效")]
    InvalidInterface,

    #[error("无法设置 {context} 的标识: 提供的标识为空或无效")]
    InvalidId { context: String },

    #[error("无法设置依赖调用的方法: 提供的方法名称为空或无效")]
    InvalidMethodName,

    #[error("无法设置依赖的类: 提供的类名为空或无效")]
    InvalidClassName,

    #[error("提供的参数名称为空或无效")]
    InvalidArgumentName,

    #[error("提供的参数解析器类型为空或无效")]
    InvalidParserKind,

    #[error("无法添加依赖: 依赖未声明任何接口")]
    NoInterfaces,

    #[error("未设置类型 {kind} 的参数解析器")]
    NoArgumentParser { kind: String },

    #[error("参数描述符属性无效: {message}")]
    InvalidArgumentProperties { message: String },

    #[error("必需参数 {name} 未提供且无法注入")]
    MandatoryParameter {
        name: String,
        #[source]
        source: Option<Box<DependencyError>>,
    },

    #[error("参数 {names} 未在方法签名中定义")]
    UnexpectedArguments { names: String },

    #[error("无法获取 {interface} 的依赖: 没有可注入的依赖")]
    NotFound {
        interface: String,
        id: Option<String>,
        #[source]
        source: Option<Box<DependencyError>>,
    },

    #[error("无法创建 {interface} (id: {id}) 的实例")]
    CreationFailed {
        interface: String,
        id: String,
        #[source]
        source: Box<DependencyError>,
    },

    #[error("无法调用回调 {callback}: 参数解析失败")]
    InvocationFailed {
        callback: String,
        #[source]
        source: Box<DependencyError>,
    },

    #[error("提供的实例类型未注册, 无法确定其接口")]
    UnknownInstanceType,

    #[error("反射错误: {source}")]
    Reflection {
        #[from]
        source: ReflectionError,
    },
}

impl DependencyError {
    /// 创建参数描述符属性无效错误
    pub fn invalid_properties(message: impl Into<String>) -> Self {
        Self::InvalidArgumentProperties {
            message: message.into(),
        }
    }

    /// 创建依赖创建失败错误
    pub fn creation_failed(
        interface: impl Into<String>,
        id: impl Into<String>,
        source: DependencyError,
    ) -> Self {
        Self::CreationFailed {
            interface: interface.into(),
            id: id.into(),
            source: Box::new(source),
        }
    }

    /// 创建依赖未找到错误
    pub fn not_found(
        interface: impl Into<String>,
        id: Option<String>,
        source: Option<DependencyError>,
    ) -> Self {
        Self::NotFound {
            interface: interface.into(),
            id,
            source: source.map(Box::new),
        }
    }
}

/// 结果类型别名
pub type ReflectionResult<T> = Result<T, ReflectionError>;
pub type DependencyResult<T> = Result<T, DependencyError>;
