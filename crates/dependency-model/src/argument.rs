//! 参数描述符定义
//!
//! 声明式参数以闭合的类型标签变体建模, 每个变体只携带自身需要的
//! 属性; `Custom` 变体为用户注册的扩展解析器保留逃生通道。

use injection_common::{ArgumentValue, DependencyError, DependencyResult};
use serde_json::{Map, Value};

/// 空值参数类型标签
pub const KIND_NULL: &str = "null";
/// 标量参数类型标签
pub const KIND_SCALAR: &str = "scalar";
/// 数组参数类型标签
pub const KIND_ARRAY: &str = "array";
/// 单个依赖参数类型标签
pub const KIND_DEPENDENCY: &str = "dependency";
/// 依赖集合参数类型标签
pub const KIND_DEPENDENCIES: &str = "dependencies";
/// 调用参数类型标签
pub const KIND_CALL: &str = "call";

/// 调用描述符的目标
#[derive(Debug, Clone, PartialEq)]
pub enum CallTarget {
    /// 解析一个依赖并调用其方法
    Interface {
        /// 依赖的接口名称
        interface: String,
        /// 依赖的标识
        id: Option<String>,
        /// 方法名称
        method: String,
    },
    /// 调用类级方法
    Class {
        /// 类名
        class: String,
        /// 方法名称
        method: String,
    },
    /// 调用自由函数
    Function {
        /// 函数名称
        function: String,
    },
}

/// 参数描述符
///
/// 描述一个声明式参数如何得到实际值
#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentDescriptor {
    /// 始终产生空值
    Null,
    /// 原样产生 `value` 属性
    Scalar {
        /// 字面值
        value: Value,
    },
    /// 产生完整的属性映射
    Array {
        /// 属性映射
        properties: Map<String, Value>,
    },
    /// 通过引擎解析单个依赖
    Dependency {
        /// 依赖的接口名称
        interface: String,
        /// 依赖的标识
        id: Option<String>,
    },
    /// 解析全部或按标签筛选的依赖集合
    Dependencies {
        /// 依赖的接口名称
        interface: String,
        /// 必须具备的标签
        include: Vec<String>,
        /// 不允许具备的标签
        exclude: Vec<String>,
    },
    /// 调用目标并产生其返回值
    Call {
        /// 调用目标
        target: CallTarget,
        /// 调用的参数
        arguments: Arguments,
    },
    /// 用户注册的扩展类型
    Custom {
        /// 扩展类型标签
        kind: String,
        /// 属性映射
        properties: Map<String, Value>,
    },
}

impl ArgumentDescriptor {
    /// 获取类型标签, 即参数解析器注册表的键
    pub fn kind(&self) -> &str {
        match self {
            Self::Null => KIND_NULL,
            Self::Scalar { .. } => KIND_SCALAR,
            Self::Array { .. } => KIND_ARRAY,
            Self::Dependency { .. } => KIND_DEPENDENCY,
            Self::Dependencies { .. } => KIND_DEPENDENCIES,
            Self::Call { .. } => KIND_CALL,
            Self::Custom { kind, .. } => kind,
        }
    }

    /// 创建标量描述符
    pub fn scalar(value: impl Into<Value>) -> Self {
        Self::Scalar {
            value: value.into(),
        }
    }

    /// 创建单个依赖描述符
    pub fn dependency(interface: impl Into<String>) -> Self {
        Self::Dependency {
            interface: interface.into(),
            id: None,
        }
    }

    /// 创建带标识的单个依赖描述符
    pub fn dependency_with_id(interface: impl Into<String>, id: impl Into<String>) -> Self {
        Self::Dependency {
            interface: interface.into(),
            id: Some(id.into()),
        }
    }
}

/// 依赖调用参数
///
/// 一个命名形参与其描述符的绑定
#[derive(Debug, Clone, PartialEq)]
pub struct DependencyCallArgument {
    name: String,
    descriptor: ArgumentDescriptor,
}

impl DependencyCallArgument {
    /// 创建新的依赖调用参数
    pub fn new(
        name: impl Into<String>,
        descriptor: ArgumentDescriptor,
    ) -> DependencyResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(DependencyError::InvalidArgumentName);
        }

        Ok(Self { name, descriptor })
    }

    /// 参数名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 参数描述符
    pub fn descriptor(&self) -> &ArgumentDescriptor {
        &self.descriptor
    }

    /// 类型标签
    pub fn kind(&self) -> &str {
        self.descriptor.kind()
    }
}

/// 提供的参数值
///
/// 调用方提供的参数: 字面值原样使用, 描述符经解析器转换
#[derive(Debug, Clone, PartialEq)]
pub enum ProvidedArgument {
    /// 字面值
    Value(ArgumentValue),
    /// 参数描述符
    Descriptor(DependencyCallArgument),
}

impl From<ArgumentValue> for ProvidedArgument {
    fn from(value: ArgumentValue) -> Self {
        Self::Value(value)
    }
}

impl From<DependencyCallArgument> for ProvidedArgument {
    fn from(argument: DependencyCallArgument) -> Self {
        Self::Descriptor(argument)
    }
}

/// 插入有序的命名参数映射
///
/// 同名写入原位替换, 剩余参数的追加顺序即插入顺序
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    entries: Vec<(String, ProvidedArgument)>,
}

impl Arguments {
    /// 创建空的参数映射
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置命名参数, 已存在时原位替换
    pub fn set(&mut self, name: impl Into<String>, argument: impl Into<ProvidedArgument>) {
        let name = name.into();
        let argument = argument.into();

        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = argument;
        } else {
            self.entries.push((name, argument));
        }
    }

    /// 设置字面值参数
    pub fn with_value(
        mut self,
        name: impl Into<String>,
        value: impl Into<ArgumentValue>,
    ) -> Self {
        self.set(name, ProvidedArgument::Value(value.into()));
        self
    }

    /// 以描述符自身的名称设置参数
    pub fn with_argument(mut self, argument: DependencyCallArgument) -> Self {
        self.set(argument.name().to_string(), argument);
        self
    }

    /// 获取命名参数
    pub fn get(&self, name: &str) -> Option<&ProvidedArgument> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, argument)| argument)
    }

    /// 移除并返回命名参数
    pub fn remove(&mut self, name: &str) -> Option<ProvidedArgument> {
        let position = self.entries.iter().position(|(n, _)| n == name)?;

        Some(self.entries.remove(position).1)
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 参数数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 按插入顺序迭代
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProvidedArgument)> {
        self.entries
            .iter()
            .map(|(name, argument)| (name.as_str(), argument))
    }

    /// 按插入顺序列出参数名称
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }
}

impl IntoIterator for Arguments {
    type Item = (String, ProvidedArgument);
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
