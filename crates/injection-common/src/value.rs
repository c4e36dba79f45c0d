//! 动态值模型
//!
//! 解析过程中流转的值: 标量数据使用 JSON 值承载, 容器管理的对象
//! 以类型擦除的共享实例承载。

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// 容器管理的实例
///
/// 实例跨接口共享, 身份比较使用 `Arc::ptr_eq`
pub type Instance = Arc<dyn Any + Send + Sync>;

/// 参数的实际值
#[derive(Clone)]
pub enum ArgumentValue {
    /// 标量/数组数据 (JSON 值)
    Value(Value),
    /// 容器管理的单个实例
    Instance(Instance),
    /// 按定义标识键控的实例集合
    Instances(Vec<(String, Instance)>),
}

impl ArgumentValue {
    /// 创建空值
    pub fn null() -> Self {
        Self::Value(Value::Null)
    }

    /// 创建标量值
    pub fn scalar(value: impl Into<Value>) -> Self {
        Self::Value(value.into())
    }

    /// 创建实例值
    pub fn instance<T: Any + Send + Sync>(instance: T) -> Self {
        Self::Instance(Arc::new(instance))
    }

    /// 是否为空值
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Value(Value::Null))
    }

    /// 获取 JSON 值
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    /// 获取字符串值
    pub fn as_str(&self) -> Option<&str> {
        self.as_json().and_then(Value::as_str)
    }

    /// 获取整数值
    pub fn as_i64(&self) -> Option<i64> {
        self.as_json().and_then(Value::as_i64)
    }

    /// 获取浮点数值
    pub fn as_f64(&self) -> Option<f64> {
        self.as_json().and_then(Value::as_f64)
    }

    /// 获取布尔值
    pub fn as_bool(&self) -> Option<bool> {
        self.as_json().and_then(Value::as_bool)
    }

    /// 获取实例
    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Self::Instance(instance) => Some(instance),
            _ => None,
        }
    }

    /// 获取指定类型的实例
    pub fn instance_of<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.as_instance()
            .and_then(|instance| Arc::clone(instance).downcast::<T>().ok())
    }

    /// 获取实例集合
    pub fn as_instances(&self) -> Option<&[(String, Instance)]> {
        match self {
            Self::Instances(instances) => Some(instances),
            _ => None,
        }
    }
}

impl fmt::Debug for ArgumentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Instance(_) => f.write_str("Instance(..)"),
            Self::Instances(instances) => f
                .debug_tuple("Instances")
                .field(&instances.iter().map(|(id, _)| id).collect::<Vec<_>>())
                .finish(),
        }
    }
}

impl PartialEq for ArgumentValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Value(a), Self::Value(b)) => a == b,
            (Self::Instance(a), Self::Instance(b)) => Arc::ptr_eq(a, b),
            (Self::Instances(a), Self::Instances(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b.iter())
                        .all(|((ia, va), (ib, vb))| ia == ib && Arc::ptr_eq(va, vb))
            }
            _ => false,
        }
    }
}

impl From<Value> for ArgumentValue {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<&str> for ArgumentValue {
    fn from(value: &str) -> Self {
        Self::Value(Value::from(value))
    }
}

impl From<String> for ArgumentValue {
    fn from(value: String) -> Self {
        Self::Value(Value::from(value))
    }
}

impl From<i64> for ArgumentValue {
    fn from(value: i64) -> Self {
        Self::Value(Value::from(value))
    }
}

impl From<f64> for ArgumentValue {
    fn from(value: f64) -> Self {
        Self::Value(Value::from(value))
    }
}

impl From<bool> for ArgumentValue {
    fn from(value: bool) -> Self {
        Self::Value(Value::from(value))
    }
}
