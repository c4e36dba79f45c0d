//! 依赖定义

use injection_common::{DependencyError, DependencyResult};

use crate::argument::Arguments;
use crate::call::{DependencyCall, DependencyConstructCall, CONSTRUCTOR_METHOD};

/// 依赖定义
///
/// 描述一个可构建对象的配方: 类名或构造调用 (二者互斥)、
/// 构造函数参数、创建后要执行的调用、声明的接口与标签
#[derive(Debug, Clone, PartialEq)]
pub struct Dependency {
    class_name: Option<String>,
    construct_call: Option<DependencyConstructCall>,
    id: Option<String>,
    interfaces: Vec<String>,
    constructor_arguments: Option<Arguments>,
    calls: Vec<DependencyCall>,
    tags: Vec<String>,
}

impl Dependency {
    /// 以类名创建依赖定义
    pub fn new(class_name: impl Into<String>) -> DependencyResult<Self> {
        let mut dependency = Self::empty();
        dependency.set_class_name(class_name)?;

        Ok(dependency)
    }

    /// 以构造调用创建依赖定义
    pub fn from_construct_call(construct_call: DependencyConstructCall) -> Self {
        let mut dependency = Self::empty();
        dependency.set_construct_call(construct_call);

        dependency
    }

    fn empty() -> Self {
        Self {
            class_name: None,
            construct_call: None,
            id: None,
            interfaces: Vec::new(),
            constructor_arguments: None,
            calls: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// 设置类名, 同时清除构造调用
    pub fn set_class_name(&mut self, class_name: impl Into<String>) -> DependencyResult<()> {
        let class_name = class_name.into();
        if class_name.is_empty() {
            return Err(DependencyError::InvalidClassName);
        }

        self.class_name = Some(class_name);
        self.construct_call = None;
        Ok(())
    }

    /// 类名, 设置了构造调用时为空
    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    /// 设置构造调用, 同时清除类名
    pub fn set_construct_call(&mut self, construct_call: DependencyConstructCall) {
        self.construct_call = Some(construct_call);
        self.class_name = None;
    }

    /// 构造调用
    pub fn construct_call(&self) -> Option<&DependencyConstructCall> {
        self.construct_call.as_ref()
    }

    /// 设置定义标识
    pub fn set_id(&mut self, id: Option<String>) -> DependencyResult<()> {
        if let Some(id) = &id {
            if id.is_empty() {
                return Err(DependencyError::InvalidId {
                    context: self
                        .class_name
                        .clone()
                        .unwrap_or_else(|| "<construct call>".to_string()),
                });
            }
        }

        self.id = id;
        Ok(())
    }

    /// 定义标识
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// 构造函数参数
    pub fn constructor_arguments(&self) -> Option<&Arguments> {
        self.constructor_arguments.as_ref()
    }

    /// 添加调用
    ///
    /// 方法名为构造函数哨兵的调用被转入构造函数参数槽。
    /// 其余调用按插入顺序保存, 未设置标识时自动分配 `c<N>`,
    /// 标识相同的调用原位替换
    pub fn add_call(&mut self, mut call: DependencyCall) -> DependencyResult<()> {
        if call.method_name() == CONSTRUCTOR_METHOD {
            self.constructor_arguments = Some(call.arguments().clone());

            return Ok(());
        }

        if call.id().is_none() {
            call.set_id(Some(format!("c{}", self.calls.len())))?;
        }

        if let Some(position) = self.calls.iter().position(|c| c.id() == call.id()) {
            self.calls[position] = call;
        } else {
            self.calls.push(call);
        }

        Ok(())
    }

    /// 创建后要执行的调用, 按声明顺序
    pub fn calls(&self) -> &[DependencyCall] {
        &self.calls
    }

    /// 清空全部调用与构造函数参数
    pub fn clear_calls(&mut self) {
        self.constructor_arguments = None;
        self.calls.clear();
    }

    /// 添加声明的接口
    pub fn add_interface(&mut self, interface: impl Into<String>) {
        let interface = interface.into();
        if !self.interfaces.contains(&interface) {
            self.interfaces.push(interface);
        }
    }

    /// 移除声明的接口
    pub fn remove_interface(&mut self, interface: &str) -> bool {
        let Some(position) = self.interfaces.iter().position(|i| i == interface) else {
            return false;
        };

        self.interfaces.remove(position);
        true
    }

    /// 设置声明的接口
    pub fn set_interfaces(&mut self, interfaces: Vec<String>) {
        self.interfaces = interfaces;
    }

    /// 声明的接口
    pub fn interfaces(&self) -> &[String] {
        &self.interfaces
    }

    /// 添加标签
    pub fn add_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }

    /// 移除标签
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let Some(position) = self.tags.iter().position(|t| t == tag) else {
            return false;
        };

        self.tags.remove(position);
        true
    }

    /// 是否具备标签
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// 全部标签
    pub fn tags(&self) -> &[String] {
        &self.tags
    }
}
