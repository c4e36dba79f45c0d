//! 解析排除列表

use std::collections::{HashMap, HashSet};

/// 解析排除列表
///
/// 当前解析调用链上"正在构建"的 (类名, 定义标识) 对。每次实例化
/// 尝试在解析自身参数之前把自己加入列表, 使依赖在自身构建过程中
/// 不会被要求再次构建自己。列表通过 `&mut` 沿递归显式传递, 在一
/// 条顶层解析链内单调增长, 链结束后整体丢弃
#[derive(Debug, Clone, Default)]
pub struct ExcludeList {
    entries: HashMap<String, HashSet<String>>,
}

impl ExcludeList {
    /// 创建空的排除列表
    pub fn new() -> Self {
        Self::default()
    }

    /// 排除一个 (类名, 定义标识) 对
    pub fn add(&mut self, class_name: &str, id: &str) {
        self.entries
            .entry(class_name.to_string())
            .or_default()
            .insert(id.to_string());
    }

    /// 该 (类名, 定义标识) 对是否已被排除
    pub fn contains(&self, class_name: &str, id: &str) -> bool {
        self.entries
            .get(class_name)
            .is_some_and(|ids| ids.contains(id))
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
