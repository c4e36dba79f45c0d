//! 依赖注册表

use injection_common::{DependencyError, DependencyResult};
use tracing::debug;

use crate::dependency::Dependency;

/// 依赖注册表
///
/// 插入有序的两级映射: 接口名称 -> 定义标识 -> 依赖定义。
/// 同一接口下的注册顺序具有语义: 无标识查找时最后注册的
/// 未被排除的定义胜出
#[derive(Debug, Clone, Default)]
pub struct DependencyContainer {
    dependencies: Vec<(String, Vec<Dependency>)>,
}

impl DependencyContainer {
    /// 创建空的注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加依赖定义
    ///
    /// 定义必须至少声明一个接口。未设置标识时以第一个接口下
    /// 现有条目数量生成 `d<N>`, 且同一次注册的所有接口共用同
    /// 一个标识。同一 (接口, 标识) 槽位原位覆盖
    pub fn add_dependency(&mut self, mut dependency: Dependency) -> DependencyResult<()> {
        let interfaces = dependency.interfaces().to_vec();
        if interfaces.is_empty() {
            return Err(DependencyError::NoInterfaces);
        }

        let id = match dependency.id() {
            Some(id) => id.to_string(),
            None => {
                let count = self.bucket(&interfaces[0]).map_or(0, <[Dependency]>::len);
                let id = format!("d{count}");
                dependency.set_id(Some(id.clone()))?;

                id
            }
        };

        debug!("注册依赖: {} (id: {})", interfaces.join(", "), id);

        for interface in &interfaces {
            let bucket = self.bucket_mut(interface);
            if let Some(position) = bucket.iter().position(|d| d.id() == Some(id.as_str())) {
                bucket[position] = dependency.clone();
            } else {
                bucket.push(dependency.clone());
            }
        }

        Ok(())
    }

    /// 移除一个 (接口, 标识) 槽位
    pub fn remove_dependency(&mut self, interface: &str, id: &str) -> bool {
        let Some(bucket) = self
            .dependencies
            .iter_mut()
            .find(|(name, _)| name == interface)
        else {
            return false;
        };

        let Some(position) = bucket.1.iter().position(|d| d.id() == Some(id)) else {
            return false;
        };

        bucket.1.remove(position);
        true
    }

    /// 获取指定接口的依赖定义, 按注册顺序
    ///
    /// 未知接口返回空集合, 空接口名称为配置错误
    pub fn get_dependencies(&self, interface: &str) -> DependencyResult<Vec<Dependency>> {
        if interface.is_empty() {
            return Err(DependencyError::InvalidInterface);
        }

        Ok(self.bucket(interface).map(<[Dependency]>::to_vec).unwrap_or_default())
    }

    /// 获取完整的注册表视图
    pub fn get_all_dependencies(&self) -> &[(String, Vec<Dependency>)] {
        &self.dependencies
    }

    /// 按标签筛选依赖定义
    ///
    /// 结果持有 `include` 中的全部标签且不持有 `exclude` 中的
    /// 任何标签; 未指定接口时跨全部接口筛选
    pub fn get_dependencies_by_tag(
        &self,
        interface: Option<&str>,
        include: &[&str],
        exclude: &[&str],
    ) -> Vec<Dependency> {
        let matches = |dependency: &Dependency| {
            include.iter().all(|tag| dependency.has_tag(tag))
                && !exclude.iter().any(|tag| dependency.has_tag(tag))
        };

        match interface {
            Some(interface) => self
                .bucket(interface)
                .map(|bucket| bucket.iter().filter(|d| matches(d)).cloned().collect())
                .unwrap_or_default(),
            None => self
                .dependencies
                .iter()
                .flat_map(|(_, bucket)| bucket.iter().filter(|d| matches(d)).cloned())
                .collect(),
        }
    }

    fn bucket(&self, interface: &str) -> Option<&[Dependency]> {
        self.dependencies
            .iter()
            .find(|(name, _)| name == interface)
            .map(|(_, bucket)| bucket.as_slice())
    }

    fn bucket_mut(&mut self, interface: &str) -> &mut Vec<Dependency> {
        if let Some(position) = self
            .dependencies
            .iter()
            .position(|(name, _)| name == interface)
        {
            &mut self.dependencies[position].1
        } else {
            self.dependencies.push((interface.to_string(), Vec::new()));

            let last = self.dependencies.len() - 1;
            &mut self.dependencies[last].1
        }
    }
}
