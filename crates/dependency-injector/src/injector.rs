//! 依赖解析引擎
//!
//! 按需、递归地从注册表解析依赖: 维护实例缓存与参数解析器注册表,
//! 通过反射端口发现形参并实例化, 可选地挂接解析记忆层。
//! 引擎为单线程同步设计, 整条解析链在调用栈上完成。

use std::collections::HashMap;
use std::sync::Arc;

use dependency_model::{
    Arguments, Dependency, DependencyContainer, ProvidedArgument, CONSTRUCTOR_METHOD, KIND_ARRAY,
    KIND_CALL, KIND_DEPENDENCIES, KIND_DEPENDENCY, KIND_NULL, KIND_SCALAR,
};
use injection_common::{
    ArgumentValue, Callback, DependencyError, DependencyResult, Instance, ParameterInfo,
    ReflectionBackend, ReflectionError,
};
use tracing::{debug, info, warn};

use crate::argument::{
    ArgumentParser, ArrayArgumentParser, CallArgumentParser, DependenciesArgumentParser,
    DependencyArgumentParser, NullArgumentParser, ScalarArgumentParser,
};
use crate::exclude::ExcludeList;
use crate::intelligence::{DependencyIntelligence, InstanceRecipe, RecordedArgument};

/// 未定义依赖的哨兵标识
pub const ID_UNDEFINED: &str = "#undefined#";

/// 手动实例的哨兵标识
pub const ID_MANUAL: &str = "0";

/// 依赖解析引擎
///
/// 持有注册表、实例缓存、参数解析器与可选的解析记忆,
/// 对外暴露 `get` / `get_all` / `get_by_tag` / `invoke`
pub struct DependencyInjector {
    reflection: Arc<dyn ReflectionBackend>,
    container: DependencyContainer,
    argument_parsers: HashMap<String, Arc<dyn ArgumentParser>>,
    instances: HashMap<String, HashMap<String, Instance>>,
    intelligence: Option<DependencyIntelligence>,
}

impl DependencyInjector {
    /// 以空注册表创建引擎
    pub fn new(reflection: Arc<dyn ReflectionBackend>) -> Self {
        Self::with_container(reflection, DependencyContainer::new())
    }

    /// 以指定注册表创建引擎
    pub fn with_container(
        reflection: Arc<dyn ReflectionBackend>,
        container: DependencyContainer,
    ) -> Self {
        let mut injector = Self {
            reflection,
            container,
            argument_parsers: HashMap::new(),
            instances: HashMap::new(),
            intelligence: None,
        };
        injector.register_builtin_parsers();

        injector
    }

    fn register_builtin_parsers(&mut self) {
        self.argument_parsers
            .insert(KIND_NULL.to_string(), Arc::new(NullArgumentParser));
        self.argument_parsers
            .insert(KIND_SCALAR.to_string(), Arc::new(ScalarArgumentParser));
        self.argument_parsers
            .insert(KIND_ARRAY.to_string(), Arc::new(ArrayArgumentParser));
        self.argument_parsers
            .insert(KIND_DEPENDENCY.to_string(), Arc::new(DependencyArgumentParser));
        self.argument_parsers.insert(
            KIND_DEPENDENCIES.to_string(),
            Arc::new(DependenciesArgumentParser),
        );
        self.argument_parsers
            .insert(KIND_CALL.to_string(), Arc::new(CallArgumentParser));
    }

    /// 反射后端
    pub fn reflection(&self) -> &Arc<dyn ReflectionBackend> {
        &self.reflection
    }

    /// 设置或移除指定类型标签的参数解析器
    pub fn set_argument_parser(
        &mut self,
        kind: &str,
        parser: Option<Arc<dyn ArgumentParser>>,
    ) -> DependencyResult<()> {
        if kind.is_empty() {
            return Err(DependencyError::InvalidParserKind);
        }

        match parser {
            Some(parser) => {
                self.argument_parsers.insert(kind.to_string(), parser);
            }
            None => {
                self.argument_parsers.remove(kind);
            }
        }

        Ok(())
    }

    /// 已注册的参数解析器类型标签
    pub fn argument_parser_kinds(&self) -> Vec<&str> {
        self.argument_parsers.keys().map(String::as_str).collect()
    }

    /// 替换依赖注册表
    pub fn set_container(&mut self, container: DependencyContainer, clear_instances: bool) {
        info!(
            "替换依赖注册表{}",
            if clear_instances {
                ", 清空已加载实例"
            } else {
                ""
            }
        );

        self.container = container;
        if clear_instances {
            self.instances.clear();
        }
    }

    /// 依赖注册表
    pub fn container(&self) -> &DependencyContainer {
        &self.container
    }

    /// 依赖注册表 (可变)
    pub fn container_mut(&mut self) -> &mut DependencyContainer {
        &mut self.container
    }

    /// 设置或移除解析记忆
    pub fn set_intelligence(&mut self, intelligence: Option<DependencyIntelligence>) {
        self.intelligence = intelligence;
    }

    /// 解析记忆 (可变), 用于显式持久化
    pub fn intelligence_mut(&mut self) -> Option<&mut DependencyIntelligence> {
        self.intelligence.as_mut()
    }

    /// 手动安装实例
    ///
    /// 之后对该接口的 `get` 调用直接返回此实例而不经过解析。
    /// 未提供接口时使用实例的运行时类型名称, 未提供标识时使用
    /// 手动实例哨兵槽位
    pub fn set_instance(
        &mut self,
        instance: Instance,
        interfaces: Option<&[&str]>,
        id: Option<&str>,
    ) -> DependencyResult<()> {
        let interfaces: Vec<String> = match interfaces {
            Some(interfaces) => {
                if interfaces.iter().any(|interface| interface.is_empty()) {
                    return Err(DependencyError::InvalidInterface);
                }

                interfaces.iter().map(ToString::to_string).collect()
            }
            None => vec![self
                .reflection
                .instance_class(&instance)
                .ok_or(DependencyError::UnknownInstanceType)?],
        };

        let id = id.unwrap_or(ID_MANUAL);
        if id.is_empty() {
            return Err(DependencyError::InvalidId {
                context: interfaces.join(", "),
            });
        }

        for interface in &interfaces {
            self.cache_instance(interface, id, instance.clone());
        }

        Ok(())
    }

    /// 移除手动安装或已缓存的实例
    ///
    /// 给出标识时只移除该槽位, 否则移除接口下的全部实例;
    /// 返回是否移除了内容
    pub fn unset_instance(&mut self, interface: &str, id: Option<&str>) -> DependencyResult<bool> {
        if interface.is_empty() {
            return Err(DependencyError::InvalidInterface);
        }

        match id {
            Some(id) => {
                let Some(bucket) = self.instances.get_mut(interface) else {
                    return Ok(false);
                };

                let removed = bucket.remove(id).is_some();
                if bucket.is_empty() {
                    self.instances.remove(interface);
                }

                Ok(removed)
            }
            None => Ok(self.instances.remove(interface).is_some()),
        }
    }

    /// 指定接口下已加载的实例
    pub fn instances(&self, interface: &str) -> Vec<(String, Instance)> {
        self.instances
            .get(interface)
            .map(|bucket| {
                bucket
                    .iter()
                    .map(|(id, instance)| (id.clone(), instance.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// 解析接口的依赖
    pub fn get(&mut self, interface: &str) -> DependencyResult<Instance> {
        let mut exclude = ExcludeList::new();

        self.get_internal(interface, None, None, false, &mut exclude)
    }

    /// 解析接口下指定标识的依赖
    pub fn get_by_id(&mut self, interface: &str, id: &str) -> DependencyResult<Instance> {
        let mut exclude = ExcludeList::new();

        self.get_internal(interface, Some(id), None, false, &mut exclude)
    }

    /// 解析依赖 (完整形式)
    ///
    /// 提供 `arguments` 时总是构建新实例; 此时若 `invoke_calls`
    /// 为假, 实例既不进入缓存也不执行声明的调用 (纯工厂用法)
    pub fn get_with(
        &mut self,
        interface: &str,
        id: Option<&str>,
        arguments: Option<Arguments>,
        invoke_calls: bool,
    ) -> DependencyResult<Instance> {
        let mut exclude = ExcludeList::new();

        self.get_internal(interface, id, arguments.as_ref(), invoke_calls, &mut exclude)
    }

    /// 解析接口的全部已注册定义, 按定义标识键控
    pub fn get_all(&mut self, interface: &str) -> DependencyResult<Vec<(String, Instance)>> {
        let ids: Vec<String> = self
            .container
            .get_dependencies(interface)?
            .iter()
            .filter_map(|dependency| dependency.id().map(str::to_string))
            .collect();

        let mut result = Vec::with_capacity(ids.len());
        for id in ids {
            let instance = self.get_by_id(interface, &id)?;
            result.push((id, instance));
        }

        Ok(result)
    }

    /// 解析匹配标签过滤的全部定义
    ///
    /// 解析接口取定义最后声明的接口, 无接口声明时退回类名
    pub fn get_by_tag(
        &mut self,
        interface: Option<&str>,
        include: &[&str],
        exclude: &[&str],
    ) -> DependencyResult<Vec<(String, Instance)>> {
        let dependencies = self
            .container
            .get_dependencies_by_tag(interface, include, exclude);

        let mut result = Vec::with_capacity(dependencies.len());
        for dependency in dependencies {
            let Some(id) = dependency.id().map(str::to_string) else {
                continue;
            };

            let Some(resolve_interface) = dependency
                .interfaces()
                .last()
                .cloned()
                .or_else(|| dependency.class_name().map(str::to_string))
            else {
                continue;
            };

            let instance = self.get_by_id(&resolve_interface, &id)?;
            result.push((id, instance));
        }

        Ok(result)
    }

    /// 解析回调的形参并调用
    ///
    /// `is_dynamic` 为真时, 超出签名的参数按出现顺序追加为
    /// 位置参数而不是报错
    pub fn invoke(
        &mut self,
        callback: &Callback,
        arguments: Option<Arguments>,
        is_dynamic: bool,
    ) -> DependencyResult<ArgumentValue> {
        let mut exclude = ExcludeList::new();

        self.invoke_callback(callback, arguments, &mut exclude, is_dynamic, None)
    }

    /// 把提供的参数解析进形参定义
    ///
    /// 形参按声明顺序逐个满足: 提供值优先 (描述符经解析器转换),
    /// 其次是声明的默认值, 最后尝试按接口提示递归解析; 剩余的
    /// 提供值在动态模式下按出现顺序追加, 否则报配置错误
    pub fn parse_arguments(
        &mut self,
        provided: Arguments,
        parameters: &[ParameterInfo],
        exclude: &mut ExcludeList,
        is_dynamic: bool,
    ) -> DependencyResult<Vec<ArgumentValue>> {
        self.parse_arguments_internal(provided, parameters, exclude, is_dynamic, None)
    }

    // --- 内部解析路径 ---

    pub(crate) fn get_internal(
        &mut self,
        interface: &str,
        id: Option<&str>,
        arguments: Option<&Arguments>,
        invoke_calls: bool,
        exclude: &mut ExcludeList,
    ) -> DependencyResult<Instance> {
        if interface.is_empty() {
            return Err(DependencyError::InvalidInterface);
        }
        if let Some(id) = id {
            if id.is_empty() {
                return Err(DependencyError::InvalidId {
                    context: interface.to_string(),
                });
            }
        }

        // 快速路径: 手动安装或已缓存的实例
        if id.is_none() && arguments.is_none() {
            if let Some(instance) = self.cached(interface, ID_MANUAL) {
                return Ok(instance);
            }
        }
        if let Some(id) = id {
            if arguments.is_none() {
                if let Some(instance) = self.cached(interface, id) {
                    return Ok(instance);
                }
            }
        }

        // 记忆层探测
        let mut fingerprint: Option<String> = None;
        if arguments.is_none() && self.intelligence.is_some() {
            let fp = DependencyIntelligence::fingerprint(interface, id);

            let recipe = self
                .intelligence
                .as_ref()
                .and_then(|intelligence| intelligence.recipe(&fp))
                .cloned();
            if let Some(recipe) = recipe {
                if !exclude.contains(&recipe.class_name, &recipe.id) {
                    match self.replay_recipe(&recipe, exclude) {
                        Ok(instance) => {
                            debug!("以记忆配方重建实例: {interface}");

                            for recipe_interface in &recipe.interfaces {
                                self.cache_instance(recipe_interface, &recipe.id, instance.clone());
                            }
                            if id.is_none() {
                                self.cache_instance(interface, ID_MANUAL, instance.clone());
                            }

                            return Ok(instance);
                        }
                        Err(error) => {
                            warn!("记忆配方重建失败, 回退到完整解析: {error}");
                            if let Some(intelligence) = self.intelligence.as_mut() {
                                intelligence.forget(&fp);
                            }
                        }
                    }
                }
            }

            if let Some(intelligence) = self.intelligence.as_mut() {
                intelligence.begin(&fp, id.is_none());
            }
            fingerprint = Some(fp);
        }

        // 定义选择
        let mut candidates = self.container.get_dependencies(interface)?;

        let mut instance: Option<Instance> = None;
        let mut dependency: Option<Dependency> = None;
        let resolved_id: String;

        if let Some(id) = id {
            // 指定标识的定义必须存在且未被排除
            let found = candidates.iter().find(|d| d.id() == Some(id)).cloned();
            let excluded = found.as_ref().is_some_and(|d| {
                d.class_name()
                    .is_some_and(|class_name| exclude.contains(class_name, id))
            });

            let Some(found) = found.filter(|_| !excluded) else {
                self.record_discard(fingerprint.as_deref());

                return Err(DependencyError::not_found(
                    interface,
                    Some(id.to_string()),
                    None,
                ));
            };

            dependency = Some(found);
            resolved_id = id.to_string();
        } else {
            // 最后注册的未被排除的定义胜出
            loop {
                if let Some(candidate) = candidates.pop() {
                    let Some(candidate_id) = candidate.id().map(str::to_string) else {
                        continue;
                    };

                    let excluded = candidate
                        .class_name()
                        .is_some_and(|class_name| exclude.contains(class_name, &candidate_id));
                    if excluded {
                        continue;
                    }

                    dependency = Some(candidate);
                    resolved_id = candidate_id;
                    break;
                }

                // 候选耗尽, 尝试把接口本身当作具体类构建
                let mut cause = None;
                if !exclude.contains(interface, ID_UNDEFINED) {
                    if let Some(cached) = self.cached(interface, ID_UNDEFINED) {
                        instance = Some(cached);
                    } else {
                        match self.create_undefined(
                            interface,
                            arguments,
                            exclude,
                            fingerprint.as_deref(),
                        ) {
                            Ok(created) => instance = created,
                            Err(error) => cause = Some(error),
                        }
                    }
                }

                if instance.is_none() {
                    self.record_discard(fingerprint.as_deref());

                    return Err(DependencyError::not_found(interface, None, cause));
                }

                resolved_id = ID_UNDEFINED.to_string();
                break;
            }

            if arguments.is_none() && instance.is_none() {
                if let Some(cached) = self.cached(interface, &resolved_id) {
                    self.record_discard(fingerprint.as_deref());

                    return Ok(cached);
                }
            }
        }

        // 创建实例
        let instance = match instance {
            Some(instance) => instance,
            None => {
                let Some(selected) = dependency.as_ref() else {
                    return Err(DependencyError::not_found(interface, None, None));
                };

                match self.create(
                    interface,
                    selected,
                    &resolved_id,
                    arguments,
                    exclude,
                    fingerprint.as_deref(),
                ) {
                    Ok(instance) => instance,
                    Err(error) => {
                        self.record_discard(fingerprint.as_deref());

                        return Err(DependencyError::creation_failed(
                            interface,
                            resolved_id,
                            error,
                        ));
                    }
                }
            }
        };

        // 工厂语义: 提供了参数且不执行调用时, 不缓存直接返回
        if arguments.is_some() && !invoke_calls {
            return Ok(instance);
        }

        // 注册实例
        if arguments.is_none() {
            let interfaces: Vec<String> = match &dependency {
                Some(dependency) => {
                    let mut interfaces = dependency.interfaces().to_vec();
                    if !interfaces.iter().any(|i| i == interface) {
                        interfaces.push(interface.to_string());
                    }

                    interfaces
                }
                None => vec![interface.to_string()],
            };

            if fingerprint.is_some() {
                match self.reflection.instance_class(&instance) {
                    Some(class_name) => self.record_class(fingerprint.as_deref(), &class_name),
                    None => self.record_unrecordable(fingerprint.as_deref()),
                }
                self.record_identity(fingerprint.as_deref(), &interfaces, &resolved_id);
            }

            for cache_interface in &interfaces {
                self.cache_instance(cache_interface, &resolved_id, instance.clone());
            }
        }

        // 执行声明的调用
        if let Some(selected) = &dependency {
            if arguments.is_none() || invoke_calls {
                for call in selected.calls() {
                    let callback = Callback::method(instance.clone(), call.method_name());

                    if let Err(error) = self.invoke_callback(
                        &callback,
                        Some(call.arguments().clone()),
                        exclude,
                        false,
                        fingerprint.as_deref(),
                    ) {
                        self.record_discard(fingerprint.as_deref());

                        return Err(error);
                    }
                }
            }
        }

        self.record_complete(fingerprint.as_deref());

        Ok(instance)
    }

    /// 创建所选定义的实例
    fn create(
        &mut self,
        interface: &str,
        dependency: &Dependency,
        resolved_id: &str,
        arguments: Option<&Arguments>,
        exclude: &mut ExcludeList,
        fingerprint: Option<&str>,
    ) -> DependencyResult<Instance> {
        if let Some(construct_call) = dependency.construct_call() {
            // 通过工厂依赖的方法构造
            debug!(
                "通过工厂 {} 构造依赖: {interface}",
                construct_call.interface()
            );

            let factory = self.get_internal(
                construct_call.interface(),
                construct_call.id(),
                None,
                false,
                exclude,
            )?;

            self.record_factory(fingerprint, construct_call.interface(), construct_call.id());

            let callback = Callback::method(factory, construct_call.method_name());
            let result = self.invoke_callback(
                &callback,
                Some(construct_call.arguments().clone()),
                exclude,
                false,
                fingerprint,
            )?;

            let ArgumentValue::Instance(instance) = result else {
                self.record_discard(fingerprint);

                return Err(ReflectionError::argument_mismatch(format!(
                    "工厂方法 {} 未返回实例",
                    construct_call.method_name()
                ))
                .into());
            };

            if !self.reflection.instance_satisfies(&instance, interface) {
                self.record_discard(fingerprint);

                return Err(ReflectionError::argument_mismatch(format!(
                    "工厂产生的实例未实现所请求的接口 {interface}"
                ))
                .into());
            }

            return Ok(instance);
        }

        // 直接实例化
        let Some(class_name) = dependency.class_name() else {
            return Err(DependencyError::InvalidClassName);
        };

        debug!("创建实例: {class_name} (id: {resolved_id})");

        exclude.add(class_name, resolved_id);

        let parameters = self.reflection.get_constructor_parameters(class_name)?;

        let mut merged = dependency.constructor_arguments().cloned().unwrap_or_default();
        if let Some(arguments) = arguments {
            for (name, value) in arguments.iter() {
                merged.set(name.to_string(), value.clone());
            }
        }

        self.record_class(fingerprint, class_name);
        self.record_method(fingerprint, CONSTRUCTOR_METHOD);

        let values =
            self.parse_arguments_internal(merged, &parameters, exclude, false, fingerprint)?;

        Ok(self.reflection.instantiate(class_name, &values)?)
    }

    /// 尝试把接口名称本身当作具体类构建
    ///
    /// 仅作为接口使用的类型产生空结果而不是错误
    fn create_undefined(
        &mut self,
        class_name: &str,
        arguments: Option<&Arguments>,
        exclude: &mut ExcludeList,
        fingerprint: Option<&str>,
    ) -> DependencyResult<Option<Instance>> {
        exclude.add(class_name, ID_UNDEFINED);

        if !self.reflection.is_instantiable(class_name)? {
            return Ok(None);
        }

        let parameters = self.reflection.get_constructor_parameters(class_name)?;

        self.record_class(fingerprint, class_name);
        self.record_method(fingerprint, CONSTRUCTOR_METHOD);

        let merged = arguments.cloned().unwrap_or_default();
        let values = self
            .parse_arguments_internal(merged, &parameters, exclude, false, fingerprint)
            .map_err(|error| DependencyError::creation_failed(class_name, ID_UNDEFINED, error))?;

        Ok(Some(self.reflection.instantiate(class_name, &values)?))
    }

    pub(crate) fn invoke_callback(
        &mut self,
        callback: &Callback,
        arguments: Option<Arguments>,
        exclude: &mut ExcludeList,
        is_dynamic: bool,
        fingerprint: Option<&str>,
    ) -> DependencyResult<ArgumentValue> {
        if !self.reflection.is_invocable(callback) {
            return Err(ReflectionError::NotInvocable {
                callback: callback.to_string(),
            }
            .into());
        }

        self.record_method(fingerprint, callback.method_name());

        let parameters = self.reflection.callback_parameters(callback)?;

        let values = self
            .parse_arguments_internal(
                arguments.unwrap_or_default(),
                &parameters,
                exclude,
                is_dynamic,
                fingerprint,
            )
            .map_err(|error| DependencyError::InvocationFailed {
                callback: callback.to_string(),
                source: Box::new(error),
            })?;

        Ok(self.reflection.invoke(callback, &values)?)
    }

    fn parse_arguments_internal(
        &mut self,
        provided: Arguments,
        parameters: &[ParameterInfo],
        exclude: &mut ExcludeList,
        is_dynamic: bool,
        fingerprint: Option<&str>,
    ) -> DependencyResult<Vec<ArgumentValue>> {
        let mut provided = provided;
        let mut values = Vec::with_capacity(parameters.len());

        for parameter in parameters {
            if let Some(argument) = provided.remove(&parameter.name) {
                let value = self.parse_provided(&parameter.name, argument, exclude, fingerprint)?;
                values.push(value);
            } else if let Some(default) = &parameter.default {
                self.record_result(fingerprint, &parameter.name, default);
                values.push(default.clone());
            } else if let Some(capability) = &parameter.interface {
                match self.get_internal(capability, None, None, false, exclude) {
                    Ok(instance) => {
                        self.record_argument(
                            fingerprint,
                            &parameter.name,
                            Some(RecordedArgument::Dependency {
                                interface: capability.clone(),
                                id: None,
                            }),
                        );
                        values.push(ArgumentValue::Instance(instance));
                    }
                    Err(error) => {
                        return Err(DependencyError::MandatoryParameter {
                            name: parameter.name.clone(),
                            source: Some(Box::new(error)),
                        });
                    }
                }
            } else {
                return Err(DependencyError::MandatoryParameter {
                    name: parameter.name.clone(),
                    source: None,
                });
            }
        }

        if !provided.is_empty() {
            if is_dynamic {
                // 超出签名的参数按出现顺序追加为位置参数
                for (name, argument) in provided {
                    let value = self.parse_provided(&name, argument, exclude, fingerprint)?;
                    values.push(value);
                }
            } else {
                let names = provided.names().join(", ");

                return Err(DependencyError::UnexpectedArguments { names });
            }
        }

        Ok(values)
    }

    /// 解析调用方提供的单个参数
    fn parse_provided(
        &mut self,
        name: &str,
        argument: ProvidedArgument,
        exclude: &mut ExcludeList,
        fingerprint: Option<&str>,
    ) -> DependencyResult<ArgumentValue> {
        match argument {
            ProvidedArgument::Descriptor(descriptor) => {
                let kind = descriptor.kind().to_string();
                let Some(parser) = self.argument_parsers.get(&kind).cloned() else {
                    return Err(DependencyError::NoArgumentParser { kind });
                };

                let value = parser.parse(&descriptor, self, exclude)?;

                if fingerprint.is_some() {
                    match parser.record(&descriptor) {
                        Some(recorded) => {
                            self.record_argument(fingerprint, name, Some(recorded));
                        }
                        None => self.record_result(fingerprint, name, &value),
                    }
                }

                Ok(value)
            }
            ProvidedArgument::Value(value) => {
                if fingerprint.is_some() {
                    self.record_result(fingerprint, name, &value);
                }

                Ok(value)
            }
        }
    }

    // --- 记忆配方重放 ---

    fn replay_recipe(
        &mut self,
        recipe: &InstanceRecipe,
        exclude: &mut ExcludeList,
    ) -> DependencyResult<Instance> {
        let mut methods = recipe.methods.iter();

        let instance = if let Some((factory_interface, factory_id)) = &recipe.factory {
            let factory =
                self.get_internal(factory_interface, factory_id.as_deref(), None, false, exclude)?;

            let Some(first) = methods.next() else {
                return Err(DependencyError::invalid_properties("记忆配方缺少工厂方法"));
            };

            let values = self.replay_arguments(&first.arguments, exclude)?;
            let callback = Callback::method(factory, first.method.as_str());
            match self.reflection.invoke(&callback, &values)? {
                ArgumentValue::Instance(instance) => instance,
                _ => {
                    return Err(ReflectionError::argument_mismatch(format!(
                        "工厂方法 {} 未返回实例",
                        first.method
                    ))
                    .into())
                }
            }
        } else {
            let Some(first) = methods.next() else {
                return Err(DependencyError::invalid_properties("记忆配方缺少构造方法"));
            };

            let values = self.replay_arguments(&first.arguments, exclude)?;

            self.reflection.instantiate(&recipe.class_name, &values)?
        };

        for method in methods {
            let values = self.replay_arguments(&method.arguments, exclude)?;
            let callback = Callback::method(instance.clone(), method.method.as_str());

            self.reflection.invoke(&callback, &values)?;
        }

        Ok(instance)
    }

    fn replay_arguments(
        &mut self,
        arguments: &[(String, RecordedArgument)],
        exclude: &mut ExcludeList,
    ) -> DependencyResult<Vec<ArgumentValue>> {
        let mut values = Vec::with_capacity(arguments.len());

        for (_, argument) in arguments {
            match argument {
                RecordedArgument::Value(value) => values.push(ArgumentValue::Value(value.clone())),
                RecordedArgument::Dependency { interface, id } => {
                    let instance =
                        self.get_internal(interface, id.as_deref(), None, false, exclude)?;
                    values.push(ArgumentValue::Instance(instance));
                }
            }
        }

        Ok(values)
    }

    // --- 实例缓存 ---

    fn cached(&self, interface: &str, id: &str) -> Option<Instance> {
        self.instances
            .get(interface)
            .and_then(|bucket| bucket.get(id))
            .cloned()
    }

    fn cache_instance(&mut self, interface: &str, id: &str, instance: Instance) {
        self.instances
            .entry(interface.to_string())
            .or_default()
            .insert(id.to_string(), instance);
    }

    // --- 记忆层记录辅助 ---

    fn record_class(&mut self, fingerprint: Option<&str>, class_name: &str) {
        if let (Some(fingerprint), Some(intelligence)) = (fingerprint, self.intelligence.as_mut()) {
            intelligence.record_class(fingerprint, class_name);
        }
    }

    fn record_factory(&mut self, fingerprint: Option<&str>, interface: &str, id: Option<&str>) {
        if let (Some(fingerprint), Some(intelligence)) = (fingerprint, self.intelligence.as_mut()) {
            intelligence.record_factory(fingerprint, interface, id);
        }
    }

    fn record_method(&mut self, fingerprint: Option<&str>, method: &str) {
        if let (Some(fingerprint), Some(intelligence)) = (fingerprint, self.intelligence.as_mut()) {
            intelligence.record_method(fingerprint, method);
        }
    }

    fn record_argument(
        &mut self,
        fingerprint: Option<&str>,
        name: &str,
        argument: Option<RecordedArgument>,
    ) {
        if let (Some(fingerprint), Some(intelligence)) = (fingerprint, self.intelligence.as_mut()) {
            match argument {
                Some(argument) => intelligence.record_argument(fingerprint, name, argument),
                None => intelligence.mark_unrecordable(fingerprint),
            }
        }
    }

    /// 以解析结果记录参数, 无法表示为 JSON 值时标记不可重放
    fn record_result(&mut self, fingerprint: Option<&str>, name: &str, value: &ArgumentValue) {
        let recorded = match value {
            ArgumentValue::Value(value) => Some(RecordedArgument::Value(value.clone())),
            _ => None,
        };

        self.record_argument(fingerprint, name, recorded);
    }

    fn record_identity(&mut self, fingerprint: Option<&str>, interfaces: &[String], id: &str) {
        if let (Some(fingerprint), Some(intelligence)) = (fingerprint, self.intelligence.as_mut()) {
            intelligence.record_identity(fingerprint, interfaces, id);
        }
    }

    fn record_unrecordable(&mut self, fingerprint: Option<&str>) {
        if let (Some(fingerprint), Some(intelligence)) = (fingerprint, self.intelligence.as_mut()) {
            intelligence.mark_unrecordable(fingerprint);
        }
    }

    fn record_complete(&mut self, fingerprint: Option<&str>) {
        if let (Some(fingerprint), Some(intelligence)) = (fingerprint, self.intelligence.as_mut()) {
            intelligence.complete(fingerprint);
        }
    }

    fn record_discard(&mut self, fingerprint: Option<&str>) {
        if let (Some(fingerprint), Some(intelligence)) = (fingerprint, self.intelligence.as_mut()) {
            intelligence.discard(fingerprint);
        }
    }
}
