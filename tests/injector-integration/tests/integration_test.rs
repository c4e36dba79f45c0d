//! 解析引擎的集中集成测试

use std::sync::{Arc, Mutex};

use dependency_injector::{
    ArgumentParser, DependencyInjector, DependencyIntelligence, ExcludeList,
};
use dependency_model::{
    ArgumentDescriptor, Arguments, CallTarget, Dependency, DependencyCall, DependencyCallArgument,
    DependencyConstructCall, DependencyContainer, CONSTRUCTOR_METHOD,
};
use injection_common::{
    ArgumentValue, Callback, ClassManifest, DependencyError, Instance, ManifestReflection,
    ParameterInfo, ReflectionError,
};
use serde_json::{json, Value};

/// 测试组件
struct TestObject {
    token: Mutex<String>,
}

impl TestObject {
    fn token(&self) -> String {
        self.token.lock().unwrap().clone()
    }
}

/// 测试组件, 同一接口的第二个实现
struct Dummy;

/// 带必需构造参数的测试组件
struct Shape {
    sides: i64,
}

/// 文件日志测试组件
struct FileLogger {
    path: String,
}

/// 调试文件日志测试组件
struct DebugFileLogger;

/// 工厂测试组件
struct LoggerFactory;

/// 自动注入 Logger 的测试组件
struct Consumer {
    logger: Instance,
}

/// 自引用 Logger 的测试组件
struct Decorator {
    inner: Instance,
}

/// 依赖集合的测试组件
struct Collector {
    count: usize,
}

fn reflection() -> Arc<ManifestReflection> {
    let _ = tracing_subscriber::fmt().with_env_filter("debug").try_init();

    let mut reflection = ManifestReflection::new();

    reflection.register_interface("TestInterface");
    reflection.register_interface("Logger");
    reflection.register_interface("Polygon");

    reflection.register_class::<TestObject>(
        ClassManifest::new("TestObject", |args| {
            Ok(Arc::new(TestObject {
                token: Mutex::new(
                    args.first()
                        .and_then(ArgumentValue::as_str)
                        .unwrap_or_default()
                        .to_string(),
                ),
            }) as Instance)
        })
        .with_interface("TestInterface")
        .with_parameter(ParameterInfo::new("token").with_default(""))
        .with_method(
            "set_token",
            vec![ParameterInfo::new("token")],
            |instance, args| {
                let object = instance
                    .downcast_ref::<TestObject>()
                    .ok_or_else(|| ReflectionError::argument_mismatch("期望 TestObject 实例"))?;

                let token = args
                    .first()
                    .and_then(ArgumentValue::as_str)
                    .unwrap_or_default();
                *object.token.lock().unwrap() = token.to_string();

                Ok(ArgumentValue::null())
            },
        ),
    );

    reflection.register_class::<Dummy>(
        ClassManifest::new("Dummy", |_| Ok(Arc::new(Dummy) as Instance))
            .with_interface("TestInterface"),
    );

    reflection.register_class::<Shape>(
        ClassManifest::new("Shape", |args| {
            Ok(Arc::new(Shape {
                sides: args.first().and_then(ArgumentValue::as_i64).unwrap_or(0),
            }) as Instance)
        })
        .with_interface("Polygon")
        .with_parameter(ParameterInfo::new("sides")),
    );

    reflection.register_class::<FileLogger>(
        ClassManifest::new("FileLogger", |args| {
            Ok(Arc::new(FileLogger {
                path: args
                    .first()
                    .and_then(ArgumentValue::as_str)
                    .unwrap_or_default()
                    .to_string(),
            }) as Instance)
        })
        .with_interface("Logger")
        .with_parameter(ParameterInfo::new("path").with_default("app.log"))
        .with_method("path", Vec::new(), |instance, _| {
            let logger = instance
                .downcast_ref::<FileLogger>()
                .ok_or_else(|| ReflectionError::argument_mismatch("期望 FileLogger 实例"))?;

            Ok(ArgumentValue::from(logger.path.clone()))
        }),
    );

    reflection.register_class::<DebugFileLogger>(
        ClassManifest::new("DebugFileLogger", |_| {
            Ok(Arc::new(DebugFileLogger) as Instance)
        })
        .with_interface("Logger"),
    );

    reflection.register_class::<LoggerFactory>(
        ClassManifest::new("LoggerFactory", |_| Ok(Arc::new(LoggerFactory) as Instance))
            .with_method("create", Vec::new(), |_, _| {
                Ok(ArgumentValue::Instance(Arc::new(FileLogger {
                    path: "factory.log".to_string(),
                }) as Instance))
            })
            .with_method("create_dummy", Vec::new(), |_, _| {
                Ok(ArgumentValue::instance(Dummy))
            }),
    );

    reflection.register_class::<Consumer>(
        ClassManifest::new("Consumer", |args| {
            let logger = args
                .first()
                .and_then(ArgumentValue::as_instance)
                .cloned()
                .ok_or_else(|| ReflectionError::argument_mismatch("期望 Logger 实例"))?;

            Ok(Arc::new(Consumer { logger }) as Instance)
        })
        .with_parameter(ParameterInfo::new("logger").with_interface("Logger")),
    );

    reflection.register_class::<Decorator>(
        ClassManifest::new("Decorator", |args| {
            let inner = args
                .first()
                .and_then(ArgumentValue::as_instance)
                .cloned()
                .ok_or_else(|| ReflectionError::argument_mismatch("期望 Logger 实例"))?;

            Ok(Arc::new(Decorator { inner }) as Instance)
        })
        .with_interface("Logger")
        .with_parameter(ParameterInfo::new("inner").with_interface("Logger")),
    );

    reflection.register_class::<Collector>(
        ClassManifest::new("Collector", |args| {
            let count = args
                .first()
                .and_then(ArgumentValue::as_instances)
                .map_or(0, <[(String, Instance)]>::len);

            Ok(Arc::new(Collector { count }) as Instance)
        })
        .with_parameter(ParameterInfo::new("loggers")),
    );

    reflection.register_function(
        "repeat",
        vec![
            ParameterInfo::new("input"),
            ParameterInfo::new("mult").with_default(2i64),
        ],
        |args| {
            let input = args
                .first()
                .and_then(ArgumentValue::as_str)
                .unwrap_or_default();
            let mult = args.get(1).and_then(ArgumentValue::as_i64).unwrap_or(0);

            Ok(ArgumentValue::from(
                input.repeat(usize::try_from(mult).unwrap_or(0)),
            ))
        },
    );

    reflection.register_function(
        "collect",
        vec![
            ParameterInfo::new("test").with_default(ArgumentValue::null()),
            ParameterInfo::new("test2").with_default(2i64),
        ],
        |args| {
            let collected: Vec<Value> = args
                .iter()
                .map(|value| value.as_json().cloned().unwrap_or(json!("<instance>")))
                .collect();

            Ok(ArgumentValue::Value(Value::Array(collected)))
        },
    );

    reflection.register_function("default_path", Vec::new(), |_| {
        Ok(ArgumentValue::from("calls.log"))
    });

    Arc::new(reflection)
}

fn logger_dependency(class_name: &str, tags: &[&str]) -> Dependency {
    let mut dependency = Dependency::new(class_name).unwrap();
    dependency.add_interface("Logger");
    for tag in tags {
        dependency.add_tag(*tag);
    }

    dependency
}

fn injector_with(dependencies: Vec<Dependency>) -> DependencyInjector {
    let mut container = DependencyContainer::new();
    for dependency in dependencies {
        container.add_dependency(dependency).unwrap();
    }

    DependencyInjector::with_container(reflection(), container)
}

#[test]
fn test_get_returns_same_instance_on_second_call() {
    let mut dependency = Dependency::new("TestObject").unwrap();
    dependency.add_interface("TestInterface");

    let mut injector = injector_with(vec![dependency]);

    let first = injector.get("TestInterface").unwrap();
    let second = injector.get("TestInterface").unwrap();

    assert!(first.downcast_ref::<TestObject>().is_some());
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_get_uses_last_defined_dependency() {
    let mut dummy = Dependency::new("Dummy").unwrap();
    dummy.add_interface("TestInterface");
    let mut object = Dependency::new("TestObject").unwrap();
    object.add_interface("TestInterface");

    let mut injector = injector_with(vec![dummy, object]);

    let instance = injector.get("TestInterface").unwrap();
    assert!(instance.downcast_ref::<TestObject>().is_some());
}

#[test]
fn test_get_with_id() {
    let mut object = Dependency::new("TestObject").unwrap();
    object.add_interface("TestInterface");
    object.set_id(Some("named".to_string())).unwrap();
    let mut dummy = Dependency::new("Dummy").unwrap();
    dummy.add_interface("TestInterface");

    let mut injector = injector_with(vec![object, dummy]);

    let instance = injector.get_by_id("TestInterface", "named").unwrap();
    assert!(instance.downcast_ref::<TestObject>().is_some());

    let error = injector.get_by_id("TestInterface", "missing").unwrap_err();
    assert!(matches!(error, DependencyError::NotFound { .. }));
}

#[test]
fn test_get_without_definitions_fails() {
    let mut injector = injector_with(Vec::new());

    let error = injector.get("Logger").unwrap_err();
    assert!(matches!(
        error,
        DependencyError::NotFound { source: None, .. }
    ));

    let error = injector.get("Ghost").unwrap_err();
    assert!(matches!(
        error,
        DependencyError::NotFound {
            source: Some(_),
            ..
        }
    ));
}

#[test]
fn test_undefined_class_fallback() {
    let mut injector = injector_with(Vec::new());

    let first = injector.get("TestObject").unwrap();
    let second = injector.get("TestObject").unwrap();

    assert!(first.downcast_ref::<TestObject>().is_some());
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_constructor_arguments_from_scalar_descriptor() {
    let mut construct = DependencyCall::new(CONSTRUCTOR_METHOD).unwrap();
    construct.add_argument(
        DependencyCallArgument::new("sides", ArgumentDescriptor::scalar(4)).unwrap(),
    );

    let mut dependency = Dependency::new("Shape").unwrap();
    dependency.add_interface("Polygon");
    dependency.add_call(construct).unwrap();

    let mut injector = injector_with(vec![dependency]);

    let instance = injector.get("Polygon").unwrap();
    assert_eq!(instance.downcast_ref::<Shape>().unwrap().sides, 4);
}

#[test]
fn test_calls_invoked_in_declaration_order() {
    let mut first = DependencyCall::new("set_token").unwrap();
    first.add_argument(
        DependencyCallArgument::new("token", ArgumentDescriptor::scalar("first")).unwrap(),
    );
    let mut second = DependencyCall::new("set_token").unwrap();
    second.add_argument(
        DependencyCallArgument::new("token", ArgumentDescriptor::scalar("second")).unwrap(),
    );

    let mut dependency = Dependency::new("TestObject").unwrap();
    dependency.add_interface("TestInterface");
    dependency.add_call(first).unwrap();
    dependency.add_call(second).unwrap();

    let mut injector = injector_with(vec![dependency]);

    let instance = injector.get("TestInterface").unwrap();
    assert_eq!(instance.downcast_ref::<TestObject>().unwrap().token(), "second");
}

#[test]
fn test_construct_call_builds_through_factory() {
    let construct = DependencyConstructCall::new("LoggerFactory", "create").unwrap();
    let mut dependency = Dependency::from_construct_call(construct);
    dependency.add_interface("Logger");

    let mut injector = injector_with(vec![dependency]);

    let instance = injector.get("Logger").unwrap();
    assert_eq!(instance.downcast_ref::<FileLogger>().unwrap().path, "factory.log");
}

#[test]
fn test_construct_call_verifies_requested_interface() {
    let construct = DependencyConstructCall::new("LoggerFactory", "create_dummy").unwrap();
    let mut dependency = Dependency::from_construct_call(construct);
    dependency.add_interface("Logger");

    let mut injector = injector_with(vec![dependency]);

    let error = injector.get("Logger").unwrap_err();
    assert!(matches!(error, DependencyError::CreationFailed { .. }));
}

#[test]
fn test_factory_mode_bypasses_cache_and_calls() {
    let mut call = DependencyCall::new("set_token").unwrap();
    call.add_argument(
        DependencyCallArgument::new("token", ArgumentDescriptor::scalar("configured")).unwrap(),
    );

    let mut dependency = Dependency::new("TestObject").unwrap();
    dependency.add_interface("TestInterface");
    dependency.add_call(call).unwrap();

    let mut injector = injector_with(vec![dependency]);

    let arguments = Arguments::new().with_value("token", "fresh");
    let first = injector
        .get_with("TestInterface", None, Some(arguments.clone()), false)
        .unwrap();
    let second = injector
        .get_with("TestInterface", None, Some(arguments), false)
        .unwrap();

    // 工厂用法: 每次都是新实例, 声明的调用不执行
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(first.downcast_ref::<TestObject>().unwrap().token(), "fresh");
    assert!(injector.instances("TestInterface").is_empty());

    let cached = injector.get("TestInterface").unwrap();
    assert!(!Arc::ptr_eq(&first, &cached));
    assert_eq!(cached.downcast_ref::<TestObject>().unwrap().token(), "configured");
}

#[test]
fn test_set_instance_overrides_resolution() {
    let mut dependency = Dependency::new("FileLogger").unwrap();
    dependency.add_interface("Logger");

    let mut injector = injector_with(vec![dependency]);

    let manual: Instance = Arc::new(FileLogger {
        path: "manual.log".to_string(),
    });
    injector
        .set_instance(manual.clone(), Some(&["Logger"]), None)
        .unwrap();

    let resolved = injector.get("Logger").unwrap();
    assert!(Arc::ptr_eq(&manual, &resolved));
}

#[test]
fn test_set_instance_defaults_to_runtime_type_name() {
    let mut injector = injector_with(Vec::new());

    let manual: Instance = Arc::new(FileLogger {
        path: "manual.log".to_string(),
    });
    injector.set_instance(manual.clone(), None, None).unwrap();

    let resolved = injector.get("FileLogger").unwrap();
    assert!(Arc::ptr_eq(&manual, &resolved));
}

#[test]
fn test_unset_instance() {
    let mut injector = injector_with(Vec::new());

    let manual: Instance = Arc::new(Dummy);
    injector
        .set_instance(manual, Some(&["TestInterface"]), None)
        .unwrap();

    assert!(injector.unset_instance("TestInterface", None).unwrap());
    assert!(!injector.unset_instance("TestInterface", None).unwrap());
    assert!(injector.unset_instance("", None).is_err());
}

#[test]
fn test_set_container_clears_instances() {
    let mut dependency = Dependency::new("TestObject").unwrap();
    dependency.add_interface("TestInterface");

    let mut injector = injector_with(vec![dependency.clone()]);
    let first = injector.get("TestInterface").unwrap();

    // 不清空实例时缓存保留
    let mut container = DependencyContainer::new();
    container.add_dependency(dependency.clone()).unwrap();
    injector.set_container(container, false);
    let second = injector.get("TestInterface").unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    // 清空实例后重新解析
    let mut container = DependencyContainer::new();
    container.add_dependency(dependency).unwrap();
    injector.set_container(container, true);
    let third = injector.get("TestInterface").unwrap();
    assert!(!Arc::ptr_eq(&first, &third));
}

#[test]
fn test_mandatory_parameter_resolved_by_interface_hint() {
    let mut injector = injector_with(vec![logger_dependency("FileLogger", &[])]);

    let consumer = injector.get("Consumer").unwrap();
    let consumer = consumer.downcast_ref::<Consumer>().unwrap();

    assert!(consumer.logger.downcast_ref::<FileLogger>().is_some());
}

#[test]
fn test_self_referential_dependency_resolves_next_candidate() {
    let file = logger_dependency("FileLogger", &[]);
    let mut decorator = Dependency::new("Decorator").unwrap();
    decorator.add_interface("Logger");

    let mut injector = injector_with(vec![file, decorator]);

    let resolved = injector.get("Logger").unwrap();
    let decorator = resolved.downcast_ref::<Decorator>().unwrap();

    // 装饰器不会被要求构建自己, 内层解析到前一个候选
    assert!(decorator.inner.downcast_ref::<FileLogger>().is_some());
}

#[test]
fn test_get_all() {
    let mut injector = injector_with(vec![
        logger_dependency("FileLogger", &[]),
        logger_dependency("DebugFileLogger", &[]),
    ]);

    let all = injector.get_all("Logger").unwrap();

    assert_eq!(all.len(), 2);
    assert_eq!(all[0].0, "d0");
    assert!(all[0].1.downcast_ref::<FileLogger>().is_some());
    assert_eq!(all[1].0, "d1");
    assert!(all[1].1.downcast_ref::<DebugFileLogger>().is_some());
}

#[test]
fn test_get_by_tag() {
    let mut injector = injector_with(vec![
        logger_dependency("FileLogger", &["file"]),
        logger_dependency("DebugFileLogger", &["file", "debug"]),
    ]);

    let filtered = injector
        .get_by_tag(Some("Logger"), &["file"], &["debug"])
        .unwrap();

    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].0, "d0");
    assert!(filtered[0].1.downcast_ref::<FileLogger>().is_some());

    let none = injector
        .get_by_tag(Some("Logger"), &["missing"], &[])
        .unwrap();
    assert!(none.is_empty());
}

#[test]
fn test_dependencies_descriptor_collects_all() {
    let mut construct = DependencyCall::new(CONSTRUCTOR_METHOD).unwrap();
    construct.add_argument(
        DependencyCallArgument::new(
            "loggers",
            ArgumentDescriptor::Dependencies {
                interface: "Logger".to_string(),
                include: Vec::new(),
                exclude: Vec::new(),
            },
        )
        .unwrap(),
    );

    let mut collector = Dependency::new("Collector").unwrap();
    collector.add_interface("Collector");
    collector.add_call(construct).unwrap();

    let mut injector = injector_with(vec![
        logger_dependency("FileLogger", &[]),
        logger_dependency("DebugFileLogger", &[]),
        collector,
    ]);

    let instance = injector.get("Collector").unwrap();
    assert_eq!(instance.downcast_ref::<Collector>().unwrap().count, 2);
}

#[test]
fn test_call_descriptor_with_function_target() {
    let mut construct = DependencyCall::new(CONSTRUCTOR_METHOD).unwrap();
    construct.add_argument(
        DependencyCallArgument::new(
            "path",
            ArgumentDescriptor::Call {
                target: CallTarget::Function {
                    function: "default_path".to_string(),
                },
                arguments: Arguments::new(),
            },
        )
        .unwrap(),
    );

    let mut dependency = Dependency::new("FileLogger").unwrap();
    dependency.add_interface("Logger");
    dependency.add_call(construct).unwrap();

    let mut injector = injector_with(vec![dependency]);

    let instance = injector.get("Logger").unwrap();
    assert_eq!(instance.downcast_ref::<FileLogger>().unwrap().path, "calls.log");
}

#[test]
fn test_call_descriptor_with_dependency_target() {
    let mut construct = DependencyCall::new(CONSTRUCTOR_METHOD).unwrap();
    construct.add_argument(
        DependencyCallArgument::new(
            "token",
            ArgumentDescriptor::Call {
                target: CallTarget::Interface {
                    interface: "Logger".to_string(),
                    id: None,
                    method: "path".to_string(),
                },
                arguments: Arguments::new(),
            },
        )
        .unwrap(),
    );

    let mut object = Dependency::new("TestObject").unwrap();
    object.add_interface("TestInterface");
    object.add_call(construct).unwrap();

    let mut injector = injector_with(vec![logger_dependency("FileLogger", &[]), object]);

    let instance = injector.get("TestInterface").unwrap();
    assert_eq!(instance.downcast_ref::<TestObject>().unwrap().token(), "app.log");
}

#[test]
fn test_invoke_merges_defaults_and_provided_values() {
    let mut injector = injector_with(Vec::new());

    let arguments = Arguments::new()
        .with_value("mult", 3i64)
        .with_value("input", "test");
    let result = injector
        .invoke(&Callback::function("repeat"), Some(arguments), false)
        .unwrap();
    assert_eq!(result.as_str(), Some("testtesttest"));

    let result = injector
        .invoke(
            &Callback::function("repeat"),
            Some(Arguments::new().with_value("input", "ab")),
            false,
        )
        .unwrap();
    assert_eq!(result.as_str(), Some("abab"));
}

#[test]
fn test_invoke_rejects_unexpected_arguments() {
    let mut injector = injector_with(Vec::new());

    let arguments = Arguments::new()
        .with_value("input", "test")
        .with_value("extra", 1i64);
    let error = injector
        .invoke(&Callback::function("repeat"), Some(arguments), false)
        .unwrap_err();

    let DependencyError::InvocationFailed { source, .. } = error else {
        panic!("期望参数解析失败");
    };
    assert!(matches!(
        *source,
        DependencyError::UnexpectedArguments { ref names } if names == "extra"
    ));
}

#[test]
fn test_dynamic_invoke_appends_extras_positionally() {
    let mut injector = injector_with(Vec::new());

    let arguments = Arguments::new()
        .with_value("test", "TEST")
        .with_value("test3", "x")
        .with_argument(DependencyCallArgument::new("test2", ArgumentDescriptor::Null).unwrap())
        .with_value("test4", "y");
    let result = injector
        .invoke(&Callback::function("collect"), Some(arguments), true)
        .unwrap();

    assert_eq!(result.as_json(), Some(&json!(["TEST", null, "x", "y"])));
}

#[test]
fn test_invoke_unknown_callback_fails() {
    let mut injector = injector_with(Vec::new());

    let error = injector
        .invoke(&Callback::function("missing"), None, false)
        .unwrap_err();
    assert!(matches!(
        error,
        DependencyError::Reflection {
            source: ReflectionError::NotInvocable { .. }
        }
    ));
}

#[test]
fn test_parse_arguments_orders_by_declared_parameters() {
    let mut injector = injector_with(Vec::new());

    let parameters = vec![
        ParameterInfo::new("input"),
        ParameterInfo::new("mult").with_default(2i64),
    ];
    let provided = Arguments::new()
        .with_value("mult", 3i64)
        .with_value("input", "test");

    let values = injector
        .parse_arguments(provided, &parameters, &mut ExcludeList::new(), false)
        .unwrap();

    assert_eq!(values[0].as_str(), Some("test"));
    assert_eq!(values[1].as_i64(), Some(3));
}

#[test]
fn test_unknown_argument_kind_is_configuration_error() {
    let mut construct = DependencyCall::new(CONSTRUCTOR_METHOD).unwrap();
    construct.add_argument(
        DependencyCallArgument::new(
            "token",
            ArgumentDescriptor::Custom {
                kind: "env".to_string(),
                properties: serde_json::Map::new(),
            },
        )
        .unwrap(),
    );

    let mut dependency = Dependency::new("TestObject").unwrap();
    dependency.add_interface("TestInterface");
    dependency.add_call(construct).unwrap();

    let mut injector = injector_with(vec![dependency]);

    let error = injector.get("TestInterface").unwrap_err();
    assert!(matches!(error, DependencyError::CreationFailed { .. }));
}

/// 自定义参数解析器: 把 `value` 属性转为大写
#[derive(Debug, Default)]
struct UppercaseArgumentParser;

impl ArgumentParser for UppercaseArgumentParser {
    fn parse(
        &self,
        argument: &DependencyCallArgument,
        _injector: &mut DependencyInjector,
        _exclude: &mut ExcludeList,
    ) -> Result<ArgumentValue, DependencyError> {
        let ArgumentDescriptor::Custom { properties, .. } = argument.descriptor() else {
            return Err(DependencyError::invalid_properties("期望 custom 描述符"));
        };

        let value = properties
            .get("value")
            .and_then(Value::as_str)
            .unwrap_or_default();

        Ok(ArgumentValue::from(value.to_uppercase()))
    }
}

#[test]
fn test_custom_argument_parser() {
    let mut properties = serde_json::Map::new();
    properties.insert("value".to_string(), json!("abc"));

    let mut construct = DependencyCall::new(CONSTRUCTOR_METHOD).unwrap();
    construct.add_argument(
        DependencyCallArgument::new(
            "token",
            ArgumentDescriptor::Custom {
                kind: "upper".to_string(),
                properties,
            },
        )
        .unwrap(),
    );

    let mut dependency = Dependency::new("TestObject").unwrap();
    dependency.add_interface("TestInterface");
    dependency.add_call(construct).unwrap();

    let mut injector = injector_with(vec![dependency]);
    injector
        .set_argument_parser("upper", Some(Arc::new(UppercaseArgumentParser)))
        .unwrap();

    let instance = injector.get("TestInterface").unwrap();
    assert_eq!(instance.downcast_ref::<TestObject>().unwrap().token(), "ABC");
}

#[test]
fn test_argument_parser_registry() {
    let mut injector = injector_with(Vec::new());

    assert!(injector.argument_parser_kinds().contains(&"null"));
    injector.set_argument_parser("null", None).unwrap();
    assert!(!injector.argument_parser_kinds().contains(&"null"));

    assert!(injector.set_argument_parser("", None).is_err());
}

#[test]
fn test_intelligence_replays_without_registry() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("recipes.json");

    // 第一次运行: 完整解析并学习配方
    {
        let mut call = DependencyCall::new("set_token")?;
        call.add_argument(DependencyCallArgument::new(
            "token",
            ArgumentDescriptor::scalar("learned"),
        )?);

        let mut dependency = Dependency::new("TestObject")?;
        dependency.add_interface("TestInterface");
        dependency.add_call(call)?;

        let mut injector = injector_with(vec![dependency]);
        injector.set_intelligence(Some(DependencyIntelligence::open(&path)));

        let instance = injector.get("TestInterface")?;
        assert_eq!(
            instance.downcast_ref::<TestObject>().unwrap().token(),
            "learned"
        );

        injector.intelligence_mut().unwrap().persist()?;
    }

    // 第二次运行: 空注册表, 仅凭配方重建
    {
        let mut injector = DependencyInjector::new(reflection());
        injector.set_intelligence(Some(DependencyIntelligence::open(&path)));

        let instance = injector.get("TestInterface")?;
        assert_eq!(
            instance.downcast_ref::<TestObject>().unwrap().token(),
            "learned"
        );

        let again = injector.get("TestInterface")?;
        assert!(Arc::ptr_eq(&instance, &again));
    }

    Ok(())
}

#[test]
fn test_intelligence_discards_failed_resolution() {
    let mut ghost = Dependency::new("Ghost").unwrap();
    ghost.add_interface("Logger");

    let mut injector = injector_with(vec![ghost]);

    let dir = tempfile::tempdir().unwrap();
    injector.set_intelligence(Some(DependencyIntelligence::open(
        dir.path().join("recipes.json"),
    )));

    assert!(injector.get("Logger").is_err());
    assert!(!injector.intelligence_mut().unwrap().is_dirty());
}
