//! 解析记忆层
//!
//! 可选的旁路缓存: 按指纹记录一次成功解析用到的类名、接口、
//! 工厂与方法调用序列, 后续进程启动时直接按配方重建实例,
//! 跳过反射端口的形参发现。配方表以 JSON 持久化, 仅在学到
//! 新内容时写回。

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// 记录的参数值
///
/// 可重放的两种形式: 冻结的 JSON 值, 或重放时重新经引擎解析的
/// 依赖引用
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RecordedArgument {
    /// 冻结的 JSON 值
    Value(serde_json::Value),
    /// 可重新解析的依赖引用
    Dependency {
        /// 依赖的接口名称
        interface: String,
        /// 依赖的标识
        id: Option<String>,
    },
}

/// 记录的方法调用
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedMethod {
    /// 方法名称
    pub method: String,
    /// 按声明顺序记录的参数
    pub arguments: Vec<(String, RecordedArgument)>,
}

/// 实例配方
///
/// 一次成功解析的完整重放信息, 方法列表的第一项是构造入口
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceRecipe {
    /// 解析到的类名
    pub class_name: String,
    /// 实例注册到的接口集合
    pub interfaces: Vec<String>,
    /// 解析到的定义标识
    pub id: String,
    /// 工厂依赖 (接口, 标识), 存在时第一个方法在工厂上调用
    pub factory: Option<(String, Option<String>)>,
    /// 按顺序重放的方法调用
    pub methods: Vec<RecordedMethod>,
    /// 是否为无标识解析
    pub anonymous: bool,
}

/// 持久化的配方表
#[derive(Serialize, Deserialize)]
struct RecipeTable {
    generated_at: DateTime<Utc>,
    recipes: HashMap<String, InstanceRecipe>,
}

/// 进行中的记录
#[derive(Debug)]
struct PendingRecord {
    class_name: Option<String>,
    interfaces: Vec<String>,
    id: Option<String>,
    factory: Option<(String, Option<String>)>,
    methods: Vec<RecordedMethod>,
    current: Option<RecordedMethod>,
    anonymous: bool,
    recordable: bool,
}

impl PendingRecord {
    fn new(anonymous: bool) -> Self {
        Self {
            class_name: None,
            interfaces: Vec::new(),
            id: None,
            factory: None,
            methods: Vec::new(),
            current: None,
            anonymous,
            recordable: true,
        }
    }

    fn finish_method(&mut self) {
        if let Some(method) = self.current.take() {
            self.methods.push(method);
        }
    }
}

/// 解析记忆
pub struct DependencyIntelligence {
    path: PathBuf,
    recipes: HashMap<String, InstanceRecipe>,
    pending: HashMap<String, PendingRecord>,
    dirty: bool,
}

impl DependencyIntelligence {
    /// 打开指定路径的记忆文件
    ///
    /// 文件不存在或无法解析时以空表启动
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let recipes = Self::read_table(&path);

        Self {
            path,
            recipes,
            pending: HashMap::new(),
            dirty: false,
        }
    }

    fn read_table(path: &Path) -> HashMap<String, InstanceRecipe> {
        if !path.exists() {
            return HashMap::new();
        }

        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<RecipeTable>(&content) {
                Ok(table) => {
                    debug!("读取记忆配方表: {} 条配方", table.recipes.len());

                    table.recipes
                }
                Err(error) => {
                    warn!("记忆配方表无法解析, 以空表启动: {error}");

                    HashMap::new()
                }
            },
            Err(error) => {
                warn!("记忆配方表无法读取, 以空表启动: {error}");

                HashMap::new()
            }
        }
    }

    /// 计算解析指纹
    ///
    /// 归一化的 `接口__标识`, 路径分隔字符替换为下划线
    pub fn fingerprint(interface: &str, id: Option<&str>) -> String {
        let fingerprint = format!("{}__{}", interface, id.unwrap_or_default());

        fingerprint.replace([':', '.', '\\', '/'], "_")
    }

    /// 查找已学到的配方
    pub fn recipe(&self, fingerprint: &str) -> Option<&InstanceRecipe> {
        self.recipes.get(fingerprint)
    }

    /// 丢弃一条已学到的配方
    pub fn forget(&mut self, fingerprint: &str) {
        if self.recipes.remove(fingerprint).is_some() {
            self.dirty = true;
        }
    }

    /// 开启一条进行中的记录
    pub fn begin(&mut self, fingerprint: &str, anonymous: bool) {
        self.pending
            .insert(fingerprint.to_string(), PendingRecord::new(anonymous));
    }

    /// 记录解析到的类名
    pub fn record_class(&mut self, fingerprint: &str, class_name: &str) {
        if let Some(record) = self.pending.get_mut(fingerprint) {
            record.class_name = Some(class_name.to_string());
        }
    }

    /// 记录工厂依赖
    pub fn record_factory(&mut self, fingerprint: &str, interface: &str, id: Option<&str>) {
        if let Some(record) = self.pending.get_mut(fingerprint) {
            record.factory = Some((interface.to_string(), id.map(str::to_string)));
        }
    }

    /// 记录实例注册到的接口与标识
    pub fn record_identity(&mut self, fingerprint: &str, interfaces: &[String], id: &str) {
        if let Some(record) = self.pending.get_mut(fingerprint) {
            record.interfaces = interfaces.to_vec();
            record.id = Some(id.to_string());
        }
    }

    /// 开始记录一个方法调用, 结束前一个
    pub fn record_method(&mut self, fingerprint: &str, method: &str) {
        if let Some(record) = self.pending.get_mut(fingerprint) {
            record.finish_method();
            record.current = Some(RecordedMethod {
                method: method.to_string(),
                arguments: Vec::new(),
            });
        }
    }

    /// 记录当前方法的一个参数
    pub fn record_argument(&mut self, fingerprint: &str, name: &str, argument: RecordedArgument) {
        if let Some(record) = self.pending.get_mut(fingerprint) {
            if let Some(current) = record.current.as_mut() {
                current.arguments.push((name.to_string(), argument));
            }
        }
    }

    /// 标记记录不可重放
    ///
    /// 参数无法以 JSON 值或依赖引用表示时调用, 该记录不会持久化
    pub fn mark_unrecordable(&mut self, fingerprint: &str) {
        if let Some(record) = self.pending.get_mut(fingerprint) {
            record.recordable = false;
        }
    }

    /// 完成记录
    ///
    /// 仅当解析完整成功且记录可重放时写入配方表
    pub fn complete(&mut self, fingerprint: &str) {
        let Some(mut record) = self.pending.remove(fingerprint) else {
            return;
        };

        record.finish_method();

        let (recordable, class_name, id) = (record.recordable, record.class_name, record.id);
        let (Some(class_name), Some(id)) = (class_name, id) else {
            return;
        };
        if !recordable {
            return;
        }

        self.recipes.insert(
            fingerprint.to_string(),
            InstanceRecipe {
                class_name,
                interfaces: record.interfaces,
                id,
                factory: record.factory,
                methods: record.methods,
                anonymous: record.anonymous,
            },
        );
        self.dirty = true;
    }

    /// 丢弃进行中的记录
    pub fn discard(&mut self, fingerprint: &str) {
        self.pending.remove(fingerprint);
    }

    /// 是否学到了尚未持久化的内容
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// 持久化配方表
    ///
    /// 仅在学到新内容时写文件, 写入后显式刷新并释放句柄
    pub fn persist(&mut self) -> std::io::Result<()> {
        if !self.dirty {
            return Ok(());
        }

        let table = RecipeTable {
            generated_at: Utc::now(),
            recipes: self.recipes.clone(),
        };

        let content = serde_json::to_string_pretty(&table)
            .map_err(|error| std::io::Error::new(std::io::ErrorKind::InvalidData, error))?;

        let mut file = fs::File::create(&self.path)?;
        file.write_all(content.as_bytes())?;
        file.flush()?;
        drop(file);

        debug!("写入记忆配方表: {} 条配方", self.recipes.len());
        self.dirty = false;

        Ok(())
    }
}

impl Drop for DependencyIntelligence {
    fn drop(&mut self) {
        if self.dirty {
            if let Err(error) = self.persist() {
                warn!("记忆配方表写入失败: {error}");
            }
        }
    }
}
