//! Sample beans and enums shared by the integration tests.
#![allow(dead_code)]

use configme::beanmapper::{Bean, BeanClass};
use configme::typeinfo::ConfigEnum;
use configme::{typed_bean, typed_enum, PropertyValue};
use indexmap::IndexMap;

pub fn tree(json: &str) -> PropertyValue {
    serde_json::from_str(json).unwrap()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestEnum {
    First,
    Second,
    Third,
}

impl ConfigEnum for TestEnum {
    fn variants() -> &'static [Self] {
        &[TestEnum::First, TestEnum::Second, TestEnum::Third]
    }

    fn name(&self) -> &'static str {
        match self {
            TestEnum::First => "FIRST",
            TestEnum::Second => "SECOND",
            TestEnum::Third => "THIRD",
        }
    }
}

typed_enum!(TestEnum);

/// Two mappable properties; `get_long_field` is static and `uuid` has no
/// setter.
#[derive(Debug, Default)]
pub struct SampleBean {
    pub name: String,
    pub size: i32,
    pub long_field: i64,
    pub uuid: String,
}

impl Bean for SampleBean {
    fn bean_class() -> BeanClass {
        BeanClass::builder::<Self>()
            .constructor(SampleBean::default)
            .field::<String>("name")
            .field::<i32>("size")
            .field::<i64>("long_field")
            .field::<String>("uuid")
            .getter("get_name", |b: &SampleBean| b.name.clone())
            .setter("set_name", |b: &mut SampleBean, v: String| b.name = v)
            .getter("get_size", |b: &SampleBean| b.size)
            .setter("set_size", |b: &mut SampleBean, v: i32| b.size = v)
            .getter("get_uuid", |b: &SampleBean| b.uuid.clone())
            .static_method::<i64>("get_long_field")
            .setter("set_long_field", |b: &mut SampleBean, v: i64| b.long_field = v)
            .build()
    }
}

#[derive(Debug, Default)]
pub struct BooleanTestBean {
    pub is_empty: bool,
    pub is_reference: Option<bool>,
    pub active: bool,
    pub is_string: String,
    pub is_field: bool,
    pub not_matched: bool,
}

impl Bean for BooleanTestBean {
    fn bean_class() -> BeanClass {
        BeanClass::builder::<Self>()
            .constructor(BooleanTestBean::default)
            .field::<bool>("is_empty")
            .field::<Option<bool>>("is_reference")
            .field::<bool>("active")
            .field::<String>("is_string")
            .field::<bool>("is_field")
            .field::<bool>("not_matched")
            .getter("is_empty", |b: &BooleanTestBean| b.is_empty)
            .setter("set_empty", |b: &mut BooleanTestBean, v: bool| b.is_empty = v)
            // `is_` getters must return a plain bool
            .getter("is_reference", |b: &BooleanTestBean| b.is_reference)
            .setter("set_reference", |b: &mut BooleanTestBean, v: Option<bool>| b.is_reference = v)
            .getter("is_active", |b: &BooleanTestBean| b.active)
            .setter("set_active", |b: &mut BooleanTestBean, v: bool| b.active = v)
            .getter("is_string", |b: &BooleanTestBean| b.is_string.clone())
            .setter("set_string", |b: &mut BooleanTestBean, v: String| b.is_string = v)
            .getter("get_is_field", |b: &BooleanTestBean| b.is_field)
            .setter("set_is_field", |b: &mut BooleanTestBean, v: bool| b.is_field = v)
            // property `is_not_matched` has no field of that name
            .getter("get_is_not_matched", |b: &BooleanTestBean| b.not_matched)
            .setter("set_is_not_matched", |b: &mut BooleanTestBean, v: bool| b.not_matched = v)
            .build()
    }
}

#[derive(Debug, Default)]
pub struct BeanWithTransientFields {
    pub name: String,
    pub temp_id: i64,
    pub is_saved: bool,
    pub is_mandatory: bool,
}

impl Bean for BeanWithTransientFields {
    fn bean_class() -> BeanClass {
        BeanClass::builder::<Self>()
            .constructor(BeanWithTransientFields::default)
            .field::<String>("name")
            .field::<i64>("temp_id")
            .transient()
            .field::<bool>("is_saved")
            .transient()
            .field::<bool>("is_mandatory")
            .getter("get_name", |b: &BeanWithTransientFields| b.name.clone())
            .setter("set_name", |b: &mut BeanWithTransientFields, v: String| b.name = v)
            .getter("get_temp_id", |b: &BeanWithTransientFields| b.temp_id)
            .setter("set_temp_id", |b: &mut BeanWithTransientFields, v: i64| b.temp_id = v)
            .transient()
            .getter("is_saved", |b: &BeanWithTransientFields| b.is_saved)
            .transient()
            .setter("set_saved", |b: &mut BeanWithTransientFields, v: bool| b.is_saved = v)
            .getter("is_mandatory", |b: &BeanWithTransientFields| b.is_mandatory)
            .setter("set_mandatory", |b: &mut BeanWithTransientFields, v: bool| b.is_mandatory = v)
            .build()
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Parent {
    pub id: i64,
    pub temporary: bool,
}

impl Bean for Parent {
    fn bean_class() -> BeanClass {
        BeanClass::builder::<Self>()
            .constructor(Parent::default)
            .field::<i64>("id")
            .field::<bool>("temporary")
            .transient()
            .getter("get_id", |p: &Parent| p.id)
            .setter("set_id", |p: &mut Parent, v: i64| p.id = v)
            .getter("is_temporary", |p: &Parent| p.temporary)
            .setter("set_temporary", |p: &mut Parent, v: bool| p.temporary = v)
            .build()
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Middle {
    pub parent: Parent,
    pub name: String,
    pub ratio: f32,
}

impl Bean for Middle {
    fn bean_class() -> BeanClass {
        BeanClass::builder::<Self>()
            .constructor(Middle::default)
            .extends::<Parent>(|m| &m.parent, |m| &mut m.parent)
            .field::<String>("name")
            .field::<f32>("ratio")
            .getter("get_name", |m: &Middle| m.name.clone())
            .setter("set_name", |m: &mut Middle, v: String| m.name = v)
            .getter("get_ratio", |m: &Middle| m.ratio)
            .setter("set_ratio", |m: &mut Middle, v: f32| m.ratio = v)
            .build()
    }
}

/// Redeclares `temporary`, this time without the transient marker.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Child {
    pub middle: Middle,
    pub importance: i32,
    pub temporary: bool,
}

impl Bean for Child {
    fn bean_class() -> BeanClass {
        BeanClass::builder::<Self>()
            .constructor(Child::default)
            .extends::<Middle>(|c| &c.middle, |c| &mut c.middle)
            .field::<i32>("importance")
            .field::<bool>("temporary")
            .getter("get_importance", |c: &Child| c.importance)
            .setter("set_importance", |c: &mut Child, v: i32| c.importance = v)
            .getter("is_temporary", |c: &Child| c.temporary)
            .setter("set_temporary", |c: &mut Child, v: bool| c.temporary = v)
            .build()
    }
}

typed_bean!(Parent, Middle, Child);

#[derive(Debug, Default)]
pub struct AnnotatedEntry {
    pub id: i64,
    pub has_id: bool,
}

impl Bean for AnnotatedEntry {
    fn bean_class() -> BeanClass {
        BeanClass::builder::<Self>()
            .constructor(AnnotatedEntry::default)
            .field::<i64>("id")
            .field::<bool>("has_id")
            .export_as("has-id")
            .getter("get_id", |e: &AnnotatedEntry| e.id)
            .setter("set_id", |e: &mut AnnotatedEntry, v: i64| e.id = v)
            .getter("get_has_id", |e: &AnnotatedEntry| e.has_id)
            .setter("set_has_id", |e: &mut AnnotatedEntry, v: bool| e.has_id = v)
            .build()
    }
}

#[derive(Debug, Default)]
pub struct BeanWithNameClash {
    pub threshold: String,
    pub threshold_raw: i32,
}

impl Bean for BeanWithNameClash {
    fn bean_class() -> BeanClass {
        BeanClass::builder::<Self>()
            .constructor(BeanWithNameClash::default)
            .field::<String>("threshold")
            .field::<i32>("threshold_raw")
            .export_as("threshold")
            .getter("get_threshold", |b: &BeanWithNameClash| b.threshold.clone())
            .setter("set_threshold", |b: &mut BeanWithNameClash, v: String| b.threshold = v)
            .getter("get_threshold_raw", |b: &BeanWithNameClash| b.threshold_raw)
            .setter("set_threshold_raw", |b: &mut BeanWithNameClash, v: i32| b.threshold_raw = v)
            .build()
    }
}

#[derive(Debug, Default)]
pub struct BeanWithEmptyName {
    pub id: i32,
    pub author: String,
}

impl Bean for BeanWithEmptyName {
    fn bean_class() -> BeanClass {
        BeanClass::builder::<Self>()
            .constructor(BeanWithEmptyName::default)
            .field::<i32>("id")
            .field::<String>("author")
            .getter("get_id", |b: &BeanWithEmptyName| b.id)
            .setter("set_id", |b: &mut BeanWithEmptyName, v: i32| b.id = v)
            .getter("get_author", |b: &BeanWithEmptyName| b.author.clone())
            .export_as(" ")
            .setter("set_author", |b: &mut BeanWithEmptyName, v: String| b.author = v)
            .build()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Executor {
    User,
    Console,
}

impl ConfigEnum for Executor {
    fn variants() -> &'static [Self] {
        &[Executor::User, Executor::Console]
    }

    fn name(&self) -> &'static str {
        match self {
            Executor::User => "USER",
            Executor::Console => "CONSOLE",
        }
    }
}

typed_enum!(Executor);

#[derive(Debug, Clone, PartialEq)]
pub struct Execution {
    pub executor: Executor,
    pub optional: bool,
    pub importance: f64,
}

impl Default for Execution {
    fn default() -> Self {
        Self {
            executor: Executor::User,
            optional: false,
            importance: 1.0,
        }
    }
}

impl Bean for Execution {
    fn bean_class() -> BeanClass {
        BeanClass::builder::<Self>()
            .constructor(Execution::default)
            .field::<Executor>("executor")
            .field::<bool>("optional")
            .field::<f64>("importance")
            .getter("get_executor", |e: &Execution| e.executor)
            .setter("set_executor", |e: &mut Execution, v: Executor| e.executor = v)
            .getter("is_optional", |e: &Execution| e.optional)
            .setter("set_optional", |e: &mut Execution, v: bool| e.optional = v)
            .getter("get_importance", |e: &Execution| e.importance)
            .setter("set_importance", |e: &mut Execution, v: f64| e.importance = v)
            .build()
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Command {
    pub command: String,
    pub arguments: Vec<String>,
    pub execution: Execution,
}

impl Bean for Command {
    fn bean_class() -> BeanClass {
        BeanClass::builder::<Self>()
            .constructor(Command::default)
            .field::<String>("command")
            .field::<Vec<String>>("arguments")
            .field::<Execution>("execution")
            .getter("get_command", |c: &Command| c.command.clone())
            .setter("set_command", |c: &mut Command, v: String| c.command = v)
            .getter("get_arguments", |c: &Command| c.arguments.clone())
            .setter("set_arguments", |c: &mut Command, v: Vec<String>| c.arguments = v)
            .getter("get_execution", |c: &Command| c.execution.clone())
            .setter("set_execution", |c: &mut Command, v: Execution| c.execution = v)
            .build()
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct CommandConfig {
    pub commands: IndexMap<String, Command>,
    pub duration: i32,
}

impl Bean for CommandConfig {
    fn bean_class() -> BeanClass {
        BeanClass::builder::<Self>()
            .constructor(CommandConfig::default)
            .field::<IndexMap<String, Command>>("commands")
            .field::<i32>("duration")
            .getter("get_commands", |c: &CommandConfig| c.commands.clone())
            .setter("set_commands", |c: &mut CommandConfig, v: IndexMap<String, Command>| {
                c.commands = v
            })
            .getter("get_duration", |c: &CommandConfig| c.duration)
            .setter("set_duration", |c: &mut CommandConfig, v: i32| c.duration = v)
            .build()
    }
}

typed_bean!(Execution, Command, CommandConfig);

/// A host entry that is useless without its host.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct HostEntry {
    pub host: String,
    pub port: u16,
}

impl Bean for HostEntry {
    fn bean_class() -> BeanClass {
        BeanClass::builder::<Self>()
            .constructor(HostEntry::default)
            .field::<String>("host")
            .mandatory()
            .field::<u16>("port")
            .getter("get_host", |h: &HostEntry| h.host.clone())
            .setter("set_host", |h: &mut HostEntry, v: String| h.host = v)
            .getter("get_port", |h: &HostEntry| h.port)
            .setter("set_port", |h: &mut HostEntry, v: u16| h.port = v)
            .build()
    }
}

typed_bean!(HostEntry);

pub const COMMAND_CONFIG: &str = r#"{
    "commands": {
        "save": {
            "command": "save-all",
            "arguments": ["--force", "--quiet"],
            "execution": {"executor": "CONSOLE", "optional": false, "importance": 0.5}
        },
        "refresh": {
            "command": "refresh",
            "arguments": [],
            "execution": {"executor": "USER", "optional": true, "importance": 2.5}
        }
    },
    "duration": 13
}"#;
