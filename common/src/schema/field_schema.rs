use crate::errors::AppError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 字段变更级别
///
/// 决定字段能否被通用 Update/Patch 写入：
/// - Immutable：仅创建时写入（id、create_time）
/// - ServerManaged：每次变更由引擎强制覆盖（update_time、revision）
/// - Sensitive：不经专用钩子不得写入（password）
/// - UserWritable：可自由写入
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MutationClass {
    Immutable,
    ServerManaged,
    Sensitive,
    UserWritable,
}

/// 字段值类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Boolean,
    Integer,
    Float,
    Object,
}

impl FieldKind {
    fn accepts_value(&self, value: &Value) -> bool {
        match self {
            FieldKind::Text => value.is_string(),
            FieldKind::Boolean => value.is_boolean(),
            FieldKind::Integer => value.is_i64() || value.is_u64(),
            FieldKind::Float => value.is_number(),
            FieldKind::Object => true,
        }
    }
}

/// 单个字段的注册信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    name: String,
    kind: FieldKind,
    nullable: bool,
    class: MutationClass,
}

impl FieldSpec {
    pub fn new(name: &str, kind: FieldKind, nullable: bool, class: MutationClass) -> Self {
        Self { name: name.to_string(), kind, nullable, class }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn kind(&self) -> FieldKind {
        self.kind
    }
    pub fn nullable(&self) -> bool {
        self.nullable
    }
    pub fn class(&self) -> MutationClass {
        self.class
    }

    /// 判断给定 JSON 值是否与字段类型兼容
    pub fn accepts(&self, value: &Value) -> bool {
        if value.is_null() {
            return self.nullable;
        }
        self.kind.accepts_value(value)
    }
}

/// 实体字段注册表
///
/// 按声明顺序记录实体全部字段的名称、类型与变更级别，
/// 由 `entity_macro::FieldSchemaProvider` 派生宏在编译期生成。
#[derive(Debug, Clone)]
pub struct FieldSchema {
    entity: String,
    fields: Vec<FieldSpec>,
}

impl FieldSchema {
    pub fn new(entity: &str, fields: Vec<FieldSpec>) -> Self {
        Self { entity: entity.to_string(), fields }
    }

    pub fn entity_name(&self) -> &str {
        &self.entity
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// 按名称查找字段，未注册的名称返回 UnknownField
    pub fn require(&self, name: &str) -> Result<&FieldSpec, AppError> {
        self.get(name).ok_or_else(|| AppError::UnknownField(name.to_string()))
    }

    pub fn sensitive_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.class == MutationClass::Sensitive)
    }
}

/// 实体到字段注册表的关联
pub trait FieldSchemaProvider {
    fn field_schema() -> &'static FieldSchema;
}
