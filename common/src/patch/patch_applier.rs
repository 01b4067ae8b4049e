use crate::errors::AppError;
use crate::schema::{FieldSchema, FieldSpec, MutationClass};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// 补丁操作类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PatchKind {
    Add,
    Remove,
    Replace,
    Move,
    Copy,
    Test,
}

/// 单条补丁操作
///
/// path 支持 "field"、"/field"、"field.nested"、"/field/nested" 几种写法，
/// 首段必须是注册表中的字段名
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PatchOp {
    pub op: PatchKind,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
}

impl PatchOp {
    pub fn new(op: PatchKind, path: &str, value: Option<Value>) -> Self {
        Self { op, path: path.to_string(), value, from: None }
    }

    pub fn with_from(op: PatchKind, path: &str, from: &str) -> Self {
        Self { op, path: path.to_string(), value: None, from: Some(from.to_string()) }
    }

    /// path 的首段字段名
    pub fn root_field(&self) -> Option<String> {
        split_path(&self.path).into_iter().next()
    }

    /// from 的首段字段名
    pub fn from_root_field(&self) -> Option<String> {
        self.from.as_deref().and_then(|p| split_path(p).into_iter().next())
    }
}

fn split_path(path: &str) -> Vec<String> {
    path.trim_start_matches('/')
        .split(|c| c == '/' || c == '.')
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// 对实体应用一组有序补丁操作
///
/// 纯函数：在实体的 JSON 投影上依次执行操作，最后整体反序列化回实体类型。
/// 任何一条操作失败（未知字段、类型不兼容、变更级别不允许、test 不通过）
/// 都使整批失败，原实体不发生任何可见变化。
pub fn apply_patch<T>(schema: &FieldSchema, entity: &T, ops: &[PatchOp]) -> Result<T, AppError>
where
    T: Serialize + DeserializeOwned,
{
    let mut root = serde_json::to_value(entity)
        .map_err(|e| AppError::PatchRejected(format!("entity projection failed: {}", e)))?;

    for op in ops {
        apply_one(schema, &mut root, op)?;
    }

    serde_json::from_value(root)
        .map_err(|e| AppError::PatchRejected(format!("result type mismatch: {}", e)))
}

fn apply_one(schema: &FieldSchema, root: &mut Value, op: &PatchOp) -> Result<(), AppError> {
    let segments = split_path(&op.path);
    let spec = resolve_target(schema, &segments, &op.path)?;

    match op.op {
        PatchKind::Add | PatchKind::Replace => {
            let value = required_value(op)?;
            check_root_kind(spec, &segments, &value)?;
            set_value(root, &segments, value)
        }
        PatchKind::Remove => {
            if segments.len() == 1 && !spec.nullable() {
                return Err(AppError::PatchRejected(format!("field '{}' is not removable", spec.name())));
            }
            remove_value(root, &segments)
        }
        PatchKind::Move | PatchKind::Copy => {
            let from = op.from.as_deref().ok_or_else(|| {
                AppError::PatchRejected(format!("'{:?}' operation requires 'from'", op.op))
            })?;
            let from_segments = split_path(from);
            let from_spec = resolve_source(schema, &from_segments, from, op.op)?;
            let value = get_value(root, &from_segments, from)?;
            check_root_kind(spec, &segments, &value)?;
            set_value(root, &segments, value)?;
            if op.op == PatchKind::Move {
                if from_segments.len() == 1 && !from_spec.nullable() {
                    return Err(AppError::PatchRejected(format!(
                        "field '{}' is not removable",
                        from_spec.name()
                    )));
                }
                remove_value(root, &from_segments)?;
            }
            Ok(())
        }
        PatchKind::Test => {
            let expected = required_value(op)?;
            let actual = get_value(root, &segments, &op.path)?;
            if actual != expected {
                return Err(AppError::PatchRejected(format!("test failed at '{}'", op.path)));
            }
            Ok(())
        }
    }
}

/// 校验写入目标：首段必须注册，且变更级别为 UserWritable
fn resolve_target<'a>(
    schema: &'a FieldSchema,
    segments: &[String],
    path: &str,
) -> Result<&'a FieldSpec, AppError> {
    let first = segments
        .first()
        .ok_or_else(|| AppError::PatchRejected(format!("empty path '{}'", path)))?;
    let spec = schema
        .get(first)
        .ok_or_else(|| AppError::PatchRejected(format!("unknown field '{}'", first)))?;
    match spec.class() {
        MutationClass::UserWritable => Ok(spec),
        _ => Err(AppError::PatchRejected(format!("field '{}' is not patchable", first))),
    }
}

/// 校验读取来源：copy 只拒绝敏感字段，move 还会改写来源，按写入规则处理
fn resolve_source<'a>(
    schema: &'a FieldSchema,
    segments: &[String],
    from: &str,
    op: PatchKind,
) -> Result<&'a FieldSpec, AppError> {
    let first = segments
        .first()
        .ok_or_else(|| AppError::PatchRejected(format!("empty path '{}'", from)))?;
    let spec = schema
        .get(first)
        .ok_or_else(|| AppError::PatchRejected(format!("unknown field '{}'", first)))?;
    match (op, spec.class()) {
        (_, MutationClass::Sensitive) => {
            Err(AppError::PatchRejected(format!("field '{}' is not readable", first)))
        }
        (PatchKind::Move, MutationClass::UserWritable) => Ok(spec),
        (PatchKind::Move, _) => {
            Err(AppError::PatchRejected(format!("field '{}' is not patchable", first)))
        }
        _ => Ok(spec),
    }
}

fn required_value(op: &PatchOp) -> Result<Value, AppError> {
    op.value
        .clone()
        .ok_or_else(|| AppError::PatchRejected(format!("'{:?}' operation requires 'value'", op.op)))
}

/// 顶层字段直接按注册类型校验，嵌套值由最终反序列化兜底
fn check_root_kind(spec: &FieldSpec, segments: &[String], value: &Value) -> Result<(), AppError> {
    if segments.len() == 1 && !spec.accepts(value) {
        return Err(AppError::PatchRejected(format!(
            "value is not compatible with field '{}'",
            spec.name()
        )));
    }
    Ok(())
}

fn get_value(root: &Value, segments: &[String], path: &str) -> Result<Value, AppError> {
    let mut current = root;
    for segment in segments {
        current = current
            .as_object()
            .and_then(|map| map.get(segment))
            .ok_or_else(|| AppError::PatchRejected(format!("path '{}' not found", path)))?;
    }
    Ok(current.clone())
}

fn set_value(root: &mut Value, segments: &[String], value: Value) -> Result<(), AppError> {
    let (last, parents) = segments.split_last().expect("segments checked non-empty");
    let mut current = root;
    for segment in parents {
        current = current
            .as_object_mut()
            .and_then(|map| map.get_mut(segment))
            .ok_or_else(|| AppError::PatchRejected(format!("path segment '{}' not found", segment)))?;
    }
    let map = current
        .as_object_mut()
        .ok_or_else(|| AppError::PatchRejected(format!("path segment '{}' is not an object", last)))?;
    map.insert(last.clone(), value);
    Ok(())
}

fn remove_value(root: &mut Value, segments: &[String]) -> Result<(), AppError> {
    let (last, parents) = segments.split_last().expect("segments checked non-empty");
    let mut current = root;
    for segment in parents {
        current = current
            .as_object_mut()
            .and_then(|map| map.get_mut(segment))
            .ok_or_else(|| AppError::PatchRejected(format!("path segment '{}' not found", segment)))?;
    }
    let map = current
        .as_object_mut()
        .ok_or_else(|| AppError::PatchRejected(format!("path segment '{}' is not an object", last)))?;
    if segments.len() == 1 {
        // 顶层字段置空而不是移除键，保持实体形状可反序列化
        map.insert(last.clone(), Value::Null);
    } else {
        map.remove(last)
            .ok_or_else(|| AppError::PatchRejected(format!("path segment '{}' not found", last)))?;
    }
    Ok(())
}
