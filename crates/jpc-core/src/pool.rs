//! # Descriptor Files
//!
//! Builds `prost-reflect` descriptor pools. Binary `FileDescriptorSet`s, as
//! written by `protoc --descriptor_set_out`, are decoded directly. For
//! hand-written descriptors there is a small YAML/JSON format that maps
//! onto one proto2 `FileDescriptorProto`:
//!
//! ```yaml
//! package: sample
//! enums:
//!   - name: H
//!     values: [{ name: X, number: 1 }, { name: Y, number: 2 }]
//! messages:
//!   - name: BarInfo
//!     fields:
//!       - { name: x, label: required, type: bool }
//!       - { name: y, label: optional, type: int64 }
//!   - name: FooInfo
//!     fields:
//!       - { name: h, type: enum, type_name: H }
//!       - { name: bar, number: 17, type: message, type_name: sample.BarInfo }
//! ```
//!
//! `label` defaults to `optional` and `number` to the 1-based declaration
//! position. `type_name` is a message or enum name, either relative to the
//! package or fully qualified. Messages may refer to each other in any
//! order, including recursively. Everything else (duplicate names or
//! numbers, unresolved references) is checked by `prost-reflect` when the
//! file is added to the pool.

use std::path::Path;

use prost_reflect::DescriptorPool;
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FileDescriptorProto,
};
use serde::{Deserialize, Serialize};

use crate::error::DescriptorFileError;
use crate::kind::Cardinality;

/// Top level of a descriptor file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DescriptorFile {
    /// Dot-separated package prefix of every declared name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    #[serde(default)]
    pub enums: Vec<EnumEntry>,
    #[serde(default)]
    pub messages: Vec<MessageEntry>,
}

/// One enum type in a descriptor file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnumEntry {
    pub name: String,
    pub values: Vec<EnumValueEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnumValueEntry {
    pub name: String,
    pub number: i32,
}

/// One message type in a descriptor file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MessageEntry {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldEntry>,
}

/// One field in a descriptor file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    #[serde(default = "default_label")]
    pub label: Cardinality,
    #[serde(rename = "type")]
    pub kind: FieldType,
    /// Message or enum type of a `message` or `enum` field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
}

fn default_label() -> Cardinality {
    Cardinality::Optional
}

/// Field types, spelled as in `.proto` files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Double,
    Float,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Sint32,
    Sint64,
    Fixed32,
    Fixed64,
    Sfixed32,
    Sfixed64,
    Bool,
    String,
    Bytes,
    Enum,
    Message,
}

impl FieldType {
    fn proto(self) -> Type {
        match self {
            Self::Double => Type::Double,
            Self::Float => Type::Float,
            Self::Int32 => Type::Int32,
            Self::Int64 => Type::Int64,
            Self::Uint32 => Type::Uint32,
            Self::Uint64 => Type::Uint64,
            Self::Sint32 => Type::Sint32,
            Self::Sint64 => Type::Sint64,
            Self::Fixed32 => Type::Fixed32,
            Self::Fixed64 => Type::Fixed64,
            Self::Sfixed32 => Type::Sfixed32,
            Self::Sfixed64 => Type::Sfixed64,
            Self::Bool => Type::Bool,
            Self::String => Type::String,
            Self::Bytes => Type::Bytes,
            Self::Enum => Type::Enum,
            Self::Message => Type::Message,
        }
    }

    /// `message` or `enum` for the two types that need a `type_name`.
    fn named(self) -> Option<&'static str> {
        match self {
            Self::Enum => Some("enum"),
            Self::Message => Some("message"),
            _ => None,
        }
    }
}

fn label(cardinality: Cardinality) -> Label {
    match cardinality {
        Cardinality::Required => Label::Required,
        Cardinality::Optional => Label::Optional,
        Cardinality::Repeated => Label::Repeated,
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn check_identifier(name: &str) -> Result<(), DescriptorFileError> {
    if is_identifier(name) {
        Ok(())
    } else {
        Err(DescriptorFileError::InvalidName(name.to_string()))
    }
}

impl DescriptorFile {
    pub fn from_yaml_str(text: &str) -> Result<Self, DescriptorFileError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self, DescriptorFileError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Resolve a `type_name` to the fully qualified form protobuf expects.
    fn qualify(&self, target: &str) -> String {
        match (target.strip_prefix('.'), &self.package) {
            (Some(_), _) => target.to_string(),
            (None, _) if target.contains('.') => format!(".{target}"),
            (None, Some(package)) => format!(".{package}.{target}"),
            (None, None) => format!(".{target}"),
        }
    }

    fn field_proto(
        &self,
        message: &MessageEntry,
        position: usize,
        field: &FieldEntry,
    ) -> Result<FieldDescriptorProto, DescriptorFileError> {
        check_identifier(&field.name)?;
        let type_name = match (field.kind.named(), &field.type_name) {
            (Some(_), Some(target)) => Some(self.qualify(target)),
            (Some(kind), None) => {
                return Err(DescriptorFileError::MissingTypeName {
                    message: message.name.clone(),
                    field: field.name.clone(),
                    kind,
                });
            }
            (None, Some(_)) => {
                return Err(DescriptorFileError::UnexpectedTypeName {
                    message: message.name.clone(),
                    field: field.name.clone(),
                });
            }
            (None, None) => None,
        };
        let number = match field.number {
            Some(number) => number,
            None => u32::try_from(position + 1).unwrap_or(u32::MAX),
        };
        Ok(FieldDescriptorProto {
            name: Some(field.name.clone()),
            // Out-of-range numbers are left for prost-reflect to reject.
            number: Some(i32::try_from(number).unwrap_or(i32::MAX)),
            label: Some(label(field.label) as i32),
            r#type: Some(field.kind.proto() as i32),
            type_name,
            ..Default::default()
        })
    }

    /// The proto2 `FileDescriptorProto` this file declares, named
    /// `file_name`.
    pub fn to_file_descriptor_proto(
        &self,
        file_name: &str,
    ) -> Result<FileDescriptorProto, DescriptorFileError> {
        if let Some(package) = &self.package {
            if !package.split('.').all(is_identifier) {
                return Err(DescriptorFileError::InvalidName(package.clone()));
            }
        }

        let enum_type = self
            .enums
            .iter()
            .map(|entry| {
                check_identifier(&entry.name)?;
                let value = entry
                    .values
                    .iter()
                    .map(|v| {
                        check_identifier(&v.name)?;
                        Ok(EnumValueDescriptorProto {
                            name: Some(v.name.clone()),
                            number: Some(v.number),
                            ..Default::default()
                        })
                    })
                    .collect::<Result<Vec<_>, DescriptorFileError>>()?;
                Ok(EnumDescriptorProto {
                    name: Some(entry.name.clone()),
                    value,
                    ..Default::default()
                })
            })
            .collect::<Result<Vec<_>, DescriptorFileError>>()?;

        let message_type = self
            .messages
            .iter()
            .map(|message| {
                check_identifier(&message.name)?;
                let field = message
                    .fields
                    .iter()
                    .enumerate()
                    .map(|(position, field)| self.field_proto(message, position, field))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(DescriptorProto {
                    name: Some(message.name.clone()),
                    field,
                    ..Default::default()
                })
            })
            .collect::<Result<Vec<_>, DescriptorFileError>>()?;

        Ok(FileDescriptorProto {
            name: Some(file_name.to_string()),
            package: self.package.clone(),
            message_type,
            enum_type,
            syntax: Some("proto2".to_string()),
            ..Default::default()
        })
    }

    /// A fresh pool holding this file.
    pub fn to_pool(&self) -> Result<DescriptorPool, DescriptorFileError> {
        let file_name = match &self.package {
            Some(package) => format!("{}.proto", package.replace('.', "/")),
            None => "descriptors.proto".to_string(),
        };
        let mut pool = DescriptorPool::new();
        pool.add_file_descriptor_proto(self.to_file_descriptor_proto(&file_name)?)?;
        Ok(pool)
    }
}

/// Build a pool from YAML descriptor-file text.
pub fn pool_from_yaml(text: &str) -> Result<DescriptorPool, DescriptorFileError> {
    DescriptorFile::from_yaml_str(text)?.to_pool()
}

/// Build a pool from JSON descriptor-file text.
pub fn pool_from_json(text: &str) -> Result<DescriptorPool, DescriptorFileError> {
    DescriptorFile::from_json_str(text)?.to_pool()
}

/// Load a descriptor file.
///
/// `.pb`, `.binpb` and `.desc` files are binary `FileDescriptorSet`s,
/// `.json` files use the JSON form of the descriptor format, and anything
/// else its YAML form.
pub fn load_pool(path: impl AsRef<Path>) -> Result<DescriptorPool, DescriptorFileError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| DescriptorFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let pool = match extension.as_deref() {
        Some("pb" | "binpb" | "desc") => DescriptorPool::decode(bytes.as_slice())?,
        Some("json") => serde_json::from_slice::<DescriptorFile>(&bytes)?.to_pool()?,
        _ => serde_yaml::from_slice::<DescriptorFile>(&bytes)?.to_pool()?,
    };
    tracing::debug!(
        path = %path.display(),
        messages = pool.all_messages().count(),
        "loaded descriptor file"
    );
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::FieldDescriptorExt;
    use prost::Message;

    const SAMPLE: &str = r#"
package: t
messages:
  - name: Outer
    fields:
      - { name: inner, type: message, type_name: Inner }
      - { name: tags, label: repeated, type: string }
  - name: Inner
    fields:
      - { name: x, label: required, type: bool }
      - { name: y, number: 7, type: uint64 }
"#;

    fn message_names(pool: &DescriptorPool) -> Vec<String> {
        pool.all_messages()
            .map(|m| m.full_name().to_string())
            .collect()
    }

    #[test]
    fn test_load_yaml_forward_reference() {
        let pool = pool_from_yaml(SAMPLE).unwrap();
        assert_eq!(pool.all_messages().count(), 2);
        let outer = pool.get_message_by_name("t.Outer").unwrap();
        let inner = pool.get_message_by_name("t.Inner").unwrap();
        let field = outer.get_field_by_name("inner").unwrap();
        assert_eq!(field.declared_cardinality(), Cardinality::Optional);
        assert_eq!(field.nested_message(), Some(inner.clone()));
        assert_eq!(inner.get_field_by_name("y").unwrap().number(), 7);
        assert_eq!(inner.get_field_by_name("y").unwrap().declared_type(), "uint64");
    }

    #[test]
    fn test_messages_in_declaration_order() {
        let pool = pool_from_yaml(SAMPLE).unwrap();
        assert_eq!(message_names(&pool), vec!["t.Outer", "t.Inner"]);
    }

    #[test]
    fn test_load_json() {
        let json = r#"{"package":"t","messages":[{"name":"A","fields":[{"name":"a","label":"repeated","type":"int32"}]}]}"#;
        let pool = pool_from_json(json).unwrap();
        let a = pool.get_message_by_name("t.A").unwrap();
        assert_eq!(
            a.get_field_by_name("a").unwrap().declared_cardinality(),
            Cardinality::Repeated
        );
    }

    #[test]
    fn test_recursive_messages_allowed() {
        let yaml = r#"
package: t
messages:
  - name: Node
    fields:
      - { name: children, label: repeated, type: message, type_name: Node }
"#;
        let pool = pool_from_yaml(yaml).unwrap();
        let node = pool.get_message_by_name("t.Node").unwrap();
        let children = node.get_field_by_name("children").unwrap();
        assert_eq!(children.nested_message(), Some(node));
    }

    #[test]
    fn test_unknown_type_rejected() {
        let yaml = r#"
package: t
messages:
  - name: A
    fields:
      - { name: b, type: message, type_name: B }
"#;
        let err = pool_from_yaml(yaml).unwrap_err();
        assert!(matches!(err, DescriptorFileError::Descriptor(_)), "{err}");
    }

    #[test]
    fn test_duplicate_field_name_rejected() {
        let yaml = r#"
package: t
messages:
  - name: A
    fields:
      - { name: a, type: bool }
      - { name: a, type: int32 }
"#;
        let err = pool_from_yaml(yaml).unwrap_err();
        assert!(matches!(err, DescriptorFileError::Descriptor(_)), "{err}");
    }

    #[test]
    fn test_duplicate_field_number_rejected() {
        let yaml = r#"
package: t
messages:
  - name: A
    fields:
      - { name: a, type: bool }
      - { name: b, number: 1, type: int32 }
"#;
        assert!(matches!(
            pool_from_yaml(yaml).unwrap_err(),
            DescriptorFileError::Descriptor(_)
        ));
    }

    #[test]
    fn test_message_field_requires_type_name() {
        let yaml = "package: t\nmessages:\n  - name: A\n    fields:\n      - { name: b, type: message }\n";
        assert!(matches!(
            pool_from_yaml(yaml).unwrap_err(),
            DescriptorFileError::MissingTypeName { kind: "message", .. }
        ));
    }

    #[test]
    fn test_scalar_with_type_name_rejected() {
        let yaml = r#"
package: t
messages:
  - name: A
  - name: B
    fields:
      - { name: a, type: int32, type_name: A }
"#;
        assert!(matches!(
            pool_from_yaml(yaml).unwrap_err(),
            DescriptorFileError::UnexpectedTypeName { .. }
        ));
    }

    #[test]
    fn test_dotted_message_name_rejected() {
        let yaml = "package: t\nmessages:\n  - name: t.A\n";
        assert!(matches!(
            pool_from_yaml(yaml).unwrap_err(),
            DescriptorFileError::InvalidName(name) if name == "t.A"
        ));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let yaml = "messages:\n  - name: A\n    colour: red\n";
        assert!(matches!(
            pool_from_yaml(yaml).unwrap_err(),
            DescriptorFileError::Yaml(_)
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = load_pool("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, DescriptorFileError::Io { .. }));
    }

    #[test]
    fn test_load_binary_descriptor_set() {
        let file = DescriptorFile::from_yaml_str(SAMPLE)
            .unwrap()
            .to_file_descriptor_proto("t.proto")
            .unwrap();
        let set = prost_types::FileDescriptorSet { file: vec![file] };
        let path = std::env::temp_dir().join(format!("jpc-pool-{}.binpb", std::process::id()));
        std::fs::write(&path, set.encode_to_vec()).unwrap();
        let pool = load_pool(&path);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(message_names(&pool.unwrap()), vec!["t.Outer", "t.Inner"]);
    }
}
