//! # Dynamic Messages
//!
//! [`ReflectMessage`] for `prost-reflect`'s [`DynamicMessage`], the message
//! the schema engine renders into unless a caller plugs in another message
//! system. Every write goes through `Value::is_valid_for_field` first, so a
//! refused value comes back as a [`ReflectError`] instead of reaching
//! `DynamicMessage::set_field`.
//!
//! ## Unset vs. Zero
//!
//! Descriptor files are proto2, so singular fields carry presence.
//! `DynamicMessage::has_field` tells an unset field from one holding a zero
//! value; `DynamicMessage::get_field` does not, reading an unset field as
//! its default the way generated protobuf accessors do.

use prost_reflect::{
    DynamicMessage, FieldDescriptor, Kind, MessageDescriptor, SerializeOptions,
    Value as ProtoValue,
};

use crate::error::ReflectError;
use crate::reflect::{ReflectMessage, RepeatedField, Value};

/// Convert to `prost-reflect`'s value type.
pub fn to_proto_value(value: Value<DynamicMessage>) -> ProtoValue {
    match value {
        Value::Bool(v) => ProtoValue::Bool(v),
        Value::Int32(v) => ProtoValue::I32(v),
        Value::Int64(v) => ProtoValue::I64(v),
        Value::UInt32(v) => ProtoValue::U32(v),
        Value::UInt64(v) => ProtoValue::U64(v),
        Value::Double(v) => ProtoValue::F64(v),
        Value::Float(v) => ProtoValue::F32(v),
        Value::String(v) => ProtoValue::String(v),
        Value::Enum(v) => ProtoValue::EnumNumber(v),
        Value::Message(m) => ProtoValue::Message(m),
    }
}

/// Kind of a refused value, for [`ReflectError::InvalidValue`].
fn describe(value: &ProtoValue) -> String {
    let kind = match value {
        ProtoValue::Bool(_) => "bool",
        ProtoValue::I32(_) => "int32",
        ProtoValue::I64(_) => "int64",
        ProtoValue::U32(_) => "uint32",
        ProtoValue::U64(_) => "uint64",
        ProtoValue::F32(_) => "float",
        ProtoValue::F64(_) => "double",
        ProtoValue::String(_) => "string",
        ProtoValue::Bytes(_) => "bytes",
        ProtoValue::EnumNumber(_) => "enum",
        ProtoValue::Message(m) => return m.descriptor().full_name().to_string(),
        ProtoValue::List(_) => "list",
        ProtoValue::Map(_) => "map",
    };
    kind.to_string()
}

fn invalid(field: &FieldDescriptor, value: &ProtoValue) -> ReflectError {
    ReflectError::InvalidValue {
        field: field.full_name().to_string(),
        value: describe(value),
    }
}

fn check_owner(message: &DynamicMessage, field: &FieldDescriptor) -> Result<(), ReflectError> {
    let descriptor = message.descriptor();
    if field.parent_message() == &descriptor {
        Ok(())
    } else {
        Err(ReflectError::ForeignField {
            message: descriptor.full_name().to_string(),
            field: field.full_name().to_string(),
        })
    }
}

fn put(
    message: &mut DynamicMessage,
    field: &FieldDescriptor,
    value: ProtoValue,
) -> Result<(), ReflectError> {
    check_owner(message, field)?;
    if !value.is_valid_for_field(field) {
        return Err(invalid(field, &value));
    }
    message.set_field(field, value);
    Ok(())
}

/// The list behind a repeated field of a [`DynamicMessage`].
#[derive(Debug)]
pub struct ListField<'a> {
    field: FieldDescriptor,
    kind: Kind,
    values: &'a mut Vec<ProtoValue>,
}

impl RepeatedField<DynamicMessage> for ListField<'_> {
    fn len(&self) -> usize {
        self.values.len()
    }

    fn clear(&mut self) {
        self.values.clear();
    }

    fn push(&mut self, value: Value<DynamicMessage>) -> Result<(), ReflectError> {
        let value = to_proto_value(value);
        if !value.is_valid(&self.kind) {
            return Err(invalid(&self.field, &value));
        }
        self.values.push(value);
        Ok(())
    }
}

impl ReflectMessage for DynamicMessage {
    type Repeated<'a> = ListField<'a>;

    fn new(descriptor: &MessageDescriptor) -> Self {
        DynamicMessage::new(descriptor.clone())
    }

    fn descriptor(&self) -> MessageDescriptor {
        prost_reflect::ReflectMessage::descriptor(self)
    }

    fn set_bool(&mut self, field: &FieldDescriptor, value: bool) -> Result<(), ReflectError> {
        put(self, field, ProtoValue::Bool(value))
    }

    fn set_int32(&mut self, field: &FieldDescriptor, value: i32) -> Result<(), ReflectError> {
        put(self, field, ProtoValue::I32(value))
    }

    fn set_int64(&mut self, field: &FieldDescriptor, value: i64) -> Result<(), ReflectError> {
        put(self, field, ProtoValue::I64(value))
    }

    fn set_uint32(&mut self, field: &FieldDescriptor, value: u32) -> Result<(), ReflectError> {
        put(self, field, ProtoValue::U32(value))
    }

    fn set_uint64(&mut self, field: &FieldDescriptor, value: u64) -> Result<(), ReflectError> {
        put(self, field, ProtoValue::U64(value))
    }

    fn set_double(&mut self, field: &FieldDescriptor, value: f64) -> Result<(), ReflectError> {
        put(self, field, ProtoValue::F64(value))
    }

    fn set_float(&mut self, field: &FieldDescriptor, value: f32) -> Result<(), ReflectError> {
        put(self, field, ProtoValue::F32(value))
    }

    fn set_string(&mut self, field: &FieldDescriptor, value: String) -> Result<(), ReflectError> {
        put(self, field, ProtoValue::String(value))
    }

    fn set_enum(&mut self, field: &FieldDescriptor, number: i32) -> Result<(), ReflectError> {
        put(self, field, ProtoValue::EnumNumber(number))
    }

    fn mutable_message(&mut self, field: &FieldDescriptor) -> Result<&mut Self, ReflectError> {
        check_owner(self, field)?;
        if field.is_list() || !matches!(field.kind(), Kind::Message(_)) {
            return Err(ReflectError::InvalidValue {
                field: field.full_name().to_string(),
                value: "message".to_string(),
            });
        }
        self.get_field_mut(field)
            .as_message_mut()
            .ok_or_else(|| ReflectError::InvalidValue {
                field: field.full_name().to_string(),
                value: "message".to_string(),
            })
    }

    fn mutable_repeated(&mut self, field: &FieldDescriptor) -> Result<ListField<'_>, ReflectError> {
        check_owner(self, field)?;
        let not_a_list = || ReflectError::InvalidValue {
            field: field.full_name().to_string(),
            value: "list".to_string(),
        };
        if !field.is_list() {
            return Err(not_a_list());
        }
        let values = self.get_field_mut(field).as_list_mut().ok_or_else(not_a_list)?;
        Ok(ListField {
            field: field.clone(),
            kind: field.kind(),
            values,
        })
    }

    fn has_field(&self, field: &FieldDescriptor) -> bool {
        DynamicMessage::has_field(self, field)
    }

    fn clear_field(&mut self, field: &FieldDescriptor) {
        DynamicMessage::clear_field(self, field);
    }
}

/// JSON view of `message`: set fields only, under their `.proto` names,
/// with enums as numbers and 64-bit integers as JSON numbers.
pub fn to_json(message: &DynamicMessage) -> Result<serde_json::Value, serde_json::Error> {
    let options = SerializeOptions::new()
        .stringify_64_bit_integers(false)
        .use_enum_numbers(true)
        .use_proto_field_name(true);
    message.serialize_with_options(serde_json::value::Serializer, &options)
}
