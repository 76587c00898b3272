//! Scalar type inference and typed column construction
//!
//! Logged values arrive as [`serde_json::Value`]. Inference maps a single
//! value to its natural Arrow type; [`build_array`] turns a column worth of
//! optional values into an array of a previously inferred type.
//!
//! | Value                  | Arrow type               |
//! |------------------------|--------------------------|
//! | `null`                 | `Null`                   |
//! | `true` / `false`       | `Boolean`                |
//! | integer                | `Int64` (`UInt64` above `i64::MAX`) |
//! | other number           | `Float64`                |
//! | string                 | `Utf8`                   |
//! | array                  | `List<unified element>`  |
//! | object                 | `Struct<members>`        |

use std::sync::Arc;

use arrow::array::{
    new_null_array, Array, ArrayRef, BooleanArray, Float64Array, Int64Array, ListArray,
    StringArray, StructArray, UInt64Array,
};
use arrow::buffer::{NullBuffer, OffsetBuffer};
use arrow::datatypes::{DataType, Field, Fields};
use serde_json::Value;

use crate::{Error, Result};

/// Infer the Arrow type of a single logged value.
///
/// # Errors
/// Returns [`Error::TypeMismatch`] for arrays whose elements have no common type
pub fn infer_type(value: &Value) -> Result<DataType> {
    Ok(match value {
        Value::Null => DataType::Null,
        Value::Bool(_) => DataType::Boolean,
        Value::Number(number) => {
            if number.is_i64() {
                DataType::Int64
            } else if number.is_u64() {
                DataType::UInt64
            } else {
                DataType::Float64
            }
        }
        Value::String(_) => DataType::Utf8,
        Value::Array(items) => {
            let mut element = DataType::Null;
            for item in items {
                let item_type = infer_type(item)?;
                element = unify(&element, &item_type).ok_or_else(|| Error::TypeMismatch {
                    column: "<list element>".to_string(),
                    expected: element.to_string(),
                    found: item_type.to_string(),
                })?;
            }
            list_of(element)
        }
        Value::Object(members) => {
            let fields = members
                .iter()
                .map(|(name, member)| Ok(Field::new(name, infer_type(member)?, true)))
                .collect::<Result<Vec<_>>>()?;
            DataType::Struct(Fields::from(fields))
        }
    })
}

/// `List` of nullable `element`, matching what `ListBuilder` produces.
#[must_use]
pub fn list_of(element: DataType) -> DataType {
    DataType::List(Arc::new(Field::new_list_field(element, true)))
}

/// Common type of two values, if any.
///
/// `Null` gives way to anything and integers widen to `Float64`, also
/// inside lists.
pub(crate) fn unify(left: &DataType, right: &DataType) -> Option<DataType> {
    match (left, right) {
        (l, r) if l == r => Some(l.clone()),
        (DataType::Null, other) | (other, DataType::Null) => Some(other.clone()),
        (DataType::Int64 | DataType::UInt64 | DataType::Float64, DataType::Float64)
        | (DataType::Float64, DataType::Int64 | DataType::UInt64) => Some(DataType::Float64),
        (DataType::List(l), DataType::List(r)) => {
            unify(l.data_type(), r.data_type()).map(list_of)
        }
        _ => None,
    }
}

/// Build an array of `data_type` from one optional value per row.
///
/// `None` and JSON `null` both become Arrow nulls. Integers are accepted
/// in `Float64` columns; any other mismatch is an error naming `column`.
///
/// # Errors
/// Returns [`Error::TypeMismatch`] if a value does not fit `data_type`
pub fn build_array(column: &str, data_type: &DataType, values: &[Option<&Value>]) -> Result<ArrayRef> {
    let mismatch = |value: &Value| Error::TypeMismatch {
        column: column.to_string(),
        expected: data_type.to_string(),
        found: value.to_string(),
    };

    let array: ArrayRef = match data_type {
        DataType::Null => {
            if let Some(value) = values.iter().find_map(present) {
                return Err(mismatch(value));
            }
            new_null_array(data_type, values.len())
        }
        DataType::Boolean => Arc::new(
            values
                .iter()
                .map(|value| present(value).map(|v| v.as_bool().ok_or_else(|| mismatch(v))).transpose())
                .collect::<Result<BooleanArray>>()?,
        ),
        DataType::Int64 => Arc::new(
            values
                .iter()
                .map(|value| present(value).map(|v| v.as_i64().ok_or_else(|| mismatch(v))).transpose())
                .collect::<Result<Int64Array>>()?,
        ),
        DataType::UInt64 => Arc::new(
            values
                .iter()
                .map(|value| present(value).map(|v| v.as_u64().ok_or_else(|| mismatch(v))).transpose())
                .collect::<Result<UInt64Array>>()?,
        ),
        DataType::Float64 => Arc::new(
            values
                .iter()
                .map(|value| present(value).map(|v| v.as_f64().ok_or_else(|| mismatch(v))).transpose())
                .collect::<Result<Float64Array>>()?,
        ),
        DataType::Utf8 => Arc::new(
            values
                .iter()
                .map(|value| present(value).map(|v| v.as_str().ok_or_else(|| mismatch(v))).transpose())
                .collect::<Result<StringArray>>()?,
        ),
        DataType::List(element) => {
            let mut lengths = Vec::with_capacity(values.len());
            let mut validity = Vec::with_capacity(values.len());
            let mut children: Vec<Option<&Value>> = Vec::new();
            for value in values {
                match present(value) {
                    Some(Value::Array(items)) => {
                        lengths.push(items.len());
                        validity.push(true);
                        children.extend(items.iter().map(Some));
                    }
                    Some(other) => return Err(mismatch(other)),
                    None => {
                        lengths.push(0);
                        validity.push(false);
                    }
                }
            }
            let child = build_array(column, element.data_type(), &children)?;
            Arc::new(ListArray::try_new(
                element.clone(),
                OffsetBuffer::from_lengths(lengths),
                child,
                nulls(validity),
            )?)
        }
        DataType::Struct(fields) => {
            let mut validity = Vec::with_capacity(values.len());
            for value in values {
                match present(value) {
                    Some(Value::Object(_)) => validity.push(true),
                    Some(other) => return Err(mismatch(other)),
                    None => validity.push(false),
                }
            }
            let children = fields
                .iter()
                .map(|field| {
                    let member: Vec<Option<&Value>> = values
                        .iter()
                        .map(|value| present(value).and_then(|v| v.get(field.name())))
                        .collect();
                    build_array(column, field.data_type(), &member)
                })
                .collect::<Result<Vec<_>>>()?;
            if fields.is_empty() {
                // No children to carry the length, so it is set explicitly.
                Arc::new(StructArray::new_empty_fields(values.len(), nulls(validity)))
            } else {
                Arc::new(StructArray::try_new(fields.clone(), children, nulls(validity))?)
            }
        }
        other => {
            return Err(Error::TypeMismatch {
                column: column.to_string(),
                expected: "a JSON-compatible type".to_string(),
                found: other.to_string(),
            })
        }
    };

    debug_assert_eq!(array.len(), values.len());
    Ok(array)
}

/// The value, unless absent or JSON `null`.
fn present<'a>(value: &Option<&'a Value>) -> Option<&'a Value> {
    value.filter(|v| !v.is_null())
}

/// Validity buffer, omitted when every slot is valid.
fn nulls(validity: Vec<bool>) -> Option<NullBuffer> {
    if validity.iter().all(|valid| *valid) {
        None
    } else {
        Some(NullBuffer::from(validity))
    }
}
