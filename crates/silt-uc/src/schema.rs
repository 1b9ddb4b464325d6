//! Arrow schema to Unity Catalog column conversion.

use arrow::datatypes::{DataType, Field, Schema};

use crate::client::ColumnInfo;

/// Converts an Arrow schema to the catalog's column payloads.
///
/// Types the catalog has no counterpart for degrade to `STRING` instead of
/// failing the materialization; the physical Delta schema remains
/// authoritative for readers.
#[must_use]
pub fn columns_from_schema(schema: &Schema) -> Vec<ColumnInfo> {
    schema
        .fields()
        .iter()
        .enumerate()
        .map(|(position, field)| column_from_field(position, field))
        .collect()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn column_from_field(position: usize, field: &Field) -> ColumnInfo {
    let (type_name, type_text) = unity_type(field.data_type());
    let type_json = serde_json::json!({
        "name": field.name(),
        "type": type_text,
        "nullable": field.is_nullable(),
        "metadata": {},
    })
    .to_string();

    ColumnInfo {
        name: field.name().clone(),
        type_text,
        type_json,
        type_name,
        position: position as i32,
        nullable: field.is_nullable(),
        comment: None,
    }
}

fn unity_type(data_type: &DataType) -> (String, String) {
    let (name, text) = match data_type {
        DataType::Boolean => ("BOOLEAN", "boolean".to_string()),
        DataType::Int8 => ("BYTE", "byte".to_string()),
        DataType::Int16 | DataType::UInt8 => ("SHORT", "short".to_string()),
        DataType::Int32 | DataType::UInt16 => ("INT", "int".to_string()),
        DataType::Int64 | DataType::UInt32 | DataType::UInt64 => ("LONG", "long".to_string()),
        DataType::Float16 | DataType::Float32 => ("FLOAT", "float".to_string()),
        DataType::Float64 => ("DOUBLE", "double".to_string()),
        DataType::Date32 | DataType::Date64 => ("DATE", "date".to_string()),
        DataType::Timestamp(_, _) => ("TIMESTAMP", "timestamp".to_string()),
        DataType::Binary | DataType::LargeBinary | DataType::FixedSizeBinary(_) => {
            ("BINARY", "binary".to_string())
        }
        DataType::Decimal128(precision, scale) | DataType::Decimal256(precision, scale) => {
            ("DECIMAL", format!("decimal({precision},{scale})"))
        }
        _ => ("STRING", "string".to_string()),
    };
    (name.to_string(), text)
}
