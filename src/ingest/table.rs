use std::io::{self, Cursor, Read, Seek};

use arrow::array::{
    Array, ArrayRef, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
    LargeStringArray, StringArray, UInt32Array, UInt64Array,
};
use arrow::datatypes::DataType;
use arrow::ipc::reader::FileReader;
use arrow::util::display::array_value_to_string;
use serde_json::Value;

use super::RawRow;

/// Reads an Arrow IPC file into ordered row maps, preserving column order.
pub fn read_table_bytes(bytes: &[u8]) -> io::Result<Vec<RawRow>> {
    read_table_from(Cursor::new(bytes))
}

pub fn read_table_from<R: Read + Seek>(reader: R) -> io::Result<Vec<RawRow>> {
    let reader = FileReader::try_new(reader, None).map_err(io::Error::other)?;
    let schema = reader.schema();

    let mut rows = Vec::new();
    for batch in reader {
        let batch = batch.map_err(io::Error::other)?;
        for row_idx in 0..batch.num_rows() {
            let mut row = RawRow::with_capacity(batch.num_columns());
            for (col_idx, field) in schema.fields().iter().enumerate() {
                let value = cell_to_value(batch.column(col_idx), row_idx)?;
                row.insert(field.name().clone(), value);
            }
            rows.push(row);
        }
    }

    Ok(rows)
}

/// Maps one Arrow cell to a JSON-like value. Common scalar types keep their
/// type; anything else falls back to Arrow's string rendering.
fn cell_to_value(column: &ArrayRef, row: usize) -> io::Result<Value> {
    if column.is_null(row) {
        return Ok(Value::Null);
    }

    let value = match column.data_type() {
        DataType::Utf8 => {
            let array = column
                .as_any()
                .downcast_ref::<StringArray>()
                .ok_or_else(|| downcast_error("Utf8"))?;
            Value::String(array.value(row).to_string())
        }
        DataType::LargeUtf8 => {
            let array = column
                .as_any()
                .downcast_ref::<LargeStringArray>()
                .ok_or_else(|| downcast_error("LargeUtf8"))?;
            Value::String(array.value(row).to_string())
        }
        DataType::Int32 => {
            let array = column
                .as_any()
                .downcast_ref::<Int32Array>()
                .ok_or_else(|| downcast_error("Int32"))?;
            Value::from(array.value(row))
        }
        DataType::Int64 => {
            let array = column
                .as_any()
                .downcast_ref::<Int64Array>()
                .ok_or_else(|| downcast_error("Int64"))?;
            Value::from(array.value(row))
        }
        DataType::UInt32 => {
            let array = column
                .as_any()
                .downcast_ref::<UInt32Array>()
                .ok_or_else(|| downcast_error("UInt32"))?;
            Value::from(array.value(row))
        }
        DataType::UInt64 => {
            let array = column
                .as_any()
                .downcast_ref::<UInt64Array>()
                .ok_or_else(|| downcast_error("UInt64"))?;
            Value::from(array.value(row))
        }
        DataType::Float32 => {
            let array = column
                .as_any()
                .downcast_ref::<Float32Array>()
                .ok_or_else(|| downcast_error("Float32"))?;
            Value::from(array.value(row) as f64)
        }
        DataType::Float64 => {
            let array = column
                .as_any()
                .downcast_ref::<Float64Array>()
                .ok_or_else(|| downcast_error("Float64"))?;
            Value::from(array.value(row))
        }
        DataType::Boolean => {
            let array = column
                .as_any()
                .downcast_ref::<BooleanArray>()
                .ok_or_else(|| downcast_error("Boolean"))?;
            Value::Bool(array.value(row))
        }
        _ => {
            let rendered = array_value_to_string(column, row).map_err(io::Error::other)?;
            Value::String(rendered)
        }
    };

    Ok(value)
}

fn downcast_error(type_name: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("column declared {type_name} but the array does not match"),
    )
}
