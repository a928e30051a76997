use mongodb::bson::Bson;
use num::traits::NumCast;
use polars::export::arrow::types::NativeType;
use polars::prelude::*;

use crate::conversion::Wrap;

/// One builder per column of the union schema, keyed by field name.
pub(crate) fn init_buffers<'a>(
    schema: &Schema,
    capacity: usize,
) -> PolarsResult<Vec<(String, Buffer<'a>)>> {
    schema
        .iter()
        .map(|(name, dtype)| {
            let builder = match dtype {
                DataType::Boolean => Buffer::Boolean(BooleanChunkedBuilder::new(name, capacity)),
                DataType::Int32 => Buffer::Int32(PrimitiveChunkedBuilder::new(name, capacity)),
                DataType::Int64 => Buffer::Int64(PrimitiveChunkedBuilder::new(name, capacity)),
                DataType::Float64 => {
                    Buffer::Float64(PrimitiveChunkedBuilder::new(name, capacity))
                }
                DataType::Utf8 => {
                    Buffer::Utf8(Utf8ChunkedBuilder::new(name, capacity, capacity * 5))
                }
                DataType::Datetime(_, _) => {
                    Buffer::Datetime(PrimitiveChunkedBuilder::new(name, capacity))
                }
                // Lists, structs and all-null columns go through AnyValue.
                _ => Buffer::Untyped(Vec::with_capacity(capacity), name.to_string()),
            };
            Ok((name.to_string(), builder))
        })
        .collect()
}

/// A partially built column.
///
/// Documents that lack the field, or hold a value that does not fit the
/// coerced column type, contribute a null cell.
#[allow(clippy::large_enum_variant)]
pub(crate) enum Buffer<'a> {
    Boolean(BooleanChunkedBuilder),
    Int32(PrimitiveChunkedBuilder<Int32Type>),
    Int64(PrimitiveChunkedBuilder<Int64Type>),
    Float64(PrimitiveChunkedBuilder<Float64Type>),
    Utf8(Utf8ChunkedBuilder),
    Datetime(PrimitiveChunkedBuilder<Int64Type>),
    Untyped(Vec<AnyValue<'a>>, String),
}

impl<'a> Buffer<'a> {
    pub(crate) fn add(&mut self, value: &Bson) -> PolarsResult<()> {
        match self {
            Buffer::Boolean(buf) => match value {
                Bson::Boolean(v) => buf.append_value(*v),
                _ => buf.append_null(),
            },
            Buffer::Int32(buf) => buf.append_option(cast_numeric::<i32>(value)),
            Buffer::Int64(buf) => buf.append_option(cast_numeric::<i64>(value)),
            Buffer::Float64(buf) => buf.append_option(cast_numeric::<f64>(value)),
            Buffer::Utf8(buf) => match utf8_repr(value) {
                Some(repr) => buf.append_value(repr),
                None => buf.append_null(),
            },
            Buffer::Datetime(buf) => buf.append_option(cast_datetime::<i64>(value)),
            Buffer::Untyped(buf, _) => {
                let av: Wrap<AnyValue> = value.into();
                buf.push(av.0);
            }
        }
        Ok(())
    }

    pub(crate) fn add_null(&mut self) {
        match self {
            Buffer::Boolean(buf) => buf.append_null(),
            Buffer::Int32(buf) => buf.append_null(),
            Buffer::Int64(buf) => buf.append_null(),
            Buffer::Float64(buf) => buf.append_null(),
            Buffer::Utf8(buf) => buf.append_null(),
            Buffer::Datetime(buf) => buf.append_null(),
            Buffer::Untyped(buf, _) => buf.push(AnyValue::Null),
        }
    }

    pub(crate) fn into_series(self) -> PolarsResult<Series> {
        let series = match self {
            Buffer::Boolean(buf) => buf.finish().into_series(),
            Buffer::Int32(buf) => buf.finish().into_series(),
            Buffer::Int64(buf) => buf.finish().into_series(),
            Buffer::Float64(buf) => buf.finish().into_series(),
            Buffer::Utf8(buf) => buf.finish().into_series(),
            Buffer::Datetime(buf) => buf
                .finish()
                .into_series()
                .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?,
            Buffer::Untyped(values, name) => Series::new(&name, values),
        };
        Ok(series)
    }
}

fn cast_numeric<T: NativeType + NumCast>(value: &Bson) -> Option<T> {
    match value {
        Bson::Double(v) => num::traits::cast(*v),
        Bson::Int32(v) => num::traits::cast(*v),
        Bson::Int64(v) => num::traits::cast(*v),
        Bson::Boolean(v) => num::traits::cast(*v as i32),
        _ => None,
    }
}

fn cast_datetime<T: NativeType + NumCast>(value: &Bson) -> Option<T> {
    match value {
        Bson::DateTime(dt) => num::traits::cast(dt.timestamp_millis()),
        other => cast_numeric(other),
    }
}

/// Mixed columns coerce to utf8; keep scalar values readable there instead of
/// nulling them out.
fn utf8_repr(value: &Bson) -> Option<String> {
    match value {
        Bson::String(v) => Some(v.clone()),
        Bson::Symbol(v) => Some(v.clone()),
        Bson::ObjectId(oid) => Some(oid.to_hex()),
        Bson::RegularExpression(regex) => Some(regex.to_string()),
        Bson::JavaScriptCode(code) => Some(code.clone()),
        Bson::Decimal128(v) => Some(v.to_string()),
        Bson::Timestamp(ts) => Some(format!("{:?}", ts)),
        Bson::Document(doc) => Some(doc.to_string()),
        Bson::Array(values) => Some(format!("{:?}", values)),
        Bson::Boolean(v) => Some(v.to_string()),
        Bson::Int32(v) => Some(v.to_string()),
        Bson::Int64(v) => Some(v.to_string()),
        Bson::Double(v) => Some(v.to_string()),
        _ => None,
    }
}
