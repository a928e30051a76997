use mongodb::bson::{Bson, Document};
use polars::frame::row::coerce_data_type;
use polars::prelude::*;

/// Newtype that lets us hang bson -> polars conversions on foreign types.
#[repr(transparent)]
pub(crate) struct Wrap<T>(pub T);

impl From<&Document> for Wrap<DataType> {
    fn from(doc: &Document) -> Self {
        let fields = doc
            .iter()
            .map(|(key, value)| {
                let dtype: Wrap<DataType> = value.into();
                Field::new(key, dtype.0)
            })
            .collect();
        Wrap(DataType::Struct(fields))
    }
}

impl From<&Bson> for Wrap<DataType> {
    fn from(value: &Bson) -> Self {
        let dtype = match value {
            Bson::Double(_) => DataType::Float64,
            Bson::String(_) => DataType::Utf8,
            Bson::Boolean(_) => DataType::Boolean,
            Bson::Int32(_) => DataType::Int32,
            Bson::Int64(_) => DataType::Int64,
            Bson::Null => DataType::Null,
            Bson::DateTime(_) => DataType::Datetime(TimeUnit::Milliseconds, None),
            Bson::Document(doc) => return doc.into(),
            Bson::Array(values) => {
                let dtypes: Vec<DataType> = values
                    .iter()
                    .map(|value| Wrap::<DataType>::from(value).0)
                    .collect();
                let inner = if dtypes.is_empty() {
                    DataType::Null
                } else {
                    coerce_data_type(&dtypes)
                };
                DataType::List(Box::new(inner))
            }
            Bson::ObjectId(_) | Bson::Symbol(_) | Bson::Timestamp(_) => DataType::Utf8,
            Bson::Undefined => DataType::Unknown,
            _ => DataType::Utf8,
        };
        Wrap(dtype)
    }
}

impl<'a> From<&Bson> for Wrap<AnyValue<'a>> {
    fn from(value: &Bson) -> Self {
        let av = match value {
            Bson::Double(v) => AnyValue::Float64(*v),
            Bson::String(v) => AnyValue::Utf8Owned(v.clone()),
            Bson::Boolean(v) => AnyValue::Boolean(*v),
            Bson::Int32(v) => AnyValue::Int32(*v),
            Bson::Int64(v) => AnyValue::Int64(*v),
            Bson::Null | Bson::Undefined => AnyValue::Null,
            Bson::DateTime(dt) => {
                AnyValue::Datetime(dt.timestamp_millis(), TimeUnit::Milliseconds, &None)
            }
            Bson::Array(values) => {
                let values: Vec<AnyValue> = values
                    .iter()
                    .map(|value| Wrap::<AnyValue>::from(value).0)
                    .collect();
                AnyValue::List(Series::new("", values))
            }
            Bson::Binary(bin) => AnyValue::List(Series::new("", &bin.bytes)),
            Bson::Document(doc) => {
                let (values, fields): (Vec<AnyValue>, Vec<Field>) = doc
                    .iter()
                    .map(|(key, value)| {
                        let dtype: Wrap<DataType> = value.into();
                        let av: Wrap<AnyValue> = value.into();
                        (av.0, Field::new(key, dtype.0))
                    })
                    .unzip();
                AnyValue::StructOwned(Box::new((values, fields)))
            }
            Bson::ObjectId(oid) => AnyValue::Utf8Owned(oid.to_hex()),
            Bson::Symbol(v) => AnyValue::Utf8Owned(v.clone()),
            other => AnyValue::Utf8Owned(format!("{:?}", other)),
        };
        Wrap(av)
    }
}

#[cfg(test)]
mod tests {
    use mongodb::bson::{doc, Bson};
    use polars::prelude::*;

    use super::Wrap;

    #[test]
    fn scalar_dtypes() {
        let dtype = |value: &Bson| Wrap::<DataType>::from(value).0;

        assert_eq!(dtype(&Bson::Int32(1)), DataType::Int32);
        assert_eq!(dtype(&Bson::Double(1.5)), DataType::Float64);
        assert_eq!(dtype(&Bson::Boolean(true)), DataType::Boolean);
        assert_eq!(dtype(&Bson::String("x".to_string())), DataType::Utf8);
    }

    #[test]
    fn nested_document_maps_to_struct() {
        let value = Bson::Document(doc! { "city": "Wien", "zip": 1010 });
        let dtype = Wrap::<DataType>::from(&value).0;

        assert_eq!(
            dtype,
            DataType::Struct(vec![
                Field::new("city", DataType::Utf8),
                Field::new("zip", DataType::Int32),
            ])
        );
    }

    #[test]
    fn array_coerces_its_element_types() {
        let value = Bson::Array(vec![Bson::Int32(1), Bson::Double(2.5)]);
        let dtype = Wrap::<DataType>::from(&value).0;

        assert_eq!(dtype, DataType::List(Box::new(DataType::Float64)));
    }
}
