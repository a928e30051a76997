use mongodb::bson::Document;
use polars::frame::row::infer_schema;
use polars::prelude::*;

use crate::buffer::init_buffers;
use crate::conversion::Wrap;

/// Reserved per-document key; never part of a returned frame.
const ID_FIELD: &str = "_id";

/// Normalize a set of schema-less documents into a single frame.
///
/// Columns are the union of all field names across `docs`, in order of first
/// appearance, with the `_id` key excluded. A document missing a field
/// contributes a null cell in its row; a field whose type differs between
/// documents coerces the whole column to the wider type. An empty input
/// yields an empty frame.
pub fn documents_to_frame(docs: &[Document]) -> PolarsResult<DataFrame> {
    let schema = union_schema(docs);
    let mut buffers = init_buffers(&schema, docs.len())?;

    for doc in docs {
        for (name, buffer) in buffers.iter_mut() {
            match doc.get(name.as_str()) {
                Some(value) => buffer.add(value)?,
                None => buffer.add_null(),
            }
        }
    }

    DataFrame::new(
        buffers
            .into_iter()
            .map(|(_, buffer)| buffer.into_series())
            .collect::<PolarsResult<Vec<Series>>>()?,
    )
}

/// Union of all field names across `docs`, mapped to coerced polars dtypes.
fn union_schema(docs: &[Document]) -> Schema {
    let dtype_rows = docs.iter().map(|doc| {
        doc.iter()
            .filter(|(key, _)| key.as_str() != ID_FIELD)
            .map(|(key, value)| {
                let dtype: Wrap<DataType> = value.into();
                (key.clone(), dtype.0)
            })
            .collect::<Vec<(String, DataType)>>()
    });
    infer_schema(dtype_rows, docs.len())
}

#[cfg(test)]
mod tests {
    use mongodb::bson::{doc, oid::ObjectId};
    use polars::prelude::*;

    use super::documents_to_frame;

    #[test]
    fn uniform_documents_keep_their_field_set() {
        let docs = vec![
            doc! { "district": "Innere Stadt", "year": 2023, "residents": 16047 },
            doc! { "district": "Leopoldstadt", "year": 2023, "residents": 105848 },
        ];
        let df = documents_to_frame(&docs).unwrap();

        assert_eq!(df.shape(), (2, 3));
        assert_eq!(df.get_column_names(), &["district", "year", "residents"]);
    }

    #[test]
    fn differing_field_sets_union_with_null_cells() {
        let docs = vec![doc! { "x": 1, "y": 2 }, doc! { "x": 3, "z": 4 }];
        let df = documents_to_frame(&docs).unwrap();

        assert_eq!(df.get_column_names(), &["x", "y", "z"]);
        assert_eq!(df.column("x").unwrap().null_count(), 0);
        assert_eq!(df.column("y").unwrap().get(1), AnyValue::Null);
        assert_eq!(df.column("z").unwrap().get(0), AnyValue::Null);
    }

    #[test]
    fn identifier_field_is_stripped() {
        let docs = vec![
            doc! { "_id": ObjectId::new(), "year": 2020 },
            doc! { "_id": ObjectId::new(), "year": 2021 },
        ];
        let df = documents_to_frame(&docs).unwrap();

        assert_eq!(df.get_column_names(), &["year"]);
        assert_eq!(df.height(), 2);
    }

    #[test]
    fn empty_input_yields_empty_frame() {
        let df = documents_to_frame(&[]).unwrap();
        assert_eq!(df.shape(), (0, 0));
    }

    #[test]
    fn mixed_numeric_field_coerces_to_float() {
        let docs = vec![doc! { "rate": 9 }, doc! { "rate": 9.6 }];
        let df = documents_to_frame(&docs).unwrap();

        let rate = df.column("rate").unwrap();
        assert_eq!(rate.dtype(), &DataType::Float64);
        assert_eq!(rate.get(0), AnyValue::Float64(9.0));
    }

    #[test]
    fn numbers_under_a_text_column_are_stringified() {
        let docs = vec![doc! { "code": "A-1" }, doc! { "code": 7 }];
        let df = documents_to_frame(&docs).unwrap();

        let code = df.column("code").unwrap();
        assert_eq!(code.dtype(), &DataType::Utf8);
        assert_eq!(code.get(1), AnyValue::Utf8("7"));
    }

    #[test]
    fn each_call_builds_a_fresh_frame() {
        let docs = vec![doc! { "year": 2024 }];
        let first = documents_to_frame(&docs).unwrap();
        let second = documents_to_frame(&docs).unwrap();

        assert!(first.frame_equal(&second));
    }
}
