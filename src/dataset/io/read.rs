use std::{collections::BTreeMap, path::Path};

use log::{debug, info};
use polars::{frame::DataFrame, prelude::Column};
use shapefile::dbase::{FieldValue, Record};

use crate::{common, dataset::{Dataset, GeometryKind}, error::{Result, SurveyError}};

/// Value of one dBase field, reduced to the two column types the tables use.
enum Cell {
    Text(Option<String>),
    Number(Option<f64>),
}

impl From<FieldValue> for Cell {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::Character(s) => Cell::Text(s.map(|s| s.trim().to_string())),
            FieldValue::Memo(s) => Cell::Text(Some(s)),
            FieldValue::Logical(b) => Cell::Text(b.map(|b| b.to_string())),
            FieldValue::Numeric(n) => Cell::Number(n),
            FieldValue::Float(f) => Cell::Number(f.map(f64::from)),
            FieldValue::Integer(i) => Cell::Number(Some(i as f64)),
            FieldValue::Double(d) => Cell::Number(Some(d)),
            FieldValue::Currency(c) => Cell::Number(Some(c)),
            FieldValue::Date(d) => Cell::Text(d.map(|d| format!("{:04}-{:02}-{:02}", d.year(), d.month(), d.day()))),
            other => Cell::Text(Some(format!("{other:?}"))),
        }
    }
}

/// Convert shapefile records into a DataFrame with a leading `FID` row index.
/// Attribute columns are ordered by field name; a field is numeric only if every
/// non-null value in it is numeric.
fn records_to_dataframe(records: Vec<Record>) -> Result<DataFrame> {
    let height = records.len();
    let mut fields: BTreeMap<String, Vec<Cell>> = BTreeMap::new();

    for (row, record) in records.into_iter().enumerate() {
        for (field, value) in record {
            let cells = fields.entry(field).or_insert_with(|| Vec::with_capacity(height));
            // Fields absent from earlier records are padded with nulls.
            while cells.len() < row { cells.push(Cell::Text(None)) }
            cells.push(Cell::from(value));
        }
    }

    let mut columns = vec![Column::new("FID".into(), (0..height as u32).collect::<Vec<_>>())];
    for (name, mut cells) in fields {
        while cells.len() < height { cells.push(Cell::Text(None)) }

        let numeric = cells.iter().all(|cell| matches!(cell, Cell::Number(_) | Cell::Text(None)));
        let column = if numeric {
            let values = cells.into_iter()
                .map(|cell| match cell { Cell::Number(n) => n, Cell::Text(_) => None })
                .collect::<Vec<Option<f64>>>();
            Column::new(name.as_str().into(), values)
        } else {
            let values = cells.into_iter()
                .map(|cell| match cell {
                    Cell::Text(s) => s,
                    Cell::Number(n) => n.map(|n| n.to_string()),
                })
                .collect::<Vec<Option<String>>>();
            Column::new(name.as_str().into(), values)
        };
        columns.push(column);
    }

    Ok(DataFrame::new(columns)?)
}

impl Dataset {
    /// Load a shapefile at `path` into memory: attributes as a table, shapes as geo geometries.
    pub fn read_shapefile(name: &str, path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(SurveyError::DatasetNotFound(path.to_path_buf()))
        }

        let (shape_type, items) = common::read_shapefile(path)
            .map_err(|e| SurveyError::malformed(path, format!("{e:#}")))?;

        let kind = GeometryKind::from_shape_type(shape_type)
            .ok_or_else(|| SurveyError::malformed(path, format!("unsupported shape type {shape_type:?}")))?;

        let (shapes, records): (Vec<_>, Vec<_>) = items.into_iter().unzip();

        let geoms = shapes.into_iter()
            .map(common::shape_to_geometry)
            .collect::<anyhow::Result<Vec<_>>>()
            .map_err(|e| SurveyError::malformed(path, format!("{e:#}")))?;

        let data = records_to_dataframe(records)?;
        debug!("[dataset::read] {name}: columns {:?}", data.get_column_names());

        let dataset = Self::new(name, kind, data, geoms)?.with_path(path);
        info!("[dataset::read] loaded {name} ({} {} features) from {}", dataset.len(), kind, path.display());
        Ok(dataset)
    }
}
