//! Generic aggregations over a dataset's attribute table.

use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::{ChunkAgg, DataType, Float64Chunked, StringChunked};

use crate::{dataset::Dataset, error::{Result, SurveyError}};

/// Metres per kilometre.
pub const METRES_PER_KM: f64 = 1000.0;

/// Read `attribute` as a float column (nulls preserved).
fn numeric(dataset: &Dataset, attribute: &str) -> Result<Float64Chunked> {
    let column = dataset.column(attribute)?;
    let column = if column.dtype() != &DataType::Float64 {
        column.cast(&DataType::Float64)?
    } else {
        column.clone()
    };
    Ok(column.f64()?.clone())
}

/// Read `attribute` as a string column (nulls preserved).
fn categorical(dataset: &Dataset, attribute: &str) -> Result<StringChunked> {
    let column = dataset.column(attribute)?;
    let column = if column.dtype() != &DataType::String {
        column.cast(&DataType::String)?
    } else {
        column.clone()
    };
    Ok(column.str()?.clone())
}

/// Sum of a length attribute across all rows, in the attribute's own unit. Nulls count as zero.
pub fn total(dataset: &Dataset, attribute: &str) -> Result<f64> {
    Ok(numeric(dataset, attribute)?.sum().unwrap_or(0.0))
}

/// Sum of a length attribute in metres, converted to kilometres.
pub fn total_length_km(dataset: &Dataset, attribute: &str) -> Result<f64> {
    Ok(total(dataset, attribute)? / METRES_PER_KM)
}

/// `part / whole * 100`, refusing a zero whole.
pub fn percentage(part: f64, whole: f64, whole_name: &str) -> Result<f64> {
    if whole == 0.0 || !whole.is_finite() {
        return Err(SurveyError::EmptyDenominator(whole_name.to_string()))
    }
    Ok(part / whole * 100.0)
}

/// Total of `numerator.0`'s attribute as a percentage of `denominator.0`'s.
pub fn ratio(numerator: (&Dataset, &str), denominator: (&Dataset, &str)) -> Result<f64> {
    let (num, num_attr) = numerator;
    let (den, den_attr) = denominator;
    percentage(
        total(num, num_attr)?,
        total(den, den_attr)?,
        &format!("{}.{}", den.name(), den_attr),
    )
}

/// Number of rows, or of rows whose `attribute` exactly equals `value` when a filter is given.
pub fn count(dataset: &Dataset, filter: Option<(&str, &str)>) -> Result<usize> {
    match filter {
        None => Ok(dataset.len()),
        Some((attribute, value)) => {
            let cells = categorical(dataset, attribute)?;
            Ok((&cells).into_iter().filter(|cell| *cell == Some(value)).count())
        }
    }
}

/// Number of rows where `attribute` is not null.
pub fn count_present(dataset: &Dataset, attribute: &str) -> Result<usize> {
    let column = dataset.column(attribute)?;
    Ok(column.len() - column.null_count())
}

/// Distinct non-null values of `attribute`.
pub fn unique_values(dataset: &Dataset, attribute: &str) -> Result<BTreeSet<String>> {
    let cells = categorical(dataset, attribute)?;
    Ok((&cells).into_iter().flatten().map(str::to_string).collect())
}

/// Sum of `sum_attr` per distinct value of `group_attr`. Rows with a null group are skipped.
pub fn grouped_total(dataset: &Dataset, group_attr: &str, sum_attr: &str) -> Result<BTreeMap<String, f64>> {
    let groups = categorical(dataset, group_attr)?;
    let values = numeric(dataset, sum_attr)?;

    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for (group, value) in (&groups).into_iter().zip(&values) {
        if let Some(group) = group {
            *totals.entry(group.to_string()).or_default() += value.unwrap_or(0.0);
        }
    }
    Ok(totals)
}

/// Row count per distinct value of `attribute`.
pub fn grouped_count(dataset: &Dataset, attribute: &str) -> Result<BTreeMap<String, usize>> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    let cells = categorical(dataset, attribute)?;
    for value in (&cells).into_iter().flatten() {
        *counts.entry(value.to_string()).or_default() += 1;
    }
    Ok(counts)
}
