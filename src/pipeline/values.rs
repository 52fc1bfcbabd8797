//! Column lookup and numeric value extraction shared by the analyzers

use polars::prelude::*;

use super::error::{EdaError, Result};

/// Look up a column by name, mapping absence to `ColumnNotFound`
pub fn lookup_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    df.column(name).map_err(|_| EdaError::column_not_found(name))
}

/// Whether a dtype can be analyzed as numbers (booleans count as 0/1)
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    dtype.is_primitive_numeric() || matches!(dtype, DataType::Boolean)
}

/// Extract a column as `f64` values, one per row.
///
/// Nulls and non-finite floats (NaN, +/-inf) both become `None`, so every
/// analyzer sees the same notion of "missing". A column holding no values
/// at all is entirely missing whatever its dtype; CSV readers type such a
/// column as string.
pub fn numeric_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = lookup_column(df, name)?;

    if matches!(column.dtype(), DataType::Null) || column.null_count() == column.len() {
        return Ok(vec![None; column.len()]);
    }

    if !is_numeric_dtype(column.dtype()) {
        return Err(EdaError::invalid_parameter(format!(
            "Column '{}' is not numeric (dtype {})",
            name,
            column.dtype()
        )));
    }

    let float_col = column.cast(&DataType::Float64)?;
    let values = float_col
        .f64()?
        .iter()
        .map(|v| v.filter(|x| x.is_finite()))
        .collect();

    Ok(values)
}
