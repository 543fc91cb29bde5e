//! Converts tabular data into nested JSON records.
//!
//! A grid is a list of rows of scalar cells. Header descriptors pick out
//! which cells are labels: a row descriptor takes labels from one row, a
//! column descriptor from one column. Every other cell is written under the
//! labels of the headers governing its row and column, outermost depth first.
//!
//! ```
//! use serde_json::json;
//! use table2json::{ConvertOptions, Grid, Preset, convert_table_data_to_json};
//!
//! let grid = Grid::from_json_value(json!([
//!     ["", "Tom", "Dick"],
//!     ["Age", 24, 32],
//!     ["Country", "NZ", "AU"],
//! ]))?;
//! let mut options = ConvertOptions::default().with_preset(Preset::RowColumn);
//! let entries = convert_table_data_to_json(&grid, &mut options)?;
//!
//! assert_eq!(
//!     entries.into_value(),
//!     json!({
//!         "Tom": { "Age": 24, "Country": "NZ" },
//!         "Dick": { "Age": 32, "Country": "AU" },
//!     })
//! );
//! # Ok::<(), table2json::ConvertError>(())
//! ```

mod allow;
mod cell;
mod error;
mod grid;
mod header;
mod options;
mod placement;

use serde_json::Value;

use crate::header::discover_headers;
use crate::placement::place_data;

pub use allow::{
    AllowError, Allowed, Candidate, accept_allowed_value, keep_allowed_values,
    require_allowed_value,
};
pub use cell::Cell;
pub use error::ConvertError;
pub use grid::Grid;
pub use header::{DataStart, GoverningHeaders, HeaderDescriptor, HeaderInstance, HeaderMap};
pub use options::{ConvertOptions, HeaderKind, HeaderSpec, HeadersReadyHook, Preset};
pub use placement::{Entries, Record};

/// Converts `grid` into nested records.
///
/// Headers are discovered first, then handed to the options' hook (if any)
/// for in-place edits, then every data cell is placed under the labels that
/// govern it.
///
/// # Errors
///
/// Fails with [`ConvertError::EmptyHeader`] when no label exists at depth 0
/// once the hook has run.
pub fn convert_table_data_to_json(
    grid: &Grid,
    options: &mut ConvertOptions<'_>,
) -> Result<Entries, ConvertError> {
    let descriptors = options.resolve_descriptors();
    let (mut headers, start) = discover_headers(grid, &descriptors);

    if let Some(hook) = options.on_headers_ready.as_mut() {
        hook(&mut headers);
    }

    place_data(grid, &headers, start)
}

/// Untyped entry point: validates `config` (see [`ConvertOptions::from_json`])
/// and converts a JSON array of rows.
///
/// # Errors
///
/// Fails on an invalid configuration, a table that is not a list of rows,
/// or an empty outermost header.
pub fn convert_json_table(table: Value, config: &Value) -> Result<Value, ConvertError> {
    let mut options = ConvertOptions::from_json(config)?;
    let grid = Grid::from_json_value(table)?;
    convert_table_data_to_json(&grid, &mut options).map(Entries::into_value)
}
