use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::cell::Cell;
use crate::error::ConvertError;
use crate::grid::Grid;
use crate::header::{DataStart, HeaderInstance, HeaderMap};
use crate::options::HeaderKind;

pub type Record = Map<String, Value>;

/// Conversion output: one record per entry when every depth shares an axis,
/// or a single record keyed by the outer labels when row and column headers
/// are mixed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Entries {
    List(Vec<Record>),
    Single(Record),
}

impl Entries {
    /// Records in a list, or top-level keys of a single record.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::List(records) => records.len(),
            Self::Single(record) => record.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Record]> {
        match self {
            Self::List(records) => Some(records),
            Self::Single(_) => None,
        }
    }

    #[must_use]
    pub fn as_single(&self) -> Option<&Record> {
        match self {
            Self::List(_) => None,
            Self::Single(record) => Some(record),
        }
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::List(records) => Value::Array(records.into_iter().map(Value::Object).collect()),
            Self::Single(record) => Value::Object(record),
        }
    }
}

/// Axis along which entries are produced, taken from the first depth-0 label.
pub(crate) fn entry_axis(headers: &HeaderMap) -> Result<HeaderKind, ConvertError> {
    headers
        .depth(0)
        .first()
        .map(HeaderInstance::kind)
        .ok_or(ConvertError::EmptyHeader { depth: 0 })
}

/// True when the first labels of the populated depths disagree on kind.
pub(crate) fn has_perpendicular_axis(headers: &HeaderMap) -> bool {
    let mut kinds = headers
        .iter()
        .filter_map(|(_, instances)| instances.first())
        .map(HeaderInstance::kind);

    let Some(first) = kinds.next() else {
        return false;
    };
    kinds.any(|kind| kind != first)
}

pub(crate) fn place_data(grid: &Grid, headers: &HeaderMap, start: DataStart) -> Result<Entries, ConvertError> {
    let axis = entry_axis(headers)?;
    let perpendicular = has_perpendicular_axis(headers);

    let rows = start.row..grid.row_count();
    let columns = start.column..grid.max_columns();
    let (outer, inner) = match axis {
        HeaderKind::Row => (rows, columns),
        HeaderKind::Column => (columns, rows),
    };
    debug!(%axis, perpendicular, "placing data cells");

    let mut shared = Record::new();
    let mut records = Vec::new();
    for i in outer {
        let mut entry = Record::new();
        let target = if perpendicular { &mut shared } else { &mut entry };

        for j in inner.clone() {
            let (row, column) = match axis {
                HeaderKind::Row => (i, j),
                HeaderKind::Column => (j, i),
            };
            place_cell(grid, headers, row, column, target);
        }

        if !entry.is_empty() {
            records.push(entry);
        }
    }

    Ok(if perpendicular {
        Entries::Single(shared)
    } else {
        Entries::List(records)
    })
}

fn place_cell(grid: &Grid, headers: &HeaderMap, row: usize, column: usize, record: &mut Record) {
    let cell = grid.cell(row, column);
    let governing = headers.governing(column, row);

    // Only a text cell spelling a governing label exactly is a header met again.
    if let Cell::Text(text) = cell
        && governing
            .iter()
            .flat_map(|group| group.instances.iter())
            .any(|instance| instance.label == *text)
    {
        trace!(row, column, label = %text, "skipping header label met as data");
        return;
    }

    let Some(value) = cell.to_value() else {
        return;
    };

    // The last covering instance at each depth names that level.
    let path = governing
        .iter()
        .filter_map(|group| group.instances.last())
        .map(|instance| instance.label.as_str())
        .collect::<Vec<_>>();
    write_path(record, &path, value);
}

/// Sets `value` under nested keys, replacing any non-object met on the way.
fn write_path(record: &mut Record, path: &[&str], value: Value) {
    match path {
        [] => {}
        [leaf] => {
            record.insert((*leaf).to_string(), value);
        }
        [branch, rest @ ..] => {
            let slot = record
                .entry((*branch).to_string())
                .or_insert_with(|| Value::Object(Record::new()));
            if !slot.is_object() {
                *slot = Value::Object(Record::new());
            }
            if let Value::Object(child) = slot {
                write_path(child, rest, value);
            }
        }
    }
}
