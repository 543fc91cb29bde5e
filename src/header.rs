use serde::Serialize;
use tracing::{debug, warn};

use crate::grid::Grid;
use crate::options::HeaderKind;

/// A resolved header rule. A row descriptor matches its anchor row from the
/// anchor column rightwards; a column descriptor matches its anchor column
/// from the anchor row downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeaderDescriptor {
    pub kind: HeaderKind,
    pub anchor_column: usize,
    pub anchor_row: usize,
    pub depth: usize,
}

impl HeaderDescriptor {
    #[must_use]
    pub fn matches(&self, column: usize, row: usize) -> bool {
        match self.kind {
            HeaderKind::Row => column >= self.anchor_column && row == self.anchor_row,
            HeaderKind::Column => column == self.anchor_column && row >= self.anchor_row,
        }
    }
}

/// A header label found in the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderInstance {
    pub descriptor: HeaderDescriptor,
    pub label: String,
    pub column: usize,
    pub row: usize,
    pub width: usize,
    pub height: usize,
}

impl HeaderInstance {
    #[must_use]
    pub fn new(descriptor: HeaderDescriptor, label: impl Into<String>, column: usize, row: usize) -> Self {
        Self {
            descriptor,
            label: label.into(),
            column,
            row,
            width: 1,
            height: 1,
        }
    }

    #[must_use]
    pub fn kind(&self) -> HeaderKind {
        self.descriptor.kind
    }

    /// Row headers govern the columns they span, column headers the rows.
    #[must_use]
    pub fn covers(&self, column: usize, row: usize) -> bool {
        match self.kind() {
            HeaderKind::Row => (self.column..self.column + self.width).contains(&column),
            HeaderKind::Column => (self.row..self.row + self.height).contains(&row),
        }
    }
}

/// The instances at one depth that govern a given cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoverningHeaders<'a> {
    pub depth: usize,
    pub instances: Vec<&'a HeaderInstance>,
}

/// Header instances bucketed by depth, each bucket in scan order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HeaderMap {
    depths: Vec<Vec<HeaderInstance>>,
}

impl HeaderMap {
    #[must_use]
    pub fn with_depths(count: usize) -> Self {
        Self {
            depths: vec![Vec::new(); count],
        }
    }

    /// Number of depth buckets, including empty ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.depths.len()
    }

    /// True when no bucket holds an instance.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.depths.iter().all(Vec::is_empty)
    }

    #[must_use]
    pub fn depth(&self, depth: usize) -> &[HeaderInstance] {
        self.depths.get(depth).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Bucket for `depth`, created (with any missing buckets before it) on demand.
    pub fn depth_mut(&mut self, depth: usize) -> &mut Vec<HeaderInstance> {
        if self.depths.len() <= depth {
            self.depths.resize_with(depth + 1, Vec::new);
        }
        &mut self.depths[depth]
    }

    /// Appends to the bucket of the instance's descriptor depth.
    pub fn push(&mut self, instance: HeaderInstance) {
        self.depth_mut(instance.descriptor.depth).push(instance);
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &[HeaderInstance])> {
        self.depths
            .iter()
            .enumerate()
            .map(|(depth, instances)| (depth, instances.as_slice()))
    }

    pub fn instances_mut(&mut self) -> impl Iterator<Item = &mut HeaderInstance> {
        self.depths.iter_mut().flatten()
    }

    /// Instances covering `(column, row)`, grouped by ascending depth.
    /// Depths with no covering instance are left out.
    #[must_use]
    pub fn governing(&self, column: usize, row: usize) -> Vec<GoverningHeaders<'_>> {
        self.iter()
            .filter_map(|(depth, instances)| {
                let instances = instances
                    .iter()
                    .filter(|instance| instance.covers(column, row))
                    .collect::<Vec<_>>();
                (!instances.is_empty()).then_some(GoverningHeaders { depth, instances })
            })
            .collect()
    }
}

/// First row and column holding data rather than header labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DataStart {
    pub row: usize,
    pub column: usize,
}

/// Scans the grid row by row for cells matched by `descriptors`.
pub(crate) fn discover_headers(grid: &Grid, descriptors: &[HeaderDescriptor]) -> (HeaderMap, DataStart) {
    let mut headers = HeaderMap::with_depths(descriptors.len());
    let mut first_header_row: Option<usize> = None;
    let mut first_header_column: Option<usize> = None;

    for row in 0..grid.row_count() {
        for column in 0..grid.max_columns() {
            let Some(label) = grid.cell(row, column).label() else {
                continue;
            };

            for descriptor in descriptors.iter().filter(|d| d.matches(column, row)) {
                match descriptor.kind {
                    HeaderKind::Row => {
                        first_header_row = Some(first_header_row.map_or(row, |r| r.min(row)));
                    }
                    HeaderKind::Column => {
                        first_header_column =
                            Some(first_header_column.map_or(column, |c| c.min(column)));
                    }
                }
                headers.push(HeaderInstance::new(*descriptor, label.clone(), column, row));
            }
        }
    }

    for descriptor in descriptors {
        if headers.depth(descriptor.depth).is_empty() {
            warn!(
                depth = descriptor.depth,
                kind = %descriptor.kind,
                anchor_column = descriptor.anchor_column,
                anchor_row = descriptor.anchor_row,
                "header descriptor matched no labelled cells"
            );
        }
    }

    let start = DataStart {
        row: first_header_row.map_or(0, |row| row + 1),
        column: first_header_column.map_or(0, |column| column + 1),
    };
    debug!(
        instances = headers.iter().map(|(_, instances)| instances.len()).sum::<usize>(),
        data_row = start.row,
        data_column = start.column,
        "discovered headers"
    );

    (headers, start)
}
