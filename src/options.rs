use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::allow::{AllowError, Allowed, require_allowed_value};
use crate::error::ConvertError;
use crate::header::{HeaderDescriptor, HeaderMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderKind {
    Row,
    Column,
}

impl HeaderKind {
    pub const NAMES: [&'static str; 2] = ["row", "column"];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Row => "row",
            Self::Column => "column",
        }
    }
}

impl Display for HeaderKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HeaderKind {
    type Err = AllowError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match require_allowed_value(name, Allowed::Values(&Self::NAMES))? {
            "row" => Ok(Self::Row),
            _ => Ok(Self::Column),
        }
    }
}

/// Named shorthand for a canonical header descriptor list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Preset {
    #[default]
    Row,
    Column,
    RowColumn,
    ColumnRow,
    RowRow,
    ColumnColumn,
}

impl Preset {
    pub const ALL: [Self; 6] = [
        Self::Row,
        Self::Column,
        Self::RowColumn,
        Self::ColumnRow,
        Self::RowRow,
        Self::ColumnColumn,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Row => "row",
            Self::Column => "column",
            Self::RowColumn => "row.column",
            Self::ColumnRow => "column.row",
            Self::RowRow => "row.row",
            Self::ColumnColumn => "column.column",
        }
    }

    /// Expands the preset into its header descriptors, outermost first.
    #[must_use]
    pub fn header_specs(self) -> Vec<HeaderSpec> {
        use HeaderKind::{Column, Row};

        let anchors: &[(HeaderKind, usize, usize)] = match self {
            Self::Row => &[(Row, 0, 0)],
            Self::Column => &[(Column, 0, 0)],
            Self::RowColumn => &[(Row, 0, 0), (Column, 0, 0)],
            Self::ColumnRow => &[(Column, 0, 0), (Row, 0, 0)],
            Self::RowRow => &[(Row, 0, 0), (Row, 0, 1)],
            Self::ColumnColumn => &[(Column, 0, 0), (Column, 1, 0)],
        };

        anchors
            .iter()
            .map(|&(kind, anchor_column, anchor_row)| HeaderSpec::new(kind, anchor_column, anchor_row))
            .collect()
    }
}

impl Display for Preset {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preset {
    type Err = AllowError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let names = Self::ALL.map(Self::as_str);
        let name = require_allowed_value(name, Allowed::Values(&names))?;
        Self::ALL
            .into_iter()
            .find(|preset| preset.as_str() == name)
            .ok_or(AllowError::Rejected)
    }
}

/// Caller-supplied header descriptor. Any `depth` given here is replaced by
/// the descriptor's position in the resolved list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderSpec {
    pub kind: HeaderKind,
    pub anchor_column: usize,
    pub anchor_row: usize,
    pub depth: Option<usize>,
}

impl HeaderSpec {
    #[must_use]
    pub const fn new(kind: HeaderKind, anchor_column: usize, anchor_row: usize) -> Self {
        Self {
            kind,
            anchor_column,
            anchor_row,
            depth: None,
        }
    }

    /// Validates one entry of a JSON `headers` list.
    fn from_json(index: usize, value: &Value) -> Result<Self, ConvertError> {
        let Value::Object(fields) = value else {
            return Err(ConvertError::InvalidOption(format!(
                "headers[{index}] must be an object"
            )));
        };

        let kinds = HeaderKind::NAMES.map(Value::from);
        let kind = field(fields, &["type", "kind"]);
        let kind = require_allowed_value(kind, Allowed::Values(&kinds))
            .map_err(ConvertError::invalid_config(format!("headers[{index}].type")))?;
        let kind = serde_json::from_value::<HeaderKind>(kind)?;

        let anchor_column = anchor(fields, &["c", "anchorColumn"], index, "c")?;
        let anchor_row = anchor(fields, &["r", "anchorRow"], index, "r")?;
        let depth = fields
            .get("depth")
            .and_then(Value::as_u64)
            .and_then(|depth| usize::try_from(depth).ok());

        Ok(Self {
            kind,
            anchor_column,
            anchor_row,
            depth,
        })
    }
}

impl FromStr for HeaderSpec {
    type Err = String;

    /// Parses `kind:column:row`, e.g. `row:2:0`.
    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let parts = spec.split(':').map(str::trim).collect::<Vec<_>>();
        let [kind, column, row] = parts.as_slice() else {
            return Err(format!(
                "invalid header format '{spec}', expected kind:column:row"
            ));
        };

        let kind = kind
            .parse::<HeaderKind>()
            .map_err(|error| format!("invalid header kind '{kind}': {error}"))?;
        let anchor_column = column
            .parse()
            .map_err(|_| format!("invalid header column: '{column}'"))?;
        let anchor_row = row
            .parse()
            .map_err(|_| format!("invalid header row: '{row}'"))?;

        Ok(Self::new(kind, anchor_column, anchor_row))
    }
}

/// Returns the first present field among `keys`, or `null`.
fn field(fields: &Map<String, Value>, keys: &[&str]) -> Value {
    keys.iter()
        .find_map(|key| fields.get(*key))
        .cloned()
        .unwrap_or(Value::Null)
}

fn anchor(
    fields: &Map<String, Value>,
    keys: &[&str],
    index: usize,
    name: &str,
) -> Result<usize, ConvertError> {
    let is_anchor = |value: &Value| value.is_u64();
    let value = require_allowed_value(field(fields, keys), Allowed::Predicate(&is_anchor))
        .map_err(ConvertError::invalid_config(format!("headers[{index}].{name}")))?;

    value
        .as_u64()
        .and_then(|anchor| usize::try_from(anchor).ok())
        .ok_or_else(|| ConvertError::InvalidOption(format!("headers[{index}].{name} is out of range")))
}

/// Called once with the discovered headers, before any data is placed.
pub type HeadersReadyHook<'a> = Box<dyn FnMut(&mut HeaderMap) + 'a>;

#[derive(Default)]
pub struct ConvertOptions<'a> {
    pub preset: Preset,
    /// Overrides `preset` when non-empty.
    pub headers: Vec<HeaderSpec>,
    pub on_headers_ready: Option<HeadersReadyHook<'a>>,
}

impl<'a> ConvertOptions<'a> {
    #[must_use]
    pub fn with_preset(mut self, preset: Preset) -> Self {
        self.preset = preset;
        self
    }

    #[must_use]
    pub fn with_headers(mut self, headers: impl IntoIterator<Item = HeaderSpec>) -> Self {
        self.headers = headers.into_iter().collect();
        self
    }

    #[must_use]
    pub fn on_headers_ready(mut self, hook: impl FnMut(&mut HeaderMap) + 'a) -> Self {
        self.on_headers_ready = Some(Box::new(hook));
        self
    }

    /// Validates an untyped configuration object of the shape
    /// `{ "preset": ..., "headers": [{ "type", "c", "r", "depth"? }] }`.
    ///
    /// A `preset` of `null` or `false` selects the default. `kind`,
    /// `anchorColumn` and `anchorRow` are accepted as long-form field names.
    pub fn from_json(config: &Value) -> Result<Self, ConvertError> {
        let fields = match config {
            Value::Null => return Ok(Self::default()),
            Value::Object(fields) => fields,
            _ => {
                return Err(ConvertError::InvalidOption(
                    "configuration must be a JSON object".to_string(),
                ));
            }
        };

        let mut presets = vec![Value::Null, Value::Bool(false)];
        presets.extend(Preset::ALL.map(|preset| Value::from(preset.as_str())));
        let preset = require_allowed_value(field(fields, &["preset"]), Allowed::Values(&presets))
            .map_err(ConvertError::invalid_config("preset"))?;
        let preset = match preset {
            Value::String(name) => name
                .parse::<Preset>()
                .map_err(ConvertError::invalid_config("preset"))?,
            _ => Preset::default(),
        };

        let headers = match fields.get("headers") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(index, item)| HeaderSpec::from_json(index, item))
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => {
                return Err(ConvertError::InvalidOption(
                    "headers must be a list".to_string(),
                ));
            }
        };

        Ok(Self {
            preset,
            headers,
            on_headers_ready: None,
        })
    }

    /// Explicit headers when given, otherwise the preset expansion, with
    /// every depth set to the descriptor's position.
    #[must_use]
    pub fn resolve_descriptors(&self) -> Vec<HeaderDescriptor> {
        let specs = if self.headers.is_empty() {
            self.preset.header_specs()
        } else {
            self.headers.clone()
        };

        let descriptors = specs
            .into_iter()
            .enumerate()
            .map(|(depth, spec)| {
                if spec.depth.is_some_and(|requested| requested != depth) {
                    debug!(requested = ?spec.depth, depth, "ignoring caller-supplied header depth");
                }
                HeaderDescriptor {
                    kind: spec.kind,
                    anchor_column: spec.anchor_column,
                    anchor_row: spec.anchor_row,
                    depth,
                }
            })
            .collect::<Vec<_>>();

        debug!(?descriptors, "resolved header descriptors");
        descriptors
    }
}

impl fmt::Debug for ConvertOptions<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConvertOptions")
            .field("preset", &self.preset)
            .field("headers", &self.headers)
            .field("on_headers_ready", &self.on_headers_ready.is_some())
            .finish()
    }
}
