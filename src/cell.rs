use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};

/// A scalar grid cell.
///
/// `Absent` marks a position past the end of a ragged row and is distinct
/// from an explicit `Null` and from empty text.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Cell {
    #[default]
    Absent,
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
}

impl Cell {
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// True when the cell carries content that can act as a header label.
    #[must_use]
    pub fn is_present(&self) -> bool {
        match self {
            Self::Absent | Self::Null => false,
            Self::Text(text) => !text.is_empty(),
            Self::Bool(_) | Self::Number(_) => true,
        }
    }

    /// Trimmed text form of a present cell.
    #[must_use]
    pub fn label(&self) -> Option<String> {
        let label = match self {
            Self::Absent | Self::Null => return None,
            Self::Text(text) if text.is_empty() => return None,
            Self::Text(text) => text.trim().to_string(),
            Self::Bool(value) => value.to_string(),
            Self::Number(number) => number.to_string(),
        };
        Some(label)
    }

    /// JSON value written into output records; `None` for absent cells.
    #[must_use]
    pub fn to_value(&self) -> Option<Value> {
        match self {
            Self::Absent => None,
            Self::Null => Some(Value::Null),
            Self::Bool(value) => Some(Value::Bool(*value)),
            Self::Number(number) => Some(Value::Number(number.clone())),
            Self::Text(text) => Some(Value::String(text.clone())),
        }
    }
}

impl From<Value> for Cell {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(value) => Self::Bool(value),
            Value::Number(number) => Self::Number(number),
            Value::String(text) => Self::Text(text),
            nested @ (Value::Array(_) | Value::Object(_)) => Self::Text(nested.to_string()),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Cell {
    fn from(value: i32) -> Self {
        Self::Number(value.into())
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<u32> for Cell {
    fn from(value: u32) -> Self {
        Self::Number(value.into())
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Number::from_f64(value).map_or_else(|| Self::Text(value.to_string()), Self::Number)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl Serialize for Cell {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.to_value() {
            Some(value) => value.serialize(serializer),
            None => serializer.serialize_unit(),
        }
    }
}

impl<'de> Deserialize<'de> for Cell {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Self::from)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::Cell;

    #[test]
    fn presence_distinguishes_absent_null_and_empty_text() {
        assert!(!Cell::Absent.is_present());
        assert!(!Cell::Null.is_present());
        assert!(!Cell::text("").is_present());
        assert!(Cell::text("  ").is_present());
        assert!(Cell::from(0).is_present());
        assert!(Cell::from(false).is_present());
    }

    #[test]
    fn labels_are_trimmed_text() {
        assert_eq!(Cell::text(" Age ").label().as_deref(), Some("Age"));
        assert_eq!(Cell::from(24).label().as_deref(), Some("24"));
        assert_eq!(Cell::from(1.5).label().as_deref(), Some("1.5"));
        assert_eq!(Cell::from(true).label().as_deref(), Some("true"));
        assert_eq!(Cell::Null.label(), None);
        assert_eq!(Cell::text("").label(), None);
    }

    #[test]
    fn absent_cells_have_no_output_value() {
        assert_eq!(Cell::Absent.to_value(), None);
        assert_eq!(Cell::Null.to_value(), Some(Value::Null));
        assert_eq!(Cell::text("").to_value(), Some(json!("")));
    }

    #[test]
    fn deserializes_scalars_and_flattens_nested_values() {
        let cells: Vec<Cell> =
            serde_json::from_value(json!(["a", 1, null, true, [1, 2]])).expect("cells should parse");
        assert_eq!(
            cells,
            vec![
                Cell::text("a"),
                Cell::from(1),
                Cell::Null,
                Cell::Bool(true),
                Cell::text("[1,2]"),
            ]
        );
    }
}
