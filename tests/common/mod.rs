#![allow(dead_code)]

use serde_json::{Value, json};
use table2json::Grid;

pub fn grid(rows: Value) -> Grid {
    Grid::from_json_value(rows).expect("fixture should be a list of rows")
}

pub fn readme_table() -> Grid {
    grid(json!([["a", "b", "c"], [1, 2, 3], ["do", "re", "mi"]]))
}

pub fn people_table() -> Grid {
    grid(json!([
        ["", "Tom", "Dick", "Harriette"],
        ["Age", 24, 32, 40],
        ["Country", "NZ", "AU", "FR"],
    ]))
}

pub fn row_table() -> Grid {
    grid(json!([
        ["Test 1", "Test 2", "Test 3"],
        [1, 4, 7],
        [2, 5, 8],
        [3, 6, 9],
    ]))
}

pub fn column_table() -> Grid {
    grid(json!([
        ["Test 1", 1, 2, 3],
        ["Test 2", 4, 5, 6],
        ["Test 3", 7, 8, 9],
    ]))
}

pub fn row_column_table() -> Grid {
    grid(json!([
        ["", "0", "1", "2"],
        ["Test 1", 1, 2, 3],
        ["Test 2", 4, 5, 6],
        ["Test 3", 7, 8, 9],
    ]))
}

pub fn column_row_table() -> Grid {
    grid(json!([
        ["", "Test 1", "Test 2", "Test 3"],
        ["0", 1, 4, 7],
        ["1", 2, 5, 8],
        ["2", 3, 6, 9],
    ]))
}

pub fn row_row_table() -> Grid {
    grid(json!([
        ["0", "1", "2"],
        ["Test 1", "Test 2", "Test 3"],
        [1, 2, 3],
        [4, 5, 6],
        [7, 8, 9],
    ]))
}

pub fn column_column_table() -> Grid {
    grid(json!([
        ["0", "Test 1", 1, 4, 7],
        ["1", "Test 2", 2, 5, 8],
        ["2", "Test 3", 3, 6, 9],
    ]))
}

pub fn offset_table() -> Grid {
    grid(json!([
        ["", "", "0", "1", "2"],
        ["", "Test 1", 1, 2, 3],
        ["", "Test 2", 4, 5, 6],
        ["", "Test 3", 7, 8, 9],
    ]))
}

/// Expected output for the row, column and offset fixtures keyed by test label.
pub fn by_test_label() -> Value {
    json!([
        { "Test 1": 1, "Test 2": 4, "Test 3": 7 },
        { "Test 1": 2, "Test 2": 5, "Test 3": 8 },
        { "Test 1": 3, "Test 2": 6, "Test 3": 9 },
    ])
}

/// Expected output when the outer labels are "0", "1", "2".
pub fn by_index_then_test_label() -> Value {
    json!({
        "0": { "Test 1": 1, "Test 2": 4, "Test 3": 7 },
        "1": { "Test 1": 2, "Test 2": 5, "Test 3": 8 },
        "2": { "Test 1": 3, "Test 2": 6, "Test 3": 9 },
    })
}
