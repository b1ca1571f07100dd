use serde_json::Value;

use crate::nba::error::FetchError;

/// One tabular result set from the stats service: a `headers` list plus
/// `rowSet` rows, kept as raw JSON values until a computation needs numbers.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl RecordSet {
    /// The empty sentinel returned when retries exhaust.
    pub fn empty() -> Self {
        RecordSet::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Parses the first entry of an endpoint response's `resultSets` array.
    pub fn first_from_response(json: &Value) -> Result<RecordSet, FetchError> {
        let result_sets = json["resultSets"]
            .as_array()
            .ok_or_else(|| FetchError::Malformed("resultSets missing or not an array".into()))?;
        let first = result_sets
            .first()
            .ok_or_else(|| FetchError::Malformed("resultSets is empty".into()))?;
        RecordSet::from_result_set(first)
    }

    /// Parses one `resultSets` entry (`name` + `headers` + `rowSet`).
    pub fn from_result_set(data_set: &Value) -> Result<RecordSet, FetchError> {
        let name = data_set["name"].as_str().unwrap_or_default().to_string();
        let header_values = data_set["headers"]
            .as_array()
            .ok_or_else(|| FetchError::Malformed("headers missing".into()))?;
        let headers = header_values
            .iter()
            .map(|h| h.as_str().unwrap_or_default().to_string())
            .collect::<Vec<String>>();
        let row_values = data_set["rowSet"]
            .as_array()
            .ok_or_else(|| FetchError::Malformed("rowSet missing".into()))?;
        let mut rows = Vec::with_capacity(row_values.len());
        for row in row_values {
            let row_array = row
                .as_array()
                .ok_or_else(|| FetchError::Malformed("rowSet entry is not an array".into()))?;
            rows.push(row_array.clone());
        }
        Ok(RecordSet { name, headers, rows })
    }

    /// Case-insensitive header lookup.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(column))
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_index(column).is_some()
    }

    /// Sets every cell of `column` to `value`, creating the column if absent.
    pub fn set_column(&mut self, column: &str, value: Value) {
        if let Some(idx) = self.column_index(column) {
            for row in &mut self.rows {
                row[idx] = value.clone();
            }
        } else {
            self.headers.push(column.to_string());
            for row in &mut self.rows {
                row.push(value.clone());
            }
        }
    }

    /// Appends a computed column; `values` must cover every row.
    pub fn push_column(&mut self, column: &str, values: Vec<Value>) {
        debug_assert_eq!(values.len(), self.rows.len());
        self.headers.push(column.to_string());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
    }

    /// Denormalizes player identity onto every row, the way the combined
    /// stats file wants it.
    pub fn tag_player(&mut self, player_id: i64, player_name: &str) {
        self.set_column("PLAYER_ID", Value::from(player_id));
        self.set_column("PLAYER_NAME", Value::from(player_name));
    }

    /// Appends another record set, aligning its rows to this one's headers
    /// by column name. Columns absent on either side fill with null.
    pub fn append(&mut self, other: RecordSet) {
        if self.headers.is_empty() {
            self.headers = other.headers;
            self.rows = other.rows;
            return;
        }
        for header in &other.headers {
            if !self.has_column(header) {
                self.headers.push(header.clone());
                for row in &mut self.rows {
                    row.push(Value::Null);
                }
            }
        }
        for other_row in &other.rows {
            let mut aligned = Vec::with_capacity(self.headers.len());
            for header in &self.headers {
                let cell = other
                    .headers
                    .iter()
                    .position(|h| h.eq_ignore_ascii_case(header))
                    .and_then(|idx| other_row.get(idx).cloned())
                    .unwrap_or(Value::Null);
                aligned.push(cell);
            }
            self.rows.push(aligned);
        }
    }

    /// Distinct stringified values of one column, in first-seen order.
    pub fn distinct_strings(&self, column: &str) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        if let Some(idx) = self.column_index(column) {
            for row in &self.rows {
                let v = cell_to_string(&row[idx]);
                if !v.is_empty() && !seen.contains(&v) {
                    seen.push(v);
                }
            }
        }
        seen
    }

    /// Numeric view of one cell; non-numeric and missing cells read as zero.
    pub fn cell_f64(&self, row: usize, column: &str) -> f64 {
        self.column_index(column)
            .and_then(|idx| self.rows.get(row).and_then(|r| r.get(idx)))
            .map(value_f64)
            .unwrap_or(0.0)
    }
}

/// Best-effort numeric read: JSON numbers directly, numeric strings parsed,
/// everything else zero.
pub fn value_f64(v: &Value) -> f64 {
    match v {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}

pub fn cell_to_string(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
