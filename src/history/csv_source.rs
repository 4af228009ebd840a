//! Long-format CSV history: one row per (entity, month, value).

use crate::core::CalendarMonth;
use crate::error::{ForecastError, Result};
use crate::history::InMemoryHistory;
use std::collections::HashMap;
use std::io;
use std::path::Path;
use tracing::debug;

/// Column names of a long-format history file.
#[derive(Debug, Clone)]
pub struct CsvColumns {
    /// Entity column
    pub entity: String,
    /// Month column, `YYYY-MM` or `YYYY-MM-DD`
    pub month: String,
    /// Observed value column
    pub value: String,
}

impl Default for CsvColumns {
    fn default() -> Self {
        Self {
            entity: "City".to_string(),
            month: "month".to_string(),
            value: "NO2".to_string(),
        }
    }
}

impl CsvColumns {
    /// Set entity column name.
    pub fn entity(mut self, name: impl Into<String>) -> Self {
        self.entity = name.into();
        self
    }

    /// Set month column name.
    pub fn month(mut self, name: impl Into<String>) -> Self {
        self.month = name.into();
        self
    }

    /// Set value column name.
    pub fn value(mut self, name: impl Into<String>) -> Self {
        self.value = name.into();
        self
    }
}

impl InMemoryHistory {
    /// Load history from a long-format CSV with a header row.
    ///
    /// Rows with an empty value cell are missing observations and are
    /// skipped. Any other malformed cell fails the whole load.
    pub fn from_csv_reader<R: io::Read>(reader: R, columns: &CsvColumns) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| ForecastError::Parse(format!("missing column '{name}'")))
        };
        let entity_idx = find(columns.entity.as_str())?;
        let month_idx = find(columns.month.as_str())?;
        let value_idx = find(columns.value.as_str())?;

        let mut grouped: HashMap<String, Vec<(CalendarMonth, f64)>> = HashMap::new();
        let mut skipped = 0usize;

        for (row, record) in rdr.records().enumerate() {
            let record = record?;
            // Header is line 1.
            let line = row + 2;
            let cell = |idx: usize| record.get(idx).unwrap_or("");

            let raw_value = cell(value_idx);
            if raw_value.is_empty() {
                skipped += 1;
                continue;
            }

            let entity = cell(entity_idx);
            if entity.is_empty() {
                return Err(ForecastError::Parse(format!("line {line}: empty entity")));
            }
            let month: CalendarMonth = cell(month_idx)
                .parse()
                .map_err(|e| ForecastError::Parse(format!("line {line}: {e}")))?;
            let value: f64 = raw_value.parse().map_err(|_| {
                ForecastError::Parse(format!("line {line}: bad value '{raw_value}'"))
            })?;
            if !value.is_finite() {
                return Err(ForecastError::Parse(format!(
                    "line {line}: non-finite value '{raw_value}'"
                )));
            }

            grouped
                .entry(entity.to_string())
                .or_default()
                .push((month, value));
        }

        let mut history = InMemoryHistory::new();
        for (entity, observations) in grouped {
            history.insert_series(entity, observations)?;
        }

        debug!(
            entities = history.len(),
            skipped_rows = skipped,
            "loaded csv history"
        );
        Ok(history)
    }

    /// Load history from a CSV file on disk.
    pub fn from_csv_path(path: impl AsRef<Path>, columns: &CsvColumns) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .map_err(|e| ForecastError::Io(format!("failed to open {}: {e}", path.display())))?;
        Self::from_csv_reader(file, columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HistoryProvider;

    const SAMPLE: &str = "\
City,month,NO2
Paris,2023-01-01,40.5
Paris,2023-02-01,38.0
Berlin,2023-01-01,30.0
Paris,2023-03-01,
Berlin,2023-02-01,29.5
Paris,2023-04-01,35.25
";

    #[test]
    fn loads_and_groups_by_entity() {
        let history = InMemoryHistory::from_csv_reader(SAMPLE.as_bytes(), &CsvColumns::default())
            .unwrap();
        assert_eq!(history.entities(), vec!["Berlin", "Paris"]);

        let paris = history.get_history("Paris", 0).unwrap();
        let values: Vec<f64> = paris.iter().map(|p| p.value()).collect();
        assert_eq!(values, vec![40.5, 38.0, 35.25]);
        assert_eq!(paris[2].timestamp(), CalendarMonth::new(2023, 4).unwrap());
    }

    #[test]
    fn custom_column_names() {
        let data = "station,period,level\nA,2020-05,1.0\n";
        let columns = CsvColumns::default()
            .entity("station")
            .month("period")
            .value("level");
        let history = InMemoryHistory::from_csv_reader(data.as_bytes(), &columns).unwrap();
        assert_eq!(history.get_history("A", 1).unwrap()[0].value(), 1.0);
    }

    #[test]
    fn missing_column_is_reported() {
        let data = "City,month,PM10\nParis,2023-01,1.0\n";
        let err = InMemoryHistory::from_csv_reader(data.as_bytes(), &CsvColumns::default())
            .unwrap_err();
        assert_eq!(err, ForecastError::Parse("missing column 'NO2'".to_string()));
    }

    #[test]
    fn malformed_value_names_the_line() {
        let data = "City,month,NO2\nParis,2023-01,1.0\nParis,2023-02,abc\n";
        let err = InMemoryHistory::from_csv_reader(data.as_bytes(), &CsvColumns::default())
            .unwrap_err();
        assert_eq!(
            err,
            ForecastError::Parse("line 3: bad value 'abc'".to_string())
        );
    }

    #[test]
    fn invalid_month_is_a_parse_error() {
        let data = "City,month,NO2\nParis,2023-14,1.0\n";
        let err = InMemoryHistory::from_csv_reader(data.as_bytes(), &CsvColumns::default())
            .unwrap_err();
        assert!(matches!(err, ForecastError::Parse(msg) if msg.starts_with("line 2:")));
    }

    #[test]
    fn non_finite_value_names_the_line() {
        let data = "City,month,NO2\nParis,2023-01,1.0\nParis,2023-02,NaN\nParis,2023-03,inf\n";
        let err = InMemoryHistory::from_csv_reader(data.as_bytes(), &CsvColumns::default())
            .unwrap_err();
        assert_eq!(
            err,
            ForecastError::Parse("line 3: non-finite value 'NaN'".to_string())
        );
    }

    #[test]
    fn loads_from_path() {
        let path = std::env::temp_dir().join(format!("no2-history-{}.csv", std::process::id()));
        std::fs::write(&path, SAMPLE).unwrap();
        let history = InMemoryHistory::from_csv_path(&path, &CsvColumns::default());
        std::fs::remove_file(&path).unwrap();

        let history = history.unwrap();
        assert_eq!(history.get_history("Berlin", 0).unwrap().len(), 2);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let path = std::env::temp_dir().join("no2-history-does-not-exist.csv");
        let err = InMemoryHistory::from_csv_path(&path, &CsvColumns::default()).unwrap_err();
        assert!(matches!(err, ForecastError::Io(msg) if msg.starts_with("failed to open")));
    }
}
