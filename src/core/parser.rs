//! CSV loader for the OWID COVID-19 export
//!
//! Reads the five columns the scenes need and coerces them to numbers.
//! Cells that do not parse become NaN; only structural problems (I/O,
//! broken CSV framing, a missing header column) are reported as errors.

use std::io::Read;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, info, trace, warn};

use super::data::{CountryRecord, Dataset};

pub const COL_LOCATION: &str = "location";
pub const COL_DEATHS: &str = "total_deaths_per_million";
pub const COL_GDP: &str = "gdp_per_capita";
pub const COL_HDI: &str = "human_development_index";
pub const COL_AGE: &str = "median_age";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("dataset is missing required column `{0}`")]
    MissingColumn(&'static str),
}

/// Positions of the columns the loader reads, resolved once from the header
#[derive(Clone, Copy, Debug)]
struct Columns {
    location: usize,
    deaths: usize,
    gdp: usize,
    hdi: usize,
    age: usize,
}

impl Columns {
    fn resolve(headers: &csv::ByteRecord) -> Result<Self, LoadError> {
        let find = |column: &'static str| {
            headers
                .iter()
                .position(|h| h == column.as_bytes())
                .ok_or_else(|| {
                    warn!(column, "Required column missing from header");
                    LoadError::MissingColumn(column)
                })
        };
        Ok(Self {
            location: find(COL_LOCATION)?,
            deaths: find(COL_DEATHS)?,
            gdp: find(COL_GDP)?,
            hdi: find(COL_HDI)?,
            age: find(COL_AGE)?,
        })
    }

    /// Build a record from one row. Missing trailing cells read as empty.
    fn record(&self, row: &csv::ByteRecord) -> CountryRecord {
        let cell = |idx: usize| row.get(idx).unwrap_or_default();
        let number = |idx: usize| parse_float(&String::from_utf8_lossy(cell(idx)));
        CountryRecord {
            country: String::from_utf8_lossy(cell(self.location)).into_owned(),
            deaths: number(self.deaths),
            gdp: number(self.gdp),
            hdi: number(self.hdi),
            age: number(self.age),
        }
    }
}

/// Load a dataset from a file on disk
pub fn load_path(path: impl AsRef<Path>) -> Result<Dataset, LoadError> {
    let path = path.as_ref();
    info!(path = %path.display(), "Loading dataset");
    let file = std::fs::File::open(path)?;
    from_reader(file)
}

/// Parse a dataset held in memory
pub fn parse_csv(text: &str) -> Result<Dataset, LoadError> {
    from_reader(text.as_bytes())
}

/// Parse a dataset from any reader.
///
/// Rows are read as raw bytes, so invalid UTF-8 never aborts the load.
pub fn from_reader<R: Read>(reader: R) -> Result<Dataset, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let columns = Columns::resolve(rdr.byte_headers()?)?;

    let mut records = Vec::new();
    let mut incomplete = 0usize;
    let mut row = csv::ByteRecord::new();
    while rdr.read_byte_record(&mut row)? {
        let record = columns.record(&row);
        if [record.deaths, record.gdp, record.hdi, record.age]
            .iter()
            .any(|v| v.is_nan())
        {
            incomplete += 1;
            trace!(country = %record.country, "Row has unparsable numeric fields");
        }
        records.push(record);
    }

    debug!(rows = records.len(), incomplete, "Dataset parsed");
    Ok(Dataset::new(records))
}

/// Coerce text to a number the way a browser's `parseFloat` does.
///
/// Leading whitespace is skipped and the longest numeric prefix is used,
/// so `"12.5 people"` is 12.5. No numeric prefix gives NaN.
pub fn parse_float(text: &str) -> f64 {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    if s[end..].starts_with("Infinity") {
        return if bytes[0] == b'-' { f64::NEG_INFINITY } else { f64::INFINITY };
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return f64::NAN;
    }

    // Exponent only counts when it carries at least one digit.
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
iso_code,location,date,total_deaths_per_million,gdp_per_capita,human_development_index,median_age
PER,Peru,2023-01-01,6400.5,12236.706,0.777,29.1
USA,United States,2023-01-01,3300.2,54225.446,0.926,38.3
XXX,Nowhere,2023-01-01,,n/a,,
";

    #[test]
    fn test_parse_float_prefixes() {
        assert_eq!(parse_float("42"), 42.0);
        assert_eq!(parse_float("  -3.5"), -3.5);
        assert_eq!(parse_float("12abc"), 12.0);
        assert_eq!(parse_float(".5"), 0.5);
        assert_eq!(parse_float("5."), 5.0);
        assert_eq!(parse_float("1e3"), 1000.0);
        assert_eq!(parse_float("1e"), 1.0);
        assert_eq!(parse_float("Infinity"), f64::INFINITY);
        assert_eq!(parse_float("-Infinity"), f64::NEG_INFINITY);
        assert!(parse_float("").is_nan());
        assert!(parse_float("abc").is_nan());
        assert!(parse_float(".").is_nan());
        assert!(parse_float("-").is_nan());
        assert!(parse_float("inf").is_nan());
        assert!(parse_float("NaN").is_nan());
    }

    #[test]
    fn test_parse_sample() {
        let ds = parse_csv(SAMPLE).unwrap();
        assert_eq!(ds.len(), 3);

        let peru = &ds.records()[0];
        assert_eq!(peru.country, "Peru");
        assert_eq!(peru.deaths, 6400.5);
        assert_eq!(peru.gdp, 12236.706);
        assert_eq!(peru.hdi, 0.777);
        assert_eq!(peru.age, 29.1);

        let nowhere = &ds.records()[2];
        assert!(nowhere.deaths.is_nan());
        assert!(nowhere.gdp.is_nan());
        assert!(nowhere.hdi.is_nan());
        assert!(nowhere.age.is_nan());
    }

    #[test]
    fn test_numeric_fields_are_numbers_or_nan() {
        let ds = parse_csv(SAMPLE).unwrap();
        for r in ds.records() {
            for v in [r.deaths, r.gdp, r.hdi, r.age] {
                assert!(v.is_nan() || v.is_finite());
            }
        }
    }

    #[test]
    fn test_short_rows_become_nan() {
        let text = "location,total_deaths_per_million,gdp_per_capita,human_development_index,median_age\nChile,3000\n";
        let ds = parse_csv(text).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records()[0].deaths, 3000.0);
        assert!(ds.records()[0].gdp.is_nan());
        assert!(ds.records()[0].age.is_nan());
    }

    #[test]
    fn test_invalid_utf8_does_not_abort_load() {
        let mut bytes = b"iso_code,location,date,total_deaths_per_million,gdp_per_capita,human_development_index,median_age\n".to_vec();
        bytes.extend_from_slice(b"PER,Peru,2023-01-01,6400.5,12236.706,0.777,29.1\n");
        bytes.extend_from_slice(b"C\xFFW,Curacao,2023-01-01,1800,,,41.7\n");
        bytes.extend_from_slice(b"XK,Kosovo\xFF,2023-01-01,1700,9000,,\n");

        let ds = from_reader(&bytes[..]).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.records()[1].country, "Curacao");
        assert_eq!(ds.records()[1].deaths, 1800.0);
        assert!(ds.records()[1].gdp.is_nan());
        assert_eq!(ds.records()[2].country, "Kosovo\u{FFFD}");
        assert_eq!(ds.records()[2].gdp, 9000.0);
    }

    #[test]
    fn test_blank_lines_and_reordered_columns() {
        let text = "median_age,location,human_development_index,gdp_per_capita,total_deaths_per_million\n38.3,United States,0.926,54225.4,3300.2\n\n";
        let ds = parse_csv(text).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records()[0].country, "United States");
        assert_eq!(ds.records()[0].deaths, 3300.2);
        assert_eq!(ds.records()[0].age, 38.3);
    }

    #[test]
    fn test_missing_column_is_error() {
        let text = "location,total_deaths_per_million,gdp_per_capita,median_age\nChile,1,2,3\n";
        match parse_csv(text) {
            Err(LoadError::MissingColumn(col)) => assert_eq!(col, COL_HDI),
            other => panic!("expected missing column, got {:?}", other),
        }
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = load_path("/nonexistent/owid-covid-data.csv");
        assert!(matches!(result, Err(LoadError::Io(_))));
    }
}
