//! Survey CSV reader and writer with encoding and delimiter auto-detection.
//!
//! Converts CSV rows into [`Record`]s. Cells matching one of the
//! [`NULL_TOKENS`] become `null`; everything else is kept as a string.
//! Typing numeric columns is the projector's job, not the reader's.

use serde::Serialize;
use serde_json::Value;
use std::io::{Read, Write};
use std::path::Path;

use crate::models::Record;

/// Cell contents read as missing (the token list pandas uses by default).
pub const NULL_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
    "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// CSV parsing error with context
#[derive(Debug, Clone)]
pub struct CsvError {
    pub line: usize,
    pub column: Option<String>,
    pub message: String,
}

impl std::fmt::Display for CsvError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.column {
            Some(col) => write!(f, "Line {}, column '{}': {}", self.line, col, self.message),
            None => write!(f, "Line {}: {}", self.line, self.message),
        }
    }
}

impl std::error::Error for CsvError {}

impl CsvError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column: None,
            message: message.into(),
        }
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }
}

impl From<csv::Error> for CsvError {
    fn from(err: csv::Error) -> Self {
        let line = err
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(0);
        CsvError::new(line, err.to_string())
    }
}

/// Result of parsing with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Parsed rows keyed by header
    pub records: Vec<Record>,
    /// Detected or used encoding
    pub encoding: String,
    /// Detected or used delimiter
    pub delimiter: char,
    /// Column headers, in file order
    pub headers: Vec<String>,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "utf-8-sig" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding.
///
/// A leading UTF-8 byte-order mark is dropped so it never leaks into the
/// first header name.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    let decoded = match encoding.to_lowercase().as_str() {
        "iso-8859-1" | "latin-1" | "latin1" => encoding_rs::ISO_8859_15.decode(bytes).0.into_owned(),
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
        // UTF-8, ASCII and anything unrecognised
        _ => String::from_utf8_lossy(bytes).into_owned(),
    };
    match decoded.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => decoded,
    }
}

/// Detect the delimiter by counting occurrences in the first line.
///
/// Ties resolve to the earlier candidate, so a header without any
/// separator falls back to a comma.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [',', ';', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Convert one raw cell into a JSON value.
pub fn cell_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    if NULL_TOKENS.contains(&trimmed) {
        Value::Null
    } else {
        Value::String(trimmed.to_string())
    }
}

/// Parse CSV from a reader with an explicit delimiter.
///
/// Rows shorter than the header are padded with `null`; extra cells are ignored.
pub fn parse_csv<R: Read>(reader: R, delimiter: char) -> Result<(Vec<String>, Vec<Record>), CsvError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(CsvError::new(1, "Empty CSV file"));
    }

    let mut records = Vec::new();
    for (idx, row) in rdr.records().enumerate() {
        let row = row.map_err(|e| CsvError::new(idx + 2, e.to_string()))?;
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let mut record = Record::new();
        for (i, header) in headers.iter().enumerate() {
            let value = row.get(i).map(cell_value).unwrap_or(Value::Null);
            record.insert(header.clone(), value);
        }
        records.push(record);
    }

    Ok((headers, records))
}

/// Parse a decoded CSV string with an explicit delimiter and return metadata.
pub fn parse_string_with_metadata(
    content: &str,
    delimiter: char,
    encoding: String,
) -> Result<ParseResult, CsvError> {
    if content.trim().is_empty() {
        return Err(CsvError::new(1, "Empty CSV file"));
    }
    let (headers, records) = parse_csv(content.as_bytes(), delimiter)?;
    Ok(ParseResult {
        records,
        encoding,
        delimiter,
        headers,
    })
}

/// Parse CSV bytes with auto-detection of encoding and delimiter.
pub fn parse_bytes_auto(bytes: &[u8]) -> Result<ParseResult, CsvError> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);
    let delimiter = detect_delimiter(&content);
    parse_string_with_metadata(&content, delimiter, encoding)
}

/// Parse a CSV file with auto-detection of encoding and delimiter.
///
/// # Example
/// ```ignore
/// let result = parse_csv_file_auto("survey_results_public.csv")?;
/// println!("Encoding: {}, Delimiter: '{}'", result.encoding, result.delimiter);
/// ```
pub fn parse_csv_file_auto<P: AsRef<Path>>(path: P) -> Result<ParseResult, CsvError> {
    let bytes = std::fs::read(path.as_ref()).map_err(|e| {
        CsvError::new(0, format!("Cannot read file '{}': {}", path.as_ref().display(), e))
    })?;
    parse_bytes_auto(&bytes)
}

/// Render a value as a CSV cell. `null` becomes an empty cell.
pub fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Write records as CSV with the given column order.
pub fn write_records<W: Write>(writer: W, headers: &[String], records: &[Record]) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(headers)?;
    for record in records {
        wtr.write_record(headers.iter().map(|h| cell_text(record.get(h))))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write serializable rows as CSV (header derived from field names).
pub fn write_rows<W: Write, T: Serialize>(writer: W, rows: &[T]) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(csv: &str, delimiter: char) -> Vec<Record> {
        parse_csv(csv.as_bytes(), delimiter).unwrap().1
    }

    #[test]
    fn test_simple_csv() {
        let rows = parse("name;age\nAlice;30\nBob;25", ';');

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["name"], "Alice");
        assert_eq!(rows[0]["age"], "30");
        assert_eq!(rows[1]["name"], "Bob");
    }

    #[test]
    fn test_quoted_list_keeps_delimiter() {
        let csv = "Industry,Tools\nTech,\"['Python', 'SQL']\"";
        let rows = parse(csv, ',');

        assert_eq!(rows[0]["Tools"], "['Python', 'SQL']");
    }

    #[test]
    fn test_null_tokens() {
        let rows = parse("a,b,c\nNA,,x", ',');

        assert_eq!(rows[0]["a"], Value::Null);
        assert_eq!(rows[0]["b"], Value::Null);
        assert_eq!(rows[0]["c"], "x");
    }

    #[test]
    fn test_short_rows_padded() {
        let rows = parse("a,b,c\n1,2", ',');

        assert_eq!(rows[0]["a"], "1");
        assert_eq!(rows[0]["c"], Value::Null);
    }

    #[test]
    fn test_empty_lines_skipped() {
        let rows = parse("a;b\n1;2\n\n3;4\n", ';');
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_empty_csv_error() {
        let result = parse_string_with_metadata("", ',', "utf-8".into());
        assert!(result.is_err());
        assert!(result.unwrap_err().message.contains("Empty"));
    }

    #[test]
    fn test_error_message_format() {
        let err = CsvError::new(5, "Invalid value").with_column("ConvertedCompYearly");
        let msg = err.to_string();
        assert!(msg.contains("Line 5"));
        assert!(msg.contains("column 'ConvertedCompYearly'"));
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), ',');
        assert_eq!(detect_delimiter("a\tb\tc"), '\t');
        assert_eq!(detect_delimiter("a|b|c"), '|');
        assert_eq!(detect_delimiter("single"), ',');
    }

    #[test]
    fn test_auto_parse() {
        let csv = "DevType,Country\nDeveloper,Germany\nStudent,France";
        let result = parse_bytes_auto(csv.as_bytes()).unwrap();

        assert_eq!(result.delimiter, ',');
        assert_eq!(result.records.len(), 2);
        assert_eq!(result.headers, vec!["DevType", "Country"]);
    }

    #[test]
    fn test_bom_stripped() {
        let bytes = b"\xEF\xBB\xBFDevType,Country\nDeveloper,Germany";
        let result = parse_bytes_auto(bytes).unwrap();
        assert_eq!(result.headers[0], "DevType");
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let decoded = decode_content(bytes, "iso-8859-1");
        assert_eq!(decoded, "Société");
    }

    #[test]
    fn test_write_records_column_order() {
        let mut record = Record::new();
        record.insert("b".into(), Value::from(2.5));
        record.insert("a".into(), Value::from("x, y"));
        record.insert("c".into(), Value::Null);

        let mut out = Vec::new();
        let headers = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        write_records(&mut out, &headers, &[record]).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "a,b,c\n\"x, y\",2.5,\n");
    }

    #[test]
    fn test_parse_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("survey.csv");
        std::fs::write(&path, "Industry,Country\nFintech,Spain\n").unwrap();

        let result = parse_csv_file_auto(&path).unwrap();
        assert_eq!(result.records[0]["Industry"], "Fintech");
    }
}
