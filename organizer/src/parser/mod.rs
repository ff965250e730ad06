//! CSV input with encoding and delimiter auto-detection.
//!
//! Turns a CSV file into [`RawRow`]s keyed by header label. No categorization
//! logic here.

use std::path::Path;

use crate::error::{CsvError, CsvResult};
use crate::models::{RawRow, RowSet};

/// Delimiters considered by [`detect_delimiter`], in preference order.
const CANDIDATE_DELIMITERS: [char; 4] = [',', ';', '\t', '|'];

/// Reader options.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Force a delimiter instead of detecting it
    pub delimiter: Option<char>,
}

impl ParseOptions {
    pub fn with_delimiter(delimiter: char) -> Self {
        Self {
            delimiter: Some(delimiter),
        }
    }
}

/// Result of parsing with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Data rows in file order
    pub rows: Vec<RawRow>,
    /// Detected encoding
    pub encoding: String,
    /// Detected or used delimiter
    pub delimiter: char,
    /// Column headers, as written in the file
    pub headers: Vec<String>,
}

impl ParseResult {
    pub fn into_row_set(self, source: impl Into<String>) -> RowSet {
        RowSet::new(source, self.rows)
    }
}

/// Detect the encoding of raw bytes.
///
/// Valid UTF-8 is always taken as UTF-8; chardet is only consulted for other
/// byte sequences, since it misreads short accented UTF-8 text as Latin-1.
pub fn detect_encoding(bytes: &[u8]) -> String {
    if std::str::from_utf8(bytes).is_ok() {
        return "utf-8".to_string();
    }

    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding.
///
/// Unknown encodings and invalid UTF-8 fall back to lossy UTF-8.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    let decoded = match encoding.to_lowercase().as_str() {
        "iso-8859-1" | "latin-1" | "latin1" | "windows-1252" | "cp1252" => {
            encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned()
        }
        _ => String::from_utf8_lossy(bytes).into_owned(),
    };
    match decoded.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => decoded,
    }
}

/// Detect the delimiter by counting occurrences in the first line.
///
/// Falls back to `,` when the line holds none of the candidates.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &CANDIDATE_DELIMITERS {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse a CSV file with auto-detection of encoding and delimiter.
pub fn parse_csv_file<P: AsRef<Path>>(path: P, options: &ParseOptions) -> CsvResult<ParseResult> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| CsvError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_bytes(&bytes, options)
}

/// Parse CSV bytes with auto-detection of encoding and delimiter.
pub fn parse_bytes(bytes: &[u8], options: &ParseOptions) -> CsvResult<ParseResult> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);
    parse_str(&content, options, encoding)
}

/// Parse already-decoded CSV text. The first record is the header.
pub fn parse_str(
    content: &str,
    options: &ParseOptions,
    encoding: String,
) -> CsvResult<ParseResult> {
    if content.trim().is_empty() {
        return Err(CsvError::EmptyFile);
    }

    let delimiter = options.delimiter.unwrap_or_else(|| detect_delimiter(content));
    if !delimiter.is_ascii() {
        return Err(CsvError::InvalidDelimiter(delimiter));
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(CsvError::NoHeaders);
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|field| field.trim().is_empty()) && record.len() <= 1 {
            continue;
        }

        // Short records leave trailing columns absent; extra fields are ignored.
        let mut row = RawRow::new();
        for (header, value) in headers.iter().zip(record.iter()) {
            row.insert(header.clone(), Some(value.to_string()));
        }
        rows.push(row);
    }

    Ok(ParseResult {
        rows,
        encoding,
        delimiter,
        headers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(csv: &str) -> ParseResult {
        parse_str(csv, &ParseOptions::default(), "utf-8".to_string()).unwrap()
    }

    #[test]
    fn test_simple_csv() {
        let result =
            parse("Date,Description,Amount\n2024-01-01,Shoprite,10.00\n2024-01-02,Gas,30.00\n");

        assert_eq!(result.delimiter, ',');
        assert_eq!(result.headers, vec!["Date", "Description", "Amount"]);
        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.rows[0].get("Description"), Some(Some("Shoprite")));
        assert_eq!(result.rows[1].get("Amount"), Some(Some("30.00")));
    }

    #[test]
    fn test_quoted_values() {
        let result = parse("Description,Amount\n\"SHOPRITE, EDISON NJ\",\"1,024.00\"\n");
        assert_eq!(result.rows[0].get("Description"), Some(Some("SHOPRITE, EDISON NJ")));
        assert_eq!(result.rows[0].get("Amount"), Some(Some("1,024.00")));
    }

    #[test]
    fn test_short_record_omits_columns() {
        let result = parse("a,b,c\n1,2\n");
        assert_eq!(result.rows[0].get("b"), Some(Some("2")));
        assert_eq!(result.rows[0].get("c"), None);
    }

    #[test]
    fn test_extra_fields_ignored() {
        let result = parse("a,b\n1,2,3,4\n");
        assert_eq!(result.rows[0].len(), 2);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let result = parse("a,b\n1,2\n\n3,4\n");
        assert_eq!(result.rows.len(), 2);
    }

    #[test]
    fn test_empty_input() {
        let err = parse_str("  \n", &ParseOptions::default(), "utf-8".into()).unwrap_err();
        assert!(matches!(err, CsvError::EmptyFile));
    }

    #[test]
    fn test_explicit_delimiter() {
        let result = parse_str(
            "a|b\n1|2\n",
            &ParseOptions::with_delimiter('|'),
            "utf-8".into(),
        )
        .unwrap();
        assert_eq!(result.rows[0].get("b"), Some(Some("2")));
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        let err = parse_str("a§b\n", &ParseOptions::with_delimiter('§'), "utf-8".into()).unwrap_err();
        assert!(matches!(err, CsvError::InvalidDelimiter('§')));
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), ',');
        assert_eq!(detect_delimiter("a\tb\tc\n1\t2\t3"), '\t');
        assert_eq!(detect_delimiter("a|b|c"), '|');
        assert_eq!(detect_delimiter("single"), ',');
    }

    #[test]
    fn test_bom_stripped() {
        let bytes = b"\xEF\xBB\xBFDate,Amount\n2024-01-01,1\n";
        let result = parse_bytes(bytes, &ParseOptions::default()).unwrap();
        assert_eq!(result.headers[0], "Date");
    }

    #[test]
    fn test_short_utf8_text_kept_intact() {
        for (bytes, expected) in [
            ("Description\nZürich\n", "Zürich"),
            ("Description\nCafé\n", "Café"),
            ("Description\nŁódź\n", "Łódź"),
        ] {
            let result = parse_bytes(bytes.as_bytes(), &ParseOptions::default()).unwrap();
            assert_eq!(result.encoding, "utf-8");
            assert_eq!(result.rows[0].get("Description"), Some(Some(expected)));
        }
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let decoded = decode_content(bytes, "iso-8859-1");
        assert_eq!(decoded, "Société");
    }
}
