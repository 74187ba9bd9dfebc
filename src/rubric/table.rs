use std::fmt;
use std::fs;
use std::path::Path;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use tracing::{info, warn};

use crate::error::RubricError;

/// A single rubric cell, as it would come out of a spreadsheet.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Missing,
    Number(f64),
    Bool(bool),
    Text(String),
}

impl CellValue {
    /// Build a cell from text. Blank text counts as missing, like an empty
    /// spreadsheet cell.
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.trim().is_empty() {
            CellValue::Missing
        } else {
            CellValue::Text(s)
        }
    }

    pub fn number(n: f64) -> Self {
        if n.is_nan() {
            CellValue::Missing
        } else {
            CellValue::Number(n)
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }

    /// String form of a present cell, trimmed. `None` when missing.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Missing => None,
            CellValue::Number(n) => Some(n.to_string()),
            CellValue::Bool(b) => Some(b.to_string()),
            CellValue::Text(s) => Some(s.trim().to_string()),
        }
    }

    /// Numeric form of a present cell. Text is parsed after trimming;
    /// booleans are 1 or 0; anything unparseable is `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            CellValue::Text(s) => s.trim().parse::<f64>().ok(),
            CellValue::Missing => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Missing => f.write_str(""),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::text(s)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::number(n)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Missing => serializer.serialize_none(),
            CellValue::Number(n) => serializer.serialize_f64(*n),
            CellValue::Bool(b) => serializer.serialize_bool(*b),
            CellValue::Text(s) => serializer.serialize_str(s),
        }
    }
}

struct CellVisitor;

impl<'de> Visitor<'de> for CellVisitor {
    type Value = CellValue;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a rubric cell (string, number, boolean or null)")
    }

    fn visit_unit<E: de::Error>(self) -> Result<CellValue, E> {
        Ok(CellValue::Missing)
    }

    fn visit_none<E: de::Error>(self) -> Result<CellValue, E> {
        Ok(CellValue::Missing)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<CellValue, D::Error> {
        d.deserialize_any(CellVisitor)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<CellValue, E> {
        Ok(CellValue::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<CellValue, E> {
        Ok(CellValue::Number(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<CellValue, E> {
        Ok(CellValue::Number(v as f64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<CellValue, E> {
        Ok(CellValue::number(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<CellValue, E> {
        Ok(CellValue::text(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<CellValue, E> {
        Ok(CellValue::text(v))
    }
}

impl<'de> Deserialize<'de> for CellValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(CellVisitor)
    }
}

/// One rubric row: cells keyed by column name, in column order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RubricRow {
    cells: Vec<(String, CellValue)>,
}

impl RubricRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert. A repeated column replaces the earlier value in
    /// place.
    pub fn with(mut self, column: &str, value: impl Into<CellValue>) -> Self {
        self.insert(column, value.into());
        self
    }

    pub fn insert(&mut self, column: &str, value: CellValue) {
        let column = column.trim();
        if let Some(slot) = self.cells.iter_mut().find(|(c, _)| c == column) {
            slot.1 = value;
        } else {
            self.cells.push((column.to_string(), value));
        }
    }

    /// Cell for an exact (case-sensitive) column name.
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(c, _)| c == column).map(|(_, v)| v)
    }

    /// Cells in column order.
    pub fn cells(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(c, v)| (c.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|(_, v)| v.is_missing())
    }
}

impl<K: AsRef<str>, V: Into<CellValue>> FromIterator<(K, V)> for RubricRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = RubricRow::new();
        for (k, v) in iter {
            row.insert(k.as_ref(), v.into());
        }
        row
    }
}

impl Serialize for RubricRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (column, value) in &self.cells {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

struct RowVisitor;

impl<'de> Visitor<'de> for RowVisitor {
    type Value = RubricRow;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a mapping of column name to cell")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<RubricRow, A::Error> {
        let mut row = RubricRow::new();
        while let Some((column, value)) = access.next_entry::<String, CellValue>()? {
            row.insert(&column, value);
        }
        Ok(row)
    }
}

impl<'de> Deserialize<'de> for RubricRow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RowVisitor)
    }
}

/// An immutable rubric: the rows that survive empty-row filtering, in file
/// order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RubricTable {
    columns: Vec<String>,
    rows: Vec<RubricRow>,
}

impl RubricTable {
    /// Build a table, dropping rows whose cells are all missing. Columns are
    /// collected in first-seen order across rows.
    pub fn new(rows: Vec<RubricRow>) -> Self {
        let rows: Vec<RubricRow> = rows.into_iter().filter(|r| !r.is_empty()).collect();
        let mut columns: Vec<String> = Vec::new();
        for row in &rows {
            for (column, _) in row.cells() {
                if !columns.iter().any(|c| c == column) {
                    columns.push(column.to_string());
                }
            }
        }
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[RubricRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// On-disk rubric shapes: a list of records, or a spreadsheet-like sheet
/// with a header row.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RubricDocument {
    Sheet {
        columns: Vec<String>,
        #[serde(default)]
        rows: Vec<Vec<CellValue>>,
    },
    Records(Vec<RubricRow>),
}

impl RubricDocument {
    fn into_table(self) -> RubricTable {
        match self {
            RubricDocument::Records(rows) => RubricTable::new(rows),
            RubricDocument::Sheet { columns, rows } => {
                let rows = rows
                    .into_iter()
                    .enumerate()
                    .map(|(i, cells)| {
                        if cells.len() > columns.len() {
                            warn!(
                                row = i + 1,
                                extra = cells.len() - columns.len(),
                                "rubric row has more cells than columns; extra cells ignored"
                            );
                        }
                        let mut row = RubricRow::new();
                        let mut cells = cells.into_iter();
                        for column in &columns {
                            row.insert(column, cells.next().unwrap_or_default());
                        }
                        row
                    })
                    .collect();
                RubricTable::new(rows)
            }
        }
    }
}

/// True when the text holds nothing but whitespace and `#` comments.
fn is_blank_document(content: &str) -> bool {
    content
        .lines()
        .map(str::trim)
        .all(|line| line.is_empty() || line.starts_with('#'))
}

/// Parse a rubric from YAML text (JSON is accepted too, being valid YAML).
pub fn parse_rubric_yaml(content: &str) -> Result<RubricTable, String> {
    let doc: RubricDocument = serde_saphyr::from_str(content).map_err(|e| e.to_string())?;
    Ok(doc.into_table())
}

/// Parse a rubric from JSON text.
pub fn parse_rubric_json(content: &str) -> Result<RubricTable, String> {
    let doc: RubricDocument = serde_json::from_str(content).map_err(|e| e.to_string())?;
    Ok(doc.into_table())
}

/// Load a rubric file. `.json` files are read as JSON, anything else as
/// YAML.
pub fn load_rubric(path: &Path) -> Result<RubricTable, RubricError> {
    if !path.exists() {
        return Err(RubricError::NotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|source| RubricError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if is_blank_document(&content) {
        return Err(RubricError::Empty {
            path: path.to_path_buf(),
        });
    }

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let parsed = if is_json {
        parse_rubric_json(&content)
    } else {
        parse_rubric_yaml(&content)
    };

    let table = parsed.map_err(|message| RubricError::Parse {
        path: path.to_path_buf(),
        message,
    })?;

    info!(
        path = %path.display(),
        rows = table.len(),
        columns = table.columns().len(),
        "loaded rubric"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_blank_text_is_missing() {
        assert!(CellValue::text("   ").is_missing());
        assert!(CellValue::number(f64::NAN).is_missing());
        assert!(!CellValue::text("x").is_missing());
    }

    #[test]
    fn test_cell_numeric_parsing() {
        assert_eq!(CellValue::text(" 2.5 ").as_f64(), Some(2.5));
        assert_eq!(CellValue::Number(3.0).as_f64(), Some(3.0));
        assert_eq!(CellValue::text("heavy").as_f64(), None);
        assert_eq!(CellValue::Missing.as_f64(), None);
        assert_eq!(CellValue::Bool(true).as_f64(), Some(1.0));
        assert_eq!(CellValue::Bool(false).as_f64(), Some(0.0));
    }

    #[test]
    fn test_row_preserves_column_order() {
        let row = RubricRow::new()
            .with("Weight", 2)
            .with("Criterion", "Greeting")
            .with("Keywords", "hello");
        let columns: Vec<&str> = row.cells().map(|(c, _)| c).collect();
        assert_eq!(columns, vec!["Weight", "Criterion", "Keywords"]);
    }

    #[test]
    fn test_row_column_names_trimmed() {
        let row = RubricRow::new().with(" Criterion ", "Greeting");
        assert_eq!(row.get("Criterion"), Some(&CellValue::text("Greeting")));
    }

    #[test]
    fn test_table_drops_empty_rows() {
        let table = RubricTable::new(vec![
            RubricRow::new().with("Criterion", "Greeting"),
            RubricRow::new().with("Criterion", "").with("Weight", CellValue::Missing),
            RubricRow::new().with("Criterion", "Closing"),
        ]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.columns(), &["Criterion".to_string()]);
    }

    #[test]
    fn test_parse_records_yaml() {
        let yaml = r#"
- Criterion: Greeting
  Keywords: "hello, hi"
  Weight: 2
- Criterion: Background
  Description: Talks about education
  MinWords: 30
  Weight: ~
"#;
        let table = parse_rubric_yaml(yaml).unwrap();
        assert_eq!(table.len(), 2);
        let first = &table.rows()[0];
        assert_eq!(first.get("Weight"), Some(&CellValue::Number(2.0)));
        let second = &table.rows()[1];
        assert_eq!(second.get("Weight"), Some(&CellValue::Missing));
        assert_eq!(second.get("MinWords"), Some(&CellValue::Number(30.0)));
        assert_eq!(
            table.columns(),
            &["Criterion", "Keywords", "Weight", "Description", "MinWords"]
        );
    }

    #[test]
    fn test_parse_sheet_yaml_pads_short_rows() {
        let yaml = r#"
columns: [Criteria, Detail, Weights]
rows:
  - [Greeting, "Opens politely", 1]
  - [Closing]
  - [~, ~, ~]
"#;
        let table = parse_rubric_yaml(yaml).unwrap();
        assert_eq!(table.len(), 2);
        let closing = &table.rows()[1];
        assert_eq!(closing.get("Criteria"), Some(&CellValue::text("Closing")));
        assert_eq!(closing.get("Detail"), Some(&CellValue::Missing));
    }

    #[test]
    fn test_parse_sheet_yaml_drops_extra_cells() {
        let yaml = r#"
columns: [Criterion, Weight]
rows:
  - [Greeting, 2, "stray", 99]
"#;
        let table = parse_rubric_yaml(yaml).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.columns(), &["Criterion", "Weight"]);
        let cells: Vec<(&str, &CellValue)> = table.rows()[0].cells().collect();
        assert_eq!(
            cells,
            vec![
                ("Criterion", &CellValue::text("Greeting")),
                ("Weight", &CellValue::Number(2.0)),
            ]
        );
    }

    #[test]
    fn test_parse_records_json() {
        let json = r#"[{"Parameter": "Clarity", "Weight": "3"}]"#;
        let table = parse_rubric_json(json).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].get("Weight").and_then(|c| c.as_f64()), Some(3.0));
    }

    #[test]
    fn test_load_rubric_missing_file() {
        let err = load_rubric(Path::new("/nonexistent/rubric.yaml")).unwrap_err();
        assert!(matches!(err, RubricError::NotFound(_)));
    }

    #[test]
    fn test_load_rubric_from_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"columns": ["Criterion"], "rows": [["Greeting"]]}}"#).unwrap();
        let table = load_rubric(file.path()).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_load_rubric_invalid_document() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        write!(file, "just a string").unwrap();
        let err = load_rubric(file.path()).unwrap_err();
        assert!(matches!(err, RubricError::Parse { .. }));
    }

    #[test]
    fn test_load_rubric_empty_file() {
        let file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        let err = load_rubric(file.path()).unwrap_err();
        assert!(matches!(err, RubricError::Empty { .. }));
    }

    #[test]
    fn test_load_rubric_comment_only_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        write!(file, "# criteria go here\n\n  # later\n").unwrap();
        let err = load_rubric(file.path()).unwrap_err();
        assert!(matches!(err, RubricError::Empty { .. }));
        assert!(err.to_string().contains("is empty"));
    }

    #[test]
    fn test_load_rubric_blank_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "  \n").unwrap();
        let err = load_rubric(file.path()).unwrap_err();
        assert!(matches!(err, RubricError::Empty { .. }));
    }
}
