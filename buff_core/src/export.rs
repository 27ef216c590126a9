//! Registry export - one flat row per buff definition

use crate::registry::{BuffDefinition, BuffRegistry};
use crate::types::BuffId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// CSV header, in column order
pub const CSV_HEADER: &str =
    "id,display_name,internal_name,base_duration,max_stack,exclusion_tag,allow_extension,is_beneficial";

const INFINITE_LABEL: &str = "Infinite";
const NO_TAG_LABEL: &str = "None";
const COLUMN_COUNT: usize = 8;

/// Failure to read back an exported row
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    #[error("Expected 8 columns, found {0}")]
    ColumnCount(usize),
    #[error("Invalid {column}: {value:?}")]
    InvalidValue { column: &'static str, value: String },
    #[error("Unterminated quoted field")]
    UnterminatedQuote,
}

/// Flat snapshot of one registry entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    pub id: BuffId,
    pub display_name: String,
    pub internal_name: String,
    /// `None` for buffs without a natural expiry
    pub base_duration: Option<f64>,
    pub max_stack: u32,
    pub exclusion_tag: Option<String>,
    pub allow_extension: bool,
    pub is_beneficial: bool,
}

impl ExportRow {
    pub fn from_definition(definition: &BuffDefinition) -> Self {
        ExportRow {
            id: definition.id(),
            display_name: definition.display_name().to_string(),
            internal_name: definition.internal_name().to_string(),
            base_duration: (!definition.is_infinite()).then(|| definition.base_duration()),
            max_stack: definition.max_stack(),
            exclusion_tag: definition.exclusion_tag().map(str::to_string),
            allow_extension: definition.allow_extension,
            is_beneficial: definition.is_beneficial,
        }
    }

    /// Render as a CSV line (without trailing newline)
    pub fn to_csv_line(&self) -> String {
        let duration = match self.base_duration {
            Some(seconds) => format!("{:.1}", seconds),
            None => INFINITE_LABEL.to_string(),
        };
        let tag = self.exclusion_tag.as_deref().unwrap_or(NO_TAG_LABEL);

        [
            self.id.to_string(),
            escape_field(&self.display_name),
            escape_field(&self.internal_name),
            duration,
            self.max_stack.to_string(),
            escape_tag(tag),
            self.allow_extension.to_string(),
            self.is_beneficial.to_string(),
        ]
        .join(",")
    }

    /// Parse a line produced by [`to_csv_line`](ExportRow::to_csv_line)
    pub fn parse_csv_line(line: &str) -> Result<Self, ExportError> {
        let fields = split_fields(line)?;
        if fields.len() != COLUMN_COUNT {
            return Err(ExportError::ColumnCount(fields.len()));
        }

        let base_duration = match fields[3].text.as_str() {
            INFINITE_LABEL => None,
            value => Some(parse_column("base_duration", value)?),
        };
        // A quoted label is a real tag that happens to spell the label
        let tag = &fields[5];
        let exclusion_tag = match (tag.text.as_str(), tag.quoted) {
            (NO_TAG_LABEL | "", false) => None,
            (value, _) => Some(value.to_string()),
        };

        Ok(ExportRow {
            id: parse_column("id", &fields[0].text)?,
            display_name: fields[1].text.clone(),
            internal_name: fields[2].text.clone(),
            base_duration,
            max_stack: parse_column("max_stack", &fields[4].text)?,
            exclusion_tag,
            allow_extension: parse_column("allow_extension", &fields[6].text)?,
            is_beneficial: parse_column("is_beneficial", &fields[7].text)?,
        })
    }
}

/// Rows for every registry entry, ordered by id
pub fn export_rows(registry: &BuffRegistry) -> Vec<ExportRow> {
    registry.sorted().into_iter().map(ExportRow::from_definition).collect()
}

/// Render the registry as CSV with a header line
pub fn export_csv(registry: &BuffRegistry) -> String {
    let mut out = String::with_capacity(64 * (registry.len() + 1));
    out.push_str(CSV_HEADER);
    out.push('\n');
    for row in export_rows(registry) {
        out.push_str(&row.to_csv_line());
        out.push('\n');
    }
    out
}

/// Render the registry as a pretty-printed JSON array
pub fn export_json(registry: &BuffRegistry) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&export_rows(registry))
}

/// Parse CSV produced by [`export_csv`], skipping the header and blank lines
///
/// Records end at line breaks outside quoted fields, so quoted names may
/// span several lines.
pub fn parse_csv(content: &str) -> Result<Vec<ExportRow>, ExportError> {
    split_records(content)?
        .iter()
        .filter(|record| !record.trim().is_empty() && record.as_str() != CSV_HEADER)
        .map(|record| ExportRow::parse_csv_line(record))
        .collect()
}

fn parse_column<T: std::str::FromStr>(column: &'static str, value: &str) -> Result<T, ExportError> {
    value.parse().map_err(|_| ExportError::InvalidValue {
        column,
        value: value.to_string(),
    })
}

/// Quote a field containing a separator, quote or line break
fn escape_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Quote tags that would otherwise read back as "no tag"
fn escape_tag(tag: &str) -> String {
    if tag == NO_TAG_LABEL {
        format!("\"{}\"", tag)
    } else {
        escape_field(tag)
    }
}

/// Split CSV content into records, keeping line breaks inside quotes
fn split_records(content: &str) -> Result<Vec<String>, ExportError> {
    let mut records = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in content.chars() {
        match (c, in_quotes) {
            // Doubled quotes toggle twice and leave the state unchanged
            ('"', _) => {
                in_quotes = !in_quotes;
                current.push(c);
            }
            ('\n', false) => records.push(std::mem::take(&mut current)),
            ('\r', false) => {}
            _ => current.push(c),
        }
    }

    if in_quotes {
        return Err(ExportError::UnterminatedQuote);
    }
    if !current.is_empty() {
        records.push(current);
    }
    Ok(records)
}

/// One parsed CSV field
#[derive(Debug, Default)]
struct Field {
    text: String,
    quoted: bool,
}

fn split_fields(line: &str) -> Result<Vec<Field>, ExportError> {
    let mut fields = Vec::with_capacity(COLUMN_COUNT);
    let mut current = Field::default();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, in_quotes) {
            ('"', true) if chars.peek() == Some(&'"') => {
                current.text.push('"');
                chars.next();
            }
            ('"', true) => in_quotes = false,
            ('"', false) if current.text.is_empty() && !current.quoted => {
                in_quotes = true;
                current.quoted = true;
            }
            (',', false) => fields.push(std::mem::take(&mut current)),
            _ => current.text.push(c),
        }
    }

    if in_quotes {
        return Err(ExportError::UnterminatedQuote);
    }
    fields.push(current);
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> BuffRegistry {
        let mut registry = BuffRegistry::new();
        registry.add_seed(
            BuffDefinition::new(1011, "1011_Buff_AddSpeed", "Haste", 120.0, 1)
                .with_allow_extension(true)
                .with_beneficial(true),
        );
        registry.add_seed(BuffDefinition::new(1002, "1002_Buff_BleedUnlimit", "Bleeding", -1.0, 5).with_tag(Some("Bleeding")));
        registry.add_seed(BuffDefinition::new(7000, "7000_Mod", "Slow, Heavy \"Mud\"", 2.5, 2));
        registry
    }

    #[test]
    fn test_csv_layout() {
        let csv = export_csv(&registry());
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines[1], "1002,Bleeding,1002_Buff_BleedUnlimit,Infinite,5,Bleeding,false,false");
        assert_eq!(lines[2], "1011,Haste,1011_Buff_AddSpeed,120.0,1,None,true,true");
        assert_eq!(lines[3], "7000,\"Slow, Heavy \"\"Mud\"\"\",7000_Mod,2.5,2,None,false,false");
    }

    #[test]
    fn test_csv_round_trip() {
        let registry = registry();
        let rows = parse_csv(&export_csv(&registry)).unwrap();
        assert_eq!(rows.len(), registry.len());

        for row in &rows {
            let definition = registry.lookup(row.id).unwrap();
            assert_eq!(row.base_duration.is_none(), definition.is_infinite());
            assert_eq!(row.allow_extension, definition.allow_extension);
            assert_eq!(row.is_beneficial, definition.is_beneficial);
            assert_eq!(row.display_name, definition.display_name());
        }
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(ExportRow::parse_csv_line("1,2,3"), Err(ExportError::ColumnCount(3)));
        assert_eq!(
            ExportRow::parse_csv_line("x,a,b,1.0,1,None,true,false"),
            Err(ExportError::InvalidValue {
                column: "id",
                value: "x".to_string()
            })
        );
        assert_eq!(
            ExportRow::parse_csv_line("1,\"open,b,1.0,1,None,true,false"),
            Err(ExportError::UnterminatedQuote)
        );
    }

    #[test]
    fn test_json_export() {
        let json = export_json(&registry()).unwrap();
        let rows: Vec<ExportRow> = serde_json::from_str(&json).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].base_duration, None);
        assert_eq!(rows[1].base_duration, Some(120.0));
    }

    #[test]
    fn test_multiline_name_round_trip() {
        let mut registry = BuffRegistry::new();
        registry.add_seed(BuffDefinition::new(7001, "7001_Mod", "Two\nLines", 5.0, 1));
        registry.add_seed(BuffDefinition::new(7002, "7002_Mod", "Carriage\r\nReturn", 6.0, 1));

        let csv = export_csv(&registry);
        let rows = parse_csv(&csv).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].display_name, "Two\nLines");
        assert_eq!(rows[1].display_name, "Carriage\r\nReturn");
        assert_eq!(rows[1].base_duration, Some(6.0));
    }

    #[test]
    fn test_crlf_line_endings() {
        let csv = export_csv(&registry()).replace('\n', "\r\n");
        let rows = parse_csv(&csv).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].id, 1011);
        assert!(rows[1].is_beneficial);
        assert_eq!(rows[2].display_name, "Slow, Heavy \"Mud\"");
    }

    #[test]
    fn test_tag_spelling_label_round_trip() {
        let mut registry = BuffRegistry::new();
        registry.add_seed(BuffDefinition::new(7003, "7003_Mod", "Odd", 5.0, 1).with_tag(Some("None")));
        registry.add_seed(BuffDefinition::new(7004, "7004_Mod", "Plain", 5.0, 1));

        let csv = export_csv(&registry);
        assert!(csv.contains("7003,Odd,7003_Mod,5.0,1,\"None\",false,false"));

        let rows = parse_csv(&csv).unwrap();
        assert_eq!(rows[0].exclusion_tag.as_deref(), Some("None"));
        assert_eq!(rows[1].exclusion_tag, None);
    }

    #[test]
    fn test_empty_registry() {
        let csv = export_csv(&BuffRegistry::new());
        assert_eq!(csv, format!("{}\n", CSV_HEADER));
    }
}
