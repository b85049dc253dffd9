//! Dataset file codec
//!
//! Tabular text with a fixed six-column header. Fields containing the
//! separator, quotes, or line breaks are quoted; embedded quotes are
//! doubled. The file is rewritten in full on every save.

use crate::state::{Dataset, FoodRecord};
use crate::storage::{StorageError, StorageResult};
use std::path::Path;

/// The fixed header row, in column order
pub const DATASET_HEADER: [&str; 6] = [
    "Modified Name",
    "Proteins",
    "Carbs",
    "Fats",
    "Fiber",
    "Item Details",
];

/// Writes the full dataset to `path`, header first
pub fn write_dataset(path: &Path, dataset: &Dataset) -> StorageResult<()> {
    let mut out = String::new();
    out.push_str(&encode_row(&DATASET_HEADER));
    out.push('\n');
    for record in dataset.records() {
        out.push_str(&encode_row(&[
            &record.name,
            &record.proteins,
            &record.carbs,
            &record.fats,
            &record.fiber,
            &record.details,
        ]));
        out.push('\n');
    }
    std::fs::write(path, out)?;
    Ok(())
}

/// Reads a dataset file written by [`write_dataset`]
pub fn read_dataset(path: &Path) -> StorageResult<Dataset> {
    let content = std::fs::read_to_string(path)?;
    let mut rows = parse_rows(&content)?.into_iter();

    let header = rows
        .next()
        .ok_or_else(|| StorageError::MalformedDataset("missing header row".to_string()))?;
    if header != DATASET_HEADER {
        return Err(StorageError::MalformedDataset(format!(
            "unexpected header: {header:?}"
        )));
    }

    let mut dataset = Dataset::new();
    for (line, row) in rows.enumerate() {
        let [name, proteins, carbs, fats, fiber, details]: [String; 6] =
            row.try_into().map_err(|row: Vec<String>| {
                StorageError::MalformedDataset(format!(
                    "row {} has {} fields, expected 6",
                    line + 2,
                    row.len()
                ))
            })?;
        dataset.insert(FoodRecord {
            name,
            proteins,
            carbs,
            fats,
            fiber,
            details,
        });
    }
    Ok(dataset)
}

fn encode_row(fields: &[&str]) -> String {
    fields
        .iter()
        .map(|field| encode_field(field))
        .collect::<Vec<_>>()
        .join(",")
}

fn encode_field(field: &str) -> String {
    if field.contains(['"', ',', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Splits the file into rows of fields, honoring quoting
fn parse_rows(input: &str) -> StorageResult<Vec<Vec<String>>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' if field.is_empty() => in_quotes = true,
            ',' => row.push(std::mem::take(&mut field)),
            '\r' | '\n' => {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                row.push(std::mem::take(&mut field));
                // A bare newline between rows is not a record
                if row.len() > 1 || !row[0].is_empty() {
                    rows.push(std::mem::take(&mut row));
                } else {
                    row.clear();
                }
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(StorageError::MalformedDataset(
            "unterminated quoted field".to_string(),
        ));
    }

    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(name: &str, details: &str) -> FoodRecord {
        FoodRecord {
            name: name.to_string(),
            proteins: "10g".to_string(),
            carbs: "20g".to_string(),
            fats: "5g".to_string(),
            fiber: "3g".to_string(),
            details: details.to_string(),
        }
    }

    fn roundtrip(dataset: &Dataset) -> Dataset {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dataset.csv");
        write_dataset(&path, dataset).unwrap();
        read_dataset(&path).unwrap()
    }

    #[test]
    fn test_header_written_first() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dataset.csv");
        write_dataset(&path, &Dataset::new()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content.lines().next().unwrap(),
            "Modified Name,Proteins,Carbs,Fats,Fiber,Item Details"
        );
    }

    #[test]
    fn test_roundtrip_plain_fields() {
        let mut dataset = Dataset::new();
        dataset.insert(record("Oats", "1 bowl (40g)"));
        dataset.insert(record("Banana", "1 medium"));

        assert_eq!(roundtrip(&dataset), dataset);
    }

    #[test]
    fn test_roundtrip_fields_with_commas_and_quotes() {
        let mut dataset = Dataset::new();
        dataset.insert(record("Almonds, roasted", "1 cup, chopped"));
        dataset.insert(record("Cheese \"extra sharp\"", "2 slices"));

        assert_eq!(roundtrip(&dataset), dataset);
    }

    #[test]
    fn test_roundtrip_field_with_newline() {
        let mut dataset = Dataset::new();
        dataset.insert(record("Trail mix", "per pack:\nnuts and raisins"));

        assert_eq!(roundtrip(&dataset), dataset);
    }

    #[test]
    fn test_rejects_wrong_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dataset.csv");
        std::fs::write(&path, "Name,Proteins\nOats,10g\n").unwrap();

        assert!(matches!(
            read_dataset(&path),
            Err(StorageError::MalformedDataset(_))
        ));
    }

    #[test]
    fn test_rejects_short_row() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dataset.csv");
        std::fs::write(
            &path,
            "Modified Name,Proteins,Carbs,Fats,Fiber,Item Details\nOats,10g\n",
        )
        .unwrap();

        assert!(matches!(
            read_dataset(&path),
            Err(StorageError::MalformedDataset(_))
        ));
    }

    #[test]
    fn test_rejects_unterminated_quote() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dataset.csv");
        std::fs::write(
            &path,
            "Modified Name,Proteins,Carbs,Fats,Fiber,Item Details\n\"Oats,10g,20g,5g,3g,x\n",
        )
        .unwrap();

        assert!(matches!(
            read_dataset(&path),
            Err(StorageError::MalformedDataset(_))
        ));
    }

    #[test]
    fn test_blank_lines_are_ignored() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dataset.csv");
        std::fs::write(
            &path,
            "Modified Name,Proteins,Carbs,Fats,Fiber,Item Details\n\nOats,10g,20g,5g,3g,x\n\n",
        )
        .unwrap();

        let dataset = read_dataset(&path).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.records()[0].name, "Oats");
    }
}
