//! Parser for the catalog data files.
//!
//! Both files use `::` as the field separator:
//! - books.dat: itemId::title::author::genres
//! - interactions.dat: userId::itemId::kind::timestamp
//!
//! Blank lines and lines starting with `#` are skipped.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use std::path::Path;

const SEPARATOR: &str = "::";

fn read_lines(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(DataLoadError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    Ok(content.lines().map(|s| s.to_string()).collect())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn is_skippable(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

fn parse_id(value: &str, field: &str, file: &str, line: usize) -> Result<u32> {
    value.trim().parse::<u32>().map_err(|e| DataLoadError::ParseError {
        file: file.to_string(),
        line,
        reason: format!("invalid {} '{}': {}", field, value, e),
    })
}

/// Parse one books.dat line
///
/// Format: itemId::title::author::genres (genres may be empty)
pub fn parse_item_line(line: &str, file: &str, line_no: usize) -> Result<CatalogItem> {
    let parts: Vec<&str> = line.split(SEPARATOR).collect();
    if parts.len() != 4 {
        return Err(DataLoadError::FieldCountMismatch {
            file: file.to_string(),
            line: line_no,
            expected: 4,
            found: parts.len(),
        });
    }

    let id = parse_id(parts[0], "item id", file, line_no)?;
    let title = parts[1].trim();
    if title.is_empty() {
        return Err(DataLoadError::ParseError {
            file: file.to_string(),
            line: line_no,
            reason: "empty title".to_string(),
        });
    }

    Ok(CatalogItem::new(id, title, parts[2].trim(), parts[3].trim()))
}

/// Parse one interactions.dat line
///
/// Format: userId::itemId::kind::timestamp
pub fn parse_interaction_line(
    line: &str,
    file: &str,
    line_no: usize,
) -> Result<InteractionRecord> {
    let parts: Vec<&str> = line.split(SEPARATOR).collect();
    if parts.len() != 4 {
        return Err(DataLoadError::FieldCountMismatch {
            file: file.to_string(),
            line: line_no,
            expected: 4,
            found: parts.len(),
        });
    }

    let user_id = parse_id(parts[0], "user id", file, line_no)?;
    let item_id = parse_id(parts[1], "item id", file, line_no)?;
    let kind: InteractionKind = parts[2].parse()?;
    let timestamp = parts[3]
        .trim()
        .parse::<i64>()
        .map_err(|e| DataLoadError::ParseError {
            file: file.to_string(),
            line: line_no,
            reason: format!("invalid timestamp '{}': {}", parts[3], e),
        })?;

    Ok(InteractionRecord::new(user_id, item_id, kind, timestamp))
}

/// Parse the books.dat file
pub fn parse_items(path: &Path) -> Result<Vec<CatalogItem>> {
    let file = file_name(path);
    read_lines(path)?
        .iter()
        .enumerate()
        .filter(|(_, line)| !is_skippable(line))
        .map(|(idx, line)| parse_item_line(line, &file, idx + 1))
        .collect()
}

/// Parse the interactions.dat file
pub fn parse_interactions(path: &Path) -> Result<Vec<InteractionRecord>> {
    let file = file_name(path);
    read_lines(path)?
        .iter()
        .enumerate()
        .filter(|(_, line)| !is_skippable(line))
        .map(|(idx, line)| parse_interaction_line(line, &file, idx + 1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_item_line() {
        let item = parse_item_line("12::The Left Hand of Darkness::Ursula K. Le Guin::Sci-Fi, Classic", "books.dat", 1)
            .unwrap();
        assert_eq!(item.id, 12);
        assert_eq!(item.title, "The Left Hand of Darkness");
        assert_eq!(item.author, "Ursula K. Le Guin");
        assert_eq!(item.genres, "Sci-Fi, Classic");
    }

    #[test]
    fn test_parse_item_line_empty_genres() {
        let item = parse_item_line("3::Untagged::Anon::", "books.dat", 1).unwrap();
        assert_eq!(item.genres, "");
    }

    #[test]
    fn test_parse_item_line_wrong_field_count() {
        let err = parse_item_line("3::Only Title", "books.dat", 9).unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::FieldCountMismatch { expected: 4, found: 2, line: 9, .. }
        ));
    }

    #[test]
    fn test_parse_interaction_line() {
        let record = parse_interaction_line("5::12::Disliked::1700000000", "interactions.dat", 1)
            .unwrap();
        assert_eq!(record.user_id, 5);
        assert_eq!(record.item_id, 12);
        assert_eq!(record.kind, InteractionKind::Disliked);
        assert_eq!(record.timestamp, 1_700_000_000);
    }

    #[test]
    fn test_parse_interaction_line_bad_kind() {
        let err = parse_interaction_line("5::12::shelved::1", "interactions.dat", 4).unwrap_err();
        assert!(matches!(err, DataLoadError::UnknownKind(ref kind) if kind == "shelved"));
    }

    #[test]
    fn test_parse_interaction_line_bad_timestamp() {
        let err = parse_interaction_line("5::12::liked::yesterday", "interactions.dat", 4)
            .unwrap_err();
        assert!(matches!(err, DataLoadError::ParseError { line: 4, .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = parse_items(Path::new("/definitely/not/here/books.dat")).unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound { .. }));
    }
}
