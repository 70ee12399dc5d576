//! Spreadsheet intake — extracts post titles from an uploaded CSV.
//!
//! The only contract with the uploader is a `title` column (matched
//! case-insensitively). Rows with a blank title are dropped before job
//! creation and never counted toward `total_posts`.

use crate::errors::AppError;

/// One valid spreadsheet row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRow {
    pub title: String,
}

/// Parses CSV bytes into the ordered list of valid rows.
///
/// Fails with a validation error when the `title` column is missing or no row
/// carries a non-blank title.
pub fn parse_rows(data: &[u8]) -> Result<Vec<PostRow>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(data);

    let headers = reader
        .headers()
        .map_err(|e| AppError::Validation(format!("Unreadable spreadsheet: {e}")))?;

    let title_idx = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case("title"))
        .ok_or_else(|| {
            AppError::Validation("Spreadsheet must contain a 'title' column".to_string())
        })?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record =
            record.map_err(|e| AppError::Validation(format!("Unreadable spreadsheet row: {e}")))?;
        let title = record.get(title_idx).unwrap_or("").trim();
        if title.is_empty() {
            continue;
        }
        rows.push(PostRow {
            title: title.to_string(),
        });
    }

    if rows.is_empty() {
        return Err(AppError::Validation(
            "Spreadsheet contains no rows with a title".to_string(),
        ));
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_titles_in_row_order() {
        let csv = b"title,keywords\nFirst Post,a\nSecond Post,b\nThird Post,c\n";
        let rows = parse_rows(csv).unwrap();
        let titles: Vec<&str> = rows.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["First Post", "Second Post", "Third Post"]);
    }

    #[test]
    fn test_title_column_matched_case_insensitively() {
        let csv = b"Keywords,TITLE\nx,Hello World\n";
        let rows = parse_rows(csv).unwrap();
        assert_eq!(rows[0].title, "Hello World");
    }

    #[test]
    fn test_blank_titles_dropped_not_counted() {
        let csv = b"title\nA\n\n   \nB\n";
        let rows = parse_rows(csv).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_missing_title_column_rejected() {
        let csv = b"topic,keywords\nA,b\n";
        let err = parse_rows(csv).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_all_blank_rows_rejected() {
        let csv = b"title\n\n  \n";
        let err = parse_rows(csv).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
