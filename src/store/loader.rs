//! CSV corpus loader.

use std::path::Path;

use super::FaqEntry;
use crate::error::StoreError;

const QUESTION_COLUMN: &str = "Question";
const ANSWER_COLUMN: &str = "Answer";

/// Reads a FAQ corpus with `Question` and `Answer` columns.
///
/// Each row becomes `"Q: {question}\nA: {answer}"`. Rows where both fields are
/// blank are skipped. Extra columns are ignored.
pub fn load_faq_csv(path: &Path) -> Result<Vec<FaqEntry>, StoreError> {
    let file = std::fs::File::open(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(file);

    let csv_error = |e: csv::Error| StoreError::Csv {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let headers = reader.headers().map_err(csv_error)?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| StoreError::MissingColumn {
                path: path.to_path_buf(),
                column: name.to_string(),
            })
    };
    let question_idx = column(QUESTION_COLUMN)?;
    let answer_idx = column(ANSWER_COLUMN)?;

    let mut entries = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(csv_error)?;
        let question = record.get(question_idx).unwrap_or_default();
        let answer = record.get(answer_idx).unwrap_or_default();

        if question.is_empty() && answer.is_empty() {
            continue;
        }

        entries.push(
            FaqEntry::new(format!("Q: {question}\nA: {answer}"))
                .with_metadata("row", row.to_string())
                .with_metadata("question", question),
        );
    }

    Ok(entries)
}
