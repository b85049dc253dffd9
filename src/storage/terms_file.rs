//! Processed-terms file codec
//!
//! One raw term per line, no header, order not significant. Rewritten in
//! full on every save.

use crate::state::ProcessedTermSet;
use crate::storage::{StorageError, StorageResult};
use crate::terms::SearchTerm;
use std::path::Path;

/// Writes every processed term to `path`, one per line
pub fn write_terms(path: &Path, processed: &ProcessedTermSet) -> StorageResult<()> {
    let mut out = String::new();
    for term in processed.iter() {
        out.push_str(term.as_str());
        out.push('\n');
    }
    std::fs::write(path, out)?;
    Ok(())
}

/// Reads a processed-terms file written by [`write_terms`]
pub fn read_terms(path: &Path) -> StorageResult<ProcessedTermSet> {
    let content = std::fs::read_to_string(path)?;
    let mut processed = ProcessedTermSet::new();
    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let term: SearchTerm = line.parse().map_err(|e| {
            StorageError::MalformedTerms(format!("line {}: {e}", line_no + 1))
        })?;
        processed.mark_processed(term);
    }
    Ok(processed)
}
