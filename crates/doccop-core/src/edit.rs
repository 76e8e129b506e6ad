//! Span-based source code editing

use mago_database::file::FileId;
use mago_span::{Position, Span};
use thiserror::Error;

/// Errors that can occur during edit application
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("Overlapping edits detected at offset {0}")]
    OverlappingEdits(usize),

    #[error("Edit span {start}..{end} out of bounds for source length {len}")]
    SpanOutOfBounds { start: usize, end: usize, len: usize },

    #[error("Edit span {start}..{end} does not fall on character boundaries")]
    NotCharBoundary { start: usize, end: usize },
}

/// Represents a single code edit operation
#[derive(Debug, Clone, PartialEq)]
pub struct Edit {
    /// The source span to replace
    pub span: Span,
    /// The replacement text
    pub replacement: String,
    /// Human-readable description of the edit
    pub message: String,
}

impl Edit {
    /// Create a new edit
    pub fn new(span: Span, replacement: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            span,
            replacement: replacement.into(),
            message: message.into(),
        }
    }

    /// Create an edit deleting the byte range `start..end`
    pub fn delete(file_id: FileId, start: usize, end: usize, message: impl Into<String>) -> Self {
        let span = Span::new(
            file_id,
            Position::new(start as u32),
            Position::new(end as u32),
        );
        Self::new(span, String::new(), message)
    }

    /// Get the byte offset where this edit starts
    pub fn start_offset(&self) -> usize {
        self.span.start.offset as usize
    }

    /// Get the byte offset where this edit ends
    pub fn end_offset(&self) -> usize {
        self.span.end.offset as usize
    }
}

/// Edits that must be applied together or not at all
#[derive(Debug, Clone, Default)]
pub struct EditGroup {
    /// What the group fixes, e.g. a rule id
    pub label: String,
    pub edits: Vec<Edit>,
}

impl EditGroup {
    pub fn new(label: impl Into<String>, edits: Vec<Edit>) -> Self {
        Self {
            label: label.into(),
            edits,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }
}

/// Outcome of [`apply_edit_groups`]
#[derive(Debug, Clone)]
pub struct GroupedResult {
    /// The modified source code
    pub source: String,
    /// Labels of the groups that were applied
    pub applied: Vec<String>,
    /// Labels of the groups dropped because they conflicted with an earlier group
    pub skipped: Vec<String>,
}

/// Apply edits to source code
///
/// Every offset refers to the original `source`. Edits are applied in
/// reverse order (from end to start) so earlier offsets stay valid.
///
/// # Arguments
/// * `source` - The original source code
/// * `edits` - Slice of edits to apply
///
/// # Returns
/// * `Ok(String)` - The modified source code
/// * `Err(EditError)` - If edits overlap or are out of bounds
pub fn apply_edits(source: &str, edits: &[Edit]) -> Result<String, EditError> {
    if edits.is_empty() {
        return Ok(source.to_string());
    }

    let sorted_edits = validate(source, edits.iter().collect())?;

    // Apply edits from end to start
    let mut result = source.to_string();
    for edit in sorted_edits {
        result.replace_range(edit.start_offset()..edit.end_offset(), &edit.replacement);
    }

    Ok(result)
}

/// Apply groups of edits, each group atomically
///
/// Groups are considered in order. A group whose edits are invalid on
/// their own is an error; a group that only conflicts with an earlier
/// accepted group is skipped and reported in [`GroupedResult::skipped`].
pub fn apply_edit_groups(source: &str, groups: &[EditGroup]) -> Result<GroupedResult, EditError> {
    let mut accepted: Vec<&Edit> = Vec::new();
    let mut applied = Vec::new();
    let mut skipped = Vec::new();

    for group in groups {
        validate(source, group.edits.iter().collect())?;

        let mut candidate = accepted.clone();
        candidate.extend(group.edits.iter());
        if validate(source, candidate).is_ok() {
            accepted.extend(group.edits.iter());
            applied.push(group.label.clone());
        } else {
            skipped.push(group.label.clone());
        }
    }

    let edits: Vec<Edit> = accepted.into_iter().cloned().collect();
    Ok(GroupedResult {
        source: apply_edits(source, &edits)?,
        applied,
        skipped,
    })
}

/// Sort edits by start position (descending) and check bounds and overlap
fn validate<'e>(source: &str, mut edits: Vec<&'e Edit>) -> Result<Vec<&'e Edit>, EditError> {
    edits.sort_by(|a, b| {
        b.start_offset()
            .cmp(&a.start_offset())
            .then(b.end_offset().cmp(&a.end_offset()))
    });

    let source_len = source.len();
    let mut prev_start: Option<usize> = None;

    for edit in &edits {
        let start = edit.start_offset();
        let end = edit.end_offset();

        if end > source_len || start > end {
            return Err(EditError::SpanOutOfBounds {
                start,
                end,
                len: source_len,
            });
        }

        if !source.is_char_boundary(start) || !source.is_char_boundary(end) {
            return Err(EditError::NotCharBoundary { start, end });
        }

        if let Some(prev) = prev_start {
            if end > prev {
                return Err(EditError::OverlappingEdits(start));
            }
        }

        prev_start = Some(start);
    }

    Ok(edits)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_span(start: u32, end: u32) -> Span {
        let file_id = FileId::zero();
        Span::new(file_id, Position::new(start), Position::new(end))
    }

    #[test]
    fn test_simple_replacement() {
        let source = "/// <returns>null</returns>";
        let edit = Edit::new(make_span(4, 27), "<value/>", "Replace returns");

        let result = apply_edits(source, &[edit]).unwrap();
        assert_eq!(result, "/// <value/>");
    }

    #[test]
    fn test_multiple_edits_use_original_offsets() {
        let source = "a <returns/> b <returns/> c";
        let edits = vec![
            Edit::new(make_span(2, 13), "", "first"),
            Edit::new(make_span(15, 26), "", "second"),
        ];

        let result = apply_edits(source, &edits).unwrap();
        assert_eq!(result, "a b c");
    }

    #[test]
    fn test_deletion_keeps_surrounding_whitespace_untouched() {
        let source = "    /// x\n    /// y\n";
        let edit = Edit::delete(FileId::zero(), 0, 10, "drop line");

        let result = apply_edits(source, &[edit]).unwrap();
        assert_eq!(result, "    /// y\n");
    }

    #[test]
    fn test_empty_edits() {
        let source = "unchanged";
        let result = apply_edits(source, &[]).unwrap();
        assert_eq!(result, "unchanged");
    }

    #[test]
    fn test_out_of_bounds() {
        let source = "short";
        let edit = Edit::new(make_span(0, 100), "replacement", "oob");

        let result = apply_edits(source, &[edit]);
        assert!(matches!(result, Err(EditError::SpanOutOfBounds { .. })));
    }

    #[test]
    fn test_overlapping_edits_rejected() {
        let source = "0123456789";
        let edits = vec![
            Edit::new(make_span(0, 5), "", "a"),
            Edit::new(make_span(3, 8), "", "b"),
        ];

        let result = apply_edits(source, &edits);
        assert!(matches!(result, Err(EditError::OverlappingEdits(_))));
    }

    #[test]
    fn test_adjacent_edits_allowed() {
        let source = "0123456789";
        let edits = vec![
            Edit::new(make_span(0, 5), "", "a"),
            Edit::new(make_span(5, 8), "", "b"),
        ];

        assert_eq!(apply_edits(source, &edits).unwrap(), "89");
    }

    #[test]
    fn test_edit_groups_skip_conflicting_group() {
        let source = "0123456789";
        let groups = vec![
            EditGroup::new("first", vec![Edit::new(make_span(0, 2), "", "a")]),
            EditGroup::new(
                "second",
                vec![
                    Edit::new(make_span(1, 3), "", "b"),
                    Edit::new(make_span(8, 10), "", "c"),
                ],
            ),
            EditGroup::new("third", vec![Edit::new(make_span(4, 5), "x", "d")]),
        ];

        let result = apply_edit_groups(source, &groups).unwrap();
        assert_eq!(result.source, "23x56789");
        assert_eq!(result.applied, vec!["first", "third"]);
        assert_eq!(result.skipped, vec!["second"]);
    }
}
