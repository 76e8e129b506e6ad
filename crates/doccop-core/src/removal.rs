//! Removal planning for documentation elements
//!
//! Deleting an element should leave the comment looking as if the element
//! had never been written. What has to go besides the element itself
//! depends on what shares its line:
//!
//! - alone on its line (only a `///` or `*` marker before it): the whole
//!   line, terminator included. A `/**` opener counts as content and stays.
//! - after other content: the element, the whitespace before it, and
//!   anything blank up to the line terminator
//! - before other content: the element and the whitespace after it
//!
//! Spans that do not look like an element fall back to deleting exactly
//! the span.

use mago_database::file::FileId;

use crate::edit::Edit;

/// How an element sits on its line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalLayout {
    OwnLine,
    TrailingOnLine,
    LeadingOnLine,
    Minimal,
}

/// Byte range to delete for one element (or one run of adjacent elements)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Removal {
    pub layout: RemovalLayout,
    pub start: usize,
    pub end: usize,
}

impl Removal {
    pub fn to_edit(self, file_id: FileId, message: impl Into<String>) -> Edit {
        Edit::delete(file_id, self.start, self.end, message)
    }
}

/// Decide what to delete so that `start..end` disappears cleanly
pub fn plan_removal(source: &str, start: usize, end: usize) -> Removal {
    let minimal = Removal {
        layout: RemovalLayout::Minimal,
        start,
        end,
    };

    if start >= end
        || end > source.len()
        || !source.is_char_boundary(start)
        || !source.is_char_boundary(end)
        || !source[start..].starts_with('<')
    {
        return minimal;
    }

    let line_start = source[..start].rfind('\n').map_or(0, |i| i + 1);
    let newline = source[end..].find('\n').map(|i| end + i);
    let text_end = match newline {
        Some(nl) if nl > end && source.as_bytes()[nl - 1] == b'\r' => nl - 1,
        Some(nl) => nl,
        None => source.len(),
    };

    let before = &source[line_start..start];
    let after = &source[end..text_end];

    if !is_blank(after) {
        let trailing = after.len() - after.trim_start_matches([' ', '\t']).len();
        return Removal {
            layout: RemovalLayout::LeadingOnLine,
            start,
            end: end + trailing,
        };
    }

    if is_marker_only(before) {
        return match newline {
            Some(nl) => Removal {
                layout: RemovalLayout::OwnLine,
                start: line_start,
                end: nl + 1,
            },
            // Last line without terminator: take the previous line break instead
            None => Removal {
                layout: RemovalLayout::OwnLine,
                start: previous_line_break(source, line_start),
                end: source.len(),
            },
        };
    }

    let leading = before.len() - before.trim_end_matches([' ', '\t']).len();
    Removal {
        layout: RemovalLayout::TrailingOnLine,
        start: start - leading,
        end: text_end,
    }
}

/// Plan removals for many elements of one comment
///
/// Elements separated only by spaces or tabs are removed as one run, so
/// that `<returns/><returns/>` on its own line drops the line once instead
/// of producing two overlapping deletions.
pub fn plan_removals(source: &str, ranges: &[(usize, usize)]) -> Vec<Removal> {
    let mut sorted = ranges.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut runs: Vec<(usize, usize)> = Vec::new();
    for (start, end) in sorted {
        match runs.last_mut() {
            Some(run) if start >= run.1 && source.get(run.1..start).is_some_and(is_horizontal_space) => {
                run.1 = end;
            }
            Some(run) if start < run.1 => {
                run.1 = run.1.max(end);
            }
            _ => runs.push((start, end)),
        }
    }

    runs.into_iter()
        .map(|(start, end)| plan_removal(source, start, end))
        .collect()
}

fn is_blank(text: &str) -> bool {
    text.chars().all(char::is_whitespace)
}

fn is_horizontal_space(text: &str) -> bool {
    text.bytes().all(|b| b == b' ' || b == b'\t')
}

fn is_marker_only(prefix: &str) -> bool {
    matches!(prefix.trim(), "" | "///" | "*")
}

fn previous_line_break(source: &str, line_start: usize) -> usize {
    if line_start == 0 {
        return 0;
    }
    let nl = line_start - 1;
    if nl > 0 && source.as_bytes()[nl - 1] == b'\r' {
        nl - 1
    } else {
        nl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::apply_edits;

    fn remove(source: &str, needle: &str) -> (RemovalLayout, String) {
        let start = source.find(needle).unwrap();
        let removal = plan_removal(source, start, start + needle.len());
        let edit = removal.to_edit(FileId::zero(), "remove");
        (removal.layout, apply_edits(source, &[edit]).unwrap())
    }

    #[test]
    fn test_own_line() {
        let source = "    /// <summary>Foo</summary>\n    /// <returns>null</returns>\n    void M() { }\n";
        let (layout, fixed) = remove(source, "<returns>null</returns>");
        assert_eq!(layout, RemovalLayout::OwnLine);
        assert_eq!(fixed, "    /// <summary>Foo</summary>\n    void M() { }\n");
    }

    #[test]
    fn test_own_line_crlf() {
        let source = "/// <summary/>\r\n/// <returns/>\r\nvoid M();\r\n";
        let (layout, fixed) = remove(source, "<returns/>");
        assert_eq!(layout, RemovalLayout::OwnLine);
        assert_eq!(fixed, "/// <summary/>\r\nvoid M();\r\n");
    }

    #[test]
    fn test_own_line_spanning_lines() {
        let source = "/// <summary/>\n/// <returns>\n/// null\n/// </returns>\nvoid M();";
        let (layout, fixed) = remove(source, "<returns>\n/// null\n/// </returns>");
        assert_eq!(layout, RemovalLayout::OwnLine);
        assert_eq!(fixed, "/// <summary/>\nvoid M();");
    }

    #[test]
    fn test_own_line_at_end_of_text() {
        let source = "/// <summary/>\r\n/// <returns/>";
        let (_, fixed) = remove(source, "<returns/>");
        assert_eq!(fixed, "/// <summary/>");
    }

    #[test]
    fn test_trailing_on_line() {
        let source = "    /// <value>\n    /// Foo\n    /// </value><returns>null</returns>\n    public int P { get; }";
        let (layout, fixed) = remove(source, "<returns>null</returns>");
        assert_eq!(layout, RemovalLayout::TrailingOnLine);
        assert_eq!(fixed, "    /// <value>\n    /// Foo\n    /// </value>\n    public int P { get; }");
    }

    #[test]
    fn test_trailing_drops_separating_whitespace() {
        let source = "/// </value>  <returns/>  \nint P;";
        let (_, fixed) = remove(source, "<returns/>");
        assert_eq!(fixed, "/// </value>\nint P;");
    }

    #[test]
    fn test_leading_on_line() {
        let source = "    /// <returns>null</returns> <value>\n    /// Foo\n    /// </value>\n";
        let (layout, fixed) = remove(source, "<returns>null</returns>");
        assert_eq!(layout, RemovalLayout::LeadingOnLine);
        assert_eq!(fixed, "    /// <value>\n    /// Foo\n    /// </value>\n");
    }

    #[test]
    fn test_block_comment_line() {
        let source = "/**\n * <summary/>\n * <returns/>\n */";
        let (layout, fixed) = remove(source, "<returns/>");
        assert_eq!(layout, RemovalLayout::OwnLine);
        assert_eq!(fixed, "/**\n * <summary/>\n */");
    }

    #[test]
    fn test_block_comment_opener_line_is_kept() {
        let source = "    /** <returns/>\n     * <summary/>\n     */\n";
        let (layout, fixed) = remove(source, "<returns/>");
        assert_eq!(layout, RemovalLayout::TrailingOnLine);
        assert_eq!(fixed, "    /**\n     * <summary/>\n     */\n");
    }

    #[test]
    fn test_multiline_element_after_opener() {
        let source = "/** <returns>\n * null\n * </returns>\n * <summary/>\n */";
        let (_, fixed) = remove(source, "<returns>\n * null\n * </returns>");
        assert_eq!(fixed, "/**\n * <summary/>\n */");
    }

    #[test]
    fn test_minimal_fallback() {
        let source = "/// text returns";
        let start = source.find("returns").unwrap();
        let removal = plan_removal(source, start, source.len());
        assert_eq!(removal.layout, RemovalLayout::Minimal);
        assert_eq!((removal.start, removal.end), (start, source.len()));

        assert_eq!(plan_removal(source, 5, 100).layout, RemovalLayout::Minimal);
        assert_eq!(plan_removal(source, 3, 3).layout, RemovalLayout::Minimal);
    }

    #[test]
    fn test_adjacent_elements_form_one_run() {
        let source = "/// <summary/>\n/// <returns/> <returns>x</returns>\nvoid M();";
        let first = source.find("<returns/>").unwrap();
        let second = source.find("<returns>x").unwrap();
        let ranges = [
            (second, second + "<returns>x</returns>".len()),
            (first, first + "<returns/>".len()),
        ];

        let removals = plan_removals(source, &ranges);
        assert_eq!(removals.len(), 1);
        assert_eq!(removals[0].layout, RemovalLayout::OwnLine);

        let edits: Vec<_> = removals
            .into_iter()
            .map(|r| r.to_edit(FileId::zero(), "remove"))
            .collect();
        assert_eq!(apply_edits(source, &edits).unwrap(), "/// <summary/>\nvoid M();");
    }

    #[test]
    fn test_separate_lines_stay_separate() {
        let source = "/// <returns/>\n/// <summary/>\n/// <returns/>\nvoid M();";
        let first = source.find("<returns/>").unwrap();
        let second = source.rfind("<returns/>").unwrap();
        let removals = plan_removals(source, &[(first, first + 10), (second, second + 10)]);
        assert_eq!(removals.len(), 2);

        let edits: Vec<_> = removals
            .into_iter()
            .map(|r| r.to_edit(FileId::zero(), "remove"))
            .collect();
        assert_eq!(apply_edits(source, &edits).unwrap(), "/// <summary/>\nvoid M();");
    }
}
