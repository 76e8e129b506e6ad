//! End-to-end checks for SA1617: analyze, fix, re-analyze

use doccop_core::{apply_edit_groups, apply_edits, Cancellation};
use doccop_rules::{analyze, compute_fix, compute_fix_all, FixError, RuleRegistry};

fn diagnostics(source: &str) -> Vec<doccop_core::Diagnostic> {
    analyze(source, &RuleRegistry::new(), &Cancellation::new()).unwrap()
}

fn fix_all(source: &str) -> String {
    let found = diagnostics(source);
    let group = compute_fix_all(source, &found).unwrap();
    let result = apply_edit_groups(source, &[group]).unwrap();
    assert!(result.skipped.is_empty());
    result.source
}

#[test]
fn fixing_one_diagnostic_removes_only_that_one() {
    let source = "\
public class Widget
{
    /// <summary>Starts it.</summary>
    /// <returns>nothing</returns>
    public void Start() { }

    /// <summary>Stops it.</summary>
    /// <returns>nothing</returns>
    public void Stop() { }
}
";
    let before = diagnostics(source);
    assert_eq!(before.len(), 2);

    let edit = compute_fix(source, &before[0]).unwrap();
    let fixed = apply_edits(source, &[edit]).unwrap();

    let after = diagnostics(&fixed);
    assert_eq!(after.len(), 1);
    assert_eq!(after[0].line, 7);
    assert!(fixed.contains("/// <summary>Starts it.</summary>\n    public void Start()"));
}

#[test]
fn fix_all_is_idempotent() {
    let source = "\
namespace Demo
{
    /// <summary>A handler.</summary>
    /// <returns>ignored</returns>
    public delegate void Handler(object sender);

    public interface IShape
    {
        /// <summary>Area.</summary>
        /// <value>The area.</value><returns>a number</returns>
        double Area { get; }

        /// <returns>the index</returns> <summary>Item.</summary>
        int this[int i] { get; }

        /// <returns>kept</returns>
        double Scale(double factor);
    }
}
";
    let fixed = fix_all(source);
    assert!(diagnostics(&fixed).is_empty());
    assert_eq!(fix_all(&fixed), fixed);

    assert!(fixed.contains("/// <value>The area.</value>\n        double Area"));
    assert!(fixed.contains("/// <summary>Item.</summary>\n        int this[int i]"));
    assert!(fixed.contains("/// <returns>kept</returns>"));
    assert!(!fixed.contains("ignored"));
}

#[test]
fn crlf_line_endings_are_preserved() {
    let source = "class C\r\n{\r\n    /// <summary/>\r\n    /// <returns/>\r\n    void M() { }\r\n}\r\n";
    let fixed = fix_all(source);
    assert_eq!(fixed, "class C\r\n{\r\n    /// <summary/>\r\n    void M() { }\r\n}\r\n");
}

#[test]
fn block_doc_comments() {
    let source = "\
class C
{
    /**
     * <summary>Runs.</summary>
     * <returns>nothing</returns>
     */
    void Run() { }
}
";
    let found = diagnostics(source);
    assert_eq!(found.len(), 1);
    assert_eq!((found[0].line, found[0].column), (5, 8));

    let fixed = fix_all(source);
    assert_eq!(
        fixed,
        "class C\n{\n    /**\n     * <summary>Runs.</summary>\n     */\n    void Run() { }\n}\n"
    );
}

#[test]
fn license_header_does_not_hide_members() {
    let source = "\
/*
 * Copyright (c) Contributors.
 */
class C
{
    /// <returns>x</returns>
    void M() { }

    /* not documentation */
    /** <returns>y</returns> */
    void N() { }
}
";
    let found = diagnostics(source);
    assert_eq!(found.len(), 2);
    assert_eq!((found[0].line, found[0].column), (6, 9));
    assert_eq!((found[1].line, found[1].column), (10, 9));
}

#[test]
fn plain_block_comment_breaks_documentation() {
    let source = "\
class C
{
    /// <returns>x</returns>
    /* separate note */
    void M() { }
}
";
    assert!(diagnostics(source).is_empty());
}

#[test]
fn returns_after_block_opener_keeps_opener() {
    let source = "\
class C
{
    /** <returns/>
     * <summary>Runs.</summary>
     */
    void Run() { }
}
";
    let found = diagnostics(source);
    assert_eq!((found[0].line, found[0].column), (3, 9));
    assert_eq!(
        fix_all(source),
        "class C\n{\n    /**\n     * <summary>Runs.</summary>\n     */\n    void Run() { }\n}\n"
    );
}

#[test]
fn stray_end_tag_inside_returns_is_still_reported() {
    let source = "class C\n{\n    /// <returns>x</b></returns>\n    void M() { }\n}\n";
    let found = diagnostics(source);
    assert_eq!(found.len(), 1);
    assert_eq!(fix_all(source), "class C\n{\n    void M() { }\n}\n");
}

#[test]
fn multiline_returns_element() {
    let source = "\
class C
{
    /// <summary/>
    /// <returns>
    /// Nothing at all.
    /// </returns>
    void M() { }
}
";
    assert_eq!(fix_all(source), "class C\n{\n    /// <summary/>\n    void M() { }\n}\n");
}

#[test]
fn ordinary_comment_breaks_documentation() {
    let source = "\
class C
{
    /// <returns>detached</returns>
    // not documentation
    void M() { }
}
";
    assert!(diagnostics(source).is_empty());
}

#[test]
fn quadruple_slash_is_not_documentation() {
    let source = "class C\n{\n    //// <returns/>\n    void M() { }\n}\n";
    assert!(diagnostics(source).is_empty());
}

#[test]
fn attributes_sit_between_docs_and_member() {
    let source = "class C\n{\n    /// <returns/>\n    [Obsolete]\n    public void M() { }\n}\n";
    let found = diagnostics(source);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].line, 3);
}

#[test]
fn malformed_documentation_never_panics() {
    let sources = [
        "class C\n{\n    /// <returns\n    void M() { }\n}\n",
        "class C\n{\n    /// </returns>\n    void M() { }\n}\n",
        "class C\n{\n    /// <returns>unterminated\n    void M() { }\n}\n",
        "class C\n{\n    /// <returns/><summary\n    void M() { }\n}\n",
        "/// <returns/>",
        "void",
    ];
    for source in sources {
        let found = diagnostics(source);
        assert!(found.len() <= 1, "{source:?}");
    }
}

#[test]
fn unterminated_tag_after_returns_still_reports_it() {
    let source = "class C\n{\n    /// <returns/><summary\n    void M() { }\n}\n";
    assert_eq!(diagnostics(source).len(), 1);
}

#[test]
fn stale_diagnostics_leave_the_file_alone() {
    let source = "class C\n{\n    /// <returns/>\n    void M() { }\n}\n";
    let found = diagnostics(source);
    let edited = source.replace("<returns/>", "<remarks/>");

    assert!(matches!(
        compute_fix(&edited, &found[0]),
        Err(FixError::StaleDiagnostic { .. })
    ));
    assert!(compute_fix_all(&edited, &found).is_err());
}
