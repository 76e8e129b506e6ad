//! Rule SA1617: Void return value must not be documented
//!
//! Reports every `<returns>` element in the documentation of a member that
//! has no return value: a `void` method, a `void` delegate, a property or
//! an indexer (the latter two document their value with `<value>`).
//! Documentation that defers to `<inheritdoc/>` is left alone.
//!
//! The fix deletes the element together with whatever would otherwise be
//! left orphaned on its line.

use doccop_core::{plan_removal, plan_removals, Cancelled, Diagnostic, DocComment, Edit, Visitor};
use doccop_syntax::{documentation_trivia, Declaration, TypeRef};
use mago_span::{Position, Span};

use crate::classify::may_document_return_value;
use crate::registry::{CheckContext, FixError, Rule};

pub const RULE_ID: &str = "SA1617";
pub const MESSAGE: &str = "Void return value must not be documented";
const HELP: &str =
    "https://github.com/DotNetAnalyzers/StyleCopAnalyzers/blob/master/documentation/SA1617.md";
const FIX_MESSAGE: &str = "Remove <returns> from member without a return value";

/// Check a parsed file for `<returns>` on members without a return value
pub fn check_void_return_value(ctx: &CheckContext<'_>) -> Result<Vec<Diagnostic>, Cancelled> {
    let mut visitor = VoidReturnValueVisitor {
        ctx,
        diagnostics: Vec::new(),
        cancelled: false,
    };

    doccop_core::visit(&mut visitor, ctx.tree, ctx.source);
    if visitor.cancelled {
        return Err(Cancelled);
    }
    Ok(visitor.diagnostics)
}

struct VoidReturnValueVisitor<'c, 'a> {
    ctx: &'c CheckContext<'a>,
    diagnostics: Vec<Diagnostic>,
    cancelled: bool,
}

impl VoidReturnValueVisitor<'_, '_> {
    fn inspect(&mut self, decl: &Declaration) -> bool {
        if self.ctx.cancellation.is_cancelled() {
            self.cancelled = true;
            return false;
        }

        if may_document_return_value(&decl.kind) {
            return true;
        }

        let Some(trivia) = documentation_trivia(self.ctx.tree, self.ctx.source, decl) else {
            return true;
        };
        let doc = DocComment::from_trivia(self.ctx.source, &trivia);
        if doc.inherits_documentation() {
            return true;
        }

        for element in doc.elements_named("returns") {
            self.diagnostics.push(
                Diagnostic::warning(RULE_ID, MESSAGE, element.span, &self.ctx.lines)
                    .with_help(HELP),
            );
        }
        true
    }
}

impl Visitor for VoidReturnValueVisitor<'_, '_> {
    fn visit_method(&mut self, decl: &Declaration, _return_type: &TypeRef, _source: &str) -> bool {
        self.inspect(decl)
    }

    fn visit_delegate(&mut self, decl: &Declaration, _return_type: &TypeRef, _source: &str) -> bool {
        self.inspect(decl)
    }

    fn visit_property(&mut self, decl: &Declaration, _ty: &TypeRef, _source: &str) -> bool {
        self.inspect(decl)
    }

    fn visit_indexer(&mut self, decl: &Declaration, _ty: &TypeRef, _source: &str) -> bool {
        self.inspect(decl)
    }

    fn visit_other(&mut self, _decl: &Declaration, _source: &str) -> bool {
        if self.ctx.cancellation.is_cancelled() {
            self.cancelled = true;
            return false;
        }
        true
    }
}

/// The byte range of a diagnostic, if it still holds a `<returns>` element
fn returns_range(source: &str, diagnostic: &Diagnostic) -> Result<(usize, usize), FixError> {
    let (start, end) = (diagnostic.start_offset(), diagnostic.end_offset());
    let holds_returns = source
        .get(start..end)
        .and_then(|text| text.strip_prefix("<returns"))
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| c == '>' || c == '/' || c.is_whitespace());

    if holds_returns {
        Ok((start, end))
    } else {
        Err(FixError::StaleDiagnostic {
            line: diagnostic.line,
            column: diagnostic.column,
        })
    }
}

fn deletion(span: Span, start: usize, end: usize) -> Edit {
    let span = Span::new(span.file_id, Position::new(start as u32), Position::new(end as u32));
    Edit::new(span, String::new(), FIX_MESSAGE)
}

pub struct VoidReturnValueRule;

impl Rule for VoidReturnValueRule {
    fn id(&self) -> &'static str {
        RULE_ID
    }

    fn name(&self) -> &'static str {
        "void_return_value"
    }

    fn description(&self) -> &'static str {
        "Void return value must not be documented with <returns>"
    }

    fn check(&self, ctx: &CheckContext<'_>) -> Result<Vec<Diagnostic>, Cancelled> {
        check_void_return_value(ctx)
    }

    fn fix(&self, source: &str, diagnostic: &Diagnostic) -> Result<Edit, FixError> {
        let (start, end) = returns_range(source, diagnostic)?;
        let removal = plan_removal(source, start, end);
        Ok(deletion(diagnostic.span, removal.start, removal.end))
    }

    fn fix_all(&self, source: &str, diagnostics: &[&Diagnostic]) -> Result<Vec<Edit>, FixError> {
        let Some(first) = diagnostics.first() else {
            return Ok(Vec::new());
        };

        let ranges = diagnostics
            .iter()
            .map(|d| returns_range(source, d))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(plan_removals(source, &ranges)
            .into_iter()
            .map(|removal| deletion(first.span, removal.start, removal.end))
            .collect())
    }
}
