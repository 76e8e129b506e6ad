//! doccop-rules: Documentation rule implementations
//!
//! Available rules:
//! - SA1617 (void_return_value): `<returns>` must not document a member
//!   without a return value
//!
//! Entry points:
//! - `analyze()`: run the registry's rules over one file
//! - `compute_fix()`: the edit resolving one diagnostic
//! - `compute_fix_all()`: one atomic edit group resolving every diagnostic of a file

pub mod classify;
pub mod registry;
pub mod void_return_value;

use std::collections::BTreeMap;

use doccop_core::{sort_diagnostics, Cancellation, Cancelled, Diagnostic, Edit, EditGroup};

pub use registry::{builtin_rule, CheckContext, FixError, Rule, RuleRegistry};
pub use void_return_value::{check_void_return_value, VoidReturnValueRule};

/// Analyze one file with every rule in the registry
///
/// Diagnostics come back ordered by position. A cancelled run returns
/// `Err(Cancelled)` and nothing else.
pub fn analyze(
    source: &str,
    registry: &RuleRegistry,
    cancellation: &Cancellation,
) -> Result<Vec<Diagnostic>, Cancelled> {
    cancellation.check()?;

    let tree = doccop_syntax::parse(source);
    let ctx = CheckContext::new(source, &tree, cancellation);

    let mut diagnostics = Vec::new();
    for rule in registry.rules() {
        diagnostics.extend(rule.check(&ctx)?);
    }
    sort_diagnostics(&mut diagnostics);
    Ok(diagnostics)
}

/// Compute the edit resolving a single diagnostic
pub fn compute_fix(source: &str, diagnostic: &Diagnostic) -> Result<Edit, FixError> {
    let rule = builtin_rule(&diagnostic.rule_id)
        .ok_or_else(|| FixError::UnknownRule(diagnostic.rule_id.clone()))?;
    rule.fix(source, diagnostic)
}

/// Compute one edit group resolving every diagnostic of a file
///
/// All edits are planned against `source` as given. If any diagnostic is
/// stale the whole group is refused, so the file is never half-fixed.
pub fn compute_fix_all(source: &str, diagnostics: &[Diagnostic]) -> Result<EditGroup, FixError> {
    let mut by_rule: BTreeMap<&str, Vec<&Diagnostic>> = BTreeMap::new();
    for diagnostic in diagnostics {
        by_rule
            .entry(diagnostic.rule_id.as_str())
            .or_default()
            .push(diagnostic);
    }

    let mut edits = Vec::new();
    for (id, group) in &by_rule {
        let rule = builtin_rule(id).ok_or_else(|| FixError::UnknownRule(id.to_string()))?;
        edits.extend(rule.fix_all(source, group)?);
    }

    let label = by_rule.keys().copied().collect::<Vec<_>>().join(",");
    Ok(EditGroup::new(label, edits))
}
