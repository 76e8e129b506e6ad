//! Member classification for the return-value rule family

use doccop_syntax::DeclarationKind;

/// Whether a `<returns>` element is permitted on this kind of member
///
/// Methods and delegates may document a return value unless they return
/// `void`. Properties and indexers never may; they document their value
/// with `<value>`. Everything else is outside the rule family and is
/// treated as permitted, so nothing is reported for it.
pub fn may_document_return_value(kind: &DeclarationKind) -> bool {
    match kind {
        DeclarationKind::Method { return_type } | DeclarationKind::Delegate { return_type } => {
            !return_type.is_void()
        }
        DeclarationKind::Property { .. } | DeclarationKind::Indexer { .. } => false,
        DeclarationKind::Other(_) => true,
    }
}
