//! Declaration visitor for traversing C# syntax trees
//!
//! Provides a trait-based visitor pattern that rules can implement.
//! Each hook returns `true` to keep going; returning `false` stops the
//! walk, which is how rules bail out on cancellation.

use doccop_syntax::{Declaration, DeclarationKind, SyntaxTree, TypeRef};

/// Trait for visiting declarations
///
/// Default implementations do nothing and continue. Override the hooks
/// for the declaration kinds a rule cares about.
pub trait Visitor {
    /// Called for each method. Return `false` to stop traversal.
    fn visit_method(&mut self, _decl: &Declaration, _return_type: &TypeRef, _source: &str) -> bool {
        true
    }

    /// Called for each delegate type. Return `false` to stop traversal.
    fn visit_delegate(&mut self, _decl: &Declaration, _return_type: &TypeRef, _source: &str) -> bool {
        true
    }

    fn visit_property(&mut self, _decl: &Declaration, _ty: &TypeRef, _source: &str) -> bool {
        true
    }

    fn visit_indexer(&mut self, _decl: &Declaration, _ty: &TypeRef, _source: &str) -> bool {
        true
    }

    /// Types, fields, events, constructors, destructors and operators
    fn visit_other(&mut self, _decl: &Declaration, _source: &str) -> bool {
        true
    }

    /// Dispatch a declaration to its hook
    fn visit_declaration(&mut self, decl: &Declaration, source: &str) -> bool {
        match &decl.kind {
            DeclarationKind::Method { return_type } => self.visit_method(decl, return_type, source),
            DeclarationKind::Delegate { return_type } => {
                self.visit_delegate(decl, return_type, source)
            }
            DeclarationKind::Property { ty } => self.visit_property(decl, ty, source),
            DeclarationKind::Indexer { ty } => self.visit_indexer(decl, ty, source),
            DeclarationKind::Other(_) => self.visit_other(decl, source),
        }
    }
}

/// Run a visitor over every declaration in source order
///
/// Returns `false` if a hook stopped the traversal early.
pub fn visit<V: Visitor + ?Sized>(visitor: &mut V, tree: &SyntaxTree, source: &str) -> bool {
    tree.declarations()
        .iter()
        .all(|decl| visitor.visit_declaration(decl, source))
}
