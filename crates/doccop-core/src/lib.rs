//! doccop-core: Core abstractions for C# documentation rules
//!
//! This crate provides:
//! - `DocComment`: Tag structure of a documentation comment, mapped to file offsets
//! - `Diagnostic`: A rule violation with its 1-based location
//! - `Edit`: A span-based code modification
//! - `EditGroup`: A group of related edits for atomic application
//! - `apply_edits()`: Function to apply edits against the original offsets
//! - `apply_edit_groups()`: Function to apply edit groups atomically
//! - `plan_removal()`: Layout-aware deletion of a documentation element
//! - `Cancellation`: Cooperative cancellation for analysis runs
//! - `Visitor`: Trait for traversing C# declarations

mod cancellation;
mod diagnostic;
pub mod doc_comment;
mod edit;
mod line_index;
pub mod removal;
pub mod visitor;

pub use cancellation::{Cancellation, Cancelled};
pub use diagnostic::{sort_diagnostics, Diagnostic, Severity};
pub use doc_comment::{DocComment, DocElement};
pub use edit::{apply_edit_groups, apply_edits, Edit, EditError, EditGroup, GroupedResult};
pub use line_index::LineIndex;
pub use removal::{plan_removal, plan_removals, Removal, RemovalLayout};
pub use visitor::{visit, Visitor};
