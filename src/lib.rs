//! Type solver for the TIP language.
//!
//! A front end walks the AST and emits equality constraints over type
//! terms; this crate decides whether they are satisfiable and reifies
//! fully closed types for the variables of interest. TIP permits
//! recursive types (heap cells that point to themselves), so closing a
//! solution may introduce μ-binders.
//!
//! # Example
//!
//! ```ignore
//! use bumpalo::Bump;
//! use tip_types::types::{Constraint, NodeId, TypeManager, Unifier};
//!
//! let arena = Bump::new();
//! let manager = TypeManager::new(&arena);
//!
//! let x = manager.var(NodeId(1));
//! let mut unifier = Unifier::new(
//!     manager,
//!     vec![Constraint::new(x, manager.pointer(x))],
//! );
//! unifier.solve()?;
//! // inferred(x) = μα<1>.ptr(α<1>)
//! let closed = unifier.inferred(x);
//! ```

pub mod types;

pub use types::Type;
