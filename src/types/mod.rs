pub mod constraint;
pub mod manager;
pub mod substitution;
mod types;
pub mod unification;
pub mod union_find;


pub use constraint::Constraint;
pub use manager::TypeManager;
pub use types::{Cons, NodeId, Type};
pub use unification::{Error, Unifier};
