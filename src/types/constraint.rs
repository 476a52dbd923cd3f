use core::fmt::Display;

use crate::types::types::Type;

/// Asserted equality between two type terms, emitted by the front end
/// while it walks the AST.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constraint<'a> {
    pub lhs: &'a Type<'a>,
    pub rhs: &'a Type<'a>,
}

impl<'a> Constraint<'a> {
    pub fn new(lhs: &'a Type<'a>, rhs: &'a Type<'a>) -> Self {
        Self { lhs, rhs }
    }
}

impl Display for Constraint<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} = {}", self.lhs, self.rhs)
    }
}
