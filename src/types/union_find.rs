use core::cell::RefCell;
use hashbrown::HashMap;

use crate::types::types::Type;

/// Disjoint sets over type terms, keyed by term identity.
///
/// Variables are canonicalized by the manager, so for them pointer
/// identity coincides with handle identity; constructor applications are
/// distinct per allocation site, which is exactly the keying the solver
/// needs. Interior mutability lets `find` path-compress behind `&self`.
pub struct UnionFind<'a> {
    parent: RefCell<HashMap<*const Type<'a>, &'a Type<'a>>>,
}

impl<'a> UnionFind<'a> {
    pub fn new() -> Self {
        Self {
            parent: RefCell::new(HashMap::new()),
        }
    }

    /// Ensures `ty` has an entry; idempotent.
    pub fn insert(&self, ty: &'a Type<'a>) {
        self.parent
            .borrow_mut()
            .entry(ty as *const Type<'a>)
            .or_insert(ty);
    }

    /// Current representative of `ty`'s class. Terms seen for the first
    /// time are inserted as their own singleton class.
    ///
    /// Follows parents to the fixed point, then rewrites every entry on
    /// the traversed chain to point at the root directly.
    pub fn find(&self, ty: &'a Type<'a>) -> &'a Type<'a> {
        self.insert(ty);

        let mut path = Vec::new();
        let mut current = ty;
        loop {
            // Borrow and immediately release so compression below can
            // re-borrow mutably.
            let parent = *self
                .parent
                .borrow()
                .get(&(current as *const Type<'a>))
                .expect("every parent link targets an inserted term");
            if core::ptr::eq(parent, current) {
                break;
            }
            path.push(current);
            current = parent;
        }

        if !path.is_empty() {
            let mut parent = self.parent.borrow_mut();
            for entry in path {
                parent.insert(entry as *const Type<'a>, current);
            }
        }

        current
    }

    /// Merges the class of `a` under that of `b`: afterwards
    /// `find(a) == find(b) == find(b_before)`. The unifier relies on the
    /// argument order to keep non-variable representatives.
    pub fn quick_union(&self, a: &'a Type<'a>, b: &'a Type<'a>) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        self.parent
            .borrow_mut()
            .insert(root_a as *const Type<'a>, root_b);
    }
}

impl Default for UnionFind<'_> {
    fn default() -> Self {
        Self::new()
    }
}
