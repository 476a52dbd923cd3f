use bumpalo::Bump;
use core::cell::RefCell;
use hashbrown::HashMap;

use crate::types::types::{Cons, NodeId, Type};

/// Allocates and canonicalizes type terms inside a caller-provided arena.
///
/// Variables are canonical: the same AST-node handle always yields the
/// same `&'a Type<'a>`, so pointer identity coincides with handle
/// identity for `Var` and `Alpha`. Constructor applications are the
/// opposite: every `cons` call allocates a fresh term, because each
/// constraint site must be a distinct key for the solver even when two
/// sites build value-equal terms.
pub struct TypeManager<'a> {
    // Arena holding all terms from this manager.
    arena: &'a Bump,
    interned_strs: RefCell<HashMap<&'a str, &'a str>>,
    vars: RefCell<HashMap<NodeId, &'a Type<'a>>>,
    alphas: RefCell<HashMap<NodeId, &'a Type<'a>>>,
}

impl<'a> TypeManager<'a> {
    pub fn new(arena: &'a Bump) -> &'a Self {
        arena.alloc(Self {
            arena,
            interned_strs: RefCell::new(HashMap::new()),
            vars: RefCell::new(HashMap::new()),
            alphas: RefCell::new(HashMap::new()),
        })
    }

    pub(super) fn intern_str(&self, s: &str) -> &'a str {
        if let Some(&interned_str) = self.interned_strs.borrow().get(s) {
            return interned_str;
        }
        let arena_str = self.arena.alloc_str(s);
        self.interned_strs.borrow_mut().insert(arena_str, arena_str);
        arena_str
    }

    /// Canonical type variable for a program point.
    pub fn var(&self, node: NodeId) -> &'a Type<'a> {
        if let Some(&ty) = self.vars.borrow().get(&node) {
            return ty;
        }
        let ty = &*self.arena.alloc(Type::Var(node));
        self.vars.borrow_mut().insert(node, ty);
        ty
    }

    /// Canonical alpha for a program point, named by the same handle as
    /// the variable it reifies.
    pub fn alpha(&self, node: NodeId) -> &'a Type<'a> {
        if let Some(&ty) = self.alphas.borrow().get(&node) {
            return ty;
        }
        let ty = &*self.arena.alloc(Type::Alpha(node));
        self.alphas.borrow_mut().insert(node, ty);
        ty
    }

    /// Constructor application. Always a fresh allocation; see the type
    /// level docs for why constructor sites are not shared.
    pub fn cons(&self, name: &str, args: &[&'a Type<'a>]) -> &'a Type<'a> {
        let name = self.intern_str(name);
        let args = self.arena.alloc_slice_copy(args);
        self.arena.alloc(Type::Cons(Cons { name, args }))
    }

    /// Recursive type `μvar.body`.
    pub fn mu(&self, var: &'a Type<'a>, body: &'a Type<'a>) -> &'a Type<'a> {
        debug_assert!(var.is_variable(), "μ binder must be variable-shaped");
        self.arena.alloc(Type::Mu { var, body })
    }

    // The TIP constructor vocabulary.

    pub fn int(&self) -> &'a Type<'a> {
        self.cons("int", &[])
    }

    /// The absent-field type `◇`, used by record inference to stand for
    /// fields a record does not define.
    pub fn absent(&self) -> &'a Type<'a> {
        self.cons("◇", &[])
    }

    pub fn pointer(&self, referenced: &'a Type<'a>) -> &'a Type<'a> {
        self.cons("ptr", &[referenced])
    }

    /// Function type; children are the parameters followed by the return
    /// type, so functions of different parameter counts never match.
    pub fn function(&self, params: &[&'a Type<'a>], ret: &'a Type<'a>) -> &'a Type<'a> {
        let mut args = Vec::with_capacity(params.len() + 1);
        args.extend_from_slice(params);
        args.push(ret);
        self.cons("fun", &args)
    }

    /// Record type. Field names are part of the constructor identity, so
    /// records over different field sets never match. Fields are sorted
    /// by name to make the identity independent of the order a front end
    /// lists them in.
    pub fn record(&self, fields: &[(&str, &'a Type<'a>)]) -> &'a Type<'a> {
        let mut fields: Vec<(&str, &'a Type<'a>)> = fields.to_vec();
        fields.sort_by_key(|(name, _)| *name);

        let names: Vec<&str> = fields.iter().map(|(name, _)| *name).collect();
        let args: Vec<&'a Type<'a>> = fields.iter().map(|(_, ty)| *ty).collect();
        self.cons(&format!("record{{{}}}", names.join(",")), &args)
    }
}
