use core::fmt;
use hashbrown::HashSet;

use crate::types::{
    constraint::Constraint,
    manager::TypeManager,
    substitution::{free_vars, substitute},
    types::Type,
    union_find::UnionFind,
};

/// Types of unification errors.
///
/// Every variant carries the two terms the caller asked to unify and the
/// representatives their classes had when the mismatch surfaced, in
/// printable form. The front end maps these back onto the AST nodes of
/// the variables involved.
#[derive(Debug)]
pub enum Error {
    /// Two constructors with different names or arities were required
    /// equal.
    ConsMismatch {
        left: String,
        right: String,
        left_rep: String,
        right_rep: String,
    },
    /// A shape combination the solver refuses, e.g. a μ-type appearing
    /// directly in a constraint.
    UnexpectedShape {
        left: String,
        right: String,
        left_rep: String,
        right_rep: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ConsMismatch {
                left,
                right,
                left_rep,
                right_rep,
            } => write!(
                f,
                "cannot unify {} and {} (respective representatives: {} and {})",
                left, right, left_rep, right_rep
            ),
            Error::UnexpectedShape {
                left,
                right,
                left_rep,
                right_rep,
            } => write!(
                f,
                "cannot unify {} and {}: unsupported shape (respective representatives: {} and {})",
                left, right, left_rep, right_rep
            ),
        }
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Fresh,
    Solving,
    Solved,
    Failed,
}

/// Solves a set of type equality constraints over a union-find of term
/// classes, then reifies closed types on demand.
///
/// There is deliberately no occurs-check: TIP admits recursive types, so
/// a variable may end up in the same class as a constructor containing
/// it. Such cycles stay in the union-find and are resolved by the closer,
/// which binds them with `μ`.
///
/// # Example
///
/// ```ignore
/// let arena = Bump::new();
/// let manager = TypeManager::new(&arena);
/// let x = manager.var(NodeId(1));
///
/// let mut unifier = Unifier::new(manager, vec![Constraint::new(x, manager.int())]);
/// unifier.solve()?;
/// assert_eq!(unifier.inferred(x), manager.int());
/// ```
pub struct Unifier<'a> {
    manager: &'a TypeManager<'a>,
    constraints: Vec<Constraint<'a>>,
    union_find: UnionFind<'a>,
    state: State,
}

impl<'a> Unifier<'a> {
    /// Builds a solver over `constraints`, seeding the union-find with
    /// both sides of every constraint and the immediate children of any
    /// top-level constructor. Deeper terms are inserted lazily the first
    /// time `find` reaches them.
    pub fn new(manager: &'a TypeManager<'a>, constraints: Vec<Constraint<'a>>) -> Self {
        let union_find = UnionFind::new();
        for constraint in &constraints {
            for side in [constraint.lhs, constraint.rhs] {
                union_find.insert(side);
                if let Type::Cons(cons) = side {
                    for &arg in cons.args {
                        union_find.insert(arg);
                    }
                }
            }
        }
        Self {
            manager,
            constraints,
            union_find,
            state: State::Fresh,
        }
    }

    /// Unifies each constraint in input order. The first irreconcilable
    /// mismatch wins; the union-find is left in an undefined state after
    /// a failure.
    ///
    /// May be called at most once.
    pub fn solve(&mut self) -> Result<(), Error> {
        assert!(
            self.state == State::Fresh,
            "solve may be called at most once"
        );
        self.state = State::Solving;

        let mut result = Ok(());
        for constraint in &self.constraints {
            if let Err(error) = self.unify(constraint.lhs, constraint.rhs) {
                result = Err(error);
                break;
            }
        }

        self.state = match result {
            Ok(()) => State::Solved,
            Err(_) => State::Failed,
        };
        result
    }

    fn unify(&self, t1: &'a Type<'a>, t2: &'a Type<'a>) -> Result<(), Error> {
        tracing::debug!(t1 = %t1, t2 = %t2, "unifying");

        let rep1 = self.union_find.find(t1);
        let rep2 = self.union_find.find(t2);

        tracing::trace!(rep1 = %rep1, rep2 = %rep2, "representatives");

        if rep1 == rep2 {
            return Ok(());
        }

        match (rep1, rep2) {
            // A variable class merges under anything more informative;
            // between two variables either order would do.
            (Type::Var(_) | Type::Alpha(_), _) => self.union_find.quick_union(rep1, rep2),
            (_, Type::Var(_) | Type::Alpha(_)) => self.union_find.quick_union(rep2, rep1),
            (Type::Cons(cons1), Type::Cons(cons2)) => {
                if !cons1.matches(cons2) {
                    return Err(self.mismatch(t1, t2));
                }
                self.union_find.quick_union(rep1, rep2);
                for (&arg1, &arg2) in cons1.args.iter().zip(cons2.args.iter()) {
                    self.unify(arg1, arg2)?;
                }
            }
            // μ never appears in constraints.
            _ => return Err(self.unexpected_shape(t1, t2)),
        }

        tracing::trace!(rep = %self.union_find.find(t1), "unified");
        Ok(())
    }

    fn mismatch(&self, t1: &'a Type<'a>, t2: &'a Type<'a>) -> Error {
        tracing::warn!(t1 = %t1, t2 = %t2, "constructor mismatch");
        Error::ConsMismatch {
            left: t1.to_string(),
            right: t2.to_string(),
            left_rep: self.union_find.find(t1).to_string(),
            right_rep: self.union_find.find(t2).to_string(),
        }
    }

    fn unexpected_shape(&self, t1: &'a Type<'a>, t2: &'a Type<'a>) -> Error {
        tracing::warn!(t1 = %t1, t2 = %t2, "unsupported shape in constraint");
        Error::UnexpectedShape {
            left: t1.to_string(),
            right: t2.to_string(),
            left_rep: self.union_find.find(t1).to_string(),
            right_rep: self.union_find.find(t2).to_string(),
        }
    }

    /// The closed type of variable `v`: every variable of its class is
    /// resolved to a ground type, with cycles bound by `μ` and
    /// unconstrained variables reified as alphas.
    ///
    /// Requires a successful `solve`.
    pub fn inferred(&self, v: &'a Type<'a>) -> &'a Type<'a> {
        assert!(
            self.state == State::Solved,
            "inferred requires a solved constraint set"
        );
        assert!(v.is_variable(), "inferred takes a type variable");

        let closed = self.close(v, &HashSet::new());
        tracing::debug!(var = %v, closed = %closed, "closed inferred type");
        closed
    }

    /// Reifies the class of `t` into a ground type.
    ///
    /// `visited` holds the variables on the current descent path and has
    /// copy semantics: insertions in one branch never leak into a
    /// sibling. A variable met twice closes to its alpha, which is what
    /// lets recursive classes terminate; the alpha is then caught by the
    /// free-variable check at the level that started the cycle and bound
    /// with `μ` there.
    fn close(&self, t: &'a Type<'a>, visited: &HashSet<*const Type<'a>>) -> &'a Type<'a> {
        match *t {
            Type::Var(node) | Type::Alpha(node) => {
                let rep = self.union_find.find(t);
                if visited.contains(&(t as *const Type<'a>)) || rep == t {
                    // Cyclic re-entry, or a class of one: the variable
                    // stands for itself.
                    return self.manager.alpha(node);
                }

                let mut visited = visited.clone();
                visited.insert(t as *const Type<'a>);
                let closed_rep = self.close(rep, &visited);

                // Reuse an alpha; mint one for a plain variable.
                let new_var = if t.is_alpha() {
                    t
                } else {
                    self.manager.alpha(node)
                };
                if free_vars(closed_rep).contains(&new_var) {
                    // The class reaches back through `t`.
                    let body = substitute(self.manager, closed_rep, t, new_var);
                    let mu = self.manager.mu(new_var, body);
                    tracing::trace!(var = %t, closed = %mu, "closed cyclic variable");
                    mu
                } else {
                    tracing::trace!(var = %t, closed = %closed_rep, "closed variable");
                    closed_rep
                }
            }
            Type::Cons(cons) => {
                // Resolve each free variable in collection order,
                // substituting its closed form into every argument before
                // moving to the next variable.
                let free = free_vars(t);
                let mut current: Vec<&'a Type<'a>> = cons.args.to_vec();
                for v in free {
                    let mut next = Vec::with_capacity(current.len());
                    for &arg in &current {
                        let closed_v = self.close(v, visited);
                        next.push(substitute(self.manager, arg, v, closed_v));
                    }
                    current = next;
                }
                self.manager.cons(cons.name, &current)
            }
            Type::Mu { var, body } => self.manager.mu(var, self.close(body, visited)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::types::NodeId;
    use bumpalo::Bump;

    #[test]
    fn solved_constraints_share_a_representative() {
        let arena = Bump::new();
        let manager = TypeManager::new(&arena);

        let x = manager.var(NodeId(1));
        let y = manager.var(NodeId(2));
        let constraints = vec![
            Constraint::new(x, y),
            Constraint::new(y, manager.int()),
            Constraint::new(manager.pointer(x), manager.pointer(y)),
        ];

        let mut unifier = Unifier::new(manager, constraints.clone());
        unifier.solve().unwrap();

        for constraint in &constraints {
            assert!(core::ptr::eq(
                unifier.union_find.find(constraint.lhs),
                unifier.union_find.find(constraint.rhs),
            ));
        }
    }

    #[test]
    fn non_variable_wins_the_representative() {
        let arena = Bump::new();
        let manager = TypeManager::new(&arena);

        let x = manager.var(NodeId(1));
        let int = manager.int();

        // Same outcome regardless of which side the variable is on.
        let mut unifier = Unifier::new(manager, vec![Constraint::new(x, int)]);
        unifier.solve().unwrap();
        assert!(core::ptr::eq(unifier.union_find.find(x), int));

        let y = manager.var(NodeId(2));
        let int2 = manager.int();
        let mut unifier = Unifier::new(manager, vec![Constraint::new(int2, y)]);
        unifier.solve().unwrap();
        assert!(core::ptr::eq(unifier.union_find.find(y), int2));
    }

    #[test]
    fn constructor_mismatch_reports_both_terms() {
        let arena = Bump::new();
        let manager = TypeManager::new(&arena);

        let x = manager.var(NodeId(1));
        let constraints = vec![Constraint::new(manager.int(), manager.pointer(x))];

        let mut unifier = Unifier::new(manager, constraints);
        let error = unifier.solve().unwrap_err();

        let message = error.to_string();
        assert!(message.contains("int"), "message was: {message}");
        assert!(message.contains("ptr([[1]])"), "message was: {message}");
    }

    #[test]
    fn function_arity_mismatch_fails() {
        let arena = Bump::new();
        let manager = TypeManager::new(&arena);

        let vars: Vec<_> = (1..=5).map(|i| manager.var(NodeId(i))).collect();
        let one_param = manager.function(&[vars[0]], vars[1]);
        let two_params = manager.function(&[vars[2], vars[3]], vars[4]);

        let mut unifier = Unifier::new(manager, vec![Constraint::new(one_param, two_params)]);
        assert!(matches!(
            unifier.solve(),
            Err(Error::ConsMismatch { .. })
        ));
    }

    #[test]
    fn mu_in_a_constraint_is_refused() {
        let arena = Bump::new();
        let manager = TypeManager::new(&arena);

        let alpha = manager.alpha(NodeId(1));
        let mu = manager.mu(alpha, manager.pointer(alpha));
        let constraints = vec![Constraint::new(mu, manager.int())];

        let mut unifier = Unifier::new(manager, constraints);
        assert!(matches!(
            unifier.solve(),
            Err(Error::UnexpectedShape { .. })
        ));
    }

    #[test]
    fn variable_unifies_with_mu_class() {
        let arena = Bump::new();
        let manager = TypeManager::new(&arena);

        // μ is not expected in constraints, but a variable still merges
        // under any proper type it is equated with.
        let alpha = manager.alpha(NodeId(1));
        let mu = manager.mu(alpha, manager.pointer(alpha));
        let x = manager.var(NodeId(2));

        let mut unifier = Unifier::new(manager, vec![Constraint::new(x, mu)]);
        unifier.solve().unwrap();
        assert!(core::ptr::eq(unifier.union_find.find(x), mu));
    }

    #[test]
    #[should_panic(expected = "solve may be called at most once")]
    fn solve_twice_panics() {
        let arena = Bump::new();
        let manager = TypeManager::new(&arena);

        let mut unifier = Unifier::new(manager, Vec::new());
        unifier.solve().unwrap();
        let _ = unifier.solve();
    }

    #[test]
    #[should_panic(expected = "inferred requires a solved constraint set")]
    fn inferred_before_solve_panics() {
        let arena = Bump::new();
        let manager = TypeManager::new(&arena);

        let x = manager.var(NodeId(1));
        let unifier = Unifier::new(manager, Vec::new());
        let _ = unifier.inferred(x);
    }

    #[test]
    #[should_panic(expected = "inferred requires a solved constraint set")]
    fn inferred_after_failure_panics() {
        let arena = Bump::new();
        let manager = TypeManager::new(&arena);

        let x = manager.var(NodeId(1));
        let mut unifier = Unifier::new(
            manager,
            vec![Constraint::new(manager.int(), manager.pointer(x))],
        );
        let _ = unifier.solve();
        let _ = unifier.inferred(x);
    }

    #[test]
    fn close_is_idempotent_on_its_output() {
        let arena = Bump::new();
        let manager = TypeManager::new(&arena);

        let x = manager.var(NodeId(1));
        let y = manager.var(NodeId(2));
        let mut unifier = Unifier::new(
            manager,
            vec![
                Constraint::new(x, manager.pointer(x)),
                Constraint::new(y, manager.function(&[x], manager.int())),
            ],
        );
        unifier.solve().unwrap();

        for v in [x, y] {
            let closed = unifier.inferred(v);
            // Alphas in closed output are unconstrained, so a second
            // round of closing resolves each one to itself.
            assert_eq!(unifier.close(closed, &HashSet::new()), closed);
        }
    }

    #[test]
    fn duplicate_constraints_are_harmless() {
        let arena = Bump::new();
        let manager = TypeManager::new(&arena);

        let x = manager.var(NodeId(1));
        let constraints = vec![
            Constraint::new(x, manager.int()),
            Constraint::new(x, manager.int()),
        ];

        let mut unifier = Unifier::new(manager, constraints);
        unifier.solve().unwrap();
        assert_eq!(unifier.inferred(x), manager.int());
    }
}
