use crate::types::manager::TypeManager;
use crate::types::types::Type;

/// Replaces every free occurrence of the variable `var` in `ty` with
/// `replacement`, returning a value-equal rebuild of the rest.
///
/// A `μ` whose binder equals `var` shadows it, so its body is returned
/// untouched. This is purely structural; it never consults the solver
/// state.
pub fn substitute<'a>(
    manager: &'a TypeManager<'a>,
    ty: &'a Type<'a>,
    var: &'a Type<'a>,
    replacement: &'a Type<'a>,
) -> &'a Type<'a> {
    match *ty {
        Type::Var(_) | Type::Alpha(_) => {
            if ty == var {
                replacement
            } else {
                ty
            }
        }
        Type::Cons(cons) => {
            let args: Vec<&'a Type<'a>> = cons
                .args
                .iter()
                .map(|&arg| substitute(manager, arg, var, replacement))
                .collect();
            manager.cons(cons.name, &args)
        }
        Type::Mu { var: bound, body } => {
            if bound == var {
                ty
            } else {
                manager.mu(bound, substitute(manager, body, var, replacement))
            }
        }
    }
}

/// Free `Var`/`Alpha` occurrences of `ty`, deduplicated, in
/// first-encounter order. A `μ` removes its binder from the collection
/// of its body.
///
/// The order matters: the closer resolves free variables in exactly this
/// order, which keeps its output deterministic.
pub fn free_vars<'a>(ty: &'a Type<'a>) -> Vec<&'a Type<'a>> {
    let mut out = Vec::new();
    collect(ty, &mut out);
    out
}

fn collect<'a>(ty: &'a Type<'a>, out: &mut Vec<&'a Type<'a>>) {
    match *ty {
        Type::Var(_) | Type::Alpha(_) => {
            if !out.contains(&ty) {
                out.push(ty);
            }
        }
        Type::Cons(cons) => {
            for &arg in cons.args {
                collect(arg, out);
            }
        }
        Type::Mu { var, body } => {
            let mut inner = Vec::new();
            collect(body, &mut inner);
            for free in inner {
                if free != var && !out.contains(&free) {
                    out.push(free);
                }
            }
        }
    }
}
