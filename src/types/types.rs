use core::fmt::Display;

/// Opaque handle of the AST node a type variable is attached to.
///
/// The solver never looks inside a handle; it only compares and hashes
/// them, and prints them to name variables in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u64);

impl Display for NodeId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A constructor application: a name and its ordered children.
///
/// The arity is fixed by the name; `int` has none, `ptr` has one, `fun`
/// carries its parameters followed by the return type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cons<'a> {
    pub name: &'a str,
    pub args: &'a [&'a Type<'a>],
}

impl<'a> Cons<'a> {
    pub fn arity(&self) -> usize {
        self.args.len()
    }

    /// Structural compatibility: same name, same arity. Children are
    /// deliberately not inspected; they are unified separately.
    pub fn matches(&self, other: &Cons<'a>) -> bool {
        self.name == other.name && self.args.len() == other.args.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type<'a> {
    /// Type variable associated with a program point.
    Var(NodeId),

    /// Named variable introduced by closure so that a cycle-breaking
    /// variable stays printable and stable.
    Alpha(NodeId),

    /// Constructor application, e.g. `int`, `ptr(T)`, `fun(T1, T2) -> Tr`.
    Cons(Cons<'a>),

    /// Recursive type `μvar.body`; `var` may appear free in `body`.
    Mu {
        var: &'a Type<'a>,
        body: &'a Type<'a>,
    },
}

impl<'a> Type<'a> {
    /// Variable-shaped for unification purposes: `Var` or `Alpha`.
    pub fn is_variable(&self) -> bool {
        matches!(self, Type::Var(_) | Type::Alpha(_))
    }

    pub fn is_alpha(&self) -> bool {
        matches!(self, Type::Alpha(_))
    }

    pub fn as_cons(&self) -> Option<&Cons<'a>> {
        match self {
            Type::Cons(cons) => Some(cons),
            _ => None,
        }
    }

    /// The AST-node handle of a variable-shaped term.
    pub fn node(&self) -> Option<NodeId> {
        match self {
            Type::Var(node) | Type::Alpha(node) => Some(*node),
            _ => None,
        }
    }
}

impl Display for Type<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Type::Var(node) => write!(f, "[[{}]]", node),
            Type::Alpha(node) => write!(f, "α<{}>", node),
            Type::Cons(cons) if cons.args.is_empty() => write!(f, "{}", cons.name),
            Type::Cons(cons) if cons.name == "fun" => {
                let (ret, params) = cons.args.split_last().expect("fun has a return type");
                let param_strs: Vec<String> = params.iter().map(|ty| format!("{}", ty)).collect();
                write!(f, "fun({}) -> {}", param_strs.join(", "), ret)
            }
            Type::Cons(cons) => {
                let arg_strs: Vec<String> = cons.args.iter().map(|ty| format!("{}", ty)).collect();
                write!(f, "{}({})", cons.name, arg_strs.join(", "))
            }
            Type::Mu { var, body } => write!(f, "μ{}.{}", var, body),
        }
    }
}
