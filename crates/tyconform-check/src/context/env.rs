//! Type environment for fixture scopes.
//!
//! The environment is a stack of scopes mapping binding names to types.
//! Blocks and arrow bodies push a scope; narrowing pushes a scope that
//! rebinds the narrowed name, so popping it restores the declared type.
//!
//! # Example
//!
//! ```
//! use tyconform_check::context::TypeEnv;
//! use tyconform_check::types::Ty;
//!
//! let mut env = TypeEnv::new();
//! env.bind("worker", Ty::union([Ty::named("Worker"), Ty::UNDEFINED]));
//!
//! env.new_scope();
//! env.bind("worker", Ty::named("Worker"));
//! assert_eq!(env.lookup("worker"), Some(&Ty::named("Worker")));
//!
//! env.pop_scope();
//! assert!(env.lookup("worker").unwrap().is_possibly_nullish());
//! ```

use crate::types::Ty;
use hashbrown::HashMap;

/// Lexically scoped bindings.
#[derive(Debug, Clone)]
pub struct TypeEnv {
    /// Stack of scopes, innermost last.
    scopes: Vec<HashMap<String, Ty>>,
}

impl Default for TypeEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeEnv {
    /// Creates an environment with one (fixture-level) scope.
    #[must_use]
    pub fn new() -> Self {
        Self {
            scopes: vec![HashMap::new()],
        }
    }

    /// Number of scopes.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Enters a new scope.
    pub fn new_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Exits the current scope. The outermost scope is never popped.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Binds a name in the current scope, shadowing outer bindings.
    pub fn bind(&mut self, name: impl Into<String>, ty: Ty) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.into(), ty);
        }
    }

    /// Looks a name up, innermost scope first.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Ty> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    /// Runs `f` inside a fresh scope.
    pub fn scoped<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.new_scope();
        let result = f(self);
        self.pop_scope();
        result
    }
}
