//! Chained lexical scopes.
//!
//! Scopes are shared through [`EnvRef`] handles: a block scope is kept alive by
//! any closure created inside it, and every holder sees the same bindings.

use crate::error::{LoxError, Result};
use crate::token::Token;
use crate::value::Value;
use log::debug;
use std::cell::RefCell;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::rc::Rc;

/// Shared, mutable handle to one scope.
pub type EnvRef = Rc<RefCell<Environment>>;

#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<EnvRef>,
}

impl Environment {
    /// Fresh outermost scope.
    pub fn global() -> EnvRef {
        Rc::new(RefCell::new(Environment::default()))
    }

    /// New empty scope whose enclosing link is `parent`.  The parent is untouched.
    pub fn push(parent: &EnvRef) -> EnvRef {
        Rc::new(RefCell::new(Environment {
            values: HashMap::new(),
            enclosing: Some(Rc::clone(parent)),
        }))
    }

    /// Bind `name` in this scope, shadowing any outer binding and overwriting
    /// an existing one here.
    pub fn declare(&mut self, name: &str, value: Value) {
        debug!("Declaring '{}'", name);

        self.values.insert(name.to_string(), value);
    }

    /// Resolve `name`, innermost scope first.
    pub fn lookup(&self, name: &Token) -> Result<Value> {
        if let Some(value) = self.values.get(&name.lexeme) {
            return Ok(value.clone());
        }

        match &self.enclosing {
            Some(enclosing) => enclosing.borrow().lookup(name),
            None => Err(undefined(name)),
        }
    }

    /// Overwrite the nearest existing binding of `name`.  Never creates one.
    pub fn assign(&mut self, name: &Token, value: Value) -> Result<()> {
        if let Entry::Occupied(mut e) = self.values.entry(name.lexeme.clone()) {
            e.insert(value);
            return Ok(());
        }

        match &self.enclosing {
            Some(enclosing) => enclosing.borrow_mut().assign(name, value),
            None => Err(undefined(name)),
        }
    }

    /// Is `name` bound in this very scope (outer scopes not consulted)?
    pub fn contains_local(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }
}

fn undefined(name: &Token) -> LoxError {
    LoxError::runtime(name, format!("Undefined variable '{}'.", name.lexeme))
}
