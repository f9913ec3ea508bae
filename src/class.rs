use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::io::Write;
use std::rc::Rc;

use log::debug;

use crate::error::{LoxError, Result};
use crate::function::{BoundMethod, Callable, Function};
use crate::interpreter::Interpreter;
use crate::token::Token;
use crate::value::Value;

/// A class value.  Its method table is filled once, when the declaration runs.
pub struct Class {
    name: String,
    methods: HashMap<String, Rc<Function>>,
}

impl Class {
    pub fn new(name: String, methods: HashMap<String, Rc<Function>>) -> Self {
        Self { name, methods }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn find_method(&self, name: &str) -> Option<&Rc<Function>> {
        self.methods.get(name)
    }
}

/// Calling a class builds an empty instance.  There are no initializers, so
/// the arity is always zero.
impl Callable for Rc<Class> {
    fn arity(&self) -> usize {
        0
    }

    fn call<W: Write>(&self, _interpreter: &mut Interpreter<W>, _args: Vec<Value>) -> Result<Value> {
        debug!("Instantiating class '{}'", self.name);

        Ok(Value::Instance(Rc::new(Instance::new(Rc::clone(self)))))
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.name)
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// An object created by calling a class.
pub struct Instance {
    class: Rc<Class>,
    fields: RefCell<HashMap<String, Value>>,
}

impl Instance {
    pub fn new(class: Rc<Class>) -> Self {
        Self {
            class,
            fields: RefCell::new(HashMap::new()),
        }
    }

    pub fn class(&self) -> &Rc<Class> {
        &self.class
    }

    /// Property lookup.  A field shadows a method of the same name; a method
    /// comes back bound to `instance`.
    pub fn get(instance: &Rc<Instance>, name: &Token) -> Result<Value> {
        if let Some(value) = instance.fields.borrow().get(&name.lexeme) {
            return Ok(value.clone());
        }

        if let Some(method) = instance.class.find_method(&name.lexeme) {
            debug!("Binding method '{}'", name.lexeme);

            return Ok(Value::BoundMethod(Rc::new(BoundMethod::new(
                Rc::clone(instance),
                Rc::clone(method),
            ))));
        }

        Err(LoxError::runtime(
            name,
            format!("Undefined property '{}'.", name.lexeme),
        ))
    }

    /// Field storage.  The grammar has no property assignment yet, so only
    /// host code writes fields.
    pub fn set_field(&self, name: &str, value: Value) {
        self.fields.borrow_mut().insert(name.to_string(), value);
    }

    pub fn field(&self, name: &str) -> Option<Value> {
        self.fields.borrow().get(name).cloned()
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Instance({})", self.class.name)
    }
}
