use std::fmt;
use std::io::Write;
use std::rc::Rc;

use log::debug;

use crate::ast::FunctionDecl;
use crate::class::Instance;
use crate::environment::{EnvRef, Environment};
use crate::error::Result;
use crate::interpreter::{Flow, Interpreter};
use crate::value::Value;

/// Anything a call expression can invoke.
pub trait Callable {
    fn arity(&self) -> usize;

    fn call<W: Write>(&self, interpreter: &mut Interpreter<W>, args: Vec<Value>) -> Result<Value>;
}

/// A user function: its declaration plus the scope it was declared in.
pub struct Function {
    declaration: Rc<FunctionDecl>,
    closure: EnvRef,
}

impl Function {
    pub fn new(declaration: Rc<FunctionDecl>, closure: EnvRef) -> Self {
        Self {
            declaration,
            closure,
        }
    }

    pub fn name(&self) -> &str {
        &self.declaration.name.lexeme
    }
}

impl Callable for Function {
    fn arity(&self) -> usize {
        self.declaration.params.len()
    }

    /// Runs the body in a new scope enclosed by the *closure*, not the caller's
    /// scope, with parameters bound positionally.
    fn call<W: Write>(&self, interpreter: &mut Interpreter<W>, args: Vec<Value>) -> Result<Value> {
        debug!("Calling function '{}' with {} argument(s)", self.name(), args.len());

        let environment: EnvRef = Environment::push(&self.closure);

        for (param, arg) in self.declaration.params.iter().zip(args) {
            environment.borrow_mut().declare(&param.lexeme, arg);
        }

        match interpreter.execute_block(&self.declaration.body, environment)? {
            Flow::Return(value) => {
                debug!("Function '{}' returned: {}", self.name(), value);
                Ok(value)
            }

            Flow::Normal => Ok(Value::Nil),
        }
    }
}

// Closures can reach themselves through their scope; print the name only.
impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Function({})", self.name())
    }
}

/// A method looked up on a specific instance.
#[derive(Debug)]
pub struct BoundMethod {
    receiver: Rc<Instance>,
    method: Rc<Function>,
}

impl BoundMethod {
    pub fn new(receiver: Rc<Instance>, method: Rc<Function>) -> Self {
        Self { receiver, method }
    }

    pub fn name(&self) -> &str {
        self.method.name()
    }

    pub fn receiver(&self) -> &Rc<Instance> {
        &self.receiver
    }
}

impl Callable for BoundMethod {
    fn arity(&self) -> usize {
        self.method.arity()
    }

    fn call<W: Write>(&self, interpreter: &mut Interpreter<W>, args: Vec<Value>) -> Result<Value> {
        debug!(
            "Calling method '{}' on a {} instance",
            self.name(),
            self.receiver.class().name()
        );

        self.method.call(interpreter, args)
    }
}
