//! Tree‑walking evaluator.
//!
//! `evaluate` and `execute` dispatch on the syntax node kind and take the scope
//! to run in as an explicit argument.  Nothing is restored on the way out, so a
//! runtime error can unwind straight through with `?`.

use std::collections::HashMap;
use std::io::{self, Write};
use std::rc::Rc;

use log::{debug, info};

use crate::ast::{Expr, LiteralValue, Program, Stmt};
use crate::class::{Class, Instance};
use crate::environment::{EnvRef, Environment};
use crate::error::{LoxError, Result};
use crate::function::{Callable, Function};
use crate::parser::Parser;
use crate::scanner::Scanner;
use crate::token::{Token, TokenType};
use crate::value::Value;

/// How a statement finished.  `Return` travels outward through blocks and
/// loops until the enclosing function call consumes it.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    Normal,
    Return(Value),
}

/// Executes programs, writing `print` output to `W`.
pub struct Interpreter<W: Write = io::Stdout> {
    globals: EnvRef,
    out: W,
}

impl Interpreter<io::Stdout> {
    /// Interpreter printing to standard output.
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }
}

impl Default for Interpreter<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Interpreter<W> {
    pub fn with_output(out: W) -> Self {
        info!("Initializing Interpreter");

        Self {
            globals: Environment::global(),
            out,
        }
    }

    /// The session's outermost scope; bindings here survive between runs.
    pub fn globals(&self) -> &EnvRef {
        &self.globals
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Scan, parse and execute `source` in `env`.
    ///
    /// Scanner and parser diagnostics come back together as one
    /// [`LoxError::Static`]; nothing runs in that case.
    pub fn run(&mut self, source: &str, env: &EnvRef) -> Result<()> {
        let mut scanner: Scanner<'_> = Scanner::new(source);
        let tokens: Vec<Token> = scanner.by_ref().collect();

        debug!("Scanned {} token(s)", tokens.len());

        let program: Program = Parser::new(tokens)
            .with_errors(scanner.take_errors())
            .parse()?;

        self.interpret(&program, env)
    }

    /// [`run`](Self::run) against the session globals.
    pub fn run_source(&mut self, source: &str) -> Result<()> {
        let globals: EnvRef = Rc::clone(&self.globals);

        self.run(source, &globals)
    }

    /// Interprets a parsed program.
    pub fn interpret(&mut self, program: &Program, env: &EnvRef) -> Result<()> {
        debug!("Interpreting {} statements", program.statements.len());

        for stmt in &program.statements {
            if let Flow::Return(_) = self.execute(stmt, env)? {
                break;
            }
        }

        self.out.flush()?;

        info!("Interpretation completed successfully");

        Ok(())
    }

    // ───────────────────────────── statements ─────────────────────────────

    /// Executes a single statement.
    pub fn execute(&mut self, stmt: &Stmt, env: &EnvRef) -> Result<Flow> {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr, env)?;
            }

            Stmt::Print(expr) => {
                let value: Value = self.evaluate(expr, env)?;

                writeln!(self.out, "{}", value)?;

                debug!("Printed value: {}", value);
            }

            Stmt::Var { name, initializer } => {
                let value: Value = match initializer {
                    Some(expr) => self.evaluate(expr, env)?,
                    None => Value::Nil,
                };

                debug!("Variable '{}' defined as {}", name.lexeme, value.kind());

                env.borrow_mut().declare(&name.lexeme, value);
            }

            Stmt::Block(statements) => {
                return self.execute_block(statements, Environment::push(env));
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition, env)?.is_truthy() {
                    return self.execute(then_branch, env);
                }

                if let Some(else_branch) = else_branch {
                    return self.execute(else_branch, env);
                }
            }

            Stmt::While { condition, body } => {
                debug!("Entering while loop");

                while self.evaluate(condition, env)?.is_truthy() {
                    if let flow @ Flow::Return(_) = self.execute(body, env)? {
                        return Ok(flow);
                    }
                }

                debug!("Exited while loop");
            }

            Stmt::Function(declaration) => {
                debug!("Defining function '{}'", declaration.name.lexeme);

                let function = Function::new(Rc::clone(declaration), Rc::clone(env));

                env.borrow_mut()
                    .declare(&declaration.name.lexeme, Value::Function(Rc::new(function)));
            }

            Stmt::Class { name, methods } => {
                debug!(
                    "Defining class '{}' with {} method(s)",
                    name.lexeme,
                    methods.len()
                );

                let table: HashMap<String, Rc<Function>> = methods
                    .iter()
                    .map(|method| {
                        let function = Function::new(Rc::clone(method), Rc::clone(env));
                        (method.name.lexeme.clone(), Rc::new(function))
                    })
                    .collect();

                let class = Class::new(name.lexeme.clone(), table);

                env.borrow_mut()
                    .declare(&name.lexeme, Value::Class(Rc::new(class)));
            }

            Stmt::Return { value, .. } => {
                let value: Value = match value {
                    Some(expr) => self.evaluate(expr, env)?,
                    None => Value::Nil,
                };

                return Ok(Flow::Return(value));
            }
        }

        Ok(Flow::Normal)
    }

    /// Runs `statements` in `scope`, stopping early on `return`.
    pub fn execute_block(&mut self, statements: &[Stmt], scope: EnvRef) -> Result<Flow> {
        for stmt in statements {
            if let flow @ Flow::Return(_) = self.execute(stmt, &scope)? {
                return Ok(flow);
            }
        }

        Ok(Flow::Normal)
    }

    // ───────────────────────────── expressions ────────────────────────────

    /// Evaluates an expression and returns a Value.
    pub fn evaluate(&mut self, expr: &Expr, env: &EnvRef) -> Result<Value> {
        match expr {
            Expr::Literal(literal) => Ok(match literal {
                LiteralValue::Nil => Value::Nil,
                LiteralValue::Bool(b) => Value::Bool(*b),
                LiteralValue::Number(n) => Value::Number(*n),
                LiteralValue::Str(s) => Value::String(s.clone()),
            }),

            Expr::Grouping(inner) => self.evaluate(inner, env),

            Expr::Unary { operator, right } => {
                let right: Value = self.evaluate(right, env)?;

                match operator.token_type {
                    TokenType::MINUS => match right {
                        Value::Number(n) => Ok(Value::Number(-n)),
                        Value::Bool(b) => Ok(Value::Number(-f64::from(u8::from(b)))),
                        _ => Err(LoxError::runtime(operator, "Operand must be a number.")),
                    },

                    TokenType::BANG => Ok(Value::Bool(!right.is_truthy())),

                    _ => Err(unknown_operator(operator)),
                }
            }

            Expr::Binary {
                left,
                operator,
                right,
            } => {
                let left: Value = self.evaluate(left, env)?;
                let right: Value = self.evaluate(right, env)?;

                binary(operator, left, right)
            }

            Expr::Logical {
                left,
                operator,
                right,
            } => {
                let left: Value = self.evaluate(left, env)?;

                let short_circuit: bool = match operator.token_type {
                    TokenType::OR => left.is_truthy(),
                    _ => !left.is_truthy(),
                };

                if short_circuit {
                    Ok(left)
                } else {
                    self.evaluate(right, env)
                }
            }

            Expr::Variable(name) => env.borrow().lookup(name),

            Expr::Assign { name, value } => {
                let value: Value = self.evaluate(value, env)?;

                env.borrow_mut().assign(name, value.clone())?;

                debug!("Assigned {} to '{}'", value.kind(), name.lexeme);

                Ok(value)
            }

            Expr::Call {
                callee,
                paren,
                arguments,
            } => {
                let callee: Value = self.evaluate(callee, env)?;

                let mut args: Vec<Value> = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    args.push(self.evaluate(argument, env)?);
                }

                match callee {
                    Value::Function(function) => self.invoke(&*function, paren, args),
                    Value::Class(class) => self.invoke(&class, paren, args),
                    Value::BoundMethod(bound) => self.invoke(&*bound, paren, args),
                    other => {
                        debug!("Attempted to call a {}", other.kind());

                        Err(LoxError::runtime(
                            paren,
                            "Can only call functions and classes.",
                        ))
                    }
                }
            }

            Expr::Get { object, name } => match self.evaluate(object, env)? {
                Value::Instance(instance) => Instance::get(&instance, name),
                _ => Err(LoxError::runtime(name, "Only instances have properties.")),
            },
        }
    }

    /// Checks arity, then calls.
    fn invoke<C: Callable>(&mut self, callee: &C, paren: &Token, args: Vec<Value>) -> Result<Value> {
        if args.len() != callee.arity() {
            return Err(LoxError::runtime(
                paren,
                format!(
                    "Expected {} arguments but got {}.",
                    callee.arity(),
                    args.len()
                ),
            ));
        }

        callee.call(self, args)
    }
}

fn binary(operator: &Token, left: Value, right: Value) -> Result<Value> {
    match operator.token_type {
        TokenType::EQUAL_EQUAL => return Ok(Value::Bool(left == right)),

        TokenType::BANG_EQUAL => return Ok(Value::Bool(left != right)),

        TokenType::PLUS => {
            return match (left, right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),

                (l, r) if matches!(l, Value::String(_)) || matches!(r, Value::String(_)) => {
                    Ok(Value::String(format!("{}{}", l, r)))
                }

                _ => Err(LoxError::runtime(
                    operator,
                    "Operands must be two numbers or two strings.",
                )),
            };
        }

        _ => {}
    }

    let (a, b) = match (left, right) {
        (Value::Number(a), Value::Number(b)) => (a, b),
        _ => return Err(LoxError::runtime(operator, "Operands must be numbers.")),
    };

    let value: Value = match operator.token_type {
        TokenType::MINUS => Value::Number(a - b),
        TokenType::STAR => Value::Number(a * b),
        TokenType::SLASH => Value::Number(divide(a, b)),
        TokenType::GREATER => Value::Bool(a > b),
        TokenType::GREATER_EQUAL => Value::Bool(a >= b),
        TokenType::LESS => Value::Bool(a < b),
        TokenType::LESS_EQUAL => Value::Bool(a <= b),
        _ => return Err(unknown_operator(operator)),
    };

    Ok(value)
}

/// Division by zero follows the dividend's sign only: `0/0` is NaN,
/// `x/0` is `+inf` for positive `x` and `-inf` for negative `x`.
fn divide(a: f64, b: f64) -> f64 {
    if b != 0.0 {
        a / b
    } else if a > 0.0 {
        f64::INFINITY
    } else if a < 0.0 {
        f64::NEG_INFINITY
    } else {
        f64::NAN
    }
}

fn unknown_operator(operator: &Token) -> LoxError {
    LoxError::runtime(
        operator,
        format!("Unknown operator '{}'.", operator.lexeme),
    )
}
