use crate::ast::{Expr, FunctionDecl, LiteralValue, Program, Stmt};

/// Converts a syntax tree to a parenthesised prefix form, one top‑level
/// statement per line.
pub struct AstPrinter;

impl AstPrinter {
    pub fn program(program: &Program) -> String {
        program
            .statements
            .iter()
            .map(Self::stmt)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn stmt(stmt: &Stmt) -> String {
        match stmt {
            Stmt::Expression(expr) => format!("(; {})", Self::expr(expr)),

            Stmt::Print(expr) => format!("(print {})", Self::expr(expr)),

            Stmt::Var { name, initializer } => match initializer {
                Some(init) => format!("(var {} {})", name.lexeme, Self::expr(init)),
                None => format!("(var {})", name.lexeme),
            },

            Stmt::Block(statements) => Self::wrap("block", statements.iter().map(Self::stmt)),

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => match else_branch {
                Some(else_branch) => format!(
                    "(if {} {} {})",
                    Self::expr(condition),
                    Self::stmt(then_branch),
                    Self::stmt(else_branch)
                ),
                None => format!("(if {} {})", Self::expr(condition), Self::stmt(then_branch)),
            },

            Stmt::While { condition, body } => {
                format!("(while {} {})", Self::expr(condition), Self::stmt(body))
            }

            Stmt::Function(decl) => Self::function("fun", decl),

            Stmt::Class { name, methods } => Self::wrap(
                &format!("class {}", name.lexeme),
                methods.iter().map(|m| Self::function("method", m)),
            ),

            Stmt::Return { value, .. } => match value {
                Some(value) => format!("(return {})", Self::expr(value)),
                None => "(return)".into(),
            },
        }
    }

    pub fn expr(expr: &Expr) -> String {
        match expr {
            // ── literals ────────────────────────────────────────────────
            Expr::Literal(lit) => match lit {
                LiteralValue::Bool(b) => b.to_string(),

                LiteralValue::Nil => "nil".into(),

                LiteralValue::Str(s) => s.clone(),

                LiteralValue::Number(n) => {
                    if n.fract() == 0.0 {
                        // 3 → 3.0
                        format!("{:.1}", n)
                    } else {
                        n.to_string()
                    }
                }
            },

            Expr::Grouping(inner) => format!("(group {})", Self::expr(inner)),

            Expr::Unary { operator, right } => {
                format!("({} {})", operator.lexeme, Self::expr(right))
            }

            Expr::Binary {
                left,
                operator,
                right,
            }
            | Expr::Logical {
                left,
                operator,
                right,
            } => format!(
                "({} {} {})",
                operator.lexeme,
                Self::expr(left),
                Self::expr(right)
            ),

            Expr::Variable(name) => name.lexeme.clone(),

            Expr::Assign { name, value } => format!("(= {} {})", name.lexeme, Self::expr(value)),

            Expr::Call {
                callee, arguments, ..
            } => Self::wrap(
                "call",
                std::iter::once(Self::expr(callee)).chain(arguments.iter().map(Self::expr)),
            ),

            Expr::Get { object, name } => format!("(. {} {})", Self::expr(object), name.lexeme),
        }
    }

    fn function(keyword: &str, decl: &FunctionDecl) -> String {
        let params: Vec<&str> = decl.params.iter().map(|p| p.lexeme.as_str()).collect();

        Self::wrap(
            &format!("{} {} ({})", keyword, decl.name.lexeme, params.join(" ")),
            decl.body.iter().map(Self::stmt),
        )
    }

    fn wrap(head: &str, parts: impl Iterator<Item = String>) -> String {
        let mut out = format!("({}", head);

        for part in parts {
            out.push(' ');
            out.push_str(&part);
        }

        out.push(')');
        out
    }
}
