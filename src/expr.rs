use crate::token::Token;
use crate::value::object::Object;
use std::fmt::Display;

/// Expression nodes of the syntax tree.
///
/// `Variable`, `Assign`, `This`, and `Super` carry a parser-assigned `id`
/// that is unique per occurrence. The resolver's side table maps these ids
/// to lexical depths, so two textually identical references to the same
/// name still resolve independently.
#[derive(Debug)]
pub enum Expr {
    Literal {
        value: Object,
    },
    Unary {
        operator: Token,
        right: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },
    Logical {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },
    Grouping {
        expression: Box<Expr>,
    },
    Variable {
        id: usize,
        name: Token,
    },
    Assign {
        id: usize,
        name: Token,
        value: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        /// The closing parenthesis, kept for error reporting.
        paren: Token,
        arguments: Vec<Expr>,
    },
    Get {
        object: Box<Expr>,
        name: Token,
    },
    Set {
        object: Box<Expr>,
        name: Token,
        value: Box<Expr>,
    },
    This {
        id: usize,
        keyword: Token,
    },
    Super {
        id: usize,
        keyword: Token,
        method: Token,
    },
}

/// The parenthesized form used by the `parse` command.
impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Literal { value } => match value {
                // Number literals keep their decimal point here, unlike
                // runtime printing.
                Object::Number(n) => write!(f, "{n:?}"),
                _ => write!(f, "{value}"),
            },
            Expr::Unary { operator, right } => write!(f, "({} {right})", operator.lexeme),
            Expr::Binary {
                left,
                operator,
                right,
            } => write!(f, "({} {left} {right})", operator.lexeme),
            Expr::Logical {
                left,
                operator,
                right,
            } => write!(f, "({} {left} {right})", operator.lexeme),
            Expr::Grouping { expression } => write!(f, "(group {expression})"),
            Expr::Variable { name, .. } => write!(f, "{}", name.lexeme),
            Expr::Assign { name, value, .. } => write!(f, "(= {} {value})", name.lexeme),
            Expr::Call {
                callee, arguments, ..
            } => {
                write!(f, "(call {callee}")?;
                for argument in arguments {
                    write!(f, " {argument}")?;
                }
                write!(f, ")")
            }
            Expr::Get { object, name } => write!(f, "(. {object} {})", name.lexeme),
            Expr::Set {
                object,
                name,
                value,
            } => write!(f, "(set {object} {} {value})", name.lexeme),
            Expr::This { .. } => write!(f, "this"),
            Expr::Super { method, .. } => write!(f, "(super {})", method.lexeme),
        }
    }
}
