// SQL Abstract Syntax Tree (AST) definitions for WHERE clauses

use std::fmt;

/// Literal as written in the source text. Numbers keep their text so the
/// consumer decides how to type them.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(String),
    String(String),
    Boolean(bool),
    Null,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    // Literals
    Literal(Literal),

    // Column reference
    Column(String),
    QualifiedColumn(String, String), // table.column

    // Parenthesized expression
    Nested(Box<Expression>),

    // Binary operations
    BinaryOp {
        left: Box<Expression>,
        op: BinaryOperator,
        right: Box<Expression>,
    },

    // Unary operations
    UnaryOp {
        op: UnaryOperator,
        operand: Box<Expression>,
    },

    // Function call
    Function { name: String, args: Vec<Expression> },

    // IN expression
    InList {
        expression: Box<Expression>,
        list: Vec<Expression>,
        negated: bool,
    },

    // BETWEEN expression
    Between {
        expression: Box<Expression>,
        low: Box<Expression>,
        high: Box<Expression>,
        negated: bool,
    },

    // LIKE expression
    Like {
        expression: Box<Expression>,
        pattern: Box<Expression>,
        escape: Option<Box<Expression>>,
        negated: bool,
    },

    // IS NULL expression
    IsNull {
        expression: Box<Expression>,
        negated: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    // Arithmetic
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,

    // Comparison
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,

    // Logical
    And,
    Or,
}

impl BinaryOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOperator::Plus => "+",
            BinaryOperator::Minus => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "%",
            BinaryOperator::Equal => "=",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::Less => "<",
            BinaryOperator::Greater => ">",
            BinaryOperator::LessEqual => "<=",
            BinaryOperator::GreaterEqual => ">=",
            BinaryOperator::And => "AND",
            BinaryOperator::Or => "OR",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Not,
    Minus,
    Plus,
}

impl UnaryOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOperator::Not => "NOT",
            UnaryOperator::Minus => "-",
            UnaryOperator::Plus => "+",
        }
    }
}

impl Expression {
    /// Create a column reference expression
    pub fn column(name: impl Into<String>) -> Self {
        Expression::Column(name.into())
    }

    pub fn number(text: impl Into<String>) -> Self {
        Expression::Literal(Literal::Number(text.into()))
    }

    pub fn string(text: impl Into<String>) -> Self {
        Expression::Literal(Literal::String(text.into()))
    }

    /// Create a binary operation expression
    pub fn binary_op(left: Expression, op: BinaryOperator, right: Expression) -> Self {
        Expression::BinaryOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// Create an AND expression
    pub fn and(self, other: Expression) -> Self {
        Self::binary_op(self, BinaryOperator::And, other)
    }

    /// Create an OR expression
    pub fn or(self, other: Expression) -> Self {
        Self::binary_op(self, BinaryOperator::Or, other)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Number(n) => f.write_str(n),
            Literal::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Literal::Boolean(true) => f.write_str("TRUE"),
            Literal::Boolean(false) => f.write_str("FALSE"),
            Literal::Null => f.write_str("NULL"),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Expression]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

/// SQL rendering used in diagnostics
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let not = |negated: bool| if negated { "NOT " } else { "" };
        match self {
            Expression::Literal(lit) => write!(f, "{}", lit),
            Expression::Column(name) => f.write_str(name),
            Expression::QualifiedColumn(table, column) => write!(f, "{}.{}", table, column),
            Expression::Nested(inner) => write!(f, "({})", inner),
            Expression::BinaryOp { left, op, right } => {
                write!(f, "{} {} {}", left, op.as_str(), right)
            }
            Expression::UnaryOp {
                op: UnaryOperator::Not,
                operand,
            } => write!(f, "NOT {}", operand),
            Expression::UnaryOp { op, operand } => write!(f, "{}{}", op.as_str(), operand),
            Expression::Function { name, args } => {
                write!(f, "{}(", name)?;
                write_list(f, args)?;
                f.write_str(")")
            }
            Expression::InList {
                expression,
                list,
                negated,
            } => {
                write!(f, "{} {}IN (", expression, not(*negated))?;
                write_list(f, list)?;
                f.write_str(")")
            }
            Expression::Between {
                expression,
                low,
                high,
                negated,
            } => write!(
                f,
                "{} {}BETWEEN {} AND {}",
                expression,
                not(*negated),
                low,
                high
            ),
            Expression::Like {
                expression,
                pattern,
                escape,
                negated,
            } => {
                write!(f, "{} {}LIKE {}", expression, not(*negated), pattern)?;
                if let Some(escape) = escape {
                    write!(f, " ESCAPE {}", escape)?;
                }
                Ok(())
            }
            Expression::IsNull {
                expression,
                negated,
            } => write!(f, "{} IS {}NULL", expression, not(*negated)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expression_builders() {
        let expr = Expression::binary_op(
            Expression::column("age"),
            BinaryOperator::Greater,
            Expression::number("18"),
        )
        .and(Expression::binary_op(
            Expression::column("status"),
            BinaryOperator::Equal,
            Expression::string("active"),
        ));

        match expr {
            Expression::BinaryOp {
                op: BinaryOperator::And,
                ..
            } => {}
            _ => panic!("Expected AND expression"),
        }
    }

    #[test]
    fn test_display() {
        let expr = Expression::Nested(Box::new(Expression::InList {
            expression: Box::new(Expression::QualifiedColumn(
                "u".to_string(),
                "age".to_string(),
            )),
            list: vec![Expression::number("20"), Expression::string("it's")],
            negated: true,
        }))
        .or(Expression::IsNull {
            expression: Box::new(Expression::column("name")),
            negated: false,
        });

        assert_eq!(
            expr.to_string(),
            "(u.age NOT IN (20, 'it''s')) OR name IS NULL"
        );
    }
}
