// SQL parser - converts WHERE-clause tokens to AST

use super::ast::*;
use super::lexer::Lexer;
use super::token::Token;
use anyhow::{bail, Result};

/// Deepest expression tree the parser builds. Nested parentheses, prefix
/// operators and each extra operand of an AND/OR/arithmetic chain all count.
pub const MAX_DEPTH: usize = 128;

pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
    depth: usize,
}

impl Parser {
    pub fn new(sql: &str) -> Self {
        let mut lexer = Lexer::new(sql);
        let tokens = lexer.tokenize();
        Parser {
            tokens,
            position: 0,
            depth: 0,
        }
    }

    /// Parse a standalone WHERE clause.
    ///
    /// The `WHERE` keyword and a trailing `;` are optional. Returns `None`
    /// when there is no condition at all.
    pub fn parse_where(&mut self) -> Result<Option<Expression>> {
        if self.match_token(&Token::Where) {
            self.advance();
            if self.at_end() {
                bail!("Expected condition after WHERE");
            }
        }

        if self.at_end() {
            return Ok(None);
        }

        let expr = self.parse_expression()?;

        if !self.at_end() {
            bail!("Unexpected token: {:?}", self.current_token());
        }

        Ok(Some(expr))
    }

    fn at_end(&self) -> bool {
        match self.current_token() {
            Token::Eof => true,
            Token::Semicolon => self.tokens.get(self.position + 1) == Some(&Token::Eof),
            _ => false,
        }
    }

    /// Parse expression
    fn parse_expression(&mut self) -> Result<Expression> {
        self.parse_or()
    }

    /// Parse OR expression
    fn parse_or(&mut self) -> Result<Expression> {
        let mut left = self.parse_and()?;
        let mut chained = 0;

        while self.match_token(&Token::Or) {
            self.advance();
            self.descend()?;
            chained += 1;
            let right = self.parse_and()?;
            left = Expression::binary_op(left, BinaryOperator::Or, right);
        }

        self.depth -= chained;
        Ok(left)
    }

    /// Parse AND expression
    fn parse_and(&mut self) -> Result<Expression> {
        let mut left = self.parse_not()?;
        let mut chained = 0;

        while self.match_token(&Token::And) {
            self.advance();
            self.descend()?;
            chained += 1;
            let right = self.parse_not()?;
            left = Expression::binary_op(left, BinaryOperator::And, right);
        }

        self.depth -= chained;
        Ok(left)
    }

    /// Parse NOT expression
    fn parse_not(&mut self) -> Result<Expression> {
        if self.match_token(&Token::Not) {
            self.advance();
            self.descend()?;
            let operand = self.parse_not()?;
            self.depth -= 1;
            Ok(Expression::UnaryOp {
                op: UnaryOperator::Not,
                operand: Box::new(operand),
            })
        } else {
            self.parse_comparison()
        }
    }

    /// Parse comparison expression
    fn parse_comparison(&mut self) -> Result<Expression> {
        let left = self.parse_addition()?;

        if self.match_token(&Token::Is) {
            self.advance();
            let negated = self.consume_not();
            self.expect_token(Token::Null)?;
            return Ok(Expression::IsNull {
                expression: Box::new(left),
                negated,
            });
        }

        // NOT only prefixes IN, BETWEEN and LIKE at this position
        let negated = if self.match_token(&Token::Not) {
            match self.peek_token() {
                Token::In | Token::Between | Token::Like => {
                    self.advance();
                    true
                }
                other => bail!("Expected IN, BETWEEN or LIKE after NOT, found {:?}", other),
            }
        } else {
            false
        };

        if self.match_token(&Token::In) {
            self.advance();
            self.expect_token(Token::LeftParen)?;
            let list = if self.match_token(&Token::RightParen) {
                vec![]
            } else {
                self.parse_expression_list()?
            };
            self.expect_token(Token::RightParen)?;
            return Ok(Expression::InList {
                expression: Box::new(left),
                list,
                negated,
            });
        }

        if self.match_token(&Token::Between) {
            self.advance();
            let low = self.parse_addition()?;
            self.expect_token(Token::And)?;
            let high = self.parse_addition()?;
            return Ok(Expression::Between {
                expression: Box::new(left),
                low: Box::new(low),
                high: Box::new(high),
                negated,
            });
        }

        if self.match_token(&Token::Like) {
            self.advance();
            let pattern = self.parse_addition()?;
            let escape = if self.match_token(&Token::Escape) {
                self.advance();
                Some(Box::new(self.parse_addition()?))
            } else {
                None
            };
            return Ok(Expression::Like {
                expression: Box::new(left),
                pattern: Box::new(pattern),
                escape,
                negated,
            });
        }

        // Standard comparison operators
        let op = match self.current_token() {
            Token::Equal => Some(BinaryOperator::Equal),
            Token::NotEqual => Some(BinaryOperator::NotEqual),
            Token::Less => Some(BinaryOperator::Less),
            Token::Greater => Some(BinaryOperator::Greater),
            Token::LessEqual => Some(BinaryOperator::LessEqual),
            Token::GreaterEqual => Some(BinaryOperator::GreaterEqual),
            _ => None,
        };

        if let Some(op) = op {
            self.advance();
            let right = self.parse_addition()?;
            Ok(Expression::binary_op(left, op, right))
        } else {
            Ok(left)
        }
    }

    /// Parse addition/subtraction expression
    fn parse_addition(&mut self) -> Result<Expression> {
        let mut left = self.parse_multiplication()?;
        let mut chained = 0;

        loop {
            let op = match self.current_token() {
                Token::Plus => BinaryOperator::Plus,
                Token::Minus => BinaryOperator::Minus,
                _ => break,
            };
            self.advance();
            self.descend()?;
            chained += 1;

            let right = self.parse_multiplication()?;
            left = Expression::binary_op(left, op, right);
        }

        self.depth -= chained;
        Ok(left)
    }

    /// Parse multiplication/division expression
    fn parse_multiplication(&mut self) -> Result<Expression> {
        let mut left = self.parse_unary()?;
        let mut chained = 0;

        loop {
            let op = match self.current_token() {
                Token::Star => BinaryOperator::Multiply,
                Token::Slash => BinaryOperator::Divide,
                Token::Percent => BinaryOperator::Modulo,
                _ => break,
            };
            self.advance();
            self.descend()?;
            chained += 1;

            let right = self.parse_unary()?;
            left = Expression::binary_op(left, op, right);
        }

        self.depth -= chained;
        Ok(left)
    }

    /// Parse unary expression
    fn parse_unary(&mut self) -> Result<Expression> {
        let op = match self.current_token() {
            Token::Plus => UnaryOperator::Plus,
            Token::Minus => UnaryOperator::Minus,
            _ => return self.parse_primary(),
        };
        self.advance();
        self.descend()?;

        let operand = self.parse_unary()?;
        self.depth -= 1;
        Ok(Expression::UnaryOp {
            op,
            operand: Box::new(operand),
        })
    }

    /// Parse primary expression
    fn parse_primary(&mut self) -> Result<Expression> {
        match self.current_token() {
            Token::Number(n) => {
                self.advance();
                Ok(Expression::Literal(Literal::Number(n)))
            }
            Token::String(s) => {
                self.advance();
                Ok(Expression::Literal(Literal::String(s)))
            }
            Token::True => {
                self.advance();
                Ok(Expression::Literal(Literal::Boolean(true)))
            }
            Token::False => {
                self.advance();
                Ok(Expression::Literal(Literal::Boolean(false)))
            }
            Token::Null => {
                self.advance();
                Ok(Expression::Literal(Literal::Null))
            }
            Token::Identifier(name) => {
                self.advance();

                // Check for qualified column (table.column)
                if self.match_token(&Token::Dot) {
                    self.advance();
                    let column = self.expect_identifier()?;
                    Ok(Expression::QualifiedColumn(name, column))
                }
                // Check for function call
                else if self.match_token(&Token::LeftParen) {
                    self.advance();
                    let args = if self.match_token(&Token::RightParen) {
                        vec![]
                    } else {
                        self.parse_expression_list()?
                    };
                    self.expect_token(Token::RightParen)?;
                    Ok(Expression::Function { name, args })
                } else {
                    Ok(Expression::Column(name))
                }
            }
            Token::LeftParen => {
                self.advance();
                self.descend()?;
                let expr = self.parse_expression()?;
                self.expect_token(Token::RightParen)?;
                self.depth -= 1;
                Ok(Expression::Nested(Box::new(expr)))
            }
            Token::Illegal(c) => bail!("Unexpected character: {:?}", c),
            other => bail!("Unexpected token: {:?}", other),
        }
    }

    /// Parse list of expressions
    fn parse_expression_list(&mut self) -> Result<Vec<Expression>> {
        let mut expressions = vec![];

        loop {
            expressions.push(self.parse_expression()?);
            if !self.match_token(&Token::Comma) {
                break;
            }
            self.advance();
        }

        Ok(expressions)
    }

    // Helper methods

    /// Enter one more level of the expression tree
    fn descend(&mut self) -> Result<()> {
        if self.depth >= MAX_DEPTH {
            bail!("Expression nested too deeply (limit {})", MAX_DEPTH);
        }
        self.depth += 1;
        Ok(())
    }

    /// Get current token
    fn current_token(&self) -> Token {
        self.tokens
            .get(self.position)
            .cloned()
            .unwrap_or(Token::Eof)
    }

    fn peek_token(&self) -> Token {
        self.tokens
            .get(self.position + 1)
            .cloned()
            .unwrap_or(Token::Eof)
    }

    /// Advance to next token
    fn advance(&mut self) {
        if self.position + 1 < self.tokens.len() {
            self.position += 1;
        }
    }

    /// Check if current token matches
    fn match_token(&self, token: &Token) -> bool {
        self.tokens.get(self.position) == Some(token)
    }

    fn consume_not(&mut self) -> bool {
        if self.match_token(&Token::Not) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expect a specific token
    fn expect_token(&mut self, token: Token) -> Result<()> {
        if self.match_token(&token) {
            self.advance();
            Ok(())
        } else {
            bail!("Expected {:?}, found {:?}", token, self.current_token())
        }
    }

    /// Expect an identifier
    fn expect_identifier(&mut self) -> Result<String> {
        match self.current_token() {
            Token::Identifier(name) => {
                self.advance();
                Ok(name)
            }
            other => bail!("Expected identifier, found {:?}", other),
        }
    }
}

/// Parse WHERE-clause text into an expression tree
pub fn parse_where(sql: &str) -> Result<Option<Expression>> {
    Parser::new(sql).parse_where()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(sql: &str) -> Expression {
        parse_where(sql).unwrap().expect("condition")
    }

    #[test]
    fn test_parse_empty_clause() {
        assert_eq!(parse_where("").unwrap(), None);
        assert_eq!(parse_where("   \n").unwrap(), None);
        assert_eq!(parse_where(";").unwrap(), None);
        assert!(parse_where("WHERE").is_err());
    }

    #[test]
    fn test_parse_simple_comparison() {
        let expr = parse("WHERE age > 18;");
        assert_eq!(
            expr,
            Expression::binary_op(
                Expression::column("age"),
                BinaryOperator::Greater,
                Expression::number("18"),
            )
        );
    }

    #[test]
    fn test_parse_precedence() {
        // AND binds tighter than OR
        let expr = parse("a = 1 OR b = 2 AND c = 3");
        match expr {
            Expression::BinaryOp {
                op: BinaryOperator::Or,
                right,
                ..
            } => assert!(matches!(
                *right,
                Expression::BinaryOp {
                    op: BinaryOperator::And,
                    ..
                }
            )),
            other => panic!("Expected OR expression, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_nested() {
        let expr = parse("(name = '李四' AND age > 30) OR (salary > 7000 AND is_active = true)");
        match expr {
            Expression::BinaryOp {
                left,
                op: BinaryOperator::Or,
                right,
            } => {
                assert!(matches!(*left, Expression::Nested(_)));
                assert!(matches!(*right, Expression::Nested(_)));
            }
            other => panic!("Expected OR expression, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_negated_forms() {
        assert!(matches!(
            parse("name NOT LIKE '李%'"),
            Expression::Like { negated: true, escape: None, .. }
        ));
        assert!(matches!(
            parse("age NOT IN (20, 30, 35)"),
            Expression::InList { negated: true, ref list, .. } if list.len() == 3
        ));
        assert!(matches!(
            parse("age NOT BETWEEN 20 AND 30"),
            Expression::Between { negated: true, .. }
        ));
        assert!(matches!(
            parse("name IS NOT NULL"),
            Expression::IsNull { negated: true, .. }
        ));
        assert!(matches!(
            parse("NOT age > 1"),
            Expression::UnaryOp {
                op: UnaryOperator::Not,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_between_binds_its_and() {
        let expr = parse("age BETWEEN 20 AND 30 AND is_active = true");
        match expr {
            Expression::BinaryOp {
                left,
                op: BinaryOperator::And,
                ..
            } => assert!(matches!(*left, Expression::Between { .. })),
            other => panic!("Expected AND expression, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_literals() {
        assert_eq!(
            parse("salary IN (5000.50, -1, NULL, 'x', false)"),
            Expression::InList {
                expression: Box::new(Expression::column("salary")),
                list: vec![
                    Expression::number("5000.50"),
                    Expression::UnaryOp {
                        op: UnaryOperator::Minus,
                        operand: Box::new(Expression::number("1")),
                    },
                    Expression::Literal(Literal::Null),
                    Expression::string("x"),
                    Expression::Literal(Literal::Boolean(false)),
                ],
                negated: false,
            }
        );
    }

    #[test]
    fn test_parse_qualified_and_function() {
        assert!(matches!(
            parse("users.age = 1"),
            Expression::BinaryOp { ref left, .. }
                if **left == Expression::QualifiedColumn("users".to_string(), "age".to_string())
        ));
        assert!(matches!(
            parse("lower(name) = 'x'"),
            Expression::BinaryOp { ref left, .. }
                if matches!(**left, Expression::Function { ref name, .. } if name == "lower")
        ));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_where("name CONTAINS '张'").is_err());
        assert!(parse_where("(age > 1").is_err());
        assert!(parse_where("age >").is_err());
        assert!(parse_where("age = 'open").is_err());
        assert!(parse_where("age IS 5").is_err());
        assert!(parse_where("age NOT 5").is_err());
        assert!(parse_where("age # 5").is_err());
        assert!(parse_where("age = 1;; ").is_err());
    }

    #[test]
    fn test_parse_depth_limit() {
        let nested = |n: usize| format!("{}age = 25{}", "(".repeat(n), ")".repeat(n));
        assert!(parse_where(&nested(MAX_DEPTH - 1)).is_ok());
        assert!(parse_where(&nested(MAX_DEPTH + 1)).is_err());
        assert!(parse_where(&nested(10_000)).is_err());

        // unclosed parentheses stop at the limit too
        assert!(parse_where(&"(".repeat(10_000)).is_err());

        let err = parse_where(&format!("{}age = 25", "NOT ".repeat(10_000))).unwrap_err();
        assert!(err.to_string().contains("nested too deeply"));

        assert!(parse_where(&format!("age = {}1", "+".repeat(10_000))).is_err());

        let chain = vec!["age = 25"; 10_000].join(" AND ");
        assert!(parse_where(&chain).is_err());
        let chain = vec!["age = 25"; 10_000].join(" OR ");
        assert!(parse_where(&chain).is_err());
        assert!(parse_where(&format!("age = {}", vec!["1"; 10_000].join(" + "))).is_err());

        let chain = vec!["age = 25"; MAX_DEPTH].join(" AND ");
        assert!(parse_where(&chain).is_ok());
    }
}
