// SQL tokens for lexical analysis

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    Identifier(String),
    Number(String),
    String(String),

    // Keywords
    Where,
    And,
    Or,
    Not,
    Null,
    In,
    Between,
    Like,
    Escape,
    Is,
    True,
    False,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,

    // Delimiters
    LeftParen,
    RightParen,
    Comma,
    Semicolon,
    Dot,

    // Special
    Illegal(char),
    Eof,
}

impl Token {
    /// Convert a string to a keyword token if it matches
    pub fn keyword_from_str(s: &str) -> Option<Token> {
        match s.to_uppercase().as_str() {
            "WHERE" => Some(Token::Where),
            "AND" => Some(Token::And),
            "OR" => Some(Token::Or),
            "NOT" => Some(Token::Not),
            "NULL" => Some(Token::Null),
            "IN" => Some(Token::In),
            "BETWEEN" => Some(Token::Between),
            "LIKE" => Some(Token::Like),
            "ESCAPE" => Some(Token::Escape),
            "IS" => Some(Token::Is),
            "TRUE" => Some(Token::True),
            "FALSE" => Some(Token::False),
            _ => None,
        }
    }
}
