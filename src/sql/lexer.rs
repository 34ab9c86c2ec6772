// SQL lexer - tokenizes WHERE-clause text

use super::token::Token;

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    current_char: Option<char>,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        let input: Vec<char> = input.chars().collect();
        let current_char = input.first().copied();
        Lexer {
            input,
            position: 0,
            current_char,
        }
    }

    /// Get the next token from the input
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        while self.current_char == Some('-') && self.peek() == Some('-') {
            self.skip_comment();
            self.skip_whitespace();
        }

        let Some(ch) = self.current_char else {
            return Token::Eof;
        };

        match ch {
            '+' => {
                self.advance();
                Token::Plus
            }
            '-' => {
                self.advance();
                Token::Minus
            }
            '*' => {
                self.advance();
                Token::Star
            }
            '/' => {
                self.advance();
                Token::Slash
            }
            '%' => {
                self.advance();
                Token::Percent
            }
            '=' => {
                self.advance();
                Token::Equal
            }
            '<' => {
                self.advance();
                if self.current_char == Some('=') {
                    self.advance();
                    Token::LessEqual
                } else if self.current_char == Some('>') {
                    self.advance();
                    Token::NotEqual
                } else {
                    Token::Less
                }
            }
            '>' => {
                self.advance();
                if self.current_char == Some('=') {
                    self.advance();
                    Token::GreaterEqual
                } else {
                    Token::Greater
                }
            }
            '!' => {
                self.advance();
                if self.current_char == Some('=') {
                    self.advance();
                    Token::NotEqual
                } else {
                    Token::Illegal('!')
                }
            }
            '(' => {
                self.advance();
                Token::LeftParen
            }
            ')' => {
                self.advance();
                Token::RightParen
            }
            ',' => {
                self.advance();
                Token::Comma
            }
            ';' => {
                self.advance();
                Token::Semicolon
            }
            '.' if self.peek().is_some_and(|c| c.is_ascii_digit()) => self.read_number(),
            '.' => {
                self.advance();
                Token::Dot
            }
            '\'' => self.read_string(),
            '"' => self.read_quoted_identifier('"'),
            '`' => self.read_quoted_identifier('`'),
            c if c.is_alphabetic() || c == '_' => self.read_identifier(),
            c if c.is_ascii_digit() => self.read_number(),
            c => {
                self.advance();
                Token::Illegal(c)
            }
        }
    }

    /// Advance to the next character
    fn advance(&mut self) {
        self.position += 1;
        self.current_char = self.input.get(self.position).copied();
    }

    /// Peek at the next character without advancing
    fn peek(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    /// Skip whitespace characters
    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Skip single-line comments starting with --
    fn skip_comment(&mut self) {
        while let Some(ch) = self.current_char {
            self.advance();
            if ch == '\n' {
                break;
            }
        }
    }

    /// Read an identifier or keyword
    fn read_identifier(&mut self) -> Token {
        let mut identifier = String::new();

        while let Some(ch) = self.current_char {
            if ch.is_alphanumeric() || ch == '_' {
                identifier.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        // Check if it's a keyword
        Token::keyword_from_str(&identifier).unwrap_or(Token::Identifier(identifier))
    }

    /// Read a quoted identifier (e.g., "is active" or `is_active`)
    fn read_quoted_identifier(&mut self, quote: char) -> Token {
        self.advance(); // Skip opening quote
        let mut identifier = String::new();

        while let Some(ch) = self.current_char {
            if ch == quote {
                if self.peek() == Some(quote) {
                    // Doubled quote stands for itself
                    identifier.push(quote);
                    self.advance();
                    self.advance();
                } else {
                    self.advance(); // Skip closing quote
                    return Token::Identifier(identifier);
                }
            } else {
                identifier.push(ch);
                self.advance();
            }
        }

        Token::Illegal(quote)
    }

    /// Read a string literal
    fn read_string(&mut self) -> Token {
        self.advance(); // Skip opening quote
        let mut string = String::new();

        while let Some(ch) = self.current_char {
            if ch == '\'' {
                if self.peek() == Some('\'') {
                    // Handle escaped single quotes
                    string.push('\'');
                    self.advance();
                    self.advance();
                } else {
                    self.advance(); // Skip closing quote
                    return Token::String(string);
                }
            } else {
                string.push(ch);
                self.advance();
            }
        }

        // Unterminated literal
        Token::Illegal('\'')
    }

    /// Read a number (integer or float, with optional exponent)
    fn read_number(&mut self) -> Token {
        let mut number = String::new();
        let mut has_dot = false;

        while let Some(ch) = self.current_char {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else if ch == '.' && !has_dot && self.peek().is_some_and(|c| c.is_ascii_digit()) {
                has_dot = true;
                number.push(ch);
                self.advance();
            } else if (ch == 'e' || ch == 'E') && self.exponent_follows() {
                number.push(ch);
                self.advance();
                if let Some(sign @ ('+' | '-')) = self.current_char {
                    number.push(sign);
                    self.advance();
                }
                while let Some(d) = self.current_char.filter(|c| c.is_ascii_digit()) {
                    number.push(d);
                    self.advance();
                }
                break;
            } else {
                break;
            }
        }

        Token::Number(number)
    }

    fn exponent_follows(&self) -> bool {
        match self.peek() {
            Some(c) if c.is_ascii_digit() => true,
            Some('+' | '-') => self
                .input
                .get(self.position + 2)
                .is_some_and(|c| c.is_ascii_digit()),
            _ => false,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token();
            if token == Token::Eof {
                tokens.push(token);
                break;
            }
            tokens.push(token);
        }

        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_tokens() {
        let mut lexer = Lexer::new("WHERE age > 18");
        assert_eq!(lexer.next_token(), Token::Where);
        assert_eq!(lexer.next_token(), Token::Identifier("age".to_string()));
        assert_eq!(lexer.next_token(), Token::Greater);
        assert_eq!(lexer.next_token(), Token::Number("18".to_string()));
        assert_eq!(lexer.next_token(), Token::Eof);
    }

    #[test]
    fn test_operators() {
        let mut lexer = Lexer::new("+ - * / % = < > <= >= <> !=");
        assert_eq!(lexer.next_token(), Token::Plus);
        assert_eq!(lexer.next_token(), Token::Minus);
        assert_eq!(lexer.next_token(), Token::Star);
        assert_eq!(lexer.next_token(), Token::Slash);
        assert_eq!(lexer.next_token(), Token::Percent);
        assert_eq!(lexer.next_token(), Token::Equal);
        assert_eq!(lexer.next_token(), Token::Less);
        assert_eq!(lexer.next_token(), Token::Greater);
        assert_eq!(lexer.next_token(), Token::LessEqual);
        assert_eq!(lexer.next_token(), Token::GreaterEqual);
        assert_eq!(lexer.next_token(), Token::NotEqual);
        assert_eq!(lexer.next_token(), Token::NotEqual);
    }

    #[test]
    fn test_string_literals() {
        let mut lexer = Lexer::new("'hello world' 'it''s fine' '张%' ''");
        assert_eq!(lexer.next_token(), Token::String("hello world".to_string()));
        assert_eq!(lexer.next_token(), Token::String("it's fine".to_string()));
        assert_eq!(lexer.next_token(), Token::String("张%".to_string()));
        assert_eq!(lexer.next_token(), Token::String(String::new()));
        assert_eq!(lexer.next_token(), Token::Eof);
    }

    #[test]
    fn test_unterminated_string() {
        let mut lexer = Lexer::new("name = 'abc");
        lexer.next_token();
        lexer.next_token();
        assert_eq!(lexer.next_token(), Token::Illegal('\''));
    }

    #[test]
    fn test_numbers() {
        let mut lexer = Lexer::new("123 456.789 0.5 1e3 2.5E-2 7.");
        assert_eq!(lexer.next_token(), Token::Number("123".to_string()));
        assert_eq!(lexer.next_token(), Token::Number("456.789".to_string()));
        assert_eq!(lexer.next_token(), Token::Number("0.5".to_string()));
        assert_eq!(lexer.next_token(), Token::Number("1e3".to_string()));
        assert_eq!(lexer.next_token(), Token::Number("2.5E-2".to_string()));
        assert_eq!(lexer.next_token(), Token::Number("7".to_string()));
        assert_eq!(lexer.next_token(), Token::Dot);
    }

    #[test]
    fn test_leading_dot_numbers() {
        let mut lexer = Lexer::new("age = .5 t.x .e");
        assert_eq!(lexer.next_token(), Token::Identifier("age".to_string()));
        assert_eq!(lexer.next_token(), Token::Equal);
        assert_eq!(lexer.next_token(), Token::Number(".5".to_string()));
        assert_eq!(lexer.next_token(), Token::Identifier("t".to_string()));
        assert_eq!(lexer.next_token(), Token::Dot);
        assert_eq!(lexer.next_token(), Token::Identifier("x".to_string()));
        assert_eq!(lexer.next_token(), Token::Dot);
        assert_eq!(lexer.next_token(), Token::Identifier("e".to_string()));
    }

    #[test]
    fn test_quoted_identifiers() {
        let mut lexer = Lexer::new(r#""is active" `salary` "a""b""#);
        assert_eq!(
            lexer.next_token(),
            Token::Identifier("is active".to_string())
        );
        assert_eq!(lexer.next_token(), Token::Identifier("salary".to_string()));
        assert_eq!(lexer.next_token(), Token::Identifier("a\"b".to_string()));
    }

    #[test]
    fn test_comments() {
        let mut lexer = Lexer::new("age -- comment\n> 1");
        assert_eq!(lexer.next_token(), Token::Identifier("age".to_string()));
        assert_eq!(lexer.next_token(), Token::Greater);
        assert_eq!(lexer.next_token(), Token::Number("1".to_string()));

        let mut lexer = Lexer::new("1 - 2 -- trailing");
        assert_eq!(lexer.next_token(), Token::Number("1".to_string()));
        assert_eq!(lexer.next_token(), Token::Minus);
        assert_eq!(lexer.next_token(), Token::Number("2".to_string()));
        assert_eq!(lexer.next_token(), Token::Eof);

        let text = format!("{}age", "-- note\n".repeat(100_000));
        let mut lexer = Lexer::new(&text);
        assert_eq!(lexer.next_token(), Token::Identifier("age".to_string()));
        assert_eq!(lexer.next_token(), Token::Eof);
    }

    #[test]
    fn test_unicode_identifiers_and_illegal_chars() {
        let mut lexer = Lexer::new("名字 = 'x' # ?");
        assert_eq!(lexer.next_token(), Token::Identifier("名字".to_string()));
        assert_eq!(lexer.next_token(), Token::Equal);
        assert_eq!(lexer.next_token(), Token::String("x".to_string()));
        assert_eq!(lexer.next_token(), Token::Illegal('#'));
        assert_eq!(lexer.next_token(), Token::Illegal('?'));
        assert_eq!(lexer.next_token(), Token::Eof);
    }

    #[test]
    fn test_full_clause() {
        let mut lexer =
            Lexer::new("(name LIKE '张%' AND age BETWEEN 20 AND 30) OR is_active IS NOT NULL");
        let tokens = lexer.tokenize();

        assert_eq!(tokens[0], Token::LeftParen);
        assert_eq!(tokens[1], Token::Identifier("name".to_string()));
        assert_eq!(tokens[2], Token::Like);
        assert_eq!(tokens[3], Token::String("张%".to_string()));
        assert_eq!(tokens[4], Token::And);
        assert_eq!(tokens[5], Token::Identifier("age".to_string()));
        assert_eq!(tokens[6], Token::Between);
        assert_eq!(tokens[7], Token::Number("20".to_string()));
        assert_eq!(tokens[8], Token::And);
        assert_eq!(tokens[9], Token::Number("30".to_string()));
        assert_eq!(tokens[10], Token::RightParen);
        assert_eq!(tokens[11], Token::Or);
        assert_eq!(tokens[12], Token::Identifier("is_active".to_string()));
        assert_eq!(tokens[13], Token::Is);
        assert_eq!(tokens[14], Token::Not);
        assert_eq!(tokens[15], Token::Null);
        assert_eq!(tokens[16], Token::Eof);
    }
}
