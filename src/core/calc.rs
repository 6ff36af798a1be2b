//! Safe arithmetic expression evaluation for calculator input
//!
//! Grammar-limited on purpose: numbers, `+ - * /`, unary minus and
//! parentheses. Input is tokenized and parsed by recursive descent; nothing
//! is ever executed as code.

use anyhow::{Result, anyhow, bail};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' => {
                chars.next();
            }
            '+' => {
                chars.next();
                tokens.push(Token::Plus);
            }
            '-' => {
                chars.next();
                tokens.push(Token::Minus);
            }
            '*' | '×' => {
                chars.next();
                tokens.push(Token::Star);
            }
            '/' | '÷' => {
                chars.next();
                tokens.push(Token::Slash);
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '0'..='9' | '.' => {
                let mut literal = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_digit() || c == '.' {
                        literal.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| anyhow!("Invalid number: {literal}"))?;
                tokens.push(Token::Number(value));
            }
            _ => bail!("Unexpected character: {c}"),
        }
    }

    Ok(tokens)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    // expr := term (('+' | '-') term)*
    fn expr(&mut self) -> Result<f64> {
        let mut value = self.term()?;
        while let Some(op) = self.peek() {
            match op {
                Token::Plus => {
                    self.advance();
                    value += self.term()?;
                }
                Token::Minus => {
                    self.advance();
                    value -= self.term()?;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    // term := factor (('*' | '/') factor)*
    fn term(&mut self) -> Result<f64> {
        let mut value = self.factor()?;
        while let Some(op) = self.peek() {
            match op {
                Token::Star => {
                    self.advance();
                    value *= self.factor()?;
                }
                Token::Slash => {
                    self.advance();
                    let divisor = self.factor()?;
                    if divisor == 0.0 {
                        bail!("Division by zero");
                    }
                    value /= divisor;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    // factor := '-' factor | number | '(' expr ')'
    fn factor(&mut self) -> Result<f64> {
        match self.advance() {
            Some(Token::Minus) => Ok(-self.factor()?),
            Some(Token::Number(value)) => Ok(value),
            Some(Token::LParen) => {
                let value = self.expr()?;
                match self.advance() {
                    Some(Token::RParen) => Ok(value),
                    _ => bail!("Unbalanced parenthesis"),
                }
            }
            Some(token) => bail!("Unexpected token: {token:?}"),
            None => bail!("Unexpected end of expression"),
        }
    }
}

/// Evaluates an arithmetic expression.
pub fn evaluate(input: &str) -> Result<f64> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        bail!("Empty expression");
    }

    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
    };
    let value = parser.expr()?;
    if parser.pos != tokens.len() {
        bail!("Trailing input after expression");
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_arithmetic() {
        assert_eq!(evaluate("1+2").unwrap(), 3.0);
        assert_eq!(evaluate("10 - 4").unwrap(), 6.0);
        assert_eq!(evaluate("6*7").unwrap(), 42.0);
        assert_eq!(evaluate("9/3").unwrap(), 3.0);
    }

    #[test]
    fn test_operator_precedence() {
        assert_eq!(evaluate("2+3*4").unwrap(), 14.0);
        assert_eq!(evaluate("20-10/2").unwrap(), 15.0);
    }

    #[test]
    fn test_parentheses() {
        assert_eq!(evaluate("(2+3)*4").unwrap(), 20.0);
        assert_eq!(evaluate("((1+1))*(2+2)").unwrap(), 8.0);
    }

    #[test]
    fn test_unary_minus() {
        assert_eq!(evaluate("-5+8").unwrap(), 3.0);
        assert_eq!(evaluate("2*-3").unwrap(), -6.0);
        assert_eq!(evaluate("-(2+3)").unwrap(), -5.0);
    }

    #[test]
    fn test_decimals() {
        assert!((evaluate("0.1+0.2").unwrap() - 0.3).abs() < 1e-9);
        assert_eq!(evaluate("1.5*4").unwrap(), 6.0);
    }

    #[test]
    fn test_calculator_symbols() {
        assert_eq!(evaluate("6×7").unwrap(), 42.0);
        assert_eq!(evaluate("9÷3").unwrap(), 3.0);
    }

    #[test]
    fn test_division_by_zero() {
        assert!(evaluate("1/0").is_err());
        assert!(evaluate("5/(2-2)").is_err());
    }

    #[test]
    fn test_malformed_expressions() {
        assert!(evaluate("").is_err());
        assert!(evaluate("1+").is_err());
        assert!(evaluate("(1+2").is_err());
        assert!(evaluate("1+2)").is_err());
        assert!(evaluate("1..2").is_err());
        assert!(evaluate("hello").is_err());
        assert!(evaluate("1;drop").is_err());
    }
}
