//! Arithmetic expression parser and evaluator.
//!
//! Grammar (after cell references have been substituted by numbers):
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('+' | '-') unary | primary
//! primary := NUMBER | '(' expr ')'
//! ```
//!
//! Anything else (identifiers, strings, other operators) is a syntax error.

use super::error::EvalError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
}

/// Parsed arithmetic expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Neg(Box<Expr>),
    Binary {
        op: Op,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    pub fn evaluate(&self) -> Result<f64, EvalError> {
        let value = match self {
            Expr::Number(n) => *n,
            Expr::Neg(inner) => -inner.evaluate()?,
            Expr::Binary { op, left, right } => {
                let l = left.evaluate()?;
                let r = right.evaluate()?;
                match op {
                    Op::Add => l + r,
                    Op::Sub => l - r,
                    Op::Mul => l * r,
                    Op::Div => {
                        if r == 0.0 {
                            return Err(EvalError::DivisionByZero);
                        }
                        l / r
                    }
                }
            }
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(EvalError::NonFinite)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

fn syntax(position: usize, message: impl Into<String>) -> EvalError {
    EvalError::Syntax {
        position,
        message: message.into(),
    }
}

fn tokenize(input: &str) -> Result<Vec<(usize, Token)>, EvalError> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = input.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => {
                i += 1;
            }
            '+' => {
                tokens.push((i, Token::Plus));
                i += 1;
            }
            '-' => {
                tokens.push((i, Token::Minus));
                i += 1;
            }
            '*' => {
                tokens.push((i, Token::Star));
                i += 1;
            }
            '/' => {
                tokens.push((i, Token::Slash));
                i += 1;
            }
            '(' => {
                tokens.push((i, Token::LParen));
                i += 1;
            }
            ')' => {
                tokens.push((i, Token::RParen));
                i += 1;
            }
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let literal: String = chars[start..i].iter().collect();
                let n = literal
                    .parse::<f64>()
                    .map_err(|_| syntax(start, format!("invalid number '{}'", literal)))?;
                tokens.push((start, Token::Number(n)));
            }
            other => {
                return Err(syntax(i, format!("unexpected character '{}'", other)));
            }
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(_, t)| t)
    }

    fn position(&self) -> usize {
        self.tokens.get(self.pos).map(|(p, _)| *p).unwrap_or(self.end)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(_, t)| t.clone());
        self.pos += 1;
        token
    }

    fn parse_expr(&mut self) -> Result<Expr, EvalError> {
        let mut left = self.parse_term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => Op::Add,
                Some(Token::Minus) => Op::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_term()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Expr, EvalError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => Op::Mul,
                Some(Token::Slash) => Op::Div,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, EvalError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.advance();
                Ok(Expr::Neg(Box::new(self.parse_unary()?)))
            }
            Some(Token::Plus) => {
                self.advance();
                self.parse_unary()
            }
            _ => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, EvalError> {
        let position = self.position();
        match self.advance() {
            Some(Token::Number(n)) => Ok(Expr::Number(n)),
            Some(Token::LParen) => {
                let inner = self.parse_expr()?;
                match self.advance() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err(syntax(position, "unclosed parenthesis")),
                }
            }
            Some(token) => Err(syntax(position, format!("unexpected token {:?}", token))),
            None => Err(syntax(position, "unexpected end of formula")),
        }
    }
}

/// Parse an arithmetic expression into an [`Expr`].
pub fn parse(input: &str) -> Result<Expr, EvalError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(EvalError::EmptyFormula);
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        end: input.chars().count(),
    };
    let expr = parser.parse_expr()?;
    if parser.pos < parser.tokens.len() {
        return Err(syntax(parser.position(), "unexpected trailing input"));
    }
    Ok(expr)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(input: &str) -> Result<f64, EvalError> {
        parse(input)?.evaluate()
    }

    #[test]
    fn test_precedence_and_associativity() {
        assert_eq!(eval("1 + 2 * 3").unwrap(), 7.0);
        assert_eq!(eval("(1 + 2) * 3").unwrap(), 9.0);
        assert_eq!(eval("10 - 4 - 3").unwrap(), 3.0);
        assert_eq!(eval("64 / 4 / 2").unwrap(), 8.0);
        assert_eq!(eval("2 * 3 / 4").unwrap(), 1.5);
    }

    #[test]
    fn test_unary_operators() {
        assert_eq!(eval("-5").unwrap(), -5.0);
        assert_eq!(eval("2--5").unwrap(), 7.0);
        assert_eq!(eval("+(3)").unwrap(), 3.0);
        assert_eq!(eval("-(2 + 3) * 2").unwrap(), -10.0);
    }

    #[test]
    fn test_decimal_literals() {
        assert_eq!(eval("0.5 + .25").unwrap(), 0.75);
        assert!(matches!(eval("1.2.3"), Err(EvalError::Syntax { .. })));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(eval("1 / 0"), Err(EvalError::DivisionByZero));
        assert_eq!(eval("1 / (2 - 2)"), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn test_rejects_non_arithmetic_syntax() {
        assert!(matches!(eval("__import__('os')"), Err(EvalError::Syntax { .. })));
        assert!(matches!(eval("abs(1)"), Err(EvalError::Syntax { .. })));
        assert!(matches!(eval("2 ** 3"), Err(EvalError::Syntax { .. })));
        assert!(matches!(eval("1 % 2"), Err(EvalError::Syntax { .. })));
        assert!(matches!(eval("\"text\""), Err(EvalError::Syntax { .. })));
    }

    #[test]
    fn test_incomplete_input() {
        assert!(matches!(eval("1 +"), Err(EvalError::Syntax { .. })));
        assert!(matches!(eval("(1 + 2"), Err(EvalError::Syntax { .. })));
        assert!(matches!(eval("1 2"), Err(EvalError::Syntax { .. })));
        assert!(matches!(eval("()"), Err(EvalError::Syntax { .. })));
        assert_eq!(eval("   "), Err(EvalError::EmptyFormula));
    }

    #[test]
    fn test_overflow_is_non_finite() {
        let big = format!("1{} * 1{}", "0".repeat(200), "0".repeat(200));
        assert_eq!(eval(&big), Err(EvalError::NonFinite));
    }

    #[test]
    fn test_ast_shape() {
        assert_eq!(
            parse("1-2").unwrap(),
            Expr::Binary {
                op: Op::Sub,
                left: Box::new(Expr::Number(1.0)),
                right: Box::new(Expr::Number(2.0)),
            }
        );
    }
}
