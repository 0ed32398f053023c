use crate::{
    ast::{BinaryOp, Expr, WhenBranch},
    error::{ExpressionError, Result},
    lexer::{Lexer, Token},
};
use model::core::value::Value;

/// Parses a restricted SQL-like expression into an [`Expr`] AST.
/// Returns `Err(ExpressionError::Parse)` only on a grammar violation.
pub fn parse(source: &str) -> Result<Expr> {
    let tokens = Lexer::new(source).tokenize()?;
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_or()?;
    parser.expect(&Token::Eof)?;
    Ok(expr)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn bump(&mut self) -> Token {
        let t = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        t
    }

    fn expect(&mut self, want: &Token) -> Result<()> {
        if self.peek() == want {
            self.bump();
            Ok(())
        } else {
            Err(ExpressionError::Parse {
                message: format!("expected {want:?}, found {:?}", self.peek()),
                position: self.pos,
            })
        }
    }

    // OR has the lowest precedence, then AND, then NOT, then comparisons,
    // then additive, then multiplicative, then power, then unary, then atoms.
    fn parse_or(&mut self) -> Result<Expr> {
        let mut left = self.parse_and()?;
        while matches!(self.peek(), Token::Or) {
            self.bump();
            let right = self.parse_and()?;
            left = Expr::Binary {
                left: Box::new(left),
                op: BinaryOp::Or,
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr> {
        let mut left = self.parse_not()?;
        while matches!(self.peek(), Token::And) {
            self.bump();
            let right = self.parse_not()?;
            left = Expr::Binary {
                left: Box::new(left),
                op: BinaryOp::And,
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Expr> {
        if matches!(self.peek(), Token::Not) {
            self.bump();
            let inner = self.parse_not()?;
            return Ok(Expr::Not(Box::new(inner)));
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expr> {
        let left = self.parse_additive()?;

        match self.peek() {
            Token::Eq => {
                self.bump();
                let right = self.parse_additive()?;
                Ok(Expr::Binary {
                    left: Box::new(left),
                    op: BinaryOp::Eq,
                    right: Box::new(right),
                })
            }
            Token::Ne => {
                self.bump();
                let right = self.parse_additive()?;
                Ok(Expr::Binary {
                    left: Box::new(left),
                    op: BinaryOp::Ne,
                    right: Box::new(right),
                })
            }
            Token::Lt => {
                self.bump();
                let right = self.parse_additive()?;
                Ok(Expr::Binary {
                    left: Box::new(left),
                    op: BinaryOp::Lt,
                    right: Box::new(right),
                })
            }
            Token::Gt => {
                self.bump();
                let right = self.parse_additive()?;
                Ok(Expr::Binary {
                    left: Box::new(left),
                    op: BinaryOp::Gt,
                    right: Box::new(right),
                })
            }
            Token::Le => {
                self.bump();
                let right = self.parse_additive()?;
                Ok(Expr::Binary {
                    left: Box::new(left),
                    op: BinaryOp::Le,
                    right: Box::new(right),
                })
            }
            Token::Ge => {
                self.bump();
                let right = self.parse_additive()?;
                Ok(Expr::Binary {
                    left: Box::new(left),
                    op: BinaryOp::Ge,
                    right: Box::new(right),
                })
            }
            Token::Like => {
                self.bump();
                let right = self.parse_additive()?;
                Ok(Expr::Binary {
                    left: Box::new(left),
                    op: BinaryOp::Like,
                    right: Box::new(right),
                })
            }
            Token::Is => {
                self.bump();
                let negate = if matches!(self.peek(), Token::Not) {
                    self.bump();
                    true
                } else {
                    false
                };
                match self.bump() {
                    Token::Null => Ok(if negate {
                        Expr::IsNotNull(Box::new(left))
                    } else {
                        Expr::IsNull(Box::new(left))
                    }),
                    Token::Empty => Ok(if negate {
                        Expr::IsNotEmpty(Box::new(left))
                    } else {
                        Expr::IsEmpty(Box::new(left))
                    }),
                    other => Err(ExpressionError::Parse {
                        message: format!("expected NULL or EMPTY after IS, found {other:?}"),
                        position: self.pos,
                    }),
                }
            }
            _ => Ok(left),
        }
    }

    fn parse_additive(&mut self) -> Result<Expr> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek() {
                Token::Plus => BinaryOp::Add,
                Token::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.bump();
            let right = self.parse_multiplicative()?;
            left = Expr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr> {
        let mut left = self.parse_power()?;
        loop {
            let op = match self.peek() {
                Token::Star => BinaryOp::Mul,
                Token::Slash => BinaryOp::Div,
                Token::DoubleSlash => BinaryOp::IntDiv,
                Token::Percent => BinaryOp::Mod,
                _ => break,
            };
            self.bump();
            let right = self.parse_power()?;
            left = Expr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_power(&mut self) -> Result<Expr> {
        let base = self.parse_unary()?;
        if matches!(self.peek(), Token::DoubleStar) {
            self.bump();
            let exp = self.parse_power()?;
            return Ok(Expr::Binary {
                left: Box::new(base),
                op: BinaryOp::Pow,
                right: Box::new(exp),
            });
        }
        Ok(base)
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        if matches!(self.peek(), Token::Minus) {
            self.bump();
            let operand = self.parse_unary()?;
            return Ok(Expr::Binary {
                left: Box::new(Expr::Literal(Value::Int(0))),
                op: BinaryOp::Sub,
                right: Box::new(operand),
            });
        }
        self.parse_atom()
    }

    fn parse_atom(&mut self) -> Result<Expr> {
        match self.bump() {
            Token::Number(n) => {
                if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
                    Ok(Expr::Literal(Value::Int(n as i64)))
                } else {
                    Ok(Expr::Literal(Value::Float(n)))
                }
            }
            Token::Boolean(b) => Ok(Expr::Literal(Value::Boolean(b))),
            Token::StringLit(s) => Ok(Expr::Literal(Value::String(s))),
            Token::Identifier(name) => {
                if matches!(self.peek(), Token::LParen) {
                    self.bump();
                    let mut args = Vec::new();
                    if !matches!(self.peek(), Token::RParen) {
                        loop {
                            args.push(self.parse_or()?);
                            if matches!(self.peek(), Token::Comma) {
                                self.bump();
                            } else {
                                break;
                            }
                        }
                    }
                    self.expect(&Token::RParen)?;
                    Ok(Expr::FunctionCall { name, args })
                } else {
                    Ok(Expr::Identifier(name))
                }
            }
            Token::LParen => {
                let inner = self.parse_or()?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            Token::Case => self.parse_case(),
            other => Err(ExpressionError::Parse {
                message: format!("unexpected token {other:?}"),
                position: self.pos,
            }),
        }
    }

    fn parse_case(&mut self) -> Result<Expr> {
        let mut branches = Vec::new();
        while matches!(self.peek(), Token::When) {
            self.bump();
            let condition = self.parse_or()?;
            self.expect(&Token::Then)?;
            let value = self.parse_or()?;
            branches.push(WhenBranch { condition, value });
        }
        if branches.is_empty() {
            return Err(ExpressionError::Parse {
                message: "CASE requires at least one WHEN branch".into(),
                position: self.pos,
            });
        }
        let else_expr = if matches!(self.peek(), Token::Else) {
            self.bump();
            Some(Box::new(self.parse_or()?))
        } else {
            None
        };
        self.expect(&Token::End)?;
        Ok(Expr::Case {
            branches,
            else_expr,
        })
    }
}
