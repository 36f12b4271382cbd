use crate::error::NumError;
use crate::expr::{Expr, MathFn};
use crate::tokenizer::{tokenize, Token};

/// Parse an expression string into an [`Expr`] tree.
///
/// Precedence follows the usual convention: `+ -` bind loosest, then
/// `* /`, then unary minus, then `^` (right-associative), so `-x^2`
/// parses as `-(x^2)` and `2^-3` is legal. The identifiers `pi` and `e`
/// are folded to constants at parse time.
///
/// # Examples
///
/// ```
/// use numlab::parser::parse;
///
/// let f = parse("sin(x) + x^2").unwrap();
/// assert!((f.eval_at("x", 0.0).unwrap()).abs() < 1e-15);
/// ```
pub fn parse(src: &str) -> Result<Expr, NumError> {
    let tokens = tokenize(src)?;
    if tokens.is_empty() {
        return Err(NumError::ParseFailure("empty expression".to_string()));
    }
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.expression()?;
    if let Some(tok) = parser.peek() {
        return Err(NumError::ParseFailure(format!(
            "unexpected trailing token {:?}",
            tok
        )));
    }
    Ok(expr)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn eat(&mut self, tok: &Token) -> bool {
        if self.peek() == Some(tok) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expression(&mut self) -> Result<Expr, NumError> {
        let mut lhs = self.term()?;
        loop {
            if self.eat(&Token::Plus) {
                lhs = Expr::Add(Box::new(lhs), Box::new(self.term()?));
            } else if self.eat(&Token::Minus) {
                lhs = Expr::Sub(Box::new(lhs), Box::new(self.term()?));
            } else {
                return Ok(lhs);
            }
        }
    }

    fn term(&mut self) -> Result<Expr, NumError> {
        let mut lhs = self.unary()?;
        loop {
            if self.eat(&Token::Star) {
                lhs = Expr::Mul(Box::new(lhs), Box::new(self.unary()?));
            } else if self.eat(&Token::Slash) {
                lhs = Expr::Div(Box::new(lhs), Box::new(self.unary()?));
            } else {
                return Ok(lhs);
            }
        }
    }

    fn unary(&mut self) -> Result<Expr, NumError> {
        if self.eat(&Token::Minus) {
            Ok(Expr::Neg(Box::new(self.unary()?)))
        } else if self.eat(&Token::Plus) {
            self.unary()
        } else {
            self.power()
        }
    }

    fn power(&mut self) -> Result<Expr, NumError> {
        let base = self.atom()?;
        if self.eat(&Token::Caret) {
            // right-associative; the exponent may carry its own sign
            Ok(Expr::Pow(Box::new(base), Box::new(self.unary()?)))
        } else {
            Ok(base)
        }
    }

    fn atom(&mut self) -> Result<Expr, NumError> {
        match self.bump() {
            Some(Token::Number(value)) => Ok(Expr::Num(value)),
            Some(Token::Ident(name)) => {
                if self.eat(&Token::LParen) {
                    let func = MathFn::from_name(&name)
                        .ok_or(NumError::UnknownFunction(name))?;
                    let arg = self.expression()?;
                    if !self.eat(&Token::RParen) {
                        return Err(NumError::ParseFailure(
                            "missing closing parenthesis".to_string(),
                        ));
                    }
                    Ok(Expr::Func(func, Box::new(arg)))
                } else {
                    match name.as_str() {
                        "pi" => Ok(Expr::Num(std::f64::consts::PI)),
                        "e" => Ok(Expr::Num(std::f64::consts::E)),
                        _ => Ok(Expr::Var(name)),
                    }
                }
            }
            Some(Token::LParen) => {
                let inner = self.expression()?;
                if !self.eat(&Token::RParen) {
                    return Err(NumError::ParseFailure(
                        "missing closing parenthesis".to_string(),
                    ));
                }
                Ok(inner)
            }
            Some(tok) => Err(NumError::ParseFailure(format!(
                "expected a value, found {:?}",
                tok
            ))),
            None => Err(NumError::ParseFailure(
                "unexpected end of expression".to_string(),
            )),
        }
    }
}
