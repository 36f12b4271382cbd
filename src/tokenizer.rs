use crate::error::NumError;

/// Lexical tokens of the expression language.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

/// Split an expression string into tokens. `**` is accepted as a synonym
/// for `^` since many textbook inputs are written that way.
pub fn tokenize(src: &str) -> Result<Vec<Token>, NumError> {
    let chars: Vec<char> = src.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            _ if c.is_whitespace() => i += 1,
            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '*' => {
                if chars.get(i + 1) == Some(&'*') {
                    tokens.push(Token::Caret);
                    i += 2;
                } else {
                    tokens.push(Token::Star);
                    i += 1;
                }
            }
            '/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            '^' => {
                tokens.push(Token::Caret);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                // exponent part only when it is actually followed by digits,
                // so a trailing identifier like `e` stays a constant
                if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                    let mut j = i + 1;
                    if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                        j += 1;
                    }
                    if j < chars.len() && chars[j].is_ascii_digit() {
                        i = j;
                        while i < chars.len() && chars[i].is_ascii_digit() {
                            i += 1;
                        }
                    }
                }
                let text: String = chars[start..i].iter().collect();
                let value = text.parse::<f64>().map_err(|_| {
                    NumError::ParseFailure(format!("malformed number '{}'", text))
                })?;
                tokens.push(Token::Number(value));
            }
            _ if c.is_ascii_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len()
                    && (chars[i].is_ascii_alphanumeric() || chars[i] == '_')
                {
                    i += 1;
                }
                tokens.push(Token::Ident(chars[start..i].iter().collect()));
            }
            _ => {
                return Err(NumError::ParseFailure(format!(
                    "unexpected character '{}'",
                    c
                )))
            }
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic() {
        let tokens = tokenize("2*x + 1").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Number(2.0),
                Token::Star,
                Token::Ident("x".to_string()),
                Token::Plus,
                Token::Number(1.0),
            ]
        );
    }

    #[test]
    fn test_double_star_is_caret() {
        assert_eq!(tokenize("x**2").unwrap(), tokenize("x^2").unwrap());
    }

    #[test]
    fn test_scientific_notation() {
        let tokens = tokenize("1.5e-3").unwrap();
        assert_eq!(tokens, vec![Token::Number(1.5e-3)]);
    }

    #[test]
    fn test_trailing_e_is_identifier() {
        let tokens = tokenize("2e").unwrap();
        assert_eq!(
            tokens,
            vec![Token::Number(2.0), Token::Ident("e".to_string())]
        );
    }

    #[test]
    fn test_function_call() {
        let tokens = tokenize("sin(x)").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Ident("sin".to_string()),
                Token::LParen,
                Token::Ident("x".to_string()),
                Token::RParen,
            ]
        );
    }

    #[test]
    fn test_rejects_unknown_character() {
        assert!(matches!(
            tokenize("x $ 2"),
            Err(NumError::ParseFailure(_))
        ));
    }
}
