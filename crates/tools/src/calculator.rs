//! Calculator tool: evaluates mathematical expressions.
//!
//! Supports `+`, `-`, `*`, `/`, `%`, `**` (or `^`), parentheses, unary
//! signs, the functions `sqrt pow sin cos tan log log10 exp abs round`,
//! and the constants `pi` and `e`. Uses a recursive-descent parser; no
//! code is ever evaluated dynamically.
//!
//! `%` is floored (the result has the sign of the divisor) and `round`
//! rounds halves to even.

use async_trait::async_trait;
use reactloop_core::error::ToolError;
use reactloop_core::tool::{Tool, ToolOutput};

pub struct CalculatorTool;

#[async_trait]
impl Tool for CalculatorTool {
    fn name(&self) -> &str {
        "calculator"
    }

    fn description(&self) -> &str {
        "Evaluate a mathematical expression. Supports +, -, *, /, %, ** and parentheses, \
         the functions sqrt, pow, sin, cos, tan, log, log10, exp, abs, round, \
         and the constants pi and e."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "expression": {
                    "type": "string",
                    "description": "The mathematical expression to evaluate, e.g. '(2 + 3) * 4' or 'sqrt(16)'"
                }
            },
            "required": ["expression"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let expr = arguments["expression"]
            .as_str()
            .ok_or_else(|| ToolError::invalid_arguments("Missing 'expression' argument"))?;

        let value = evaluate(expr).map_err(ToolError::execution_failed)?;
        Ok(ToolOutput::text(format!("Result: {}", format_number(value)))
            .with_data(serde_json::json!({ "result": value })))
    }
}

/// Format a result: integers lose their trailing `.0`.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

// ── Recursive-descent expression evaluator ────────────────────────────────

/// Evaluate a mathematical expression string.
pub fn evaluate(expr: &str) -> Result<f64, String> {
    let tokens = tokenize(expr)?;
    let mut parser = Parser::new(&tokens);
    let result = parser.parse_expr()?;
    if parser.pos < parser.tokens.len() {
        return Err(format!(
            "Unexpected token at position {}: {:?}",
            parser.pos, parser.tokens[parser.pos]
        ));
    }
    if !result.is_finite() {
        return Err("Result is not a finite number".into());
    }
    Ok(result)
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Power,
    Comma,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = input.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == '*' && chars.get(i + 1) == Some(&'*') {
            tokens.push(Token::Power);
            i += 2;
            continue;
        }
        if let Some(token) = operator(c) {
            tokens.push(token);
            i += 1;
            continue;
        }

        match c {
            ' ' | '\t' | '\n' | '\r' => i += 1,
            c if c.is_ascii_digit() || c == '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let num_str: String = chars[start..i].iter().collect();
                let num: f64 = num_str
                    .parse()
                    .map_err(|_| format!("Invalid number: {}", num_str))?;
                tokens.push(Token::Number(num));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                tokens.push(Token::Ident(chars[start..i].iter().collect()));
            }
            c => return Err(format!("Unexpected character: '{}'", c)),
        }
    }

    Ok(tokens)
}

fn operator(c: char) -> Option<Token> {
    let token = match c {
        '+' => Token::Plus,
        '-' => Token::Minus,
        '*' => Token::Star,
        '^' => Token::Power,
        '/' => Token::Slash,
        '%' => Token::Percent,
        ',' => Token::Comma,
        '(' => Token::LParen,
        ')' => Token::RParen,
        _ => return None,
    };
    Some(token)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn consume(&mut self) -> Option<&Token> {
        let tok = self.tokens.get(self.pos);
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    // expr = term (('+' | '-') term)*
    fn parse_expr(&mut self) -> Result<f64, String> {
        let mut left = self.parse_term()?;
        while let Some(op) = self.peek() {
            match op {
                Token::Plus => {
                    self.consume();
                    left += self.parse_term()?;
                }
                Token::Minus => {
                    self.consume();
                    left -= self.parse_term()?;
                }
                _ => break,
            }
        }
        Ok(left)
    }

    // term = unary (('*' | '/' | '%') unary)*
    fn parse_term(&mut self) -> Result<f64, String> {
        let mut left = self.parse_unary()?;
        while let Some(op) = self.peek() {
            match op {
                Token::Star => {
                    self.consume();
                    left *= self.parse_unary()?;
                }
                Token::Slash => {
                    self.consume();
                    let right = self.parse_unary()?;
                    if right == 0.0 {
                        return Err("Division by zero".into());
                    }
                    left /= right;
                }
                Token::Percent => {
                    self.consume();
                    let right = self.parse_unary()?;
                    if right == 0.0 {
                        return Err("Modulo by zero".into());
                    }
                    left = floored_mod(left, right);
                }
                _ => break,
            }
        }
        Ok(left)
    }

    // unary = ('-' | '+') unary | power
    fn parse_unary(&mut self) -> Result<f64, String> {
        match self.peek() {
            Some(Token::Minus) => {
                self.consume();
                Ok(-self.parse_unary()?)
            }
            Some(Token::Plus) => {
                self.consume();
                self.parse_unary()
            }
            _ => self.parse_power(),
        }
    }

    // power = primary ('**' unary)?   (right-associative, binds tighter than unary minus)
    fn parse_power(&mut self) -> Result<f64, String> {
        let base = self.parse_primary()?;
        if let Some(Token::Power) = self.peek() {
            self.consume();
            let exponent = self.parse_unary()?;
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    // primary = NUMBER | IDENT | IDENT '(' args ')' | '(' expr ')'
    fn parse_primary(&mut self) -> Result<f64, String> {
        match self.consume().cloned() {
            Some(Token::Number(n)) => Ok(n),
            Some(Token::LParen) => {
                let val = self.parse_expr()?;
                self.expect_rparen()?;
                Ok(val)
            }
            Some(Token::Ident(name)) => {
                if let Some(Token::LParen) = self.peek() {
                    self.consume();
                    let args = self.parse_args()?;
                    call_function(&name, &args)
                } else {
                    constant(&name)
                }
            }
            Some(tok) => Err(format!("Unexpected token: {:?}", tok)),
            None => Err("Unexpected end of expression".into()),
        }
    }

    // args = expr (',' expr)* ')'
    fn parse_args(&mut self) -> Result<Vec<f64>, String> {
        let mut args = Vec::new();
        if let Some(Token::RParen) = self.peek() {
            self.consume();
            return Ok(args);
        }
        loop {
            args.push(self.parse_expr()?);
            match self.consume() {
                Some(Token::Comma) => continue,
                Some(Token::RParen) => return Ok(args),
                _ => return Err("Expected ',' or closing parenthesis".into()),
            }
        }
    }

    fn expect_rparen(&mut self) -> Result<(), String> {
        match self.consume() {
            Some(Token::RParen) => Ok(()),
            _ => Err("Expected closing parenthesis".into()),
        }
    }
}

fn constant(name: &str) -> Result<f64, String> {
    match name {
        "pi" => Ok(std::f64::consts::PI),
        "e" => Ok(std::f64::consts::E),
        other => Err(format!("Unknown name: '{}'", other)),
    }
}

fn call_function(name: &str, args: &[f64]) -> Result<f64, String> {
    let arity = |n: usize| -> Result<(), String> {
        if args.len() == n {
            Ok(())
        } else {
            Err(format!("{}() takes {} argument(s), got {}", name, n, args.len()))
        }
    };

    match name {
        "sqrt" => {
            arity(1)?;
            if args[0] < 0.0 {
                return Err("sqrt() of a negative number".into());
            }
            Ok(args[0].sqrt())
        }
        "pow" => {
            arity(2)?;
            Ok(args[0].powf(args[1]))
        }
        "sin" => {
            arity(1)?;
            Ok(args[0].sin())
        }
        "cos" => {
            arity(1)?;
            Ok(args[0].cos())
        }
        "tan" => {
            arity(1)?;
            Ok(args[0].tan())
        }
        "exp" => {
            arity(1)?;
            Ok(args[0].exp())
        }
        "abs" => {
            arity(1)?;
            Ok(args[0].abs())
        }
        "log10" => {
            arity(1)?;
            positive(name, args[0])?;
            Ok(args[0].log10())
        }
        "log" => match args {
            [x] => {
                positive(name, *x)?;
                Ok(x.ln())
            }
            [x, base] => {
                positive(name, *x)?;
                positive(name, *base)?;
                Ok(x.log(*base))
            }
            _ => Err(format!("log() takes 1 or 2 arguments, got {}", args.len())),
        },
        "round" => match args {
            [x] => Ok(x.round_ties_even()),
            [x, digits] => {
                let factor = 10f64.powi(*digits as i32);
                Ok((x * factor).round_ties_even() / factor)
            }
            _ => Err(format!("round() takes 1 or 2 arguments, got {}", args.len())),
        },
        other => Err(format!("Unknown function: '{}'", other)),
    }
}

/// Remainder with the sign of the divisor, so `7 % -3 == -2`.
fn floored_mod(left: f64, right: f64) -> f64 {
    let r = left % right;
    if r != 0.0 && (r < 0.0) != (right < 0.0) {
        r + right
    } else {
        r
    }
}

fn positive(name: &str, x: f64) -> Result<(), String> {
    if x <= 0.0 {
        Err(format!("{}() of a non-positive number", name))
    } else {
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_addition() {
        assert_eq!(evaluate("2 + 3").unwrap(), 5.0);
    }

    #[test]
    fn operator_precedence() {
        assert_eq!(evaluate("2 + 3 * 4").unwrap(), 14.0);
        assert_eq!(evaluate("25 * 4 + 50").unwrap(), 150.0);
    }

    #[test]
    fn parentheses() {
        assert_eq!(evaluate("((1 + 2) * (3 + 4))").unwrap(), 21.0);
    }

    #[test]
    fn division_by_zero() {
        assert!(evaluate("1 / 0").is_err());
        assert!(evaluate("1 % 0").is_err());
    }

    #[test]
    fn power_is_right_associative() {
        assert_eq!(evaluate("2 ** 3 ** 2").unwrap(), 512.0);
        assert_eq!(evaluate("10 ^ 2").unwrap(), 100.0);
    }

    #[test]
    fn unary_minus_binds_looser_than_power() {
        assert_eq!(evaluate("-2 ** 2").unwrap(), -4.0);
        assert_eq!(evaluate("-5 + 3").unwrap(), -2.0);
    }

    #[test]
    fn modulo() {
        assert_eq!(evaluate("17 % 5").unwrap(), 2.0);
    }

    #[test]
    fn modulo_takes_the_sign_of_the_divisor() {
        assert_eq!(evaluate("7 % -3").unwrap(), -2.0);
        assert_eq!(evaluate("-7 % 3").unwrap(), 2.0);
        assert_eq!(evaluate("-7 % -3").unwrap(), -1.0);
        assert_eq!(evaluate("6 % -3").unwrap(), 0.0);
        assert_eq!(evaluate("5.5 % 2").unwrap(), 1.5);
    }

    #[test]
    fn round_half_to_even() {
        assert_eq!(evaluate("round(2.5)").unwrap(), 2.0);
        assert_eq!(evaluate("round(3.5)").unwrap(), 4.0);
        assert_eq!(evaluate("round(-0.5)").unwrap(), -0.0);
        assert_eq!(evaluate("round(2.6)").unwrap(), 3.0);
        assert_eq!(evaluate("round(0.125, 2)").unwrap(), 0.12);
        assert_eq!(evaluate("round(25, -1)").unwrap(), 20.0);
    }

    #[test]
    fn functions_and_constants() {
        assert_eq!(evaluate("sqrt(16)").unwrap(), 4.0);
        assert_eq!(evaluate("pow(2, 10)").unwrap(), 1024.0);
        assert_eq!(evaluate("abs(-7)").unwrap(), 7.0);
        assert!((evaluate("log10(1000)").unwrap() - 3.0).abs() < 1e-12);
        assert_eq!(evaluate("round(3.14159, 2)").unwrap(), 3.14);
        assert!((evaluate("cos(pi)").unwrap() + 1.0).abs() < 1e-12);
        assert!((evaluate("log(e)").unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn domain_errors() {
        assert!(evaluate("sqrt(-1)").is_err());
        assert!(evaluate("log(0)").is_err());
        assert!(evaluate("sqrt(1, 2)").is_err());
    }

    #[test]
    fn unknown_names_rejected() {
        assert!(evaluate("tau * 2").is_err());
        assert!(evaluate("import(1)").is_err());
    }

    #[test]
    fn invalid_expression() {
        assert!(evaluate("2 +").is_err());
        assert!(evaluate("").is_err());
        assert!(evaluate("(1 + 2").is_err());
    }

    #[tokio::test]
    async fn tool_execute() {
        let result = CalculatorTool
            .execute(serde_json::json!({"expression": "3 * 2 + 5 * 1.5"}))
            .await
            .unwrap();
        assert_eq!(result.content, "Result: 13.5");
        assert_eq!(result.data.unwrap()["result"], 13.5);
    }

    #[tokio::test]
    async fn tool_formats_integers() {
        let result = CalculatorTool
            .execute(serde_json::json!({"expression": "10 / 2"}))
            .await
            .unwrap();
        assert_eq!(result.content, "Result: 5");
    }

    #[tokio::test]
    async fn tool_reports_evaluation_failure() {
        let err = CalculatorTool
            .execute(serde_json::json!({"expression": "1 / 0"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::ExecutionFailed { .. }));
    }

    #[tokio::test]
    async fn tool_missing_expression() {
        let result = CalculatorTool.execute(serde_json::json!({})).await;
        assert!(matches!(result, Err(ToolError::InvalidArguments { .. })));
    }
}
