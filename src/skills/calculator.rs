//! Calculator agent: arithmetic over `+ - * / ( )` and decimal numbers
//!
//! Expressions are parsed by a small recursive descent parser and evaluated
//! directly; nothing in the input is ever executed.
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := factor (('*' | '/') factor)*
//! factor := ('+' | '-') factor | number | '(' expr ')'
//! ```

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

use crate::{
    protocol::{AgentCard, AgentSkill, HandlerError, Task},
    server::{read_query, SkillHandler},
};

use super::demo_card;

/// Why an expression could not be evaluated
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error("empty expression")]
    Empty,
    #[error("division by zero")]
    DivisionByZero,
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
    #[error("unexpected '{0}'")]
    UnexpectedToken(String),
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("unbalanced parentheses")]
    UnbalancedParens,
    #[error("expression nested too deeply")]
    TooDeep,
}

/// Deepest nesting of parentheses and unary signs accepted
pub const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Op(char),
    Open,
    Close,
}

impl Token {
    fn unexpected(self) -> CalcError {
        let text = match self {
            Token::Number(n) => format_number(n),
            Token::Op(op) => op.to_string(),
            Token::Open => "(".to_string(),
            Token::Close => ")".to_string(),
        };
        CalcError::UnexpectedToken(text)
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, CalcError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        match c {
            c if c.is_whitespace() => {}
            '+' | '-' | '*' | '/' => tokens.push(Token::Op(c)),
            '(' => tokens.push(Token::Open),
            ')' => tokens.push(Token::Close),
            c if c.is_ascii_digit() || c == '.' => {
                let mut end = start + c.len_utf8();
                while let Some(&(i, next)) = chars.peek() {
                    if !(next.is_ascii_digit() || next == '.') {
                        break;
                    }
                    end = i + next.len_utf8();
                    chars.next();
                }
                let literal = &input[start..end];
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| CalcError::InvalidNumber(literal.to_string()))?;
                tokens.push(Token::Number(value));
            }
            other => return Err(CalcError::UnexpectedToken(other.to_string())),
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.peek();
        self.pos += 1;
        token
    }

    fn expr(&mut self) -> Result<f64, CalcError> {
        let mut value = self.term()?;
        while let Some(Token::Op(op @ ('+' | '-'))) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            value = if op == '+' { value + rhs } else { value - rhs };
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<f64, CalcError> {
        let mut value = self.factor()?;
        while let Some(Token::Op(op @ ('*' | '/'))) = self.peek() {
            self.pos += 1;
            let rhs = self.factor()?;
            value = if op == '*' {
                value * rhs
            } else {
                if rhs == 0.0 {
                    return Err(CalcError::DivisionByZero);
                }
                value / rhs
            };
        }
        Ok(value)
    }

    fn factor(&mut self) -> Result<f64, CalcError> {
        if self.depth >= MAX_DEPTH {
            return Err(CalcError::TooDeep);
        }
        self.depth += 1;
        let value = self.primary();
        self.depth -= 1;
        value
    }

    fn primary(&mut self) -> Result<f64, CalcError> {
        match self.next() {
            Some(Token::Op('+')) => self.factor(),
            Some(Token::Op('-')) => Ok(-self.factor()?),
            Some(Token::Number(n)) => Ok(n),
            Some(Token::Open) => {
                let value = self.expr()?;
                match self.next() {
                    Some(Token::Close) => Ok(value),
                    _ => Err(CalcError::UnbalancedParens),
                }
            }
            Some(Token::Close) => Err(CalcError::UnbalancedParens),
            Some(token) => Err(token.unexpected()),
            None => Err(CalcError::UnexpectedEnd),
        }
    }
}

/// Evaluate an arithmetic expression with standard precedence
pub fn evaluate(expression: &str) -> Result<f64, CalcError> {
    let tokens = tokenize(expression)?;
    if tokens.is_empty() {
        return Err(CalcError::Empty);
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;

    match parser.peek() {
        None => Ok(value),
        Some(Token::Close) => Err(CalcError::UnbalancedParens),
        Some(token) => Err(token.unexpected()),
    }
}

/// Integral values print without a fractional part
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Answer text for a calculator query
///
/// Characters other than digits, `.`, whitespace and `+ - * / ( )` are
/// dropped before parsing.
pub fn calculate(query: &str) -> String {
    let cleaned: String = query
        .chars()
        .filter(|c| c.is_ascii_digit() || c.is_whitespace() || "+-*/().".contains(*c))
        .collect();

    match evaluate(&cleaned) {
        Ok(value) => format!("Result: {}", format_number(value)),
        Err(e) => format!("Error calculating: {}", e),
    }
}

pub fn card(url: &Url) -> AgentCard {
    demo_card(
        "Calculator Agent",
        "A simple calculator agent that can perform basic arithmetic operations",
        url,
    )
    .with_skill(AgentSkill::new("add", "Addition").with_description("Adds two numbers"))
    .with_skill(AgentSkill::new("subtract", "Subtraction").with_description("Subtracts two numbers"))
    .with_skill(AgentSkill::new("multiply", "Multiplication").with_description("Multiplies two numbers"))
    .with_skill(AgentSkill::new("divide", "Division").with_description("Divides two numbers"))
}

pub struct Calculator;

#[async_trait]
impl SkillHandler for Calculator {
    async fn handle(&self, task: Task) -> Result<Task, HandlerError> {
        let query = read_query(&task)?;
        Ok(task.complete(calculate(&query)))
    }
}

#[cfg(test)]
mod tests {
    use crate::protocol::{Message, TaskState};

    use super::*;

    #[test]
    fn test_precedence_and_associativity() {
        assert_eq!(evaluate("2 + 2 * 3"), Ok(8.0));
        assert_eq!(evaluate("(2 + 2) * 3"), Ok(12.0));
        assert_eq!(evaluate("10 - 4 - 3"), Ok(3.0));
        assert_eq!(evaluate("24 / 4 / 2"), Ok(3.0));
        assert_eq!(evaluate("-3 * -(2 + 1)"), Ok(9.0));
        assert_eq!(evaluate("1.5 * 4"), Ok(6.0));
    }

    #[test]
    fn test_errors() {
        assert_eq!(evaluate("1 / 0"), Err(CalcError::DivisionByZero));
        assert_eq!(evaluate("(1 + 2"), Err(CalcError::UnbalancedParens));
        assert_eq!(evaluate("1 + 2)"), Err(CalcError::UnbalancedParens));
        assert_eq!(evaluate("1 +"), Err(CalcError::UnexpectedEnd));
        assert_eq!(evaluate("* 2"), Err(CalcError::UnexpectedToken("*".into())));
        assert_eq!(evaluate("2 (3)"), Err(CalcError::UnexpectedToken("(".into())));
        assert_eq!(evaluate("2 3"), Err(CalcError::UnexpectedToken("3".into())));
        assert_eq!(evaluate(""), Err(CalcError::Empty));
        assert_eq!(evaluate("1..2"), Err(CalcError::InvalidNumber("1..2".into())));
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |depth: usize| format!("{}1{}", "(".repeat(depth), ")".repeat(depth));

        assert_eq!(evaluate(&nested(MAX_DEPTH - 1)), Ok(1.0));
        assert_eq!(evaluate(&nested(MAX_DEPTH)), Err(CalcError::TooDeep));
        assert_eq!(evaluate(&nested(100_000)), Err(CalcError::TooDeep));
        assert_eq!(
            evaluate(&format!("{}1", "-".repeat(100_000))),
            Err(CalcError::TooDeep)
        );
        assert_eq!(evaluate(&format!("{}1", "--".repeat(100))), Ok(1.0));
    }

    #[test]
    fn test_calculate_formats_result() {
        assert_eq!(calculate("2 + 2 * 3"), "Result: 8");
        assert_eq!(calculate("7 / 2"), "Result: 3.5");
        assert_eq!(calculate("1.5 * 4"), "Result: 6");
        assert_eq!(calculate("1 / 0"), "Error calculating: division by zero");
    }

    #[test]
    fn test_calculate_ignores_foreign_characters() {
        // Letters and other symbols never reach the parser
        assert_eq!(
            calculate("__import__('os') + 3"),
            "Error calculating: unbalanced parentheses"
        );
        assert_eq!(calculate("what is 6 * 7?"), "Result: 42");
    }

    #[tokio::test]
    async fn test_handler_completes_task() {
        let task = Task::new("t").with_message(Message::user("2 + 2 * 3"));
        let task = Calculator.handle(task).await.unwrap();

        assert_eq!(task.state, TaskState::Completed);
        assert_eq!(
            task.latest_agent_message().and_then(|m| m.first_text()),
            Some("Result: 8")
        );
    }
}
