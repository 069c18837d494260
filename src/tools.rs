//! Toy tool dispatcher and the reasoning -> tool -> answer (ART) flow.
//!
//! Two tools exist: a calculator backed by a restricted arithmetic
//! evaluator, and a canned "web search". Unknown names get a fixed
//! reply rather than an error.

use log::{debug, info};
use crate::client::CompletionBackend;
use crate::error::Error;
use crate::request::CompletionOptions;

pub const TOOL_NOT_RECOGNIZED: &str = "Tool not recognized";

const MAX_EXPRESSION_LEN: usize = 1024;
const MAX_NESTING: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool
{   Calculator
  , WebSearch
}

impl Tool
{   pub fn from_name(name: &str) -> Option<Self>
    {   match name
        {   "calculator" => Some(Tool::Calculator)
          , "web_search" => Some(Tool::WebSearch)
          , _ => None
        }
    }

    pub fn invoke(self, input: &str) -> Result<String, Error>
    {   match self
        {   Tool::Calculator => {
              evaluate(input).map(format_number)
            }
          , Tool::WebSearch => Ok(format!("Results for '{}'", input))
        }
    }
}

/// Dispatch `input` to the named tool
pub fn use_tool(name: &str, input: &str) -> Result<String, Error>
{   match Tool::from_name(name)
    {   Some(tool) => {
          debug!("Invoking tool {:?}", tool);
          tool.invoke(input)
        }
      , None => {
          debug!("Unknown tool requested: {}", name);
          Ok(TOOL_NOT_RECOGNIZED.to_string())
        }
    }
}

/// Print integral values without a fractional part
pub fn format_number(value: f64) -> String
{   if value.fract() == 0.0 && value.abs() < 1e15
    {   format!("{}", value as i64)
    } else
    {   format!("{}", value)
    }
}

// ===== Calculator =====

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token
{   Num(f64)
  , Plus
  , Minus
  , Star
  , Slash
  , Percent
  , Pow
  , LParen
  , RParen
}

fn tokenize(input: &str) -> Result<Vec<Token>, Error>
{   let chars: Vec<char> = input.chars().collect();
    let mut tokens = vec![];
    let mut i = 0;
    while i < chars.len()
    {   let c = chars[i];
        match c
        {   ' ' | '\t' | '\n' | '\r' => { i += 1; }
          , '0'..='9' | '.' => {
              let start = i;
              while i < chars.len()
                && (chars[i].is_ascii_digit() || chars[i] == '.')
              {   i += 1;
              }
              let literal: String = chars[start..i].iter().collect();
              let value = literal.parse::<f64>().map_err(|_| {
                Error::Tool(format!("invalid number: {}", literal))
              })?;
              tokens.push(Token::Num(value));
            }
          , '+' => { tokens.push(Token::Plus); i += 1; }
          , '-' => { tokens.push(Token::Minus); i += 1; }
          , '*' => {
              if chars.get(i + 1) == Some(&'*')
              {   tokens.push(Token::Pow);
                  i += 2;
              } else
              {   tokens.push(Token::Star);
                  i += 1;
              }
            }
          , '/' => { tokens.push(Token::Slash); i += 1; }
          , '%' => { tokens.push(Token::Percent); i += 1; }
          , '(' => { tokens.push(Token::LParen); i += 1; }
          , ')' => { tokens.push(Token::RParen); i += 1; }
          , other => {
              return Err(Error::Tool(format!(
                "unsupported character '{}' at {}",
                other, i
              )));
            }
        }
    }
    Ok(tokens)
}

/// Recursive-descent parser over the token stream:
///
/// ```text
/// expr   := term (('+' | '-') term)*
/// term   := unary (('*' | '/' | '%') unary)*
/// unary  := ('+' | '-') unary | power
/// power  := atom ('**' unary)?
/// atom   := number | '(' expr ')'
/// ```
struct Parser
{   tokens: Vec<Token>
  , pos: usize
  , depth: usize
}

impl Parser
{   fn peek(&self) -> Option<Token>
    {   self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<Token>
    {   let token = self.peek();
        self.pos += 1;
        token
    }

    fn enter(&mut self) -> Result<(), Error>
    {   self.depth += 1;
        if self.depth > MAX_NESTING
        {   return Err(Error::Tool("expression nested too deeply".into()));
        }
        Ok(())
    }

    fn expr(&mut self) -> Result<f64, Error>
    {   let mut value = self.term()?;
        loop
        {   match self.peek()
            {   Some(Token::Plus) => { self.pos += 1; value += self.term()?; }
              , Some(Token::Minus) => { self.pos += 1; value -= self.term()?; }
              , _ => return Ok(value)
            }
        }
    }

    fn term(&mut self) -> Result<f64, Error>
    {   let mut value = self.unary()?;
        loop
        {   match self.peek()
            {   Some(Token::Star) => { self.pos += 1; value *= self.unary()?; }
              , Some(Token::Slash) => {
                  self.pos += 1;
                  let rhs = self.unary()?;
                  if rhs == 0.0
                  {   return Err(Error::Tool("division by zero".into()));
                  }
                  value /= rhs;
                }
              , Some(Token::Percent) => {
                  self.pos += 1;
                  let rhs = self.unary()?;
                  if rhs == 0.0
                  {   return Err(Error::Tool("modulo by zero".into()));
                  }
                  // floored: result takes the sign of the divisor
                  value -= rhs * (value / rhs).floor();
                }
              , _ => return Ok(value)
            }
        }
    }

    fn unary(&mut self) -> Result<f64, Error>
    {   match self.peek()
        {   Some(Token::Minus) => {
              self.pos += 1;
              self.enter()?;
              let v = -self.unary()?;
              self.depth -= 1;
              Ok(v)
            }
          , Some(Token::Plus) => {
              self.pos += 1;
              self.enter()?;
              let v = self.unary()?;
              self.depth -= 1;
              Ok(v)
            }
          , _ => self.power()
        }
    }

    fn power(&mut self) -> Result<f64, Error>
    {   let base = self.atom()?;
        if self.peek() == Some(Token::Pow)
        {   self.pos += 1;
            self.enter()?;
            let exponent = self.unary()?;
            self.depth -= 1;
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    fn atom(&mut self) -> Result<f64, Error>
    {   match self.advance()
        {   Some(Token::Num(v)) => Ok(v)
          , Some(Token::LParen) => {
              self.enter()?;
              let v = self.expr()?;
              self.depth -= 1;
              match self.advance()
              {   Some(Token::RParen) => Ok(v)
                , _ => Err(Error::Tool("missing closing parenthesis".into()))
              }
            }
          , Some(other) => Err(Error::Tool(
              format!("unexpected token {:?}", other)
            ))
          , None => Err(Error::Tool("unexpected end of expression".into()))
        }
    }
}

/// Evaluate a plain arithmetic expression. Only numbers, `+ - * / %`,
/// `**` and parentheses are accepted.
pub fn evaluate(expression: &str) -> Result<f64, Error>
{   if expression.len() > MAX_EXPRESSION_LEN
    {   return Err(Error::Tool("expression too long".into()));
    }
    let tokens = tokenize(expression)?;
    if tokens.is_empty()
    {   return Err(Error::Tool("empty expression".into()));
    }

    let mut parser = Parser
    {   tokens
      , pos: 0
      , depth: 0
    };
    let value = parser.expr()?;
    if parser.pos < parser.tokens.len()
    {   return Err(Error::Tool(format!(
          "unexpected trailing input at token {}",
          parser.pos
        )));
    }
    if !value.is_finite()
    {   return Err(Error::Tool("result is not finite".into()));
    }
    Ok(value)
}

// ===== ART flow =====

/// Output of one reasoning -> tool -> answer run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtRun
{   pub reasoning: String
  , pub tool_result: String
  , pub final_answer: String
}

/// Ask for reasoning, run the tool, then ask for a final answer that
/// incorporates the tool result
pub async fn run_art<B>(
  backend: &B
, task: &str
, tool: &str
, tool_input: &str
, options: &CompletionOptions
) -> Result<ArtRun, Error>
where B: CompletionBackend + ?Sized
{   let reasoning = backend.complete(
      &format!("Step-by-step reasoning to solve: {}", task),
      options
    ).await?;
    info!("ART reasoning step complete");

    let tool_result = use_tool(tool, tool_input)?;
    info!("ART tool '{}' returned {}", tool, tool_result);

    let final_answer = backend.complete(
      &format!(
        "Based on the tool result ({}), provide the final answer to the task: {}",
        tool_result, task
      ),
      options
    ).await?;

    Ok(ArtRun
    {   reasoning
      , tool_result
      , final_answer
    })
}

#[cfg(test)]
mod tests
{   use super::*;
    use crate::testing::ScriptedBackend;

    #[test]
    fn sums_the_first_ten_primes()
    {   assert_eq!(
          use_tool("calculator", "2 + 3 + 5 + 7 + 11 + 13 + 17 + 19 + 23 + 29")
            .unwrap(),
          "129"
        );
    }

    #[test]
    fn precedence_unary_and_power()
    {   assert_eq!(evaluate("2 + 3 * 4").unwrap(), 14.0);
        assert_eq!(evaluate("(2 + 3) * 4").unwrap(), 20.0);
        assert_eq!(evaluate("-2 ** 2").unwrap(), -4.0);
        assert_eq!(evaluate("2 ** 3 ** 2").unwrap(), 512.0);
        assert_eq!(evaluate("7 % 3").unwrap(), 1.0);
        assert_eq!(evaluate("1 / 4").unwrap(), 0.25);
        assert_eq!(format_number(evaluate("10 / 4").unwrap()), "2.5");
    }

    #[test]
    fn modulo_follows_the_sign_of_the_divisor()
    {   assert_eq!(evaluate("7 % -3").unwrap(), -2.0);
        assert_eq!(evaluate("-7 % 3").unwrap(), 2.0);
        assert_eq!(evaluate("-7 % -3").unwrap(), -1.0);
        assert_eq!(evaluate("7.5 % 2").unwrap(), 1.5);
    }

    #[test]
    fn rejects_anything_but_arithmetic()
    {   assert!(matches!(
          evaluate("__import__('os')"),
          Err(Error::Tool(_))
        ));
        assert!(evaluate("2 +").is_err());
        assert!(evaluate("(1 + 2").is_err());
        assert!(evaluate("1 2").is_err());
        assert!(evaluate("").is_err());
        assert!(evaluate("1..2").is_err());
    }

    #[test]
    fn division_by_zero_and_overflow_are_errors()
    {   assert_eq!(
          evaluate("1 / (2 - 2)"),
          Err(Error::Tool("division by zero".into()))
        );
        assert!(evaluate("10 ** 400").is_err());
    }

    #[test]
    fn deep_nesting_is_refused()
    {   let deep = format!("{}1{}", "(".repeat(100), ")".repeat(100));
        assert_eq!(
          evaluate(&deep),
          Err(Error::Tool("expression nested too deeply".into()))
        );
        let negations = format!("{}1", "-".repeat(100));
        assert!(evaluate(&negations).is_err());
    }

    #[test]
    fn web_search_and_unknown_tools()
    {   assert_eq!(
          use_tool("web_search", "rust async").unwrap(),
          "Results for 'rust async'"
        );
        assert_eq!(use_tool("shell", "rm -rf /").unwrap(), TOOL_NOT_RECOGNIZED);
    }

    #[test]
    fn art_feeds_tool_result_into_final_prompt()
    {   let backend = ScriptedBackend::new(&["List primes, add them.", "The sum is 129."]);
        let run = tokio_test::block_on(run_art(
          &backend,
          "Calculate the sum of the first 10 prime numbers.",
          "calculator",
          "2 + 3 + 5 + 7 + 11 + 13 + 17 + 19 + 23 + 29",
          &CompletionOptions::default()
        )).unwrap();

        assert_eq!(run.reasoning, "List primes, add them.");
        assert_eq!(run.tool_result, "129");
        assert_eq!(run.final_answer, "The sum is 129.");

        let prompts = backend.prompts();
        assert_eq!(
          prompts[0],
          "Step-by-step reasoning to solve: Calculate the sum of the first 10 prime numbers."
        );
        assert!(prompts[1].starts_with("Based on the tool result (129)"));
    }

    #[test]
    fn tool_failure_skips_the_final_call()
    {   let backend = ScriptedBackend::new(&["reasoning", "unused"]);
        let result = tokio_test::block_on(run_art(
          &backend, "task", "calculator", "1/0", &CompletionOptions::default()
        ));
        assert!(matches!(result, Err(Error::Tool(_))));
        assert_eq!(backend.prompts().len(), 1);
    }
}
