//! Prompt templates for trading analysis
//!
//! Rendered with MiniJinja. The system prompt pins the reply to the
//! [`crate::AnalysisResult`] JSON shape; the user prompt carries the symbol,
//! timeframe, Fibonacci levels and the caller's instruction.

use crate::error::Result;
use crate::request::AnalysisRequest;
use minijinja::{Environment, context};

/// Instruction used when the request carries no prompt
pub const DEFAULT_INSTRUCTION: &str =
    "Provide market analysis with key levels and trading scenarios.";

pub const SYSTEM_PROMPT: &str = r#"You are a professional trading analyst. Analyze the market and return ONLY valid JSON in this exact format:
{
  "bias": "bullish" or "bearish" or "neutral",
  "confidence": number between 0-100,
  "keyLevels": [{"price": number, "type": "support" or "resistance" or "pivot"}],
  "scenarios": ["scenario 1", "scenario 2"],
  "summary": "brief analysis summary"
}"#;

/// Three lines; the middle one stays empty when there are no levels
const USER_TEMPLATE: &str = "AI trading analysis for {{ symbol }} on {{ timeframe }} timeframe.
{% if fib_levels %}Fibonacci levels: {{ fib_levels }}{% endif %}
{{ instruction }}";

/// Render the user prompt for a request
pub fn user_prompt(request: &AnalysisRequest) -> Result<String> {
    let fib_levels = if request.fib_levels.is_empty() {
        String::new()
    } else {
        serde_json::to_string(&request.fib_levels)?
    };

    let instruction = match request.prompt.trim() {
        "" => DEFAULT_INSTRUCTION,
        prompt => prompt,
    };

    let env = Environment::new();
    let rendered = env.render_str(
        USER_TEMPLATE,
        context! {
            symbol => request.symbol,
            timeframe => request.timeframe,
            fib_levels => fib_levels,
            instruction => instruction,
        },
    )?;

    Ok(rendered)
}
