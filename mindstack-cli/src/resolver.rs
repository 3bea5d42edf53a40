//! Intent resolution: one transcript in, at most one engine operation out.
//!
//! The classifier is an external LLM. We hand it the six operation names
//! and require a single JSON object back; everything after that (fence
//! stripping, parsing, clamping) happens here so the engine only ever sees
//! validated input.

use anyhow::{Context, Result};
use mindstack_core::ResolvedIntent;

use crate::llm::{self, LlmConfig};

pub fn classifier_prompt() -> String {
    "You classify voice commands for a task app that keeps a priority stack \
(the user's working memory) and a backlog.\n\
\n\
Operations:\n\
- pushActive(description, priority): add a task to the stack. priority is \
an integer from 0 to 10, larger is more urgent, defaults to 0.\n\
- popActive(): remove the topmost stack task; said when it is finished.\n\
- clearActive(): remove every task from the stack.\n\
- pushBacklog(description, priority): like pushActive but for the backlog.\n\
- popBacklog(): like popActive but for the backlog.\n\
- clearBacklog(): like clearActive but for the backlog.\n\
\n\
Reply with a single JSON object and nothing else:\n\
{\n\
  \"operation\": \"pushActive\" | \"popActive\" | \"clearActive\" | \
\"pushBacklog\" | \"popBacklog\" | \"clearBacklog\" | null,\n\
  \"parameters\": { \"description\": string, \"priority\": number },\n\
  \"acknowledgement\": string\n\
}\n\
\n\
Rules:\n\
- At most one operation per transcript; use null when none is recognized.\n\
- \"parameters\" only appears for the push operations.\n\
- Bound any mentioned priority into 0 to 10.\n\
- \"acknowledgement\" is always present: one short, dry, encouraging \
sentence about what you did (or why you did nothing).\n\
\n\
Example transcript: \"add finish the slides to my stack, high priority\"\n\
Example reply:\n\
{\"operation\": \"pushActive\", \"parameters\": {\"description\": \"finish \
the slides\", \"priority\": 10}, \"acknowledgement\": \"Slides are on top. \
Go.\"}"
        .to_string()
}

/// Classify one transcript. Transport and malformed-reply failures are
/// errors (the caller shows a service-failure notice); a well-formed
/// "nothing recognized" reply is a successful `ResolvedIntent` with no
/// operation.
pub fn resolve_intent(cfg: &LlmConfig, transcript: &str) -> Result<ResolvedIntent> {
    let reply = llm::complete(cfg, &classifier_prompt(), transcript)
        .context("intent classification request")?;
    parse_intent_reply(&reply)
}

/// Parse the classifier's reply, tolerating Markdown code fences.
pub fn parse_intent_reply(raw: &str) -> Result<ResolvedIntent> {
    let json = strip_code_fences(raw);
    let intent: ResolvedIntent =
        serde_json::from_str(json).context("parse classifier reply as intent JSON")?;
    Ok(intent.sanitized())
}

fn strip_code_fences(raw: &str) -> &str {
    let s = raw.trim();
    let Some(inner) = s.strip_prefix("```") else {
        return s;
    };
    // Drop the info string ("json") up to the first newline, if any.
    let inner = match inner.find('\n') {
        Some(idx) => &inner[idx + 1..],
        None => inner,
    };
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindstack_core::Operation;

    #[test]
    fn parses_plain_reply() {
        let raw = r#"{"operation": "popActive", "acknowledgement": "One down."}"#;
        let intent = parse_intent_reply(raw).unwrap();
        assert_eq!(intent.operation, Some(Operation::PopActive));
        assert_eq!(intent.acknowledgement, "One down.");
    }

    #[test]
    fn parses_fenced_reply() {
        let raw = "```json\n{\"operation\": \"pushBacklog\", \"parameters\": \
{\"description\": \"dentist\", \"priority\": 12}, \"acknowledgement\": \"Queued.\"}\n```";
        let intent = parse_intent_reply(raw).unwrap();
        assert_eq!(intent.operation, Some(Operation::PushBacklog));
        // sanitized() clamps the over-range priority
        assert_eq!(intent.parameters.unwrap().priority, 10);
    }

    #[test]
    fn parses_null_operation() {
        let raw = r#"{"operation": null, "acknowledgement": "Couldn't make that out."}"#;
        let intent = parse_intent_reply(raw).unwrap();
        assert_eq!(intent.operation, None);
    }

    #[test]
    fn rejects_non_json_reply() {
        assert!(parse_intent_reply("sure, pushing that now!").is_err());
    }

    #[test]
    fn demotes_push_without_description() {
        let raw = r#"{"operation": "pushActive", "parameters": {"description": " "}, "acknowledgement": "hm"}"#;
        let intent = parse_intent_reply(raw).unwrap();
        assert_eq!(intent.operation, None);
    }
}
