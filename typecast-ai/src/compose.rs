//! Prompt composition.
//!
//! [`compose`] turns a contract, a purpose statement, labeled inputs, and
//! optional per-call instructions into a [`RenderedRequest`]. It is a pure
//! transformation: same inputs, byte-identical output.
//!
//! Section order in the system instructions is fixed and deliberate:
//!
//! 1. prior exchanges, chronological, oldest first
//! 2. role framing
//! 3. the declared purpose, verbatim
//! 4. the schema constraint, when the contract is constrained
//! 5. caller instructions, last so they have the highest positional
//!    salience and win over earlier framing when they conflict

use serde_json::Value as JsonValue;
use typecast_ai_core::contract::TargetContract;
use typecast_ai_core::errors::ComposeError;
use typecast_ai_core::request::RenderedRequest;
use typecast_ai_core::thread::Exchange;
use typecast_ai_output::schema;

/// The fixed role-framing sentence every composed prompt starts from
/// (after any replayed prior exchanges).
pub const ROLE_FRAMING: &str =
    "You will be given labeled inputs and must produce output that satisfies \
     the required schema exactly.";

/// Compose a rendered request.
///
/// Purpose text is never truncated: if it (or the final composed
/// instructions) exceeds `max_prompt_chars`, composition fails with
/// [`ComposeError::PromptTooLarge`] before any transport activity.
///
/// # Errors
///
/// [`ComposeError::PromptTooLarge`] as above.
pub fn compose(
    contract: &TargetContract,
    purpose: &str,
    inputs: &[(String, JsonValue)],
    instructions: Option<&str>,
    prior_exchanges: &[Exchange],
    max_prompt_chars: usize,
) -> Result<RenderedRequest, ComposeError> {
    let purpose_chars = purpose.chars().count();
    if purpose_chars > max_prompt_chars {
        return Err(ComposeError::too_large(purpose_chars, max_prompt_chars));
    }

    let mut sections: Vec<String> = Vec::new();

    for exchange in prior_exchanges {
        sections.push(exchange.render());
    }

    sections.push(ROLE_FRAMING.to_string());

    if !purpose.is_empty() {
        sections.push(purpose.to_string());
    }

    if contract.is_constrained() {
        sections.push(format!("The output must be {}.", schema::describe(contract)));
    }

    if let Some(instructions) = instructions {
        sections.push(instructions.to_string());
    }

    let system_instructions = sections.join("\n\n");
    let total_chars = system_instructions.chars().count();
    if total_chars > max_prompt_chars {
        return Err(ComposeError::too_large(total_chars, max_prompt_chars));
    }

    tracing::debug!(
        prompt_chars = total_chars,
        inputs = inputs.len(),
        prior = prior_exchanges.len(),
        constrained = contract.is_constrained(),
        "composed request"
    );

    let mut request = RenderedRequest::new(system_instructions);
    for (label, value) in inputs {
        request = request.with_input(label.clone(), value.clone());
    }
    if let Some(forced) = schema::forced_output_schema(contract) {
        request = request.with_schema(forced);
    }
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use typecast_ai_core::request::RawReply;

    fn no_inputs() -> Vec<(String, JsonValue)> {
        Vec::new()
    }

    #[test]
    fn test_compose_section_order() {
        let contract = TargetContract::list(TargetContract::integer());
        let request = compose(
            &contract,
            "Sum up the primes.",
            &no_inputs(),
            Some("Answer tersely."),
            &[],
            8_000,
        )
        .unwrap();

        let text = &request.system_instructions;
        let framing = text.find(ROLE_FRAMING).unwrap();
        let purpose = text.find("Sum up the primes.").unwrap();
        let schema_note = text.find("array of integers").unwrap();
        let instructions = text.find("Answer tersely.").unwrap();
        assert!(framing < purpose);
        assert!(purpose < schema_note);
        assert!(schema_note < instructions);
    }

    #[test]
    fn test_compose_is_deterministic() {
        let contract = TargetContract::string();
        let inputs = vec![("text".to_string(), serde_json::json!("hello"))];
        let first = compose(&contract, "Translate.", &inputs, Some("to French"), &[], 8_000)
            .unwrap();
        let second = compose(&contract, "Translate.", &inputs, Some("to French"), &[], 8_000)
            .unwrap();
        assert_eq!(first.system_instructions, second.system_instructions);
        assert_eq!(first, second);
    }

    #[test]
    fn test_compose_text_contract_has_no_schema() {
        let request = compose(&TargetContract::text(), "Chat.", &no_inputs(), None, &[], 8_000)
            .unwrap();
        assert!(request.forced_output_schema.is_none());
        assert!(!request.system_instructions.contains("The output must be"));
    }

    #[test]
    fn test_compose_constrained_contract_has_schema() {
        let request = compose(
            &TargetContract::integer(),
            "Count.",
            &no_inputs(),
            None,
            &[],
            8_000,
        )
        .unwrap();
        let schema = request.forced_output_schema.unwrap();
        assert_eq!(schema["required"], serde_json::json!(["data"]));
    }

    #[test]
    fn test_compose_purpose_too_large() {
        let purpose = "x".repeat(50_000);
        let err = compose(
            &TargetContract::text(),
            &purpose,
            &no_inputs(),
            None,
            &[],
            8_000,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ComposeError::PromptTooLarge {
                actual: 50_000,
                limit: 8_000
            }
        ));
    }

    #[rstest]
    #[case(100)]
    #[case(8_000)]
    fn test_compose_respects_configured_limit(#[case] limit: usize) {
        let purpose = "y".repeat(limit + 1);
        let err = compose(&TargetContract::text(), &purpose, &no_inputs(), None, &[], limit)
            .unwrap_err();
        assert!(matches!(err, ComposeError::PromptTooLarge { .. }));
    }

    #[test]
    fn test_compose_total_size_bounded() {
        // Purpose fits but purpose + instructions does not.
        let purpose = "p".repeat(500);
        let instructions = "i".repeat(600);
        let err = compose(
            &TargetContract::text(),
            &purpose,
            &no_inputs(),
            Some(&instructions),
            &[],
            1_000,
        )
        .unwrap_err();
        assert!(matches!(err, ComposeError::PromptTooLarge { .. }));
    }

    #[test]
    fn test_compose_prior_exchanges_come_first_oldest_first() {
        let older = Exchange::new(
            RenderedRequest::new("a").with_input("q", serde_json::json!("first question")),
            RawReply::text("first answer"),
        );
        let newer = Exchange::new(
            RenderedRequest::new("b").with_input("q", serde_json::json!("second question")),
            RawReply::text("second answer"),
        );

        let request = compose(
            &TargetContract::text(),
            "Continue the conversation.",
            &no_inputs(),
            None,
            &[older, newer],
            8_000,
        )
        .unwrap();

        let text = &request.system_instructions;
        let first = text.find("first answer").unwrap();
        let second = text.find("second answer").unwrap();
        let framing = text.find(ROLE_FRAMING).unwrap();
        assert!(first < second);
        assert!(second < framing);
    }

    #[test]
    fn test_compose_preserves_input_order() {
        let inputs = vec![
            ("b".to_string(), serde_json::json!(2)),
            ("a".to_string(), serde_json::json!(1)),
        ];
        let request =
            compose(&TargetContract::integer(), "Add.", &inputs, None, &[], 8_000).unwrap();
        let labels: Vec<_> = request
            .input_payload
            .iter()
            .map(|(l, _)| l.as_str())
            .collect();
        assert_eq!(labels, vec!["b", "a"]);
    }
}
