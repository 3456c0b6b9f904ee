//! Post-condition evaluation
//!
//! Pure checks of a bot response against the expectation declared for an
//! interaction. Exactly one kind of expectation is evaluated, chosen in
//! this order: message patterns, dialog state, slot values. An interaction
//! that declares none of them always fails.

use tracing::{info, warn};

use crate::lex::BotResponse;

use super::config::{Interaction, PostCondition, SlotExpectation};

/// Outcome of checking one response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    /// Carries the reason the response was rejected
    Fail(String),
}

impl Verdict {
    pub fn passed(&self) -> bool {
        matches!(self, Verdict::Pass)
    }

    pub fn detail(&self) -> Option<&str> {
        match self {
            Verdict::Pass => None,
            Verdict::Fail(detail) => Some(detail),
        }
    }
}

/// Check `response` against the post-condition of `interaction`
///
/// `sequence` is only used to label log lines.
pub fn evaluate(sequence: &str, interaction: &Interaction, response: &BotResponse) -> Verdict {
    let post = &interaction.post_conditions;
    let ctx = Ctx {
        sequence,
        utterance: &interaction.utterance,
    };

    if !post.message_patterns().is_empty() {
        check_message(&ctx, post, response)
    } else if post.expected_dialog_state().is_some() {
        check_dialog_state(&ctx, post, response)
    } else if !post.slot_expectations().is_empty() {
        check_slots(&ctx, post, response)
    } else {
        ctx.fail("no acceptable post-condition declared".to_string())
    }
}

struct Ctx<'a> {
    sequence: &'a str,
    utterance: &'a str,
}

impl Ctx<'_> {
    fn fail(&self, detail: String) -> Verdict {
        warn!("[{}/{}] {}", self.sequence, self.utterance, detail);
        Verdict::Fail(detail)
    }
}

fn check_message(ctx: &Ctx<'_>, post: &PostCondition, response: &BotResponse) -> Verdict {
    let actual = response.message.as_deref().unwrap_or("");

    match post.message_patterns().iter().find(|p| p.is_match(actual)) {
        Some(pattern) => {
            info!(
                "[{}/{}] Acceptable response found - {} (matched [{}])",
                ctx.sequence, ctx.utterance, actual, pattern
            );
            Verdict::Pass
        }
        None => ctx.fail(format!(
            "No acceptable response found for message [{}]",
            actual
        )),
    }
}

fn check_dialog_state(ctx: &Ctx<'_>, post: &PostCondition, response: &BotResponse) -> Verdict {
    let expected_state = post.expected_dialog_state().unwrap_or_default();
    let actual_state = response.dialog_state.as_deref();

    if actual_state != Some(expected_state) {
        return match response.intent_name.as_deref() {
            Some(_) => ctx.fail(format!(
                "Dialog state did not match (actual) [{}] != (expected) [{}]",
                actual_state.unwrap_or(""),
                expected_state
            )),
            None => missed_utterance(ctx, post),
        };
    }

    match post.expected_intent() {
        Some(expected_intent) if response.intent_name.as_deref() != Some(expected_intent) => {
            intent_mismatch(ctx, expected_intent, response)
        }
        _ => {
            info!(
                "[{}/{}] Acceptable dialogState found - {} / {}",
                ctx.sequence,
                ctx.utterance,
                expected_state,
                response.intent_name.as_deref().unwrap_or("")
            );
            Verdict::Pass
        }
    }
}

fn check_slots(ctx: &Ctx<'_>, post: &PostCondition, response: &BotResponse) -> Verdict {
    let Some(expected_intent) = post.expected_intent() else {
        return ctx.fail(
            "Slot values were declared without an intent name, so did not match".to_string(),
        );
    };

    if response.intent_name.as_deref() != Some(expected_intent) {
        return intent_mismatch(ctx, expected_intent, response);
    }

    let mismatches: Vec<String> = post
        .slot_expectations()
        .iter()
        .filter_map(|slot| check_slot(ctx, slot, response))
        .collect();

    if mismatches.is_empty() {
        Verdict::Pass
    } else {
        Verdict::Fail(mismatches.join("; "))
    }
}

/// Returns the mismatch detail for a slot, or `None` if it is acceptable
///
/// An expected value of `None` accepts only an unfilled slot; a pattern
/// accepts only a filled slot whose value matches it.
fn check_slot(ctx: &Ctx<'_>, slot: &SlotExpectation, response: &BotResponse) -> Option<String> {
    let actual = response.slot(&slot.slot_name);

    let acceptable = match (&slot.slot_value, actual) {
        (None, None) => true,
        (Some(pattern), Some(value)) => pattern.is_match(value),
        _ => false,
    };

    if acceptable {
        info!(
            "[{}/{}] Acceptable slot value found - {} / {}",
            ctx.sequence,
            ctx.utterance,
            slot.slot_name,
            actual.unwrap_or("null")
        );
        return None;
    }

    let detail = format!(
        "Slot value {} did not match (actual) [{}] !~= (expected) [{}] for [{}]",
        slot.slot_name,
        actual.unwrap_or("null"),
        slot.slot_value
            .as_ref()
            .map(|p| p.as_str())
            .unwrap_or("null"),
        ctx.utterance
    );
    warn!("[{}/{}] {}", ctx.sequence, ctx.utterance, detail);
    Some(detail)
}

fn intent_mismatch(ctx: &Ctx<'_>, expected_intent: &str, response: &BotResponse) -> Verdict {
    match response.intent_name.as_deref() {
        Some(actual) => ctx.fail(format!(
            "Intent name did not match (actual) [{}] != (expected) [{}] for [{}]",
            actual, expected_intent, ctx.utterance
        )),
        None => ctx.fail(format!(
            "Missed utterance (expected) [{}] for [{}]",
            expected_intent, ctx.utterance
        )),
    }
}

fn missed_utterance(ctx: &Ctx<'_>, post: &PostCondition) -> Verdict {
    ctx.fail(format!(
        "Missed utterance (expected) [{}] for [{}]",
        post.expected_intent().unwrap_or(""),
        ctx.utterance
    ))
}
