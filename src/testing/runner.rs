//! Interaction runner and sequence pipeline
//!
//! A sequence talks to the bot through a single session. Each utterance is
//! sent only after the previous response passed its post-condition; the
//! first failure ends the sequence.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::{debug, error};

use crate::lex::{ConversationClient, PostTextRequest};

use super::config::{Interaction, Sequence, TestConfig};
use super::evaluator::{evaluate, Verdict};
use super::reporter::{FailureRecord, Reporter, SequenceOutcome};

/// Longest user id the service accepts
const MAX_USER_ID_LEN: usize = 100;

/// Everything a sequence needs that is shared across the whole run
pub struct RunContext {
    pub client: Arc<dyn ConversationClient>,
    pub reporter: Arc<dyn Reporter>,
    pub bot_name: String,
    pub bot_alias: String,
    /// Attributes sent with the first utterance of every sequence
    pub session_attributes: HashMap<String, String>,
    /// Pause between consecutive requests of one sequence
    pub pacing: Option<Duration>,
}

impl RunContext {
    pub fn new(
        config: &TestConfig,
        client: Arc<dyn ConversationClient>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            client,
            reporter,
            bot_name: config.bot_name.clone(),
            bot_alias: config.bot_alias.clone(),
            session_attributes: config.session_attributes.clone(),
            pacing: config.pacing(),
        }
    }
}

/// Conversational state carried from one interaction to the next
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: String,
    pub attributes: HashMap<String, String>,
}

impl Session {
    /// `index` is the sequence's position in the document
    pub fn new(
        bot_name: &str,
        sequence: &str,
        index: usize,
        attributes: HashMap<String, String>,
    ) -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();

        Self {
            user_id: session_user_id(bot_name, sequence, index, millis),
            attributes,
        }
    }
}

/// Build `<bot>-<sequence>-<index>-<millis>`, restricted to characters the
/// service accepts in a user id
///
/// Only the `<bot>-<sequence>` part is shortened to fit the length limit,
/// so the index and timestamp always survive.
pub fn session_user_id(bot_name: &str, sequence: &str, index: usize, millis: u128) -> String {
    let suffix = format!("-{}-{}", index, millis);
    let prefix_len = MAX_USER_ID_LEN.saturating_sub(suffix.len());

    let mut user_id: String = format!("{}-{}", bot_name, sequence)
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | ':' | '-') {
                c
            } else {
                '_'
            }
        })
        .take(prefix_len)
        .collect();
    user_id.push_str(&suffix);
    user_id
}

/// Send one utterance and check the response
///
/// On success the session picks up the attributes the bot returned.
pub async fn run_interaction(
    ctx: &RunContext,
    session: &mut Session,
    sequence: &str,
    interaction: &Interaction,
) -> Result<(), Box<FailureRecord>> {
    let request = PostTextRequest {
        bot_name: ctx.bot_name.clone(),
        bot_alias: ctx.bot_alias.clone(),
        user_id: session.user_id.clone(),
        session_attributes: session.attributes.clone(),
        input_text: interaction.utterance.clone(),
    };

    let response = match ctx.client.post_text(&request).await {
        Ok(response) => response,
        Err(e) => {
            error!(
                sequence,
                utterance = %interaction.utterance,
                request_id = ?e.request_id,
                "{}", e
            );
            return Err(Box::new(FailureRecord {
                message: e.to_string(),
                request_id: e.request_id.clone(),
                utterance: Some(interaction.utterance.clone()),
                params: Some(request),
                response: None,
            }));
        }
    };

    match evaluate(sequence, interaction, &response) {
        Verdict::Pass => {
            session.attributes = response.session_attributes;
            Ok(())
        }
        Verdict::Fail(detail) => Err(Box::new(FailureRecord {
            message: detail,
            request_id: response.request_id.clone(),
            utterance: Some(interaction.utterance.clone()),
            params: Some(request),
            response: Some(response),
        })),
    }
}

/// Run every interaction of a sequence in order and report the outcome
///
/// `index` is the sequence's position in the document and keeps session
/// ids apart for sequences sharing a name.
pub async fn run_sequence(ctx: &RunContext, index: usize, sequence: &Sequence) -> SequenceOutcome {
    let name = sequence.display_name();
    let mut session = Session::new(&ctx.bot_name, name, index, ctx.session_attributes.clone());
    let total = sequence.interactions.len();

    for (i, interaction) in sequence.interactions.iter().enumerate() {
        if i > 0 {
            if let Some(pause) = ctx.pacing {
                tokio::time::sleep(pause).await;
            }
        }

        debug!(
            "[{}] Interaction {} / {} - {}",
            name,
            i + 1,
            total,
            interaction.utterance
        );

        if let Err(failure) = run_interaction(ctx, &mut session, name, interaction).await {
            ctx.reporter.report_failure(name, &failure);
            return SequenceOutcome::Failed {
                name: name.to_string(),
                failure,
            };
        }
    }

    ctx.reporter.report_success(name, "PASSED!");
    SequenceOutcome::Passed {
        name: name.to_string(),
    }
}
