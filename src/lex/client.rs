//! Amazon Lex runtime client

use async_trait::async_trait;
use aws_sdk_lexruntime::error::DisplayErrorContext;
use aws_sdk_lexruntime::operation::RequestId;
use aws_sdk_lexruntime::Client;

use crate::common::ClientError;

use super::{BotResponse, ConversationClient, PostTextRequest};

/// [`ConversationClient`] backed by the Lex runtime `PostText` API
pub struct LexClient {
    client: Client,
}

impl LexClient {
    /// Build a client for the given region
    ///
    /// Credentials come from the AWS SDK default chain: environment
    /// variables, `~/.aws/credentials`, `~/.aws/config`, then instance or
    /// container roles.
    pub async fn new(region: &str) -> Self {
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region.to_string()))
            .load()
            .await;

        Self {
            client: Client::new(&config),
        }
    }
}

#[async_trait]
impl ConversationClient for LexClient {
    async fn post_text(&self, request: &PostTextRequest) -> Result<BotResponse, ClientError> {
        let output = self
            .client
            .post_text()
            .bot_name(&request.bot_name)
            .bot_alias(&request.bot_alias)
            .user_id(&request.user_id)
            .set_session_attributes(Some(request.session_attributes.clone()))
            .input_text(&request.input_text)
            .send()
            .await
            .map_err(|e| {
                let request_id = e.request_id().map(str::to_string);
                ClientError::new(DisplayErrorContext(&e).to_string()).with_request_id(request_id)
            })?;

        tracing::debug!(
            user_id = %request.user_id,
            request_id = ?output.request_id(),
            "PostText succeeded"
        );

        Ok(BotResponse {
            message: output.message().map(str::to_string),
            dialog_state: output.dialog_state().map(|s| s.as_str().to_string()),
            intent_name: output.intent_name().map(str::to_string),
            slots: output
                .slots()
                .map(|slots| {
                    slots
                        .iter()
                        .map(|(name, value)| (name.clone(), Some(value.clone())))
                        .collect()
                })
                .unwrap_or_default(),
            session_attributes: output.session_attributes().cloned().unwrap_or_default(),
            request_id: output.request_id().map(str::to_string),
        })
    }
}
