// https://api.slack.com/authentication/verifying-requests-from-slack

pub mod models;

use hmac::{Hmac, Mac};
use reqwest::Client;
use sha2::Sha256;
use thiserror::Error;

pub use crate::models::{
    Action, Attachment, Confirm, InteractivePayload, PayloadAction, PayloadUser, SlackMessage,
    SlashCommand,
};

type HmacSha256 = Hmac<Sha256>;

/// Maximum distance between the request timestamp and local time.
pub const MAX_REQUEST_AGE_SECS: i64 = 60 * 5;

pub const SIGNATURE_HEADER: &str = "x-slack-signature";
pub const TIMESTAMP_HEADER: &str = "x-slack-request-timestamp";

const SIGNATURE_VERSION: &str = "v0";

#[derive(Debug, Error)]
pub enum SlackError {
    #[error("request to Slack failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Slack returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("empty Slack signing secret")]
    MissingSigningSecret,

    #[error("invalid request timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("request timestamp is more than 5min difference from local time")]
    StaleTimestamp,

    #[error("signature verification failed")]
    InvalidSignature,
}

#[derive(Debug, Clone)]
pub struct SlackOptions {
    pub signing_secret: String,
}

#[derive(Debug, Clone)]
pub struct SlackService {
    options: SlackOptions,
    client: Client,
}

impl SlackService {
    pub fn new(options: SlackOptions) -> Self {
        Self {
            options,
            client: Client::new(),
        }
    }

    /// POST a message to an incoming-webhook URL or an interaction `response_url`.
    pub async fn post_message(&self, url: &str, message: &SlackMessage) -> Result<(), SlackError> {
        let response = self.client.post(url).json(message).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Slack rejected message");
            return Err(SlackError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }

    /// Compute the `v0=<hex>` signature Slack would send for `body`.
    pub fn sign(&self, timestamp: &str, body: &[u8]) -> Result<String, SlackError> {
        let mac = self.mac_for(timestamp, body)?;
        Ok(format!(
            "{}={}",
            SIGNATURE_VERSION,
            hex::encode(mac.finalize().into_bytes())
        ))
    }

    /// Verify the signing headers of an inbound request against its raw body.
    ///
    /// `now_unix` is the caller's notion of the current time in seconds, so
    /// the replay window can be checked against an injected clock.
    pub fn verify_signature(
        &self,
        timestamp: &str,
        signature: &str,
        body: &[u8],
        now_unix: i64,
    ) -> Result<(), SlackError> {
        let sent_at: i64 = timestamp
            .trim()
            .parse()
            .map_err(|_| SlackError::InvalidTimestamp(timestamp.to_string()))?;

        // Older requests may be replays.
        if (now_unix - sent_at).abs() > MAX_REQUEST_AGE_SECS {
            return Err(SlackError::StaleTimestamp);
        }

        let expected = signature
            .strip_prefix("v0=")
            .and_then(|hex_sig| hex::decode(hex_sig).ok())
            .ok_or(SlackError::InvalidSignature)?;

        self.mac_for(timestamp, body)?
            .verify_slice(&expected)
            .map_err(|_| SlackError::InvalidSignature)
    }

    fn mac_for(&self, timestamp: &str, body: &[u8]) -> Result<HmacSha256, SlackError> {
        if self.options.signing_secret.is_empty() {
            return Err(SlackError::MissingSigningSecret);
        }

        let mut mac = HmacSha256::new_from_slice(self.options.signing_secret.as_bytes())
            .map_err(|_| SlackError::MissingSigningSecret)?;
        mac.update(SIGNATURE_VERSION.as_bytes());
        mac.update(b":");
        mac.update(timestamp.as_bytes());
        mac.update(b":");
        mac.update(body);
        Ok(mac)
    }
}
