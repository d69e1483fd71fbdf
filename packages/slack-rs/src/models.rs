use serde::{Deserialize, Serialize};

/// Outgoing message body for incoming webhooks, `response_url` posts and
/// synchronous command responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlackMessage {
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replace_original: Option<bool>,
}

impl SlackMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    pub fn replacing_original(mut self) -> Self {
        self.replace_original = Some(true);
        self
    }

    /// All buttons across every attachment, in order.
    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        self.attachments.iter().flat_map(|a| a.actions.iter())
    }
}

/// Legacy message attachment carrying interactive buttons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub fallback: String,
    pub callback_id: String,
    pub color: String,
    pub attachment_type: String,
    pub actions: Vec<Action>,
}

impl Attachment {
    pub fn with_actions(callback_id: impl Into<String>, actions: Vec<Action>) -> Self {
        Self {
            fallback: "You are unable to perform an action".to_string(),
            callback_id: callback_id.into(),
            color: "#3AA3E3".to_string(),
            attachment_type: "default".to_string(),
            actions,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub name: String,
    pub text: String,
    pub style: String,
    #[serde(rename = "type")]
    pub action_type: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirm: Option<Confirm>,
}

impl Action {
    pub fn button(name: &str, text: &str, style: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            text: text.to_string(),
            style: style.to_string(),
            action_type: "button".to_string(),
            value: value.to_string(),
            confirm: None,
        }
    }

    pub fn with_confirm(mut self, confirm: Confirm) -> Self {
        self.confirm = Some(confirm);
        self
    }
}

/// Confirmation dialog shown before a button action is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirm {
    pub title: String,
    pub text: String,
    pub ok_text: String,
    pub dismiss_text: String,
}

/// Form fields of a slash command invocation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlashCommand {
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub response_url: String,
}

/// JSON document sent in the `payload` form field when a button is pressed.
#[derive(Debug, Clone, Deserialize)]
pub struct InteractivePayload {
    #[serde(rename = "type")]
    pub payload_type: String,
    pub user: PayloadUser,
    #[serde(default)]
    pub actions: Vec<PayloadAction>,
    #[serde(default)]
    pub response_url: String,
}

impl InteractivePayload {
    pub fn is_interactive_message(&self) -> bool {
        self.payload_type == "interactive_message"
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PayloadUser {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PayloadAction {
    pub name: String,
    #[serde(default)]
    pub value: String,
}
