//! Shared helpers for the integration tests.

use kokosend_core::{BotCredentials, Credentials, SecretString, Target, WebhookCredentials};
use wiremock::MockServer;

/// Bot token used against mock bot API servers.
pub const BOT_TOKEN: &str = "4242:integration";

/// Path the mock webhook listens on.
pub const WEBHOOK_PATH: &str = "/api/webhooks/42/integration";

/// Webhook URL on a mock server.
pub fn webhook_url(server: &MockServer) -> String {
    format!("{}{}", server.uri(), WEBHOOK_PATH)
}

/// Bot API path for a method.
pub fn bot_path(method: &str) -> String {
    format!("/bot{}/{}", BOT_TOKEN, method)
}

/// Enabled webhook target pointing at a mock server.
pub fn webhook_target(server: &MockServer) -> Target {
    Target::new(
        true,
        Credentials::Webhook(WebhookCredentials {
            url: SecretString::new(webhook_url(server)),
        }),
    )
}

/// Enabled bot target.
pub fn bot_target() -> Target {
    Target::new(
        true,
        Credentials::Bot(BotCredentials {
            token: SecretString::new(BOT_TOKEN),
            chat_id: "-1001".to_string(),
        }),
    )
}
