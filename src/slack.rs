// slack.rs - Slack Web API client
// Thin wrappers over the handful of Web API methods the bot needs. Every
// Slack response carries an `ok` flag; `ok: false` becomes
// `SlackError::Api` with Slack's error string.
//
// Channel and user name lookups are memoized per client. The caches are
// never invalidated, so a channel or user renamed after the first lookup
// keeps resolving to the old id until the client is dropped.
//
// Used by: main.rs

use crate::config::SlackConfig;
use crate::error::SlackError;
use crate::events::SlackEvent;
use log::{debug, error, info, warn};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Member {
    pub id: String,
    pub name: String,
}

/// Identity of a message returned by `chat.postMessage`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedMessage {
    pub channel: String,
    pub ts: String,
}

pub struct SlackClient {
    http: reqwest::Client,
    token: String,
    base_url: String,
    vote_channel: String,
    channel_ids: Mutex<HashMap<String, String>>,
    user_ids: Mutex<HashMap<String, String>>,
}

impl SlackClient {
    pub fn new(config: &SlackConfig) -> Result<Self, SlackError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent("Slack-Vote-Bot-Rust/0.1")
            .build()?;

        Ok(Self {
            http,
            token: config.token.clone(),
            base_url: config.api_base_url.clone(),
            vote_channel: config.channel.clone(),
            channel_ids: Mutex::new(HashMap::new()),
            user_ids: Mutex::new(HashMap::new()),
        })
    }

    /// POST a form-encoded Web API call and return the checked response body
    pub async fn api_call(&self, method: &str, params: &[(&str, &str)]) -> Result<Value, SlackError> {
        debug!("Slack API call {} params={:?}", method, params);
        let response = self
            .http
            .post(format!("{}/{}", self.base_url, method))
            .bearer_auth(&self.token)
            .form(params)
            .send()
            .await?
            .error_for_status()?;

        let body: Value = response.json().await?;
        check_response(method, body)
    }

    pub async fn post_message(&self, channel: &str, text: &str) -> Result<PostedMessage, SlackError> {
        let method = "chat.postMessage";
        let response = self
            .api_call(method, &[("channel", channel), ("text", text), ("as_user", "true")])
            .await
            .map_err(|e| {
                error!("❌ Could not post message to {}: {}", channel, e);
                e
            })?;

        Ok(PostedMessage {
            channel: field(method, &response, "channel")?,
            ts: field(method, &response, "ts")?,
        })
    }

    pub async fn list_channels(&self) -> Result<Vec<Channel>, SlackError> {
        let method = "conversations.list";
        let response = self
            .api_call(
                method,
                &[
                    ("exclude_archived", "true"),
                    ("types", "public_channel"),
                    ("limit", "1000"),
                ],
            )
            .await?;
        field(method, &response, "channels")
    }

    pub async fn list_users(&self) -> Result<Vec<Member>, SlackError> {
        let method = "users.list";
        let response = self.api_call(method, &[("presence", "false")]).await?;
        field(method, &response, "members")
    }

    /// User id the token authenticates as
    pub async fn who_am_i(&self) -> Result<String, SlackError> {
        let method = "auth.test";
        let response = self.api_call(method, &[]).await?;
        field(method, &response, "user_id")
    }

    pub async fn delete_message(&self, channel: &str, ts: &str) -> Result<(), SlackError> {
        self.api_call("chat.delete", &[("channel", channel), ("ts", ts)])
            .await?;
        Ok(())
    }

    /// Delete the message an event refers to, but only inside the vote
    /// channel. Returns whether a message was deleted; a refusal from Slack
    /// is logged and reported as `Ok(false)`.
    pub async fn delete_event_message(&self, event: &SlackEvent) -> Result<bool, SlackError> {
        let vote_channel_id = self.channel_by_name(&self.vote_channel).await?;
        if event.channel != vote_channel_id {
            debug!("Not deleting {} outside the vote channel", event.ts);
            return Ok(false);
        }

        match self.delete_message(&event.channel, &event.ts).await {
            Ok(()) => Ok(true),
            Err(e @ SlackError::Api { .. }) => {
                warn!("⚠️ Failed to delete message {} in {}: {}", event.ts, event.channel, e);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn channel_by_name(&self, name: &str) -> Result<String, SlackError> {
        if let Some(id) = cached(&self.channel_ids, name) {
            return Ok(id);
        }

        let channels = self.list_channels().await?;
        let id = find_id_by_name(channels.iter().map(|c| (c.id.as_str(), c.name.as_str())), name)
            .ok_or_else(|| SlackError::NotFound {
                kind: "channel",
                name: name.to_string(),
            })?;

        info!("Resolved channel #{} to {}", name, id);
        remember(&self.channel_ids, name, &id);
        Ok(id)
    }

    pub async fn user_by_name(&self, name: &str) -> Result<String, SlackError> {
        if let Some(id) = cached(&self.user_ids, name) {
            return Ok(id);
        }

        let members = self.list_users().await?;
        let id = find_id_by_name(members.iter().map(|m| (m.id.as_str(), m.name.as_str())), name)
            .ok_or_else(|| SlackError::NotFound {
                kind: "user",
                name: name.to_string(),
            })?;

        info!("Resolved user @{} to {}", name, id);
        remember(&self.user_ids, name, &id);
        Ok(id)
    }
}

/// Turn a raw Slack response body into `Ok` only when it says `"ok": true`
pub fn check_response(method: &str, body: Value) -> Result<Value, SlackError> {
    if body.get("ok").and_then(Value::as_bool) == Some(true) {
        return Ok(body);
    }

    let error = body
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or("unknown_error")
        .to_string();
    debug!("Slack API call {} not ok: response={}", method, body);
    Err(SlackError::Api {
        method: method.to_string(),
        error,
    })
}

fn field<T: DeserializeOwned>(method: &str, body: &Value, name: &'static str) -> Result<T, SlackError> {
    let value = body.get(name).ok_or_else(|| SlackError::MalformedResponse {
        method: method.to_string(),
        field: name,
    })?;
    Ok(T::deserialize(value)?)
}

/// First id whose name equals `name` exactly
pub fn find_id_by_name<'a, I>(items: I, name: &str) -> Option<String>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    items
        .into_iter()
        .find(|(_, item_name)| *item_name == name)
        .map(|(id, _)| id.to_string())
}

fn cached(cache: &Mutex<HashMap<String, String>>, name: &str) -> Option<String> {
    let cache = cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    cache.get(name).cloned()
}

fn remember(cache: &Mutex<HashMap<String, String>>, name: &str, id: &str) {
    let mut cache = cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    cache.insert(name.to_string(), id.to_string());
}
