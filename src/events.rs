// events.rs - Slack event payloads
// Only the fields the vote workflow reads are modelled; everything else in
// the payload is ignored during deserialization.

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Reaction {
    pub name: String,
    #[serde(default)]
    pub count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EventMessage {
    #[serde(default)]
    pub text: Option<String>,
    /// Slack omits the field entirely when nobody has reacted.
    #[serde(default)]
    pub reactions: Vec<Reaction>,
}

/// A message event (or a `conversations.history` item) carrying the
/// channel and timestamp that identify it
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SlackEvent {
    pub channel: String,
    pub ts: String,
    #[serde(default)]
    pub message: Option<EventMessage>,
}

impl SlackEvent {
    pub fn new(channel: &str, ts: &str) -> Self {
        Self {
            channel: channel.to_string(),
            ts: ts.to_string(),
            message: None,
        }
    }

    /// Channel id followed by ts; unique across the workspace.
    pub fn event_id(&self) -> String {
        info!("event={:?}", self);
        format!("{}{}", self.channel, self.ts)
    }

    /// Thumbs up minus thumbs down.
    pub fn reaction_sum(&self) -> i64 {
        info!("event={:?}", self);
        let reactions = match &self.message {
            Some(message) => &message.reactions,
            None => return 0,
        };

        let mut up_votes: i64 = 0;
        let mut down_votes: i64 = 0;
        for reaction in reactions {
            match reaction.name.as_str() {
                "+1" => up_votes = up_votes.saturating_add(reaction.count),
                "-1" => down_votes = down_votes.saturating_add(reaction.count),
                _ => {}
            }
        }
        up_votes.saturating_sub(down_votes)
    }
}
