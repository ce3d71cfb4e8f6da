// Slack vote bot - argument parsing and Slack Web API helpers
//
// args      classify raw command arguments (channel, user, email, command, integer, string)
// commands  registry of the application's commands and which are voteable
// events    Slack event payloads, event ids and reaction scores
// slack     Web API client with memoized name lookups
// config    botconfig.txt loading
// error     error types

pub mod args;
pub mod commands;
pub mod config;
pub mod error;
pub mod events;
pub mod slack;

pub use args::{classify, parse_arguments, ArgumentKind, ArgumentValue, ClassifiedArgument};
pub use commands::{CommandInfo, CommandRegistry};
pub use config::{load_slack_config, SlackConfig};
pub use error::{ConfigError, SlackError};
pub use events::SlackEvent;
pub use slack::SlackClient;
