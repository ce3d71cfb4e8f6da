// args.rs - Argument classification for chat commands
// Slack rewrites mentions, channel links and email addresses into escaped
// forms before they reach the bot:
//
//   <#C052EM50K|waterloo>                            channel reference
//   <@U088EGWEL>                                     user reference
//   <mailto:tsohlson@gmail.com|tsohlson@gmail.com>   email
//
// This module works out which of those (or a voteable command, or an
// integer) each raw argument is and pulls out its canonical value.
//
// Used by: main.rs (stdin classifier)

use crate::commands::CommandRegistry;
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

// ============================================================================
// PATTERNS
// ============================================================================

// <#C052EM50K|waterloo>
static CHANNEL_WITH_NAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<#([^|]+)\|").expect("Invalid channel reference regex pattern")
});

// <#C052EM50K> - the final character before '>' is not part of the id
static CHANNEL_BARE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<#([^|>]+)[^|>]>").expect("Invalid bare channel reference regex pattern")
});

static USER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<@([^>]+)>").expect("Invalid user reference regex pattern")
});

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<mailto:([^|]+)\|.+>").expect("Invalid email regex pattern")
});

// ============================================================================
// TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgumentKind {
    Channel,
    User,
    Email,
    Command,
    Integer,
    /// Fallback for anything no matcher accepts.
    String,
}

impl fmt::Display for ArgumentKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ArgumentKind::Channel => "channel",
            ArgumentKind::User => "user",
            ArgumentKind::Email => "email",
            ArgumentKind::Command => "command",
            ArgumentKind::Integer => "integer",
            ArgumentKind::String => "string",
        };
        f.pad(name)
    }
}

/// Extracted value of an argument. Only `ArgumentKind::Integer` carries
/// `Integer` or `BigInteger`; every other kind carries text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArgumentValue {
    Text(String),
    Integer(i128),
    /// Integer outside the i128 range, as canonical decimal digits with an
    /// optional leading `-`.
    BigInteger(String),
}

impl ArgumentValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgumentValue::Text(text) => Some(text),
            ArgumentValue::Integer(_) | ArgumentValue::BigInteger(_) => None,
        }
    }

    /// `None` for text and for integers too large for i128.
    pub fn as_integer(&self) -> Option<i128> {
        match self {
            ArgumentValue::Integer(n) => Some(*n),
            ArgumentValue::Text(_) | ArgumentValue::BigInteger(_) => None,
        }
    }
}

impl fmt::Display for ArgumentValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ArgumentValue::Text(text) => f.write_str(text),
            ArgumentValue::Integer(n) => write!(f, "{}", n),
            ArgumentValue::BigInteger(digits) => f.write_str(digits),
        }
    }
}

impl From<&str> for ArgumentValue {
    fn from(text: &str) -> Self {
        ArgumentValue::Text(text.to_string())
    }
}

impl From<i128> for ArgumentValue {
    fn from(n: i128) -> Self {
        ArgumentValue::Integer(n)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedArgument {
    pub kind: ArgumentKind,
    pub value: ArgumentValue,
}

impl ClassifiedArgument {
    fn text(kind: ArgumentKind, text: &str) -> Self {
        Self {
            kind,
            value: ArgumentValue::Text(text.to_string()),
        }
    }
}

// ============================================================================
// MATCHERS
// ============================================================================

type Matcher = fn(&str, &CommandRegistry) -> Option<ClassifiedArgument>;

/// Trial order. Every matcher runs and a later match replaces an earlier
/// one, so integer beats command beats email and so on.
const MATCHERS: [Matcher; 5] = [
    parse_channel,
    parse_user,
    parse_email,
    parse_command,
    parse_integer,
];

/// `<#C052EM50K|waterloo>` -> `C052EM50K`
///
/// Without a `|` the id is everything between `<#` and the single
/// character before `>`, so `<#C052EM50K>` gives `C052EM50`.
pub fn parse_channel(input: &str, _commands: &CommandRegistry) -> Option<ClassifiedArgument> {
    let captures = CHANNEL_WITH_NAME_REGEX
        .captures(input)
        .or_else(|| CHANNEL_BARE_REGEX.captures(input))?;
    Some(ClassifiedArgument::text(ArgumentKind::Channel, &captures[1]))
}

/// `<@U088EGWEL>` -> `U088EGWEL`
pub fn parse_user(input: &str, _commands: &CommandRegistry) -> Option<ClassifiedArgument> {
    let captures = USER_REGEX.captures(input)?;
    Some(ClassifiedArgument::text(ArgumentKind::User, &captures[1]))
}

/// `<mailto:tsohlson@gmail.com|tsohlson@gmail.com>` -> `tsohlson@gmail.com`
pub fn parse_email(input: &str, _commands: &CommandRegistry) -> Option<ClassifiedArgument> {
    let captures = EMAIL_REGEX.captures(input)?;
    Some(ClassifiedArgument::text(ArgumentKind::Email, &captures[1]))
}

/// `$rename`, only if the registry marks it voteable
pub fn parse_command(input: &str, commands: &CommandRegistry) -> Option<ClassifiedArgument> {
    if commands.is_voteable(input) {
        Some(ClassifiedArgument::text(ArgumentKind::Command, input))
    } else {
        None
    }
}

/// Whole-token base-10 parse with no upper bound; `5abc` and ` 5` are
/// rejected.
pub fn parse_integer(input: &str, _commands: &CommandRegistry) -> Option<ClassifiedArgument> {
    let value = match input.parse::<i128>() {
        Ok(n) => ArgumentValue::Integer(n),
        Err(_) => ArgumentValue::BigInteger(canonical_digits(input)?),
    };
    Some(ClassifiedArgument {
        kind: ArgumentKind::Integer,
        value,
    })
}

// Optional sign then ASCII digits only; leading zeros and '+' dropped.
fn canonical_digits(input: &str) -> Option<String> {
    let (negative, digits) = match input.as_bytes().first()? {
        b'-' => (true, &input[1..]),
        b'+' => (false, &input[1..]),
        _ => (false, input),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Some("0".to_string());
    }
    Some(if negative { format!("-{}", digits) } else { digits.to_string() })
}

// ============================================================================
// CLASSIFIER
// ============================================================================

pub fn classify(token: &str, commands: &CommandRegistry) -> ClassifiedArgument {
    let mut result = ClassifiedArgument::text(ArgumentKind::String, token);
    for parse in MATCHERS.iter() {
        if let Some(matched) = parse(token, commands) {
            result = matched;
        }
    }
    debug!("Classified '{}' as {} ({})", token, result.kind, result.value);
    result
}

/// Classify every token, returning kinds and values as parallel lists
/// in input order.
pub fn parse_arguments<S: AsRef<str>>(
    args: &[S],
    commands: &CommandRegistry,
) -> (Vec<ArgumentKind>, Vec<ArgumentValue>) {
    let tokens: Vec<&str> = args.iter().map(|arg| arg.as_ref()).collect();
    info!("args={:?}", tokens);

    tokens
        .into_iter()
        .map(|token| {
            let classified = classify(token, commands);
            (classified.kind, classified.value)
        })
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::CommandInfo;

    fn registry() -> CommandRegistry {
        let mut commands = CommandRegistry::new();
        commands.insert("$rename", CommandInfo::voteable("k"));
        commands.insert("$help", CommandInfo::default());
        commands
    }

    #[test]
    fn test_plain_string() {
        let (kinds, values) = parse_arguments(&["hello"], &registry());
        assert_eq!(kinds, vec![ArgumentKind::String]);
        assert_eq!(values, vec![ArgumentValue::from("hello")]);
    }

    #[test]
    fn test_channel_with_name() {
        let (kinds, values) = parse_arguments(&["<#C052EM50K|waterloo>"], &registry());
        assert_eq!(kinds, vec![ArgumentKind::Channel]);
        assert_eq!(values, vec![ArgumentValue::from("C052EM50K")]);
    }

    #[test]
    fn test_channel_without_name_drops_last_character() {
        let result = classify("<#C052EM50K>", &registry());
        assert_eq!(result.kind, ArgumentKind::Channel);
        assert_eq!(result.value, ArgumentValue::from("C052EM50"));
    }

    #[test]
    fn test_channel_needs_an_id() {
        assert_eq!(classify("<#C>", &registry()).kind, ArgumentKind::String);
        assert_eq!(classify("<#|waterloo>", &registry()).kind, ArgumentKind::String);
    }

    #[test]
    fn test_user() {
        let (kinds, values) = parse_arguments(&["<@U088EGWEL>"], &registry());
        assert_eq!(kinds, vec![ArgumentKind::User]);
        assert_eq!(values, vec![ArgumentValue::from("U088EGWEL")]);
    }

    #[test]
    fn test_email() {
        let (kinds, values) = parse_arguments(
            &["<mailto:tsohlson@gmail.com|tsohlson@gmail.com>"],
            &registry(),
        );
        assert_eq!(kinds, vec![ArgumentKind::Email]);
        assert_eq!(values, vec![ArgumentValue::from("tsohlson@gmail.com")]);
    }

    #[test]
    fn test_email_needs_label_after_pipe() {
        assert_eq!(classify("<mailto:a@b.com|>", &registry()).kind, ArgumentKind::String);
        assert_eq!(classify("<mailto:a@b.com>", &registry()).kind, ArgumentKind::String);
    }

    #[test]
    fn test_integer() {
        let (kinds, values) = parse_arguments(&["5", "-12", "+3"], &registry());
        assert_eq!(
            kinds,
            vec![ArgumentKind::Integer, ArgumentKind::Integer, ArgumentKind::Integer]
        );
        assert_eq!(
            values,
            vec![ArgumentValue::from(5), ArgumentValue::from(-12), ArgumentValue::from(3)]
        );
    }

    #[test]
    fn test_partial_integer_is_string() {
        for token in ["5abc", " 5", "5 ", "1_000", "0x10", "-", "+", "--5", "12345678901234567890123456789012345678901x"] {
            let result = classify(token, &registry());
            assert_eq!(result.kind, ArgumentKind::String, "token {:?}", token);
            assert_eq!(result.value, ArgumentValue::from(token));
        }
    }

    #[test]
    fn test_integer_has_no_upper_bound() {
        let commands = registry();

        let result = classify("99999999999999999999", &commands);
        assert_eq!(result.kind, ArgumentKind::Integer);
        assert_eq!(result.value, ArgumentValue::from(99_999_999_999_999_999_999));
        assert_eq!(result.value.as_integer(), Some(99_999_999_999_999_999_999));

        let huge = "-000123456789012345678901234567890123456789012345";
        let result = classify(huge, &commands);
        assert_eq!(result.kind, ArgumentKind::Integer);
        assert_eq!(
            result.value,
            ArgumentValue::BigInteger("-123456789012345678901234567890123456789012345".to_string())
        );
        assert_eq!(result.value.as_integer(), None);

        let result = classify("+0000000000000000000000000000000000000000000042", &commands);
        assert_eq!(result.value, ArgumentValue::from(42));
    }

    #[test]
    fn test_voteable_command() {
        let (kinds, values) = parse_arguments(&["$rename"], &registry());
        assert_eq!(kinds, vec![ArgumentKind::Command]);
        assert_eq!(values, vec![ArgumentValue::from("$rename")]);
    }

    #[test]
    fn test_command_without_key_is_string() {
        let mut commands = CommandRegistry::new();
        commands.insert("$rename", CommandInfo::default().with_help("Rename"));

        let (kinds, values) = parse_arguments(&["$rename"], &commands);
        assert_eq!(kinds, vec![ArgumentKind::String]);
        assert_eq!(values, vec![ArgumentValue::from("$rename")]);
        assert_eq!(classify("$help", &registry()).kind, ArgumentKind::String);
    }

    #[test]
    fn test_command_with_null_key_is_voteable() {
        let commands =
            CommandRegistry::from_json(r#"{"$rename": {"key": null}, "$kick": {"key": 5}}"#).unwrap();

        let (kinds, values) = parse_arguments(&["$rename", "$kick"], &commands);
        assert_eq!(kinds, vec![ArgumentKind::Command, ArgumentKind::Command]);
        assert_eq!(values, vec![ArgumentValue::from("$rename"), ArgumentValue::from("$kick")]);
    }

    #[test]
    fn test_integer_overrides_command() {
        // Both matchers accept "5"; integer runs last so it wins.
        let mut commands = CommandRegistry::new();
        commands.insert("5", CommandInfo::voteable("k"));

        let result = classify("5", &commands);
        assert_eq!(result.kind, ArgumentKind::Integer);
        assert_eq!(result.value, ArgumentValue::Integer(5));

        // And the command matcher alone does accept it.
        assert_eq!(
            parse_command("5", &commands).map(|r| r.kind),
            Some(ArgumentKind::Command)
        );
    }

    #[test]
    fn test_user_overrides_channel() {
        // The channel pattern matches too; user is tried later.
        let result = classify("<#C1|x><@U1>", &registry());
        assert_eq!(result.kind, ArgumentKind::User);
        assert_eq!(result.value, ArgumentValue::from("U1"));
    }

    #[test]
    fn test_empty_string() {
        let (kinds, values) = parse_arguments(&[""], &registry());
        assert_eq!(kinds, vec![ArgumentKind::String]);
        assert_eq!(values, vec![ArgumentValue::from("")]);
    }

    #[test]
    fn test_lengths_and_order_preserved() {
        let tokens = vec![
            "$rename".to_string(),
            "<#C052EM50K|waterloo>".to_string(),
            "pickle".to_string(),
            "<@U088EGWEL>".to_string(),
            "42".to_string(),
        ];
        let (kinds, values) = parse_arguments(&tokens, &registry());
        assert_eq!(kinds.len(), tokens.len());
        assert_eq!(values.len(), tokens.len());
        assert_eq!(
            kinds,
            vec![
                ArgumentKind::Command,
                ArgumentKind::Channel,
                ArgumentKind::String,
                ArgumentKind::User,
                ArgumentKind::Integer,
            ]
        );
        assert_eq!(values[2].as_str(), Some("pickle"));
        assert_eq!(values[4].as_integer(), Some(42));

        let empty: [&str; 0] = [];
        let (kinds, values) = parse_arguments(&empty, &registry());
        assert!(kinds.is_empty() && values.is_empty());
    }

    #[test]
    fn test_classification_is_repeatable() {
        let commands = registry();
        let tokens = ["<#C052EM50K|waterloo>", "$rename", "5abc", "7"];
        let first = parse_arguments(&tokens, &commands);
        let second = parse_arguments(&tokens, &commands);
        assert_eq!(first, second);
    }
}
