use clap::{Parser, Subcommand};
use std::path::PathBuf;
use taskbot_core::config::ConfigOverrides;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the bot and poll for chat updates until stopped
    ///
    /// Example: taskbot run
    Run,
    /// Add a task to a chat's list
    ///
    /// Example: taskbot add 12345 "Buy milk"
    Add {
        #[arg(allow_negative_numbers = true)]
        chat: i64,
        text: Option<String>,
    },
    /// List a chat's tasks
    ///
    /// Example: taskbot list 12345
    List {
        #[arg(allow_negative_numbers = true)]
        chat: i64,
    },
    /// Delete a task by its position
    ///
    /// Example: taskbot delete 12345 2
    Delete {
        #[arg(allow_negative_numbers = true)]
        chat: i64,
        #[arg(allow_negative_numbers = true)]
        position: i64,
    },
    /// Remove every task of a chat
    ///
    /// Example: taskbot clear 12345
    Clear {
        #[arg(allow_negative_numbers = true)]
        chat: i64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    Token,
    ApiBase,
    StorePath,
    PollIntervalSecs,
    ErrorBackoffSecs,
    PollTimeoutSecs,
    RequestTimeoutSecs,
    LogLevel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let trimmed = raw.trim();
    let (key_raw, value_raw) = trimmed
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim().to_string();
    let field =
        canonicalize_flag_name(key_raw).ok_or_else(|| "override key cannot be empty".to_string())?;

    let target = match field.as_str() {
        "token" => ConfigOverrideTarget::Token,
        "api_base" => ConfigOverrideTarget::ApiBase,
        "store_path" => ConfigOverrideTarget::StorePath,
        "poll_interval_secs" => ConfigOverrideTarget::PollIntervalSecs,
        "error_backoff_secs" => ConfigOverrideTarget::ErrorBackoffSecs,
        "poll_timeout_secs" => ConfigOverrideTarget::PollTimeoutSecs,
        "request_timeout_secs" => ConfigOverrideTarget::RequestTimeoutSecs,
        "log_level" => ConfigOverrideTarget::LogLevel,
        other => return Err(format!("unknown config field '{other}'")),
    };

    if value.is_empty() {
        return Err(format!("override for '{field}' needs a value"));
    }

    Ok(ParsedConfigOverride { target, value })
}

/// Folds every `--config-override` flag into one set of overrides; later
/// flags win.
pub fn build_overrides(raw: &[String]) -> Result<ConfigOverrides, String> {
    let mut overrides = ConfigOverrides::default();

    for entry in raw {
        let parsed = parse_config_override(entry)?;
        let seconds = || {
            parsed
                .value
                .parse::<u64>()
                .map_err(|_| format!("'{}' is not a number of seconds", parsed.value))
        };

        match parsed.target {
            ConfigOverrideTarget::Token => overrides.token = Some(parsed.value.clone()),
            ConfigOverrideTarget::ApiBase => overrides.api_base = Some(parsed.value.clone()),
            ConfigOverrideTarget::StorePath => {
                overrides.store_path = Some(PathBuf::from(&parsed.value))
            }
            ConfigOverrideTarget::PollIntervalSecs => {
                overrides.poll_interval_secs = Some(seconds()?)
            }
            ConfigOverrideTarget::ErrorBackoffSecs => {
                overrides.error_backoff_secs = Some(seconds()?)
            }
            ConfigOverrideTarget::PollTimeoutSecs => {
                overrides.poll_timeout_secs = Some(seconds()?)
            }
            ConfigOverrideTarget::RequestTimeoutSecs => {
                overrides.request_timeout_secs = Some(seconds()?)
            }
            ConfigOverrideTarget::LogLevel => overrides.log_level = Some(parsed.value.clone()),
        }
    }

    Ok(overrides)
}

fn canonicalize_flag_name(name: &str) -> Option<String> {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigOverrideTarget, build_overrides, parse_config_override};
    use std::path::PathBuf;

    #[test]
    fn parse_config_override_canonicalizes_field_names() {
        let parsed = parse_config_override(" Poll-Interval-Secs = 5 ").unwrap();

        assert_eq!(parsed.target, ConfigOverrideTarget::PollIntervalSecs);
        assert_eq!(parsed.value, "5");
    }

    #[test]
    fn parse_config_override_rejects_unknown_fields() {
        let err = parse_config_override("theme=noir").unwrap_err();
        assert!(err.contains("unknown config field"));
    }

    #[test]
    fn parse_config_override_rejects_missing_equals() {
        let err = parse_config_override("token").unwrap_err();
        assert!(err.contains("KEY=VALUE"));
    }

    #[test]
    fn parse_config_override_rejects_empty_value() {
        let err = parse_config_override("token= ").unwrap_err();
        assert!(err.contains("needs a value"));
    }

    #[test]
    fn build_overrides_collects_fields_and_last_wins() {
        let raw = vec![
            "store_path=/tmp/a.json".to_string(),
            "error_backoff_secs=10".to_string(),
            "store_path=/tmp/b.json".to_string(),
        ];

        let overrides = build_overrides(&raw).unwrap();

        assert_eq!(overrides.store_path, Some(PathBuf::from("/tmp/b.json")));
        assert_eq!(overrides.error_backoff_secs, Some(10));
        assert_eq!(overrides.token, None);
    }

    #[test]
    fn build_overrides_rejects_non_numeric_seconds() {
        let err = build_overrides(&["poll_timeout_secs=soon".to_string()]).unwrap_err();
        assert!(err.contains("not a number"));
    }
}
