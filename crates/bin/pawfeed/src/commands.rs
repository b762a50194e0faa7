//! Console command parsing.

use pawfeed_domain::error::ValidationError;
use pawfeed_domain::mode::FeedMode;
use pawfeed_domain::schedule::ScheduleId;

pub const USAGE: &str = "\
commands:
  status                              show mode, readings and schedules
  feed [grams]                        dispense food (manual mode only)
  mode auto|manual                    switch the feeding mode
  toggle                              flip the feeding mode
  settings <default_grams> <min_kg>   save default portion and food threshold
  schedule add <HH:MM> <grams>        add a feeding schedule
  schedule rm <id>                    delete a feeding schedule
  schedules                           list feeding schedules
  help                                show this help
  quit                                exit";

/// A parsed console command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Status,
    Feed(Option<f64>),
    Mode(FeedMode),
    Toggle,
    Settings {
        default_feed_amount: f64,
        min_food_level: f64,
    },
    AddSchedule {
        time: String,
        amount: f64,
    },
    RemoveSchedule(ScheduleId),
    Schedules,
    Help,
    Quit,
}

/// Why a line could not be turned into a [`Command`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command {0:?}, type `help` for the list")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Parse one input line. Blank lines yield `None`.
///
/// # Errors
///
/// Returns [`CommandError`] for unknown verbs, missing arguments and
/// non-numeric amounts.
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let command = match (verb.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("status", []) => Command::Status,
        ("feed", []) => Command::Feed(None),
        ("feed", [grams]) => Command::Feed(Some(number(grams)?)),
        ("feed", _) => return Err(CommandError::Usage("feed [grams]")),
        ("mode", [mode]) => Command::Mode(
            mode.parse()
                .map_err(|_| CommandError::Usage("mode auto|manual"))?,
        ),
        ("mode", _) => return Err(CommandError::Usage("mode auto|manual")),
        ("toggle", []) => Command::Toggle,
        ("settings", [grams, level]) => Command::Settings {
            default_feed_amount: number(grams)?,
            min_food_level: number(level)?,
        },
        ("settings", _) => return Err(CommandError::Usage("settings <default_grams> <min_kg>")),
        ("schedule", ["add", time, grams]) => Command::AddSchedule {
            time: (*time).to_string(),
            amount: number(grams)?,
        },
        ("schedule", ["rm" | "delete", id]) => Command::RemoveSchedule(ScheduleId::new(*id)),
        ("schedule", _) => {
            return Err(CommandError::Usage(
                "schedule add <HH:MM> <grams> | schedule rm <id>",
            ));
        }
        ("schedules", []) => Command::Schedules,
        ("help" | "?", _) => Command::Help,
        ("quit" | "exit", []) => Command::Quit,
        _ => return Err(CommandError::Unknown(line.trim().to_string())),
    };
    Ok(Some(command))
}

fn number(raw: &str) -> Result<f64, ValidationError> {
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or(ValidationError::NotANumber)
}
