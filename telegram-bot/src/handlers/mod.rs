//! Application-level handlers.

mod command;

pub use command::{
    parse_command, CommandHandler, DRAW_TOO_SHORT_TEXT, DRAW_USAGE_TEXT, HELP_TEXT,
    MIN_DESCRIPTION_CHARS, START_TEXT,
};
