use std::{path::Path, sync::Arc};

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use simple_logger::SimpleLogger;

/// Characters that can't appear raw in a URL path; `/` stays as the segment separator
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Turns a page path into its URL form. Non-ASCII text is always encoded.
pub fn encode_path(path: &str) -> String {
    utf8_percent_encode(path, PATH_SEGMENT).to_string()
}

pub trait FileNameShortcut {
    fn file_name_arc_str(&self) -> Arc<str>;
}

impl FileNameShortcut for Path {
    /// Falls back to the whole path for paths like `..` that have no file name
    fn file_name_arc_str(&self) -> Arc<str> {
        self.file_name()
            .map_or_else(|| self.to_string_lossy(), |name| name.to_string_lossy())
            .into()
    }
}

pub trait ExtractBaseName {
    fn base_name(&self) -> Arc<str>;
}

impl ExtractBaseName for Arc<str> {
    fn base_name(&self) -> Arc<str> {
        self.rfind('.')
            .and_then(|last_dot_index| {
                if last_dot_index == 0 {
                    None
                } else {
                    Some(self[..last_dot_index].into())
                }
            })
            .unwrap_or_else(|| self.clone())
    }
}

pub fn parse_log_level(log_level_name: &str) -> Option<log::LevelFilter> {
    match &log_level_name.to_lowercase()[..] {
        "off" => Some(log::LevelFilter::Off),
        "error" => Some(log::LevelFilter::Error),
        "warn" => Some(log::LevelFilter::Warn),
        "info" => Some(log::LevelFilter::Info),
        "debug" => Some(log::LevelFilter::Debug),
        "trace" => Some(log::LevelFilter::Trace),
        _ => None,
    }
}

/// # Errors
/// Returns a description of the problem if the level name is unknown or a logger is already set
pub fn init_logger(log_level_name: &str) -> Result<(), String> {
    let log_level_filter = parse_log_level(log_level_name).ok_or_else(|| {
        format!(
            r#"Log level's lowercase representation (`{}`) isn't in ["off", "error", "warn", "info", "debug", "trace"]!"#,
            log_level_name
        )
    })?;
    SimpleLogger::new()
        .with_level(log_level_filter)
        .init()
        .map_err(|error| error.to_string())
}
