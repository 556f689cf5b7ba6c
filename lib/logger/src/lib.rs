//! Hierarchical path loggers used across the pane library.
//!
//! Every logger carries a dotted path (`pane.PNG`) identifying the component which emitted the
//! message. Messages are lazy: closures passed to the logging methods are evaluated only when the
//! message passes the level threshold.

#![warn(unsafe_code)]
#![warn(missing_copy_implementations)]
#![warn(missing_debug_implementations)]

pub mod enabled;

use std::str::FromStr;
use std::sync::OnceLock;



// =============
// === Level ===
// =============

/// Name of the environment variable selecting the level threshold.
pub const LEVEL_ENV_VAR : &str = "PANE_LOG";

/// Severity of a log message.
#[derive(Clone,Copy,Debug,Eq,Hash,Ord,PartialEq,PartialOrd)]
#[allow(missing_docs)]
pub enum Level {Trace,Debug,Info,Warning,Error,Off}

impl Level {
    /// Threshold used when `PANE_LOG` is unset or unparsable.
    pub const DEFAULT : Level = Level::Warning;

    /// Short tag printed in front of messages of this level.
    pub fn tag(self) -> &'static str {
        match self {
            Level::Trace   => "TRACE",
            Level::Debug   => "DEBUG",
            Level::Info    => "INFO",
            Level::Warning => "WARNING",
            Level::Error   => "ERROR",
            Level::Off     => "",
        }
    }
}

impl FromStr for Level {
    type Err = String;
    fn from_str(s:&str) -> Result<Self,Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace"          => Ok(Level::Trace),
            "debug"          => Ok(Level::Debug),
            "info"           => Ok(Level::Info),
            "warn"|"warning" => Ok(Level::Warning),
            "error"          => Ok(Level::Error),
            "off"|"none"     => Ok(Level::Off),
            other            => Err(format!("Unknown log level \"{}\".",other)),
        }
    }
}

/// The process-wide threshold. Read once from `PANE_LOG`.
pub fn threshold() -> Level {
    static THRESHOLD : OnceLock<Level> = OnceLock::new();
    *THRESHOLD.get_or_init(|| {
        std::env::var(LEVEL_ENV_VAR).ok().and_then(|s| s.parse().ok()).unwrap_or(Level::DEFAULT)
    })
}

/// Checks whether messages of the given level are printed.
pub fn is_enabled(level:Level) -> bool {
    level != Level::Off && level >= threshold()
}



// ==============
// === LogMsg ===
// ==============

/// A lazily formatted log message.
pub trait LogMsg {
    /// Run `f` with the formatted message.
    fn with_log_msg<F:FnOnce(&str) -> T, T>(&self, f:F) -> T;
}

impl LogMsg for &str {
    fn with_log_msg<F:FnOnce(&str) -> T, T>(&self, f:F) -> T {
        f(self)
    }
}

impl<F:Fn() -> S, S:AsRef<str>> LogMsg for F {
    fn with_log_msg<G:FnOnce(&str) -> T, T>(&self, f:G) -> T {
        f(self().as_ref())
    }
}



// =================
// === LoggerApi ===
// =================

/// Interface of path loggers.
pub trait LoggerApi {
    /// Creates a new logger. Path should be a unique identifier of this logger.
    fn new<T:AsRef<str>>(path:T) -> Self;
    /// Creates a new logger with this logger as a parent.
    fn sub<T:AsRef<str>>(&self, path:T) -> Self;
    /// Evaluates function `f` and visually groups all logs emitted during its execution.
    fn group<M:LogMsg,T,F:FnOnce() -> T>(&self, msg:M, f:F) -> T;
    /// Log with level:trace.
    fn trace<M:LogMsg>(&self, msg:M);
    /// Log with level:debug.
    fn debug<M:LogMsg>(&self, msg:M);
    /// Log with level:info.
    fn info<M:LogMsg>(&self, msg:M);
    /// Log with level:warning.
    fn warning<M:LogMsg>(&self, msg:M);
    /// Log with level:error.
    fn error<M:LogMsg>(&self, msg:M);
    /// Visually groups all logs between group_begin and group_end.
    fn group_begin<M:LogMsg>(&self, msg:M);
    /// Visually groups all logs between group_begin and group_end.
    fn group_end(&self);
}



// ==============
// === Macros ===
// ==============

#[macro_export]
macro_rules! group {
    ($logger:expr, $message:tt, {$($body:tt)*}) => {{
        let __logger = $logger.clone();
        $crate::LoggerApi::group_begin(&__logger, || format!($message));
        let out = {$($body)*};
        $crate::LoggerApi::group_end(&__logger);
        out
    }};
}

#[macro_export]
macro_rules! log_template {
    ($method:ident $logger:expr, $($arg:tt)*) => {{
        use $crate::LoggerApi as _;
        $logger.$method(|| format!($($arg)*));
    }};
}

#[macro_export]
macro_rules! trace {
    ($($toks:tt)*) => {
        $crate::log_template! {trace $($toks)*}
    };
}

#[macro_export]
macro_rules! debug {
    ($($toks:tt)*) => {
        $crate::log_template! {debug $($toks)*}
    };
}

#[macro_export]
macro_rules! info {
    ($($toks:tt)*) => {
        $crate::log_template! {info $($toks)*}
    };
}

#[macro_export]
macro_rules! warning {
    ($($toks:tt)*) => {
        $crate::log_template! {warning $($toks)*}
    };
}

#[macro_export]
macro_rules! error {
    ($($toks:tt)*) => {
        $crate::log_template! {error $($toks)*}
    };
}



// =============
// === Tests ===
// =============

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_parsing() {
        assert_eq!("warn".parse::<Level>()   , Ok(Level::Warning));
        assert_eq!(" DEBUG ".parse::<Level>(), Ok(Level::Debug));
        assert_eq!("off".parse::<Level>()    , Ok(Level::Off));
        assert!("loud".parse::<Level>().is_err());
    }

    #[test]
    fn level_ordering() {
        assert!(Level::Trace < Level::Debug);
        assert!(Level::Warning < Level::Error);
        assert!(!is_enabled(Level::Off));
    }

    #[test]
    fn lazy_messages() {
        let msg = || format!("{}-{}", 1, 2);
        assert_eq!(msg.with_log_msg(|s| s.to_string()), "1-2");
        assert_eq!("plain".with_log_msg(|s| s.len()), 5);
    }
}
