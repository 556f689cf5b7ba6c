//! Errors raised by the pane library. All of them are surfaced to the immediate caller; none is
//! retried internally.

use failure::Fail;



// =============
// === Error ===
// =============

/// Result of the pane library operations.
pub type Result<T> = std::result::Result<T,Error>;

/// Any error raised by the pane library.
#[derive(Debug,Fail)]
pub enum Error {
    /// The value was rejected by the pane type it was given to.
    #[fail(display = "{} object not understood by {}, expected {} object.", actual, pane, expected)]
    TypeMismatch {
        /// Name of the pane type.
        pane     : String,
        /// Kind of value the pane type accepts.
        expected : String,
        /// Kind of the rejected value.
        actual   : String,
    },
    /// No registered pane type accepts the value.
    #[fail(display = "{} type could not be rendered.", kind)]
    UnsupportedValue {
        /// Kind of the rejected value.
        kind : String,
    },
    /// A pane could not produce or update a node.
    #[fail(display = "{}", _0)]
    Render(#[cause] RenderError),
    /// Unrecognized or malformed configuration.
    #[fail(display = "{}", _0)]
    Config(#[cause] ConfigError),
}

impl From<RenderError> for Error {
    fn from(error:RenderError) -> Self {
        Error::Render(error)
    }
}

impl From<ConfigError> for Error {
    fn from(error:ConfigError) -> Self {
        Error::Config(error)
    }
}

impl Error {
    /// Checks whether this is a `RenderError`.
    pub fn is_render_error(&self) -> bool {
        matches!(self, Error::Render(_))
    }

    /// Checks whether this is a `ConfigError`.
    pub fn is_config_error(&self) -> bool {
        matches!(self, Error::Config(_))
    }
}



// ===================
// === RenderError ===
// ===================

/// A pane could not convert its value into a node.
#[derive(Debug,Fail)]
#[allow(missing_docs)]
pub enum RenderError {
    #[fail(display = "Malformed {} image: {}.", format, reason)]
    MalformedImage { format:String, reason:String },
    #[fail(display = "Could not load \"{}\": {}.", source, reason)]
    Unreachable { source:String, reason:String },
    #[fail(display = "Plotting backend \"{}\" is not initialized.", backend)]
    BackendNotInitialized { backend:String },
    #[fail(display = "Plotting backend \"{}\" failed: {}.", backend, reason)]
    Backend { backend:String, reason:String },
    #[fail(display = "{} pane does not support in-place updates.", pane)]
    UpdateNotSupported { pane:String },
    #[fail(display = "{} pane has no object to render.", pane)]
    NoObject { pane:String },
}



// ===================
// === ConfigError ===
// ===================

/// Configuration passed to a pane was not understood.
#[derive(Debug,Fail)]
#[allow(missing_docs)]
pub enum ConfigError {
    #[fail(display = "Option \"{}\" is not recognized by {} pane.", option, pane)]
    UnknownOption { pane:String, option:String },
    #[fail(display = "Malformed configuration: {}.", reason)]
    Malformed { reason:String },
    #[fail(display = "Explicit widget for the \"{}\" dimension is invalid: {}.", dimension, reason)]
    InvalidWidget { dimension:String, reason:String },
}



// =============
// === Tests ===
// =============

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let error = Error::TypeMismatch {
            pane     : "PNG".into(),
            expected : "PNG".into(),
            actual   : "i64".into(),
        };
        assert_eq!(error.to_string(), "i64 object not understood by PNG, expected PNG object.");
        let error : Error = ConfigError::UnknownOption{pane:"HTML".into(),option:"dpi".into()}.into();
        assert!(error.is_config_error());
        assert_eq!(error.to_string(), "Option \"dpi\" is not recognized by HTML pane.");
    }
}
