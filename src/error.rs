use std::fmt;

/// Failures that abort report generation.
#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    /// A font file could not be read or parsed.
    Font(String),
    /// The PDF could not be assembled.
    Pdf(String),
    /// The triggering request is missing a required field.
    InvalidRequest(String),
    /// The text generation provider failed.
    Generation(String),
    /// A resume could not be decoded or has no readable text.
    Resume(String),
}

impl Error {
    /// HTTP status for a front end serving report requests: the caller's
    /// input is at fault for 400, anything else is a 500.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::InvalidRequest(_) | Error::Resume(_) => 400,
            Error::Io(_) | Error::Font(_) | Error::Pdf(_) | Error::Generation(_) => 500,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::Font(msg) => write!(f, "font error: {msg}"),
            Error::Pdf(msg) => write!(f, "failed to generate PDF: {msg}"),
            Error::InvalidRequest(msg) => write!(f, "invalid request: {msg}"),
            Error::Generation(msg) => write!(f, "failed to generate report content: {msg}"),
            Error::Resume(msg) => write!(f, "could not read resume: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

/// A unit of text that could not be measured or drawn. Layout skips the
/// unit and keeps going; these never reach the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    UnsupportedGlyph { ch: char, text: String },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::UnsupportedGlyph { ch, text } => {
                write!(f, "no glyph for {ch:?} (U+{:04X}) in {text:?}", *ch as u32)
            }
        }
    }
}

impl std::error::Error for RenderError {}
