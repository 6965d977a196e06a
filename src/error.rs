use std::convert::From;
use std::error;
use std::fmt;
use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: Option<String>,
}

#[derive(Debug)]
pub enum ErrorKind {
    InvalidConfiguration,
    CalendarSystem,
    ConfigParse,
    DateParse,
    IOError(io::Error),
}

impl Error {
    pub fn new(kind: ErrorKind, msg: &str) -> Self {
        Error {
            kind,
            message: Some(msg.to_owned()),
        }
    }

    pub fn with_msg(mut self, message: &str) -> Self {
        self.message = Some(message.to_owned());
        self
    }

    pub fn is_invalid_configuration(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidConfiguration)
    }

    pub fn is_calendar_system(&self) -> bool {
        matches!(self.kind, ErrorKind::CalendarSystem)
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            kind,
            message: None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(io_error: io::Error) -> Error {
        Error::from(ErrorKind::IOError(io_error))
    }
}

impl From<chrono::ParseError> for Error {
    fn from(parse_error: chrono::ParseError) -> Error {
        Error::new(
            ErrorKind::DateParse,
            format!("Could not parse date: {}", parse_error).as_str(),
        )
    }
}

impl From<toml::de::Error> for Error {
    fn from(toml_error: toml::de::Error) -> Error {
        Error::new(ErrorKind::ConfigParse, &toml_error.to_string())
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        if let ErrorKind::IOError(err) = err.kind {
            err
        } else {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                err.message.unwrap_or_else(|| "invalid input".to_owned()),
            )
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(msg) => write!(f, "{}: {}", self.kind.as_str(), msg),
            None => write!(f, "{}", self.kind.as_str()),
        }
    }
}

impl error::Error for Error {}

impl ErrorKind {
    pub fn as_str(&self) -> String {
        match self {
            ErrorKind::InvalidConfiguration => "invalid configuration".to_owned(),
            ErrorKind::CalendarSystem => "calendar system failure".to_owned(),
            ErrorKind::ConfigParse => "invalid config file".to_owned(),
            ErrorKind::DateParse => "invalid date format".to_owned(),
            ErrorKind::IOError(err) => err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_with_and_without_message() {
        let bare = Error::from(ErrorKind::CalendarSystem);
        assert_eq!(bare.to_string(), "calendar system failure");

        let err = Error::new(ErrorKind::InvalidConfiguration, "weekday 9");
        assert_eq!(err.to_string(), "invalid configuration: weekday 9");
        assert!(err.is_invalid_configuration());
    }

    #[test]
    fn io_roundtrip_keeps_kind() {
        let err = Error::from(io::Error::from(io::ErrorKind::NotFound));
        let io_err: io::Error = err.into();
        assert_eq!(io_err.kind(), io::ErrorKind::NotFound);

        let err: io::Error = Error::new(ErrorKind::DateParse, "2024-13").into();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
