use std::fmt::Formatter;

#[derive(Debug)]
pub enum KernError {
    /// An operation was called with inputs it cannot work on, such as
    /// interpolating with fewer than three masters.
    Precondition(String),
    MasterCount { expected: usize, found: usize },
    IoError(std::io::Error),
    FontParse(String),
    #[cfg(feature = "ufo")]
    UfoError(String),
}

impl std::fmt::Display for KernError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            KernError::Precondition(e) => write!(f, "Precondition failed: {}", e),
            KernError::MasterCount { expected, found } => write!(
                f,
                "Value list has {} slots, but there are {} masters",
                found, expected
            ),
            KernError::IoError(e) => write!(f, "IO error: {}", e),
            KernError::FontParse(e) => write!(f, "Font parsing error: {}", e),
            #[cfg(feature = "ufo")]
            KernError::UfoError(e) => write!(f, "UFO error: {}", e),
        }
    }
}

impl std::error::Error for KernError {}

impl From<std::io::Error> for KernError {
    fn from(e: std::io::Error) -> Self {
        KernError::IoError(e)
    }
}

impl From<ttf_parser::FaceParsingError> for KernError {
    fn from(e: ttf_parser::FaceParsingError) -> Self {
        KernError::FontParse(e.to_string())
    }
}

#[cfg(feature = "ufo")]
impl From<norad::error::FontLoadError> for KernError {
    fn from(e: norad::error::FontLoadError) -> Self {
        KernError::UfoError(e.to_string())
    }
}

#[cfg(feature = "ufo")]
impl From<norad::error::FontWriteError> for KernError {
    fn from(e: norad::error::FontWriteError) -> Self {
        KernError::UfoError(e.to_string())
    }
}

#[cfg(feature = "ufo")]
impl From<norad::error::NamingError> for KernError {
    fn from(e: norad::error::NamingError) -> Self {
        KernError::UfoError(e.to_string())
    }
}
