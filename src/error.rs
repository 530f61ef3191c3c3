// Error type for the paint engine.
// Every variant states *where* things went wrong.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PaintError>;

#[derive(Debug, Error)]
pub enum PaintError {
    /// The drawing context could not be obtained (already held, or gone).
    #[error("Surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// An import source was malformed or in an unsupported format.
    #[error("Image decode error: {0}")]
    ImageDecode(String),

    /// Reading the surface back into an encoded image failed.
    #[error("Export encode error: {0}")]
    ExportEncode(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Window init error: {0}")]
    WindowInit(String),

    #[error("Window update error: {0}")]
    WindowUpdate(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for PaintError {
    fn from(err: toml::de::Error) -> Self {
        PaintError::Config(err.to_string())
    }
}
