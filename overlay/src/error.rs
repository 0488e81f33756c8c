/// Errors produced while rendering or exporting a frame
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayError {
    /// Pixmap dimensions tiny-skia cannot allocate
    InvalidSize { width: u32, height: u32 },
    /// PNG encoding or writing failed
    Encode(String),
}

impl std::fmt::Display for OverlayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverlayError::InvalidSize { width, height } => {
                write!(f, "Invalid overlay size: {}x{}", width, height)
            }
            OverlayError::Encode(s) => write!(f, "PNG export failed: {}", s),
        }
    }
}

impl std::error::Error for OverlayError {}
