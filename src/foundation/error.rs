pub type OgResult<T> = Result<T, OgError>;

#[derive(thiserror::Error, Debug)]
pub enum OgError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("font error: {0}")]
    Font(String),

    #[error("photo error: {0}")]
    Photo(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("image error: {0}")]
    Image(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OgError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }

    pub fn photo(msg: impl Into<String>) -> Self {
        Self::Photo(msg.into())
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    pub fn image(msg: impl Into<String>) -> Self {
        Self::Image(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            OgError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(OgError::font("x").to_string().contains("font error:"));
        assert!(OgError::photo("x").to_string().contains("photo error:"));
        assert!(OgError::io("x").to_string().contains("io error:"));
        assert!(OgError::image("x").to_string().contains("image error:"));
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = OgError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
