use derive_more::Display;

pub type Result<T> = core::result::Result<T, FieldCubesError>;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum FieldCubesError {
    /// The grid must have at least one cell per axis.
    #[display("grid dimension must be at least 1, got {_0}")]
    InvalidDimension(usize),
    /// Preset ids come from the input layer as small integers.
    #[display("unknown field preset id {_0}")]
    UnknownPreset(u8),
}

impl std::error::Error for FieldCubesError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            FieldCubesError::InvalidDimension(0).to_string(),
            "grid dimension must be at least 1, got 0"
        );
        assert_eq!(
            FieldCubesError::UnknownPreset(9).to_string(),
            "unknown field preset id 9"
        );
    }
}
