use crate::Error;
use std::borrow::Cow;

/// Classification of every failure raised by rowkit.
///
/// Errors travel as [`anyhow::Error`] so each layer can attach context (entity type,
/// offending SQL), an `ErrorKind` is always somewhere in the chain.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorKind {
    /// Malformed or missing entity metadata, or a row that does not fit the entity.
    #[error("Mapping error: {0}")]
    Mapping(Cow<'static, str>),
    /// Identifier-dependent operation on an entity without an identifier column.
    #[error("Entity `{0}` does not declare an identifier column")]
    MissingIdentifier(&'static str),
    /// Statement builder misuse (mismatched fields and values, missing table, ...).
    #[error("Statement error: {0}")]
    Statement(Cow<'static, str>),
    /// The backend could not be opened or failed to execute a statement.
    #[error("Connection error: {0}")]
    Connection(Cow<'static, str>),
    /// Invalid argument (empty SQL text, unknown provider, ...).
    #[error("Argument error: {0}")]
    Argument(Cow<'static, str>),
}

impl ErrorKind {
    pub fn mapping(message: impl Into<Cow<'static, str>>) -> Error {
        Error::new(Self::Mapping(message.into()))
    }
    pub fn statement(message: impl Into<Cow<'static, str>>) -> Error {
        Error::new(Self::Statement(message.into()))
    }
    pub fn connection(message: impl Into<Cow<'static, str>>) -> Error {
        Error::new(Self::Connection(message.into()))
    }
    pub fn argument(message: impl Into<Cow<'static, str>>) -> Error {
        Error::new(Self::Argument(message.into()))
    }

    /// Find the kind of an error, whether it is the root cause or a context layer.
    pub fn of(error: &Error) -> Option<&ErrorKind> {
        error
            .downcast_ref::<ErrorKind>()
            .or_else(|| error.chain().find_map(|e| e.downcast_ref::<ErrorKind>()))
    }

    pub fn is_mapping(error: &Error) -> bool {
        matches!(Self::of(error), Some(Self::Mapping(..)))
    }
    pub fn is_missing_identifier(error: &Error) -> bool {
        matches!(Self::of(error), Some(Self::MissingIdentifier(..)))
    }
    pub fn is_statement(error: &Error) -> bool {
        matches!(Self::of(error), Some(Self::Statement(..)))
    }
    pub fn is_connection(error: &Error) -> bool {
        matches!(Self::of(error), Some(Self::Connection(..)))
    }
    pub fn is_argument(error: &Error) -> bool {
        matches!(Self::of(error), Some(Self::Argument(..)))
    }
}

#[cfg(test)]
mod tests {
    use super::ErrorKind;
    use anyhow::Context;

    #[test]
    fn kind_survives_context() {
        let error = Err::<(), _>(ErrorKind::mapping("Column `Name` does not exist"))
            .context("While mapping `Person`")
            .context("While executing `SELECT * FROM People`")
            .unwrap_err();
        assert!(ErrorKind::is_mapping(&error));
        assert!(!ErrorKind::is_statement(&error));
        let rendered = format!("{error:#}");
        assert!(rendered.contains("SELECT * FROM People"));
        assert!(rendered.contains("Column `Name` does not exist"));
    }

    #[test]
    fn kind_as_context_layer() {
        let error = anyhow::Error::msg("i32 is out of range")
            .context(ErrorKind::Mapping("Cannot assign `Age`".into()));
        assert!(ErrorKind::is_mapping(&error));
    }

    #[test]
    fn no_kind() {
        let error = anyhow::Error::msg("plain");
        assert_eq!(ErrorKind::of(&error), None);
    }
}
