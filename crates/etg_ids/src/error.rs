use thiserror::Error;

pub type Result<T> = std::result::Result<T, IdError>;

/// Errors raised by [`IdPool`](crate::IdPool) operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    #[error("Object with ID {0} doesn't exist")]
    NonExistentId(String),

    #[error("The ID's {0} can not contain any colons or whitespace")]
    BadIdElement(String),

    #[error("The ID namespace {0} is locked")]
    LockedNamespace(String),

    #[error("Item {0} already exists")]
    ItemIdExists(String),

    #[error("ID was improperly formatted: {0}")]
    BadlyFormattedId(String),
}
