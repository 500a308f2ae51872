use routine_db::PageError;
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    /// Rejected before touching the store (nil id, unparsable filter).
    #[error("invalid argument: {name}")]
    InvalidArgument { name: &'static str },

    #[error(transparent)]
    Mapping(#[from] paging_core::Error),

    /// A mapping table names a field with no column.
    #[error("no column mapped for field '{0}'")]
    UnmappedField(String),

    #[error(transparent)]
    Db(#[from] DbErr),
}

impl RepoError {
    pub fn invalid(name: &'static str) -> Self {
        Self::InvalidArgument { name }
    }

    /// Wiring mistakes rather than bad input or store failures.
    pub fn is_configuration(&self) -> bool {
        match self {
            Self::Mapping(e) => e.is_configuration(),
            Self::UnmappedField(_) => true,
            _ => false,
        }
    }
}

impl From<PageError> for RepoError {
    fn from(e: PageError) -> Self {
        match e {
            PageError::UnmappedField(field) => Self::UnmappedField(field),
            PageError::Mapping(e) => Self::Mapping(e),
        }
    }
}
