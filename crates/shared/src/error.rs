use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodeError {
    #[error("abbreviation letters must be A-Z, found {0:?}")]
    InvalidLetter(char),
    #[error("abbreviation has {0} letters; at most 3 are allowed")]
    TooLong(usize),
    #[error("abbreviation cell {0} does not exist")]
    CellOutOfRange(usize),
}

/// Local, pre-network rejection of a record request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in all fields")]
    MissingField { field: &'static str },
    #[error("unknown department {0:?}")]
    UnknownDepartment(String),
}

impl ValidationError {
    pub fn missing(field: &'static str) -> Self {
        Self::MissingField { field }
    }
}
