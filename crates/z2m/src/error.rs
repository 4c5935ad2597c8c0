use thiserror::Error;

#[derive(Error, Debug)]
pub enum Z2mError {
    /* mapped errors */
    #[error(transparent)]
    ParseIntError(#[from] std::num::ParseIntError),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    #[error("Empty attribute key")]
    EmptyAttributeKey,
}

pub type Z2mResult<T> = Result<T, Z2mError>;
