use thiserror::Error;

#[derive(Error, Debug)]
pub enum ZclError {
    /* mapped errors */
    #[error(transparent)]
    FromUtf8Error(#[from] std::string::FromUtf8Error),

    #[error(transparent)]
    IOError(#[from] std::io::Error),

    #[error(transparent)]
    PackedStructError(#[from] packed_struct::PackingError),

    #[error("Unsupported zcl data type {0:02x}")]
    UnsupportedDataType(u8),

    #[error("Invalid zcl attribute list length: {0}")]
    InvalidLength(usize),

    #[error("Cannot encode attribute value {0}")]
    UnencodableValue(String),
}

pub type ZclResult<T> = Result<T, ZclError>;
