use camino::Utf8PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SwitchError {
    /* mapped errors */
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    #[error(transparent)]
    IOError(#[from] std::io::Error),

    #[error(transparent)]
    ConfigError(#[from] config::ConfigError),

    #[error(transparent)]
    SetLoggerError(#[from] log::SetLoggerError),

    #[error(transparent)]
    TungsteniteError(#[from] tokio_tungstenite::tungstenite::Error),

    #[error(transparent)]
    NativeTlsError(#[from] native_tls::Error),

    #[error(transparent)]
    ZclError(#[from] zcl::error::ZclError),

    #[error(transparent)]
    Z2mError(#[from] z2m::error::Z2mError),

    /* zigbee2mqtt errors */
    #[error("Unexpected eof on z2m socket")]
    UnexpectedZ2mEof,

    #[error("Unexpected z2m message: {0:?}")]
    UnexpectedZ2mReply(tokio_tungstenite::tungstenite::Message),

    #[error("Timed out waiting for {0} from z2m")]
    Z2mTimeout(String),

    #[error("No z2m server named {0:?} in configuration")]
    UnknownServer(String),

    /* configuration errors */
    #[error("Cannot read config file {0}")]
    ConfigMissing(Utf8PathBuf),

    /* endpoint errors */
    #[error("Endpoint {0} is not declared on this device")]
    UnknownEndpoint(u8),

    #[error("Endpoint name {0:?} is not declared on this device")]
    UnknownEndpointName(String),

    #[error("Endpoint {0} declared more than once")]
    DuplicateEndpoint(String),

    #[error("Cannot lay out {count} endpoints starting at {first}")]
    InvalidEndpointLayout { first: u8, count: u8 },

    /* attribute errors */
    #[error("Unknown attribute {0:?}")]
    UnknownAttribute(String),

    #[error("Value {ordinal} out of range for {attr}")]
    OrdinalOutOfRange { attr: &'static str, ordinal: i64 },

    #[error("Invalid value {label:?} for {attr} (expected one of: {expected})")]
    UnknownLabel {
        attr: &'static str,
        label: String,
        expected: String,
    },

    #[error("Invalid value {value} for {attr}")]
    InvalidValue {
        attr: String,
        value: serde_json::Value,
    },
}

pub type SwitchResult<T> = Result<T, SwitchError>;
