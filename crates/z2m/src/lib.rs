pub mod api;
pub mod error;
pub mod event;
pub mod request;
