pub mod attribute;
pub mod command;
pub mod decode;
pub mod encode;
pub mod endpoint;
pub mod message;

use crate::codec::endpoint::EndpointResolver;

/// Semantic name of the relay on/off field
pub const STATE_FIELD: &str = "state";

/// Endpoint-qualified field name, e.g. `relay_mode_button_1`
#[must_use]
pub fn field_name(name: &str, endpoint: &str) -> String {
    format!("{name}_{endpoint}")
}

/// Bidirectional translator between device attribute traffic and named,
/// endpoint-qualified fields.
#[derive(Debug, Clone)]
pub struct SwitchCodec {
    endpoints: EndpointResolver,
}

impl SwitchCodec {
    #[must_use]
    pub const fn new(endpoints: EndpointResolver) -> Self {
        Self { endpoints }
    }

    #[must_use]
    pub const fn endpoints(&self) -> &EndpointResolver {
        &self.endpoints
    }
}
