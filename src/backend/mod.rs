pub mod z2m;

use async_trait::async_trait;

use crate::codec::command::WireCommand;
use crate::error::SwitchResult;

/// Delivers encoded commands to the device
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, cmd: &WireCommand) -> SwitchResult<()>;
}
