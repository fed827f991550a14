use crate::context::{DriverType, MacContext, UpperHandle};
use crate::objmgr::Psoc;

/// Parameters for [`MacLifecycle::open`](crate::MacLifecycle::open).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OpenOptions {
    /// Mode to assume until `start` records the real one.
    pub driver_type: DriverType,
    /// Upper-layer handle stored in the context.
    pub upper: UpperHandle,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self { driver_type: DriverType::Production, upper: UpperHandle(0) }
    }
}

/// Parameters for [`MacLifecycle::start`](crate::MacLifecycle::start).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StartParams {
    pub driver_type: DriverType,
}

/// The protocol/management engine driven by the MAC lifecycle.
///
/// `open` and `start` failures abort the lifecycle transition. `stop` and
/// `close` failures are logged and otherwise ignored.
pub trait ProtocolEngine<P: Psoc> {
    type Error: core::fmt::Debug;

    /// Called once the context holds the parent reference and configuration.
    fn open(
        &mut self,
        ctx: &mut MacContext<P>,
        options: &OpenOptions,
    ) -> Result<(), Self::Error>;

    fn close(&mut self, ctx: &mut MacContext<P>) -> Result<(), Self::Error>;

    fn start(&mut self, ctx: &mut MacContext<P>) -> Result<(), Self::Error>;

    fn stop(&mut self, ctx: &mut MacContext<P>) -> Result<(), Self::Error>;
}
