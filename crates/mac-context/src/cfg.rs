//! Glue between the MAC context and the external configuration store.
//!
//! The configuration view is bound into the context only after the store has
//! initialized, and cleared whenever the store is torn down, so
//! [`MacContext::mlme_cfg`] is `Some` exactly while the store is up.

use crate::context::MacContext;
use crate::objmgr::Psoc;

/// External configuration store.
pub trait CfgStore<P: Psoc> {
    type Error: core::fmt::Debug;

    /// Build the store from `view` and the parent-derived fields of `ctx`.
    fn init(
        &mut self,
        ctx: &MacContext<P>,
        view: &P::MlmeCfg,
    ) -> Result<(), Self::Error>;

    /// Tear the store down.
    ///
    /// Must be idempotent: `stop` and `close` both call it.
    fn deinit(&mut self, ctx: &MacContext<P>);
}

/// Initialize `store` and bind `view` into `ctx`.
///
/// On failure the view is left unbound and the store is not deinitialized.
pub(crate) fn attach<P, C>(
    store: &mut C,
    ctx: &mut MacContext<P>,
    view: P::MlmeCfg,
) -> Result<(), C::Error>
where
    P: Psoc,
    C: CfgStore<P>,
{
    store.init(ctx, &view)?;
    ctx.mlme_cfg = Some(view);
    debug!("cfg attached");
    Ok(())
}

/// Deinitialize `store` and clear the view, whatever state it was in.
pub(crate) fn detach<P, C>(store: &mut C, ctx: &mut MacContext<P>)
where
    P: Psoc,
    C: CfgStore<P>,
{
    store.deinit(ctx);
    ctx.mlme_cfg = None;
    debug!("cfg detached");
}
