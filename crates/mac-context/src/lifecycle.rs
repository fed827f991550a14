use core::marker::PhantomData;

use crate::cfg::{self, CfgStore};
use crate::context::MacContext;
use crate::engine::{OpenOptions, ProtocolEngine, StartParams};
use crate::error::MacError;
use crate::fault::{FaultLog, TeardownFault};
use crate::objmgr::{ObjRef, Psoc, RefId};
use crate::store::ContextStore;

/// Lifecycle state of a MAC context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LifecycleState {
    /// Nothing acquired yet.
    Uninitialized,
    /// Context built; the engine is open but not started.
    Open,
    /// Engine started (or bypassed in manufacturing mode).
    Operating,
    /// Everything released. Terminal.
    Closed,
}

impl LifecycleState {
    /// Whether a live context exists in this state.
    pub fn is_open(self) -> bool {
        matches!(self, LifecycleState::Open | LifecycleState::Operating)
    }
}

/// Drives a MAC context through open, start, stop and close.
///
/// Each instance runs one open/close cycle. Calls take `&mut self`, so
/// lifecycle transitions are serialized by whoever owns the value.
pub struct MacLifecycle<S, P, C, E>
where
    S: ContextStore<P>,
    P: Psoc,
    C: CfgStore<P>,
    E: ProtocolEngine<P>,
{
    store: S,
    cfg: C,
    engine: E,
    ctx: Option<S::Block>,
    state: LifecycleState,
    faults: FaultLog,
    _phantom: PhantomData<fn() -> P>,
}

impl<S, P, C, E> MacLifecycle<S, P, C, E>
where
    S: ContextStore<P>,
    P: Psoc,
    C: CfgStore<P>,
    E: ProtocolEngine<P>,
{
    pub fn new(store: S, cfg: C, engine: E) -> Self {
        Self {
            store,
            cfg,
            engine,
            ctx: None,
            state: LifecycleState::Uninitialized,
            faults: FaultLog::new(),
            _phantom: PhantomData,
        }
    }

    /// Build the context and open the protocol engine.
    ///
    /// Acquires, in order: the context block, a reference on `psoc`, the
    /// configuration store, the engine. If any step fails, everything taken by
    /// the earlier steps is released in reverse order before returning.
    pub fn open(
        &mut self,
        psoc: P,
        options: &OpenOptions,
    ) -> Result<(), MacError<E::Error>> {
        if self.state != LifecycleState::Uninitialized {
            error!("mac_open in state {:?}", self.state);
            return Err(MacError::InvalidArgument);
        }

        // Dropping `block` on an early return releases whatever it holds and
        // frees it.
        let mut block = self.store.allocate()?;
        let ctx: &mut MacContext<P> = &mut block;
        ctx.init_defaults(options.upper, options.driver_type);

        match ObjRef::acquire(psoc, RefId::LEGACY_MAC) {
            Ok(psoc) => ctx.psoc = Some(psoc),
            Err(e) => {
                error!("psoc get ref failure");
                return Err(e.into());
            }
        }

        let view = match ctx.psoc().and_then(|psoc| psoc.mlme_cfg()) {
            Some(view) => view,
            None => {
                error!("failed to get MLME obj");
                return Err(MacError::ConfigObjectMissing);
            }
        };

        if let Err(_e) = cfg::attach(&mut self.cfg, ctx, view) {
            error!("cfg init failed");
            return Err(MacError::ConfigInitFailure);
        }

        if let Err(e) = self.engine.open(ctx, options) {
            error!("pe open failed");
            cfg::detach(&mut self.cfg, ctx);
            return Err(MacError::EngineOpenFailure(e));
        }

        self.ctx = Some(block);
        self.state = LifecycleState::Open;
        info!("MAC context open");
        Ok(())
    }

    /// Record the operating mode and start the protocol engine.
    ///
    /// Manufacturing mode does not start the engine. On engine failure the
    /// state is [`Open`](LifecycleState::Open), whichever state the call was
    /// made from.
    pub fn start(
        &mut self,
        params: &StartParams,
    ) -> Result<(), MacError<E::Error>> {
        let Some(ctx) = self.ctx.as_deref_mut() else {
            error!("mac_start without a context");
            return Err(MacError::InvalidArgument);
        };

        ctx.driver_type = params.driver_type;

        if params.driver_type.is_mfg() {
            info!("MFG mode, protocol engine not started");
        } else if let Err(e) = self.engine.start(ctx) {
            error!("pe start failed");
            self.state = LifecycleState::Open;
            return Err(MacError::EngineStartFailure(e));
        }

        self.state = LifecycleState::Operating;
        Ok(())
    }

    /// Stop the protocol engine and tear down the configuration store.
    ///
    /// Never fails. Engine failures are logged and recorded in
    /// [`faults`](Self::faults). The state returns to
    /// [`Open`](LifecycleState::Open) with the configuration store torn down:
    /// a later [`start`](Self::start) restarts the engine without a
    /// configuration view, and the configuration is not re-initialized until
    /// the context is closed and a new one opened.
    pub fn stop(&mut self) {
        let Some(ctx) = self.ctx.as_deref_mut() else {
            warn!("mac_stop without a context");
            return;
        };

        if let Err(_e) = self.engine.stop(ctx) {
            warn!("pe stop failed, continuing");
            self.faults.record(TeardownFault::EngineStop);
        }
        cfg::detach(&mut self.cfg, ctx);

        self.state = LifecycleState::Open;
    }

    /// Release everything acquired by [`open`](Self::open), in reverse
    /// order, and free the context.
    ///
    /// Only fails when there is no context to close. Sub-call failures are
    /// logged and recorded in [`faults`](Self::faults).
    pub fn close(&mut self) -> Result<(), MacError<E::Error>> {
        let Some(mut block) = self.ctx.take() else {
            error!("mac_close without a context");
            return Err(MacError::InvalidArgument);
        };
        let ctx: &mut MacContext<P> = &mut block;

        if let Err(_e) = self.engine.close(ctx) {
            warn!("pe close failed, continuing");
            self.faults.record(TeardownFault::EngineClose);
        }

        cfg::detach(&mut self.cfg, ctx);

        if ctx.detach_pdev() {
            debug!("pdev ref released");
        }

        if let Some(psoc) = ctx.psoc.take() {
            psoc.release();
        }
        ctx.mlme_cfg = None;

        self.store.free(block);
        self.state = LifecycleState::Closed;
        info!("MAC context closed");
        Ok(())
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// The live context, between a successful open and close.
    pub fn context(&self) -> Option<&MacContext<P>> {
        self.ctx.as_deref()
    }

    pub fn context_mut(&mut self) -> Option<&mut MacContext<P>> {
        self.ctx.as_deref_mut()
    }

    /// Failures swallowed by `stop` and `close`.
    pub fn faults(&self) -> &FaultLog {
        &self.faults
    }

    pub fn faults_mut(&mut self) -> &mut FaultLog {
        &mut self.faults
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
