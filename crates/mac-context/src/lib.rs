#![cfg_attr(not(test), no_std)]
//! Lifecycle of the per-radio MAC context.
//!
//! The context is the block of driver state the protocol engine and the
//! configuration store attach to. [`MacLifecycle`] builds it in a fixed order
//! (context block, parent reference, configuration store, protocol engine)
//! and tears it down in the reverse order, rolling back partial work when a
//! step of `open` fails.
//!
//! The context block comes from a [`ContextStore`]: either the static
//! singleton [`StaticStore`] or the heap-backed [`HeapStore`]. The
//! `dynamic-alloc` feature picks which one [`DefaultStore`] names.

extern crate alloc;

mod fmt;

mod cfg;
mod context;
mod engine;
mod error;
mod fault;
mod lifecycle;
mod objmgr;
mod store;

pub use cfg::CfgStore;
pub use context::{
    DriverType, MacContext, UpperHandle, DEF_HE_AUTO_SGI_LTF,
    HOST_SEQ_NUM_MAX, HOST_SEQ_NUM_MIN,
};
pub use engine::{OpenOptions, ProtocolEngine, StartParams};
pub use error::{AllocError, MacError, RefError};
pub use fault::{FaultLog, TeardownFault, FAULT_LOG_CAPACITY};
pub use lifecycle::{LifecycleState, MacLifecycle};
pub use objmgr::{ObjRef, Psoc, RefCounted, RefId};
pub use store::{
    ContextStore, DefaultStore, HeapBlock, HeapStore, StaticBlock,
    StaticStore,
};
