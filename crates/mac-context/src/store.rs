use core::cell::Cell;
use core::marker::PhantomData;
use core::ops::{Deref, DerefMut};

use alloc::vec::Vec;
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use grounded::uninit::GroundedCell;
use portable_atomic::{AtomicBool, Ordering};

use crate::context::MacContext;
use crate::error::AllocError;
use crate::objmgr::Psoc;

/// Source of MAC context blocks.
///
/// A store hands out at most one block at a time. Dropping the block (or
/// passing it to [`free`](Self::free)) drops the context in place, releasing
/// any reference it still holds, and makes the store available again.
pub trait ContextStore<P: Psoc> {
    /// Exclusively-owned, zero-initialized context block.
    type Block: DerefMut<Target = MacContext<P>>;

    /// Hand out the context block.
    ///
    /// # Panics
    ///
    /// If a block from this store is still live.
    fn allocate(&self) -> Result<Self::Block, AllocError>;

    /// Number of live blocks (0 or 1).
    fn outstanding(&self) -> usize;

    /// Return a block to the store.
    fn free(&self, block: Self::Block) {
        drop(block)
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "dynamic-alloc")] {
        /// Store selected by the build configuration.
        pub type DefaultStore<P> = HeapStore<P>;
    } else {
        /// Store selected by the build configuration.
        pub type DefaultStore<P> = StaticStore<
            embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex,
            P,
        >;
    }
}

/// Occupancy of the static slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Vacant,
    Claimed,
}

/// Singleton store backed by a statically reserved cell.
///
/// Allocation never fails and always yields the same address.
pub struct StaticStore<M: RawMutex, P: Psoc> {
    cell: GroundedCell<MacContext<P>>,
    slot: Mutex<M, Cell<Slot>>,
}

// SAFETY: The slot mutex hands out at most one `StaticBlock`, so the cell is
// only ever reached through a single owner, as with `Mutex<T: Send>: Sync`.
// That owner carries `PhantomData<&mut MacContext<P>>`, so sharing a block
// across threads needs `MacContext<P>: Sync`, as sharing a `MutexGuard` does.
unsafe impl<M: RawMutex + Sync, P: Psoc> Sync for StaticStore<M, P> where
    MacContext<P>: Send
{
}

impl<M: RawMutex, P: Psoc> StaticStore<M, P> {
    pub const fn new() -> Self {
        Self {
            cell: GroundedCell::uninit(),
            slot: Mutex::new(Cell::new(Slot::Vacant)),
        }
    }

    /// Claim the slot and zero-initialize the context in it.
    ///
    /// # Panics
    ///
    /// If the previous block has not been freed.
    pub fn allocate(&self) -> StaticBlock<'_, M, P> {
        let prev = self.slot.lock(|slot| slot.replace(Slot::Claimed));
        assert!(prev == Slot::Vacant, "MAC context already allocated");

        // SAFETY: We just moved the slot from Vacant to Claimed, so no block
        // refers to the cell and whatever it held has been dropped.
        unsafe {
            self.cell.get().write(MacContext::default());
        }
        debug!("static MAC context allocated");
        StaticBlock { store: self, _marker: PhantomData }
    }

    pub fn outstanding(&self) -> usize {
        self.slot.lock(|slot| (slot.get() == Slot::Claimed) as usize)
    }
}

impl<M: RawMutex, P: Psoc> Default for StaticStore<M, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, M: RawMutex, P: Psoc> ContextStore<P> for &'a StaticStore<M, P> {
    type Block = StaticBlock<'a, M, P>;

    fn allocate(&self) -> Result<Self::Block, AllocError> {
        Ok(StaticStore::allocate(*self))
    }

    fn outstanding(&self) -> usize {
        StaticStore::outstanding(*self)
    }
}

/// Exclusive handle on the context held in a [`StaticStore`].
///
/// The block is `Send` and `Sync` exactly when `&mut MacContext<P>` is, so a
/// context that is not `Sync` cannot be shared across threads through it:
///
/// ```compile_fail
/// use core::cell::Cell;
///
/// use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
/// use mac_context::{Psoc, RefCounted, RefError, RefId, StaticBlock};
///
/// struct Counted(Cell<u64>);
///
/// impl RefCounted for Counted {
///     fn try_get_ref(&self, _id: RefId) -> Result<(), RefError> {
///         Ok(())
///     }
///     fn release_ref(&self, _id: RefId) {}
/// }
///
/// impl Psoc for Counted {
///     type Pdev = Counted;
///     type MlmeCfg = ();
///     fn mlme_cfg(&self) -> Option<()> {
///         None
///     }
/// }
///
/// fn assert_sync<T: Sync>() {}
/// assert_sync::<StaticBlock<'static, CriticalSectionRawMutex, Counted>>();
/// ```
pub struct StaticBlock<'a, M: RawMutex, P: Psoc> {
    store: &'a StaticStore<M, P>,
    // Auto traits follow `&'a mut MacContext<P>`, not the store reference.
    _marker: PhantomData<&'a mut MacContext<P>>,
}

impl<M: RawMutex, P: Psoc> Deref for StaticBlock<'_, M, P> {
    type Target = MacContext<P>;

    #[inline]
    fn deref(&self) -> &MacContext<P> {
        // SAFETY: The cell was initialized by `allocate` and stays so until
        // this block is dropped. The slot is Claimed, so we are the only block.
        unsafe { &*self.store.cell.get() }
    }
}

impl<M: RawMutex, P: Psoc> DerefMut for StaticBlock<'_, M, P> {
    #[inline]
    fn deref_mut(&mut self) -> &mut MacContext<P> {
        // SAFETY: As for `deref`; `&mut self` makes the access exclusive.
        unsafe { &mut *self.store.cell.get() }
    }
}

impl<M: RawMutex, P: Psoc> Drop for StaticBlock<'_, M, P> {
    fn drop(&mut self) {
        // SAFETY: The context is initialized and no borrow of it can outlive
        // this block. The slot is released only after the drop completes.
        unsafe {
            core::ptr::drop_in_place(self.store.cell.get());
        }
        self.store.slot.lock(|slot| slot.set(Slot::Vacant));
        debug!("static MAC context freed");
    }
}

/// Store that places the context on the heap, one block at a time.
pub struct HeapStore<P: Psoc> {
    claimed: AtomicBool,
    _phantom: PhantomData<fn() -> P>,
}

impl<P: Psoc> HeapStore<P> {
    pub const fn new() -> Self {
        Self { claimed: AtomicBool::new(false), _phantom: PhantomData }
    }

    /// Heap-allocate a zero-initialized context.
    ///
    /// # Panics
    ///
    /// If the previous block has not been freed.
    pub fn allocate(&self) -> Result<HeapBlock<'_, P>, AllocError> {
        let prev = self.claimed.swap(true, Ordering::AcqRel);
        assert!(!prev, "MAC context already allocated");

        let mut ctx: Vec<MacContext<P>> = Vec::new();
        if ctx.try_reserve_exact(1).is_err() {
            self.claimed.store(false, Ordering::Release);
            error!(
                "failed to allocate {} bytes for the MAC context",
                core::mem::size_of::<MacContext<P>>()
            );
            return Err(AllocError);
        }
        ctx.push(MacContext::default());
        debug!("heap MAC context allocated");
        Ok(HeapBlock { ctx, claimed: &self.claimed })
    }

    pub fn outstanding(&self) -> usize {
        self.claimed.load(Ordering::Acquire) as usize
    }
}

impl<P: Psoc> Default for HeapStore<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, P: Psoc> ContextStore<P> for &'a HeapStore<P> {
    type Block = HeapBlock<'a, P>;

    fn allocate(&self) -> Result<Self::Block, AllocError> {
        HeapStore::allocate(*self)
    }

    fn outstanding(&self) -> usize {
        HeapStore::outstanding(*self)
    }
}

/// Owning handle on a heap-allocated context.
pub struct HeapBlock<'a, P: Psoc> {
    // Always exactly one element; a Vec lets the reservation be fallible.
    ctx: Vec<MacContext<P>>,
    claimed: &'a AtomicBool,
}

impl<P: Psoc> Deref for HeapBlock<'_, P> {
    type Target = MacContext<P>;

    #[inline]
    fn deref(&self) -> &MacContext<P> {
        &self.ctx[0]
    }
}

impl<P: Psoc> DerefMut for HeapBlock<'_, P> {
    #[inline]
    fn deref_mut(&mut self) -> &mut MacContext<P> {
        &mut self.ctx[0]
    }
}

impl<P: Psoc> Drop for HeapBlock<'_, P> {
    fn drop(&mut self) {
        self.ctx.clear();
        self.claimed.store(false, Ordering::Release);
        debug!("heap MAC context freed");
    }
}
