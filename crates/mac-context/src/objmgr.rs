use core::ops::Deref;

use crate::error::RefError;

/// Name under which a reference is taken, so the owner can attribute holds
/// to the module that took them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RefId(pub u8);

impl RefId {
    /// Hold taken by the legacy MAC context.
    pub const LEGACY_MAC: RefId = RefId(1);
}

/// An object owned elsewhere whose lifetime is governed by named reference
/// counts.
pub trait RefCounted {
    /// Take a reference. Fails once the object has started its own teardown.
    fn try_get_ref(&self, id: RefId) -> Result<(), RefError>;

    /// Drop a reference taken with [`try_get_ref`](Self::try_get_ref).
    fn release_ref(&self, id: RefId);
}

/// The parent (psoc) a MAC context attaches to.
pub trait Psoc: RefCounted {
    /// Device-presence object that may be attached to an open context.
    type Pdev: RefCounted;
    /// View into the parent's MLME configuration.
    type MlmeCfg: Clone;

    /// Look up the MLME configuration object owned by this parent.
    fn mlme_cfg(&self) -> Option<Self::MlmeCfg>;
}

/// RAII reference held on a [`RefCounted`] object.
///
/// The reference is released exactly once: by [`release`](Self::release) or
/// when the `ObjRef` is dropped.
pub struct ObjRef<T: RefCounted> {
    obj: T,
    id: RefId,
}

impl<T: RefCounted> ObjRef<T> {
    /// Take a reference named `id` on `obj`.
    pub fn acquire(obj: T, id: RefId) -> Result<Self, RefError> {
        obj.try_get_ref(id)?;
        trace!("ref {} acquired", id.0);
        Ok(Self { obj, id })
    }

    /// The name the reference was taken under.
    pub fn id(&self) -> RefId {
        self.id
    }

    /// Release the reference now.
    pub fn release(self) {
        drop(self)
    }
}

impl<T: RefCounted> Deref for ObjRef<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.obj
    }
}

impl<T: RefCounted> Drop for ObjRef<T> {
    fn drop(&mut self) {
        self.obj.release_ref(self.id);
        trace!("ref {} released", self.id.0);
    }
}
