use core::fmt;

/// Errors returned by [`MacLifecycle::open`](crate::MacLifecycle::open),
/// [`start`](crate::MacLifecycle::start) and
/// [`close`](crate::MacLifecycle::close).
///
/// `E` is the protocol engine's error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MacError<E: fmt::Debug> {
    /// No live context, or the lifecycle state does not accept the call.
    InvalidArgument,
    /// The context store could not provide a block.
    OutOfMemory,
    /// The parent refused the reference (it is being torn down).
    ParentUnavailable,
    /// The parent does not own an MLME configuration object.
    ConfigObjectMissing,
    /// The configuration store failed to initialize.
    ConfigInitFailure,
    /// The protocol engine failed to open.
    EngineOpenFailure(E),
    /// The protocol engine failed to start.
    EngineStartFailure(E),
}

impl<E: fmt::Debug> fmt::Display for MacError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MacError::InvalidArgument => write!(f, "invalid argument"),
            MacError::OutOfMemory => {
                write!(f, "failed to allocate the MAC context")
            }
            MacError::ParentUnavailable => {
                write!(f, "parent object reference unavailable")
            }
            MacError::ConfigObjectMissing => {
                write!(f, "MLME configuration object missing")
            }
            MacError::ConfigInitFailure => {
                write!(f, "configuration store init failed")
            }
            MacError::EngineOpenFailure(e) => {
                write!(f, "protocol engine open failed: {:?}", e)
            }
            MacError::EngineStartFailure(e) => {
                write!(f, "protocol engine start failed: {:?}", e)
            }
        }
    }
}

/// Failure reported by a [`RefCounted`](crate::RefCounted) object that
/// refuses a new reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RefError;

impl<E: fmt::Debug> From<RefError> for MacError<E> {
    fn from(_: RefError) -> Self {
        MacError::ParentUnavailable
    }
}

/// The context store could not provide a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AllocError;

impl<E: fmt::Debug> From<AllocError> for MacError<E> {
    fn from(_: AllocError) -> Self {
        MacError::OutOfMemory
    }
}
