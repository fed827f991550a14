use heapless::Vec;

/// Number of teardown faults kept before further ones are only counted.
pub const FAULT_LOG_CAPACITY: usize = 8;

/// Teardown step whose failure was swallowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TeardownFault {
    EngineStop,
    EngineClose,
}

/// Record of sub-call failures that `stop` and `close` did not propagate.
#[derive(Debug, Default)]
pub struct FaultLog {
    faults: Vec<TeardownFault, FAULT_LOG_CAPACITY>,
    dropped: usize,
}

impl FaultLog {
    pub const fn new() -> Self {
        Self { faults: Vec::new(), dropped: 0 }
    }

    pub(crate) fn record(&mut self, fault: TeardownFault) {
        if self.faults.push(fault).is_err() {
            self.dropped += 1;
        }
    }

    /// Faults recorded so far, oldest first.
    pub fn faults(&self) -> &[TeardownFault] {
        &self.faults
    }

    /// Faults that did not fit in the log.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn is_empty(&self) -> bool {
        self.faults.is_empty() && self.dropped == 0
    }

    pub fn clear(&mut self) {
        self.faults.clear();
        self.dropped = 0;
    }
}
