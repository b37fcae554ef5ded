//! Append-only bounded buffer of candidate "semi-results" — digests whose
//! trailing word is zero, a cheap proxy for the full target check used as
//! the hot-path filter (the full §4.C comparison is applied downstream,
//! not in the scan loop).

/// Capacity of the semi-result buffer. Fixed per the source
/// (`MAX_SEMI_RESULT_BUFF_SIZE`).
pub const SEMI_RESULT_CAPACITY: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemiResultStatus {
    None,
    Success,
    Fail,
    Found,
}

#[derive(Debug, Clone, Copy)]
pub struct SemiResult {
    pub nonce: u32,
    pub status: SemiResultStatus,
    pub hash: [u8; 32],
    pub target: [u8; 32],
}

/// Fixed-capacity, append-only sequence of semi-results for one scan.
#[derive(Default)]
pub struct SemiResultStore {
    entries: Vec<SemiResult>,
}

impl SemiResultStore {
    pub fn new() -> Self {
        Self {
            entries: Vec::with_capacity(SEMI_RESULT_CAPACITY),
        }
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all entries without handing them to a collaborator.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Append a found semi-result. If the store is already at capacity,
    /// `on_overflow` is invoked first with direct access to the backing
    /// storage; its job is to drain (or otherwise make room in) the
    /// buffer. The entry is then appended regardless of what the hook did,
    /// matching the source's `addSemiResult`, which writes into slot
    /// `foundResults` unconditionally after the overflow check.
    pub fn push(
        &mut self,
        nonce: u32,
        hash: [u8; 32],
        target: [u8; 32],
        mut on_overflow: impl FnMut(&mut Vec<SemiResult>),
    ) {
        if self.entries.len() >= SEMI_RESULT_CAPACITY {
            on_overflow(&mut self.entries);
        }
        self.entries.push(SemiResult {
            nonce,
            status: SemiResultStatus::Found,
            hash,
            target,
        });
    }

    /// Swap-remove entry `r` with the last entry; order is not meaningful.
    pub fn remove_at(&mut self, r: usize) {
        self.entries.swap_remove(r);
    }

    /// External handoff of all entries; the store is empty afterwards.
    pub fn flush(&mut self) -> Vec<SemiResult> {
        std::mem::take(&mut self.entries)
    }
}
