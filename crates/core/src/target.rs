//! The 256-bit target comparator.
//!
//! The source computes this via a word-order reversal (`swap256_omp`) and a
//! per-word `htobe32`/`htole32` asymmetric comparison (`fulltest_omp`) that
//! only yields a correct big-endian compare on a little-endian host. Both
//! `hash` and `target` are defined as plain 256-bit big-endian integers in
//! 32 bytes, and the required behavior is stated directly as an
//! equivalence: `meets_target(hash, target)` iff the big-endian integers
//! satisfy `hash <= target`. This implements that equivalence directly as
//! a byte-lexicographic comparison, which is exactly big-endian integer
//! comparison and carries no host-endianness assumption.

/// Returns true iff `hash`, read as a 256-bit big-endian integer, is less
/// than or equal to `target` read the same way.
pub fn meets_target(hash: &[u8; 32], target: &[u8; 32]) -> bool {
    hash <= target
}
