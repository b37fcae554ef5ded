pub mod bitfield;
pub mod evaluator;
pub mod scanhash;
pub mod semiresult;
pub mod sha256;
pub mod strategy;
pub mod target;

pub use bitfield::{combine_lane, select_lane, LockMap, LOCK_8, UNLOCK_8};
pub use evaluator::{evaluate, NonceLookup};
pub use scanhash::{scanhash, RestartHandle, ScanState};
pub use semiresult::{SemiResult, SemiResultStatus, SemiResultStore, SEMI_RESULT_CAPACITY};
pub use sha256::{transform, State, IV, K};
pub use strategy::{DownStrategy, UpStrategy, DOWN_STRATEGIES, UP_STRATEGIES};
pub use target::meets_target;
