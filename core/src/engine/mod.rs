pub mod commit;
pub mod patch;
pub mod round;

pub use commit::commit;
pub use patch::{patch, PatchReport};
pub use round::{process_round, Proposal};
