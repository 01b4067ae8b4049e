pub mod patch_applier;
pub use patch_applier::*;
