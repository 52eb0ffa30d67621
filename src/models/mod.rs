//! Models module for the EPI forms renderer
//!
//! This module contains the input records the document templates are
//! rendered from.

pub mod delivery;
pub mod program;
pub mod serde_helpers;
pub mod signature;

// Re-export commonly used types
pub use delivery::*;
pub use program::RiskProgramRecord;
pub use signature::{RasterImage, SignatureError, SignatureImage};
