//! Utility modules for the EPI forms renderer
//!
//! This module contains date formatting and file naming helpers
//! shared by the document templates.

pub mod dates;
pub mod file_name;

// Re-export commonly used helpers
pub use dates::*;
pub use file_name::*;
