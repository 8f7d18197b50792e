//! Pure merges of item configuration fragments.
//!
//! - Framework config fragments in [`framework`]
//! - CSS variable sets in [`variables`]
//!
//! Neither module touches the filesystem; see [`crate::install`] for writing
//! merged results into a project.

pub mod framework;
pub mod variables;

pub use framework::{merge_framework_config, merge_into};
pub use variables::{merge_css_vars, merge_variable_set};
