//! CSS variable set merging.
//!
//! Fragment keys overwrite existing ones in place; new keys and new modes are
//! appended in the order the fragment declares them.

use crate::registry::item::{CssVars, VariableSet};

/// Merge one mode's variables.
pub fn merge_variable_set(existing: &VariableSet, fragment: &VariableSet) -> VariableSet {
    let mut result = existing.clone();
    for (name, value) in fragment {
        result.insert(name.clone(), value.clone());
    }
    result
}

/// Merge variable sets for every mode.
pub fn merge_css_vars(existing: &CssVars, fragment: &CssVars) -> CssVars {
    let mut result = existing.clone();
    for (mode, vars) in fragment {
        let merged = match result.get(mode) {
            Some(current) => merge_variable_set(current, vars),
            None => vars.clone(),
        };
        result.insert(mode.clone(), merged);
    }
    result
}
