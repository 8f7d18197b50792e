//! Schema command implementation.
//!
//! The `kitbox schema` command prints the JSON schema registry items must
//! follow.

use crate::error::{KitboxError, Result};
use crate::registry::RegistryItem;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The schema command implementation.
pub struct SchemaCommand;

impl Command for SchemaCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let schema = schemars::schema_for!(RegistryItem);
        let json =
            serde_json::to_string_pretty(&schema).map_err(|e| KitboxError::Other(e.into()))?;
        ui.data(&json);
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;

    #[test]
    fn prints_item_schema() {
        let mut ui = MockUI::new();
        SchemaCommand.execute(&mut ui).unwrap();

        let schema: serde_json::Value = serde_json::from_str(ui.data_output()).unwrap();
        assert_eq!(schema["title"], "RegistryItem");
        assert!(schema["properties"]["name"].is_object());
        assert!(schema["properties"]["cssVars"].is_object());
    }
}
