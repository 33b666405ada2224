//! Interactive selection from a list of options.

use crate::errors::ArkResult;
use inquire::Select;

/// Presents an ordered list of options and returns the index the user picked.
pub trait Chooser {
    /// ## Takes
    /// - `prompt` - The question shown above the list.
    /// - `options` - The options, in display order.
    /// - `default` - The index the cursor starts on.
    ///
    /// ## Returns
    /// - `Ok(usize)` - The index of the chosen option within `options`.
    /// - `Err(ArkError::Cancelled)` - The user backed out.
    fn choose(&self, prompt: &str, options: &[String], default: usize) -> ArkResult<usize>;
}

/// [Chooser] rendered in the terminal with [inquire].
#[derive(Debug, Default, Clone, Copy)]
pub struct InquireChooser;

impl Chooser for InquireChooser {
    fn choose(&self, prompt: &str, options: &[String], default: usize) -> ArkResult<usize> {
        let choice = Select::new(prompt, options.to_vec())
            .with_starting_cursor(default)
            .raw_prompt()?;
        Ok(choice.index)
    }
}
