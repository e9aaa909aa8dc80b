//! Terminal rendering of the markdown produced by the core display types.
//!
//! Rich output goes through a termimad skin; `--no-color` prints the
//! markdown untouched so it can be piped or asserted on.

use std::{
    fmt::Display,
    io::{self, Write},
};

use anyhow::Result;
use termimad::{
    crossterm::style::{Color, Stylize},
    MadSkin,
};

/// Prints markdown either styled or as plain text.
pub struct TerminalRenderer {
    skin: Option<MadSkin>,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        Self {
            skin: rich_enabled.then(casebook_skin),
        }
    }

    pub fn is_rich(&self) -> bool {
        self.skin.is_some()
    }

    /// Renders anything whose `Display` output is markdown.
    pub fn render(&self, content: &impl Display) -> Result<()> {
        let markdown = content.to_string();
        let mut stdout = io::stdout().lock();

        let Some(skin) = &self.skin else {
            write!(stdout, "{markdown}")?;
            return Ok(stdout.flush()?);
        };

        for line in markdown.lines() {
            // Headers keep their hashes so step numbers stay readable.
            if line.starts_with('#') {
                writeln!(stdout, "{}", line.with(Color::Blue).bold())?;
            } else {
                writeln!(stdout, "{}", skin.inline(line))?;
            }
        }
        Ok(stdout.flush()?)
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

fn casebook_skin() -> MadSkin {
    let mut skin = MadSkin::default();
    skin.bold.set_fg(Color::Yellow);
    skin.italic.set_fg(Color::Magenta);
    skin.inline_code.set_bg(Color::AnsiValue(238));
    skin.code_block.set_bg(Color::AnsiValue(238));
    skin
}
