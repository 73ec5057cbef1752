use anyhow::{Context, Result};
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::ui::canvas::Palette;
use crate::ui::session::SessionOptions;
use crate::ui::table_renderer::DEFAULT_SEPARATOR;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub keybindings: KeybindingConfig,
    pub behavior: BehaviorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Character drawn between adjacent columns
    pub column_separator: char,

    /// Reserve the bottom line for the status line
    pub show_status_line: bool,

    /// Header line color, any name or `#rrggbb` ratatui understands
    pub header_color: String,

    /// Color of the column under the cursor
    pub selected_color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeybindingConfig {
    /// Whether to use vim-style keybindings (h/j/k/l, counts)
    pub vim_mode: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Rows moved by a half-page jump; half the window height when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_rows: Option<usize>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            column_separator: DEFAULT_SEPARATOR,
            show_status_line: true,
            header_color: "cyan".to_string(),
            selected_color: "red".to_string(),
        }
    }
}

impl Default for KeybindingConfig {
    fn default() -> Self {
        Self { vim_mode: true }
    }
}

impl Config {
    /// Load config from the default location, falling back to defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load config from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Get the default config file path
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("csv-pager").join("config.toml"))
    }

    /// Write the commented default file to `path`, creating parent directories
    pub fn write_default(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory {}", parent.display())
            })?;
        }
        fs::write(path, Self::create_default_with_comments())
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    /// Colors for the table renderer
    pub fn palette(&self) -> Result<Palette> {
        Ok(Palette {
            header: parse_color(&self.display.header_color)?,
            selected: parse_color(&self.display.selected_color)?,
        })
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            show_status_line: self.display.show_status_line,
            page_rows: self.behavior.page_rows,
        }
    }

    /// Create a default config file with comments
    pub fn create_default_with_comments() -> String {
        r##"# csv-pager configuration file
# Location: ~/.config/csv-pager/config.toml (Linux)
#           ~/Library/Application Support/csv-pager/config.toml (macOS)
#           %APPDATA%\csv-pager\config.toml (Windows)

[display]
# Character drawn between adjacent columns
column_separator = "|"

# Reserve the bottom line for row/column position and messages
show_status_line = true

# Colors: "black", "red", "green", "yellow", "blue", "magenta", "cyan",
# "gray", "white", the "light" variants, or "#rrggbb"
header_color = "cyan"
selected_color = "red"

[keybindings]
# Use vim-style keybindings (h/j/k/l, counts such as 10j)
vim_mode = true

[behavior]
# Rows moved by Ctrl-N/Ctrl-U; leave commented for half the window height
# page_rows = 20
"##
        .to_string()
    }
}

fn parse_color(name: &str) -> Result<Color> {
    Color::from_str(name).map_err(|_| anyhow::anyhow!("Unknown color '{}'", name))
}
