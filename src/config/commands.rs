//! The `[commands]` table of `bfm.toml`.
//!
//! Every command is a template for `sh -c`. `{path}` is replaced by the single quoted
//! absolute path of the entry, see [expand_template](crate::utils::expand_template).

use serde::Deserialize;

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Commands {
    editor: String,
    file_preview: String,
    folder_preview: String,
}

impl Default for Commands {
    fn default() -> Self {
        Commands {
            editor: "${EDITOR:-vi} {path}".to_string(),
            file_preview: "cat -- {path}".to_string(),
            folder_preview: "ls -la -- {path}".to_string(),
        }
    }
}

impl Commands {
    #[inline]
    pub fn editor(&self) -> &str {
        &self.editor
    }

    #[inline]
    pub fn file_preview(&self) -> &str {
        &self.file_preview
    }

    #[inline]
    pub fn folder_preview(&self) -> &str {
        &self.folder_preview
    }
}
