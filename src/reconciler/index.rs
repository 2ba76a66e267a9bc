//! Aggregating index module
//!
//! The index imports every present artifact and re-exports them under the
//! namespace object, so usage sites can `import { AIC } from './aiscript'`.

use anyhow::{Context, Result};
use std::path::Path;

/// One import line in the index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub component_name: String,
    /// Artifact file name, e.g. `Button.tsx`
    pub file_name: String,
}

/// Render the index source. Output depends only on the inputs.
pub fn render_index(namespace: &str, entries: &[IndexEntry]) -> String {
    let mut content = String::new();

    for entry in entries {
        content.push_str(&format!(
            "import {} from './{}';\n",
            entry.component_name, entry.file_name
        ));
    }

    if !entries.is_empty() {
        content.push('\n');
    }

    content.push_str(&format!("export const {} = {{\n", namespace));
    for entry in entries {
        content.push_str(&format!("  {},\n", entry.component_name));
    }
    content.push_str("};\n");

    content
}

/// Replace the index file as a whole: write a sibling temp file, then rename
pub async fn write_index(path: &Path, content: &str) -> Result<()> {
    let temp_path = path.with_extension("tmp");

    tokio::fs::write(&temp_path, content)
        .await
        .with_context(|| format!("Failed to write {}", temp_path.display()))?;
    tokio::fs::rename(&temp_path, path)
        .await
        .with_context(|| format!("Failed to replace {}", path.display()))?;

    Ok(())
}
