use anyhow::{Context, Result};
use regex::Regex;

/// Matcher for namespaced component references such as `AIC.DatePicker`
///
/// The namespace must start on a word boundary and the component name must
/// begin with an uppercase ASCII letter, followed by letters or digits.
#[derive(Debug, Clone)]
pub struct ReferencePattern {
    namespace: String,
    regex: Regex,
}

impl ReferencePattern {
    pub fn new(namespace: &str) -> Result<Self> {
        let pattern = format!(r"\b{}\.([A-Z][A-Za-z0-9]*)", regex::escape(namespace));
        let regex = Regex::new(&pattern).context("Failed to compile reference regex")?;

        Ok(Self {
            namespace: namespace.to_string(),
            regex,
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Component names referenced in `content`, left to right, duplicates included
    pub fn component_names<'a>(&'a self, content: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.regex
            .captures_iter(content)
            .filter_map(|cap| cap.get(1))
            .map(|m| m.as_str())
    }
}
