use std::fmt;
use std::path::Path;

/// Content markers that flag a file as TypeScript regardless of extension
const TYPESCRIPT_MARKERS: &[&str] = &["typescript", "lang=\"ts\"", "lang='ts'"];

/// Extensions an artifact can be written with
pub const ARTIFACT_EXTENSIONS: &[&str] = &["tsx", "jsx", "vue"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framework {
    React,
    Vue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    TypeScript,
    JavaScript,
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Framework::React => write!(f, "React"),
            Framework::Vue => write!(f, "Vue"),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::TypeScript => write!(f, "TypeScript"),
            Language::JavaScript => write!(f, "JavaScript"),
        }
    }
}

/// Framework and typing discipline an artifact must be written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    pub framework: Framework,
    pub language: Language,
}

impl Dialect {
    /// Artifact file extension, without the leading dot
    pub fn output_extension(&self) -> &'static str {
        match (self.framework, self.language) {
            (Framework::Vue, _) => "vue",
            (Framework::React, Language::TypeScript) => "tsx",
            (Framework::React, Language::JavaScript) => "jsx",
        }
    }

    pub fn is_typescript(&self) -> bool {
        self.language == Language::TypeScript
    }

    pub fn is_vue(&self) -> bool {
        self.framework == Framework::Vue
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.language, self.framework)
    }
}

/// Classify a usage site into the dialect its artifact should use.
///
/// `extension` is taken without the leading dot. The TypeScript check is a
/// heuristic: any extension containing `ts` or any content mentioning a
/// TypeScript marker counts.
pub fn detect_dialect(extension: &str, content: &str) -> Dialect {
    let extension = extension.trim_start_matches('.').to_ascii_lowercase();

    let framework = if extension == "vue" {
        Framework::Vue
    } else {
        Framework::React
    };

    let is_typescript =
        extension.contains("ts") || TYPESCRIPT_MARKERS.iter().any(|m| content.contains(m));

    let language = if is_typescript {
        Language::TypeScript
    } else {
        Language::JavaScript
    };

    Dialect {
        framework,
        language,
    }
}

/// Convenience wrapper taking the usage site's path
pub fn detect_dialect_for_path(path: &Path, content: &str) -> Dialect {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    detect_dialect(extension, content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vue_file_is_vue() {
        let dialect = detect_dialect("vue", "<template><AIC.Card /></template>");
        assert_eq!(dialect.framework, Framework::Vue);
        assert_eq!(dialect.language, Language::JavaScript);
        assert_eq!(dialect.output_extension(), "vue");
    }

    #[test]
    fn test_vue_with_typescript_script_block() {
        let dialect = detect_dialect("vue", r#"<script setup lang="ts">"#);
        assert_eq!(dialect.language, Language::TypeScript);
        assert_eq!(dialect.output_extension(), "vue");
    }

    #[test]
    fn test_tsx_and_ts_are_typescript_react() {
        for ext in ["tsx", "ts", ".ts", "mts"] {
            let dialect = detect_dialect(ext, "");
            assert_eq!(dialect.framework, Framework::React, "{}", ext);
            assert_eq!(dialect.output_extension(), "tsx", "{}", ext);
        }
    }

    #[test]
    fn test_plain_javascript() {
        let dialect = detect_dialect("jsx", "export default () => <AIC.Button />");
        assert_eq!(dialect.language, Language::JavaScript);
        assert_eq!(dialect.output_extension(), "jsx");
    }

    #[test]
    fn test_content_marker_promotes_javascript() {
        let dialect = detect_dialect("js", "// migrating this file to typescript soon");
        assert_eq!(dialect.output_extension(), "tsx");
    }

    #[test]
    fn test_detection_is_deterministic() {
        let content = "import React from 'react';\n<AIC.Modal open />";
        let first = detect_dialect("jsx", content);
        for _ in 0..10 {
            assert_eq!(detect_dialect("jsx", content), first);
        }
    }

    #[test]
    fn test_detect_for_path_without_extension() {
        let dialect = detect_dialect_for_path(Path::new("Makefile"), "");
        assert_eq!(dialect.output_extension(), "jsx");
    }

    #[test]
    fn test_display() {
        let dialect = detect_dialect("tsx", "");
        assert_eq!(dialect.to_string(), "TypeScript React");
    }
}
