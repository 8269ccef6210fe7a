//! Render options, loadable from YAML.
//!
//! ```yaml
//! indent: "  "
//! chorus-label: "Refrain:"
//! chorus-start-markers: ["{soc}", "{start_of_chorus}", "[chorus]"]
//! ```
//!
//! Every field is optional; [`FormatOptions::default`] reproduces the
//! standard layout.

use serde::Deserialize;

use crate::error::ChordError;

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct FormatOptions {
    /// Prefix for chorus lines and for the chorus label
    pub indent: String,
    pub chorus_label: String,
    pub coda_label: String,
    /// Line prefixes that open a chorus (matched case-insensitively)
    pub chorus_start_markers: Vec<String>,
    /// Line prefixes that close a chorus (matched case-insensitively)
    pub chorus_end_markers: Vec<String>,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indent: "     ".to_string(),
            chorus_label: "Chorus:".to_string(),
            coda_label: "Coda:".to_string(),
            chorus_start_markers: vec!["{soc}".to_string(), "{start_of_chorus}".to_string()],
            chorus_end_markers: vec!["{eoc}".to_string(), "{end_of_chorus}".to_string()],
        }
    }
}

impl FormatOptions {
    /// Parse options from a YAML document.
    pub fn from_yaml(content: &str) -> Result<Self, ChordError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| ChordError::Config(e.to_string()))
    }

    /// `lowered` must already be lowercase.
    pub(crate) fn opens_chorus(&self, lowered: &str) -> bool {
        has_marker(&self.chorus_start_markers, lowered)
    }

    /// `lowered` must already be lowercase.
    pub(crate) fn closes_chorus(&self, lowered: &str) -> bool {
        has_marker(&self.chorus_end_markers, lowered)
    }
}

fn has_marker(markers: &[String], lowered: &str) -> bool {
    markers
        .iter()
        .any(|m| !m.is_empty() && lowered.starts_with(&m.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(FormatOptions::from_yaml("").unwrap(), FormatOptions::default());
    }

    #[test]
    fn test_partial_yaml() {
        let options = FormatOptions::from_yaml("indent: \"  \"\ncoda-label: \"Outro:\"\n").unwrap();
        assert_eq!(options.indent, "  ");
        assert_eq!(options.coda_label, "Outro:");
        assert_eq!(options.chorus_label, "Chorus:");
    }

    #[test]
    fn test_markers_are_case_insensitive() {
        let options = FormatOptions::from_yaml("chorus-start-markers: [\"[Chorus]\"]").unwrap();
        assert!(options.opens_chorus("[chorus] here we go"));
        assert!(!options.opens_chorus("{soc}"));
        assert!(FormatOptions::default().closes_chorus("{end_of_chorus}"));
    }

    #[test]
    fn test_invalid_yaml() {
        let err = FormatOptions::from_yaml("indent: [1, 2").unwrap_err();
        assert!(matches!(err, ChordError::Config(_)));
        assert!(FormatOptions::from_yaml("colour: red").is_err());
    }
}
