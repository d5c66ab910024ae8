//! Line classifier: decides whether a line on the child's stdout is a protocol
//! message (forward) or console log noise (drop).
//!
//! The rule is a heuristic and is kept deliberately loose. A line that parses
//! as JSON always passes. A line that does not parse still passes unless it is
//! blank or begins with a known severity prefix, since it may be one fragment
//! of a pretty-printed message. A log line that happens to be valid JSON, or
//! uses a prefix outside the configured set, will be forwarded.

/// Severity prefixes written by the .NET console logger.
pub const DEFAULT_SEVERITY_PREFIXES: [&str; 6] =
    ["info:", "warn:", "error:", "dbug:", "fail:", "crit:"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineClassifier {
    prefixes: Vec<String>,
}

impl LineClassifier {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// Returns `true` when `line` should be forwarded.
    ///
    /// `line` must not include its trailing newline.
    pub fn classify(&self, line: &str) -> bool {
        if serde_json::from_str::<serde_json::Value>(line).is_ok() {
            return true;
        }

        !line.trim().is_empty() && !self.has_severity_prefix(line)
    }

    fn has_severity_prefix(&self, line: &str) -> bool {
        self.prefixes.iter().any(|p| line.starts_with(p.as_str()))
    }
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_SEVERITY_PREFIXES)
    }
}

/// Classifies `line` against [`DEFAULT_SEVERITY_PREFIXES`].
pub fn is_protocol_line(line: &str) -> bool {
    LineClassifier::default().classify(line)
}
