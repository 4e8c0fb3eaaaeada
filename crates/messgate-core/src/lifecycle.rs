//! Token lifecycle classification for stored status strings.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic lifecycle state of an admission token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TokenStatus {
    /// Issued and not yet scanned.
    Unused,
    /// Admitted once; cannot be reused.
    Used,
    /// Slot or event window has passed.
    Expired,
    /// Anything the classifier does not recognize.
    Unknown,
}

/// How a status should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Good to go.
    Positive,
    /// Needs attention.
    Caution,
    /// Refused or broken.
    Negative,
    /// No judgement.
    Neutral,
}

/// Maps a raw status label to a lifecycle state, case-insensitively.
pub fn classify(raw: &str) -> TokenStatus {
    let label = raw.trim();
    if label.eq_ignore_ascii_case("USED") {
        TokenStatus::Used
    } else if label.eq_ignore_ascii_case("EXPIRED") {
        TokenStatus::Expired
    } else if label.eq_ignore_ascii_case("UNUSED") {
        TokenStatus::Unused
    } else {
        TokenStatus::Unknown
    }
}

impl TokenStatus {
    /// Rendering severity.
    pub fn severity(self) -> Severity {
        match self {
            TokenStatus::Unused => Severity::Positive,
            TokenStatus::Used => Severity::Caution,
            TokenStatus::Expired => Severity::Negative,
            TokenStatus::Unknown => Severity::Neutral,
        }
    }

    /// Canonical upper-case label.
    pub fn label(self) -> &'static str {
        match self {
            TokenStatus::Unused => "UNUSED",
            TokenStatus::Used => "USED",
            TokenStatus::Expired => "EXPIRED",
            TokenStatus::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for TokenStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Status chip contents for a raw status string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusBadge {
    /// Classified status.
    pub status: TokenStatus,
    /// Severity of `status`.
    pub severity: Severity,
    /// Text to show; unknown values keep their raw (upper-cased) text.
    pub label: String,
}

impl StatusBadge {
    /// Builds the badge for a status string as reported by the service.
    pub fn for_raw(raw: &str) -> Self {
        let status = classify(raw);
        let label = match status {
            TokenStatus::Unknown => {
                let shown = raw.trim().to_uppercase();
                if shown.is_empty() {
                    "—".to_string()
                } else {
                    shown
                }
            }
            known => known.label().to_string(),
        };
        Self {
            status,
            severity: status.severity(),
            label,
        }
    }
}
