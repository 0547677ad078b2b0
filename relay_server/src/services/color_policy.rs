//! Build status → attachment color.

/// Colors for FINALIZED builds, keyed by status.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorPolicy {
    pub aborted: String,
    pub failure: String,
    pub fixed: String,
    pub still_failing: String,
    pub success: String,
    pub default: String,
}

impl Default for ColorPolicy {
    fn default() -> Self {
        Self {
            aborted: "warning".to_string(),
            failure: "danger".to_string(),
            fixed: "#d5f5dc".to_string(),
            still_failing: "danger".to_string(),
            success: "good".to_string(),
            default: "#ffe094".to_string(),
        }
    }
}

impl ColorPolicy {
    /// Build from `COLOR_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset or empty keys keep the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let pick = |key: &str, fallback: String| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(fallback)
        };

        Self {
            aborted: pick("COLOR_ABORTED", defaults.aborted),
            failure: pick("COLOR_FAILURE", defaults.failure),
            fixed: pick("COLOR_FIXED", defaults.fixed),
            still_failing: pick("COLOR_STILL_FAILING", defaults.still_failing),
            success: pick("COLOR_SUCCESS", defaults.success),
            default: pick("COLOR_DEFAULT", defaults.default),
        }
    }

    pub fn color_for(&self, status: Option<&str>) -> &str {
        match status {
            Some("ABORTED") => &self.aborted,
            Some("FAILURE") => &self.failure,
            Some("FIXED") => &self.fixed,
            Some("STILL FAILING") => &self.still_failing,
            Some("SUCCESS") => &self.success,
            _ => &self.default,
        }
    }
}
