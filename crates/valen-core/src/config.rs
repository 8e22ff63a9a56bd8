//! Per-domain decode and formatting configuration.

/// How a raw `0` is decoded when the domain declares no zero-valued constant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ZeroPolicy {
    /// `0` decodes to an empty combination (no contributing constants).
    #[default]
    EmptySet,
    /// `0` is a decode failure.
    Reject,
}

/// Configuration attached to an [`EnumDomain`](crate::EnumDomain).
///
/// Set once when the domain is built; immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DomainConfig {
    /// Separator placed between constant names when a handle decodes to
    /// more than one constant.
    ///
    /// Default: `"|"`, giving `"Apple|Pear"`.
    pub separator: String,

    /// Treatment of a raw `0` with no zero-valued constant declared.
    ///
    /// Default: [`ZeroPolicy::EmptySet`].
    pub zero: ZeroPolicy,
}

impl DomainConfig {
    /// Default combination separator.
    pub const DEFAULT_SEPARATOR: &'static str = "|";

    /// Create a config with default values.
    pub fn new() -> Self {
        Self {
            separator: Self::DEFAULT_SEPARATOR.to_string(),
            zero: ZeroPolicy::default(),
        }
    }

    /// Replace the combination separator.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Replace the zero policy.
    pub fn with_zero_policy(mut self, zero: ZeroPolicy) -> Self {
        self.zero = zero;
        self
    }
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = DomainConfig::default();
        assert_eq!(config.separator, "|");
        assert_eq!(config.zero, ZeroPolicy::EmptySet);
    }

    #[test]
    fn setters_replace_values() {
        let config = DomainConfig::new()
            .with_separator(" + ")
            .with_zero_policy(ZeroPolicy::Reject);
        assert_eq!(config.separator, " + ");
        assert_eq!(config.zero, ZeroPolicy::Reject);
    }
}
