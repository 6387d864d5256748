//! Checker switches, read from the `[checker]` table of `tyconform.toml`.

use serde::Deserialize;

/// Options controlling which optional checks run.
///
/// ```
/// use tyconform_check::CheckOptions;
///
/// let options = CheckOptions::default();
/// assert!(options.excess_property_checks);
/// assert!(options.strict_null_checks);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckOptions {
    /// Report `UnknownOption` for object literal keys the target type does
    /// not declare.
    pub excess_property_checks: bool,
    /// Report `PossiblyUndefined` for member access on nullable values.
    pub strict_null_checks: bool,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            excess_property_checks: true,
            strict_null_checks: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_table_keeps_defaults() {
        let options: CheckOptions = toml::from_str("strict_null_checks = false").unwrap();
        assert!(options.excess_property_checks);
        assert!(!options.strict_null_checks);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result: Result<CheckOptions, _> = toml::from_str("strict = true");
        assert!(result.is_err());
    }
}
