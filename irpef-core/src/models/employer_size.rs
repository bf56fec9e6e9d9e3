use serde::{Deserialize, Serialize};

/// Employer headcount class, which selects the employee contribution rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployerSize {
    /// Fewer than 15 employees.
    #[default]
    Small,
    /// 15 employees or more.
    Large,
}

impl EmployerSize {
    pub fn all() -> &'static [EmployerSize] {
        &[EmployerSize::Small, EmployerSize::Large]
    }

    pub fn from_is_large(is_large: bool) -> Self {
        if is_large { Self::Large } else { Self::Small }
    }

    pub fn is_large(&self) -> bool {
        matches!(self, Self::Large)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Large => "large",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Small => "< 15 dipendenti",
            Self::Large => "≥ 15 dipendenti",
        }
    }

    /// Accepts the short codes (`small`, `large`), the headcount forms
    /// (`<15`, `>=15`, `≥15`) and the boolean spellings used in CSV files.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        match normalized.as_str() {
            "small" | "<15" | "false" | "no" | "0" => Some(Self::Small),
            "large" | ">=15" | "≥15" | "true" | "yes" | "1" => Some(Self::Large),
            _ => None,
        }
    }
}

impl std::fmt::Display for EmployerSize {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_accepts_codes_and_headcount_forms() {
        assert_eq!(EmployerSize::parse("small"), Some(EmployerSize::Small));
        assert_eq!(EmployerSize::parse("LARGE"), Some(EmployerSize::Large));
        assert_eq!(EmployerSize::parse("< 15"), Some(EmployerSize::Small));
        assert_eq!(EmployerSize::parse(">= 15"), Some(EmployerSize::Large));
        assert_eq!(EmployerSize::parse("≥ 15"), Some(EmployerSize::Large));
        assert_eq!(EmployerSize::parse("true"), Some(EmployerSize::Large));
        assert_eq!(EmployerSize::parse("medium"), None);
    }

    #[test]
    fn all_codes_parse_back() {
        for size in EmployerSize::all() {
            assert_eq!(EmployerSize::parse(size.as_str()), Some(*size));
        }
    }

    #[test]
    fn from_is_large_maps_flag() {
        assert_eq!(EmployerSize::from_is_large(true), EmployerSize::Large);
        assert_eq!(EmployerSize::from_is_large(false), EmployerSize::Small);
        assert!(EmployerSize::Large.is_large());
        assert!(!EmployerSize::Small.is_large());
    }
}
