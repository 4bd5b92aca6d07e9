/// Comparison key for display titles: trimmed and case-folded.
///
/// Two titles with the same key render identically to a visitor, which is what the
/// breadcrumb collapse cares about.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TitleKey(String);

impl TitleKey {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_folds_case() {
        assert_eq!(TitleKey::new("  Water Pumps "), TitleKey::new("water pumps"));
        assert_ne!(TitleKey::new("Pumps"), TitleKey::new("Pump"));
    }

    #[test]
    fn folds_non_ascii() {
        assert_eq!(TitleKey::new("ÉCLAIRAGE"), TitleKey::new("éclairage"));
    }
}
