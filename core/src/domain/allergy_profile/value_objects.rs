use std::collections::BTreeMap;

use crate::domain::allergy_profile::entities::Severity;

/// Allergen named directly by the caller of an analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplicitAllergen {
    pub name: String,
    pub severity: Option<Severity>,
}

impl ExplicitAllergen {
    pub fn new(name: impl Into<String>, severity: Option<Severity>) -> Self {
        Self {
            name: name.into(),
            severity,
        }
    }
}

/// The set of allergen names screened for in one request.
///
/// Names are trimmed and lower-cased on insertion; blank names are dropped since an
/// empty needle matches any text. Each name keeps the most severe severity seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectiveAllergens {
    entries: BTreeMap<String, Option<Severity>>,
}

impl EffectiveAllergens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, severity: Option<Severity>) {
        let name = name.trim().to_lowercase();
        if name.is_empty() {
            return;
        }

        let slot = self.entries.entry(name).or_insert(None);
        *slot = (*slot).max(severity);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn severity_of(&self, name: &str) -> Option<Severity> {
        self.entries.get(name).copied().flatten()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<Severity>)> {
        self.entries.iter().map(|(name, sev)| (name.as_str(), *sev))
    }
}

impl FromIterator<ExplicitAllergen> for EffectiveAllergens {
    fn from_iter<I: IntoIterator<Item = ExplicitAllergen>>(iter: I) -> Self {
        let mut allergens = Self::new();
        for allergen in iter {
            allergens.insert(&allergen.name, allergen.severity);
        }
        allergens
    }
}

impl<'a> FromIterator<&'a str> for EffectiveAllergens {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut allergens = Self::new();
        for name in iter {
            allergens.insert(name, None);
        }
        allergens
    }
}
