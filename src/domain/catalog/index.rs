//! Catalog Index - flattens the store menu into matchable entries.
//!
//! Each entry carries a normalized alias set and the slot requirements the
//! state machine needs (size for pizzas, spice when configured, declared
//! options for wings). Building the index is pure and deterministic; entry
//! order is stable within one build, and callers rely on list order for
//! tie-breaking (first matching entry wins).

use serde::{Deserialize, Serialize};

use crate::domain::order::ItemKind;

use super::store::{RawCatalogItem, RawWingItem, StoreCatalog};

/// Lower-cases, drops apostrophes, replaces other punctuation with spaces,
/// and collapses whitespace. Digits are preserved.
pub fn normalize(text: &str) -> String {
    let mut cleaned = String::with_capacity(text.len());
    for c in text.chars() {
        if c == '\'' || c == '\u{2019}' {
            continue;
        }
        if c.is_alphanumeric() {
            cleaned.extend(c.to_lowercase());
        } else {
            cleaned.push(' ');
        }
    }
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A declared option on a catalog entry (wings: type, flavor).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSpec {
    /// Option key, e.g. "type" or "flavor".
    pub name: String,
    /// Allowed values, normalized.
    pub values: Vec<String>,
}

/// One orderable item with its matching aliases and slot requirements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub kind: ItemKind,
    /// Display name as configured.
    pub name: String,
    /// Normalized match keys: {normalized name} ∪ {normalized aliases}.
    pub aliases: Vec<String>,
    pub requires_spice: bool,
    pub is_vegetarian: bool,
    /// Options that must be selected before the item is slot-complete.
    pub options: Vec<OptionSpec>,
}

impl CatalogEntry {
    /// Normalized form of the display name, used as the price-table key.
    pub fn normalized_name(&self) -> String {
        normalize(&self.name)
    }

    /// Returns true if any alias occurs as a substring of the normalized text.
    pub fn matches(&self, normalized_text: &str) -> bool {
        self.aliases.iter().any(|a| normalized_text.contains(a.as_str()))
    }

    fn from_raw(kind: ItemKind, raw: &RawCatalogItem) -> Self {
        Self {
            kind,
            name: raw.name.clone(),
            aliases: alias_set(&raw.name, &raw.aliases),
            // Spice is a pizza-only concept in the store schema.
            requires_spice: kind == ItemKind::Pizza && raw.requires_spice,
            is_vegetarian: kind == ItemKind::Pizza && raw.is_vegetarian,
            options: Vec::new(),
        }
    }

    fn from_wings(raw: &RawWingItem) -> Self {
        let mut options = Vec::new();
        if !raw.types.is_empty() {
            options.push(OptionSpec {
                name: "type".to_string(),
                values: raw.types.iter().map(|v| normalize(v)).collect(),
            });
        }
        if !raw.flavors.is_empty() {
            options.push(OptionSpec {
                name: "flavor".to_string(),
                values: raw.flavors.iter().map(|v| normalize(v)).collect(),
            });
        }
        Self {
            kind: ItemKind::Wings,
            name: raw.name.clone(),
            aliases: alias_set(&raw.name, &raw.aliases),
            requires_spice: false,
            is_vegetarian: false,
            options,
        }
    }
}

/// Builds {normalized name} ∪ {normalized aliases}, deduplicated, dropping
/// any alias that normalizes to the empty string.
fn alias_set(name: &str, aliases: &[String]) -> Vec<String> {
    let mut set = Vec::new();
    for candidate in std::iter::once(name.to_string()).chain(aliases.iter().cloned()) {
        let normalized = normalize(&candidate);
        if !normalized.is_empty() && !set.contains(&normalized) {
            set.push(normalized);
        }
    }
    set
}

/// Flattened, matchable view of a store's menu.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    entries: Vec<CatalogEntry>,
}

impl CatalogIndex {
    /// Flattens the hierarchical catalog into a uniform entry list.
    ///
    /// Pure and deterministic: pizza groups iterate in key order, then
    /// sides, beverages, pastas, salads, wings.
    pub fn build(catalog: &StoreCatalog) -> Self {
        let mut entries = Vec::new();
        for group in catalog.pizzas.values() {
            for raw in group {
                entries.push(CatalogEntry::from_raw(ItemKind::Pizza, raw));
            }
        }
        for raw in &catalog.sides {
            entries.push(CatalogEntry::from_raw(ItemKind::Side, raw));
        }
        for raw in &catalog.beverages {
            entries.push(CatalogEntry::from_raw(ItemKind::Beverage, raw));
        }
        for raw in &catalog.pastas {
            entries.push(CatalogEntry::from_raw(ItemKind::Pasta, raw));
        }
        for raw in &catalog.salads {
            entries.push(CatalogEntry::from_raw(ItemKind::Salad, raw));
        }
        for raw in &catalog.wings {
            entries.push(CatalogEntry::from_wings(raw));
        }
        Self { entries }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries of one kind, in index order.
    pub fn entries_of_kind(&self, kind: ItemKind) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter().filter(move |e| e.kind == kind)
    }

    /// Finds the entry backing a line item by display name.
    pub fn entry_for(&self, kind: ItemKind, name: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.kind == kind && e.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::store::StoreFile;

    fn sample_catalog() -> StoreCatalog {
        let yaml = r#"
catalog:
  pizzas:
    classic:
      - name: Pepperoni Pizza
        aliases: ["Pepperoni!", "pep pizza"]
        requires_spice: true
      - name: Margherita Pizza
        aliases: [margherita]
        is_vegetarian: true
  sides:
    - name: Garlic Bread
  beverages:
    - name: Coke
      aliases: [cola, "coca-cola"]
  wings:
    - name: Chicken Wings
      aliases: [wings]
      flavors: [BBQ, Buffalo]
"#;
        serde_yaml::from_str::<StoreFile>(yaml).unwrap().catalog
    }

    mod normalization {
        use super::*;

        #[test]
        fn lowercases_and_strips_punctuation() {
            assert_eq!(normalize("Pepperoni, PLEASE!"), "pepperoni please");
        }

        #[test]
        fn drops_apostrophes_without_splitting_words() {
            assert_eq!(normalize("that's all"), "thats all");
        }

        #[test]
        fn collapses_whitespace() {
            assert_eq!(normalize("  two   large\tpizzas "), "two large pizzas");
        }

        #[test]
        fn preserves_digits() {
            assert_eq!(normalize("2 Large Pizzas"), "2 large pizzas");
        }

        #[test]
        fn hyphens_become_spaces() {
            assert_eq!(normalize("coca-cola"), "coca cola");
        }
    }

    mod building {
        use super::*;

        #[test]
        fn flattens_all_categories() {
            let index = CatalogIndex::build(&sample_catalog());
            assert_eq!(index.entries().len(), 5);
            assert_eq!(index.entries_of_kind(ItemKind::Pizza).count(), 2);
            assert_eq!(index.entries_of_kind(ItemKind::Wings).count(), 1);
        }

        #[test]
        fn alias_set_includes_normalized_name_and_dedupes() {
            let index = CatalogIndex::build(&sample_catalog());
            let pep = index.entry_for(ItemKind::Pizza, "Pepperoni Pizza").unwrap();
            assert_eq!(
                pep.aliases,
                vec!["pepperoni pizza", "pepperoni", "pep pizza"]
            );
        }

        #[test]
        fn spice_requirement_survives_for_pizzas() {
            let index = CatalogIndex::build(&sample_catalog());
            assert!(index.entry_for(ItemKind::Pizza, "Pepperoni Pizza").unwrap().requires_spice);
            assert!(!index.entry_for(ItemKind::Pizza, "Margherita Pizza").unwrap().requires_spice);
        }

        #[test]
        fn wings_carry_type_and_flavor_options() {
            let index = CatalogIndex::build(&sample_catalog());
            let wings = index.entry_for(ItemKind::Wings, "Chicken Wings").unwrap();
            assert_eq!(wings.options.len(), 2);
            assert_eq!(wings.options[0].name, "type");
            assert_eq!(wings.options[0].values, vec!["boneless", "traditional"]);
            assert_eq!(wings.options[1].name, "flavor");
            assert_eq!(wings.options[1].values, vec!["bbq", "buffalo"]);
        }

        #[test]
        fn build_is_deterministic() {
            let catalog = sample_catalog();
            let first = CatalogIndex::build(&catalog);
            let second = CatalogIndex::build(&catalog);
            assert_eq!(first.entries(), second.entries());
        }
    }

    mod matching {
        use super::*;

        #[test]
        fn matches_on_any_alias_substring() {
            let index = CatalogIndex::build(&sample_catalog());
            let coke = index.entry_for(ItemKind::Beverage, "Coke").unwrap();
            assert!(coke.matches("a cola and fries"));
            assert!(coke.matches("one coca cola please"));
            assert!(!coke.matches("a sprite"));
        }
    }
}
