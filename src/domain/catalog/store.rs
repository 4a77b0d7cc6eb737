//! Parsed store configuration: menu, settings, and price table.
//!
//! These structs mirror the store YAML file one-to-one. The dialogue core
//! never reads storage itself; the catalog loader adapter deserializes the
//! file and hands these structures in.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::domain::order::Size;

/// Complete store file: catalog, settings, and prices.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreFile {
    pub catalog: StoreCatalog,
    #[serde(default)]
    pub settings: StoreSettings,
    #[serde(default)]
    pub prices: PriceTable,
}

/// Hierarchical menu configuration for one store.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreCatalog {
    /// Pizzas grouped by sub-category (e.g. "classic", "specialty").
    /// BTreeMap keeps group order deterministic across builds.
    #[serde(default)]
    pub pizzas: BTreeMap<String, Vec<RawCatalogItem>>,
    #[serde(default)]
    pub sides: Vec<RawCatalogItem>,
    #[serde(default)]
    pub beverages: Vec<RawCatalogItem>,
    #[serde(default)]
    pub pastas: Vec<RawCatalogItem>,
    #[serde(default)]
    pub salads: Vec<RawCatalogItem>,
    #[serde(default)]
    pub wings: Vec<RawWingItem>,
}

impl StoreCatalog {
    /// Returns true if no category contains any item.
    pub fn is_empty(&self) -> bool {
        self.pizzas.values().all(|group| group.is_empty())
            && self.sides.is_empty()
            && self.beverages.is_empty()
            && self.pastas.is_empty()
            && self.salads.is_empty()
            && self.wings.is_empty()
    }
}

/// One orderable menu item as configured in the store file.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCatalogItem {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub requires_spice: bool,
    #[serde(default)]
    pub is_vegetarian: bool,
}

/// A wings menu item with its enumerated type and flavor values.
#[derive(Debug, Clone, Deserialize)]
pub struct RawWingItem {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default = "default_wing_types")]
    pub types: Vec<String>,
    #[serde(default)]
    pub flavors: Vec<String>,
}

fn default_wing_types() -> Vec<String> {
    vec!["boneless".to_string(), "traditional".to_string()]
}

/// Store-level settings passed into the dialogue core.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    /// Pizza sizes this store sells. Defaults to Small/Medium/Large.
    #[serde(default = "default_sizes")]
    pub supported_sizes: Vec<Size>,
    /// Sales tax rate as a fraction (0.08 = 8%). 0 when unset.
    #[serde(default)]
    pub tax_rate: f64,
    /// Opening line for a new conversation.
    #[serde(default = "default_greeting")]
    pub greeting: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            supported_sizes: default_sizes(),
            tax_rate: 0.0,
            greeting: default_greeting(),
        }
    }
}

impl StoreSettings {
    /// Returns true if the store sells the given size.
    pub fn supports_size(&self, size: Size) -> bool {
        self.supported_sizes.contains(&size)
    }
}

fn default_sizes() -> Vec<Size> {
    vec![Size::Small, Size::Medium, Size::Large]
}

fn default_greeting() -> String {
    "Welcome! What can I get started for you?".to_string()
}

/// Per-item unit prices, keyed by normalized item name.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct PriceTable {
    pub items: HashMap<String, PriceEntry>,
}

impl PriceTable {
    /// Looks up the price entry for a normalized item name.
    pub fn entry(&self, normalized_name: &str) -> Option<&PriceEntry> {
        self.items.get(normalized_name)
    }
}

/// Unit price for one item: per-size for pizzas, flat otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceEntry {
    /// Dollars per size (pizzas).
    PerSize(HashMap<Size, f64>),
    /// Flat dollar price (sides, beverages, pastas, salads, wings).
    Flat(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_catalog_is_detected() {
        assert!(StoreCatalog::default().is_empty());
    }

    #[test]
    fn catalog_with_one_side_is_not_empty() {
        let mut catalog = StoreCatalog::default();
        catalog.sides.push(RawCatalogItem {
            name: "Garlic Bread".to_string(),
            aliases: vec![],
            requires_spice: false,
            is_vegetarian: false,
        });
        assert!(!catalog.is_empty());
    }

    #[test]
    fn settings_default_to_all_three_sizes() {
        let settings = StoreSettings::default();
        assert!(settings.supports_size(Size::Small));
        assert!(settings.supports_size(Size::Medium));
        assert!(settings.supports_size(Size::Large));
        assert_eq!(settings.tax_rate, 0.0);
    }

    #[test]
    fn store_file_parses_from_yaml() {
        let yaml = r#"
catalog:
  pizzas:
    classic:
      - name: Pepperoni Pizza
        aliases: [pepperoni]
        requires_spice: true
  beverages:
    - name: Coke
      aliases: [cola, coca cola]
  wings:
    - name: Chicken Wings
      aliases: [wings]
      flavors: [bbq, buffalo]
settings:
  supported_sizes: [medium, large]
  tax_rate: 0.08
prices:
  pepperoni pizza:
    medium: 12.99
    large: 15.99
  coke: 2.49
"#;
        let store: StoreFile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(store.catalog.pizzas["classic"].len(), 1);
        assert!(store.catalog.pizzas["classic"][0].requires_spice);
        assert_eq!(store.catalog.wings[0].types.len(), 2);
        assert_eq!(store.settings.supported_sizes, vec![Size::Medium, Size::Large]);
        assert!(matches!(
            store.prices.entry("coke"),
            Some(PriceEntry::Flat(price)) if (*price - 2.49).abs() < f64::EPSILON
        ));
    }
}
