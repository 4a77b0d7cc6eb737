//! Line items and their slot-completion rules.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::catalog::CatalogEntry;

/// Menu category an item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Pizza,
    Side,
    Beverage,
    Pasta,
    Salad,
    Wings,
}

impl ItemKind {
    /// Lowercase label used in menus and prompts.
    pub fn label(&self) -> &'static str {
        match self {
            ItemKind::Pizza => "pizza",
            ItemKind::Side => "side",
            ItemKind::Beverage => "beverage",
            ItemKind::Pasta => "pasta",
            ItemKind::Salad => "salad",
            ItemKind::Wings => "wings",
        }
    }

    /// Plural label for category listings.
    pub fn plural_label(&self) -> &'static str {
        match self {
            ItemKind::Pizza => "pizzas",
            ItemKind::Side => "sides",
            ItemKind::Beverage => "beverages",
            ItemKind::Pasta => "pastas",
            ItemKind::Salad => "salads",
            ItemKind::Wings => "wings",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Pizza size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Size {
    Small,
    Medium,
    Large,
}

impl Size {
    pub fn label(&self) -> &'static str {
        match self {
            Size::Small => "Small",
            Size::Medium => "Medium",
            Size::Large => "Large",
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Spice level for pizzas that require one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpiceLevel {
    Mild,
    Medium,
    Hot,
}

impl SpiceLevel {
    pub fn label(&self) -> &'static str {
        match self {
            SpiceLevel::Mild => "mild",
            SpiceLevel::Medium => "medium",
            SpiceLevel::Hot => "hot",
        }
    }
}

impl fmt::Display for SpiceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One line of the order-in-progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub kind: ItemKind,
    /// Display name of the backing catalog entry.
    pub name: String,
    pub qty: u32,
    /// Pizzas only.
    pub size: Option<Size>,
    /// Only when the backing entry requires spice.
    pub spice: Option<SpiceLevel>,
    /// Selected option values, keyed by option name (wings: type, flavor).
    /// BTreeMap so the merge key is order-independent.
    pub options: BTreeMap<String, String>,
}

impl LineItem {
    pub fn new(kind: ItemKind, name: impl Into<String>, qty: u32) -> Self {
        Self {
            kind,
            name: name.into(),
            qty: qty.max(1),
            size: None,
            spice: None,
            options: BTreeMap::new(),
        }
    }

    /// Identity for merging: two lines with equal keys are the same order
    /// line and their quantities sum. Spice is deliberately excluded; it is
    /// a slot answer, not an identity.
    pub fn merge_key(&self) -> (ItemKind, String, Option<Size>, Vec<(String, String)>) {
        (
            self.kind,
            self.name.clone(),
            self.size,
            self.options
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    /// A line is slot-complete when size is set for pizzas, spice is set
    /// when the entry requires it, and every declared option has a value.
    pub fn is_slot_complete(&self, entry: &CatalogEntry) -> bool {
        if self.kind == ItemKind::Pizza && self.size.is_none() {
            return false;
        }
        if entry.requires_spice && self.spice.is_none() {
            return false;
        }
        entry
            .options
            .iter()
            .all(|spec| self.options.contains_key(&spec.name))
    }

    /// The first declared option with no selected value, if any.
    pub fn first_missing_option<'a>(&self, entry: &'a CatalogEntry) -> Option<&'a crate::domain::catalog::OptionSpec> {
        entry
            .options
            .iter()
            .find(|spec| !self.options.contains_key(&spec.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::OptionSpec;

    fn pizza_entry(requires_spice: bool) -> CatalogEntry {
        CatalogEntry {
            kind: ItemKind::Pizza,
            name: "Pepperoni Pizza".to_string(),
            aliases: vec!["pepperoni pizza".to_string(), "pepperoni".to_string()],
            requires_spice,
            is_vegetarian: false,
            options: Vec::new(),
        }
    }

    fn wings_entry() -> CatalogEntry {
        CatalogEntry {
            kind: ItemKind::Wings,
            name: "Chicken Wings".to_string(),
            aliases: vec!["chicken wings".to_string(), "wings".to_string()],
            requires_spice: false,
            is_vegetarian: false,
            options: vec![
                OptionSpec {
                    name: "type".to_string(),
                    values: vec!["boneless".to_string(), "traditional".to_string()],
                },
                OptionSpec {
                    name: "flavor".to_string(),
                    values: vec!["bbq".to_string(), "buffalo".to_string()],
                },
            ],
        }
    }

    #[test]
    fn qty_is_clamped_to_at_least_one() {
        assert_eq!(LineItem::new(ItemKind::Side, "Fries", 0).qty, 1);
    }

    #[test]
    fn pizza_without_size_is_incomplete() {
        let item = LineItem::new(ItemKind::Pizza, "Pepperoni Pizza", 1);
        assert!(!item.is_slot_complete(&pizza_entry(false)));
    }

    #[test]
    fn pizza_with_size_and_no_spice_requirement_is_complete() {
        let mut item = LineItem::new(ItemKind::Pizza, "Pepperoni Pizza", 1);
        item.size = Some(Size::Large);
        assert!(item.is_slot_complete(&pizza_entry(false)));
    }

    #[test]
    fn spice_requirement_blocks_completion() {
        let mut item = LineItem::new(ItemKind::Pizza, "Pepperoni Pizza", 1);
        item.size = Some(Size::Large);
        assert!(!item.is_slot_complete(&pizza_entry(true)));

        item.spice = Some(SpiceLevel::Mild);
        assert!(item.is_slot_complete(&pizza_entry(true)));
    }

    #[test]
    fn beverage_is_complete_immediately() {
        let item = LineItem::new(ItemKind::Beverage, "Coke", 2);
        let entry = CatalogEntry {
            kind: ItemKind::Beverage,
            name: "Coke".to_string(),
            aliases: vec!["coke".to_string()],
            requires_spice: false,
            is_vegetarian: false,
            options: Vec::new(),
        };
        assert!(item.is_slot_complete(&entry));
    }

    #[test]
    fn wings_need_every_declared_option() {
        let entry = wings_entry();
        let mut item = LineItem::new(ItemKind::Wings, "Chicken Wings", 1);
        assert!(!item.is_slot_complete(&entry));
        assert_eq!(item.first_missing_option(&entry).unwrap().name, "type");

        item.options.insert("type".to_string(), "boneless".to_string());
        assert!(!item.is_slot_complete(&entry));
        assert_eq!(item.first_missing_option(&entry).unwrap().name, "flavor");

        item.options.insert("flavor".to_string(), "bbq".to_string());
        assert!(item.is_slot_complete(&entry));
        assert!(item.first_missing_option(&entry).is_none());
    }

    #[test]
    fn merge_key_ignores_qty_and_spice() {
        let mut a = LineItem::new(ItemKind::Pizza, "Pepperoni Pizza", 1);
        a.size = Some(Size::Large);
        a.spice = Some(SpiceLevel::Mild);
        let mut b = LineItem::new(ItemKind::Pizza, "Pepperoni Pizza", 3);
        b.size = Some(Size::Large);
        assert_eq!(a.merge_key(), b.merge_key());
    }

    #[test]
    fn merge_key_distinguishes_sizes() {
        let mut a = LineItem::new(ItemKind::Pizza, "Pepperoni Pizza", 1);
        a.size = Some(Size::Large);
        let mut b = a.clone();
        b.size = Some(Size::Medium);
        assert_ne!(a.merge_key(), b.merge_key());
    }
}
