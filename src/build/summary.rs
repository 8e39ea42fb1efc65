//! Totals and completeness of a build.

use serde::Serialize;

use super::check_compatibility;
use crate::models::{BuildSnapshot, Category};

/// Everything the storefront shows next to the current build.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildSummary {
    pub components: BuildSnapshot,
    pub total_price: f64,
    /// Sum of the known weights, in grams.
    pub total_weight: f64,
    /// Singular categories that still have no component.
    pub missing: Vec<&'static str>,
    pub warnings: Vec<String>,
    pub is_complete: bool,
}

impl BuildSummary {
    pub fn new(components: BuildSnapshot) -> Self {
        let total_price: f64 = components.components().map(|c| c.price).sum();
        let total_weight: f64 = components.components().filter_map(|c| c.weight).sum();
        let missing: Vec<&'static str> = Category::SINGULAR
            .into_iter()
            .filter(|category| components.slot(*category).is_none())
            .map(|category| category.display_name())
            .collect();
        let warnings = check_compatibility(&components);

        Self {
            is_complete: missing.is_empty(),
            components,
            total_price,
            total_weight,
            missing,
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::component;

    #[test]
    fn test_empty_build_summary() {
        let summary = BuildSummary::new(BuildSnapshot::default());

        assert_eq!(summary.total_price, 0.0);
        assert_eq!(summary.total_weight, 0.0);
        assert_eq!(summary.missing, vec!["Drone", "Goggles", "Radio", "Battery"]);
        assert!(summary.warnings.is_empty());
        assert!(!summary.is_complete);
    }

    #[test]
    fn test_totals_include_accessories() {
        let mut drone = component(1, "Meteor65", Category::Drone, &["battery-1s"]);
        drone.price = 99.5;
        drone.weight = Some(23.0);
        let mut battery = component(7, "GNB 300mAh", Category::Battery, &["battery-1s"]);
        battery.price = 6.0;
        battery.weight = Some(8.5);
        let mut props = component(9, "Gemfan 31mm", Category::Accessory, &["all"]);
        props.price = 4.0;
        let mut charger = component(10, "URUAV Charger", Category::Accessory, &["battery-1s"]);
        charger.price = 20.0;
        charger.weight = Some(45.0);

        let summary = BuildSummary::new(BuildSnapshot {
            drone: Some(drone),
            battery: Some(battery),
            accessories: vec![props, charger],
            ..Default::default()
        });

        assert_eq!(summary.total_price, 129.5);
        assert_eq!(summary.total_weight, 76.5);
        assert_eq!(summary.missing, vec!["Goggles", "Radio"]);
        assert!(summary.warnings.is_empty());
    }

    #[test]
    fn test_complete_build_with_warning() {
        let summary = BuildSummary::new(BuildSnapshot {
            drone: Some(component(1, "Mobula 6", Category::Drone, &["battery-1s"])),
            goggles: Some(component(3, "Recon V3", Category::Goggles, &["all"])),
            radio: Some(component(5, "TX16S", Category::Radio, &["radio-elrs"])),
            battery: Some(component(7, "GNB", Category::Battery, &["battery-1s"])),
            accessories: Vec::new(),
        });

        assert!(summary.is_complete);
        assert_eq!(summary.warnings.len(), 1);
        assert!(summary.warnings[0].contains("TX16S"));
    }
}
