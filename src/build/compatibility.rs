//! Compatibility checks between the components of a build.
//!
//! The drone is the anchor: every check compares one other slot against it,
//! so a build without a drone never produces warnings.

use crate::models::{BuildSnapshot, Component, TAG_ALL};

/// Substring marking a digital (DJI) video system tag.
const DIGITAL_VIDEO_MARKER: &str = "dji";

/// Evaluate a build and return human-readable warnings.
///
/// Warnings are ordered battery, radio, goggles. An empty list means no issue
/// was found.
pub fn check_compatibility(build: &BuildSnapshot) -> Vec<String> {
    let mut issues = Vec::new();

    let Some(drone) = &build.drone else {
        return issues;
    };

    if let Some(battery) = &build.battery {
        if !has_compatible_tag(&drone.compatible_with, &battery.compatible_with) {
            issues.push(format!(
                "The selected battery ({}) may not be compatible with your drone ({}).",
                battery.name, drone.name
            ));
        }
    }

    if let Some(radio) = &build.radio {
        if !has_compatible_tag(&drone.compatible_with, &radio.compatible_with) {
            issues.push(format!(
                "The selected radio ({}) may not be compatible with your drone ({}).",
                radio.name, drone.name
            ));
        }
    }

    if let Some(goggles) = &build.goggles {
        if is_digital_mismatch(drone, goggles) {
            issues.push(format!(
                "The selected goggles ({}) are a digital system and may not be compatible with your analog drone ({}).",
                goggles.name, drone.name
            ));
        }
    }

    issues
}

/// Two tag sets match when either holds the wildcard or they share a tag.
fn has_compatible_tag(a: &[String], b: &[String]) -> bool {
    if a.iter().chain(b).any(|tag| tag == TAG_ALL) {
        return true;
    }
    a.iter().any(|tag| b.contains(tag))
}

/// Most goggles are analog and work with anything; digital goggles need a
/// digital drone.
fn is_digital_mismatch(drone: &Component, goggles: &Component) -> bool {
    if goggles.is_universal() {
        return false;
    }
    is_digital(&goggles.compatible_with) && !is_digital(&drone.compatible_with)
}

fn is_digital(tags: &[String]) -> bool {
    tags.iter().any(|tag| tag.contains(DIGITAL_VIDEO_MARKER))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use crate::test_support::component;

    fn whoop(tags: &[&str]) -> Component {
        component(1, "Mobula 6", Category::Drone, tags)
    }

    #[test]
    fn test_no_drone_means_no_warnings() {
        let build = BuildSnapshot {
            battery: Some(component(2, "2S Pack", Category::Battery, &["battery-2s"])),
            radio: Some(component(3, "Odd Radio", Category::Radio, &["radio-odd"])),
            goggles: Some(component(4, "DJI V2", Category::Goggles, &["dji-air-unit"])),
            ..Default::default()
        };

        assert!(check_compatibility(&build).is_empty());
    }

    #[test]
    fn test_matching_battery_tag() {
        let build = BuildSnapshot {
            drone: Some(whoop(&["battery-1s", "radio-frsky"])),
            battery: Some(component(2, "GNB 300mAh", Category::Battery, &["battery-1s"])),
            ..Default::default()
        };

        assert!(check_compatibility(&build).is_empty());
    }

    #[test]
    fn test_mismatched_battery_names_both_components() {
        let build = BuildSnapshot {
            drone: Some(whoop(&["battery-1s", "radio-frsky"])),
            battery: Some(component(2, "Tattu 2S", Category::Battery, &["battery-2s"])),
            ..Default::default()
        };

        let issues = check_compatibility(&build);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("Tattu 2S"));
        assert!(issues[0].contains("Mobula 6"));
    }

    #[test]
    fn test_wildcard_on_either_side_is_compatible() {
        let drone_wildcard = BuildSnapshot {
            drone: Some(whoop(&["all"])),
            battery: Some(component(2, "Tattu 2S", Category::Battery, &["battery-2s"])),
            ..Default::default()
        };
        assert!(check_compatibility(&drone_wildcard).is_empty());

        let battery_wildcard = BuildSnapshot {
            drone: Some(whoop(&["battery-1s"])),
            battery: Some(component(2, "Any Pack", Category::Battery, &["all"])),
            ..Default::default()
        };
        assert!(check_compatibility(&battery_wildcard).is_empty());
    }

    #[test]
    fn test_empty_tags_are_incompatible() {
        let build = BuildSnapshot {
            drone: Some(whoop(&[])),
            radio: Some(component(3, "LiteRadio 2", Category::Radio, &[])),
            ..Default::default()
        };

        let issues = check_compatibility(&build);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].starts_with("The selected radio (LiteRadio 2)"));
    }

    #[test]
    fn test_digital_goggles_on_analog_drone() {
        let mut build = BuildSnapshot {
            drone: Some(whoop(&[])),
            goggles: Some(component(4, "DJI FPV Goggles V2", Category::Goggles, &["dji-digital"])),
            ..Default::default()
        };

        let issues = check_compatibility(&build);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("digital system"));

        build.goggles = Some(component(4, "FatShark Recon V3", Category::Goggles, &["all"]));
        assert!(check_compatibility(&build).is_empty());
    }

    #[test]
    fn test_digital_goggles_on_digital_drone() {
        let build = BuildSnapshot {
            drone: Some(whoop(&["dji-air-unit"])),
            goggles: Some(component(4, "DJI FPV Goggles V2", Category::Goggles, &["dji-o3"])),
            ..Default::default()
        };

        assert!(check_compatibility(&build).is_empty());
    }

    #[test]
    fn test_analog_goggles_never_warn() {
        let build = BuildSnapshot {
            drone: Some(whoop(&["battery-1s"])),
            goggles: Some(component(4, "Eachine EV800D", Category::Goggles, &["analog-5g8"])),
            ..Default::default()
        };

        assert!(check_compatibility(&build).is_empty());
    }

    #[test]
    fn test_warning_order() {
        let build = BuildSnapshot {
            drone: Some(whoop(&["analog"])),
            goggles: Some(component(4, "DJI V2", Category::Goggles, &["dji-air-unit"])),
            radio: Some(component(3, "Spektrum DX6", Category::Radio, &["radio-spektrum"])),
            battery: Some(component(2, "Tattu 2S", Category::Battery, &["battery-2s"])),
            accessories: vec![component(9, "Props", Category::Accessory, &["all"])],
        };

        let issues = check_compatibility(&build);
        assert_eq!(issues.len(), 3);
        assert!(issues[0].starts_with("The selected battery"));
        assert!(issues[1].starts_with("The selected radio"));
        assert!(issues[2].starts_with("The selected goggles"));
    }
}
