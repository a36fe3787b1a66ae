use serde::{Deserialize, Serialize};

/// Rendering class of a road, derived from the OSM `highway` tag.
///
/// Variants are declared from minor to major, which is also their paint order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoadClass {
    /// Any road not covered by other classes.
    Default,
    /// `residential`, `living_street`.
    Residential,
    /// `tertiary`, `tertiary_link`.
    Tertiary,
    /// `secondary`, `secondary_link`.
    Secondary,
    /// `trunk`, `primary` and their links.
    Primary,
    /// `motorway`, `motorway_link`.
    Motorway,
}

/// Coarse road grouping used by the glowing modes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RoadGroup {
    /// Residential and unclassified roads.
    Minor,
    /// Secondary and tertiary roads.
    Secondary,
    /// Motorways, trunks and primary roads.
    Major,
}

impl RoadClass {
    /// All classes in paint order.
    pub const ALL: [RoadClass; 6] = [
        Self::Default,
        Self::Residential,
        Self::Tertiary,
        Self::Secondary,
        Self::Primary,
        Self::Motorway,
    ];

    /// Classifies a `highway` tag value. For multi-valued tags (`primary;secondary`) the first value is
    /// used.
    pub fn from_highway(highway: &str) -> Self {
        let highway = highway.split(';').next().unwrap_or_default().trim();
        match highway {
            "motorway" | "motorway_link" => Self::Motorway,
            "trunk" | "trunk_link" | "primary" | "primary_link" => Self::Primary,
            "secondary" | "secondary_link" => Self::Secondary,
            "tertiary" | "tertiary_link" => Self::Tertiary,
            "residential" | "living_street" => Self::Residential,
            _ => Self::Default,
        }
    }

    /// Theme key of the class color.
    pub fn theme_key(&self) -> &'static str {
        match self {
            RoadClass::Motorway => "road_motorway",
            RoadClass::Primary => "road_primary",
            RoadClass::Secondary => "road_secondary",
            RoadClass::Tertiary => "road_tertiary",
            RoadClass::Residential => "road_residential",
            RoadClass::Default => "road_default",
        }
    }

    /// Line width in points used by the flat modes.
    pub fn width(&self) -> f32 {
        match self {
            RoadClass::Motorway => 1.2,
            RoadClass::Primary => 1.0,
            RoadClass::Secondary => 0.8,
            RoadClass::Tertiary => 0.6,
            RoadClass::Residential | RoadClass::Default => 0.4,
        }
    }

    /// Group of the class for the glowing modes.
    pub fn group(&self) -> RoadGroup {
        match self {
            RoadClass::Motorway | RoadClass::Primary => RoadGroup::Major,
            RoadClass::Secondary | RoadClass::Tertiary => RoadGroup::Secondary,
            RoadClass::Residential | RoadClass::Default => RoadGroup::Minor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_highways() {
        assert_eq!(RoadClass::from_highway("motorway_link"), RoadClass::Motorway);
        assert_eq!(RoadClass::from_highway("trunk"), RoadClass::Primary);
        assert_eq!(RoadClass::from_highway("tertiary_link"), RoadClass::Tertiary);
        assert_eq!(RoadClass::from_highway("living_street"), RoadClass::Residential);
        assert_eq!(RoadClass::from_highway("service"), RoadClass::Default);
        assert_eq!(
            RoadClass::from_highway("secondary;residential"),
            RoadClass::Secondary
        );
    }

    #[test]
    fn paint_order_is_minor_first() {
        let mut classes = RoadClass::ALL.to_vec();
        classes.sort();
        assert_eq!(classes.first(), Some(&RoadClass::Default));
        assert_eq!(classes.last(), Some(&RoadClass::Motorway));
        assert!(RoadClass::Motorway.width() > RoadClass::Residential.width());
        assert_eq!(RoadClass::Tertiary.group(), RoadGroup::Secondary);
    }
}
