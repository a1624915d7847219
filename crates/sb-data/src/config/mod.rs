//! Orientation and palette configuration
//!
//! An orientation pairs a display label with a grouping-field order and may
//! wrap the aggregated tree in a static frame: fixed sibling nodes plus a
//! translucent wrapper. Palettes map a top-level category name to an ordered
//! color list indexed by ring depth.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::DataError;
use sb_core::hierarchy::HierarchyNode;

/// A named display mode with its own grouping-field order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Orientation {
    pub label: String,
    pub group_by: Vec<String>,
    #[serde(default)]
    pub frame: Option<Frame>,
}

/// Fixed structure composed around the aggregated children.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Frame {
    /// Static top-level nodes rendered next to the aggregated tree.
    #[serde(default)]
    pub siblings: Vec<StaticNode>,

    /// Wrapper node that holds the aggregated children.
    #[serde(default)]
    pub wrapper: Option<Wrapper>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticNode {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub size: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wrapper {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Render translucent and on top of its own children.
    #[serde(default)]
    pub overlay: bool,
}

impl Orientation {
    /// Build the display tree for this orientation from aggregated children.
    pub fn compose(&self, aggregated: Vec<HierarchyNode>) -> HierarchyNode {
        let Some(frame) = &self.frame else {
            return HierarchyNode::branch("root", "", aggregated);
        };

        let mut children: Vec<HierarchyNode> = frame
            .siblings
            .iter()
            .map(|s| HierarchyNode::leaf(&s.name, &s.description, s.size))
            .collect();

        match &frame.wrapper {
            Some(wrapper) => {
                let mut node =
                    HierarchyNode::branch(&wrapper.name, &wrapper.description, aggregated);
                node.overlay = wrapper.overlay;
                children.push(node);
            }
            None => children.extend(aggregated),
        }

        HierarchyNode::branch("root", "", children)
    }
}

/// Full explorer configuration: orientations plus palette maps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplorerConfig {
    /// Column summed at the leaves.
    pub measure_column: String,

    pub orientations: Vec<Orientation>,

    /// Ordered palette maps: category name -> hex colors by ring depth.
    /// Lookup searches the maps in order; first match wins.
    pub palettes: Vec<IndexMap<String, Vec<String>>>,

    /// Used when no palette entry resolves up the ancestor chain.
    pub fallback_color: String,
}

impl ExplorerConfig {
    pub fn load(path: &Path) -> Result<Self, DataError> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

/// Parse a `#RRGGBB` hex color into RGB components.
pub fn parse_hex(hex: &str) -> Result<[u8; 3], DataError> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.is_ascii() {
        return Err(DataError::Config(format!("invalid hex color '{hex}'")));
    }
    let component = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16)
            .map_err(|_| DataError::Config(format!("invalid hex color '{hex}'")))
    };
    Ok([component(0..2)?, component(2..4)?, component(4..6)?])
}

fn hexes(colors: &[&str]) -> Vec<String> {
    colors.iter().map(|c| c.to_string()).collect()
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        let bluegreens = ["#18816A", "#21B290", "#23CB8D"];
        let oranges = ["#DB6000", "#FF7000", "#F98500", "#F98500"];
        let purples = ["#7070B1", "#8A82E1", "#A9A1FF", "#A9A1FF"];
        let grey = ["#676564"];
        let green = ["#64A612"];
        let yellows = ["#A67611", "#D09515", "#FEB211"];
        let periwinkle = ["#5964FF"];
        let red = ["#FF2C5D"];
        let darkred = ["#631C1D", "#631C1D", "#631C1D", "#631C1D"];

        let mut by_jurisdiction = IndexMap::new();
        by_jurisdiction.insert("Federal".to_string(), hexes(&yellows));
        by_jurisdiction.insert("State".to_string(), hexes(&bluegreens));
        by_jurisdiction.insert("Local".to_string(), hexes(&oranges));
        by_jurisdiction.insert("Kids".to_string(), hexes(&purples));
        by_jurisdiction.insert("Military".to_string(), hexes(&darkred));
        by_jurisdiction.insert("Indian County jails".to_string(), hexes(&red));
        by_jurisdiction.insert("Territorial prisons".to_string(), hexes(&green));
        by_jurisdiction.insert("Immigration Detention".to_string(), hexes(&grey));
        by_jurisdiction.insert("Civil Commitment".to_string(), hexes(&periwinkle));
        by_jurisdiction.insert("Probation".to_string(), hexes(&darkred));
        by_jurisdiction.insert("Parole".to_string(), hexes(&grey));
        by_jurisdiction.insert("Correctional Facilities".to_string(), hexes(&["#FFFFFF"]));

        let mut by_offense = IndexMap::new();
        by_offense.insert("drugs".to_string(), hexes(&yellows));
        by_offense.insert("violent".to_string(), hexes(&bluegreens));
        by_offense.insert("other".to_string(), hexes(&oranges));
        by_offense.insert("property".to_string(), hexes(&purples));
        by_offense.insert("public order".to_string(), hexes(&darkred));
        by_offense.insert("sexual".to_string(), hexes(&red));
        by_offense.insert("status offense".to_string(), hexes(&green));
        by_offense.insert("technical".to_string(), hexes(&grey));
        by_offense.insert("person".to_string(), hexes(&periwinkle));

        let frame = Frame {
            siblings: vec![
                StaticNode {
                    name: "Probation".to_string(),
                    description: "People on probation".to_string(),
                    size: 3_900_000.0,
                },
                StaticNode {
                    name: "Parole".to_string(),
                    description: "People on parole".to_string(),
                    size: 807_000.0,
                },
            ],
            wrapper: Some(Wrapper {
                name: "Correctional Facilities".to_string(),
                description: "People locked up".to_string(),
                overlay: true,
            }),
        };

        Self {
            measure_column: "number".to_string(),
            orientations: vec![
                Orientation {
                    label: "Facility type".to_string(),
                    group_by: vec![
                        "jurisdiction".to_string(),
                        "facility_type".to_string(),
                        "offense_category".to_string(),
                    ],
                    frame: Some(frame.clone()),
                },
                Orientation {
                    label: "Offense".to_string(),
                    group_by: vec![
                        "offense_category".to_string(),
                        "jurisdiction".to_string(),
                        "facility_type".to_string(),
                    ],
                    frame: Some(frame),
                },
            ],
            palettes: vec![by_jurisdiction, by_offense],
            fallback_color: "#9B9B9B".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_without_frame_puts_children_under_root() {
        let orientation = Orientation {
            label: "plain".to_string(),
            group_by: vec!["a".to_string()],
            frame: None,
        };
        let root = orientation.compose(vec![HierarchyNode::leaf("x", "", 1.0)]);
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].name, "x");
    }

    #[test]
    fn compose_with_frame_adds_siblings_and_wrapper() {
        let config = ExplorerConfig::default();
        let root = config.orientations[0].compose(vec![HierarchyNode::leaf("State", "", 100.0)]);

        let names: Vec<&str> = root.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Probation", "Parole", "Correctional Facilities"]);

        let wrapper = root.children.last().unwrap();
        assert!(wrapper.overlay);
        assert_eq!(wrapper.children.len(), 1);
        assert_eq!(wrapper.value(), 100.0);
        assert_eq!(root.value(), 100.0 + 3_900_000.0 + 807_000.0);
    }

    #[test]
    fn hex_parsing() {
        assert_eq!(parse_hex("#18816A").unwrap(), [0x18, 0x81, 0x6A]);
        assert_eq!(parse_hex("FF2C5D").unwrap(), [0xFF, 0x2C, 0x5D]);
        assert!(parse_hex("#FFF").is_err());
        assert!(parse_hex("#GGGGGG").is_err());
    }

    #[test]
    fn default_palettes_cover_frame_names() {
        let config = ExplorerConfig::default();
        let frame = config.orientations[0].frame.as_ref().unwrap();
        for sibling in &frame.siblings {
            assert!(
                config.palettes.iter().any(|m| m.contains_key(&sibling.name)),
                "no palette for {}",
                sibling.name
            );
        }
        let wrapper = frame.wrapper.as_ref().unwrap();
        assert!(config.palettes.iter().any(|m| m.contains_key(&wrapper.name)));
    }

    #[test]
    fn config_json_round_trip() {
        let config = ExplorerConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: ExplorerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.orientations.len(), config.orientations.len());
        assert_eq!(back.palettes.len(), config.palettes.len());
        assert_eq!(back.measure_column, config.measure_column);
    }
}
