//! Palette lookup for arc fills
//!
//! Palettes are keyed by top-level category name and indexed by ring depth.
//! A node without its own entry inherits from the nearest ancestor that has
//! one; if nothing resolves, a deterministic fallback color is returned and
//! a warning is emitted instead of leaving the fill undefined.

use ahash::AHashMap;
use egui::Color32;
use tracing::warn;

use sb_core::partition::Partition;
use sb_data::config::{parse_hex, ExplorerConfig};

/// Resolves node fills from ordered palette maps with ancestor fallback.
pub struct ColorResolver {
    maps: Vec<AHashMap<String, Vec<Color32>>>,
    fallback: Color32,
}

impl ColorResolver {
    /// Build from config. Palette entries with invalid hex colors are
    /// dropped with a warning.
    pub fn from_config(config: &ExplorerConfig) -> Self {
        let mut maps = Vec::with_capacity(config.palettes.len());
        for palette in &config.palettes {
            let mut map = AHashMap::new();
            for (name, colors) in palette {
                let mut parsed = Vec::with_capacity(colors.len());
                let mut valid = true;
                for hex in colors {
                    match parse_hex(hex) {
                        Ok([r, g, b]) => parsed.push(Color32::from_rgb(r, g, b)),
                        Err(_) => {
                            warn!(category = %name, color = %hex, "ignoring invalid palette color");
                            valid = false;
                            break;
                        }
                    }
                }
                if valid && !parsed.is_empty() {
                    map.insert(name.clone(), parsed);
                }
            }
            maps.push(map);
        }

        let fallback = parse_hex(&config.fallback_color)
            .map(|[r, g, b]| Color32::from_rgb(r, g, b))
            .unwrap_or(Color32::GRAY);

        Self { maps, fallback }
    }

    /// First match wins across the ordered maps.
    fn lookup(&self, name: &str) -> Option<&[Color32]> {
        self.maps.iter().find_map(|map| map.get(name).map(Vec::as_slice))
    }

    /// Resolve the fill for an arena node: the node's own name first, then
    /// the ancestor chain while deeper than the first ring. The color index
    /// is `depth - 1`, falling back to the palette's first entry when the
    /// ring is deeper than the palette.
    pub fn resolve(&self, partition: &Partition, idx: usize) -> Color32 {
        let node = partition.get(idx);
        let mut cursor = idx;
        let mut colors = self.lookup(&partition.get(cursor).name);
        while colors.is_none() && partition.get(cursor).depth > 1 {
            match partition.parent(cursor) {
                Some(parent) => cursor = parent,
                None => break,
            }
            colors = self.lookup(&partition.get(cursor).name);
        }

        let Some(colors) = colors else {
            warn!(key = %node.key, depth = node.depth, "no palette entry resolved, using fallback");
            return self.fallback;
        };

        colors
            .get(node.depth.saturating_sub(1))
            .or_else(|| colors.first())
            .copied()
            .unwrap_or(self.fallback)
    }

    pub fn fallback(&self) -> Color32 {
        self.fallback
    }

    /// Fill for every node in the arena, indexed alongside it. The root is
    /// never drawn and gets the fallback without a lookup.
    pub fn assign(&self, partition: &Partition) -> Vec<Color32> {
        (0..partition.len())
            .map(|idx| {
                if partition.get(idx).depth == 0 {
                    self.fallback
                } else {
                    self.resolve(partition, idx)
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use sb_core::hierarchy::HierarchyNode;

    fn test_config() -> ExplorerConfig {
        let mut palette = IndexMap::new();
        palette.insert(
            "A".to_string(),
            vec!["#111111".to_string(), "#222222".to_string(), "#333333".to_string()],
        );
        ExplorerConfig {
            palettes: vec![palette],
            fallback_color: "#9B9B9B".to_string(),
            ..ExplorerConfig::default()
        }
    }

    fn test_partition() -> Partition {
        Partition::build(&HierarchyNode::branch(
            "root",
            "",
            vec![
                HierarchyNode::branch(
                    "A",
                    "",
                    vec![HierarchyNode::leaf("unnamed", "", 5.0)],
                ),
                HierarchyNode::leaf("mystery", "", 5.0),
            ],
        ))
    }

    #[test]
    fn depth_indexes_into_the_palette() {
        let resolver = ColorResolver::from_config(&test_config());
        let partition = test_partition();
        let a = partition.find_by_key("A").unwrap();
        assert_eq!(resolver.resolve(&partition, a), Color32::from_rgb(0x11, 0x11, 0x11));
    }

    #[test]
    fn children_inherit_through_the_ancestor_chain() {
        let resolver = ColorResolver::from_config(&test_config());
        let partition = test_partition();
        let child = partition.find_by_key("A.unnamed").unwrap();
        // Depth 2 under category "A" resolves the second palette entry.
        assert_eq!(resolver.resolve(&partition, child), Color32::from_rgb(0x22, 0x22, 0x22));
    }

    #[test]
    fn unknown_category_gets_the_fallback() {
        let resolver = ColorResolver::from_config(&test_config());
        let partition = test_partition();
        let mystery = partition.find_by_key("mystery").unwrap();
        assert_eq!(resolver.resolve(&partition, mystery), Color32::from_rgb(0x9B, 0x9B, 0x9B));
    }

    #[test]
    fn deep_rings_fall_back_to_the_first_entry() {
        let resolver = ColorResolver::from_config(&test_config());
        let partition = Partition::build(&HierarchyNode::branch(
            "root",
            "",
            vec![
                HierarchyNode::branch(
                    "A",
                    "",
                    vec![
                        HierarchyNode::branch(
                            "x",
                            "",
                            vec![
                                HierarchyNode::branch(
                                    "y",
                                    "",
                                    vec![HierarchyNode::leaf("z", "", 1.0)],
                                ),
                                HierarchyNode::leaf("w", "", 1.0),
                            ],
                        ),
                        HierarchyNode::leaf("v", "", 1.0),
                    ],
                ),
                HierarchyNode::leaf("B", "", 1.0),
            ],
        ));
        // Depth 4 is past the 3-entry palette: index 0 is used.
        let deep = partition.find_by_key("A.x.y.z").unwrap();
        assert_eq!(resolver.resolve(&partition, deep), Color32::from_rgb(0x11, 0x11, 0x11));
    }

    #[test]
    fn first_map_wins_across_palettes() {
        let mut first = IndexMap::new();
        first.insert("A".to_string(), vec!["#010101".to_string()]);
        let mut second = IndexMap::new();
        second.insert("A".to_string(), vec!["#020202".to_string()]);
        second.insert("B".to_string(), vec!["#030303".to_string()]);
        let config = ExplorerConfig {
            palettes: vec![first, second],
            ..ExplorerConfig::default()
        };
        let resolver = ColorResolver::from_config(&config);
        let partition = Partition::build(&HierarchyNode::branch(
            "root",
            "",
            vec![
                HierarchyNode::leaf("A", "", 1.0),
                HierarchyNode::leaf("B", "", 1.0),
            ],
        ));
        let a = partition.find_by_key("A").unwrap();
        let b = partition.find_by_key("B").unwrap();
        assert_eq!(resolver.resolve(&partition, a), Color32::from_rgb(1, 1, 1));
        assert_eq!(resolver.resolve(&partition, b), Color32::from_rgb(3, 3, 3));
    }
}
