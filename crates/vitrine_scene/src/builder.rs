use glam::Vec3;
use vitrine_assets::ResourceTable;

use crate::config::PlacementTable;
use crate::graph::NodeId;
use crate::parts::{
    PART_KEYBOARD, PART_LABEL_NAME, PART_LABEL_TITLE, PART_MONITOR, PART_MOUSE, PART_POSTER,
    PART_TOWER, SceneAssembler,
};

/// Resource keys the builder looks up; the manifest supplies their
/// sources. A missing or failed key simply leaves that surface flat.
pub const RES_SCREEN: &str = "screen";
pub const RES_POSTER: &str = "poster";
pub const RES_LABEL_NAME: &str = "label_name";
pub const RES_LABEL_TITLE: &str = "label_title";
pub const HOTSPOT_ICONS: [(&str, &str); 3] = [
    ("SocialGithub", "icon_github"),
    ("SocialForge", "icon_forge"),
    ("SocialMail", "icon_mail"),
];

/// Parts the pointer can hover; these get hit regions, nothing else
/// does.
pub const HOVERABLE_PARTS: [&str; 4] = [PART_MONITOR, PART_TOWER, PART_KEYBOARD, PART_MOUSE];

/// What the builder hands back for registration with the interaction
/// side: world-space bounds per hoverable part.
pub struct BuiltScene {
    pub group: NodeId,
    pub hover_bounds: Vec<(&'static str, (Vec3, Vec3))>,
}

/// Assembles the whole tableau under one group node, then resolves
/// world transforms and collects hover bounds. Exactly one subtree per
/// named part; the table says where each one sits.
pub fn build_tableau(
    assembler: &mut SceneAssembler<'_>,
    table: &PlacementTable,
    resources: &ResourceTable,
) -> BuiltScene {
    let root = assembler.graph.root();
    let group = assembler.group(root, table.group.transform());

    assembler.desk(group, &table.desk);
    assembler.monitor(group, &table.monitor, resources.get(RES_SCREEN));
    assembler.tower(group, &table.tower);
    assembler.keyboard(group, &table.keyboard);
    assembler.mouse(group, &table.mouse);
    assembler.speakers(group, &table.speakers);
    assembler.wire(group);
    assembler.bitmap_quad(
        group,
        PART_POSTER,
        &table.poster,
        (1.4, 2.0),
        [0.23, 0.23, 0.23],
        resources.get(RES_POSTER),
    );
    assembler.bitmap_quad(
        group,
        PART_LABEL_NAME,
        &table.label_name,
        (2.4, 0.5),
        [0.1, 0.1, 0.12],
        resources.get(RES_LABEL_NAME),
    );
    assembler.bitmap_quad(
        group,
        PART_LABEL_TITLE,
        &table.label_title,
        (1.8, 0.35),
        [0.1, 0.1, 0.12],
        resources.get(RES_LABEL_TITLE),
    );
    for ((name, icon_key), placement) in HOTSPOT_ICONS.into_iter().zip(&table.hotspots) {
        assembler.bitmap_quad(
            group,
            name,
            placement,
            (0.35, 0.35),
            [0.16, 0.16, 0.18],
            resources.get(icon_key),
        );
    }

    assembler.graph.propagate_transforms();

    let mut hover_bounds = Vec::with_capacity(HOVERABLE_PARTS.len());
    for part in HOVERABLE_PARTS {
        let id = assembler
            .graph
            .find(part)
            .expect("hoverable part was just built");
        if let Some(bounds) = assembler.graph.subtree_bounds(id, assembler.geometries) {
            hover_bounds.push((part, bounds));
        }
    }

    BuiltScene {
        group,
        hover_bounds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animator::AnimatedSet;
    use crate::geometry::GeometryStore;
    use crate::graph::SceneGraph;
    use crate::material::{MaterialArena, WaveTag};
    use crate::parts::{PART_DESK, PART_SPEAKERS, PART_WIRE};
    use std::collections::HashSet;

    struct Built {
        graph: SceneGraph,
        geometries: GeometryStore,
        materials: MaterialArena,
        animated: AnimatedSet,
        scene: BuiltScene,
    }

    fn build_default() -> Built {
        let mut graph = SceneGraph::default();
        let mut geometries = GeometryStore::default();
        let mut materials = MaterialArena::default();
        let mut animated = AnimatedSet::default();
        let scene = {
            let mut assembler = SceneAssembler {
                graph: &mut graph,
                geometries: &mut geometries,
                materials: &mut materials,
                animated: &mut animated,
            };
            build_tableau(
                &mut assembler,
                &PlacementTable::default(),
                &ResourceTable::default(),
            )
        };
        Built {
            graph,
            geometries,
            materials,
            animated,
            scene,
        }
    }

    #[test]
    fn exactly_one_node_per_named_part() {
        let built = build_default();
        for part in [
            PART_DESK,
            PART_MONITOR,
            PART_TOWER,
            PART_KEYBOARD,
            PART_MOUSE,
            PART_SPEAKERS,
            PART_WIRE,
            PART_POSTER,
            PART_LABEL_NAME,
            PART_LABEL_TITLE,
        ] {
            let mut count = 0;
            built.graph.visit(built.graph.root(), &mut |_, node| {
                if node.name == Some(part) {
                    count += 1;
                }
            });
            assert_eq!(count, 1, "expected exactly one `{part}` node");
        }
    }

    #[test]
    fn traversal_is_a_tree() {
        let built = build_default();
        let mut seen = HashSet::new();
        built.graph.visit(built.graph.root(), &mut |id, _| {
            assert!(seen.insert(id), "node visited twice; graph has a cycle");
        });
        assert_eq!(seen.len(), built.graph.len(), "unreachable nodes");
    }

    #[test]
    fn animator_registry_covers_keys_and_strips_only() {
        let built = build_default();
        // 300 lattice keys + 2 mouse strips; the wire and everything
        // else stays out of the registry.
        assert_eq!(built.animated.len(), 302);

        let lattice = built
            .animated
            .iter()
            .filter(|(_, tag)| matches!(tag, WaveTag::Lattice { .. }))
            .count();
        assert_eq!(lattice, 300);
    }

    #[test]
    fn every_hoverable_part_got_bounds() {
        let built = build_default();
        let names: Vec<_> = built
            .scene
            .hover_bounds
            .iter()
            .map(|(name, _)| *name)
            .collect();
        assert_eq!(names, HOVERABLE_PARTS.to_vec());
        for (_, (min, max)) in &built.scene.hover_bounds {
            assert!(min.x <= max.x && min.y <= max.y && min.z <= max.z);
        }
    }

    #[test]
    fn keyboard_key_lands_where_the_transform_chain_says() {
        let built = build_default();
        // Key (0,0): local (-1.8, 0.13, -0.6), keyboard scale 0.5 at
        // (0,-0.9,-0.8), group flipped pi about Y and pushed to z=1.
        let keyboard = built.graph.find(PART_KEYBOARD).unwrap();
        let first_key = built.graph.node(keyboard).children[2];
        let world = built.graph.node(first_key).global.translation();
        let expected = glam::Vec3::new(0.9, -0.835, 2.1);
        assert!(
            (world - expected).length() < 1e-4,
            "key at {world}, expected {expected}"
        );
    }

    #[test]
    fn shared_key_geometry_is_not_duplicated() {
        let built = build_default();
        let keyboard = built.graph.find(PART_KEYBOARD).unwrap();
        let mut key_geometries = HashSet::new();
        let mut key_count = 0;
        built.graph.visit(keyboard, &mut |_, node| {
            if let (Some(geometry), Some(material)) = (node.geometry, node.material) {
                if built.materials.get(material).animated.is_some() {
                    key_geometries.insert(geometry);
                    key_count += 1;
                }
            }
        });
        assert_eq!(key_count, 300);
        assert_eq!(key_geometries.len(), 1, "keys must share one mesh");
    }

    #[test]
    fn geometry_store_is_shared_not_per_node() {
        let built = build_default();
        let mut mesh_nodes = 0;
        built.graph.visit(built.graph.root(), &mut |_, node| {
            if node.geometry.is_some() {
                mesh_nodes += 1;
            }
        });
        assert!(
            built.geometries.len() < mesh_nodes / 2,
            "{} geometries for {} mesh nodes suggests no sharing",
            built.geometries.len(),
            mesh_nodes
        );
    }
}
