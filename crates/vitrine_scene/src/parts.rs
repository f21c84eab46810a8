use glam::{Quat, Vec3};
use vitrine_assets::{Handle, TextureData};
use vitrine_core::transform::Transform;

use crate::animator::{AnimatedSet, GRID_COLS, GRID_ROWS};
use crate::config::PartPlacement;
use crate::geometry::{GeometryHandle, GeometryStore, cuboid, cylinder, plane, tube};
use crate::graph::{NodeId, SceneGraph, SceneNode};
use crate::material::{MaterialArena, MaterialInstance};
use crate::spline::CatmullRom;

pub const PART_DESK: &str = "Desk";
pub const PART_MONITOR: &str = "Monitor";
pub const PART_TOWER: &str = "Tower";
pub const PART_KEYBOARD: &str = "Keyboard";
pub const PART_MOUSE: &str = "Mouse";
pub const PART_SPEAKERS: &str = "Speakers";
pub const PART_WIRE: &str = "Wire";
pub const PART_POSTER: &str = "Poster";
pub const PART_LABEL_NAME: &str = "LabelName";
pub const PART_LABEL_TITLE: &str = "LabelTitle";

/// Key lattice spacing in keyboard-local units.
const KEY_PITCH: f32 = 0.12;
const KEY_SIZE: [f32; 3] = [0.09, 0.04, 0.09];

/// The cable path from the monitor's back down across the desk to the
/// tower, in group space. Fixed: the swept tube is built once and
/// never animated.
const WIRE_CONTROL_POINTS: [[f32; 3]; 5] = [
    [0.0, -0.75, -1.88],
    [0.7, -0.88, -1.95],
    [1.4, -0.88, -1.80],
    [2.0, -0.80, -1.62],
    [2.05, -0.60, -1.52],
];

fn srgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// Mutable view over everything the builder writes into. Keeps the
/// part constructors down to one argument of context each.
pub struct SceneAssembler<'a> {
    pub graph: &'a mut SceneGraph,
    pub geometries: &'a mut GeometryStore,
    pub materials: &'a mut MaterialArena,
    pub animated: &'a mut AnimatedSet,
}

impl SceneAssembler<'_> {
    /// Empty transform node for one named part, placed per the table.
    pub fn part_root(
        &mut self,
        parent: NodeId,
        name: &'static str,
        placement: &PartPlacement,
    ) -> NodeId {
        self.graph
            .spawn(parent, SceneNode::empty(placement.transform()).named(name))
    }

    pub fn group(&mut self, parent: NodeId, transform: Transform) -> NodeId {
        self.graph.spawn(parent, SceneNode::empty(transform))
    }

    /// Mesh node with a fresh material instance.
    pub fn mesh(
        &mut self,
        parent: NodeId,
        transform: Transform,
        geometry: GeometryHandle,
        material: MaterialInstance,
    ) -> NodeId {
        // Animated instances are registered the moment they exist; the
        // animator never goes looking for them.
        let id = self.materials.add(material);
        if let Some(tag) = self.materials.get(id).animated {
            self.animated.register(id, tag);
        }
        self.graph
            .spawn(parent, SceneNode::mesh(transform, geometry, id))
    }

    // ------------------------------------------------------------------
    // Parts. All internal geometry is generated from fixed constants;
    // nothing is hand-authored per mesh.
    // ------------------------------------------------------------------

    pub fn desk(&mut self, parent: NodeId, placement: &PartPlacement) -> NodeId {
        let root = self.part_root(parent, PART_DESK, placement);

        let top = self.geometries.add(cuboid(10.0, 0.2, 3.5));
        self.mesh(
            root,
            Transform::from_xyz(0.0, 0.0, -1.0),
            top,
            MaterialInstance::flat(srgb(0x2c2c2c)),
        );

        let leg = self.geometries.add(cuboid(0.4, 3.0, 0.4));
        for x in [-4.6, 4.6] {
            self.mesh(
                root,
                Transform::from_xyz(x, -1.5, -1.0),
                leg,
                MaterialInstance::flat(srgb(0x1f1f1f)),
            );
        }

        root
    }

    pub fn monitor(
        &mut self,
        parent: NodeId,
        placement: &PartPlacement,
        screen_bitmap: Option<Handle<TextureData>>,
    ) -> NodeId {
        let root = self.part_root(parent, PART_MONITOR, placement);

        let frame_geometry = self.geometries.add(cuboid(3.0, 2.0, 0.1));
        let frame = self.mesh(
            root,
            Transform::from_xyz(0.0, 1.2, 0.0),
            frame_geometry,
            MaterialInstance::flat(srgb(0x1a1a1a)),
        );

        // The display surface is texture-gated: a flat teal glow until
        // (and unless) its bitmap arrives.
        let screen_geometry = self.geometries.add(plane(2.8, 1.8));
        let mut screen_material = MaterialInstance {
            base_color: srgb(0x0a9396),
            emissive: srgb(0x0a9396),
            emissive_intensity: 0.2,
            ..Default::default()
        };
        screen_material.texture = screen_bitmap;
        self.mesh(
            frame,
            Transform::from_xyz(0.0, 0.0, 0.06),
            screen_geometry,
            screen_material,
        );

        let neck = self.geometries.add(cuboid(0.2, 1.2, 0.1));
        self.mesh(
            root,
            Transform::from_xyz(0.0, 0.4, -0.05),
            neck,
            MaterialInstance::standard(srgb(0xc0c0c0), 0.8, 0.2),
        );

        let base = self.geometries.add(cylinder(0.6, 0.6, 0.05, 32));
        self.mesh(
            root,
            Transform::from_xyz(0.0, 0.0, -0.05),
            base,
            MaterialInstance::standard(srgb(0xc0c0c0), 0.8, 0.2),
        );

        root
    }

    pub fn tower(&mut self, parent: NodeId, placement: &PartPlacement) -> NodeId {
        let root = self.part_root(parent, PART_TOWER, placement);

        let case = self.geometries.add(cuboid(2.0, 4.0, 1.5));
        self.mesh(
            root,
            Transform::default(),
            case,
            MaterialInstance::standard(srgb(0x2a2a2a), 0.7, 0.2),
        );

        let panel = self.geometries.add(cuboid(0.02, 3.9, 1.4));
        self.mesh(
            root,
            Transform::from_xyz(-1.0, 0.0, 0.0),
            panel,
            MaterialInstance::standard(srgb(0xc0c0c0), 0.8, 0.2),
        );

        // Two drive bays, each a tray with an eject button.
        let bay = self.geometries.add(cuboid(0.1, 0.15, 1.4));
        let eject = self.geometries.add(cuboid(0.02, 0.13, 0.1));
        for y in [1.6, 1.3] {
            let bay_group = self.group(root, Transform::from_xyz(-1.01, y, 0.0));
            self.mesh(
                bay_group,
                Transform::default(),
                bay,
                MaterialInstance::standard(srgb(0x333333), 0.7, 0.3),
            );
            self.mesh(
                bay_group,
                Transform::from_xyz(0.02, 0.0, 0.65),
                eject,
                MaterialInstance::standard(srgb(0x444444), 0.7, 0.3),
            );
        }

        // Power button protrudes from the front panel, axis along X.
        let button = self.geometries.add(cylinder(0.15, 0.15, 0.1, 32));
        self.mesh(
            root,
            Transform::from_xyz(-1.01, 0.8, 0.0)
                .with_rotation(Quat::from_rotation_z(std::f32::consts::FRAC_PI_2)),
            button,
            MaterialInstance::standard(srgb(0x1a1a1a), 0.5, 0.5),
        );

        let led = self.geometries.add(cuboid(0.05, 0.05, 0.05));
        self.mesh(
            root,
            Transform::from_xyz(-1.01, 0.8, 0.3),
            led,
            MaterialInstance::emissive(srgb(0x00ff00), 2.0),
        );

        let reset = self.geometries.add(cuboid(0.1, 0.1, 0.02));
        self.mesh(
            root,
            Transform::from_xyz(-1.01, -1.3, -0.5),
            reset,
            MaterialInstance::flat(srgb(0x8b0000)),
        );

        let slot = self.geometries.add(cuboid(0.02, 0.02, 0.8));
        self.mesh(
            root,
            Transform::from_xyz(-1.01, -1.3, 0.0),
            slot,
            MaterialInstance::standard(srgb(0x111111), 0.5, 0.5),
        );

        let stand = self.geometries.add(cuboid(2.2, 0.2, 1.7));
        self.mesh(
            root,
            Transform::from_xyz(0.0, -2.1, 0.0),
            stand,
            MaterialInstance::standard(srgb(0x2a2a2a), 0.7, 0.2),
        );

        root
    }

    pub fn keyboard(&mut self, parent: NodeId, placement: &PartPlacement) -> NodeId {
        let root = self.part_root(parent, PART_KEYBOARD, placement);

        let base = self.geometries.add(cuboid(4.0, 0.1, 1.5));
        self.mesh(
            root,
            Transform::from_xyz(0.0, 0.05, 0.0),
            base,
            MaterialInstance::flat(srgb(0x111111)),
        );

        let key_area = self.geometries.add(cuboid(3.8, 0.05, 1.3));
        self.mesh(
            root,
            Transform::from_xyz(0.0, 0.1, 0.0),
            key_area,
            MaterialInstance::flat(srgb(0x1a1a1a)),
        );

        // The key lattice: 300 nodes sharing one geometry, each with
        // its own animated material carrying its (row, col).
        let key = self.geometries.add(cuboid(KEY_SIZE[0], KEY_SIZE[1], KEY_SIZE[2]));
        for row in 0..GRID_ROWS {
            for col in 0..GRID_COLS {
                self.mesh(
                    root,
                    Transform::from_xyz(
                        -1.8 + col as f32 * KEY_PITCH,
                        0.13,
                        -0.6 + row as f32 * KEY_PITCH,
                    ),
                    key,
                    MaterialInstance::animated_key(row, col),
                );
            }
        }

        let led = self.geometries.add(cuboid(0.05, 0.02, 0.05));
        self.mesh(
            root,
            Transform::from_xyz(1.5, 0.12, -0.5),
            led,
            MaterialInstance::emissive(srgb(0x00ff00), 0.5),
        );

        root
    }

    pub fn mouse(&mut self, parent: NodeId, placement: &PartPlacement) -> NodeId {
        let root = self.part_root(parent, PART_MOUSE, placement);

        let pad = self.geometries.add(cuboid(3.0, 0.02, 2.4));
        self.mesh(
            root,
            Transform::from_xyz(0.0, 0.01, 0.0),
            pad,
            MaterialInstance::flat(srgb(0x1e3a8a)),
        );

        let body = self.geometries.add(cuboid(1.0, 0.4, 1.6));
        self.mesh(
            root,
            Transform::from_xyz(0.0, 0.2, 0.0),
            body,
            MaterialInstance::flat(srgb(0x111111)),
        );

        // RGB side strips; the animator mirrors their color into the
        // emissive channel so they read as lit.
        let strip = self.geometries.add(cuboid(0.02, 0.3, 1.4));
        for (index, x) in [-0.51f32, 0.51].iter().enumerate() {
            self.mesh(
                root,
                Transform::from_xyz(*x, 0.2, 0.0),
                strip,
                MaterialInstance::animated_strip(index as u32),
            );
        }

        let button = self.geometries.add(cuboid(0.5, 0.12, 0.6));
        for x in [-0.25, 0.25] {
            self.mesh(
                root,
                Transform::from_xyz(x, 0.35, -0.4),
                button,
                MaterialInstance::flat(srgb(0x222222)),
            );
        }

        let wheel = self.geometries.add(cylinder(0.07, 0.07, 0.25, 12));
        self.mesh(
            root,
            Transform::from_xyz(0.0, 0.42, -0.4)
                .with_rotation(Quat::from_rotation_x(std::f32::consts::FRAC_PI_2)),
            wheel,
            MaterialInstance::flat(srgb(0x444444)),
        );

        let cable = self.geometries.add(cylinder(0.04, 0.04, 0.5, 8));
        self.mesh(
            root,
            Transform::from_xyz(0.0, 0.35, 0.8),
            cable,
            MaterialInstance::flat(srgb(0x222222)),
        );

        root
    }

    pub fn speakers(&mut self, parent: NodeId, placement: &PartPlacement) -> NodeId {
        let root = self.part_root(parent, PART_SPEAKERS, placement);

        let cabinet = self.geometries.add(cuboid(0.8, 2.0, 0.8));
        let ring = self.geometries.add(cylinder(0.3, 0.3, 0.02, 32));
        let cone = self.geometries.add(cylinder(0.28, 0.15, 0.1, 32));
        let cap = self.geometries.add(cylinder(0.05, 0.05, 0.02, 32));
        let tweeter = self.geometries.add(cylinder(0.1, 0.1, 0.05, 32));
        let face = Quat::from_rotation_x(std::f32::consts::FRAC_PI_2);

        for (i, x) in [-1.2f32, 1.2].iter().enumerate() {
            let side = self.group(root, Transform::from_xyz(*x, 0.0, 0.0));
            self.mesh(
                side,
                Transform::default(),
                cabinet,
                MaterialInstance::flat(srgb(0x222222)),
            );

            let driver = self.group(side, Transform::from_xyz(0.0, 0.0, 0.41));
            self.mesh(
                driver,
                Transform::default().with_rotation(face),
                ring,
                MaterialInstance::flat(srgb(0x111111)),
            );
            self.mesh(
                driver,
                Transform::from_xyz(0.0, 0.0, 0.01).with_rotation(face),
                cone,
                MaterialInstance::flat(srgb(0x000000)),
            );
            self.mesh(
                driver,
                Transform::from_xyz(0.0, 0.0, 0.06).with_rotation(face),
                cap,
                MaterialInstance::flat(srgb(0x111111)),
            );

            self.mesh(
                side,
                Transform::from_xyz(0.0, 0.6, 0.41).with_rotation(face),
                tweeter,
                MaterialInstance::flat(srgb(0x111111)),
            );

            // Volume knob and power LED on the right cabinet only.
            if i == 1 {
                self.mesh(
                    side,
                    Transform::from_xyz(0.0, -0.8, 0.41).with_rotation(face),
                    tweeter,
                    MaterialInstance::flat(srgb(0x444444)),
                );
                let led = self.geometries.add(cuboid(0.05, 0.05, 0.01));
                self.mesh(
                    side,
                    Transform::from_xyz(0.0, -0.6, 0.41),
                    led,
                    MaterialInstance::emissive(srgb(0x00ff00), 1.0),
                );
            }
        }

        root
    }

    /// Cable between monitor and tower: a tube swept along a fixed
    /// Catmull-Rom spline. Never animated, never rebuilt.
    pub fn wire(&mut self, parent: NodeId) -> NodeId {
        let root = self
            .graph
            .spawn(parent, SceneNode::empty(Transform::default()).named(PART_WIRE));

        let spline = CatmullRom::new(
            &WIRE_CONTROL_POINTS
                .iter()
                .map(|p| Vec3::from(*p))
                .collect::<Vec<_>>(),
        );
        let path = spline.sample_points(48);
        let geometry = self.geometries.add(tube(&path, 0.02, 8));
        self.mesh(
            root,
            Transform::default(),
            geometry,
            MaterialInstance {
                base_color: srgb(0x111111),
                roughness: 0.6,
                ..Default::default()
            },
        );

        root
    }

    /// Texture-gated quad, shared by the poster, the labels and the
    /// hot-spot icons.
    pub fn bitmap_quad(
        &mut self,
        parent: NodeId,
        name: &'static str,
        placement: &PartPlacement,
        size: (f32, f32),
        placeholder: [f32; 3],
        bitmap: Option<Handle<TextureData>>,
    ) -> NodeId {
        let root = self.part_root(parent, name, placement);
        let geometry = self.geometries.add(plane(size.0, size.1));
        let mut material = MaterialInstance::flat(placeholder);
        material.texture = bitmap;
        self.mesh(root, Transform::default(), geometry, material);
        root
    }
}
