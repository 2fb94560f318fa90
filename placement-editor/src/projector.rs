use glam::{DMat4, DQuat, DVec3, EulerRot};
use serde::Serialize;
use shared::{ObjectKey, ObjectTransform, SceneTransforms, StorageEvent};
use std::collections::BTreeMap;

pub const PROBE_NODE: &str = "fuelSensor/probe";

/// Something that turns transforms into renderable state every time they change.
pub trait SceneProjector {
    fn project(&mut self, transform: &ObjectTransform);

    fn project_all(&mut self, scene: &SceneTransforms) {
        for key in ObjectKey::ALL.iter().copied() {
            self.project(&scene.get(key));
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderNode {
    pub world: DMat4,
    pub visible: bool,
}

impl RenderNode {
    pub fn translation(&self) -> DVec3 {
        self.world.w_axis.truncate()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectedNode {
    pub name: String,
    /// Column-major world matrix.
    pub world: [f64; 16],
    pub visible: bool,
}

/// World matrices for every object, keyed by node name.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    nodes: BTreeMap<&'static str, RenderNode>,
}

impl SceneGraph {
    pub fn node(&self, name: &str) -> Option<&RenderNode> {
        self.nodes.get(name)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Projects the transform carried by a storage event, if it is one.
    pub fn apply_event(&mut self, event: &StorageEvent) -> Option<ObjectKey> {
        let key = ObjectKey::from_storage_slot(&event.key)?;
        let transform = ObjectTransform::from_json(key, event.new_value.as_deref()?).ok()?;
        self.project(&transform);
        Some(key)
    }

    pub fn to_nodes(&self) -> Vec<ProjectedNode> {
        self.nodes
            .iter()
            .map(|(name, node)| ProjectedNode {
                name: name.to_string(),
                world: node.world.to_cols_array(),
                visible: node.visible,
            })
            .collect()
    }
}

impl SceneProjector for SceneGraph {
    fn project(&mut self, transform: &ObjectTransform) {
        match transform {
            ObjectTransform::Truck(truck) => {
                let world = compose(truck.position, truck.rotation, DVec3::from(truck.scale));
                self.nodes.insert("truck", RenderNode { world, visible: true });
            }
            ObjectTransform::FuelSensor(sensor) => {
                let world = compose(sensor.position, sensor.rotation, DVec3::splat(sensor.scale));
                // The probe hangs below the sensor head and stretches with its length.
                let probe = DMat4::from_scale_rotation_translation(
                    DVec3::new(1.0, sensor.probe_length, 1.0),
                    DQuat::IDENTITY,
                    DVec3::new(0.0, -sensor.probe_length / 2.0, 0.0),
                );
                self.nodes.insert("fuelSensor", RenderNode { world, visible: true });
                self.nodes.insert(
                    PROBE_NODE,
                    RenderNode {
                        world: world * probe,
                        visible: true,
                    },
                );
            }
            ObjectTransform::TelematicsDisplay(display) => {
                let scale = DVec3::new(display.size[0], display.size[1], 1.0);
                let world = compose(display.position, display.rotation, scale);
                self.nodes
                    .insert("telematicsDisplay", RenderNode { world, visible: true });
            }
            ObjectTransform::Logo(logo) => {
                let rotation = euler(logo.rotation);
                let position =
                    DVec3::from(logo.position) + rotation * (DVec3::Z * logo.offset_z);
                let world = DMat4::from_scale_rotation_translation(
                    DVec3::new(logo.scale[0], logo.scale[1], 1.0),
                    rotation,
                    position,
                );
                self.nodes.insert(
                    "logo",
                    RenderNode {
                        world,
                        visible: logo.visible,
                    },
                );
            }
        }
    }
}

fn euler(rotation: [f64; 3]) -> DQuat {
    DQuat::from_euler(EulerRot::XYZ, rotation[0], rotation[1], rotation[2])
}

fn compose(position: [f64; 3], rotation: [f64; 3], scale: DVec3) -> DMat4 {
    DMat4::from_scale_rotation_translation(scale, euler(rotation), DVec3::from(position))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{FuelSensorTransform, LogoTransform};
    use std::f64::consts::FRAC_PI_2;

    fn close(a: DVec3, b: DVec3) -> bool {
        (a - b).length() < 1e-9
    }

    #[test]
    fn logo_offset_follows_its_own_forward_axis() {
        let mut scene = SceneGraph::default();
        scene.project(&ObjectTransform::Logo(LogoTransform {
            position: [1.0, 2.0, 3.0],
            rotation: [0.0, FRAC_PI_2, 0.0],
            scale: [1.0, 1.0],
            offset_z: 0.5,
            visible: true,
        }));
        let logo = scene.node("logo").unwrap();
        // Quarter turn about +Y maps local +Z onto world +X.
        assert!(close(logo.translation(), DVec3::new(1.5, 2.0, 3.0)));
    }

    #[test]
    fn hidden_logo_is_projected_but_invisible() {
        let mut scene = SceneGraph::default();
        scene.project(&ObjectTransform::Logo(LogoTransform {
            visible: false,
            ..LogoTransform::default()
        }));
        assert!(!scene.node("logo").unwrap().visible);
    }

    #[test]
    fn probe_tip_sits_probe_length_below_the_sensor() {
        let mut scene = SceneGraph::default();
        scene.project(&ObjectTransform::FuelSensor(FuelSensorTransform {
            position: [0.0, 1.0, 0.0],
            rotation: [0.0, 0.0, 0.0],
            scale: 1.0,
            probe_length: 0.8,
        }));
        let probe = scene.node(PROBE_NODE).unwrap();
        let tip = probe.world.transform_point3(DVec3::new(0.0, -0.5, 0.0));
        assert!(close(tip, DVec3::new(0.0, 0.2, 0.0)));
    }

    #[test]
    fn full_scene_produces_every_node() {
        let mut scene = SceneGraph::default();
        scene.project_all(&SceneTransforms::default());
        assert_eq!(scene.len(), 5);
        assert_eq!(scene.to_nodes().len(), 5);
    }

    #[test]
    fn storage_events_for_other_keys_are_ignored() {
        let mut scene = SceneGraph::default();
        let event = StorageEvent {
            key: "editorLastUpdate".to_string(),
            new_value: Some("123".to_string()),
        };
        assert_eq!(scene.apply_event(&event), None);
        assert!(scene.is_empty());
    }
}
