use crate::bridge::PersistenceBridge;
use log::warn;
use shared::{ObjectKey, ObjectPatch, ObjectTransform, SceneTransforms};

/// The single owner of every object's current transform.
///
/// Starts out with the built-in fallback values; all changes go through
/// [`TransformStore::update`] or [`TransformStore::replace_all`], and each of
/// them is mirrored through the bridge.
pub struct TransformStore {
    transforms: SceneTransforms,
    bridge: PersistenceBridge,
}

impl TransformStore {
    pub fn new(bridge: PersistenceBridge) -> Self {
        Self {
            transforms: SceneTransforms::default(),
            bridge,
        }
    }

    pub fn get(&self, key: ObjectKey) -> ObjectTransform {
        self.transforms.get(key)
    }

    pub fn snapshot(&self) -> &SceneTransforms {
        &self.transforms
    }

    /// Merges the fields present in `patch`. Array fields are replaced whole.
    pub fn update(&mut self, patch: ObjectPatch) -> ObjectTransform {
        let transform = self.transforms.merge(patch);
        self.mirror(&transform);
        transform
    }

    pub fn replace_all(&mut self, transform: ObjectTransform) {
        self.transforms.set(transform.clone());
        self.mirror(&transform);
    }

    pub fn bridge(&self) -> &PersistenceBridge {
        &self.bridge
    }

    pub fn bridge_mut(&mut self) -> &mut PersistenceBridge {
        &mut self.bridge
    }

    fn mirror(&mut self, transform: &ObjectTransform) {
        let key = transform.key();
        if let Err(e) = self.bridge.mirror(key, transform) {
            warn!("Mirroring {} failed, the change only lives in memory: {}", key, e);
        }
    }
}
