use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TelematicsDisplayTransform {
    pub position: [f64; 3],
    pub rotation: [f64; 3],
    /// Width and height of the panel.
    pub size: [f64; 2],
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TelematicsDisplayPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<[f64; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<[f64; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<[f64; 2]>,
}

impl TelematicsDisplayTransform {
    pub fn merge(&mut self, patch: TelematicsDisplayPatch) {
        if let Some(position) = patch.position {
            self.position = position;
        }
        if let Some(rotation) = patch.rotation {
            self.rotation = rotation;
        }
        if let Some(size) = patch.size {
            self.size = size;
        }
    }
}

impl Default for TelematicsDisplayTransform {
    fn default() -> Self {
        Self {
            position: [-0.9, 0.4, -4.5],
            rotation: [0.0, 0.0, 0.0],
            size: [0.8, 0.45],
        }
    }
}
