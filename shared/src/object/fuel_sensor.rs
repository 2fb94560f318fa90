use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelSensorTransform {
    pub position: [f64; 3],
    pub rotation: [f64; 3],
    pub scale: f64,
    pub probe_length: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FuelSensorPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<[f64; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<[f64; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probe_length: Option<f64>,
}

impl FuelSensorTransform {
    pub fn merge(&mut self, patch: FuelSensorPatch) {
        if let Some(position) = patch.position {
            self.position = position;
        }
        if let Some(rotation) = patch.rotation {
            self.rotation = rotation;
        }
        if let Some(scale) = patch.scale {
            self.scale = scale;
        }
        if let Some(probe_length) = patch.probe_length {
            self.probe_length = probe_length;
        }
    }
}

impl Default for FuelSensorTransform {
    fn default() -> Self {
        Self {
            position: [0.35, -0.6, -4.2],
            rotation: [0.0, 0.0, 0.0],
            scale: 0.15,
            probe_length: 0.6,
        }
    }
}
