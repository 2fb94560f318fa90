use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoTransform {
    pub position: [f64; 3],
    pub rotation: [f64; 3],
    pub scale: [f64; 2],
    /// Distance along the decal's own forward axis. Kept separate from
    /// `position` and combined only when the scene is projected.
    pub offset_z: f64,
    pub visible: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<[f64; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<[f64; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset_z: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

impl LogoTransform {
    pub fn merge(&mut self, patch: LogoPatch) {
        if let Some(position) = patch.position {
            self.position = position;
        }
        if let Some(rotation) = patch.rotation {
            self.rotation = rotation;
        }
        if let Some(scale) = patch.scale {
            self.scale = scale;
        }
        if let Some(offset_z) = patch.offset_z {
            self.offset_z = offset_z;
        }
        if let Some(visible) = patch.visible {
            self.visible = visible;
        }
    }
}

impl Default for LogoTransform {
    fn default() -> Self {
        Self {
            position: [0.0, 0.1, -4.0],
            rotation: [0.0, 0.0, 0.0],
            scale: [0.6, 0.3],
            offset_z: 0.01,
            visible: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_from_json_only_touches_named_fields() {
        let patch: LogoPatch = serde_json::from_str(r#"{"offsetZ": 0.25}"#).unwrap();
        let mut logo = LogoTransform::default();
        logo.merge(patch);
        assert_eq!(logo.offset_z, 0.25);
        assert_eq!(logo.scale, LogoTransform::default().scale);
        assert!(logo.visible);
    }
}
