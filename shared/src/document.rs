//! Shape of the canonical configuration document.
//!
//! Every section is optional on the way in so that a document missing one
//! object can still be read and the absence reported per object. Top-level
//! keys this crate does not know about are carried through untouched.

use crate::object::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truck: Option<TruckTransform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_sensor: Option<FuelSensorTransform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telematics_display: Option<TelematicsDisplayTransform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<LogoTransform>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ConfigDocument {
    pub fn parse(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn section(&self, key: ObjectKey) -> Option<ObjectTransform> {
        match key {
            ObjectKey::Truck => self.truck.clone().map(ObjectTransform::Truck),
            ObjectKey::FuelSensor => self.fuel_sensor.clone().map(ObjectTransform::FuelSensor),
            ObjectKey::TelematicsDisplay => self
                .telematics_display
                .clone()
                .map(ObjectTransform::TelematicsDisplay),
            ObjectKey::Logo => self.logo.clone().map(ObjectTransform::Logo),
        }
    }

    pub fn set_section(&mut self, transform: ObjectTransform) {
        match transform {
            ObjectTransform::Truck(t) => self.truck = Some(t),
            ObjectTransform::FuelSensor(t) => self.fuel_sensor = Some(t),
            ObjectTransform::TelematicsDisplay(t) => self.telematics_display = Some(t),
            ObjectTransform::Logo(t) => self.logo = Some(t),
        }
    }

    /// Pretty-printed text of the whole document, ready to be pasted back over the file.
    pub fn to_pretty_string(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl From<&SceneTransforms> for ConfigDocument {
    fn from(scene: &SceneTransforms) -> Self {
        Self {
            truck: Some(scene.truck.clone()),
            fuel_sensor: Some(scene.fuel_sensor.clone()),
            telematics_display: Some(scene.telematics_display.clone()),
            logo: Some(scene.logo.clone()),
            extra: serde_json::Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"{
        "truck": { "position": [1.1, -1.1, -5.3], "rotation": [0, 0.5, 0], "scale": [1, 1, 1] },
        "telematicsDisplay": { "position": [0, 0, 0], "rotation": [0, 0, 0], "size": [1.0, 0.5] },
        "comment": "exported from the placement editor"
    }"#;

    #[test]
    fn missing_sections_are_none() {
        let document = ConfigDocument::parse(DOCUMENT).unwrap();
        assert!(document.section(ObjectKey::Truck).is_some());
        assert!(document.section(ObjectKey::Logo).is_none());
        assert!(document.section(ObjectKey::FuelSensor).is_none());
    }

    #[test]
    fn integers_read_as_floats() {
        let document = ConfigDocument::parse(DOCUMENT).unwrap();
        let truck = document.truck.unwrap();
        assert_eq!(truck.position, [1.1, -1.1, -5.3]);
        assert_eq!(truck.scale, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn unknown_keys_survive_rewrite() {
        let mut document = ConfigDocument::parse(DOCUMENT).unwrap();
        document.set_section(ObjectTransform::Logo(LogoTransform::default()));
        let text = document.to_pretty_string().unwrap();
        let reparsed = ConfigDocument::parse(&text).unwrap();
        assert_eq!(
            reparsed.extra.get("comment").and_then(|v| v.as_str()),
            Some("exported from the placement editor")
        );
        assert_eq!(reparsed.logo, Some(LogoTransform::default()));
    }

    #[test]
    fn malformed_section_fails_the_whole_document() {
        let text = r#"{ "truck": { "position": [1, 2] } }"#;
        assert!(ConfigDocument::parse(text).is_err());
    }
}
