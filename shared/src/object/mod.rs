pub mod fuel_sensor;
pub mod logo;
pub mod telematics_display;
pub mod truck;

pub use fuel_sensor::*;
pub use logo::*;
pub use telematics_display::*;
pub use truck::*;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four placeable objects in the scene.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ObjectKey {
    Truck,
    FuelSensor,
    TelematicsDisplay,
    Logo,
}

impl ObjectKey {
    pub const ALL: [ObjectKey; 4] = [
        ObjectKey::Truck,
        ObjectKey::FuelSensor,
        ObjectKey::TelematicsDisplay,
        ObjectKey::Logo,
    ];

    /// Name of the section in the config document.
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKey::Truck => "truck",
            ObjectKey::FuelSensor => "fuelSensor",
            ObjectKey::TelematicsDisplay => "telematicsDisplay",
            ObjectKey::Logo => "logo",
        }
    }

    /// Storage slot the mirrored transform is written to.
    pub fn storage_slot(&self) -> &'static str {
        match self {
            ObjectKey::Truck => "truckTransform",
            ObjectKey::FuelSensor => "fuelSensorTransform",
            ObjectKey::TelematicsDisplay => "telematicsDisplayTransform",
            ObjectKey::Logo => "logoTransform",
        }
    }

    pub fn from_storage_slot(slot: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|key| key.storage_slot() == slot)
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownObjectKey(pub String);

impl fmt::Display for UnknownObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown object \"{}\" (expected truck, fuelSensor, telematicsDisplay or logo)",
            self.0
        )
    }
}

impl std::error::Error for UnknownObjectKey {}

impl FromStr for ObjectKey {
    type Err = UnknownObjectKey;

    // Accepts the document name as well as the kebab/snake spellings typed in a console.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "truck" => Ok(ObjectKey::Truck),
            "fuelsensor" | "sensor" => Ok(ObjectKey::FuelSensor),
            "telematicsdisplay" | "display" => Ok(ObjectKey::TelematicsDisplay),
            "logo" => Ok(ObjectKey::Logo),
            _ => Err(UnknownObjectKey(s.to_string())),
        }
    }
}

/// The full transform of a single object, tagged by which object it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ObjectTransform {
    Truck(TruckTransform),
    FuelSensor(FuelSensorTransform),
    TelematicsDisplay(TelematicsDisplayTransform),
    Logo(LogoTransform),
}

impl ObjectTransform {
    pub fn key(&self) -> ObjectKey {
        match self {
            ObjectTransform::Truck(_) => ObjectKey::Truck,
            ObjectTransform::FuelSensor(_) => ObjectKey::FuelSensor,
            ObjectTransform::TelematicsDisplay(_) => ObjectKey::TelematicsDisplay,
            ObjectTransform::Logo(_) => ObjectKey::Logo,
        }
    }

    /// The untagged JSON shape has no discriminator, so the key has to be supplied.
    pub fn from_value(key: ObjectKey, value: serde_json::Value) -> serde_json::Result<Self> {
        Ok(match key {
            ObjectKey::Truck => ObjectTransform::Truck(serde_json::from_value(value)?),
            ObjectKey::FuelSensor => ObjectTransform::FuelSensor(serde_json::from_value(value)?),
            ObjectKey::TelematicsDisplay => {
                ObjectTransform::TelematicsDisplay(serde_json::from_value(value)?)
            }
            ObjectKey::Logo => ObjectTransform::Logo(serde_json::from_value(value)?),
        })
    }

    pub fn from_json(key: ObjectKey, json: &str) -> serde_json::Result<Self> {
        Self::from_value(key, serde_json::from_str(json)?)
    }

    pub fn to_value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }

    pub fn position(&self) -> [f64; 3] {
        match self {
            ObjectTransform::Truck(t) => t.position,
            ObjectTransform::FuelSensor(t) => t.position,
            ObjectTransform::TelematicsDisplay(t) => t.position,
            ObjectTransform::Logo(t) => t.position,
        }
    }

    pub fn rotation(&self) -> [f64; 3] {
        match self {
            ObjectTransform::Truck(t) => t.rotation,
            ObjectTransform::FuelSensor(t) => t.rotation,
            ObjectTransform::TelematicsDisplay(t) => t.rotation,
            ObjectTransform::Logo(t) => t.rotation,
        }
    }

    pub fn fallback(key: ObjectKey) -> Self {
        match key {
            ObjectKey::Truck => ObjectTransform::Truck(TruckTransform::default()),
            ObjectKey::FuelSensor => ObjectTransform::FuelSensor(FuelSensorTransform::default()),
            ObjectKey::TelematicsDisplay => {
                ObjectTransform::TelematicsDisplay(TelematicsDisplayTransform::default())
            }
            ObjectKey::Logo => ObjectTransform::Logo(LogoTransform::default()),
        }
    }
}

/// A partial update for one object. Absent fields are left untouched, present
/// arrays replace the stored array as a whole.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ObjectPatch {
    Truck(TruckPatch),
    FuelSensor(FuelSensorPatch),
    TelematicsDisplay(TelematicsDisplayPatch),
    Logo(LogoPatch),
}

impl ObjectPatch {
    pub fn key(&self) -> ObjectKey {
        match self {
            ObjectPatch::Truck(_) => ObjectKey::Truck,
            ObjectPatch::FuelSensor(_) => ObjectKey::FuelSensor,
            ObjectPatch::TelematicsDisplay(_) => ObjectKey::TelematicsDisplay,
            ObjectPatch::Logo(_) => ObjectKey::Logo,
        }
    }

    pub fn from_value(key: ObjectKey, value: serde_json::Value) -> serde_json::Result<Self> {
        Ok(match key {
            ObjectKey::Truck => ObjectPatch::Truck(serde_json::from_value(value)?),
            ObjectKey::FuelSensor => ObjectPatch::FuelSensor(serde_json::from_value(value)?),
            ObjectKey::TelematicsDisplay => {
                ObjectPatch::TelematicsDisplay(serde_json::from_value(value)?)
            }
            ObjectKey::Logo => ObjectPatch::Logo(serde_json::from_value(value)?),
        })
    }
}

/// The in-memory state of every object at once.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneTransforms {
    pub truck: TruckTransform,
    pub fuel_sensor: FuelSensorTransform,
    pub telematics_display: TelematicsDisplayTransform,
    pub logo: LogoTransform,
}

impl SceneTransforms {
    pub fn get(&self, key: ObjectKey) -> ObjectTransform {
        match key {
            ObjectKey::Truck => ObjectTransform::Truck(self.truck.clone()),
            ObjectKey::FuelSensor => ObjectTransform::FuelSensor(self.fuel_sensor.clone()),
            ObjectKey::TelematicsDisplay => {
                ObjectTransform::TelematicsDisplay(self.telematics_display.clone())
            }
            ObjectKey::Logo => ObjectTransform::Logo(self.logo.clone()),
        }
    }

    pub fn set(&mut self, transform: ObjectTransform) {
        match transform {
            ObjectTransform::Truck(t) => self.truck = t,
            ObjectTransform::FuelSensor(t) => self.fuel_sensor = t,
            ObjectTransform::TelematicsDisplay(t) => self.telematics_display = t,
            ObjectTransform::Logo(t) => self.logo = t,
        }
    }

    pub fn merge(&mut self, patch: ObjectPatch) -> ObjectTransform {
        let key = patch.key();
        match patch {
            ObjectPatch::Truck(p) => self.truck.merge(p),
            ObjectPatch::FuelSensor(p) => self.fuel_sensor.merge(p),
            ObjectPatch::TelematicsDisplay(p) => self.telematics_display.merge(p),
            ObjectPatch::Logo(p) => self.logo.merge(p),
        }
        self.get(key)
    }
}
