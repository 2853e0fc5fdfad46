use crate::CONFY_APP_NAME;
use crate::error::SettingsError;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackballSettings {
    /// Radius of the virtual sphere in normalized screen units.
    pub radius: f32,
    pub default_translation: [f32; 3],
    /// Factor applied per wheel notch or zoom key press.
    pub zoom_step: f32,
}

impl Default for TrackballSettings {
    fn default() -> Self {
        Self {
            radius: 0.8,
            default_translation: [0.0, 0.0, -4.0],
            zoom_step: 1.1,
        }
    }
}

impl TrackballSettings {
    pub fn load() -> Self {
        load_or_default::<Self>("trackball").sanitized()
    }

    pub fn try_load() -> Result<Self, SettingsError> {
        try_load::<Self>("trackball").map(Self::sanitized)
    }

    /// Replace a non-positive radius or zoom step with the default.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.radius.is_finite() && self.radius > 0.0) {
            log::warn!("trackball radius {} is not positive, using {}", self.radius, defaults.radius);
            self.radius = defaults.radius;
        }
        if !(self.zoom_step.is_finite() && self.zoom_step > 0.0) {
            log::warn!("zoom step {} is not positive, using {}", self.zoom_step, defaults.zoom_step);
            self.zoom_step = defaults.zoom_step;
        }
        self
    }

    pub fn save(&self) -> Result<(), SettingsError> {
        store("trackball", self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlySettings {
    pub speed: f32,
    pub default_translation: [f32; 3],
}

impl Default for FlySettings {
    fn default() -> Self {
        Self {
            speed: 0.05,
            default_translation: [0.0, 0.0, -2.0],
        }
    }
}

impl FlySettings {
    pub fn load() -> Self {
        load_or_default("fly")
    }

    pub fn try_load() -> Result<Self, SettingsError> {
        try_load("fly")
    }

    pub fn save(&self) -> Result<(), SettingsError> {
        store("fly", self)
    }
}

// Aggregate struct for convenience
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub trackball: TrackballSettings,
    pub fly: FlySettings,
}

impl Settings {
    pub fn load() -> Self {
        Self {
            trackball: TrackballSettings::load(),
            fly: FlySettings::load(),
        }
    }

    pub fn save(&self) -> Result<(), SettingsError> {
        self.trackball.save()?;
        self.fly.save()
    }
}

fn try_load<T>(name: &'static str) -> Result<T, SettingsError>
where
    T: Serialize + for<'de> Deserialize<'de> + Default,
{
    confy::load(CONFY_APP_NAME, name).map_err(|source| SettingsError::Load { name, source })
}

fn load_or_default<T>(name: &'static str) -> T
where
    T: Serialize + for<'de> Deserialize<'de> + Default,
{
    try_load(name).unwrap_or_else(|err| {
        log::warn!("{err}, using defaults");
        T::default()
    })
}

fn store<T: Serialize>(name: &'static str, value: &T) -> Result<(), SettingsError> {
    confy::store(CONFY_APP_NAME, name, value).map_err(|source| SettingsError::Store { name, source })
}
