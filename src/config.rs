use crate::model::Weather;

/// Tunable game rules. Every field has a default, so a partial JSON document
/// is a valid configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub luck_max: i32,
    pub capture_threshold: u32,
    pub repair_hp: u32,
    pub income_per_property: u32,
    pub seed: u64,
    pub default_weather: Weather,
}

impl Default for Rules {
    fn default() -> Rules {
        Rules {
            luck_max: 10,
            capture_threshold: 20,
            repair_hp: 2,
            income_per_property: 1000,
            seed: 0,
            default_weather: Weather::Clear,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Rules parse error")]
    Parse(#[from] serde_json::Error),
}

impl Rules {
    pub fn from_json(data: &str) -> Result<Rules, ConfigError> {
        Ok(serde_json::from_str(data)?)
    }
}
