use serde::{Deserialize, Serialize};
use std::fmt;

/// A city of the map. Some cities are harbours, on which a port can be built once.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct City {
    pub name: String,
    #[serde(default)]
    pub is_port: bool,
}

impl City {
    pub fn new(name: &str, is_port: bool) -> Self {
        Self {
            name: name.to_owned(),
            is_port,
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Top-level representation of a connection between two cities, by name.
pub type CityToCity = (String, String);
