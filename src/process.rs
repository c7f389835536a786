use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Interaction processes a transport driver may apply to a particle variant.
///
/// The batches only declare which processes apply to them; selecting and
/// running the process models is the driver's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Process {
    #[serde(rename = "PhotoelectricEffect")]
    PhotoelectricEffect,
    #[serde(rename = "ComptonScattering")]
    ComptonScattering,
}

impl Process {
    pub fn name(&self) -> &'static str {
        match self {
            Process::PhotoelectricEffect => "PhotoelectricEffect",
            Process::ComptonScattering => "ComptonScattering",
        }
    }
}

impl fmt::Display for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Process {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PhotoelectricEffect" => Ok(Process::PhotoelectricEffect),
            "ComptonScattering" => Ok(Process::ComptonScattering),
            other => Err(format!("Unknown interaction process: '{}'", other)),
        }
    }
}
