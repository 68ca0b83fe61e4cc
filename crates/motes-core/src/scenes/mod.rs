//! Built-in visualizations.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

pub mod accretion;
pub mod breath;
pub mod embrace;
pub mod flow;
pub mod probe;

pub use accretion::Accretion;
pub use breath::Breath;
pub use embrace::Embrace;
pub use flow::Flow;
pub use probe::Probe;

/// Name-addressable list of the built-in scenes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneKind {
    Breath,
    Embrace,
    Accretion,
    Probe,
    Flow,
}

impl SceneKind {
    pub const ALL: [SceneKind; 5] = [
        SceneKind::Breath,
        SceneKind::Embrace,
        SceneKind::Accretion,
        SceneKind::Probe,
        SceneKind::Flow,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SceneKind::Breath => "breath",
            SceneKind::Embrace => "embrace",
            SceneKind::Accretion => "accretion",
            SceneKind::Probe => "probe",
            SceneKind::Flow => "flow",
        }
    }

    pub fn summary(self) -> &'static str {
        match self {
            SceneKind::Breath => "air drawn into two lungs, squeezed into a glowing core",
            SceneKind::Embrace => "two hearts trading warm particles back and forth",
            SceneKind::Accretion => "disk matter spiralling past a containment ring into a horizon",
            SceneKind::Probe => "a probe falling into a horizon while its link telemetry spikes",
            SceneKind::Flow => "data packets climbing from running limbs to the head",
        }
    }
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SceneKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        SceneKind::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| Error::UnknownScene(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for kind in SceneKind::ALL {
            assert_eq!(kind.name().parse::<SceneKind>().unwrap(), kind);
        }
        assert_eq!(" Breath ".parse::<SceneKind>().unwrap(), SceneKind::Breath);
        assert!(matches!(
            "vortex".parse::<SceneKind>(),
            Err(Error::UnknownScene(name)) if name == "vortex"
        ));
    }
}
