use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Topology of the simulation domain.
///
/// The same mode drives both the distance metric used while forces are
/// accumulated and the rule applied to positions after they move, so it is
/// read once per tick and never changes mid-tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BoundaryMode {
    /// Toroidal `[0, 1)` square; distances use the minimum image.
    #[default]
    Wrap,
    /// Reflective `[0, 1]` square with an inelastic bounce.
    Closed,
    /// Unbounded plane.
    Infinite,
}

impl BoundaryMode {
    pub const ALL: [BoundaryMode; 3] = [Self::Wrap, Self::Closed, Self::Infinite];

    /// True when cell coordinates and displacements fold around the unit torus.
    #[inline]
    pub fn is_toroidal(self) -> bool {
        matches!(self, Self::Wrap)
    }

    /// Next mode in display order, used by keyboard toggles.
    pub fn cycle(self) -> Self {
        match self {
            Self::Wrap => Self::Closed,
            Self::Closed => Self::Infinite,
            Self::Infinite => Self::Wrap,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Wrap => "wrap",
            Self::Closed => "closed",
            Self::Infinite => "infinite",
        }
    }
}

impl fmt::Display for BoundaryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BoundaryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "wrap" | "torus" | "toroidal" => Ok(Self::Wrap),
            "closed" | "walls" | "bounce" => Ok(Self::Closed),
            "infinite" | "unbounded" | "open" => Ok(Self::Infinite),
            other => Err(format!("unknown boundary mode '{other}'")),
        }
    }
}
