use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Shape sampled when a batch of particles is placed by dragging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlacementShape {
    /// Area-uniform disk.
    #[default]
    Circle,
    /// Axis-aligned box spanned by the drag.
    Square,
    /// Segment between the drag endpoints.
    Line,
    /// Annulus between 70% and 100% of the radius.
    Ring,
}

impl PlacementShape {
    pub const ALL: [PlacementShape; 4] = [Self::Circle, Self::Square, Self::Line, Self::Ring];

    pub fn name(self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Square => "square",
            Self::Line => "line",
            Self::Ring => "ring",
        }
    }
}

impl fmt::Display for PlacementShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PlacementShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|shape| shape.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown placement shape '{s}'"))
    }
}
