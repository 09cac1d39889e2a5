use serde::{Serialize, Serializer};

use crate::error::{HeatmapError, Result};

/// Counts at or above this value share the last color.
pub const TOP_BUCKET: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorSchemeId {
    #[default]
    CosmicTwilight,
    ForestCommits,
    AutumnAccessible,
    OceanDepths,
}

impl ColorSchemeId {
    pub fn all() -> &'static [ColorSchemeId] {
        &[
            ColorSchemeId::CosmicTwilight,
            ColorSchemeId::ForestCommits,
            ColorSchemeId::AutumnAccessible,
            ColorSchemeId::OceanDepths,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorSchemeId::CosmicTwilight => "cosmic-twilight",
            ColorSchemeId::ForestCommits => "forest-commits",
            ColorSchemeId::AutumnAccessible => "autumn-accessible",
            ColorSchemeId::OceanDepths => "ocean-depths",
        }
    }
}

impl std::str::FromStr for ColorSchemeId {
    type Err = HeatmapError;

    fn from_str(s: &str) -> Result<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| HeatmapError::UnknownColorScheme(s.to_string()))
    }
}

impl std::fmt::Display for ColorSchemeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ColorSchemeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A five-step color ramp from no activity to high activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorScheme {
    pub id: ColorSchemeId,
    pub name: &'static str,
    pub colors: [&'static str; 5],
}

pub const COLOR_SCHEMES: [ColorScheme; 4] = [
    ColorScheme {
        id: ColorSchemeId::CosmicTwilight,
        name: "Cosmic Twilight",
        colors: ["#eeeeee", "#400554", "#693699", "#7c40a9", "#9570dd"],
    },
    ColorScheme {
        id: ColorSchemeId::ForestCommits,
        name: "Forest Commits",
        colors: ["#ebedf0", "#9be9a8", "#40c463", "#30a14e", "#216e39"],
    },
    ColorScheme {
        id: ColorSchemeId::AutumnAccessible,
        name: "Autumn Accessible",
        colors: ["#f7f7f7", "#fee0d2", "#fc9272", "#de2d26", "#a50f15"],
    },
    ColorScheme {
        id: ColorSchemeId::OceanDepths,
        name: "Ocean Depths",
        colors: ["#f7fbff", "#deebf7", "#9ecae1", "#4292c6", "#084594"],
    },
];

const _: () = {
    let mut i = 0;
    while i < COLOR_SCHEMES.len() {
        assert!(
            COLOR_SCHEMES[i].id as usize == i,
            "COLOR_SCHEMES must be ordered like ColorSchemeId"
        );
        i += 1;
    }
};

pub fn color_scheme(id: ColorSchemeId) -> &'static ColorScheme {
    &COLOR_SCHEMES[id as usize]
}

/// Look a scheme up by its string id. Unknown ids are an error, never a default.
pub fn color_scheme_by_id(id: &str) -> Result<&'static ColorScheme> {
    Ok(color_scheme(id.parse()?))
}

/// Counts `from..=to` render with `color`; `to: None` has no upper bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorRange {
    pub from: u32,
    pub to: Option<u32>,
    pub color: &'static str,
}

impl ColorRange {
    pub fn contains(&self, count: u32) -> bool {
        count >= self.from && !matches!(self.to, Some(to) if count > to)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorRanges {
    pub ranges: [ColorRange; 5],
}

impl ColorRanges {
    /// Color of the range holding `count`. The top range is open, so every
    /// count has one.
    pub fn color_for(&self, count: u32) -> &'static str {
        let [.., top] = &self.ranges;
        self.ranges
            .iter()
            .find(|range| range.contains(count))
            .unwrap_or(top)
            .color
    }
}

pub fn color_ranges(id: ColorSchemeId) -> ColorRanges {
    let scheme = color_scheme(id);
    let ranges = std::array::from_fn(|index| {
        let from = index as u32;
        ColorRange {
            from,
            to: (from < TOP_BUCKET).then_some(from),
            color: scheme.colors[index],
        }
    });
    ColorRanges { ranges }
}
