use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which visualization a viewer is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    List,
    #[default]
    Cloud,
    #[serde(rename = "d3cloud")]
    WordCloud,
    Animated,
    Tree,
    Force,
    Bubble,
    Heatmap,
    Pie,
}

impl ViewMode {
    pub const ALL: [Self; 9] = [
        Self::List,
        Self::Cloud,
        Self::WordCloud,
        Self::Animated,
        Self::Tree,
        Self::Force,
        Self::Bubble,
        Self::Heatmap,
        Self::Pie,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Cloud => "cloud",
            Self::WordCloud => "d3cloud",
            Self::Animated => "animated",
            Self::Tree => "tree",
            Self::Force => "force",
            Self::Bubble => "bubble",
            Self::Heatmap => "heatmap",
            Self::Pie => "pie",
        }
    }

    /// Views that run the auto-play selection cycle
    #[must_use]
    pub const fn cycles(self) -> bool {
        matches!(self, Self::Cloud | Self::Animated)
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown view mode: {s}"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ForceSettings {
    pub link_distance: f64,
    pub charge_strength: f64,
    pub min_radius: f64,
    pub max_radius: f64,
    pub show_labels: bool,
}

impl Default for ForceSettings {
    fn default() -> Self {
        Self {
            link_distance: 80.0,
            charge_strength: -120.0,
            min_radius: 5.0,
            max_radius: 20.0,
            show_labels: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CloudSettings {
    pub min_font: f64,
    pub max_font: f64,
    /// Auto-play step in milliseconds
    pub cycle_interval: u64,
    /// Idle ring rotation in radians per second
    pub rotation_speed: f64,
}

impl Default for CloudSettings {
    fn default() -> Self {
        Self {
            min_font: 14.0,
            max_font: 52.0,
            cycle_interval: 5000,
            rotation_speed: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WordCloudSettings {
    pub min_font: f64,
    pub max_font: f64,
    pub word_padding: f64,
}

impl Default for WordCloudSettings {
    fn default() -> Self {
        Self {
            min_font: 12.0,
            max_font: 60.0,
            word_padding: 4.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnimatedSettings {
    pub min_font: f64,
    pub max_font: f64,
    pub cycle_interval: u64,
    pub word_padding: f64,
}

impl Default for AnimatedSettings {
    fn default() -> Self {
        Self {
            min_font: 12.0,
            max_font: 60.0,
            cycle_interval: 5000,
            word_padding: 4.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BubbleSettings {
    pub pack_padding: f64,
    pub show_group_labels: bool,
}

impl Default for BubbleSettings {
    fn default() -> Self {
        Self {
            pack_padding: 3.0,
            show_group_labels: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeatmapSettings {
    pub max_nodes: usize,
    pub label_margin: f64,
}

impl Default for HeatmapSettings {
    fn default() -> Self {
        Self {
            max_nodes: 40,
            label_margin: 80.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TreeSettings {
    pub min_radius: f64,
    pub max_radius: f64,
    pub show_labels: bool,
}

impl Default for TreeSettings {
    fn default() -> Self {
        Self {
            min_radius: 4.0,
            max_radius: 16.0,
            show_labels: true,
        }
    }
}

/// Views without tunables still carry an (empty) entry on the wire
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoSettings {}

/// Generates the partial form of a settings record and its merge
macro_rules! settings_patch {
    ($settings:ident => $patch:ident { $($field:ident : $ty:ty),+ $(,)? }) => {
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $patch {
            $(
                #[serde(default, skip_serializing_if = "Option::is_none")]
                pub $field: Option<$ty>,
            )+
        }

        impl $settings {
            /// Overwrite only the keys present in `patch`
            pub fn apply(&mut self, patch: &$patch) {
                $(
                    if let Some(value) = &patch.$field {
                        self.$field = value.clone();
                    }
                )+
            }
        }

        impl From<&$settings> for $patch {
            fn from(settings: &$settings) -> Self {
                Self {
                    $($field: Some(settings.$field.clone()),)+
                }
            }
        }
    };
}

settings_patch!(ForceSettings => ForceSettingsPatch {
    link_distance: f64,
    charge_strength: f64,
    min_radius: f64,
    max_radius: f64,
    show_labels: bool,
});

settings_patch!(CloudSettings => CloudSettingsPatch {
    min_font: f64,
    max_font: f64,
    cycle_interval: u64,
    rotation_speed: f64,
});

settings_patch!(WordCloudSettings => WordCloudSettingsPatch {
    min_font: f64,
    max_font: f64,
    word_padding: f64,
});

settings_patch!(AnimatedSettings => AnimatedSettingsPatch {
    min_font: f64,
    max_font: f64,
    cycle_interval: u64,
    word_padding: f64,
});

settings_patch!(BubbleSettings => BubbleSettingsPatch {
    pack_padding: f64,
    show_group_labels: bool,
});

settings_patch!(HeatmapSettings => HeatmapSettingsPatch {
    max_nodes: usize,
    label_margin: f64,
});

settings_patch!(TreeSettings => TreeSettingsPatch {
    min_radius: f64,
    max_radius: f64,
    show_labels: bool,
});

/// Settings for every view, keyed by view on the wire
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    pub force: ForceSettings,
    pub cloud: CloudSettings,
    #[serde(rename = "d3cloud")]
    pub word_cloud: WordCloudSettings,
    pub animated: AnimatedSettings,
    pub bubble: BubbleSettings,
    pub heatmap: HeatmapSettings,
    pub tree: TreeSettings,
    pub list: NoSettings,
    pub pie: NoSettings,
}

/// Borrowed settings of a single view
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewConfig<'a> {
    List,
    Cloud(&'a CloudSettings),
    WordCloud(&'a WordCloudSettings),
    Animated(&'a AnimatedSettings),
    Tree(&'a TreeSettings),
    Force(&'a ForceSettings),
    Bubble(&'a BubbleSettings),
    Heatmap(&'a HeatmapSettings),
    Pie,
}

impl ViewSettings {
    #[must_use]
    pub const fn for_mode(&self, mode: ViewMode) -> ViewConfig<'_> {
        match mode {
            ViewMode::List => ViewConfig::List,
            ViewMode::Cloud => ViewConfig::Cloud(&self.cloud),
            ViewMode::WordCloud => ViewConfig::WordCloud(&self.word_cloud),
            ViewMode::Animated => ViewConfig::Animated(&self.animated),
            ViewMode::Tree => ViewConfig::Tree(&self.tree),
            ViewMode::Force => ViewConfig::Force(&self.force),
            ViewMode::Bubble => ViewConfig::Bubble(&self.bubble),
            ViewMode::Heatmap => ViewConfig::Heatmap(&self.heatmap),
            ViewMode::Pie => ViewConfig::Pie,
        }
    }

    /// Auto-play step for views that cycle
    #[must_use]
    pub const fn cycle_interval_ms(&self, mode: ViewMode) -> Option<u64> {
        match mode {
            ViewMode::Cloud => Some(self.cloud.cycle_interval),
            ViewMode::Animated => Some(self.animated.cycle_interval),
            _ => None,
        }
    }

    /// Two-level merge: views absent from `patch` are untouched, and within a
    /// present view only the given keys change.
    pub fn apply(&mut self, patch: &ViewSettingsPatch) {
        if let Some(p) = &patch.force {
            self.force.apply(p);
        }
        if let Some(p) = &patch.cloud {
            self.cloud.apply(p);
        }
        if let Some(p) = &patch.word_cloud {
            self.word_cloud.apply(p);
        }
        if let Some(p) = &patch.animated {
            self.animated.apply(p);
        }
        if let Some(p) = &patch.bubble {
            self.bubble.apply(p);
        }
        if let Some(p) = &patch.heatmap {
            self.heatmap.apply(p);
        }
        if let Some(p) = &patch.tree {
            self.tree.apply(p);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewSettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force: Option<ForceSettingsPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud: Option<CloudSettingsPatch>,
    #[serde(rename = "d3cloud", default, skip_serializing_if = "Option::is_none")]
    pub word_cloud: Option<WordCloudSettingsPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animated: Option<AnimatedSettingsPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bubble: Option<BubbleSettingsPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heatmap: Option<HeatmapSettingsPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tree: Option<TreeSettingsPatch>,
}

impl From<&ViewSettings> for ViewSettingsPatch {
    fn from(settings: &ViewSettings) -> Self {
        Self {
            force: Some((&settings.force).into()),
            cloud: Some((&settings.cloud).into()),
            word_cloud: Some((&settings.word_cloud).into()),
            animated: Some((&settings.animated).into()),
            bubble: Some((&settings.bubble).into()),
            heatmap: Some((&settings.heatmap).into()),
            tree: Some((&settings.tree).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_view_mode_wire_names() {
        for mode in ViewMode::ALL {
            let json = serde_json::to_string(&mode).unwrap();
            assert_eq!(json, format!("\"{}\"", mode.as_str()));
            assert_eq!(mode.as_str().parse::<ViewMode>().unwrap(), mode);
        }
        assert!("radar".parse::<ViewMode>().is_err());
    }

    #[test]
    fn test_defaults_on_the_wire() {
        let json = serde_json::to_value(ViewSettings::default()).unwrap();
        assert_eq!(json["force"]["chargeStrength"], -120.0);
        assert_eq!(json["cloud"]["cycleInterval"], 5000);
        assert_eq!(json["d3cloud"]["wordPadding"], 4.0);
        assert_eq!(json["heatmap"]["maxNodes"], 40);
        assert_eq!(json["pie"], serde_json::json!({}));
    }

    #[test]
    fn test_two_level_merge() {
        let mut settings = ViewSettings::default();
        let patch: ViewSettingsPatch =
            serde_json::from_str(r#"{"force":{"linkDistance":120},"tree":{"showLabels":false}}"#)
                .unwrap();

        settings.apply(&patch);

        assert!((settings.force.link_distance - 120.0).abs() < f64::EPSILON);
        assert!((settings.force.charge_strength + 120.0).abs() < f64::EPSILON);
        assert!(!settings.tree.show_labels);
        assert_eq!(settings.cloud, CloudSettings::default());
    }

    #[test]
    fn test_full_patch_replaces_everything() {
        let mut source = ViewSettings::default();
        source.bubble.pack_padding = 9.0;
        source.heatmap.max_nodes = 12;

        let mut target = ViewSettings::default();
        target.apply(&ViewSettingsPatch::from(&source));
        assert_eq!(target, source);
    }

    #[test]
    fn test_for_mode_is_exhaustive() {
        let settings = ViewSettings::default();
        assert_eq!(settings.for_mode(ViewMode::Pie), ViewConfig::Pie);
        assert!(matches!(
            settings.for_mode(ViewMode::Heatmap),
            ViewConfig::Heatmap(h) if h.max_nodes == 40
        ));
        assert_eq!(settings.cycle_interval_ms(ViewMode::Animated), Some(5000));
        assert_eq!(settings.cycle_interval_ms(ViewMode::Force), None);
    }
}
