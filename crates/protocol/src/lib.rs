//! Shared wire types for viewer and remote sessions.
//!
//! Field names serialize in camelCase to match existing clients.

mod session;
mod view;

pub use session::{SavedPath, SessionPatch, SessionState, ZoomState};
pub use view::{
    AnimatedSettings, AnimatedSettingsPatch, BubbleSettings, BubbleSettingsPatch, CloudSettings,
    CloudSettingsPatch, ForceSettings, ForceSettingsPatch, HeatmapSettings, HeatmapSettingsPatch,
    NoSettings, TreeSettings, TreeSettingsPatch, ViewConfig, ViewMode, ViewSettings,
    ViewSettingsPatch, WordCloudSettings, WordCloudSettingsPatch,
};
