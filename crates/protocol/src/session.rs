use crate::view::{ViewMode, ViewSettings, ViewSettingsPatch};
use serde::{Deserialize, Serialize};

/// Coarse zoom level stepped by remote controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomState {
    #[default]
    Overview,
    Cluster,
    Detail,
}

impl ZoomState {
    pub const LEVELS: [Self; 3] = [Self::Overview, Self::Cluster, Self::Detail];

    /// One level closer, saturating at `Detail`
    #[must_use]
    pub const fn zoom_in(self) -> Self {
        match self {
            Self::Overview => Self::Cluster,
            Self::Cluster | Self::Detail => Self::Detail,
        }
    }

    /// One level further out, saturating at `Overview`
    #[must_use]
    pub const fn zoom_out(self) -> Self {
        match self {
            Self::Detail => Self::Cluster,
            Self::Cluster | Self::Overview => Self::Overview,
        }
    }
}

/// Authoritative shared state of one viewing session.
///
/// `updated_at` is a change token in unix milliseconds; clients compare it
/// for inequality only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_node_id: Option<String>,
    #[serde(default)]
    pub highlighted_node_ids: Vec<String>,
    #[serde(default)]
    pub view_mode: ViewMode,
    #[serde(default)]
    pub view_settings: ViewSettings,
    #[serde(default)]
    pub zoom_state: ZoomState,
    pub auto_play: bool,
    #[serde(default)]
    pub path: Vec<String>,
    pub updated_at: u64,
}

impl SessionState {
    #[must_use]
    pub fn new(updated_at: u64) -> Self {
        Self {
            selected_node_id: None,
            highlighted_node_ids: Vec::new(),
            view_mode: ViewMode::default(),
            view_settings: ViewSettings::default(),
            zoom_state: ZoomState::default(),
            auto_play: true,
            path: Vec::new(),
            updated_at,
        }
    }

    /// Merge `patch` into this state.
    ///
    /// Scalars are last-write-wins and view settings merge two levels deep.
    /// A selection that differs from the current one is appended to `path`;
    /// an empty selection id clears the selection without touching `path`.
    /// Returns whether the selection changed. `updated_at` is left to the
    /// caller.
    pub fn apply(&mut self, patch: &SessionPatch) -> bool {
        let mut selection_changed = false;

        if let Some(selected) = &patch.selected_node_id {
            if selected.is_empty() {
                selection_changed = self.selected_node_id.take().is_some();
            } else if self.selected_node_id.as_deref() != Some(selected.as_str()) {
                self.selected_node_id = Some(selected.clone());
                self.path.push(selected.clone());
                selection_changed = true;
            }
        }
        if let Some(ids) = &patch.highlighted_node_ids {
            self.highlighted_node_ids.clone_from(ids);
        }
        if let Some(mode) = patch.view_mode {
            self.view_mode = mode;
        }
        if let Some(settings) = &patch.view_settings {
            self.view_settings.apply(settings);
        }
        if let Some(zoom) = patch.zoom_state {
            self.zoom_state = zoom;
        }
        if let Some(auto_play) = patch.auto_play {
            self.auto_play = auto_play;
        }

        selection_changed
    }
}

/// Partial update of a [`SessionState`]; absent fields are left alone
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPatch {
    /// `Some("")` clears the selection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_node_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlighted_node_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_mode: Option<ViewMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_settings: Option<ViewSettingsPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom_state: Option<ZoomState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_play: Option<bool>,
}

impl SessionPatch {
    #[must_use]
    pub fn select(node_id: impl Into<String>) -> Self {
        Self {
            selected_node_id: Some(node_id.into()),
            ..Self::default()
        }
    }

    /// Clear selection and highlights
    #[must_use]
    pub fn clear_selection() -> Self {
        Self {
            selected_node_id: Some(String::new()),
            highlighted_node_ids: Some(Vec::new()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_highlights(mut self, ids: Vec<String>) -> Self {
        self.highlighted_node_ids = Some(ids);
        self
    }

    #[must_use]
    pub fn auto_play(enabled: bool) -> Self {
        Self {
            auto_play: Some(enabled),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn zoom(zoom: ZoomState) -> Self {
        Self {
            zoom_state: Some(zoom),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn view_mode(mode: ViewMode) -> Self {
        Self {
            view_mode: Some(mode),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Immutable snapshot of a session's selection history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedPath {
    pub path_id: String,
    pub session_id: String,
    pub path: Vec<String>,
}

impl SavedPath {
    /// Newline-separated node ids
    #[must_use]
    pub fn export(&self) -> String {
        self.path.join("\n")
    }
}
