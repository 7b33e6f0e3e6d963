use crate::config::VizConfig;
use anyhow::{anyhow, bail, Context, Result};
use bonfire_graph::{
    compute_weights, enrich, load_or_unavailable, neighbors, GraphData, GraphSource,
    JsonFileSource, NodeGroup, StaticSource, WeightedNode,
};
use bonfire_layout::{compute_layout, LayoutContext, LayoutOutput};
use bonfire_protocol::{
    CloudSettingsPatch, SessionPatch, SessionState, ViewMode, ViewSettings, ViewSettingsPatch,
};
use bonfire_session::{SessionBackend, SessionHub};
use bonfire_sync::{
    AutoPlayDriver, AutoPlaySetup, AutoPlayStatus, PollerHealth, RemoteController, SessionPoller,
};
use log::{info, warn};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time;

/// Configured graph file, or the built-in sample
pub fn load_graph(config: &VizConfig) -> Result<GraphData> {
    let source: Box<dyn GraphSource> = match &config.graph.path {
        Some(path) => Box::new(JsonFileSource::new(path)),
        None => Box::new(StaticSource::sample()),
    };
    let graph = load_or_unavailable(source.as_ref())
        .ok_or_else(|| anyhow!("graph unavailable from {}", source.describe()))?;
    Ok(enrich(graph))
}

pub fn weights(graph: &GraphData, filter: &[NodeGroup]) -> Vec<WeightedNode> {
    compute_weights(graph, filter)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NeighborReport {
    pub node_id: String,
    pub neighbors: Vec<String>,
}

pub fn neighbor_report(graph: &GraphData, node_id: &str) -> Result<NeighborReport> {
    if !graph.contains(node_id) {
        bail!("unknown node: {node_id}");
    }
    Ok(NeighborReport {
        node_id: node_id.to_string(),
        neighbors: neighbors(graph, node_id),
    })
}

#[derive(Debug, Clone, Default)]
pub struct LayoutRequest {
    pub view: ViewMode,
    pub selected: Option<String>,
    pub filter: Vec<NodeGroup>,
    pub canvas: Option<f64>,
    pub seed: Option<u64>,
}

pub fn layout(graph: &GraphData, request: &LayoutRequest) -> LayoutOutput {
    let selected = request.selected.as_deref().filter(|id| {
        let known = graph.contains(id);
        if !known {
            warn!("Selected node {id} is not in the graph; laying out without it");
        }
        known
    });

    let nodes = compute_weights(graph, &request.filter);
    let mut ctx = LayoutContext::new().with_selection(selected);
    if let Some(side) = request.canvas {
        ctx = ctx.with_canvas(side);
    }
    if let Some(seed) = request.seed {
        ctx = ctx.with_seed(seed);
    }
    compute_layout(
        request.view,
        &nodes,
        &graph.edges,
        &ctx,
        &ViewSettings::default(),
    )
}

#[derive(Debug, Clone)]
pub struct SimulateOptions {
    pub session_id: String,
    /// Auto-play step for the run, in milliseconds
    pub cycle_ms: u64,
    /// Auto-play steps to let the viewer take before the remote acts
    pub steps: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationReport {
    pub session_id: String,
    pub remote_actions: Vec<String>,
    pub path_id: String,
    pub exported_path: String,
    pub final_state: SessionState,
    pub auto_play: AutoPlayStatus,
    pub viewer: PollerHealth,
    pub remote: PollerHealth,
}

/// Run a viewer and a scripted remote against one in-process session.
///
/// The viewer polls and auto-plays for `steps` cycles; then the remote stops
/// auto-play, walks two neighbors, steps back, zooms in and saves the path.
pub async fn simulate(
    graph: GraphData,
    config: &VizConfig,
    options: &SimulateOptions,
) -> Result<SimulationReport> {
    let sync = config.sync_config();
    let session_id = options.session_id.as_str();
    let hub = SessionHub::new(config.store_config());
    let backend: Arc<dyn SessionBackend> = Arc::new(hub.clone());

    let cycle_ms = options.cycle_ms.max(1);
    hub.create_session(session_id).await?;
    let tuning = SessionPatch {
        view_settings: Some(ViewSettingsPatch {
            cloud: Some(CloudSettingsPatch {
                cycle_interval: Some(cycle_ms),
                ..CloudSettingsPatch::default()
            }),
            ..ViewSettingsPatch::default()
        }),
        ..SessionPatch::default()
    };
    hub.patch_session(session_id, &tuning).await?;

    let poller = SessionPoller::start(Arc::clone(&backend), session_id, sync.viewer_poll);
    let mut states = poller.state_stream();
    states
        .wait_for(Option::is_some)
        .await
        .context("viewer poller stopped before the first poll")?;

    let order = compute_weights(&graph, &[]);
    let graph = Arc::new(graph);
    let driver = AutoPlayDriver::start(
        AutoPlaySetup {
            backend: Arc::clone(&backend),
            session_id: session_id.to_string(),
            graph: graph.as_ref().clone(),
            order,
            manual_pause: sync.manual_pause,
        },
        poller.state_stream(),
    );

    let cycle = Duration::from_millis(cycle_ms);
    time::sleep(cycle * options.steps.max(1) + cycle / 2).await;
    info!("Viewer took {} auto-play steps", driver.status().steps);

    let mut remote = RemoteController::new(Arc::clone(&backend), session_id, graph, &sync);
    let mut actions = Vec::new();

    let playing = remote.toggle_auto_play().await?;
    actions.push(format!("autoPlay {playing}"));
    for _ in 0..2 {
        let next = remote.next_neighbor().await?;
        actions.push(format!("next {next}"));
    }
    let back = remote.previous_node().await?;
    actions.push(format!("back {back}"));
    if let Some(zoom) = remote.zoom_in().await? {
        actions.push(format!("zoom {zoom:?}"));
    }
    let path_id = remote.save_path().await?;
    actions.push(format!("saved {path_id}"));
    let exported_path = remote.export_path().await?;

    let final_state = backend.get_session(session_id).await?;
    let report = SimulationReport {
        session_id: session_id.to_string(),
        remote_actions: actions,
        path_id,
        exported_path,
        final_state,
        auto_play: driver.status(),
        viewer: poller.health_snapshot(),
        remote: remote.poll_health(),
    };

    driver.shutdown().await;
    poller.shutdown().await;
    remote.shutdown().await;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bonfire_graph::sample_graph;
    use bonfire_protocol::ZoomState;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_load_graph_defaults_to_sample() {
        let graph = load_graph(&VizConfig::default()).unwrap();
        assert_eq!(graph.nodes.len(), 18);
        assert!(graph.nodes.iter().all(|n| n.weight.is_some()));
    }

    #[test]
    fn test_load_graph_from_file_and_missing_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"nodes":[{{"id":"a","label":"A","group":"actor"}},{{"id":"t","label":"T","group":"tag"}}],
                "edges":[{{"source":"a","target":"t"}}]}}"#
        )
        .unwrap();

        let mut config = VizConfig::default();
        config.graph.path = Some(file.path().to_path_buf());
        let graph = load_graph(&config).unwrap();
        assert_eq!(graph.nodes.len(), 2);

        config.graph.path = Some(file.path().with_extension("gone"));
        let err = load_graph(&config).unwrap_err();
        assert!(err.to_string().contains("graph unavailable"));
    }

    #[test]
    fn test_neighbor_report_rejects_unknown_node() {
        let graph = sample_graph();
        let report = neighbor_report(&graph, "tag:governance").unwrap();
        assert_eq!(
            report.neighbors,
            vec!["activity:101", "activity:102", "activity:105"]
        );
        assert!(neighbor_report(&graph, "tag:nope").is_err());
    }

    #[test]
    fn test_layout_ignores_unknown_selection() {
        let graph = sample_graph();
        let request = LayoutRequest {
            view: ViewMode::Cloud,
            selected: Some("actor:404".into()),
            seed: Some(3),
            ..LayoutRequest::default()
        };
        let with_unknown = layout(&graph, &request);
        let plain = layout(
            &graph,
            &LayoutRequest {
                selected: None,
                ..request
            },
        );
        assert_eq!(with_unknown.items(), plain.items());
        assert_eq!(plain.items().len(), graph.nodes.len());
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulate_runs_viewer_and_remote() {
        let options = SimulateOptions {
            session_id: "demo".into(),
            cycle_ms: 1_000,
            steps: 2,
        };
        let report = simulate(sample_graph(), &VizConfig::default(), &options)
            .await
            .unwrap();

        assert!(report.auto_play.steps >= 2);
        assert!(!report.final_state.auto_play);
        assert_eq!(report.final_state.zoom_state, ZoomState::Cluster);
        assert_eq!(report.exported_path, report.final_state.path.join("\n"));
        assert_eq!(report.remote_actions.len(), 6);
        assert_eq!(report.viewer.consecutive_failures, 0);
    }
}
