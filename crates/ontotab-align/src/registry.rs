//! The alignment graph registry.
//!
//! ```text
//! ┌──────────┐  get_or_create   ┌─────────────────────┐
//! │  caller  │─────────────────►│  AlignmentRegistry  │
//! └──────────┘                  │  DashMap<Key,Graph> │
//!                               └─────┬─────────┬─────┘
//!                    seeds + claims   │         │ spawns (bounded)
//!                                     ▼         ▼
//!                          ┌────────────┐   ┌────────────────────────┐
//!                          │ Alignment  │◄──│ PredictionCoordinator  │
//!                          │   Graph    │   │ (detached tokio task)  │
//!                          └─────┬──────┘   └────────────────────────┘
//!                                │ on change
//!                                ▼
//!                          ┌────────────┐
//!                          │   Savers   │
//!                          └────────────┘
//! ```
//!
//! One registry instance is shared by every caller in the process; it is an
//! explicitly constructed value, injected where needed, never a global. The
//! map gives the create-once guarantee per key; the per-graph pending claims
//! (taken inside `plan_predictions`) give the one-run-per-column guarantee.
//! Prediction runs execute on the ambient tokio runtime, throttled by a
//! semaphore sized from [`RegistryConfig`], and their join handles are kept
//! so [`AlignmentRegistry::drain_predictions`] can wait out in-flight work.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use ontotab_rep::WorksheetProvider;

use crate::error::AlignError;
use crate::graph::AlignmentGraph;
use crate::key::AlignmentKey;
use crate::ontology::OntologyContext;
use crate::predict::{
    ColumnRef, PredictionCoordinator, RunReport, RunState, SemanticTypeClassifier,
};
use crate::saver::AlignmentSaver;

/// Tuning for one registry instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Upper bound on concurrently executing prediction runs. Treated as at
    /// least 1; a zero bound would park every run forever.
    pub max_concurrent_predictions: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_concurrent_predictions: 4,
        }
    }
}

struct RegistryShared {
    graphs: DashMap<AlignmentKey, Arc<AlignmentGraph>>,
    savers: RwLock<Vec<Arc<dyn AlignmentSaver>>>,
    worksheets: Arc<dyn WorksheetProvider>,
    classifier: Arc<dyn SemanticTypeClassifier>,
    prediction_slots: Arc<Semaphore>,
    run_handles: Mutex<Vec<JoinHandle<RunReport>>>,
}

/// Cloneable handle to the process-wide graph table.
#[derive(Clone)]
pub struct AlignmentRegistry {
    shared: Arc<RegistryShared>,
}

impl AlignmentRegistry {
    pub fn new(
        worksheets: Arc<dyn WorksheetProvider>,
        classifier: Arc<dyn SemanticTypeClassifier>,
        config: RegistryConfig,
    ) -> Self {
        Self {
            shared: Arc::new(RegistryShared {
                graphs: DashMap::new(),
                savers: RwLock::new(Vec::new()),
                worksheets,
                classifier,
                prediction_slots: Arc::new(Semaphore::new(
                    config.max_concurrent_predictions.max(1),
                )),
                run_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Returns the graph for `(workspace, worksheet)`, creating it if absent.
    ///
    /// Creation seeds one column node per header path and schedules a single
    /// prediction run over the columns that have no suggestions yet; the
    /// call returns as soon as the run is spawned, never waiting for it. The
    /// same scan also runs on an existing graph, so columns added to the
    /// worksheet since the last call are picked up.
    ///
    /// The only error is an unknown worksheet, in which case nothing is
    /// created. Must be called within a tokio runtime.
    pub fn get_or_create(
        &self,
        workspace_id: &str,
        worksheet_id: &str,
        ontology: &OntologyContext,
    ) -> Result<Arc<AlignmentGraph>, AlignError> {
        // Resolve the worksheet before touching the map so an unknown id
        // cannot leave an empty graph behind.
        let paths = self.shared.worksheets.header_paths(worksheet_id)?;
        let key = AlignmentKey::new(workspace_id, worksheet_id);

        let graph = match self.shared.graphs.entry(key.clone()) {
            Entry::Occupied(entry) => Arc::clone(entry.get()),
            Entry::Vacant(entry) => {
                let graph = Arc::new(AlignmentGraph::new(key.clone(), ontology.clone()));
                for saver in self.shared.savers.read().iter() {
                    graph.attach_saver(Arc::clone(saver));
                }
                entry.insert(Arc::clone(&graph));
                tracing::info!(key = %key, ontology = %ontology, "created alignment graph");
                graph
            }
        };

        let work = graph.plan_predictions(&paths);
        if !work.is_empty() {
            self.spawn_run(key, &graph, work);
        }
        Ok(graph)
    }

    pub fn get(&self, workspace_id: &str, worksheet_id: &str) -> Option<Arc<AlignmentGraph>> {
        self.get_by_key(&AlignmentKey::new(workspace_id, worksheet_id))
    }

    pub fn get_by_key(&self, key: &AlignmentKey) -> Option<Arc<AlignmentGraph>> {
        self.shared
            .graphs
            .get(key)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Lookup by the canonical `"{workspace}:{worksheet}AL"` string.
    pub fn get_canonical(&self, canonical: &str) -> Option<Arc<AlignmentGraph>> {
        AlignmentKey::parse(canonical).and_then(|key| self.get_by_key(&key))
    }

    /// Stores a graph built elsewhere (a saver's load path, say) under an
    /// explicit key, replacing any previous entry. Registered savers are
    /// attached before the graph becomes visible.
    pub fn insert(&self, key: AlignmentKey, graph: Arc<AlignmentGraph>) {
        let entry = self.shared.graphs.entry(key);
        for saver in self.shared.savers.read().iter() {
            graph.attach_saver(Arc::clone(saver));
        }
        entry.insert(graph);
    }

    /// Reverse lookup by graph identity.
    pub fn key_of(&self, graph: &Arc<AlignmentGraph>) -> Option<AlignmentKey> {
        self.shared.graphs.iter().find_map(|entry| {
            Arc::ptr_eq(entry.value(), graph).then(|| entry.key().clone())
        })
    }

    /// Registers a persistence listener and retroactively attaches it to
    /// every graph already in the registry. Registering the same saver twice
    /// keeps a single registration.
    pub fn add_saver(&self, saver: Arc<dyn AlignmentSaver>) {
        {
            let mut savers = self.shared.savers.write();
            if savers.iter().any(|s| Arc::ptr_eq(s, &saver)) {
                return;
            }
            savers.push(Arc::clone(&saver));
        }
        for entry in self.shared.graphs.iter() {
            entry.value().attach_saver(Arc::clone(&saver));
        }
    }

    /// Drops every graph belonging to the workspace. Exact match on the
    /// workspace id: `"W1X"` keys survive a removal of `"W1"`.
    pub fn remove_workspace_graphs(&self, workspace_id: &str) {
        let mut removed = 0usize;
        self.shared.graphs.retain(|key, _| {
            let keep = key.workspace_id != workspace_id;
            if !keep {
                removed += 1;
            }
            keep
        });
        if removed > 0 {
            tracing::info!(
                workspace = workspace_id,
                removed,
                "removed workspace alignment graphs"
            );
        }
    }

    /// Number of graphs currently stored.
    pub fn len(&self) -> usize {
        self.shared.graphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.graphs.is_empty()
    }

    /// Awaits every prediction run that was in flight when this was called
    /// and returns their reports. Runs spawned afterwards are left alone.
    pub async fn drain_predictions(&self) -> Vec<RunReport> {
        let handles: Vec<JoinHandle<RunReport>> =
            std::mem::take(&mut *self.shared.run_handles.lock());
        let mut reports = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.await {
                Ok(report) => reports.push(report),
                Err(err) => tracing::warn!(error = %err, "prediction run task failed"),
            }
        }
        reports
    }

    fn spawn_run(&self, key: AlignmentKey, graph: &Arc<AlignmentGraph>, columns: Vec<ColumnRef>) {
        let column_count = columns.len();
        let coordinator = PredictionCoordinator::new(
            key,
            graph,
            columns,
            Arc::clone(&self.shared.classifier),
        );
        tracing::debug!(
            run_id = %coordinator.run_id(),
            key = %graph.key(),
            columns = column_count,
            state = ?RunState::Scheduled,
            "prediction run scheduled"
        );
        let registry = self.clone();
        let slots = Arc::clone(&self.shared.prediction_slots);
        let handle = tokio::spawn(coordinator.run(registry, slots));
        self.shared.run_handles.lock().push(handle);
    }
}
