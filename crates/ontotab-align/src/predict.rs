//! Asynchronous semantic-type prediction.
//!
//! A [`PredictionCoordinator`] owns one run: the batch of columns claimed by
//! a single registry scan. Runs are fire-and-forget from the scheduler's
//! point of view; results are observed by re-reading the graph, or through
//! the [`RunReport`]s surfaced by `AlignmentRegistry::drain_predictions`.
//!
//! The classifier contract is synchronous and possibly slow, so every call
//! is confined to a blocking task. The coordinator never holds a strong
//! reference to its graph across a call; it re-resolves the key against the
//! registry at each write, which makes writes to a discarded graph no-ops.

use std::sync::{Arc, Weak};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Semaphore;
use uuid::Uuid;

use ontotab_rep::ColumnPath;

use crate::graph::{AlignmentGraph, SuggestionOutcome};
use crate::key::AlignmentKey;
use crate::ontology::OntologyContext;
use crate::registry::AlignmentRegistry;
use crate::semantic_type::SemanticType;

/// A column handed to the classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnRef {
    /// Header id, the column's node id in the graph.
    pub id: String,
    pub name: String,
    pub path: ColumnPath,
}

/// Failure of a single prediction call.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// No trained model is available yet.
    #[error("classifier not ready")]
    NotReady,
    #[error("prediction failed: {0}")]
    Prediction(String),
}

/// Black-box column classifier.
///
/// Implementations are synchronous by contract and may block; callers are
/// expected to confine `predict` to a blocking-capable thread.
pub trait SemanticTypeClassifier: Send + Sync {
    /// Candidate semantic types for one column, ranked by descending
    /// confidence. An empty list is a valid answer.
    fn predict(
        &self,
        column: &ColumnRef,
        ontology: &OntologyContext,
    ) -> Result<Vec<SemanticType>, ClassifierError>;
}

/// Lifecycle of a prediction run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    /// Spawned, waiting for a prediction slot.
    Scheduled,
    Running,
    /// Finished; at least one column succeeded, or there was nothing to do.
    Completed,
    /// Finished with failures and not a single successful column.
    Failed,
}

/// Outcome of one finished run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub state: RunState,
    /// Columns whose suggestions landed on the graph.
    pub predicted: usize,
    /// Columns whose classifier call failed or panicked.
    pub failed: usize,
    /// Writes skipped because the graph or column was gone by the time the
    /// prediction finished.
    pub stale: usize,
}

/// One scheduled prediction run over a batch of columns.
pub(crate) struct PredictionCoordinator {
    run_id: Uuid,
    key: AlignmentKey,
    /// Weak on purpose: a run must not keep a discarded graph alive.
    graph: Weak<AlignmentGraph>,
    columns: Vec<ColumnRef>,
    classifier: Arc<dyn SemanticTypeClassifier>,
    ontology: OntologyContext,
}

impl PredictionCoordinator {
    pub(crate) fn new(
        key: AlignmentKey,
        graph: &Arc<AlignmentGraph>,
        columns: Vec<ColumnRef>,
        classifier: Arc<dyn SemanticTypeClassifier>,
    ) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            key,
            graph: Arc::downgrade(graph),
            ontology: graph.ontology().clone(),
            columns,
            classifier,
        }
    }

    pub(crate) fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// The graph this run was scheduled against, provided the registry still
    /// maps the key to that same instance.
    fn live_graph(&self, registry: &AlignmentRegistry) -> Option<Arc<AlignmentGraph>> {
        let current = registry.get_by_key(&self.key)?;
        let scheduled = self.graph.upgrade()?;
        Arc::ptr_eq(&current, &scheduled).then_some(current)
    }

    fn release_claim(&self, registry: &AlignmentRegistry, column_id: &str) {
        if let Some(graph) = self.live_graph(registry) {
            graph.clear_pending(column_id);
        }
    }

    pub(crate) async fn run(
        mut self,
        registry: AlignmentRegistry,
        slots: Arc<Semaphore>,
    ) -> RunReport {
        let permit = match slots.acquire_owned().await {
            Ok(permit) => permit,
            // Closed semaphore means the registry is gone; nothing to do.
            Err(_) => return self.report(RunState::Failed, 0, 0, 0),
        };
        tracing::debug!(
            run_id = %self.run_id,
            key = %self.key,
            columns = self.columns.len(),
            state = ?RunState::Running,
            "prediction run started"
        );

        let mut predicted = 0usize;
        let mut failed = 0usize;
        let mut stale = 0usize;

        let columns = std::mem::take(&mut self.columns);
        for column in columns {
            let classifier = Arc::clone(&self.classifier);
            let ontology = self.ontology.clone();
            let call_column = column.clone();
            let result =
                tokio::task::spawn_blocking(move || classifier.predict(&call_column, &ontology))
                    .await;

            match result {
                Ok(Ok(suggestions)) => match self.live_graph(&registry) {
                    Some(graph) => match graph.apply_suggestions(&column.id, suggestions) {
                        SuggestionOutcome::Applied => predicted += 1,
                        SuggestionOutcome::UnknownColumn => {
                            stale += 1;
                            tracing::warn!(
                                run_id = %self.run_id,
                                column = %column.id,
                                "column vanished before suggestions landed"
                            );
                        }
                    },
                    None => stale += 1,
                },
                Ok(Err(err)) => {
                    failed += 1;
                    tracing::warn!(
                        run_id = %self.run_id,
                        column = %column.id,
                        error = %err,
                        "semantic type prediction failed"
                    );
                    self.release_claim(&registry, &column.id);
                }
                Err(err) => {
                    failed += 1;
                    tracing::warn!(
                        run_id = %self.run_id,
                        column = %column.id,
                        error = %err,
                        "classifier panicked"
                    );
                    self.release_claim(&registry, &column.id);
                }
            }
        }
        drop(permit);

        let state = if failed > 0 && predicted == 0 {
            RunState::Failed
        } else {
            RunState::Completed
        };
        tracing::info!(
            run_id = %self.run_id,
            key = %self.key,
            predicted,
            failed,
            stale,
            "prediction run finished"
        );
        self.report(state, predicted, failed, stale)
    }

    fn report(&self, state: RunState, predicted: usize, failed: usize, stale: usize) -> RunReport {
        RunReport {
            run_id: self.run_id,
            state,
            predicted,
            failed,
            stale,
        }
    }
}
