//! Integration tests for the complete ontotab pipeline
//!
//! These tests verify end-to-end functionality across crates:
//! - Worksheet catalog → Registry → Alignment graph → Prediction
//! - Graph mutations → JSON file saver
//! - Alignment graph → Mapping auxiliary model → Anchor selection
//!
//! Run with: cargo test --test integration_tests

use std::sync::Arc;

use tempfile::tempdir;

use ontotab_align::{
    AlignmentRegistry, ClassifierError, ColumnRef, JsonFileSaver, OntologyContext, RegistryConfig,
    SemanticType, SemanticTypeClassifier,
};
use ontotab_mapgen::{MappingAuxInfo, ObjectRef, PredicateObjectLink};
use ontotab_rep::{Header, Headers, InMemoryCatalog, Worksheet, WorksheetProvider};

// ============================================================================
// Fixtures
// ============================================================================

/// One worksheet with a doubly nested table:
/// title, artists/name, artists/residence/city.
fn catalog() -> Arc<InMemoryCatalog> {
    let c = InMemoryCatalog::new();
    c.put(Worksheet::new(
        "artworks",
        "Artworks",
        Headers::new(vec![
            Header::leaf("a1", "title"),
            Header::nested(
                "a2",
                "artists",
                vec![
                    Header::leaf("a3", "name"),
                    Header::nested("a4", "residence", vec![Header::leaf("a5", "city")]),
                ],
            ),
        ]),
    ));
    Arc::new(c)
}

/// Deterministic stand-in for the real model: keyed by column name.
struct TableClassifier;

impl SemanticTypeClassifier for TableClassifier {
    fn predict(
        &self,
        column: &ColumnRef,
        _ontology: &OntologyContext,
    ) -> Result<Vec<SemanticType>, ClassifierError> {
        let (class_uri, property_uri) = match column.name.as_str() {
            "title" => ("http://ex.org/ont#Artwork", "http://ex.org/ont#title"),
            "name" => ("http://ex.org/ont#Artist", "http://ex.org/ont#name"),
            "city" => ("http://ex.org/ont#Place", "http://ex.org/ont#cityName"),
            _ => ("http://ex.org/ont#Thing", "http://ex.org/ont#value"),
        };
        Ok(vec![
            SemanticType::predicted(class_uri, property_uri, 0.85),
            SemanticType::predicted("http://ex.org/ont#Thing", "http://ex.org/ont#label", 0.3),
        ])
    }
}

fn registry() -> AlignmentRegistry {
    AlignmentRegistry::new(catalog(), Arc::new(TableClassifier), RegistryConfig::default())
}

// ============================================================================
// Catalog → Registry → Prediction → Confirmation
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn worksheet_to_suggestions_to_confirmation() {
    let registry = registry();
    let ontology = OntologyContext::new("museum-ontology");

    let graph = registry
        .get_or_create("w1", "artworks", &ontology)
        .expect("worksheet exists");
    // The call returns before predictions land; empty suggestion lists are
    // the expected intermediate state.
    assert_eq!(graph.column_ids(), vec!["a1", "a3", "a5"]);

    let reports = registry.drain_predictions().await;
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].predicted, 3);

    let suggestions = graph.suggestions_for("a3").expect("column exists");
    assert_eq!(suggestions[0].property_uri, "http://ex.org/ont#name");
    assert!(suggestions[0].confidence > suggestions[1].confidence);

    // Confirming the top suggestion materializes the ontology nodes and the
    // connecting edge.
    let top = suggestions[0].clone();
    graph.confirm_semantic_type("a3", top);
    assert_eq!(graph.confirmed_columns().len(), 1);
    assert_eq!(graph.edges().len(), 1);
    assert!(graph.node_by_id("http://ex.org/ont#Artist").is_some());
    assert!(graph.node_by_id("http://ex.org/ont#name").is_some());
}

// Current-thread runtime: the spawned prediction run must not execute between
// `get_or_create` and the emptiness check, which only a single-threaded
// scheduler guarantees.
#[tokio::test]
async fn removal_makes_the_next_call_start_fresh() {
    let registry = registry();
    let ontology = OntologyContext::new("museum-ontology");

    let first = registry
        .get_or_create("w1", "artworks", &ontology)
        .expect("worksheet exists");
    registry.drain_predictions().await;
    assert!(!first.suggestions_for("a1").unwrap().is_empty());

    registry.remove_workspace_graphs("w1");
    let second = registry
        .get_or_create("w1", "artworks", &ontology)
        .expect("worksheet exists");
    assert!(!Arc::ptr_eq(&first, &second));
    assert!(second.suggestions_for("a1").unwrap().is_empty());

    registry.drain_predictions().await;
    assert!(!second.suggestions_for("a1").unwrap().is_empty());
}

// ============================================================================
// Persistence through the JSON saver
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn graphs_persist_through_the_json_saver() {
    let dir = tempdir().expect("tempdir");
    let saver = Arc::new(JsonFileSaver::new(dir.path()));

    let registry = registry();
    registry.add_saver(saver.clone());
    let ontology = OntologyContext::new("museum-ontology");

    let graph = registry
        .get_or_create("w1", "artworks", &ontology)
        .expect("worksheet exists");
    registry.drain_predictions().await;

    let file = saver.file_for(&graph);
    assert!(file.exists(), "saver should have written {}", file.display());

    let text = std::fs::read_to_string(&file).expect("snapshot readable");
    let snapshot: serde_json::Value = serde_json::from_str(&text).expect("snapshot is JSON");
    assert_eq!(snapshot["key"]["workspace_id"], "w1");
    assert_eq!(snapshot["key"]["worksheet_id"], "artworks");
    assert_eq!(snapshot["ontology_id"], "museum-ontology");
    assert_eq!(snapshot["nodes"][0]["Column"]["id"], "a1");
    assert!(!snapshot["nodes"][0]["Column"]["suggestions"]
        .as_array()
        .expect("suggestions array")
        .is_empty());
}

// ============================================================================
// Alignment → Mapping auxiliary model → Anchors
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn alignment_feeds_anchor_selection() {
    let registry = registry();
    let ontology = OntologyContext::new("museum-ontology");
    let graph = registry
        .get_or_create("w1", "artworks", &ontology)
        .expect("worksheet exists");
    registry.drain_predictions().await;
    assert_eq!(graph.column_ids().len(), 3);

    // Build the side tables the generation stage would: a triples map per
    // entity, one blank node covering every column of the worksheet.
    let mut aux = MappingAuxInfo::new();
    aux.triples_map_graph_mut()
        .link("t_artwork", "t_artist", "http://ex.org/ont#creator");
    aux.triples_map_graph_mut()
        .link("t_artist", "t_place", "http://ex.org/ont#residence");

    let paths = catalog()
        .header_paths("artworks")
        .expect("worksheet exists");
    for path in &paths {
        aux.record_coverage("bn_artist", path.column_path().to_string());
    }
    aux.link_column(
        "[artists,name]",
        PredicateObjectLink {
            triples_map: "t_artist".into(),
            predicate: "http://ex.org/ont#name".into(),
            object: ObjectRef::Column("[artists,name]".into()),
        },
    );

    // The deepest covered column keys the repeated group.
    let report = aux.assign_template_anchors();
    assert!(report.is_complete());
    assert_eq!(
        aux.template_anchor("bn_artist"),
        Some("[artists,residence,city]")
    );
    assert!(aux.verify_anchors_assigned().is_ok());

    assert_eq!(
        aux.triples_map_graph().generation_order(),
        vec!["t_artwork", "t_artist", "t_place"]
    );
}
