//! Integration tests running a serialized tree ensemble over fixture events.
//!
//! The fixtures under `tests/data/` use the same JSON layout the CLI reads.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use w3pi::{
    Candidate, Decision, EventProcessor, NoCandidateReason, ParticleId, PipelineConfig, Scorer,
    Tree, TreeEnsemble, W3PiError,
};

/// Score tolerance for comparisons against fixture values.
const SCORE_TOLERANCE: f32 = 1e-5;

#[derive(Debug, Deserialize)]
struct TreeJson {
    feature: Vec<i32>,
    threshold: Vec<f32>,
    children_left: Vec<i32>,
    children_right: Vec<i32>,
    value: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct ModelJson {
    #[serde(default)]
    base_score: f32,
    trees: Vec<TreeJson>,
}

#[derive(Debug, Deserialize)]
struct CandidateJson {
    pt: f32,
    eta: f32,
    phi: f32,
    pid: u8,
    #[serde(default)]
    z0: f32,
}

impl From<&CandidateJson> for Candidate {
    fn from(value: &CandidateJson) -> Self {
        Candidate::from_physical(
            value.pt,
            value.eta,
            value.phi,
            ParticleId::from_bits(value.pid),
            value.z0,
        )
    }
}

#[derive(Debug, Deserialize)]
struct EventsJson {
    events: Vec<Vec<CandidateJson>>,
}

#[derive(Debug, Deserialize)]
struct Expected {
    status: String,
    #[serde(default)]
    slots: Vec<usize>,
    #[serde(default)]
    score: f32,
    #[serde(default)]
    reason: String,
}

fn data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("data")
}

fn read_json<T: for<'de> Deserialize<'de>>(name: &str) -> T {
    let path = data_dir().join(name);
    let text = fs::read_to_string(&path).unwrap_or_else(|e| panic!("read {path:?}: {e}"));
    serde_json::from_str(&text).unwrap_or_else(|e| panic!("parse {path:?}: {e}"))
}

fn load_model(model: ModelJson) -> Result<TreeEnsemble, W3PiError> {
    let trees = model
        .trees
        .into_iter()
        .map(|t| {
            Tree::new(
                t.feature,
                t.threshold,
                t.children_left,
                t.children_right,
                t.value,
            )
        })
        .collect::<Result<Vec<_>, _>>()?;
    TreeEnsemble::new(model.base_score, trees)
}

#[test]
fn fixture_events_match_expected_decisions() {
    let model = load_model(read_json("toy_model.json")).unwrap();
    assert_eq!(model.n_trees(), 2);
    let events: EventsJson = read_json("toy_events.json");
    let expected: Vec<Expected> = read_json("toy_expected.json");
    assert_eq!(events.events.len(), expected.len());

    let processor = EventProcessor::new(PipelineConfig::default(), model).unwrap();
    for (idx, (event, want)) in events.events.iter().zip(&expected).enumerate() {
        let candidates: Vec<Candidate> = event.iter().map(Candidate::from).collect();
        let decision = processor.process(&candidates).unwrap();
        match (want.status.as_str(), decision) {
            ("selected", Decision::Selected(winner)) => {
                assert_eq!(winner.slots.to_vec(), want.slots, "event {idx}");
                assert!(
                    (winner.score - want.score).abs() < SCORE_TOLERANCE,
                    "event {idx}: score {} vs {}",
                    winner.score,
                    want.score
                );
            }
            ("no_candidate", Decision::NoCandidate(reason)) => {
                let name = match reason {
                    NoCandidateReason::TooFewCandidates => "too_few_candidates",
                    NoCandidateReason::NoTripletPassed => "no_triplet_passed",
                };
                assert_eq!(name, want.reason, "event {idx}");
            }
            (status, other) => panic!("event {idx}: expected {status}, got {other:?}"),
        }
    }
}

#[test]
fn winner_score_equals_direct_model_evaluation() {
    let model = load_model(read_json("toy_model.json")).unwrap();
    let events: EventsJson = read_json("toy_events.json");
    let candidates: Vec<Candidate> = events.events[0].iter().map(Candidate::from).collect();

    let processor = EventProcessor::new(PipelineConfig::default(), model).unwrap();
    let report = processor.process_detailed(&candidates).unwrap();
    for scored in &report.scored {
        assert_eq!(scored.score, processor.scorer().score(&scored.features));
    }
}

#[test]
fn malformed_model_is_rejected() {
    let text = r#"{
        "trees": [{
            "feature": [0, -2, -2],
            "threshold": [1.0, 0.0, 0.0],
            "children_left": [1, -1, -1],
            "children_right": [7, -1, -1],
            "value": [0.0, 1.0, 2.0]
        }]
    }"#;
    let model: ModelJson = serde_json::from_str(text).unwrap();
    assert!(matches!(
        load_model(model),
        Err(W3PiError::InvalidModel { .. })
    ));
}
