use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use w3pi::{
    Candidate, Decision, Dr2, Eta, EventProcessor, FilterConfig, IdSet, IsolationConfig,
    MassWindow, NoCandidateReason, ParticleId, PipelineConfig, Pt, Tree, TreeEnsemble,
    TripletCuts, W3PiResult,
};

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "W3Pi triplet trigger (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for the pipeline stages.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct IsolationJson {
    outer_dr: f32,
    veto_dr: f32,
    max_ratio: f32,
}

impl From<IsolationJson> for IsolationConfig {
    fn from(value: IsolationJson) -> Self {
        Self {
            outer_dr2: Dr2::from_dr(value.outer_dr),
            veto_dr2: Dr2::from_dr(value.veto_dr),
            max_ratio: value.max_ratio,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct FilterJson {
    accepted_ids: Vec<u8>,
    max_abs_eta: f32,
    min_pt: Option<f32>,
    isolation: Option<IsolationJson>,
}

impl Default for FilterJson {
    fn default() -> Self {
        let cfg = FilterConfig::default();
        Self {
            accepted_ids: cfg.accepted_ids.ids().into_iter().map(ParticleId::code).collect(),
            max_abs_eta: cfg.max_abs_eta.to_value(),
            min_pt: cfg.min_pt.map(Pt::to_gev),
            isolation: None,
        }
    }
}

/// Decodes a 3-bit particle id, rejecting codes that would wrap.
fn particle_id(code: u8) -> Result<ParticleId, String> {
    if code > 0b111 {
        return Err(format!("particle id {code} is out of range (0..=7)"));
    }
    Ok(ParticleId::from_bits(code))
}

impl TryFrom<FilterJson> for FilterConfig {
    type Error = String;

    fn try_from(value: FilterJson) -> Result<Self, String> {
        let ids = value
            .accepted_ids
            .into_iter()
            .map(particle_id)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            accepted_ids: IdSet::from_ids(&ids),
            max_abs_eta: Eta::from_value(value.max_abs_eta),
            min_pt: value.min_pt.map(Pt::from_gev),
            isolation: value.isolation.map(IsolationConfig::from),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MassWindowJson {
    min_gev: f32,
    max_gev: f32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CutsJson {
    pivot0_min_pt: Option<f32>,
    pivot1_min_pt: Option<f32>,
    third_min_pt: Option<f32>,
    mass_window: Option<MassWindowJson>,
    min_dr: Option<f32>,
}

impl From<CutsJson> for TripletCuts {
    fn from(value: CutsJson) -> Self {
        Self {
            pivot0_min_pt: value.pivot0_min_pt.map(Pt::from_gev),
            pivot1_min_pt: value.pivot1_min_pt.map(Pt::from_gev),
            third_min_pt: value.third_min_pt.map(Pt::from_gev),
            mass_window: value
                .mass_window
                .map(|w| MassWindow::from_mass_gev(w.min_gev, w.max_gev)),
            min_dr2: value.min_dr.map(Dr2::from_dr),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct PipelineJson {
    capacity: usize,
    partitions: usize,
    hybrid: bool,
    top_k: usize,
    parallel: bool,
    filter: FilterJson,
    cuts: CutsJson,
}

impl Default for PipelineJson {
    fn default() -> Self {
        let cfg = PipelineConfig::default();
        Self {
            capacity: cfg.capacity,
            partitions: cfg.partitions,
            hybrid: cfg.hybrid,
            top_k: cfg.top_k,
            parallel: cfg.parallel,
            filter: FilterJson::default(),
            cuts: CutsJson::default(),
        }
    }
}

impl TryFrom<PipelineJson> for PipelineConfig {
    type Error = String;

    fn try_from(value: PipelineJson) -> Result<Self, String> {
        Ok(Self {
            capacity: value.capacity,
            partitions: value.partitions,
            hybrid: value.hybrid,
            top_k: value.top_k,
            parallel: value.parallel,
            filter: value.filter.try_into()?,
            cuts: value.cuts.into(),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    events_path: String,
    model_path: String,
    output_path: Option<String>,
    pipeline: PipelineJson,
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

impl TryFrom<&CandidateJson> for Candidate {
    type Error = String;

    fn try_from(value: &CandidateJson) -> Result<Self, String> {
        Ok(Candidate::from_physical(
            value.pt,
            value.eta,
            value.phi,
            particle_id(value.pid)?,
            value.z0,
        ))
    }
}

#[derive(Debug, Deserialize)]
struct EventsJson {
    events: Vec<Vec<CandidateJson>>,
}

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

impl TryFrom<ModelJson> for TreeEnsemble {
    type Error = w3pi::W3PiError;

    fn try_from(value: ModelJson) -> W3PiResult<Self> {
        let trees = value
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
            .collect::<W3PiResult<Vec<_>>>()?;
        TreeEnsemble::new(value.base_score, trees)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
enum Status {
    Selected,
    NoCandidate,
    Error,
}

#[derive(Debug, Serialize)]
struct EventRecord {
    event: usize,
    status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    slots: Option<[usize; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    score: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

impl EventRecord {
    fn new(event: usize, result: W3PiResult<Decision>) -> Self {
        let (status, slots, score, reason) = match result {
            Ok(Decision::Selected(winner)) => {
                (Status::Selected, Some(winner.slots), Some(winner.score), None)
            }
            Ok(Decision::NoCandidate(why)) => {
                let why = match why {
                    NoCandidateReason::TooFewCandidates => "too_few_candidates",
                    NoCandidateReason::NoTripletPassed => "no_triplet_passed",
                };
                (Status::NoCandidate, None, None, Some(why.to_string()))
            }
            Err(err) => (Status::Error, None, None, Some(err.to_string())),
        };
        Self {
            event,
            status,
            slots,
            score,
            reason,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("w3pi=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.events_path.is_empty() || config.model_path.is_empty() {
        return Err("events_path and model_path must be set in the config".into());
    }

    let model: ModelJson = serde_json::from_str(&fs::read_to_string(&config.model_path)?)?;
    let model = TreeEnsemble::try_from(model)?;
    let events: EventsJson = serde_json::from_str(&fs::read_to_string(&config.events_path)?)?;
    let events = events
        .events
        .iter()
        .map(|event| event.iter().map(Candidate::try_from).collect())
        .collect::<Result<Vec<Vec<Candidate>>, String>>()?;

    let pipeline = PipelineConfig::try_from(config.pipeline)?;
    let processor = EventProcessor::new(pipeline, model)?;
    let records: Vec<EventRecord> = processor
        .process_batch(&events)
        .into_iter()
        .enumerate()
        .map(|(event, result)| EventRecord::new(event, result))
        .collect();

    let selected = records
        .iter()
        .filter(|r| matches!(r.status, Status::Selected))
        .count();
    tracing::info!(events = records.len(), selected, "processed events");

    let json = serde_json::to_string_pretty(&records)?;
    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Config, EventsJson, FilterJson};
    use w3pi::{Candidate, FilterConfig, IdSet, ParticleId, PipelineConfig};

    #[test]
    fn default_filter_round_trips_through_json_mirror() {
        let cfg = FilterConfig::try_from(FilterJson::default()).unwrap();
        assert_eq!(cfg.accepted_ids, IdSet::default());
        assert_eq!(cfg.max_abs_eta, FilterConfig::default().max_abs_eta);
    }

    #[test]
    fn out_of_range_particle_ids_are_rejected() {
        let config: Config = serde_json::from_str(
            r#"{"pipeline": {"filter": {"accepted_ids": [2, 10]}}}"#,
        )
        .unwrap();
        let err = PipelineConfig::try_from(config.pipeline).unwrap_err();
        assert!(err.contains("10"), "{err}");

        let events: EventsJson = serde_json::from_str(
            r#"{"events": [[{"pt": 5.0, "eta": 0.0, "phi": 0.0, "pid": 8}]]}"#,
        )
        .unwrap();
        assert!(Candidate::try_from(&events.events[0][0]).is_err());

        let events: EventsJson = serde_json::from_str(
            r#"{"events": [[{"pt": 5.0, "eta": 0.0, "phi": 0.0, "pid": 7}]]}"#,
        )
        .unwrap();
        let cand = Candidate::try_from(&events.events[0][0]).unwrap();
        assert_eq!(cand.pid, ParticleId::MuonPlus);
    }
}
