//! clinical-decision CLI: run the engine on JSON input from the shell.

use clap::{Parser, Subcommand};
use clinical_decision::config::EngineConfig;
use clinical_decision::engine::{ClinicalEngine, TreeKind};
use clinical_decision::extract::{patient_decision_features, PatientProfile};
use clinical_decision::neighbors::{SimilarityCandidate, SimilarityEngine};
use clinical_decision::primitives::{FeatureVector, RawFeatures};
use clinical_decision::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "clinical-decision")]
#[command(about = "Explainable clinical decision support: triage, matching, care paths")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Engine configuration (YAML)
    #[arg(short, long, env = "CLINICAL_DECISION_CONFIG")]
    config: Option<PathBuf>,

    /// Log level when RUST_LOG is unset
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// Shorthand for --log-level debug
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Filter directive used when RUST_LOG is unset.
    fn log_filter(&self) -> &str {
        if self.verbose {
            "debug"
        } else {
            &self.log_level
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Classify an alert's triage priority
    ClassifyAlert {
        /// Alert title
        #[arg(short, long)]
        title: Option<String>,

        /// Alert message body
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Classify a medical record's type
    ClassifyRecord {
        /// Record title
        #[arg(short, long)]
        title: Option<String>,

        /// Record summary
        #[arg(short, long)]
        summary: Option<String>,

        /// Diagnosis text
        #[arg(short, long)]
        diagnosis: Option<String>,
    },

    /// Route a patient through the care-path tree
    CarePath {
        #[command(flatten)]
        input: PatientInput,
    },

    /// Assess discharge readiness
    Discharge {
        #[command(flatten)]
        input: PatientInput,
    },

    /// Print a tree's structure as JSON
    ExportTree {
        /// care_path or discharge_readiness
        tree: String,
    },

    /// Rank candidates by similarity to a target
    Rank {
        /// JSON file with `target`, `candidates`, optional `weights` and `k`
        input: PathBuf,

        /// Attach per-feature similarity explanations
        #[arg(long)]
        explain: bool,
    },
}

#[derive(clap::Args)]
struct PatientInput {
    /// Inline JSON object of features
    #[arg(short, long, conflicts_with = "file")]
    features: Option<String>,

    /// JSON file holding the features
    #[arg(long)]
    file: Option<PathBuf>,

    /// Treat the input as a patient document rather than raw features
    #[arg(long)]
    patient: bool,
}

#[derive(Deserialize)]
struct RankRequest {
    target: RawFeatures,
    candidates: Vec<RankCandidate>,
    #[serde(default)]
    weights: BTreeMap<String, f64>,
    k: Option<usize>,
    #[serde(default)]
    names: BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct RankCandidate {
    item: serde_json::Value,
    features: RawFeatures,
}

#[derive(Serialize)]
struct RankedItem<'a> {
    item: &'a serde_json::Value,
    distance: f64,
    similarity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    reasons: Option<Vec<String>>,
}

fn main() {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => EngineConfig::from_path(path)?,
        None => EngineConfig::default(),
    };
    let engine = ClinicalEngine::new(&config)?;

    match cli.command {
        Commands::ClassifyAlert { title, message } => {
            print_json(&engine.classify_alert_priority(title.as_deref(), message.as_deref()))
        }
        Commands::ClassifyRecord {
            title,
            summary,
            diagnosis,
        } => print_json(&engine.classify_medical_record_type(
            title.as_deref(),
            summary.as_deref(),
            diagnosis.as_deref(),
        )),
        Commands::CarePath { input } => {
            print_json(&engine.care_path(&read_patient_features(&input)?))
        }
        Commands::Discharge { input } => {
            print_json(&engine.discharge_readiness(&read_patient_features(&input)?))
        }
        Commands::ExportTree { tree } => {
            let kind: TreeKind = tree.parse()?;
            println!("{}", engine.export_tree(kind).to_json()?);
            Ok(())
        }
        Commands::Rank { input, explain } => cmd_rank(&engine, &input, explain),
    }
}

fn read_patient_features(input: &PatientInput) -> Result<FeatureVector> {
    let raw = match (&input.features, &input.file) {
        (Some(inline), _) => inline.clone(),
        (None, Some(path)) => fs::read_to_string(path)?,
        (None, None) => return Err("pass --features or --file".into()),
    };

    if input.patient {
        let patient: PatientProfile = serde_json::from_str(&raw)?;
        Ok(patient_decision_features(&patient))
    } else {
        let features: RawFeatures = serde_json::from_str(&raw)?;
        Ok(FeatureVector::from_raw(&features))
    }
}

fn cmd_rank(engine: &ClinicalEngine, input: &Path, explain: bool) -> Result<()> {
    let request: RankRequest = serde_json::from_str(&fs::read_to_string(input)?)?;

    let mut ranker = *engine.similarity();
    if let Some(k) = request.k {
        if k == 0 {
            return Err("k must be at least 1".into());
        }
        ranker = SimilarityEngine::new(k)
            .with_metric(ranker.metric())
            .with_explain_tolerance(ranker.explain_tolerance());
    }

    let target = FeatureVector::from_raw(&request.target);
    let candidates: Vec<SimilarityCandidate<serde_json::Value>> = request
        .candidates
        .into_iter()
        .map(|c| SimilarityCandidate::new(c.item, FeatureVector::from_raw(&c.features)))
        .collect();

    let ranked = if request.weights.is_empty() {
        ranker.rank(&target, &candidates)
    } else {
        ranker.rank_weighted(&target, &candidates, &request.weights)
    };

    let output: Vec<RankedItem<'_>> = ranked
        .iter()
        .map(|neighbor| RankedItem {
            item: neighbor.item,
            distance: neighbor.distance,
            similarity: neighbor.similarity,
            reasons: explain.then(|| {
                ranker.explain(
                    &target,
                    &candidates[neighbor.index].features,
                    &request.names,
                )
            }),
        })
        .collect();

    print_json(&output)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
