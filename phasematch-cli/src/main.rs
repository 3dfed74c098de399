use clap::Parser;
use phasematch::{
    load_gray_image, Candidate, GridPolicy, MatchConfig, Matcher, PeakRefinement, Registration,
    Rounding, Strategy,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Locate a UAV frame on a base map (JSON config driven)")]
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
    /// Enable tracing output for the registration stages.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
enum StrategyConfig {
    #[default]
    Phase,
    Zncc,
}

impl From<StrategyConfig> for Strategy {
    fn from(value: StrategyConfig) -> Self {
        match value {
            StrategyConfig::Phase => Strategy::Phase,
            StrategyConfig::Zncc => Strategy::Zncc,
        }
    }
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
enum GridPolicyConfig {
    #[default]
    Truncate,
    Strict,
}

impl From<GridPolicyConfig> for GridPolicy {
    fn from(value: GridPolicyConfig) -> Self {
        match value {
            GridPolicyConfig::Truncate => GridPolicy::Truncate,
            GridPolicyConfig::Strict => GridPolicy::Strict,
        }
    }
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
enum RoundingConfig {
    #[default]
    Truncate,
    Nearest,
}

impl From<RoundingConfig> for Rounding {
    fn from(value: RoundingConfig) -> Self {
        match value {
            RoundingConfig::Truncate => Rounding::Truncate,
            RoundingConfig::Nearest => Rounding::Nearest,
        }
    }
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
enum RefinementConfig {
    #[default]
    None,
    Quadratic,
}

impl From<RefinementConfig> for PeakRefinement {
    fn from(value: RefinementConfig) -> Self {
        match value {
            RefinementConfig::None => PeakRefinement::None,
            RefinementConfig::Quadratic => PeakRefinement::Quadratic,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct MatchConfigJson {
    strategy: StrategyConfig,
    candidate_count: usize,
    search_size: usize,
    template_size: usize,
    step_x: usize,
    step_y: usize,
    grid_policy: GridPolicyConfig,
    rounding: RoundingConfig,
    refinement: RefinementConfig,
    parallel: bool,
    deadline_ms: Option<u64>,
}

impl Default for MatchConfigJson {
    fn default() -> Self {
        let cfg = MatchConfig::default();
        Self {
            strategy: StrategyConfig::Phase,
            candidate_count: cfg.candidate_count,
            search_size: cfg.search_size,
            template_size: cfg.template_size,
            step_x: cfg.step_x,
            step_y: cfg.step_y,
            grid_policy: GridPolicyConfig::Truncate,
            rounding: RoundingConfig::Truncate,
            refinement: RefinementConfig::None,
            parallel: cfg.parallel,
            deadline_ms: None,
        }
    }
}

impl From<MatchConfigJson> for MatchConfig {
    fn from(value: MatchConfigJson) -> Self {
        MatchConfig {
            strategy: value.strategy.into(),
            candidate_count: value.candidate_count,
            search_size: value.search_size,
            template_size: value.template_size,
            step_x: value.step_x,
            step_y: value.step_y,
            grid_policy: value.grid_policy.into(),
            rounding: value.rounding.into(),
            refinement: value.refinement.into(),
            parallel: value.parallel,
            deadline: value.deadline_ms.map(Duration::from_millis),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
struct Point {
    x: f64,
    y: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    template_path: String,
    reference_path: String,
    output_path: Option<String>,
    estimate: Point,
    estimate_offset: Point,
    #[serde(rename = "match")]
    match_cfg: MatchConfigJson,
}

impl Config {
    fn search_center(&self) -> (f64, f64) {
        (
            self.estimate.x + self.estimate_offset.x,
            self.estimate.y + self.estimate_offset.y,
        )
    }
}

#[derive(Debug, Serialize)]
struct CandidateRecord {
    x: f64,
    y: f64,
    score: f64,
    grid_idx: usize,
}

impl From<Candidate> for CandidateRecord {
    fn from(value: Candidate) -> Self {
        Self {
            x: value.x,
            y: value.y,
            score: value.score,
            grid_idx: value.grid_idx,
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    x: i64,
    y: i64,
    mean_x: f64,
    mean_y: f64,
    score: f64,
    averaged: usize,
    truncated: bool,
    candidates: Vec<CandidateRecord>,
}

impl From<Registration> for Output {
    fn from(value: Registration) -> Self {
        Self {
            x: value.x,
            y: value.y,
            mean_x: value.mean_x,
            mean_y: value.mean_y,
            score: value.score,
            averaged: value.averaged,
            truncated: value.truncated,
            candidates: value.candidates.into_iter().map(Into::into).collect(),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive("phasematch=info".parse()?),
            )
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
    if config.template_path.is_empty() || config.reference_path.is_empty() {
        return Err("template_path and reference_path must be set in the config".into());
    }

    let template = load_gray_image(&config.template_path)?;
    let reference = load_gray_image(&config.reference_path)?;
    let (x, y) = config.search_center();
    tracing::info!(
        template = %config.template_path,
        reference = %config.reference_path,
        x,
        y,
        "matching"
    );

    let matcher = Matcher::new(config.match_cfg.into());
    let registration = matcher.register(template.view(), reference.view(), x, y)?;
    let json = serde_json::to_string_pretty(&Output::from(registration))?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
