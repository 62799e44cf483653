//! carepath: care pathway CLI
//!
//! Builds a care pathway, or a quick urgency check, for one symptom profile
//! using the embedded rule and reference tables (or the files named in a
//! config).
//!
//! Usage:
//!   cargo run -p demo -- assess -s Fever -s Cough --age 31-45 --gender male --duration "1-3 days" --severity 4
//!   cargo run -p demo -- quick -s "Chest Pain" --age 61-75 --duration "Less than 24 hours" --severity 6
//!   cargo run -p demo -- rules

use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use carepath_contracts::{
    config::EngineConfig,
    error::{CarePathError, CarePathResult, NarrativeError},
    narrative::NarrativePrompt,
    pathway::CarePathway,
    request::{AgeBand, DurationBand, Gender, PathwayRequest, Severity},
    urgency::QuickAssessment,
};
use carepath_core::traits::NarrativeGenerator;
use carepath_reference::{build_engine, load_config, TomlReferenceStore};
use carepath_triage::TomlUrgencyScorer;

// ── CLI definition ────────────────────────────────────────────────────────────

/// carepath: rule-based care pathway generator.
///
/// Scores symptom urgency, filters over-the-counter recommendations for the
/// profile, and prints a step-by-step care plan. Not medical advice.
#[derive(Parser)]
#[command(
    name = "carepath",
    about = "Rule-based care pathway generator",
    long_about = "Scores symptom urgency, selects safe over-the-counter options for the\n\
                  profile, and builds a step-by-step care plan. Not medical advice."
)]
struct Cli {
    /// Engine config TOML. Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a full care pathway.
    Assess {
        #[command(flatten)]
        profile: ProfileArgs,

        #[arg(long, default_value = "Prefer not to say")]
        gender: Gender,

        /// File whose contents stand in for a narrative generator response.
        #[arg(long)]
        narrative_fixture: Option<PathBuf>,
    },
    /// Urgency level and message only.
    Quick {
        #[command(flatten)]
        profile: ProfileArgs,
    },
    /// List the loaded severity rules and mapped symptoms.
    Rules,
}

#[derive(Args)]
struct ProfileArgs {
    /// Symptom name; repeat for several.
    #[arg(short = 's', long = "symptom", required = true)]
    symptoms: Vec<String>,

    /// Age band, e.g. "Under 18", "31-45", "Over 75".
    #[arg(long)]
    age: AgeBand,

    /// Duration band, e.g. "Less than 24 hours", "1-3 days", "2+ weeks".
    #[arg(long)]
    duration: DurationBand,

    /// Self-reported severity, 1-10.
    #[arg(long, default_value_t = 5)]
    severity: u8,
}

// ── Narrative fixture ─────────────────────────────────────────────────────────

/// Answers every prompt with the same pre-recorded response.
struct FileNarrativeGenerator {
    response: String,
}

impl FileNarrativeGenerator {
    fn from_file(path: &Path) -> CarePathResult<Self> {
        let response = std::fs::read_to_string(path).map_err(|e| CarePathError::ConfigError {
            reason: format!("failed to read narrative fixture '{}': {}", path.display(), e),
        })?;
        Ok(Self { response })
    }
}

impl NarrativeGenerator for FileNarrativeGenerator {
    fn generate(
        &self,
        prompt: &NarrativePrompt,
        timeout: Duration,
    ) -> Result<String, NarrativeError> {
        debug!(
            prompt_chars = prompt.render().len(),
            timeout_ms = timeout.as_millis() as u64,
            "serving narrative fixture"
        );
        Ok(self.response.clone())
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("carepath error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Command::Assess {
            profile,
            gender,
            narrative_fixture,
        } => {
            let request = profile.into_request(gender)?;
            let generator: Option<Arc<dyn NarrativeGenerator>> = match narrative_fixture {
                Some(path) => Some(Arc::new(FileNarrativeGenerator::from_file(&path)?)),
                None => None,
            };
            let engine = build_engine(&config, generator)?;
            let pathway = engine.assemble(&request);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(pathway.as_ref())?);
            } else {
                print_pathway(&pathway);
            }
        }
        Command::Quick { profile } => {
            let request = profile.into_request(Gender::PreferNotToSay)?;
            let engine = build_engine(&config, None)?;
            let quick = engine.quick_assess(
                &request.symptoms,
                request.age,
                request.duration,
                request.severity,
            );
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&quick)?);
            } else {
                print_quick(&quick);
            }
        }
        Command::Rules => print_rules(&config)?,
    }
    Ok(())
}

impl ProfileArgs {
    /// Build and validate the request at the CLI boundary.
    fn into_request(self, gender: Gender) -> CarePathResult<PathwayRequest> {
        let severity = Severity::new(self.severity)?;
        let request = PathwayRequest::new(self.symptoms, self.age, gender, self.duration, severity);
        request.validate()?;
        Ok(request)
    }
}

// ── Output ────────────────────────────────────────────────────────────────────

fn print_list(heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("{heading}");
    for item in items {
        println!("  - {item}");
    }
    println!();
}

fn print_pathway(p: &CarePathway) {
    println!();
    println!("Care pathway {}", p.id.0);
    println!("=================================");
    println!(
        "Symptoms: {}",
        p.request.symptoms.iter().cloned().collect::<Vec<_>>().join(", ")
    );
    println!(
        "Profile:  {} / {} / {} / severity {}",
        p.request.age, p.request.gender, p.request.duration, p.request.severity
    );
    println!();
    println!("Urgency: {} ({:.1}/10)", p.urgency_level.label().to_uppercase(), p.urgency_score);
    println!("  {}", p.urgency_explanation);
    println!();

    print_list("!! EMERGENCY", &p.emergency_warnings);

    println!("Action plan");
    for step in &p.immediate_actions {
        println!("  [{}] {} ({})", step.order, step.title, step.timeframe);
        println!("      {}", step.description);
        for action in &step.actions {
            println!("      * {action}");
        }
        for warning in step.warnings.iter().flatten() {
            println!("      ! {warning}");
        }
    }
    println!();

    if !p.medicine_recommendations.is_empty() {
        println!("Over-the-counter options");
        for rec in &p.medicine_recommendations {
            println!(
                "  {} [{:?}] for {}",
                rec.medicine.name,
                rec.priority,
                rec.reason_symptoms.join(", ")
            );
            if let Some(dose) = &rec.medicine.typical_dosage {
                println!("      dose: {dose}");
            }
            for note in &rec.user_precautions {
                println!("      ! {note}");
            }
        }
        println!();
    }

    print_list("Do not use these if", &p.contraindications);

    let home: Vec<String> = p
        .home_care_recommendations
        .iter()
        .map(|h| format!("{}: {}", h.name, h.description))
        .collect();
    print_list("Home care", &home);

    let natural: Vec<String> = p
        .natural_remedy_recommendations
        .iter()
        .map(|n| format!("{} ({} evidence): {}", n.name, n.evidence, n.description))
        .collect();
    print_list("Natural remedies", &natural);

    println!("About your symptoms ({:?})", p.narrative_source);
    println!("  {}", p.symptom_explanation);
    println!();
    println!("Advice");
    println!("  {}", p.personalized_advice);
    println!();
    println!("Recovery");
    println!("  {}", p.recovery_timeline);
    println!();
    print_list("Seek medical help if", &p.when_to_seek_help);

    println!("{}", p.disclaimer.title);
    println!("  {}", p.disclaimer.body);
    println!("  {}", p.disclaimer.emergency_notice);
    println!();
    println!("digest: {}", p.content_digest);
}

fn print_quick(q: &QuickAssessment) {
    println!("{}: {}", q.level.label().to_uppercase(), q.message);
    if q.needs_immediate_care {
        println!("Seek immediate medical care.");
    }
}

fn print_rules(config: &EngineConfig) -> CarePathResult<()> {
    let scorer = match &config.data.rules_path {
        Some(path) => TomlUrgencyScorer::from_file(path)?,
        None => TomlUrgencyScorer::embedded()?,
    };
    let reference = match &config.data.reference_path {
        Some(path) => TomlReferenceStore::from_file(path)?,
        None => TomlReferenceStore::embedded()?,
    };

    let table = scorer.table();
    println!(
        "Scoring: neutral severity {}, step {}, more than {} symptoms x{}",
        table.scoring.neutral_severity,
        table.scoring.severity_step,
        table.scoring.multi_symptom_threshold,
        table.scoring.multi_symptom_multiplier
    );
    println!("Default rule: base {}", table.default.base_severity);
    println!();
    for rule in &table.rules {
        println!(
            "  {:<22} base {:>4}  combinations {}",
            rule.symptom,
            rule.base_severity,
            rule.combinations.len()
        );
    }
    println!();
    println!(
        "Mapped symptoms: {}",
        reference.known_symptoms().collect::<Vec<_>>().join(", ")
    );
    Ok(())
}
