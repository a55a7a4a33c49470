//! HeartGuard: CHW monitoring dashboard backend
//!
//! Main entry point for the command-line front end.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use heartguard::adapters::sanitize::SanitizingMakeWriter;
use heartguard::adapters::WhatsAppNotifier;
use heartguard::application::alerts::patient_name;
use heartguard::application::dataset::parse_seed;
use heartguard::application::assistant::{self, AssistantIntent};
use heartguard::application::{
    AlertBoard, EscalationConfig, EscalationService, PatientSort, SimulatedDataset,
    SimulationConfig, SortOrder, VoiceConfig, VoiceTriageService,
};
use heartguard::domain::{AlertStatus, Patient, VoiceAnalysis};
use heartguard::worker::{VoiceProgress, VoiceWorker};
use heartguard::HeartguardError;

const USAGE: &str = "Usage: heartguard [--seed <u64>] [--patient <id>] [--search <text>]
                  [--sort <key>[:asc|desc]] [--limit <n>] [--ask <message>]
                  [--voice] [--escalate] [--json]

  --seed <u64>     Reproduce a snapshot, decimal or 0x-hex (overrides HEARTGUARD_SEED)
  --patient <id>   Show one patient instead of the roster
  --search <text>  Only list patients whose name or id contains <text>
  --sort <key>     Order the roster by name, risk or adherence, descending unless
                   suffixed :asc (default risk:desc)
  --limit <n>      Show at most <n> roster rows
  --ask <message>  Ask the triage assistant (quick prompts listed when blank)
  --voice          Run a simulated voice-message triage
  --escalate       Page the nurse for pending high-risk alerts (and severe voice results)
  --json           Print the snapshot or patient as JSON";

#[derive(Debug, Default)]
struct Args {
    seed: Option<u64>,
    patient: Option<String>,
    search: Option<String>,
    sort: Option<(PatientSort, SortOrder)>,
    limit: Option<usize>,
    ask: Option<String>,
    voice: bool,
    escalate: bool,
    json: bool,
    help: bool,
}

fn parse_args<I>(args: I) -> Result<Args>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = Args::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => {
                let value = args.next().context("--seed needs a value")?;
                parsed.seed =
                    Some(parse_seed(&value).with_context(|| format!("invalid seed {value:?}"))?);
            }
            "--patient" => parsed.patient = Some(args.next().context("--patient needs an id")?),
            "--search" => parsed.search = Some(args.next().context("--search needs text")?),
            "--sort" => {
                let value = args.next().context("--sort needs a key")?;
                parsed.sort = Some(parse_sort(&value)?);
            }
            "--limit" => {
                let value = args.next().context("--limit needs a number")?;
                parsed.limit = Some(
                    value
                        .parse()
                        .with_context(|| format!("invalid limit {value:?}"))?,
                );
            }
            "--ask" => parsed.ask = Some(args.next().context("--ask needs a message")?),
            "--voice" => parsed.voice = true,
            "--escalate" => parsed.escalate = true,
            "--json" => parsed.json = true,
            "-h" | "--help" => parsed.help = true,
            other => bail!("unknown argument {other:?}\n\n{USAGE}"),
        }
    }

    Ok(parsed)
}

/// `name`, `risk:asc`, `adherence:desc`, ...; descending unless told otherwise.
fn parse_sort(value: &str) -> Result<(PatientSort, SortOrder)> {
    let (key, order) = match value.split_once(':') {
        Some((key, order)) => (key, Some(order)),
        None => (value, None),
    };
    let sort_by: PatientSort = key.parse()?;
    let order = match order {
        Some(order) => order.parse()?,
        None => SortOrder::default(),
    };
    Ok((sort_by, order))
}

fn init_logging() -> Result<tracing_appender::non_blocking::WorkerGuard> {
    // Logs go to stderr by default so stdout stays clean for the report.
    let log_mode =
        std::env::var("HEARTGUARD_LOG_MODE").unwrap_or_else(|_| "stderr".to_string());

    let (writer, guard) = match log_mode.as_str() {
        "file" => {
            let log_file = std::env::var("HEARTGUARD_LOG_FILE")
                .unwrap_or_else(|_| "heartguard.log".to_string());

            if let Some(parent) = std::path::Path::new(&log_file).parent() {
                // Best-effort: don't fail startup just because the directory is missing.
                let _ = std::fs::create_dir_all(parent);
            }

            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_file)
                .with_context(|| format!("opening log file {log_file}"))?;
            tracing_appender::non_blocking(file)
        }
        "stdout" => tracing_appender::non_blocking(std::io::stdout()),
        _ => tracing_appender::non_blocking(std::io::stderr()),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(SanitizingMakeWriter::new(writer)))
        .init();

    Ok(guard)
}

fn main() -> Result<ExitCode> {
    let args = parse_args(std::env::args().skip(1))?;
    if args.help {
        println!("{USAGE}");
        return Ok(ExitCode::SUCCESS);
    }

    let _guard = init_logging()?;
    tracing::info!("Starting HeartGuard...");

    let mut sim_config = SimulationConfig::from_env_or_default();
    if args.seed.is_some() {
        sim_config.seed = args.seed;
    }
    let dataset = SimulatedDataset::build(&sim_config)?;
    let mut board = AlertBoard::new(dataset.alerts().to_vec());

    let patient = match args.patient.as_deref() {
        Some(id) => match dataset.require_patient(id) {
            Ok(p) => Some(p),
            Err(e @ HeartguardError::PatientNotFound(_)) => {
                eprintln!("{e}");
                return Ok(ExitCode::FAILURE);
            }
            Err(e) => return Err(e.into()),
        },
        None => None,
    };

    match (patient, args.json) {
        (Some(p), true) => print_patient_json(&dataset, p)?,
        (Some(p), false) => print_patient(&dataset, &board, p),
        (None, true) => println!("{}", serde_json::to_string_pretty(&dataset)?),
        (None, false) => print_overview(&dataset, &board, &args),
    }

    if let Some(message) = args.ask.as_deref() {
        ask_assistant(message);
    }

    let voice_result = if args.voice {
        Some(run_voice_triage(dataset.seed())?)
    } else {
        None
    };

    if args.escalate {
        escalate(&dataset, &mut board, patient, voice_result.as_ref());
    }

    tracing::info!("HeartGuard shutdown complete.");
    Ok(ExitCode::SUCCESS)
}

fn print_overview(dataset: &SimulatedDataset, board: &AlertBoard, args: &Args) {
    let stats = dataset.dashboard_stats();

    println!("HeartGuard dashboard (seed {})", dataset.seed());
    println!();
    println!("  Patients          {}", stats.total_patients);
    println!(
        "  Risk tiers        {} high / {} moderate / {} low",
        stats.high_risk_patients, stats.moderate_risk_patients, stats.low_risk_patients
    );
    println!("  Pending alerts    {}", stats.pending_alerts);
    println!("  Avg adherence     {}%", stats.average_adherence);
    println!("  Communications    {}", stats.total_communications);
    println!("  Wearable readings {}", stats.total_wearable_readings);
    println!();
    if let Some(query) = args.search.as_deref() {
        println!("Patients matching {query:?}:");
    }
    println!("{}", roster_header());
    let (sort_by, order) = args.sort.unwrap_or_default();
    let roster = dataset.search_patients(
        args.search.as_deref().unwrap_or(""),
        sort_by,
        order,
        args.limit,
    );
    for p in roster {
        println!("{}", roster_row(p));
    }

    println!();
    println!("Pending alerts:");
    for alert in board.filter(Some(AlertStatus::Pending)) {
        println!(
            "  [{}] {} {} - {} ({})",
            alert.risk_level,
            alert.id,
            patient_name(dataset.patients(), alert),
            alert.title,
            alert.rule_triggered
        );
    }
}

fn roster_header() -> String {
    format!(
        "  {:<5} {:<16} {:>4} {:<12} {:>9}  {}",
        "ID", "Name", "Age", "Risk", "Adherence", "Last contact"
    )
}

fn roster_row(p: &Patient) -> String {
    format!(
        "  {:<5} {:<16} {:>4} {:<12} {:>8}%  {}",
        p.id,
        p.name,
        p.age,
        format!("{} {}", p.risk_score, p.risk_level.as_str()),
        p.adherence_score,
        p.last_contact
    )
}

fn print_patient(dataset: &SimulatedDataset, board: &AlertBoard, patient: &Patient) {
    println!("{} ({}), {} {}", patient.name, patient.id, patient.age, patient.gender);
    println!(
        "  Risk: {} ({}) - {}",
        patient.risk_score,
        patient.risk_level,
        patient.risk_level.description()
    );
    let breakdown = heartguard::application::assess_risk(
        patient,
        dataset.wearable_readings(&patient.id),
        dataset.communication_logs(&patient.id),
    );
    println!(
        "  Score breakdown: baseline {} + wearable {} + communication {}",
        breakdown.baseline, breakdown.wearable, breakdown.communication
    );
    println!(
        "  Hypertension: {}  Past stroke: {}",
        yes_no(patient.known_hypertension),
        yes_no(patient.past_stroke_history)
    );
    println!("  Medications: {}", list_or_none(&patient.medications));
    println!("  Symptoms: {}", list_or_none(&patient.symptoms));
    println!(
        "  Lifestyle: salt {}, alcohol {}, stress {}",
        patient.lifestyle_risks.salt_intake,
        patient.lifestyle_risks.alcohol,
        patient.lifestyle_risks.stress
    );
    println!(
        "  Adherence: {}%  Enrolled: {}  Last contact: {}",
        patient.adherence_score, patient.enrollment_date, patient.last_contact
    );

    println!();
    println!("  Daily vitals:");
    for day in dataset.daily_wearable_aggregates(&patient.id) {
        println!(
            "    {}  HR {:>3} bpm  steps {:>6}  sleep {:.1} h",
            day.date, day.avg_heart_rate, day.total_steps, day.avg_sleep
        );
    }

    println!();
    println!("  Recent messages:");
    let logs = dataset.communication_logs(&patient.id);
    for entry in logs.iter().rev().filter(|e| e.is_inbound()).take(5) {
        println!(
            "    {} [{}] {}",
            entry.timestamp.format("%Y-%m-%d %H:%M"),
            entry.channel.label(),
            entry.message
        );
    }

    println!();
    println!("  Alerts:");
    for alert in board.all().iter().filter(|a| a.patient_id == patient.id) {
        println!("    {} [{}] {} - {}", alert.id, alert.status, alert.risk_level, alert.title);
    }
}

fn print_patient_json(dataset: &SimulatedDataset, patient: &Patient) -> Result<()> {
    let detail = serde_json::json!({
        "patient": patient,
        "wearableData": dataset.wearable_readings(&patient.id),
        "dailyAggregates": dataset.daily_wearable_aggregates(&patient.id),
        "communicationLogs": dataset.communication_logs(&patient.id),
    });
    println!("{}", serde_json::to_string_pretty(&detail)?);
    Ok(())
}

fn ask_assistant(message: &str) {
    println!();
    println!("AI: {}", assistant::GREETING);
    match assistant::reply(message) {
        Some(answer) => {
            println!();
            println!("You: {}", message.trim());
            println!();
            println!("AI: {answer}");
        }
        None => {
            println!();
            println!("Try one of:");
            for intent in AssistantIntent::ALL {
                println!("  {:<22} {}", intent.label(), intent.prompt());
            }
        }
    }
}

fn run_voice_triage(seed: u64) -> Result<VoiceAnalysis> {
    let service = Arc::new(VoiceTriageService::with_seed(
        VoiceConfig::from_env_or_default(),
        seed,
    ));
    let handle = VoiceWorker::spawn(service);

    println!();
    println!("Voice triage:");
    loop {
        match handle.progress_rx.recv() {
            Ok(VoiceProgress::Listening) => println!("  listening..."),
            Ok(VoiceProgress::Transcribing) => println!("  transcribing..."),
            Ok(VoiceProgress::Complete(analysis)) => {
                println!("  \"{}\"", analysis.transcript);
                println!(
                    "  confidence {:.0}%  severity {}/10  intents: {}",
                    analysis.confidence * 100.0,
                    analysis.severity_score,
                    analysis.intent_keywords().join(", ")
                );
                println!("  reply: {}", analysis.auto_response);
                return Ok(analysis);
            }
            Ok(VoiceProgress::Error(e)) => bail!("voice triage failed: {e}"),
            Err(_) => bail!("voice worker exited without a result"),
        }
    }
}

fn escalate(
    dataset: &SimulatedDataset,
    board: &mut AlertBoard,
    patient: Option<&Patient>,
    voice: Option<&VoiceAnalysis>,
) {
    let notifier = match WhatsAppNotifier::from_env() {
        Ok(n) => Arc::new(n),
        Err(e) => {
            tracing::warn!("Escalation skipped: {}", e);
            return;
        }
    };
    let service = match EscalationService::new(notifier, &EscalationConfig::from_env_or_default()) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!("Escalation skipped: {}", e);
            return;
        }
    };

    let report = match service.escalate_and_acknowledge(board, dataset.patients()) {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!("Escalation stopped: {}", e);
            return;
        }
    };
    println!();
    println!(
        "Escalated {} alert(s), {} failed",
        report.sent.len(),
        report.failed.len()
    );

    if let Some(analysis) = voice {
        let caller = patient.map_or("Unknown caller", |p| p.name.as_str());
        match service.escalate_voice(caller, analysis) {
            Ok(true) => println!("Nurse paged for voice message"),
            Ok(false) => println!("Voice message below escalation threshold"),
            Err(e) => tracing::warn!("Voice escalation failed: {}", e),
        }
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args> {
        parse_args(list.iter().map(|s| (*s).to_string()))
    }

    #[test]
    fn test_parse_flags() {
        let parsed = args(&["--seed", "42", "--patient", "P002", "--escalate"]).expect("parse");
        assert_eq!(parsed.seed, Some(42));
        assert_eq!(parsed.patient.as_deref(), Some("P002"));
        assert!(parsed.escalate);
        assert!(!parsed.voice);
        assert!(parsed.ask.is_none());

        let parsed =
            args(&["--ask", "Analyze current risk levels and recommend actions"]).expect("parse");
        assert_eq!(
            parsed.ask.as_deref(),
            Some("Analyze current risk levels and recommend actions")
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(args(&["--seed"]).is_err());
        assert!(args(&["--seed", "abc"]).is_err());
        assert!(args(&["--frobnicate"]).is_err());
        assert!(args(&["--sort", "age"]).is_err());
        assert!(args(&["--sort", "risk:sideways"]).is_err());
        assert!(args(&["--limit", "-1"]).is_err());
    }

    #[test]
    fn test_parse_hex_seed() {
        assert_eq!(args(&["--seed", "0x2a"]).expect("parse").seed, Some(42));
        assert_eq!(
            args(&["--seed", "0XDEADBEEF"]).expect("parse").seed,
            Some(0xDEAD_BEEF)
        );
        assert!(args(&["--seed", "0xzz"]).is_err());
    }

    #[test]
    fn test_parse_roster_flags() {
        let parsed = args(&["--search", "an", "--sort", "adherence:asc", "--limit", "3"])
            .expect("parse");
        assert_eq!(parsed.search.as_deref(), Some("an"));
        assert_eq!(parsed.sort, Some((PatientSort::Adherence, SortOrder::Ascending)));
        assert_eq!(parsed.limit, Some(3));

        let parsed = args(&["--sort", "name:asc"]).expect("parse");
        assert_eq!(parsed.sort, Some((PatientSort::Name, SortOrder::Ascending)));

        let parsed = args(&["--sort", "risk"]).expect("parse");
        assert_eq!(parsed.sort, Some((PatientSort::Risk, SortOrder::Descending)));
        assert!(args(&[]).expect("parse").sort.is_none());
    }

    #[test]
    fn test_roster_columns_align() {
        let dataset =
            SimulatedDataset::build(&SimulationConfig::with_seed(2024)).expect("dataset");
        let header = roster_header();
        let adherence_end = header.find("Adherence").expect("column") + "Adherence".len() - 1;
        let contact_start = header.find("Last contact").expect("column");

        let mut patients: Vec<Patient> = dataset.patients().to_vec();
        patients.push(patients[0].clone().with_risk_score(69));
        patients.push(patients[0].clone().with_risk_score(100));
        for p in &patients {
            let row = roster_row(p);
            assert_eq!(row.find('%'), Some(adherence_end), "{row}");
            assert_eq!(&row[contact_start..], p.last_contact.to_string(), "{row}");
        }
    }

    #[test]
    fn test_list_or_none() {
        assert_eq!(list_or_none(&[]), "none");
        assert_eq!(
            list_or_none(&["a".to_string(), "b".to_string()]),
            "a, b"
        );
    }
}
