use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};

use std::fs;
use std::io::Write;
use std::thread;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use weighted_draw::reveal::RevealFrame;
use weighted_draw::session::RaffleSession;
use weighted_draw::*;

use crate::args::Args;
use crate::raffle::config_reader::*;
use crate::raffle::io_common::*;
use crate::raffle::io_excel::*;

pub mod config_reader;
pub mod io_common;
pub mod io_excel;

#[derive(Debug, Snafu)]
pub enum RaffleError {
    #[snafu(display("{source}"))]
    Ingest { source: IngestError },
    #[snafu(display("{source}"))]
    Draw { source: DrawError },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error reading JSON: {source}"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Could not understand the number {value:?} for {field}"))]
    ParsingJsonNumber { field: String, value: String },
    #[snafu(display("Error writing to {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display(
        "No participants file provided. Use --input or the inputFile entry of the configuration."
    ))]
    MissingInput {},
    #[snafu(display("Difference detected between the draws and the reference summary"))]
    ReferenceMismatch {},

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type RaffleResult<T> = Result<T, RaffleError>;

pub type IngestResult<T> = Result<T, IngestError>;

/// Everything needed for a run, once the command line and the configuration file are merged.
#[derive(PartialEq, Debug, Clone)]
pub struct RunSettings {
    pub input: String,
    pub contest: String,
    pub number_of_draws: u32,
    pub seed: Option<u64>,
    pub animate: bool,
    pub timing: RevealTiming,
    pub out: Option<String>,
    pub reference: Option<String>,
}

/// One resolved draw, as reported in the summary.
#[derive(PartialEq, Debug, Clone)]
pub struct DrawSummary {
    pub draw: u32,
    pub record: DrawRecord,
    // Chance of the winner among the participants that could win this draw.
    pub eligible_win_chance: f64,
    // Participants that can still win after this draw.
    pub remaining: usize,
}

/// Merges the command line with the configuration file. The command line wins.
pub fn resolve_settings(args: &Args, config: Option<&RaffleConfig>) -> RaffleResult<RunSettings> {
    let default_config = RaffleConfig::default();
    let config = config.unwrap_or(&default_config);
    let ds = &config.draw_settings;

    let input = match (&args.input, &config.input_file) {
        (Some(i), _) => i.clone(),
        (None, Some(f)) => resolve_path(args.config.as_deref(), &f.file_path),
        (None, None) => return MissingInputSnafu {}.fail(),
    };

    let seed = match args.seed {
        Some(s) => Some(s),
        None => ds.seed()?,
    };

    let defaults = RevealTiming::DEFAULT_TIMING;
    let timing = RevealTiming {
        duration: args
            .reveal_ms
            .or(ds.reveal_duration_ms)
            .map(Duration::from_millis)
            .unwrap_or(defaults.duration),
        tick_interval: args
            .tick_ms
            .or(ds.tick_interval_ms)
            .map(Duration::from_millis)
            .unwrap_or(defaults.tick_interval),
    };

    let out = args
        .out
        .clone()
        .or_else(|| config.output_settings.output_file.clone())
        .map(|o| resolve_output(args, &o));

    Ok(RunSettings {
        contest: config
            .output_settings
            .contest_name
            .clone()
            .unwrap_or_else(|| simplify_file_name(&input)),
        input,
        number_of_draws: args.draws.or(ds.number_of_draws).unwrap_or(1),
        seed,
        animate: !args.no_animation && ds.animate.unwrap_or(true),
        timing,
        out,
        reference: args.reference.clone(),
    })
}

// An output file coming from the configuration is relative to the configuration file.
fn resolve_output(args: &Args, out: &str) -> String {
    if out == "stdout" || args.out.is_some() {
        out.to_string()
    } else {
        resolve_path(args.config.as_deref(), out)
    }
}

/// Runs the requested number of draws on a loaded session.
///
/// The shuffle frames and the winners are written to `display`. Stops early, with a notice,
/// when every participant has won.
pub fn run_draws<R: Rng, W: Write>(
    session: &mut RaffleSession,
    settings: &RunSettings,
    rng: &mut R,
    display: &mut W,
) -> RaffleResult<Vec<DrawSummary>> {
    let mut res: Vec<DrawSummary> = Vec::new();
    for draw in 1..=settings.number_of_draws {
        let chances = session.eligible_win_chances();
        let outcome = if settings.animate {
            let requested = session.request_draw(rng);
            if requested.is_ok() {
                run_ticker(session, rng, display);
            }
            requested
        } else {
            session.draw_immediately(rng)
        };
        let outcome = match outcome {
            Err(DrawError::ExhaustedPool) => {
                warn!("run_draws: pool exhausted before draw {}", draw);
                writeln!(display, "{}", DrawError::ExhaustedPool)
                    .context(WritingOutputSnafu { path: "display" })?;
                break;
            }
            x => x.context(DrawSnafu {})?,
        };
        let record = match session.history().first() {
            Some(r) => r.clone(),
            None => whatever!("The draw {} was not recorded", draw),
        };
        debug!("run_draws: draw {} record {:?}", draw, record);

        let summary = DrawSummary {
            draw,
            eligible_win_chance: chances.get(&outcome.winner.id).cloned().unwrap_or(0.0),
            remaining: session.eligible().len(),
            record,
        };
        writeln!(
            display,
            "Winner #{}: {} (code {}, weight {}, {:.2}% chance)",
            draw,
            summary.record.winner.name,
            summary.record.winner.code,
            summary.record.winner.weight,
            summary.eligible_win_chance
        )
        .context(WritingOutputSnafu { path: "display" })?;
        res.push(summary);
    }
    Ok(res)
}

// Drives the reveal in real time, one tick per interval, until it stops producing frames.
// A failing display does not stop the reveal.
fn run_ticker<R: Rng, W: Write>(session: &mut RaffleSession, rng: &mut R, display: &mut W) {
    let interval = session.timing().tick_interval;
    loop {
        thread::sleep(interval);
        let written = match session.tick(rng) {
            None => break,
            Some(RevealFrame::Shuffle(p)) => write!(display, "\r  {:<12} {:<40}", p.code, p.name)
                .and_then(|_| display.flush()),
            Some(RevealFrame::Reveal(p)) => writeln!(display, "\r  {:<12} {:<40}", p.code, p.name),
        };
        if let Err(e) = written {
            warn!("run_ticker: cannot display the reveal: {}", e);
        }
    }
}

fn build_summary_js(
    settings: &RunSettings,
    participants: &[Participant],
    draws: &[DrawSummary],
) -> JSValue {
    let total_weight: f64 = participants.iter().map(|p| p.weight).sum();
    let results: Vec<JSValue> = draws
        .iter()
        .map(|d| {
            let w = &d.record.winner;
            json!({
                "draw": d.draw,
                "timestamp": d.record.timestamp.to_rfc3339(),
                "code": w.code,
                "name": w.name,
                "weight": w.weight,
                "winChance": w.win_chance,
                "eligibleWinChance": d.eligible_win_chance,
                "remaining": d.remaining,
            })
        })
        .collect();
    json!({
        "config": {
            "contest": settings.contest,
            "source": simplify_file_name(&settings.input),
            "participants": participants.len(),
            "totalWeight": total_weight,
            "seed": settings.seed.map(|s| s.to_string()),
        },
        "results": results
    })
}

fn write_summary(out: &Option<String>, pretty: &str) -> RaffleResult<()> {
    match out.as_deref() {
        None | Some("stdout") | Some("") => {
            println!("{}", pretty);
            Ok(())
        }
        Some(path) => {
            info!("write_summary: writing summary to {:?}", path);
            fs::write(path, pretty).context(WritingOutputSnafu { path })
        }
    }
}

fn check_reference(reference_path: &str, summary: &JSValue) -> RaffleResult<()> {
    let summary_ref = read_summary(reference_path)?;
    let pretty_ref = serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
    let pretty_stats = serde_json::to_string_pretty(&strip_timestamps(summary.clone()))
        .context(ParsingJsonSnafu {})?;
    if pretty_ref != pretty_stats {
        warn!("Found differences with the reference summary");
        print_diff(pretty_ref.as_str(), pretty_stats.as_str(), "\n");
        return ReferenceMismatchSnafu {}.fail();
    }
    info!("check_reference: draws match {:?}", reference_path);
    Ok(())
}

pub fn run_raffle(args: &Args) -> RaffleResult<()> {
    let config = match &args.config {
        Some(p) => Some(read_config(p)?),
        None => None,
    };
    let settings = resolve_settings(args, config.as_ref())?;
    info!("settings: {:?}", settings);

    let rows = read_excel_rows(&settings.input).context(IngestSnafu {})?;
    let participants = ingest(&rows).context(IngestSnafu {})?;

    let mut session = RaffleSession::new(settings.timing);
    session.load(participants);

    let mut rng: StdRng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut display = std::io::stderr();
    writeln!(
        display,
        "{}: {} participants loaded",
        settings.contest,
        session.participants().len()
    )
    .context(WritingOutputSnafu { path: "stderr" })?;
    let draws = run_draws(&mut session, &settings, &mut rng, &mut display)?;

    let summary = build_summary_js(&settings, session.participants(), &draws);
    let pretty = serde_json::to_string_pretty(&summary).context(ParsingJsonSnafu {})?;
    write_summary(&settings.out, &pretty)?;

    if let Some(reference_path) = &settings.reference {
        check_reference(reference_path, &summary)?;
    }
    Ok(())
}
