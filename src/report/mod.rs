//! Report rendering
//!
//! Pure functions turning a [`LogAnalysis`] into printable text or JSON.

use crate::core::RunningStats;
use crate::engine::LogAnalysis;
use crate::error::{ProcMinerError, Result};
use chrono::SecondsFormat;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

const RULE_WIDTH: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub fn render(analysis: &LogAnalysis, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(analysis)),
        OutputFormat::Json => render_json(analysis),
    }
}

pub fn render_json(analysis: &LogAnalysis) -> Result<String> {
    serde_json::to_string_pretty(analysis).map_err(|e| {
        ProcMinerError::other("failed to serialize analysis").with_source(e)
    })
}

fn value(v: Option<f64>) -> String {
    v.map(|v| format!("{:.2}", v))
        .unwrap_or_else(|| "n/a".to_string())
}

fn section(output: &mut String, title: &str) {
    output.push('\n');
    output.push_str(title);
    output.push('\n');
    output.push_str(&"-".repeat(RULE_WIDTH));
    output.push('\n');
}

fn stats_line(label: &str, stats: &RunningStats) -> String {
    format!(
        "{:<16} min {:>10}  max {:>10}  mean {:>10}  stdev {:>10}\n",
        label,
        value(stats.min()),
        value(stats.max()),
        value(stats.mean()),
        value(stats.stdev())
    )
}

/// Plain-text report: log header, case statistics, daily histogram,
/// activity table and the hand-off edge list
pub fn render_text(analysis: &LogAnalysis) -> String {
    let summary = analysis.summary();
    let overview = analysis.overview();
    let network = analysis.network();

    let mut output = format!("Log: {}\n", summary.log_name());
    if !summary.log_description().is_empty() {
        output.push_str(&format!("Description: {}\n", summary.log_description()));
    }
    output.push_str(&"=".repeat(RULE_WIDTH));
    output.push('\n');

    output.push_str(&format!("Events:          {}\n", summary.number_of_events()));
    output.push_str(&format!(
        "Cases:           {}\n",
        summary.number_of_process_instances()
    ));
    output.push_str(&format!("Activities:      {}\n", summary.number_of_activities()));
    output.push_str(&format!("Originators:     {}\n", summary.originators().count()));
    match summary.time_frame() {
        Some(frame) => output.push_str(&format!(
            "Time frame:      {} .. {}\n",
            frame.start.to_rfc3339_opts(SecondsFormat::Secs, true),
            frame.end.to_rfc3339_opts(SecondsFormat::Secs, true)
        )),
        None => output.push_str("Time frame:      n/a\n"),
    }

    section(&mut output, "Cases");
    output.push_str(&stats_line(
        &format!("duration ({})", summary.time_unit()),
        summary.case_duration_stats(),
    ));
    output.push_str(&stats_line("size (events)", summary.case_size_stats()));

    section(&mut output, "Events per day");
    if summary.events_per_day().is_empty() {
        output.push_str("(none)\n");
    }
    for (day, count) in summary.events_per_day() {
        output.push_str(&format!("{}  {:>8}\n", day, count));
    }

    section(
        &mut output,
        &format!("Activity classes (durations in {})", overview.unit()),
    );
    output.push_str(&format!(
        "{:<24} {:>8} {:>10} {:>10} {:>12}\n",
        "class", "count", "mean", "range", "total"
    ));
    for (class, stats) in overview.iter() {
        output.push_str(&format!(
            "{:<24} {:>8} {:>10} {:>10} {:>12}\n",
            class.as_str(),
            stats.count(),
            value(stats.mean()),
            value(stats.range()),
            format!("{:.2}", stats.sum())
        ));
    }

    section(&mut output, "Start / end activities");
    for class in summary.activity_classes() {
        output.push_str(&format!(
            "{:<24} starts {:>6}  ends {:>6}\n",
            class.as_str(),
            summary.starting_event_classes().count(class),
            summary.ending_event_classes().count(class)
        ));
    }

    section(&mut output, "Hand-offs");
    let edges = network.edges();
    if edges.is_empty() {
        output.push_str("(none)\n");
    }
    for edge in &edges {
        output.push_str(&format!(
            "{} -> {}  {}\n",
            edge.source, edge.target, edge.weight
        ));
    }

    output
}
