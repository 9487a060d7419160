use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;
use std::fmt::Write;
use std::path::Path;
use termsite_core::fade::{FadeEngine, FadeTrace, FrameReport, ObserverReport};
use termsite_core::SiteConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

pub fn run(
    config: &SiteConfig,
    trace_path: &Path,
    format: OutputFormat,
    sticky_top: Option<String>,
) -> Result<()> {
    super::init_logging(&config.logging, true)?;

    let mut trace = FadeTrace::from_file(trace_path)?;
    if sticky_top.is_some() {
        trace.sticky_top = sticky_top;
    }

    let mut engine = FadeEngine::from_settings(&config.fade);
    let reports = trace.replay_with(&mut engine);
    let observers = trace.replay_observers();
    log::info!("Replayed {} frames from {}", trace.frames.len(), trace_path.display());

    match format {
        OutputFormat::Json => {
            let out = Replay { recomputes: &reports, observers: &observers };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Table => {
            print!("{}", table(&reports));
            print!("{}", observer_table(&observers));
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct Replay<'a> {
    recomputes: &'a [FrameReport],
    observers: &'a [ObserverReport],
}

fn label<T: Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

pub fn table(reports: &[FrameReport]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>5}  {:<18}  {:<16}  {:>8}  {:>8}  {:<6}  {:<13}  {}",
        "frame", "trigger", "card", "coverage", "opacity", "sticky", "phase", "interactive"
    );
    for report in reports {
        for card in &report.cards {
            let _ = writeln!(
                out,
                "{:>5}  {:<18}  {:<16}  {:>8.4}  {:>8.4}  {:<6}  {:<13}  {}",
                report.frame,
                label(&report.trigger),
                card.id,
                card.coverage,
                card.opacity,
                card.sticky,
                label(&card.phase),
                card.interactive
            );
        }
    }
    out
}

/// Reveal and playback lines; empty when the trace carries no intersections
pub fn observer_table(reports: &[ObserverReport]) -> String {
    let mut out = String::new();
    for report in reports {
        for id in &report.revealed {
            let _ = writeln!(out, "{:>5}  reveal  {}", report.frame, id);
        }
        for video in &report.videos {
            let state = if video.playing { "playing" } else { "paused" };
            let _ = writeln!(out, "{:>5}  {:<6}  {}  ({})", report.frame, label(&video.command), video.id, state);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRACE: &str = r#"{
        "viewport": { "width": 1280, "height": 1000 },
        "frames": [
            { "cards": [{ "id": "overview", "card_top": 88, "media_top": 500 }] },
            { "events": ["resize", "orientation_change"],
              "cards": [{ "id": "overview", "card_top": 88, "media_top": 300 }] }
        ]
    }"#;

    #[test]
    fn table_lists_every_card_frame() {
        let trace = FadeTrace::from_json(TRACE).unwrap();
        let out = table(&trace.replay());
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("frame"));
        assert!(lines[1].contains("scroll"));
        assert!(lines[1].contains("0.8988"));
        assert!(lines[2].contains("orientation_change"));
        assert!(lines[2].contains("locked_hidden"));
        assert!(lines[2].ends_with("false"));
    }

    #[test]
    fn observer_table_lists_reveals_and_playback() {
        let trace = FadeTrace::from_json(
            r#"{
                "viewport": { "width": 1280, "height": 1000 },
                "frames": [
                    { "cards": [],
                      "intersections": [
                          { "id": "overview", "is_intersecting": true, "ratio": 0.5 },
                          { "id": "demo", "is_intersecting": true, "ratio": 0.8, "video": true, "autoplay_blocked": true }
                      ] }
                ]
            }"#,
        )
        .unwrap();
        let out = observer_table(&trace.replay_observers());
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("reveal  overview"));
        assert!(lines[1].ends_with("reveal  demo"));
        assert!(lines[2].contains("play"));
        assert!(lines[2].ends_with("demo  (paused)"));
    }

    #[test]
    fn observer_table_is_empty_without_intersections() {
        let trace = FadeTrace::from_json(TRACE).unwrap();
        assert!(trace.replay_observers().is_empty());
        assert_eq!(observer_table(&[]), "");
    }

    #[test]
    fn run_reports_missing_trace() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("trace.json");
        let err = run(&SiteConfig::default(), &missing, OutputFormat::Json, None).unwrap_err();
        assert!(format!("{:#}", err).contains("trace.json"));
    }
}
