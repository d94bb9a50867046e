mod trace;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use gestura::{EngineConfig, GestureEngine, GestureOutput};

use trace::{format_event, parse_expected, parse_trace, TraceLine, OUTPUT_HEADER};

/// Replays a recorded contact trace through the gesture engine.
#[derive(Debug, Parser)]
#[command(name = "gesture_replay", version)]
struct Cli {
    /// Trace file with `sample,...` and `idle,...` lines.
    trace: PathBuf,
    /// Engine config in TOML. Built-in defaults when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Expected event names; the replay fails on any difference.
    #[arg(long)]
    expect: Option<PathBuf>,
    /// Keep ticking this long after the last line.
    #[arg(long, default_value_t = 0)]
    tail_ms: u64,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => EngineConfig::from_path(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let file = File::open(&cli.trace)
        .with_context(|| format!("failed to open trace {}", cli.trace.display()))?;
    let lines = parse_trace(BufReader::new(file))
        .with_context(|| format!("failed to parse {}", cli.trace.display()))?;

    let names = replay(config, &lines, cli.tail_ms)?;

    if let Some(path) = &cli.expect {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let expected = parse_expected(&raw);
        if expected != names {
            eprintln!("expected: {}", expected.join(","));
            eprintln!("actual:   {}", names.join(","));
            bail!("event mismatch against {}", path.display());
        }
        log::info!("{} events match {}", names.len(), path.display());
    }
    Ok(())
}

/// Prints every event as CSV and returns their names in order.
fn replay(config: EngineConfig, lines: &[TraceLine], tail_ms: u64) -> Result<Vec<String>> {
    let tick_ms = config.idle_tick_ms;
    let mut engine = GestureEngine::new(config).context("invalid engine config")?;
    let mut names = Vec::new();
    let mut last_ms = None;

    println!("{OUTPUT_HEADER}");

    for line in lines {
        let t_ms = line.t_ms();
        if let Some(prev) = last_ms {
            if t_ms < prev {
                bail!("trace goes back in time: {t_ms}ms after {prev}ms");
            }
            tick_between(&mut engine, prev, t_ms, tick_ms, |output| emit(output, &mut names))?;
        }
        let output = match line {
            TraceLine::Sample(sample) => engine.handle_sample(*sample)?,
            TraceLine::Idle { t_ms } => engine.on_idle_tick(*t_ms)?,
        };
        emit(output, &mut names);
        last_ms = Some(t_ms);
    }

    if let Some(last) = last_ms {
        let end = last.saturating_add(tail_ms);
        tick_between(&mut engine, last, end.saturating_add(1), tick_ms, |output| {
            emit(output, &mut names);
        })?;
    }
    Ok(names)
}

fn emit(output: GestureOutput, names: &mut Vec<String>) {
    for event in &output.events {
        println!("{}", format_event(event));
        names.push(event.name());
    }
}

/// Idle ticks strictly between `from_ms` and `to_ms`, only while contacts are down.
fn tick_between(
    engine: &mut GestureEngine,
    from_ms: u64,
    to_ms: u64,
    tick_ms: u64,
    mut on_output: impl FnMut(GestureOutput),
) -> Result<()> {
    let mut now_ms = from_ms.saturating_add(tick_ms);
    while now_ms < to_ms && engine.pointers().on_surface_count() > 0 {
        on_output(engine.on_idle_tick(now_ms)?);
        now_ms = now_ms.saturating_add(tick_ms);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &str) -> Vec<TraceLine> {
        parse_trace(raw.as_bytes()).expect("trace should parse")
    }

    #[test]
    fn quick_touch_replays_as_tap() {
        let names = replay(
            EngineConfig::default(),
            &lines("sample,0,1,down,10,10\nsample,120,1,up,10,10\n"),
            0,
        )
        .expect("replay");
        assert_eq!(names, vec!["tap"]);
    }

    #[test]
    fn gaps_are_filled_with_idle_ticks() {
        let names = replay(
            EngineConfig::default(),
            &lines("sample,0,1,down,10,10\nsample,1000,1,up,10,10\n"),
            0,
        )
        .expect("replay");
        assert_eq!(names, vec!["press", "pressend"]);
    }

    #[test]
    fn tail_lets_a_held_contact_mature() {
        let trace = lines("sample,0,1,down,10,10\n");
        let names = replay(EngineConfig::default(), &trace, 0).expect("replay");
        assert!(names.is_empty());
        let names = replay(EngineConfig::default(), &trace, 700).expect("replay");
        assert_eq!(names, vec!["press"]);
    }

    #[test]
    fn shipped_traces_match_their_expectations() {
        let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("traces");
        let mut checked = 0;
        for entry in std::fs::read_dir(&dir).expect("traces dir") {
            let path = entry.expect("traces entry").path();
            if path.extension().is_none_or(|ext| ext != "csv") {
                continue;
            }
            let file = File::open(&path).expect("trace file");
            let trace = parse_trace(BufReader::new(file)).expect("trace should parse");
            let raw = std::fs::read_to_string(path.with_extension("expect"))
                .expect("every trace ships an .expect file");

            let names = replay(EngineConfig::default(), &trace, 0).expect("replay");
            assert_eq!(names, parse_expected(&raw), "{}", path.display());
            checked += 1;
        }
        assert!(checked >= 2, "only {checked} traces found");
    }

    #[test]
    fn backwards_time_is_rejected() {
        let err = replay(
            EngineConfig::default(),
            &lines("sample,500,1,down,10,10\nsample,100,1,up,10,10\n"),
            0,
        )
        .expect_err("out of order trace");
        assert!(err.to_string().contains("back in time"), "{err}");
    }
}
