use std::io::BufRead;

use anyhow::{bail, Context, Result};
use gestura::{GestureEvent, Point, PointerId, PointerPhase, PointerSample};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TraceLine {
    Sample(PointerSample),
    Idle { t_ms: u64 },
}

impl TraceLine {
    pub fn t_ms(&self) -> u64 {
        match self {
            Self::Sample(sample) => sample.t_ms,
            Self::Idle { t_ms } => *t_ms,
        }
    }
}

pub const OUTPUT_HEADER: &str = "event,t_ms,name,dx,dy,distance,speed,scale,rotation";

/// Reads `sample,<t_ms>,<id>,<phase>,<x>,<y>` and `idle,<t_ms>` lines.
pub fn parse_trace(reader: impl BufRead) -> Result<Vec<TraceLine>> {
    let mut out = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.with_context(|| format!("failed to read line {line_no}"))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let parsed =
            parse_line(trimmed).with_context(|| format!("line {line_no}: `{trimmed}`"))?;
        out.push(parsed);
    }
    Ok(out)
}

fn parse_line(line: &str) -> Result<TraceLine> {
    let parts: Vec<&str> = line.split(',').map(str::trim).collect();
    match parts.as_slice() {
        ["idle", t_ms] => Ok(TraceLine::Idle {
            t_ms: t_ms.parse().context("invalid t_ms")?,
        }),
        ["sample", t_ms, id, phase, x, y] => {
            let phase = match *phase {
                "down" => PointerPhase::Down,
                "move" => PointerPhase::Move,
                "up" => PointerPhase::Up,
                "cancel" => PointerPhase::Cancel,
                other => bail!("unknown phase `{other}`"),
            };
            Ok(TraceLine::Sample(PointerSample::new(
                PointerId(id.parse().context("invalid pointer id")?),
                Point::new(
                    x.parse().context("invalid x")?,
                    y.parse().context("invalid y")?,
                ),
                t_ms.parse().context("invalid t_ms")?,
                phase,
            )))
        }
        ["sample", ..] => bail!("sample lines take 6 columns"),
        [kind, ..] => bail!("unknown line kind `{kind}`"),
        [] => bail!("empty line"),
    }
}

/// Event names from an expectation file: one or more comma-separated names per line.
pub fn parse_expected(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split(','))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .collect()
}

pub fn format_event(event: &GestureEvent) -> String {
    let m = &event.global;
    format!(
        "event,{},{},{:.1},{:.1},{:.1},{:.1},{:.3},{:.1}",
        event.t_ms,
        event.name(),
        m.delta_x,
        m.delta_y,
        m.distance,
        m.speed,
        m.scale,
        m.rotation
    )
}
