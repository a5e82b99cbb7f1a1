//! Text and NDJSON rendering of a [`RunReport`].

use std::fmt::Write;

use serde::Serialize;

use crate::scenario::{RunReport, ScenarioConfig};

#[derive(Serialize)]
struct Summary<'a> {
    scenario: &'a ScenarioConfig,
    tiles_flushed: u32,
    position_known: bool,
}

/// Human-readable report: a summary followed by one block per destination.
pub fn text(report: &RunReport) -> String {
    let mut out = String::new();
    let scenario = &report.scenario;
    writeln!(
        out,
        "scenario tiles={} invalidations={} style-updates={}",
        scenario.tiles, scenario.invalidations, scenario.style_updates
    )
    .expect("write scenario");
    writeln!(
        out,
        "tiles flushed: {}, position known: {}",
        report.tiles_flushed,
        if report.position_known { "yes" } else { "no" }
    )
    .expect("write summary");
    for dest in &report.destinations {
        let queue = &dest.queue;
        writeln!(out, "{} dispatched={}", dest.destination, dest.dispatched)
            .expect("write destination");
        writeln!(
            out,
            "  queue accepted={} collapsed={} rejected={} discarded={} popped={}",
            queue.accepted,
            queue.collapsed,
            queue.rejected_closed,
            queue.discarded_on_close,
            queue.popped
        )
        .expect("write queue");
        for (kind, count) in &dest.per_kind {
            writeln!(out, "  {kind}: {count}").expect("write kind");
        }
    }
    out
}

/// One JSON object per line: the summary, then each destination.
pub fn ndjson(report: &RunReport) -> serde_json::Result<String> {
    let mut out = serde_json::to_string(&Summary {
        scenario: &report.scenario,
        tiles_flushed: report.tiles_flushed,
        position_known: report.position_known,
    })?;
    out.push('\n');
    for dest in &report.destinations {
        out.push_str(&serde_json::to_string(dest)?);
        out.push('\n');
    }
    Ok(out)
}
