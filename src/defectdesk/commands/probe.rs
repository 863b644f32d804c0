use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::roots::resolver::PathResolver;

/// Runs a fresh probe of every candidate root. Does not change the session root.
pub fn run(resolver: &PathResolver) -> Result<CmdResult> {
    let report = resolver.probe().run();
    let mut result = CmdResult::default();

    match report.chosen() {
        Some(chosen) => result.add_message(CmdMessage::success(format!(
            "Preferred root: {} ({})",
            chosen.path.display(),
            chosen.kind
        ))),
        None => result.add_message(CmdMessage::error(
            "No candidate storage root is writable.",
        )),
    }
    Ok(result.with_probe(report))
}
