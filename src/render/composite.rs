use std::path::{Path, PathBuf};

use crate::compile::invocation::Invocation;
use crate::foundation::core::{Gravity, Offset, OutputFormat};
use crate::foundation::error::LaminateResult;
use crate::render::exec::ProcessRunner;

/// A rendered overlay ready to be merged onto its parent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverlayInput {
    pub path: PathBuf,
    /// Placement relative to the parent's gravity anchor.
    pub offset: Offset,
}

/// Build the single invocation that stacks `overlays` onto `base` in list order.
///
/// `base -gravity G  ov1 -geometry +x+y -composite  ov2 ... FORMAT:output`
pub fn compose_invocation(
    command: &str,
    base: &Path,
    overlays: &[OverlayInput],
    gravity: Gravity,
    output: &Path,
    format: OutputFormat,
) -> Invocation {
    let mut args = Vec::with_capacity(4 + overlays.len() * 4);
    args.push(base.display().to_string());
    args.push("-gravity".to_string());
    args.push(gravity.as_str().to_string());
    for overlay in overlays {
        args.push(overlay.path.display().to_string());
        args.push("-geometry".to_string());
        args.push(overlay.offset.geometry());
        args.push("-composite".to_string());
    }
    args.push(format.output_arg(output));
    Invocation {
        command: command.to_string(),
        args,
    }
}

/// Merge `overlays` onto `base` and write the result to `output`.
#[allow(clippy::too_many_arguments)]
pub fn compose(
    runner: &dyn ProcessRunner,
    command: &str,
    base: &Path,
    overlays: &[OverlayInput],
    gravity: Gravity,
    output: &Path,
    format: OutputFormat,
    context: &str,
) -> LaminateResult<()> {
    let invocation = compose_invocation(command, base, overlays, gravity, output, format);
    tracing::debug!(%invocation, overlays = overlays.len(), "compositing");
    runner.run_checked(&invocation, context)?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
