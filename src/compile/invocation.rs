use std::fmt;
use std::path::Path;

use crate::compile::consolidate::ConsolidationGroup;
use crate::drawable::{Drawable, Resolved};
use crate::foundation::core::OutputFormat;
use crate::foundation::error::LaminateResult;

/// One external tool run: an executable and its full argument list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub command: String,
    pub args: Vec<String>,
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " {arg:?}")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Render a foundation, optionally with primitives drawn onto it, to `output`.
pub fn foundation_invocation(
    foundation: &dyn Drawable,
    primitives: &[Box<dyn Drawable>],
    output: &Path,
    format: OutputFormat,
) -> LaminateResult<Invocation> {
    let mut args = Resolved::new(foundation).arguments()?;
    extend_with(&mut args, primitives);
    args.push(format.output_arg(output));
    Ok(Invocation {
        command: foundation.process_name().to_string(),
        args,
    })
}

/// Run a consolidation group over `input`.
///
/// The leader is resolved against `input`; followers contribute only their own arguments since
/// they operate on the same in-flight image.
pub fn group_invocation(
    group: &ConsolidationGroup<'_>,
    input: &Path,
    output: &Path,
    format: OutputFormat,
) -> LaminateResult<Invocation> {
    let mut args = Resolved::with_source(group.leader(), input).arguments()?;
    extend_with(&mut args, group.followers());
    args.push(format.output_arg(output));
    Ok(Invocation {
        command: group.process_name().to_string(),
        args,
    })
}

/// Draw `primitives` onto an already rendered image.
pub fn primitives_invocation(
    command: &str,
    primitives: &[Box<dyn Drawable>],
    input: &Path,
    output: &Path,
    format: OutputFormat,
) -> Invocation {
    let mut args = vec![input.display().to_string()];
    extend_with(&mut args, primitives);
    args.push(format.output_arg(output));
    Invocation {
        command: command.to_string(),
        args,
    }
}

fn extend_with(args: &mut Vec<String>, drawables: &[Box<dyn Drawable>]) {
    for d in drawables {
        args.extend(d.build_arguments());
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/invocation.rs"]
mod tests;
