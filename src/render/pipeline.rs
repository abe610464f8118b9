use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;

use crate::compile::consolidate::group_consolidatable;
use crate::compile::invocation::{
    Invocation, foundation_invocation, group_invocation, primitives_invocation,
};
use crate::compile::plan::primitives_deferred;
use crate::drawable::{DEFAULT_PROCESS, Drawable};
use crate::foundation::core::{Offset, OutputFormat};
use crate::foundation::error::{LaminateError, LaminateResult};
use crate::layer::model::{Layer, MAX_LAYER_DEPTH};
use crate::layer::traverse::{LayerPath, flatten};
use crate::render::composite::{OverlayInput, compose};
use crate::render::exec::{ProcessRunner, SystemRunner};
use crate::render::rotation::compensate_effects;
use crate::render::workspace::{
    FileSystem, LocalFs, NameGenerator, ScratchDir, UuidNames, close_all,
};

/// Options for [`Renderer`].
#[derive(Clone, Debug)]
pub struct RendererOpts {
    /// Directory under which every chain gets its own scratch directory.
    ///
    /// Created on demand. When a render creates it, the render also removes it again if it is
    /// empty afterwards; an existing directory is left in place.
    pub scratch_root: PathBuf,
    /// Worker threads for the render pool; `None` uses rayon's default.
    pub threads: Option<usize>,
    /// Executable run in place of [`DEFAULT_PROCESS`]: for compositing, deferred primitives, and
    /// every drawable that uses the default tool. Drawables naming another process keep it.
    pub command: String,
}

impl Default for RendererOpts {
    fn default() -> Self {
        Self {
            scratch_root: std::env::temp_dir().join("laminate"),
            threads: None,
            command: DEFAULT_PROCESS.to_string(),
        }
    }
}

impl RendererOpts {
    pub fn validate(&self) -> LaminateResult<()> {
        if self.command.trim().is_empty() {
            return Err(LaminateError::validation(
                "renderer 'command' must not be empty",
            ));
        }
        if self.scratch_root.as_os_str().is_empty() {
            return Err(LaminateError::validation(
                "renderer 'scratch_root' must not be empty",
            ));
        }
        Ok(())
    }

    /// The executable actually run for a drawable's `process`.
    pub fn executable<'a>(&'a self, process: &'a str) -> &'a str {
        if process == DEFAULT_PROCESS {
            &self.command
        } else {
            process
        }
    }
}

/// Counts gathered over one [`Renderer::render`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub layers: usize,
    /// External tool runs, compositing included.
    pub invocations: usize,
    pub effect_groups: usize,
    pub scratch_dirs: usize,
}

#[derive(Debug, Default)]
struct Counters {
    invocations: AtomicUsize,
    effect_groups: AtomicUsize,
    scratch_dirs: AtomicUsize,
}

impl Counters {
    fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self, layers: usize) -> RenderStats {
        RenderStats {
            layers,
            invocations: self.invocations.load(Ordering::Relaxed),
            effect_groups: self.effect_groups.load(Ordering::Relaxed),
            scratch_dirs: self.scratch_dirs.load(Ordering::Relaxed),
        }
    }
}

/// A layer rendered to a file, with the scratch directory that owns the file.
///
/// Dropping it (or closing `scratch`) removes the file.
#[derive(Debug)]
struct RenderedLayer {
    scratch: ScratchDir,
    output: PathBuf,
    /// Placement offset corrected for canvas growth.
    offset: Offset,
}

/// Where the root's result goes.
#[derive(Clone, Copy, Debug)]
struct FinalTarget<'a> {
    path: &'a Path,
    format: OutputFormat,
}

/// Renders layer trees by driving the external raster tool.
///
/// A renderer owns its thread pool and can be reused for any number of renders.
pub struct Renderer {
    opts: RendererOpts,
    runner: Arc<dyn ProcessRunner>,
    fs: Arc<dyn FileSystem>,
    names: Arc<dyn NameGenerator>,
    pool: rayon::ThreadPool,
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("opts", &self.opts)
            .field("threads", &self.pool.current_num_threads())
            .finish_non_exhaustive()
    }
}

impl Renderer {
    /// A renderer that runs real processes on the local filesystem.
    pub fn new(opts: RendererOpts) -> LaminateResult<Self> {
        Self::with_collaborators(
            opts,
            Arc::new(SystemRunner),
            Arc::new(LocalFs),
            Arc::new(UuidNames),
        )
    }

    pub fn with_collaborators(
        opts: RendererOpts,
        runner: Arc<dyn ProcessRunner>,
        fs: Arc<dyn FileSystem>,
        names: Arc<dyn NameGenerator>,
    ) -> LaminateResult<Self> {
        opts.validate()?;
        let pool = build_thread_pool(opts.threads)?;
        Ok(Self {
            opts,
            runner,
            fs,
            names,
            pool,
        })
    }

    pub fn opts(&self) -> &RendererOpts {
        &self.opts
    }

    /// Render `root` and everything above it into a single image at `output`.
    ///
    /// The tree is validated before any process runs. Every scratch directory created along the
    /// way is removed before this returns, whether it succeeds or not, and so is the scratch root
    /// itself when this call created it.
    #[tracing::instrument(skip(self, root, output), fields(output = %output.display()))]
    pub fn render(
        &self,
        root: &Layer,
        output: &Path,
        format: OutputFormat,
    ) -> LaminateResult<RenderStats> {
        let layers = flatten(root)?.len();

        if let Some(parent) = output.parent()
            && !parent.as_os_str().is_empty()
        {
            self.fs.create_dir_all(parent)?;
        }
        let created_root = !self.opts.scratch_root.exists();
        self.fs.create_dir_all(&self.opts.scratch_root)?;

        let result = self.render_in_scratch(root, output, format, layers);
        if created_root {
            self.release_scratch_root();
        }
        result
    }

    fn render_in_scratch(
        &self,
        root: &Layer,
        output: &Path,
        format: OutputFormat,
        layers: usize,
    ) -> LaminateResult<RenderStats> {
        let run = RenderRun {
            renderer: self,
            counters: Counters::default(),
        };
        let target = FinalTarget {
            path: output,
            format,
        };
        let rendered = self
            .pool
            .install(|| run.render_layer(root, &LayerPath::root(), Some(target)))?;

        // With overlays the compositor already wrote to `output`.
        let placed = if root.overlays().is_empty() {
            self.fs.move_file(&rendered.output, output)
        } else {
            Ok(())
        };
        match placed {
            Ok(()) => rendered.scratch.close()?,
            Err(e) => return Err(rendered.scratch.close_after(e)),
        }

        let stats = run.counters.snapshot(layers);
        tracing::info!(
            layers = stats.layers,
            invocations = stats.invocations,
            effect_groups = stats.effect_groups,
            "render complete"
        );
        Ok(stats)
    }

    /// Remove a scratch root this render created. A root still holding entries (another
    /// render's directories, say) is kept.
    fn release_scratch_root(&self) {
        let root = &self.opts.scratch_root;
        if let Err(e) = self.fs.remove_empty_dir(root) {
            tracing::debug!(path = %root.display(), error = %e, "kept scratch root");
        }
    }
}

/// State of one top-level render, shared by every branch.
struct RenderRun<'r> {
    renderer: &'r Renderer,
    counters: Counters,
}

impl RenderRun<'_> {
    /// Render `layer`'s chain and its overlay subtrees concurrently, then merge them.
    fn render_layer(
        &self,
        layer: &Layer,
        path: &LayerPath,
        target: Option<FinalTarget<'_>>,
    ) -> LaminateResult<RenderedLayer> {
        // The chain only writes the requested format when nothing is composited on top.
        let chain_format = match target {
            Some(t) if layer.overlays().is_empty() => t.format,
            _ => OutputFormat::Png,
        };

        let (own, overlays) = rayon::join(
            || self.render_chain(layer, path, chain_format),
            || {
                layer
                    .overlays()
                    .par_iter()
                    .enumerate()
                    .map(|(i, overlay)| self.render_layer(overlay, &path.child(i), None))
                    .collect::<Vec<_>>()
            },
        );
        let (own, overlays) = settle(own, overlays)?;
        if overlays.is_empty() {
            return Ok(own);
        }

        let (output, format) = match target {
            Some(t) => (t.path.to_path_buf(), t.format),
            None => (
                own.scratch
                    .file(&self.renderer.names.next_name(), OutputFormat::Png),
                OutputFormat::Png,
            ),
        };
        let inputs: Vec<OverlayInput> = overlays
            .iter()
            .map(|o| OverlayInput {
                path: o.output.clone(),
                offset: o.offset,
            })
            .collect();

        Counters::bump(&self.counters.invocations);
        let composed = compose(
            self.renderer.runner.as_ref(),
            &self.renderer.opts.command,
            &own.output,
            &inputs,
            layer.gravity(),
            &output,
            format,
            &stage_context(layer, path, "composite"),
        );
        let mut cleanup = close_all(overlays.into_iter().map(|o| o.scratch));

        match composed {
            Ok(()) if cleanup.is_empty() => Ok(RenderedLayer { output, ..own }),
            Ok(()) => {
                let first = cleanup.remove(0);
                Err(own.scratch.close_after(first.with_cleanup(cleanup)))
            }
            Err(e) => Err(own.scratch.close_after(e.with_cleanup(cleanup))),
        }
    }

    /// Run `layer`'s own invocations in a fresh scratch directory.
    fn render_chain(
        &self,
        layer: &Layer,
        path: &LayerPath,
        final_format: OutputFormat,
    ) -> LaminateResult<RenderedLayer> {
        let scratch = ScratchDir::create(
            self.renderer.fs.clone(),
            &self.renderer.opts.scratch_root,
            &self.renderer.names.next_name(),
        )?;
        Counters::bump(&self.counters.scratch_dirs);

        match self.run_chain(layer, path, &scratch, final_format) {
            Ok((output, offset)) => Ok(RenderedLayer {
                scratch,
                output,
                offset,
            }),
            Err(e) => Err(scratch.close_after(e)),
        }
    }

    fn run_chain(
        &self,
        layer: &Layer,
        path: &LayerPath,
        scratch: &ScratchDir,
        final_format: OutputFormat,
    ) -> LaminateResult<(PathBuf, Offset)> {
        let _span = tracing::debug_span!("chain", layer = %path).entered();

        let deferred = primitives_deferred(layer);
        let groups = group_consolidatable(layer.effects());
        let last_stage = groups.len() + usize::from(deferred);
        let stage_format = |stage: usize| {
            if stage == last_stage {
                final_format
            } else {
                OutputFormat::Png
            }
        };
        let next_file = |stage: usize| {
            let format = stage_format(stage);
            (scratch.file(&self.renderer.names.next_name(), format), format)
        };

        let with_foundation: &[Box<dyn Drawable>] = if deferred {
            &[]
        } else {
            layer.primitives()
        };
        let (mut current, format) = next_file(0);
        let invocation =
            foundation_invocation(layer.foundation(), with_foundation, &current, format)?;
        self.execute(invocation, &stage_context(layer, path, "foundation"))?;

        let mut offset = layer.offset();
        for (i, group) in groups.iter().enumerate() {
            let (output, format) = next_file(i + 1);
            let invocation = group_invocation(group, &current, &output, format)?;
            self.execute(
                invocation,
                &stage_context(layer, path, &format!("effect group {i}")),
            )?;
            Counters::bump(&self.counters.effect_groups);
            offset = compensate_effects(offset, group.effects);
            current = output;
        }

        if deferred {
            let (output, format) = next_file(last_stage);
            let invocation = primitives_invocation(
                &self.renderer.opts.command,
                layer.primitives(),
                &current,
                &output,
                format,
            );
            self.execute(invocation, &stage_context(layer, path, "primitives"))?;
            current = output;
        }

        Ok((current, offset))
    }

    fn execute(&self, mut invocation: Invocation, context: &str) -> LaminateResult<()> {
        if invocation.command == DEFAULT_PROCESS {
            invocation.command.clone_from(&self.renderer.opts.command);
        }
        tracing::debug!(%invocation, context, "running");
        Counters::bump(&self.counters.invocations);
        self.renderer.runner.run_checked(&invocation, context)?;
        Ok(())
    }
}

fn stage_context(layer: &Layer, path: &LayerPath, stage: &str) -> String {
    format!("layer {path} ({}), {stage}", layer.label())
}

/// Merge a layer's branch results once every branch has finished.
///
/// When anything failed, every successful branch's scratch directory is closed and the first
/// failure is returned: the layer's own chain first, then overlays in list order. Later failures
/// are logged and dropped.
fn settle(
    own: LaminateResult<RenderedLayer>,
    overlays: Vec<LaminateResult<RenderedLayer>>,
) -> LaminateResult<(RenderedLayer, Vec<RenderedLayer>)> {
    let mut survivors = Vec::with_capacity(overlays.len());
    let mut failures = Vec::new();
    for result in overlays {
        match result {
            Ok(rendered) => survivors.push(rendered),
            Err(e) => failures.push(e),
        }
    }
    let (own, own_failure) = match own {
        Ok(rendered) => (Some(rendered), None),
        Err(e) => (None, Some(e)),
    };

    let mut failures = own_failure.into_iter().chain(failures);
    let Some(first) = failures.next() else {
        let own = own.ok_or_else(|| {
            LaminateError::structure("internal error: layer output missing without a failure")
        })?;
        return Ok((own, survivors));
    };
    for dropped in failures {
        tracing::debug!(error = %dropped, "discarding additional branch failure");
    }

    let dirs = survivors
        .into_iter()
        .chain(own)
        .map(|rendered| rendered.scratch);
    Err(first.with_cleanup(close_all(dirs)))
}

/// Stack reserved per level of overlay nesting on pool threads.
///
/// Each level nests one `rayon::join` and one parallel collect, about 10 KiB in a debug build.
const STACK_PER_LEVEL: usize = 64 * 1024;

/// Worker stack size that fits a tree nested [`MAX_LAYER_DEPTH`] levels deep.
const WORKER_STACK_SIZE: usize = 2 * 1024 * 1024 + (MAX_LAYER_DEPTH + 1) * STACK_PER_LEVEL;

fn build_thread_pool(threads: Option<usize>) -> LaminateResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(LaminateError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new()
        .thread_name(|i| format!("laminate-{i}"))
        .stack_size(WORKER_STACK_SIZE);
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| LaminateError::validation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
