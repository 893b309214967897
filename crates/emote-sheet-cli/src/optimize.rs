use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, bail};
use tracing::debug;

use crate::settings::Settings;

/// Locates `name` on `PATH`.
pub fn find_tool(name: &str) -> Option<PathBuf> {
    let path = env::var_os("PATH")?;
    env::split_paths(&path)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Checks that both optimizer executables exist. Runs at startup, before any
/// output is touched; a missing tool aborts the whole run.
pub fn require_tools(settings: &Settings) -> anyhow::Result<()> {
    for argv in [&settings.css_minifier, &settings.png_optimizer] {
        let Some(tool) = argv.first() else {
            bail!("optimizer command is empty");
        };
        if find_tool(tool).is_none() {
            bail!("required tool `{tool}` not found on PATH");
        }
    }
    Ok(())
}

/// Substitutes `{in}`/`{out}` placeholders into an optimizer argv.
pub fn expand_argv(argv: &[String], input: &Path, output: Option<&Path>) -> Vec<String> {
    argv.iter()
        .map(|arg| {
            let arg = arg.replace("{in}", &input.to_string_lossy());
            match output {
                Some(out) => arg.replace("{out}", &out.to_string_lossy()),
                None => arg,
            }
        })
        .collect()
}

fn run(argv: &[String], input: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    let expanded = expand_argv(argv, input, output);
    let (tool, args) = expanded.split_first().expect("argv checked at startup");
    debug!(tool, ?args, "running optimizer");
    let status = Command::new(tool)
        .args(args)
        .status()
        .with_context(|| format!("invoke `{tool}`"))?;
    if !status.success() {
        bail!("`{tool}` exited with {status}");
    }
    Ok(())
}

pub fn minify_css(settings: &Settings, input: &Path, output: &Path) -> anyhow::Result<()> {
    run(&settings.css_minifier, input, Some(output))
}

pub fn optimize_png(settings: &Settings, input: &Path) -> anyhow::Result<()> {
    run(&settings.png_optimizer, input, None)
}
