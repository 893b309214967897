mod auth;
mod optimize;
mod publish;
mod settings;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use emote_sheet_core::{BuildOutput, CssRefStyle, GroupRules, InputImage, build_sheets, diff};
use globset::Glob;
use image::ImageReader;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::publish::ForumClient;
use crate::settings::Settings;

#[derive(Parser, Debug)]
#[command(
    name = "emote-sheet",
    about = "Build emote sprite sheets and publish them to the forum",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Show progress bars (disable with --no-progress or --quiet)
    #[arg(long, default_value_t = true, action = ArgAction::Set, global = true, help_heading = "Logging/UX")]
    progress: bool,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging/UX"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build sprite sheets and stylesheet into the output directory
    Build(BuildArgs),
    /// Show the change set between two stylesheet files
    Diff(DiffArgs),
    /// Build, optimize, and publish to the forum
    Publish(BuildArgs),
}

#[derive(Parser, Debug, Clone)]
struct BuildArgs {
    /// JSON config file path
    #[arg(short, long, default_value = "config.json", help_heading = "Input/Output")]
    config: PathBuf,
    /// Emit url(<sheet>.png) references for local preview instead of the
    /// forum's %%name%% namespace
    #[arg(long, default_value_t = false, help_heading = "Input/Output")]
    local: bool,
}

#[derive(Parser, Debug, Clone)]
struct DiffArgs {
    /// Previously published stylesheet
    old: PathBuf,
    /// Newly generated stylesheet
    new: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    match &cli.command {
        Commands::Build(args) => {
            run_build(args, cli.progress && !cli.quiet)?;
            Ok(())
        }
        Commands::Diff(args) => run_diff(args),
        Commands::Publish(args) => run_publish(args, cli.progress && !cli.quiet),
    }
}

/// What a build run left on disk, for the publish step.
struct BuildArtifacts {
    /// Full style.css contents (raw fragments + generated rules).
    css: String,
    min_css_path: PathBuf,
    /// (sheet name, output path, raw flag) per bucket.
    sheets: Vec<(String, PathBuf, bool)>,
    /// Every emitted image name, in stylesheet order.
    names: Vec<String>,
}

fn run_build(args: &BuildArgs, show_progress: bool) -> anyhow::Result<BuildArtifacts> {
    let settings = Settings::load(&args.config)?;
    // Prerequisites first: nothing is written if a tool is missing.
    optimize::require_tools(&settings)?;

    let rules = GroupRules::compile(&settings.groups).context("compile group patterns")?;
    let paths = gather_paths(&settings.images)?;
    let (inputs, sources) = load_images_with_progress(&paths, show_progress)?;
    info!(count = inputs.len(), "loaded input images");

    let style = if args.local {
        CssRefStyle::Relative
    } else {
        CssRefStyle::Forum
    };
    let output = build_sheets(inputs, &settings.sheet, &rules, style)?;

    // Regenerate into a freshly emptied output directory.
    if settings.out_dir.exists() {
        fs::remove_dir_all(&settings.out_dir)
            .with_context(|| format!("empty out_dir {}", settings.out_dir.display()))?;
    }
    fs::create_dir_all(&settings.out_dir)
        .with_context(|| format!("create out_dir {}", settings.out_dir.display()))?;

    let sheets = write_sheets(&settings, &output, &sources)?;

    let mut css = String::new();
    if let Some(pattern) = &settings.css {
        for path in gather_paths(pattern)? {
            let fragment = fs::read_to_string(&path)
                .with_context(|| format!("read css fragment {}", path.display()))?;
            css.push_str(&fragment);
            if !fragment.ends_with('\n') {
                css.push('\n');
            }
        }
    }
    css.push_str(&output.css);

    let css_path = settings.out_dir.join("style.css");
    fs::write(&css_path, &css).with_context(|| format!("write {}", css_path.display()))?;
    let min_css_path = settings.out_dir.join("style.min.css");
    optimize::minify_css(&settings, &css_path, &min_css_path)?;

    // Raw sheets stay byte-identical to their sources, so only composited
    // pages go through the optimizer.
    for (_, path, raw) in &sheets {
        if !raw {
            optimize::optimize_png(&settings, path)?;
        }
    }

    let names: Vec<String> = output
        .sheets
        .iter()
        .flat_map(|s| s.layout.placements.iter().map(|p| p.key.clone()))
        .collect();
    info!(
        sheets = sheets.len(),
        emotes = names.len(),
        out_dir = %settings.out_dir.display(),
        "build complete"
    );
    Ok(BuildArtifacts {
        css,
        min_css_path,
        sheets,
        names,
    })
}

fn write_sheets(
    settings: &Settings,
    output: &BuildOutput,
    sources: &HashMap<String, PathBuf>,
) -> anyhow::Result<Vec<(String, PathBuf, bool)>> {
    let mut sheets = Vec::with_capacity(output.sheets.len());
    for sheet in &output.sheets {
        let layout = &sheet.layout;
        let path = settings.out_dir.join(format!("{}.png", layout.name));
        match &sheet.rgba {
            Some(rgba) => {
                rgba.save(&path)
                    .with_context(|| format!("write {}", path.display()))?;
            }
            None => {
                // Raw passthrough: copy the source file unchanged.
                let key = &layout.placements[0].key;
                let source = sources
                    .get(key)
                    .with_context(|| format!("source path for raw sheet member `{key}`"))?;
                fs::copy(source, &path)
                    .with_context(|| format!("copy {} to {}", source.display(), path.display()))?;
            }
        }
        info!(sheet = %layout.name, path = %path.display(), "wrote sheet");
        sheets.push((layout.name.clone(), path, layout.raw));
    }
    Ok(sheets)
}

fn run_diff(args: &DiffArgs) -> anyhow::Result<()> {
    let old = fs::read_to_string(&args.old)
        .with_context(|| format!("read {}", args.old.display()))?;
    let new = fs::read_to_string(&args.new)
        .with_context(|| format!("read {}", args.new.display()))?;
    let changes = diff(&old, &new);
    if changes.is_empty() {
        info!("no selector changes");
    } else {
        println!("{changes}");
    }
    Ok(())
}

fn run_publish(args: &BuildArgs, show_progress: bool) -> anyhow::Result<()> {
    let settings = Settings::load(&args.config)?;
    let Some(forum) = &settings.forum else {
        anyhow::bail!("config has no `forum` section; nothing to publish to");
    };

    let artifacts = run_build(args, show_progress)?;

    // AuthPending is a deliberate early exit, not a failure: the operator
    // fills in the template and re-runs.
    let Some(credentials) = auth::load_or_init(&settings.credentials)? else {
        println!(
            "credentials file {} is not filled in; complete it and re-run publish",
            settings.credentials.display()
        );
        return Ok(());
    };

    let http = reqwest::blocking::Client::new();
    let token = auth::access_token(&http, forum, &credentials)?;
    let client = ForumClient::new(http, forum, token, credentials.user_agent.clone());

    let previous = client.fetch_stylesheet()?;
    let changes = diff(&previous, &artifacts.css);
    if changes.is_empty() {
        warn!("published stylesheet already references the same emotes");
    }

    for (name, path, _) in &artifacts.sheets {
        client.upload_image(name, path)?;
    }

    let min_css = fs::read_to_string(&artifacts.min_css_path)
        .with_context(|| format!("read {}", artifacts.min_css_path.display()))?;
    let reason = if changes.is_empty() {
        "rebuild, no selector changes"
    } else {
        changes.as_str()
    };
    client.update_stylesheet(&min_css, reason)?;

    let body: String = artifacts
        .names
        .iter()
        .map(|name| format!("- [{name}](/{name})"))
        .collect::<Vec<_>>()
        .join("\n");
    client.submit_post(&forum.post_title, &body)?;

    if !changes.is_empty() {
        println!("{changes}");
    }
    Ok(())
}

/// Expands the configured glob: walks the pattern's literal directory prefix
/// and keeps matching files, sorted by path for deterministic layout order.
fn gather_paths(pattern: &str) -> anyhow::Result<Vec<PathBuf>> {
    let matcher = Glob::new(pattern)
        .with_context(|| format!("bad glob `{pattern}`"))?
        .compile_matcher();
    let root = literal_prefix(pattern);
    let mut list: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(&root).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let normalized = path
            .to_string_lossy()
            .replace('\\', "/")
            .trim_start_matches("./")
            .to_string();
        if matcher.is_match(&normalized) {
            list.push(path.to_path_buf());
        }
    }
    list.sort();
    Ok(list)
}

/// Directory components of `pattern` before the first glob metacharacter.
fn literal_prefix(pattern: &str) -> PathBuf {
    let mut root = if pattern.starts_with('/') {
        PathBuf::from("/")
    } else {
        PathBuf::new()
    };
    for component in pattern.split('/').filter(|c| !c.is_empty()) {
        if component.contains(['*', '?', '[', '{']) {
            break;
        }
        root.push(component);
    }
    if root.as_os_str().is_empty() {
        root.push(".");
    } else if root == Path::new(pattern) {
        // The whole pattern is literal; walk its parent so the file itself
        // is yielded.
        root.pop();
        if root.as_os_str().is_empty() {
            root.push(".");
        }
    }
    root
}

/// Decodes every discovered image. Any unreadable input fails the whole run.
/// Returns the inputs plus a key-to-source-path map for raw passthrough.
fn load_images_with_progress(
    paths: &[PathBuf],
    progress: bool,
) -> anyhow::Result<(Vec<InputImage>, HashMap<String, PathBuf>)> {
    use indicatif::{ProgressBar, ProgressStyle};
    let bar = if progress {
        let b = ProgressBar::new(paths.len() as u64);
        b.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} loading {pos}/{len} [{elapsed_precise}] {wide_msg}",
            )
            .unwrap(),
        );
        Some(b)
    } else {
        None
    };
    let mut inputs = Vec::with_capacity(paths.len());
    let mut sources: HashMap<String, PathBuf> = HashMap::new();
    for path in paths {
        let key = path
            .file_stem()
            .and_then(|s| s.to_str())
            .with_context(|| format!("non-UTF-8 file name {}", path.display()))?
            .to_string();
        if let Some(b) = &bar {
            b.set_message(key.clone());
        }
        if sources.insert(key.clone(), path.clone()).is_some() {
            anyhow::bail!("duplicate image name `{key}`: selector names must be unique");
        }
        let image = ImageReader::open(path)
            .with_context(|| format!("open {}", path.display()))?
            .with_guessed_format()
            .with_context(|| format!("probe {}", path.display()))?
            .decode()
            .with_context(|| format!("decode {}", path.display()))?;
        inputs.push(InputImage { key, image });
        if let Some(b) = &bar {
            b.inc(1);
        }
    }
    if let Some(b) = &bar {
        b.finish_and_clear();
    }
    Ok((inputs, sources))
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}
