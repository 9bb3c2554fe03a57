use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use focal_tree::{Axis, ManualClock, Navigator, NavigatorConfig, NodeDefinition, NodeId};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "focal-tree", about = "Focal alignment and pan navigation over an outline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load an outline and replay a navigation script against it.
    Replay {
        /// Outline file: two spaces per level, `*` marks the active child.
        outline: PathBuf,
        /// Script file, one command per line.
        #[arg(long)]
        script: Option<PathBuf>,
        /// Size reported for every node along the branch axis.
        #[arg(long, default_value_t = 20.0)]
        node_size: f64,
        /// Size reported for every child branch along the trunk axis.
        #[arg(long, default_value_t = 100.0)]
        branch_size: f64,
        /// Levels shown below the focal branch.
        #[arg(long, default_value_t = 1)]
        depth: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .try_init()
        .map_err(|error| anyhow!(error))?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Replay {
            outline,
            script,
            node_size,
            branch_size,
            depth,
        } => run_replay(&outline, script.as_deref(), node_size, branch_size, depth)?,
    }

    Ok(())
}

fn run_replay(
    outline_path: &Path,
    script_path: Option<&Path>,
    node_size: f64,
    branch_size: f64,
    depth: usize,
) -> Result<()> {
    let outline = std::fs::read_to_string(outline_path)
        .with_context(|| format!("failed to read outline from {}", outline_path.display()))?;
    let root = parse_outline(&outline)?;

    let clock = ManualClock::new();
    let config = NavigatorConfig::default().with_visible_subtree_depth(depth);
    let mut nav = Navigator::with_clock(root, config, clock.clone())
        .context("failed to build navigator")?;

    let root_id = nav.root();
    let nodes: Vec<NodeId> = nav.tree().descendants(root_id).collect();
    for &id in &nodes {
        nav.resize_node(id, node_size)?;
    }
    for id in std::iter::once(root_id).chain(nodes) {
        if nav.node(id).is_some_and(|node| !node.is_leaf()) {
            nav.resize_branch(id, branch_size)?;
        }
    }
    info!(nodes = nav.tree().len(), "outline loaded");
    print_state(&nav, "start");

    let Some(script_path) = script_path else {
        return Ok(());
    };
    let script = std::fs::read_to_string(script_path)
        .with_context(|| format!("failed to read script from {}", script_path.display()))?;

    for (line_no, line) in script.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        run_command(&mut nav, &clock, line, node_size)
            .with_context(|| format!("script line {}: {}", line_no + 1, line))?;
        print_state(&nav, line);
    }

    Ok(())
}

fn run_command(nav: &mut Navigator, clock: &ManualClock, line: &str, node_size: f64) -> Result<()> {
    let mut words = line.split_whitespace();
    let verb = words.next().unwrap_or_default();
    let args: Vec<&str> = words.collect();

    match verb {
        "in" => nav.move_in(count_arg(&args, 0)?),
        "out" => nav.move_out(count_arg(&args, 0)?),
        "forward" => nav.move_forward(count_arg(&args, 0)?),
        "back" => nav.move_back(count_arg(&args, 0)?),
        "level" => nav.set_focal_level(parse_arg(&args, 0, "level")?),
        "jump" => {
            let target = node_arg(nav, &args, 0)?;
            nav.jump_to(target)?;
        }
        "pan" => {
            let axis = match args.first().copied() {
                Some("trunk") => Axis::Trunk,
                Some("branch") => Axis::Branch,
                other => bail!("expected trunk or branch, got {:?}", other),
            };
            let delta: f64 = parse_arg(&args, 1, "delta")?;
            let velocity: f64 = if args.len() > 2 {
                parse_arg(&args, 2, "velocity")?
            } else {
                0.0
            };
            if nav.pan_start(axis, None) {
                nav.pan_update(delta);
                nav.pan_end(velocity);
            }
        }
        "resize" => {
            let node = node_arg(nav, &args, 0)?;
            nav.resize_node(node, parse_arg(&args, 1, "size")?)?;
        }
        "branch" => {
            let node = node_arg(nav, &args, 0)?;
            nav.resize_branch(node, parse_arg(&args, 1, "size")?)?;
        }
        "insert" => {
            let parent = node_arg(nav, &args, 0)?;
            let index = parse_arg(&args, 1, "index")?;
            let ids = args.get(2).ok_or_else(|| anyhow!("missing identifiers"))?;
            let definitions: Vec<NodeDefinition> =
                ids.split(',').map(NodeDefinition::leaf).collect();
            for id in nav.insert_children(parent, index, &definitions)? {
                nav.resize_node(id, node_size)?;
            }
        }
        "remove" => {
            let parent = node_arg(nav, &args, 0)?;
            let index = parse_arg(&args, 1, "index")?;
            let count = count_arg(&args, 2)?;
            let removed = nav.remove_children(parent, index, count)?;
            info!(count = removed.len(), "removed subtrees");
        }
        "inspect" => nav.toggle_inspect_mode(),
        "tick" => {
            let millis: u64 = parse_arg(&args, 0, "milliseconds")?;
            clock.advance(Duration::from_millis(millis));
            nav.tick();
        }
        other => bail!("unknown command '{}'", other),
    }

    Ok(())
}

fn parse_arg<T>(args: &[&str], position: usize, name: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = args
        .get(position)
        .ok_or_else(|| anyhow!("missing {}", name))?;
    raw.parse()
        .with_context(|| format!("invalid {} '{}'", name, raw))
}

fn count_arg(args: &[&str], position: usize) -> Result<usize> {
    if args.len() > position {
        parse_arg(args, position, "count")
    } else {
        Ok(1)
    }
}

fn node_arg(nav: &Navigator, args: &[&str], position: usize) -> Result<NodeId> {
    let name = args
        .get(position)
        .ok_or_else(|| anyhow!("missing node identifier"))?;
    nav.find_by_id(name)
        .ok_or_else(|| anyhow!("no node with identifier '{}'", name))
}

/// Parse an indented outline into a definition under an anonymous root
fn parse_outline(text: &str) -> Result<NodeDefinition> {
    let mut stack = vec![NodeDefinition::new()];

    for (line_no, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let indent = line.len() - line.trim_start_matches(' ').len();
        if indent % 2 != 0 {
            bail!("line {}: indentation must be a multiple of two spaces", line_no + 1);
        }
        let level = indent / 2 + 1;
        if level > stack.len() {
            bail!("line {}: indented more than one level past its parent", line_no + 1);
        }
        while stack.len() > level {
            close_level(&mut stack);
        }

        let (active, name) = match trimmed.strip_prefix('*') {
            Some(rest) => (true, rest.trim()),
            None => (false, trimmed),
        };
        if name.is_empty() {
            bail!("line {}: missing node identifier", line_no + 1);
        }
        if active {
            if let Some(parent) = stack.last_mut() {
                parent.active_child_index = Some(parent.children.len());
            }
        }
        stack.push(NodeDefinition::leaf(name));
    }

    while stack.len() > 1 {
        close_level(&mut stack);
    }
    stack.pop().ok_or_else(|| anyhow!("empty outline"))
}

fn close_level(stack: &mut Vec<NodeDefinition>) {
    if let Some(child) = stack.pop() {
        if let Some(parent) = stack.last_mut() {
            parent.children.push(child);
        }
    }
}

fn print_state(nav: &Navigator, label: &str) {
    let path: Vec<&str> = nav
        .active_path()
        .into_iter()
        .filter_map(|id| nav.node(id).map(|node| node.id()))
        .collect();
    let focal = nav
        .focal_node()
        .and_then(|id| nav.node(id))
        .map_or("-", |node| node.id());
    let branch = nav
        .offsets(nav.focal_parent())
        .map_or(0.0, |entry| entry.child_branch_offset_aligned);
    let flags = nav.boundary_flags();

    println!(
        "{:<20}\tlevel={}\tfocal={}\ttrunk={:.1}\tbranch={:.1}\tflags={}{}{}{}\tpath={}",
        label,
        nav.focal_level(),
        focal,
        nav.trunk_offset_aligned(),
        branch,
        if flags.trunk_start { "<" } else { "." },
        if flags.trunk_end { ">" } else { "." },
        if flags.branch_start { "^" } else { "." },
        if flags.branch_end { "v" } else { "." },
        path.join("/")
    );
}
