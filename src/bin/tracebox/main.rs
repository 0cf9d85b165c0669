//! Tracebox CLI - build reference scenes and inspect their GPU buffers.

use std::env;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;

use tracebox::bvh::NO_NODE;
use tracebox::geom::{Mesh, Model};
use tracebox::gpu::{self, read_dump, write_dump, SceneBuffers};
use tracebox::prelude::*;

/// Options gathered from global flags.
#[derive(Default)]
struct Options {
    verbosity: u8,
    quiet: bool,
    seed: Option<u64>,
    config: Option<PathBuf>,
    out: Option<PathBuf>,
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let (opts, filtered_args) = match parse_args(&args[1..]) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(2);
        }
    };
    init_tracing(&opts);

    if filtered_args.is_empty() {
        print_help();
        return;
    }

    let result = match filtered_args[0].as_str() {
        // Build command - run the pipeline on a reference scene
        "build" | "b" => cmd_build(filtered_args.get(1).map(String::as_str), &opts),

        // Inspect command - summarize a dump file
        "inspect" | "i" => match filtered_args.get(1) {
            Some(path) => cmd_inspect(Path::new(path), &opts),
            None => {
                eprintln!("Error: missing file argument");
                eprintln!("Usage: tracebox inspect <dump.tbx>");
                std::process::exit(1);
            }
        },

        "version" | "--version" | "-V" => {
            print_version();
            Ok(())
        }
        "help" | "h" | "-h" | "--help" => {
            print_help();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            print_help();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn parse_args(args: &[String]) -> Result<(Options, Vec<String>)> {
    let mut opts = Options::default();
    let mut filtered = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-v" | "--verbose" => opts.verbosity = opts.verbosity.max(1),
            "-vv" | "--trace" => opts.verbosity = 2,
            "-q" | "--quiet" => opts.quiet = true,
            "--seed" => {
                let value = iter.next().context("--seed requires a value")?;
                opts.seed = Some(value.parse().with_context(|| format!("invalid seed '{value}'"))?);
            }
            "--config" => {
                opts.config = Some(iter.next().context("--config requires a path")?.into());
            }
            "-o" | "--out" => {
                opts.out = Some(iter.next().context("--out requires a path")?.into());
            }
            _ => filtered.push(arg.clone()),
        }
    }
    Ok((opts, filtered))
}

/// `TRACEBOX_LOG` (a level name) wins over the verbosity flags.
fn init_tracing(opts: &Options) {
    let from_flags = match (opts.quiet, opts.verbosity) {
        (true, _) => LevelFilter::ERROR,
        (false, 0) => LevelFilter::INFO,
        (false, 1) => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let level = std::env::var("TRACEBOX_LOG")
        .ok()
        .and_then(|v| v.parse::<LevelFilter>().ok())
        .unwrap_or(from_flags);

    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(level);
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn cmd_build(scene_arg: Option<&str>, opts: &Options) -> Result<()> {
    let settings = Settings::load(opts.config.as_deref()).context("loading settings")?;
    let kind = match scene_arg {
        Some(name) => name.parse::<SceneKind>()?,
        None => settings.scene_kind()?,
    };
    let seed = opts.seed.unwrap_or(settings.seed);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let model = (settings.include_mesh || kind.uses_model()).then(|| {
        Model::new(vec![Mesh::cube(settings.mesh_center(), settings.mesh_half_extent)])
    });
    let mut scene = kind.build(model.as_ref(), &mut rng)?;
    tracing::info!(scene = %kind, seed, primitives = scene.len(), "scene built");

    let buffers = gpu::prepare_scene(&mut scene, model.as_ref(), &mut rng, settings.capacities())?;
    print_summary(&buffers);

    if let Some(out) = &opts.out {
        let file = File::create(out).with_context(|| format!("creating {}", out.display()))?;
        write_dump(&buffers, BufWriter::new(file))?;
        println!("Wrote {}", out.display());
    }
    Ok(())
}

fn cmd_inspect(path: &Path, opts: &Options) -> Result<()> {
    let settings = Settings::load(opts.config.as_deref()).context("loading settings")?;
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let buffers = read_dump(BufReader::new(file), settings.capacities())?;
    print_summary(&buffers);

    println!();
    println!("{:>6} {:>6} {:>6} {:>6} {:>6} {:>6}  bounds", "node", "type", "object", "left", "right", "parent");
    for i in 0..buffers.node_count() as usize {
        let node = gpu::read_node(&buffers.nodes, i)?;
        println!(
            "{:>6} {:>6} {:>6} {:>6} {:>6} {:>6}  {:?}",
            i,
            fmt_index(node.object_type),
            fmt_index(node.object_index),
            fmt_index(node.left),
            fmt_index(node.right),
            fmt_index(node.parent),
            node.aabb,
        );
    }
    Ok(())
}

fn print_summary(buffers: &SceneBuffers) {
    println!("Objects:   {:>8}  ({} rows)", buffers.object_count, buffers.objects.len());
    println!("Nodes:     {:>8}  ({} rows, root {})", buffers.node_count(), buffers.nodes.len(), buffers.root_index);
    println!("Triangles: {:>8}  ({} rows)", buffers.triangle_count, buffers.triangles.len());
    let bytes = buffers.objects.as_bytes().len() + buffers.nodes.as_bytes().len() + buffers.triangles.as_bytes().len();
    println!("Upload:    {:>8} bytes", bytes);
}

fn fmt_index(v: i32) -> String {
    if v == NO_NODE {
        "-".to_string()
    } else {
        v.to_string()
    }
}

fn print_version() {
    println!(
        "tracebox {} (built {} {})",
        env!("CARGO_PKG_VERSION"),
        env!("TRACEBOX_BUILD_DATE"),
        env!("TRACEBOX_BUILD_TIME")
    );
}

fn print_help() {
    println!("Tracebox - scene BVH builder for shader ray tracing");
    println!();
    println!("Usage: tracebox [flags] <command> [args]");
    println!();
    println!("Commands:");
    println!("  build, b [scene]     Build a reference scene (scene1, random, cornell, display)");
    println!("  inspect, i <dump>    Print the scalars and node table of a dump");
    println!("  version              Print version and build date");
    println!("  help                 Show this help");
    println!();
    println!("Flags:");
    println!("  -v, --verbose        Debug logging");
    println!("  -vv, --trace         Trace logging");
    println!("  -q, --quiet          Errors only");
    println!("  --seed <n>           Seed for sorting and the random scene");
    println!("  --config <path>      Settings file (JSON)");
    println!("  -o, --out <path>     Write a buffer dump after build");
    println!();
    println!("Environment:");
    println!("  TRACEBOX_LOG         log level (error..trace), overrides the verbosity flags");
}


#[cfg(test)]
mod tests {
    use super::*;

    fn write_scene1_dump(path: &Path) {
        let mut scene = tracebox::scene::scene1().unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let buffers = gpu::prepare_scene(&mut scene, None, &mut rng, Capacities::default()).unwrap();
        write_dump(&buffers, BufWriter::new(File::create(path).unwrap())).unwrap();
    }

    #[test]
    fn test_inspect_uses_configured_capacities() {
        let dir = tempfile::tempdir().unwrap();
        let dump = dir.path().join("scene1.tbx");
        write_scene1_dump(&dump);

        // scene1 needs 21 node rows
        let tight = dir.path().join("tight.json");
        Settings { node_capacity: 20, ..Default::default() }.save(&tight).unwrap();
        let opts = Options { config: Some(tight), ..Default::default() };
        let err = cmd_inspect(&dump, &opts).unwrap_err();
        assert!(err.to_string().contains("nodes buffer capacity exceeded"));

        let roomy = dir.path().join("roomy.json");
        Settings { node_capacity: 21, ..Default::default() }.save(&roomy).unwrap();
        let opts = Options { config: Some(roomy), ..Default::default() };
        cmd_inspect(&dump, &opts).unwrap();
    }
}
