//! mdlx CLI - inspect and convert Warcraft III MDX/MDL models.

use std::env;
use std::path::Path;

use anyhow::{bail, Context, Result};
use mdlx::mdl::TokenStream;
use mdlx::{CodecSettings, Model, ModelFormat};
use tracing_subscriber::EnvFilter;

const BUILD_DATE: &str = match option_env!("MDLX_BUILD_DATE") {
    Some(date) => date,
    None => "unknown",
};

/// Install the fmt subscriber; `MDLX_LOG` overrides the flag-derived level.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_env("MDLX_LOG").unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    // Parse global flags
    let mut level = "info";
    let mut config: Option<String> = None;
    let mut filtered_args: Vec<&str> = Vec::new();
    let mut iter = args[1..].iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-v" | "--verbose" => level = "debug",
            "-vv" | "--trace" => level = "trace",
            "-q" | "--quiet" => level = "error",
            "-c" | "--config" => {
                let path = iter.next().context("--config needs a file argument")?;
                config = Some(path.clone());
            }
            "-V" | "--version" => {
                println!("mdlx {} ({})", env!("CARGO_PKG_VERSION"), BUILD_DATE);
                return Ok(());
            }
            _ => filtered_args.push(arg.as_str()),
        }
    }
    init_logging(level);

    let settings = match &config {
        Some(path) => CodecSettings::load(path).with_context(|| format!("loading settings from {}", path))?,
        None => CodecSettings::default(),
    };

    let Some(&command) = filtered_args.first() else {
        print_help();
        return Ok(());
    };

    match command {
        "info" | "i" => cmd_info(file_arg(&filtered_args, 1, "info <file>")?),
        "convert" | "c" => {
            let input = file_arg(&filtered_args, 1, "convert <input> <output>")?;
            let output = file_arg(&filtered_args, 2, "convert <input> <output>")?;
            cmd_convert(input, output, &settings)
        }
        "tokens" | "t" => cmd_tokens(file_arg(&filtered_args, 1, "tokens <file.mdl>")?),
        "check" => cmd_check(file_arg(&filtered_args, 1, "check <file>")?, &settings),
        "help" | "h" | "-h" | "--help" => {
            print_help();
            Ok(())
        }
        // Default: if file exists, show info; otherwise error
        _ => {
            if Path::new(command).exists() {
                cmd_info(command)
            } else {
                print_help();
                bail!("unknown command: {}", command)
            }
        }
    }
}

fn file_arg<'a>(args: &[&'a str], index: usize, usage: &str) -> Result<&'a str> {
    match args.get(index) {
        Some(&arg) => Ok(arg),
        None => bail!("missing argument\nUsage: mdlx {}", usage),
    }
}

fn print_help() {
    println!("mdlx - Warcraft III model toolkit");
    println!();
    println!("USAGE:");
    println!("    mdlx [OPTIONS] <COMMAND> [ARGS]");
    println!();
    println!("COMMANDS:");
    println!("    i, info    <file>              Show header, record counts and unknown chunks");
    println!("    c, convert <input> <output>    Convert between .mdx and .mdl");
    println!("    t, tokens  <file.mdl>          Print the token stream of an MDL file");
    println!("       check   <file>              Save and reload, then compare");
    println!("    h, help                        Show this help");
    println!();
    println!("OPTIONS:");
    println!("    -v, --verbose                  Debug output");
    println!("    -vv, --trace                   Trace output");
    println!("    -q, --quiet                    Errors only");
    println!("    -c, --config <file.json>       MDL writer settings");
    println!("    -V, --version                  Print version and build date");
    println!();
    println!("ENVIRONMENT:");
    println!("    MDLX_LOG                       Log filter, overrides -v/-q (e.g. mdlx=trace)");
}

fn load(path: &str) -> Result<Model> {
    Model::open(path).with_context(|| format!("failed to open {}", path))
}

fn cmd_info(path: &str) -> Result<()> {
    let model = load(path)?;
    let counts = model.object_counts();

    println!("File:       {}", path);
    println!("Version:    {}", model.version);
    println!("Name:       {}", model.name);
    println!("Blend time: {}", model.blend_time);
    println!(
        "Extent:     min {:?} max {:?} radius {}",
        model.extent.min.to_array(),
        model.extent.max.to_array(),
        model.extent.bounds_radius
    );
    println!();
    println!("Records:");
    let rows = [
        ("Sequences", counts.sequences),
        ("Global sequences", counts.global_sequences),
        ("Materials", counts.materials),
        ("Textures", counts.textures),
        ("Texture animations", counts.texture_animations),
        ("Geosets", counts.geosets),
        ("Geoset animations", counts.geoset_animations),
        ("Bones", counts.bones),
        ("Lights", counts.lights),
        ("Helpers", counts.helpers),
        ("Attachments", counts.attachments),
        ("Pivot points", counts.pivot_points),
        ("Particle emitters", counts.particle_emitters),
        ("Particle emitters 2", counts.particle_emitters2),
        ("Ribbon emitters", counts.ribbon_emitters),
        ("Cameras", counts.cameras),
        ("Event objects", counts.event_objects),
        ("Collision shapes", counts.collision_shapes),
    ];
    for (label, count) in rows {
        if count > 0 {
            println!("  {:<20} {}", label, count);
        }
    }
    let vertices: usize = model.geosets.iter().map(|g| g.vertices.len()).sum();
    if vertices > 0 {
        println!("  {:<20} {}", "Vertices", vertices);
    }

    if !model.unknown_chunks.is_empty() {
        println!();
        println!("Unknown chunks:");
        for chunk in &model.unknown_chunks {
            println!("  {} ({} bytes)", chunk.tag, chunk.data.len());
        }
    }
    Ok(())
}

fn cmd_convert(input: &str, output: &str, settings: &CodecSettings) -> Result<()> {
    let model = load(input)?;
    model
        .save_with(output, settings)
        .with_context(|| format!("failed to save {}", output))?;
    tracing::info!("{} -> {}", input, output);
    Ok(())
}

fn cmd_tokens(path: &str) -> Result<()> {
    let text = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path))?;
    let mut stream = TokenStream::new(&text);
    let mut count = 0usize;
    loop {
        match stream.read()? {
            Some(token) => {
                println!("{:>6}  {}", stream.token_line(), token);
                count += 1;
            }
            None => break,
        }
    }
    tracing::info!("{} tokens", count);
    Ok(())
}

/// Save to the same format in memory, reload, and compare.
fn cmd_check(path: &str, settings: &CodecSettings) -> Result<()> {
    let data = std::fs::read(path).with_context(|| format!("failed to read {}", path))?;
    let format = ModelFormat::from_path(path).unwrap_or_else(|| ModelFormat::detect(&data));
    let model = Model::from_bytes(&data, format)?;

    match format {
        ModelFormat::Mdx => {
            let saved = model.to_mdx()?;
            if saved != data {
                let at = saved.iter().zip(&data).position(|(a, b)| a != b).unwrap_or(saved.len().min(data.len()));
                bail!(
                    "re-encoded file differs at byte {} ({} bytes written, {} read)",
                    at,
                    saved.len(),
                    data.len()
                );
            }
            println!("{}: binary round trip is byte-identical ({} bytes)", path, data.len());
        }
        ModelFormat::Mdl => {
            let first = model.to_mdl_with(settings)?;
            let reloaded = Model::from_mdl(&first)?;
            if reloaded.to_mdl_with(settings)? != first {
                bail!("text round trip changed the model");
            }
            println!("{}: text round trip is stable", path);
        }
    }
    Ok(())
}
