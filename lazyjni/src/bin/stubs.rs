use std::{fs, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing::info;

use lazyjni::jni::{deserialize, render_header, HeaderOptions};

/// Render a C header from a JNI signature file
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Signature file written by `lazyjni`
    signature_file: PathBuf,

    /// Output header, printed to stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also declare JNI_OnLoad and JNI_OnUnload
    #[arg(long)]
    lifecycle: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let data = fs::read(&args.signature_file)
        .with_context(|| format!("Failed to read {}", args.signature_file.display()))?;
    let map = deserialize(&data)
        .with_context(|| format!("Invalid signature file {}", args.signature_file.display()))?;
    info!("Loaded {} signatures", map.len());

    let header = render_header(
        &map,
        &HeaderOptions {
            lifecycle: args.lifecycle,
        },
    );

    match args.output {
        Some(path) => fs::write(&path, header)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => print!("{}", header),
    }

    Ok(())
}
