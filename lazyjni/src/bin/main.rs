use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use indicatif::ProgressBar;

use lazyjni::{
    export_signatures_with,
    jni::{analysis::load_methods, signature_file_path},
    types::{ExportEvent, StageProgress},
    ExportOptions, ExportReport,
};

/// Export JNI native method signatures of a class file or JAR
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Input class file, JAR or AAR
    input: PathBuf,

    /// Output JSON, defaults to `<INPUT>_jni_sign.json`
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write single-line JSON
    #[arg(long)]
    compact: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let bar = ProgressBar::new(100);
    let report = run(&args, &bar)?;

    println!(
        "{} {} signatures ({} overloaded) to {}",
        "Exported".green().bold(),
        report.entries,
        report.overloaded,
        report.destination.display()
    );
    println!("md5 {}", report.digest);

    Ok(())
}

/// Scans and exports, leaving `bar` finished whatever the outcome.
fn run(args: &Args, bar: &ProgressBar) -> anyhow::Result<ExportReport> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| signature_file_path(&args.input));

    let on_event = |evt: ExportEvent| {
        bar.set_message(evt.stage.to_string());
        match evt.progress {
            StageProgress::Unknown => bar.tick(),
            StageProgress::Percentage(value) => bar.set_position((value * 100.0) as u64),
            StageProgress::Done => bar.set_position(100),
        }
    };

    match export(args, &output, on_event) {
        Ok(report) => {
            bar.finish_and_clear();
            Ok(report)
        }
        Err(err) => {
            bar.abandon();
            Err(err)
        }
    }
}

fn export(
    args: &Args,
    output: &Path,
    mut on_event: impl FnMut(ExportEvent),
) -> anyhow::Result<ExportReport> {
    let methods = load_methods(&args.input, &mut on_event)
        .with_context(|| format!("Failed to read methods from {}", args.input.display()))?;
    let options = ExportOptions {
        pretty: !args.compact,
    };
    Ok(export_signatures_with(methods, output, &options, &mut on_event)?)
}
