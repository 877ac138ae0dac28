use barscan::detector::BinarizationBank;
use barscan::lookup::LookupService;
use barscan::tools::{
    bench_limit_from_env, dataset_iter, dataset_root_from_env, grayscale_stats, load_frame,
    mask_stats, smoke_from_env,
};
use barscan::utils::grayscale::resize_to;
use barscan::{FailureDiagnoser, ResultClassifier, ScanConfig, Scanner};
use barscan::{RawDecode, Resolution};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "scantool", version, about = "barscan CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print mask statistics and candidate regions for an image
    Propose {
        #[arg(long)]
        image: PathBuf,
    },
    /// Run the failure diagnoser on an image
    Diagnose {
        #[arg(long)]
        image: PathBuf,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Resolve a raw decoder string against lookup tables
    Enrich {
        /// Raw string such as "EAN-13: 4006381333931"
        raw: String,
        #[arg(long)]
        countries: PathBuf,
        #[arg(long)]
        manufacturers: PathBuf,
        #[arg(long)]
        products: PathBuf,
    },
    /// Run region proposal over a dataset in parallel
    Bench {
        #[arg(long)]
        root: Option<PathBuf>,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        smoke: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Propose { image } => propose_cmd(&image),
        Command::Diagnose { image, json } => diagnose_cmd(&image, json),
        Command::Enrich {
            raw,
            countries,
            manufacturers,
            products,
        } => enrich_cmd(&raw, &countries, &manufacturers, &products),
        Command::Bench { root, limit, smoke } => bench_cmd(root, limit, smoke),
    }
}

/// Scanner whose engine never decodes; the CLI exercises proposal and diagnosis only
fn proposal_scanner() -> Scanner {
    Scanner::new(|_: &[u8], _: u32, _: u32| -> Option<RawDecode> { None })
        .with_config(ScanConfig::from_env())
}

fn propose_cmd(image: &Path) {
    let buf = match load_frame(image) {
        Ok(buf) => buf,
        Err(err) => {
            eprintln!("Failed to load image {}: {}", image.display(), err);
            return;
        }
    };
    let frame = buf.as_frame();
    println!("Image: {} ({}x{})", image.display(), frame.width(), frame.height());

    let luma = frame.to_luma();
    let stats = grayscale_stats(luma.as_raw());
    println!(
        "Grayscale range: {}-{}, average: {}",
        stats.min, stats.max, stats.avg
    );

    let scanner = proposal_scanner();
    let (work_w, work_h) = scanner.config().working_size();
    let small = resize_to(&luma, work_w, work_h);
    let bank = BinarizationBank::standard();
    for (i, (method, mask)) in bank.methods().iter().zip(bank.binarize(&small)).enumerate() {
        let stats = mask_stats(&mask);
        println!(
            "Mask {} {:?}: ink={} total={} ink_ratio={:.2}%",
            i,
            method,
            stats.ink_pixels,
            stats.total_pixels,
            stats.ink_ratio * 100.0
        );
    }

    match scanner.propose_regions(&frame) {
        Ok(regions) => {
            println!("Found {} candidate regions", regions.len());
            for (i, r) in regions.iter().enumerate() {
                println!(
                    "  Region {}: x={} y={} w={} h={} mask={} stripe={:.2}",
                    i, r.rect.x, r.rect.y, r.rect.width, r.rect.height, r.source, r.texture_score
                );
            }
        }
        Err(err) => eprintln!("Proposal failed: {}", err),
    }
}

fn diagnose_cmd(image: &Path, json: bool) {
    let buf = match load_frame(image) {
        Ok(buf) => buf,
        Err(err) => {
            eprintln!("Failed to load image {}: {}", image.display(), err);
            return;
        }
    };
    let report = FailureDiagnoser::diagnose(&buf.as_frame());
    if json {
        match report.to_json() {
            Ok(text) => println!("{}", text),
            Err(err) => eprintln!("Failed to render report: {}", err),
        }
    } else {
        print!("{}", report.to_plain_text());
    }
}

fn enrich_cmd(raw: &str, countries: &Path, manufacturers: &Path, products: &Path) {
    let (service, errors) = LookupService::load(countries, manufacturers, products);
    for err in &errors {
        eprintln!("Lookup table error: {}", err);
    }

    let symbol = ResultClassifier::classify(raw);
    let record = service.enrich(&symbol);
    let show = |r: &Resolution| match r {
        Resolution::Found(name) => name.clone(),
        Resolution::Unresolved(code) => format!("unknown ({})", code),
        Resolution::NotApplicable => "n/a".to_string(),
    };
    println!("Kind: {}", symbol.kind);
    println!("Payload: {}", symbol.payload);
    println!("Country: {}", show(&record.country));
    println!("Manufacturer: {}", show(&record.manufacturer));
    println!("Product: {}", show(&record.product));
    if let Some(valid) = record.checksum_valid {
        println!("Checksum: {}", if valid { "ok" } else { "mismatch" });
    }
    if let Some(content) = record.content {
        println!("Content: {:?}", content);
    }
    if let Some(note) = &record.note {
        println!("Note: {}", note);
    }
}

fn bench_cmd(root: Option<PathBuf>, limit: Option<usize>, smoke: bool) {
    let root = root.unwrap_or_else(dataset_root_from_env);
    let limit = limit.or_else(bench_limit_from_env);
    let smoke = smoke || smoke_from_env();
    let images: Vec<PathBuf> = dataset_iter(&root, limit, smoke).collect();
    if images.is_empty() {
        eprintln!("No images found under {}", root.display());
        return;
    }

    let scanner = proposal_scanner();
    let start = Instant::now();
    let results: Vec<Option<(usize, f64)>> = images
        .par_iter()
        .map(|path| {
            let buf = load_frame(path).ok()?;
            let t = Instant::now();
            let regions = scanner.propose_regions(&buf.as_frame()).ok()?;
            Some((regions.len(), t.elapsed().as_secs_f64() * 1000.0))
        })
        .collect();
    let wall = start.elapsed();

    let loaded: Vec<(usize, f64)> = results.iter().flatten().copied().collect();
    let with_regions = loaded.iter().filter(|(n, _)| *n > 0).count();
    let total_ms: f64 = loaded.iter().map(|(_, ms)| ms).sum();
    let avg_ms = if loaded.is_empty() {
        0.0
    } else {
        total_ms / loaded.len() as f64
    };

    println!("Images: {} (loaded {})", images.len(), loaded.len());
    println!(
        "With regions: {} ({:.1}%)",
        with_regions,
        if loaded.is_empty() {
            0.0
        } else {
            with_regions as f64 * 100.0 / loaded.len() as f64
        }
    );
    println!("Avg proposal time: {:.2} ms", avg_ms);
    println!("Wall time: {:.2} s", wall.as_secs_f64());
}
