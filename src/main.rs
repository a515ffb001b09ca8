use clap::Parser;
use monument_detector::pipeline::ClassificationRequest;
use monument_detector::{
    AppError, ClassificationService, DetectionReport, MonumentCatalog, MonumentClassifier,
    Settings,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tower::{Service, ServiceExt};
use tracing::{error, info, Level};

const BAR_WIDTH: usize = 30;

/// Recognise Indian monuments in photographs from their pixel statistics.
#[derive(Parser, Debug)]
#[command(name = "monument-detector", version)]
struct Cli {
    /// Images to classify (jpg, jpeg, png, ...)
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// Confidence threshold in [0, 1]; overrides the settings file
    #[arg(short, long)]
    threshold: Option<f64>,

    /// Settings file (defaults to ./monuments.toml when present)
    #[arg(short, long, env = "MONUMENTS_CONFIG")]
    config: Option<PathBuf>,

    /// TOML rule table replacing the built-in scoring rules
    #[arg(short, long)]
    rules: Option<PathBuf>,

    /// Print each report as JSON
    #[arg(long)]
    json: bool,
}

fn init_logging(level: Level) {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_settings(cli: &Cli) -> Result<Settings, AppError> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(threshold) = cli.threshold {
        settings = settings.with_threshold(threshold);
    }
    if let Some(rules) = &cli.rules {
        settings = settings.with_rules_path(rules.clone());
    }
    settings.validate().map_err(AppError::Settings)?;
    Ok(settings)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match load_settings(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    init_logging(settings.level().unwrap_or(Level::INFO));

    match run(&cli, &settings).await {
        Ok(0) => ExitCode::SUCCESS,
        Ok(failed) => {
            error!("{} image(s) could not be classified", failed);
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Classify every image; returns how many failed.
async fn run(cli: &Cli, settings: &Settings) -> Result<usize, AppError> {
    let classifier = MonumentClassifier::with_rules(settings.load_rules()?)?;
    let mut service = ClassificationService::new(classifier);
    let catalog = MonumentCatalog::builtin();
    let mut failed = 0;

    info!(
        "Classifying {} image(s) at threshold {:.2}",
        cli.images.len(),
        settings.confidence_threshold
    );

    for path in &cli.images {
        let outcome = match decode(path) {
            Ok(image) => service
                .ready()
                .await?
                .call(ClassificationRequest::new(image, settings.confidence_threshold))
                .await
                .map_err(AppError::from),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(report) if cli.json => println!("{}", render_json(path, &report)),
            Ok(report) => print!("{}", render_text(path, &report, &catalog)),
            Err(e) => {
                error!("{}: {}", path.display(), e);
                failed += 1;
            }
        }
    }

    Ok(failed)
}

fn decode(path: &Path) -> Result<image::DynamicImage, AppError> {
    image::open(path).map_err(|e| AppError::Decode(e, path.to_path_buf()))
}

fn render_json(path: &Path, report: &DetectionReport) -> String {
    serde_json::json!({
        "image": path.display().to_string(),
        "report": report,
    })
    .to_string()
}

fn render_text(path: &Path, report: &DetectionReport, catalog: &MonumentCatalog) -> String {
    let mut out = format!("{}\n", path.display());

    match report.detected {
        Some(class) => {
            let info = catalog.lookup(class);
            out.push_str(&format!(
                "  Detected: {} ({}) with {:.0}% confidence\n",
                info.name,
                info.location,
                report.result.confidence * 100.0
            ));
        }
        None => out.push_str(&format!(
            "  No monument above {:.0}% (best guess: {} at {:.0}%)\n",
            report.threshold * 100.0,
            catalog.lookup(report.result.predicted).name,
            report.result.confidence * 100.0
        )),
    }

    out.push_str(&format!(
        "  Detections: {}  Processing time: {:.1}ms\n",
        report.reported.len(),
        report.processing_time_us as f64 / 1000.0
    ));

    let mut scores: Vec<_> = report.result.scores.iter().collect();
    scores.sort_by(|a, b| b.1.total_cmp(&a.1));
    for (class, score) in scores {
        let filled = (score * BAR_WIDTH as f64).round() as usize;
        let marker = if score >= report.threshold { '*' } else { ' ' };
        out.push_str(&format!(
            "  {} {:<20} {:<width$} {:>5.1}%\n",
            marker,
            catalog.lookup(class).name,
            "#".repeat(filled),
            score * 100.0,
            width = BAR_WIDTH
        ));
    }

    out
}
