mod bootstrap;
mod output;

use anyhow::{Context, Result};
use report_core::settings::{OutputMode, Settings};
use report_data::analysis::UsageDataset;
use report_data::reader::resolve_source;
use report_data::report::{ReportBuilder, Selection};
use report_ui::app::App;

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    let mode = settings.output_mode()?;
    let filter = settings.category_filter()?;
    let normalizer = settings.name_normalizer()?;

    bootstrap::ensure_directories()?;
    // The TUI owns the terminal, so its logs go to a file by default.
    let log_file = settings
        .log_file
        .clone()
        .or_else(|| (mode == OutputMode::Tui).then(bootstrap::default_log_file));
    bootstrap::setup_logging(&settings.log_level, log_file.as_deref())?;

    tracing::info!("works-report v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Output: {}, Category: {}, Normalizer: {}, Theme: {}",
        settings.output,
        filter,
        normalizer,
        settings.theme
    );

    let source = resolve_source(settings.file.as_deref(), settings.data_dir.as_deref())?;
    tracing::info!("Loading {}", source.display());

    let dataset = UsageDataset::load(&source, &settings.column_names(), normalizer)
        .with_context(|| format!("could not load {}", source.display()))?;
    if dataset.is_empty() {
        tracing::warn!("No usable rows in {}", source.display());
    }

    let selection = Selection::new(settings.project.clone(), filter);
    if let Some(name) = &selection.project {
        if dataset.project(name).is_none() {
            tracing::warn!("Project {:?} not found in {}", name, source.display());
        }
    }

    match mode {
        OutputMode::Tui => {
            let app = App::new(dataset, &settings.theme, selection);
            app.run()?;
        }
        OutputMode::Text => {
            let report = ReportBuilder::build(&dataset, &selection);
            print!("{}", output::render_text(&dataset, &report));
        }
        OutputMode::Json => {
            let report = ReportBuilder::build(&dataset, &selection);
            println!("{}", output::render_json(&dataset, &report)?);
        }
    }

    Ok(())
}
