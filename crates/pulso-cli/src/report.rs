//! The `report` command: analyze one workbook offline.

use std::path::Path;

use pulso_core::AppConfig;
use pulso_engine::{analyze_sheet, Analysis, EngineOptions};
use pulso_summarizer::{SummaryClient, SummaryOptions};

/// Analyzes `file` and prints (or writes) the report JSON.
///
/// Everything runs offline except `--summaries`, which calls the external
/// summarizer and therefore needs `PULSO_SUMMARY_API_KEY`.
///
/// # Errors
///
/// Returns an error when the workbook cannot be read or decoded, when the
/// sheet lacks mandatory columns or usable rows, when summaries are
/// requested without an API key, or when the output file cannot be written.
pub(crate) async fn run_report(
    file: &Path,
    output: Option<&Path>,
    pretty: bool,
    summaries: bool,
) -> anyhow::Result<()> {
    let config = pulso_core::load_app_config()?;

    let sheet = pulso_ingest::read_workbook(file)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", file.display()))?;

    let options = EngineOptions {
        min_token_len: config.min_token_len,
        top_n: config.top_n,
        min_sector_sample: config.min_sector_sample,
    };
    let analysis = analyze_sheet(&sheet, &options)?;

    tracing::info!(
        rows = analysis.rows_scanned,
        skipped = analysis.rows_skipped,
        "workbook analyzed"
    );

    let Analysis {
        mut report,
        pending_summaries,
        ..
    } = analysis;

    if summaries {
        let client = summary_client(&config)?;
        pulso_summarizer::apply_summaries(&mut report, &pending_summaries, &client).await;
    }

    let json = if pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };

    match output {
        Some(path) => {
            std::fs::write(path, &json)
                .map_err(|e| anyhow::anyhow!("failed to write {}: {e}", path.display()))?;
            tracing::info!(path = %path.display(), "report written");
        }
        None => println!("{json}"),
    }

    Ok(())
}

fn summary_client(config: &AppConfig) -> anyhow::Result<SummaryClient> {
    let api_key = config.summary_api_key.as_deref().ok_or_else(|| {
        pulso_core::ConfigError::MissingEnvVar("PULSO_SUMMARY_API_KEY".to_string())
    })?;

    let options = SummaryOptions {
        model: config.summary_model.clone(),
        timeout_secs: config.summary_timeout_secs,
        max_comments: config.summary_max_comments,
    };
    let client = SummaryClient::with_base_url(api_key, &options, &config.summary_base_url)?;
    Ok(client)
}
