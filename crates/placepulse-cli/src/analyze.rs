//! `analyze` and `list` command handlers.

use anyhow::Context;
use placepulse_analyzer::{AnalysisPipeline, PgAnalysisStore};
use placepulse_core::{AnalysisRecord, AppConfig};
use placepulse_serp::SerpClient;

const TEXT_PREVIEW_CHARS: usize = 70;

fn build_pipeline(
    pool: sqlx::PgPool,
    config: &AppConfig,
) -> anyhow::Result<AnalysisPipeline<PgAnalysisStore>> {
    let serp = SerpClient::with_base_url(
        &config.serp_api_key,
        config.serp_timeout_secs,
        &config.serp_base_url,
    )
    .context("failed to build SerpApi client")?
    .with_locale(&config.serp_locale, &config.serp_country);
    Ok(AnalysisPipeline::new(serp, PgAnalysisStore::new(pool)))
}

/// Analyze one place and print the result.
///
/// # Errors
///
/// Returns an error if the pipeline fails at any stage.
pub(crate) async fn run_analyze(
    pool: sqlx::PgPool,
    config: &AppConfig,
    input: &str,
    json: bool,
) -> anyhow::Result<()> {
    let pipeline = build_pipeline(pool, config)?;
    let outcome = pipeline
        .analyze(input)
        .await
        .with_context(|| format!("analysis of '{}' failed", input.trim()))?;

    let cached = outcome.is_cached();
    let record = outcome.into_record();

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    println!("{}", format_summary(&record, cached));
    for review in &record.reviews {
        println!(
            "  {:<9}{:>4}  {}",
            review.sentiment_label.as_str(),
            review.sentiment_score,
            preview(&review.text)
        );
    }
    Ok(())
}

/// List stored analyses, most recent first.
///
/// # Errors
///
/// Returns an error if the store query fails.
pub(crate) async fn run_list(
    pool: sqlx::PgPool,
    config: &AppConfig,
    limit: i64,
) -> anyhow::Result<()> {
    let pipeline = build_pipeline(pool, config)?;
    let records = pipeline.list_analyses(limit.max(1)).await?;

    if records.is_empty() {
        println!("no analyses stored; run `analyze <place>` first");
        return Ok(());
    }

    println!(
        "{:<18}{:<12}{:>7}{:>6}{:>6}{:>6}  PLACE",
        "CREATED", "LABEL", "TOTAL", "POS", "NEG", "NEU"
    );
    for record in &records {
        let s = &record.summary;
        println!(
            "{:<18}{:<12}{:>7}{:>6}{:>6}{:>6}  {}",
            record.created_at.format("%Y-%m-%d %H:%M").to_string(),
            s.overall_label.as_str(),
            s.total_count,
            s.positive_count,
            s.negative_count,
            s.neutral_count,
            record.place_name
        );
    }
    Ok(())
}

fn format_summary(record: &AnalysisRecord, cached: bool) -> String {
    let s = &record.summary;
    format!(
        "{} ({})\n  overall: {} (score sum {}, {} reviews: {} positive, {} negative, {} neutral){}",
        record.place_name,
        record.place_id,
        s.overall_label,
        s.overall_score_sum,
        s.total_count,
        s.positive_count,
        s.negative_count,
        s.neutral_count,
        if cached { " [cached]" } else { "" }
    )
}

fn preview(text: &str) -> String {
    let single_line = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() > TEXT_PREVIEW_CHARS {
        format!(
            "{}...",
            single_line.chars().take(TEXT_PREVIEW_CHARS).collect::<String>()
        )
    } else {
        single_line
    }
}
