use anyhow::{Context, Result};
use clap::Parser;

use geo_matcher::cli::{Cli, Command, ConvertArgs, FilterArgs, FormatOpt};
use geo_matcher::export::{csv_export, xlsx_export};
use geo_matcher::filter::{FilterReport, filter_by_shared_ids};
use geo_matcher::ingest::{self, Table};
use geo_matcher::logging;
use geo_matcher::models::{RawValue, ResolutionResult};
use geo_matcher::normalize::normalize;
use geo_matcher::resolve::{self, MappingTable, ProgressConfig};
use geo_matcher::summary::RunSummary;
use geo_matcher::util::envfile::load_dotenv_if_present;

fn main() -> Result<()> {
    // .env must land in the process environment before clap reads
    // env-backed arguments.
    load_dotenv_if_present()?;
    logging::init_tracing_from_env();

    let cli = Cli::parse();
    match cli.command {
        Command::Convert(args) => run_convert(args),
        Command::Filter(args) => run_filter(args),
    }
}

fn run_convert(args: ConvertArgs) -> Result<()> {
    let cfg = args.to_app_config()?;
    let mut summary = RunSummary::new("convert", &args.data);
    summary.reference_path = Some(args.reference.clone());

    let reference = ingest::read_table(&args.reference)
        .with_context(|| format!("loading reference file {}", args.reference))?;
    let name_idx = reference.require_column(&args.name_col, &args.reference)?;
    let code_idx = reference.require_column(&args.code_col, &args.reference)?;

    // Blank names would enter the table as an empty key and never usefully
    // match; keep them out here, at the caller boundary.
    let mut pairs = ingest::mapping_pairs(&reference, name_idx, code_idx);
    let total_pairs = pairs.len();
    pairs.retain(|(name, _)| !normalize(name).is_empty());
    if pairs.len() < total_pairs {
        log::warn!(
            "skipped {} reference rows with blank names",
            total_pairs - pairs.len()
        );
    }
    let mapping = MappingTable::build(pairs);
    summary.mapping_entries = mapping.len();
    log::info!(
        "mapping table built: {} entries from {}",
        mapping.len(),
        args.reference
    );

    let data = ingest::read_table(&args.data)
        .with_context(|| format!("loading data file {}", args.data))?;
    let geo_idx = data.require_column(&args.geo_col, &args.data)?;
    let values: Vec<RawValue> = data
        .column_values(geo_idx)
        .map(RawValue::from_field)
        .collect();

    let progress = ProgressConfig {
        update_every: cfg.resolve.progress_every,
    };
    let results = resolve::resolve_batch_with_progress(&values, &mapping, progress, |u| {
        log::info!(
            "resolved {}/{} ({:.1}%) in {} ms, mem {} MB used / {} MB avail",
            u.processed,
            u.total,
            u.percent,
            u.elapsed_ms,
            u.mem_used_mb,
            u.mem_avail_mb
        );
    });
    summary.record_results(&results);

    // Same shape as the input, with the selected column replaced by the
    // resolved values.
    let mut rows: Vec<(Vec<String>, &ResolutionResult)> =
        data.rows.iter().cloned().zip(results.iter()).collect();
    for (row, result) in rows.iter_mut() {
        if row.len() <= geo_idx {
            row.resize(geo_idx + 1, String::new());
        }
        row[geo_idx] = result.value.render();
    }

    summary.unknown_values = rows.iter().filter(|(_, r)| resolve::is_unknown(r)).count();
    if summary.unknown_values > 0 && !cfg.resolve.drop_unknown {
        log::warn!(
            "{} rows hold the literal \"{}\"; re-run with --drop-unknown to drop them",
            summary.unknown_values,
            resolve::UNKNOWN_SENTINEL
        );
    }
    if cfg.resolve.drop_unknown {
        let kept_before = rows.len();
        rows.retain(|(_, r)| !resolve::is_unknown(r));
        summary.dropped_rows = kept_before - rows.len();
        if summary.dropped_rows > 0 {
            log::info!("dropped {} \"unknown\" rows", summary.dropped_rows);
        }
    }

    let out_table = Table {
        headers: data.headers.clone(),
        rows: rows.into_iter().map(|(row, _)| row).collect(),
    };
    summary.finish();
    export_outputs(&out_table, Some(&summary), &args.out, args.format)?;
    println!("{}", summary.render_text());
    Ok(())
}

fn run_filter(args: FilterArgs) -> Result<()> {
    let data = ingest::read_table(&args.data)
        .with_context(|| format!("loading data file {}", args.data))?;
    let reference = ingest::read_table(&args.reference)
        .with_context(|| format!("loading reference file {}", args.reference))?;
    let data_idx = data.require_column(&args.data_id_col, &args.data)?;
    let ref_idx = reference.require_column(&args.ref_id_col, &args.reference)?;

    let report = filter_by_shared_ids(&data, data_idx, &reference, ref_idx);
    if report.matching_ids.is_empty() {
        log::warn!(
            "no matching geo ids between {} and {}",
            args.data,
            args.reference
        );
    }

    let out_table = Table {
        headers: data.headers.clone(),
        rows: report.rows.clone(),
    };
    export_outputs(&out_table, None, &args.out, args.format)?;
    println!("{}", render_filter_report(&args, &report));
    Ok(())
}

fn render_filter_report(args: &FilterArgs, report: &FilterReport) -> String {
    let mut out = String::from("Filter Report\n=============\n");
    out.push_str(&format!(
        "Rows in {}: {}\n",
        args.data, report.data_rows_total
    ));
    out.push_str(&format!(
        "Distinct ids in {}: {}\n",
        args.reference, report.reference_ids_total
    ));
    out.push_str(&format!("Matching ids: {}\n", report.matching_ids.len()));
    out.push_str(&format!("Rows kept: {}\n", report.rows.len()));
    for (label, set) in [
        ("Ids only in data", &report.only_in_data),
        ("Ids only in reference", &report.only_in_reference),
    ] {
        out.push_str(&format!("{} ({})", label, set.len()));
        if !set.is_empty() {
            // First ten are enough for a console diagnostic.
            let sample: Vec<&str> = set.iter().take(10).map(String::as_str).collect();
            out.push_str(&format!(": {}", sample.join(", ")));
        }
        out.push('\n');
    }
    out
}

fn export_outputs(
    table: &Table,
    summary: Option<&RunSummary>,
    out: &str,
    format: FormatOpt,
) -> Result<()> {
    match format {
        FormatOpt::Csv => {
            csv_export::export_table_csv(table, out)?;
            log::info!("csv written to {}", out);
        }
        FormatOpt::Xlsx => {
            let path = with_extension(out, "xlsx");
            xlsx_export::export_table_xlsx(table, summary, &path)?;
            log::info!("xlsx written to {}", path);
        }
        FormatOpt::Both => {
            csv_export::export_table_csv(table, out)?;
            let path = with_extension(out, "xlsx");
            xlsx_export::export_table_xlsx(table, summary, &path)?;
            log::info!("csv written to {}, xlsx written to {}", out, path);
        }
    }
    Ok(())
}

fn with_extension(path: &str, ext: &str) -> String {
    std::path::Path::new(path)
        .with_extension(ext)
        .display()
        .to_string()
}
