use crate::error::CliError;
use runtime::RunSummary;

/// Writes the run's JSON metrics document, either to `path` or to stdout.
pub fn write_summary(summary: &RunSummary, path: Option<&str>) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(summary).map_err(CliError::JsonSerialize)?;
    match path {
        Some(path) => std::fs::write(path, json)?,
        None => println!("{json}"),
    }
    Ok(())
}

pub fn print_summary_table(summary: &RunSummary) {
    println!("Run summary");
    println!("-----------");
    println!("{:<24} {}", "Succeeded", summary.applications_succeeded);
    println!("{:<24} {}", "Failed", summary.applications_failed);
    println!("{:<24} {:.2}%", "Success rate", summary.success_rate * 100.0);
    println!("{:<24} {}", "Rows inserted", summary.rows_inserted);
    println!("{:<24} {}", "Rows skipped (duplicate)", summary.rows_skipped_duplicate);
    println!("{:<24} {}", "Batches processed", summary.batches_processed);
    println!("{:<24} {:.1}", "Throughput / min", summary.throughput_per_minute);
    println!("{:<24} {}", "Cancelled", summary.cancelled);
}
