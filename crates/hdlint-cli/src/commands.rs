//! One-shot `check` and `scan`.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use hdlint_kernel::{Document, Engine, TagRegistry};

use crate::cli::{CheckArgs, Format, ScanArgs};
use crate::report::{diagnostic_line, region_line, FileReport};

/// Validate files and print their diagnostics. Exits 1 if any is an error.
pub async fn check(args: CheckArgs) -> Result<ExitCode> {
    let config = args.config.resolve()?;
    let engine = Engine::with_defaults(config);

    let mut reports = Vec::with_capacity(args.files.len());
    for path in &args.files {
        reports.push(check_file(&engine, path).await?);
    }

    match args.format {
        Format::Text => {
            for report in &reports {
                for diagnostic in &report.diagnostics {
                    println!("{}", diagnostic_line(&report.path, diagnostic));
                }
            }
        }
        Format::Json => {
            let json = serde_json::to_string_pretty(&reports).context("failed to encode report")?;
            println!("{json}");
        }
    }

    if reports.iter().any(FileReport::has_errors) {
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Validate one file.
pub async fn check_file(engine: &Engine, path: &Path) -> Result<FileReport> {
    let document = read_document(path).await?;
    let diagnostics = engine
        .validate(&document)
        .await
        .with_context(|| format!("failed to scan {}", path.display()))?;

    Ok(FileReport {
        path: path.display().to_string(),
        diagnostics,
    })
}

/// Print each file's regions.
pub async fn scan(args: ScanArgs) -> Result<ExitCode> {
    let tags = TagRegistry::with_defaults();

    for path in &args.files {
        let document = read_document(path).await?;
        let regions = hdlint_kernel::scan(&document, &tags)
            .with_context(|| format!("failed to scan {}", path.display()))?;

        let name = path.display().to_string();
        for region in &regions {
            let key = tags.lookup(&region.tag).unwrap_or("?");
            println!("{}", region_line(&name, region, key));
        }
    }

    Ok(ExitCode::SUCCESS)
}

pub(crate) async fn read_document(path: &Path) -> Result<Document> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(Document::from_text(path.display().to_string(), 0, &text))
}
