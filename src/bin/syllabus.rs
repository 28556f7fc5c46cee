//! CLI binary for syllabus-extract.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ParseConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use syllabus_extract::{
    extract_text, inspect, parse_batch, parse_extracted, parse_to_file, tables_from_json,
    DocumentMetadata, PageSelection, ParseConfig, ParseProgressCallback, ParseStats,
    ProgressCallback, SourceDocument, SyllabusOutput, Table,
};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback for batches. Documents finish out of order, so
/// each one logs its own line above the bar.
struct CliProgressCallback {
    bar: ProgressBar,
    start_times: Mutex<HashMap<usize, Instant>>,
    errors: AtomicUsize,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} documents  \
             ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(style);
        bar.set_prefix("Parsing");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            start_times: Mutex::new(HashMap::new()),
            errors: AtomicUsize::new(0),
        })
    }

    fn elapsed_secs(&self, index: usize) -> f64 {
        self.start_times
            .lock()
            .ok()
            .and_then(|mut m| m.remove(&index))
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }
}

impl ParseProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Parsing {total} syllabi…"))
        ));
    }

    fn on_document_start(&self, index: usize, _total: usize, input: &str) {
        if let Ok(mut m) = self.start_times.lock() {
            m.insert(index, Instant::now());
        }
        self.bar.set_message(input.to_string());
    }

    fn on_document_complete(&self, index: usize, total: usize, stats: &ParseStats) {
        let secs = self.elapsed_secs(index);
        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {}  {}",
            green("✓"),
            index + 1,
            total,
            dim(&format!(
                "{} assignments, {} meetings, {} dates",
                stats.assignments, stats.schedule_items, stats.important_dates
            )),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_document_error(&self, index: usize, total: usize, error: &str) {
        let secs = self.elapsed_secs(index);
        self.errors.fetch_add(1, Ordering::SeqCst);

        let msg: String = if error.chars().count() > 80 {
            format!("{}\u{2026}", error.chars().take(79).collect::<String>())
        } else {
            error.to_string()
        };

        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {}  {}",
            red("✗"),
            index + 1,
            total,
            red(&msg),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, total: usize, success_count: usize) {
        let failed = self.errors.load(Ordering::SeqCst);
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} syllabi parsed successfully",
                green("✔"),
                bold(&success_count.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} syllabi parsed  ({} failed)",
                if failed == total { red("✘") } else { cyan("⚠") },
                bold(&success_count.to_string()),
                total,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Parse one syllabus, JSON to stdout
  syllabus cs101.pdf

  # Human-readable report
  syllabus --summary cs101.pdf

  # Record the semester start alongside the result
  syllabus --semester-start 2024-01-16 cs101.pdf -o cs101.json

  # Parse from URL
  syllabus https://example.edu/courses/math221/syllabus.pdf

  # A whole department, four at a time
  syllabus -c 4 syllabi/*.pdf > all.json

  # Text you already have (no PDF decoding), with tables from another tool
  syllabus --text-file syllabus.txt --tables tables.json

  # Dump the decoded text only
  syllabus --extract-text cs101.pdf

  # PDF metadata only
  syllabus --inspect-only cs101.pdf

TABLES FILE FORMAT:
  A JSON array of tables; each table is an array of rows; each row is an
  array of cells, where a cell is a string or null:
    [[["Homework 1", "Monday", "01/22/2024"], ["Quiz 1", null, "01/29/2024"]]]

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH     Path to libpdfium; otherwise ./ then the system library
  RUST_LOG            Overrides the log filter (e.g. syllabus_extract=debug)
  SYLLABUS_*          Every option below has a matching variable
"#;

/// Extract course info, assignments, schedule and important dates from syllabus PDFs.
#[derive(Parser, Debug)]
#[command(
    name = "syllabus",
    version,
    about = "Extract structured course data from syllabus PDFs",
    long_about = "Extract course information, assignments, the weekly schedule and important \
dates from syllabus PDFs (local files or URLs). Output is JSON by default.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file paths or HTTP/HTTPS URLs.
    #[arg(required_unless_present = "text_file")]
    inputs: Vec<String>,

    /// Parse a UTF-8 text file instead of a PDF.
    #[arg(long, env = "SYLLABUS_TEXT_FILE", conflicts_with = "inputs")]
    text_file: Option<PathBuf>,

    /// JSON file of tables to merge into the source.
    #[arg(long, env = "SYLLABUS_TABLES")]
    tables: Option<PathBuf>,

    /// Write output to this file instead of stdout.
    #[arg(short, long, env = "SYLLABUS_OUTPUT")]
    output: Option<PathBuf>,

    /// Print a human-readable report instead of JSON.
    #[arg(long, env = "SYLLABUS_SUMMARY")]
    summary: bool,

    /// Semester start date (YYYY-MM-DD), echoed in the output.
    #[arg(long, env = "SYLLABUS_SEMESTER_START")]
    semester_start: Option<String>,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "SYLLABUS_PASSWORD")]
    password: Option<String>,

    /// Page selection: all, 5, 3-15, or 1,3,5,7.
    #[arg(long, env = "SYLLABUS_PAGES", default_value = "all")]
    pages: String,

    /// Largest accepted PDF in MiB.
    #[arg(long, env = "SYLLABUS_MAX_FILE_MB", default_value_t = 10)]
    max_file_mb: u64,

    /// Run the four extractors one after another on the calling task.
    #[arg(long, env = "SYLLABUS_SEQUENTIAL")]
    sequential: bool,

    /// Number of documents parsed at once.
    #[arg(short, long, env = "SYLLABUS_CONCURRENCY", default_value_t = 4)]
    concurrency: usize,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "SYLLABUS_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,

    /// Print the decoded text only, no extraction.
    #[arg(long)]
    extract_text: bool,

    /// Print PDF metadata only, no extraction.
    #[arg(long)]
    inspect_only: bool,

    /// Disable progress bar.
    #[arg(long, env = "SYLLABUS_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "SYLLABUS_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "SYLLABUS_QUIET")]
    quiet: bool,
}

/// One entry of the JSON array printed for a multi-document batch.
#[derive(Serialize)]
#[serde(untagged)]
enum BatchEntry<'a> {
    Parsed {
        input: &'a str,
        #[serde(flatten)]
        output: &'a SyllabusOutput,
    },
    Failed {
        input: &'a str,
        error: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO-level library logs for batches.
    let show_progress = !cli.quiet && !cli.no_progress && cli.inputs.len() > 1;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let tables = match cli.tables {
        Some(ref path) => load_tables(path).await?,
        None => Vec::new(),
    };

    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn ParseProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    // ── Text-file mode ───────────────────────────────────────────────────
    if let Some(ref path) = cli.text_file {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read text file {}", path.display()))?;
        let source = SourceDocument::from_text(text).with_tables(tables);
        let output = parse_extracted(source, DocumentMetadata::default(), &config)
            .await
            .context("Extraction failed")?;
        return emit(&cli, &render_one(&cli, &output)?);
    }

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let mut rendered = String::new();
        for input in &cli.inputs {
            let meta = inspect(input)
                .await
                .with_context(|| format!("Failed to inspect {input}"))?;
            if cli.summary {
                rendered.push_str(&render_metadata(input, &meta));
            } else {
                rendered.push_str(
                    &serde_json::to_string_pretty(&meta).context("Failed to serialise metadata")?,
                );
                rendered.push('\n');
            }
        }
        return emit(&cli, &rendered);
    }

    // ── Extract-text mode ────────────────────────────────────────────────
    if cli.extract_text {
        let mut rendered = String::new();
        for input in &cli.inputs {
            let doc = extract_text(input, &config)
                .await
                .with_context(|| format!("Failed to extract text from {input}"))?;
            if cli.inputs.len() > 1 {
                rendered.push_str(&format!("==> {input} <==\n"));
            }
            rendered.push_str(&doc.text);
        }
        return emit(&cli, &rendered);
    }

    // ── Single document ──────────────────────────────────────────────────
    if cli.inputs.len() == 1 {
        let input = &cli.inputs[0];

        // Plain JSON to a file goes straight through the atomic writer.
        if tables.is_empty() && !cli.summary {
            if let Some(ref path) = cli.output {
                let stats = parse_to_file(input, path, &config)
                    .await
                    .with_context(|| format!("Failed to parse {input}"))?;
                if !cli.quiet {
                    eprintln!(
                        "{}  {} assignments, {} meetings, {} dates  {}ms  →  {}",
                        green("✔"),
                        stats.assignments,
                        stats.schedule_items,
                        stats.important_dates,
                        stats.total_duration_ms,
                        bold(&path.display().to_string()),
                    );
                }
                return Ok(());
            }
        }

        let output = if tables.is_empty() {
            syllabus_extract::parse_document(input, &config).await
        } else {
            parse_with_tables(input, tables, &config).await
        }
        .with_context(|| format!("Failed to parse {input}"))?;

        return emit(&cli, &render_one(&cli, &output)?);
    }

    // ── Batch ────────────────────────────────────────────────────────────
    if !tables.is_empty() {
        anyhow::bail!("--tables applies to a single document; got {}", cli.inputs.len());
    }

    let results = parse_batch(cli.inputs.clone(), &config).await;
    let failed = results.iter().filter(|r| r.result.is_err()).count();

    let rendered = if cli.summary {
        let mut s = String::new();
        for r in &results {
            match r.result {
                Ok(ref out) => {
                    s.push_str(&bold(&format!("═══ {} ═══", r.input)));
                    s.push('\n');
                    s.push_str(&render_summary(out));
                }
                Err(ref e) => s.push_str(&format!("{} {}: {}\n", red("✗"), r.input, e)),
            }
            s.push('\n');
        }
        s
    } else {
        let entries: Vec<BatchEntry<'_>> = results
            .iter()
            .map(|r| match r.result {
                Ok(ref output) => BatchEntry::Parsed {
                    input: &r.input,
                    output,
                },
                Err(ref e) => BatchEntry::Failed {
                    input: &r.input,
                    error: e.to_string(),
                },
            })
            .collect();
        let mut json =
            serde_json::to_string_pretty(&entries).context("Failed to serialise output")?;
        json.push('\n');
        json
    };
    emit(&cli, &rendered)?;

    if failed > 0 {
        anyhow::bail!("{} of {} documents could not be parsed", failed, results.len());
    }
    Ok(())
}

/// Map CLI args to `ParseConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ParseConfig> {
    let mut builder = ParseConfig::builder()
        .pages(parse_pages(&cli.pages)?)
        .max_file_bytes(cli.max_file_mb.saturating_mul(1024 * 1024))
        .download_timeout_secs(cli.download_timeout)
        .concurrent_extractors(!cli.sequential)
        .concurrency(cli.concurrency);

    if let Some(ref date) = cli.semester_start {
        builder = builder.semester_start_date(date.clone());
    }
    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

async fn load_tables(path: &Path) -> Result<Vec<Table>> {
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read tables file {}", path.display()))?;
    tables_from_json(&json).with_context(|| format!("Invalid tables in {}", path.display()))
}

/// Decode a PDF, attach externally detected tables, then extract.
async fn parse_with_tables(
    input: &str,
    tables: Vec<Table>,
    config: &ParseConfig,
) -> Result<SyllabusOutput, syllabus_extract::SyllabusError> {
    let source = extract_text(input, config).await?.with_tables(tables);
    let metadata = DocumentMetadata {
        page_count: source.pages,
        ..DocumentMetadata::default()
    };
    parse_extracted(source, metadata, config).await
}

fn render_one(cli: &Cli, output: &SyllabusOutput) -> Result<String> {
    if cli.summary {
        Ok(render_summary(output))
    } else {
        let mut json = serde_json::to_string_pretty(output).context("Failed to serialise output")?;
        json.push('\n');
        Ok(json)
    }
}

/// Write to `--output` or stdout.
fn emit(cli: &Cli, rendered: &str) -> Result<()> {
    match cli.output {
        Some(ref path) => std::fs::write(path, rendered)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(rendered.as_bytes())
                .context("Failed to write to stdout")
        }
    }
}

fn or_dash(s: &str) -> &str {
    if s.is_empty() {
        "—"
    } else {
        s
    }
}

/// Human-readable report of one parsed syllabus.
fn render_summary(output: &SyllabusOutput) -> String {
    let r = &output.data;
    let ci = &r.course_info;
    let mut s = String::new();

    s.push_str(&format!("{}\n", bold("Course")));
    s.push_str(&format!("  Name:        {}\n", or_dash(&ci.course_name)));
    s.push_str(&format!("  Code:        {}\n", or_dash(&ci.course_code)));
    s.push_str(&format!("  Instructor:  {}\n", or_dash(&ci.instructor)));
    s.push_str(&format!(
        "  Term:        {} {}\n",
        or_dash(&ci.semester),
        ci.year
    ));
    if let Some(ref start) = output.semester_start_date {
        s.push_str(&format!("  Starts:      {start}\n"));
    }

    s.push_str(&format!("\n{} ({})\n", bold("Assignments"), r.assignments.len()));
    for (i, a) in r.assignments.iter().enumerate() {
        s.push_str(&format!(
            "  {:>2}. {:<16} due {}\n",
            i + 1,
            a.title,
            or_dash(&a.due_date)
        ));
    }

    s.push_str(&format!("\n{} ({})\n", bold("Schedule"), r.schedule.len()));
    for item in &r.schedule {
        s.push_str(&format!(
            "  {:<10} {:<9} {}\n",
            item.day,
            or_dash(&item.time),
            or_dash(&item.location)
        ));
    }

    s.push_str(&format!(
        "\n{} ({})\n",
        bold("Important dates"),
        r.important_dates.len()
    ));
    for d in &r.important_dates {
        s.push_str(&format!("  {:<18} {}\n", d.date, d.title));
    }

    let preview: String = r.raw_text.chars().take(200).collect();
    s.push_str(&format!("\n{}\n{}\n", bold("Text preview"), dim(&preview)));
    s
}

fn render_metadata(input: &str, meta: &DocumentMetadata) -> String {
    let mut s = format!("File:         {input}\n");
    let fields = [
        ("Title", &meta.title),
        ("Author", &meta.author),
        ("Subject", &meta.subject),
        ("Creator", &meta.creator),
        ("Producer", &meta.producer),
        ("Created", &meta.creation_date),
        ("Modified", &meta.modification_date),
    ];
    for (label, value) in fields {
        if let Some(v) = value {
            s.push_str(&format!("{:<14}{}\n", format!("{label}:"), v));
        }
    }
    s.push_str(&format!("Pages:        {}\n", meta.page_count));
    s.push_str(&format!("PDF Version:  {}\n", meta.pdf_version));
    s
}

/// Parse `--pages` string into `PageSelection`.
fn parse_pages(s: &str) -> Result<PageSelection> {
    let s = s.trim().to_lowercase();

    if s == "all" {
        return Ok(PageSelection::All);
    }

    // Range: "3-15"
    if let Some((start, end)) = s.split_once('-') {
        let start: usize = start
            .trim()
            .parse()
            .context("Invalid start page in range")?;
        let end: usize = end.trim().parse().context("Invalid end page in range")?;

        if start < 1 {
            anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", start);
        }
        if start > end {
            anyhow::bail!(
                "Invalid page range '{}-{}': start must be <= end",
                start,
                end
            );
        }

        return Ok(PageSelection::Range(start, end));
    }

    // Set: "1,3,5,7"
    if s.contains(',') {
        let pages: Vec<usize> = s
            .split(',')
            .map(|p| {
                p.trim()
                    .parse::<usize>()
                    .with_context(|| format!("Invalid page number: '{}'", p.trim()))
            })
            .collect::<Result<Vec<_>>>()?;

        if let Some(&p) = pages.iter().find(|&&p| p < 1) {
            anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", p);
        }

        return Ok(PageSelection::Set(pages));
    }

    // Single page: "5"
    let page: usize = s.parse().context("Invalid page number")?;
    if page < 1 {
        anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", page);
    }

    Ok(PageSelection::Single(page))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_flag_forms() {
        assert_eq!(parse_pages("all").unwrap(), PageSelection::All);
        assert_eq!(parse_pages(" ALL ").unwrap(), PageSelection::All);
        assert_eq!(parse_pages("3").unwrap(), PageSelection::Single(3));
        assert_eq!(parse_pages("2-4").unwrap(), PageSelection::Range(2, 4));
        assert_eq!(
            parse_pages("1, 3,5").unwrap(),
            PageSelection::Set(vec![1, 3, 5])
        );
    }

    #[test]
    fn pages_flag_rejects_bad_values() {
        assert!(parse_pages("0").is_err());
        assert!(parse_pages("5-2").is_err());
        assert!(parse_pages("1,x").is_err());
        assert!(parse_pages("first").is_err());
    }

    #[test]
    fn summary_lists_each_collection() {
        let data = syllabus_extract::parse(
            "Course: Algorithms\nHomework 1 due: 01/22/2024\nMonday 9:00 AM Room 101\n",
            &[],
            None,
        );
        let output = SyllabusOutput {
            data,
            ..SyllabusOutput::default()
        };
        let report = render_summary(&output);
        assert!(report.contains("Algorithms"));
        assert!(report.contains("Homework 1"));
        assert!(report.contains("9:00 AM"));
        assert!(report.contains("01/22/2024"));
    }
}
