//! Console rendering: colored headings, tables and progress bars.

use crate::analyzer::{AnalysisReport, AnalysisSummary, FileFailure};
use crate::complexity::ComplexityPrediction;
use crate::language::Language;
use crate::patterns::PatternReport;
use crate::rules::ids::rule_id;
use crate::rules::{Finding, Severity, SeverityCounts};
use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::Write;
use std::time::Duration;

/// Create a progress bar with file count.
///
/// In test mode, returns a hidden progress bar to avoid polluting test output.
#[must_use]
pub fn create_progress_bar(total_files: u64) -> ProgressBar {
    if cfg!(test) {
        return ProgressBar::hidden();
    }

    let pb =
        ProgressBar::with_draw_target(Some(total_files), ProgressDrawTarget::stderr_with_hz(20));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░"),
    );
    pb.set_message("analyzing...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Create a spinner for work of unknown length, such as model training.
#[must_use]
pub fn create_spinner(message: &'static str) -> ProgressBar {
    if cfg!(test) {
        return ProgressBar::hidden();
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Print the main header with box-drawing characters.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_header(writer: &mut impl Write) -> std::io::Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{}", "╔════════════════════════════════════════╗".cyan())?;
    writeln!(writer, "{}", "║  Code Smell & Technical Debt Report    ║".cyan().bold())?;
    writeln!(writer, "{}", "╚════════════════════════════════════════╝".cyan())?;
    writeln!(writer)?;
    Ok(())
}

fn create_table(headers: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers);
    table
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Critical | Severity::High => Color::Red,
        Severity::Medium => Color::Yellow,
        Severity::Low => Color::Blue,
    }
}

/// Green from 80, yellow from 60, red below.
fn score_color(score: f64) -> colored::Color {
    if score >= 80.0 {
        colored::Color::Green
    } else if score >= 60.0 {
        colored::Color::Yellow
    } else {
        colored::Color::Red
    }
}

fn pill(label: &str, count: usize) -> String {
    if count == 0 {
        format!("{}: {}", label, count.to_string().green())
    } else {
        format!("{}: {}", label, count.to_string().red().bold())
    }
}

fn print_severity_pills(writer: &mut impl Write, counts: &SeverityCounts) -> std::io::Result<()> {
    writeln!(
        writer,
        "{}  {}  {}  {}",
        pill("Critical", counts.critical),
        pill("High", counts.high),
        pill("Medium", counts.medium),
        pill("Low", counts.low),
    )
}

/// Print the full report of one file.
///
/// With `verbose`, suggestions and recommendations are included.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_report(
    writer: &mut impl Write,
    report: &AnalysisReport,
    verbose: bool,
) -> std::io::Result<()> {
    let language = report.language.map_or("Unknown", Language::display_name);
    writeln!(
        writer,
        "{} {}",
        report.file.bold().underline(),
        format!("({language}, {} lines)", report.lines).dimmed()
    )?;
    print_severity_pills(writer, &report.smells.by_severity)?;

    let overall = report.quality.overall;
    writeln!(
        writer,
        "Quality: {} ({}) | Debt: {} ({}, ~{:.1}h)",
        format!("{overall:.1}").color(score_color(overall)).bold(),
        report.quality.grade(),
        format!("{:.1}", report.debt.total_score)
            .color(score_color(100.0 - report.debt.total_score))
            .bold(),
        report.debt.level,
        report.debt.estimated_hours,
    )?;
    print_complexity(writer, &report.complexity.prediction)?;

    print_smells(writer, &report.smells.smells, verbose)?;
    print_scores(writer, report)?;
    if let Some(patterns) = &report.patterns {
        print_patterns(writer, patterns)?;
    }
    if verbose {
        print_list(writer, "Issues", &report.quality.issues)?;
        print_list(writer, "Recommendations", &report.debt.recommendations)?;
    }
    for diagnostic in &report.diagnostics {
        writeln!(writer, "{} {}", "[WARN]".yellow().bold(), diagnostic)?;
    }
    writeln!(writer)?;
    Ok(())
}

fn print_complexity(
    writer: &mut impl Write,
    prediction: &ComplexityPrediction,
) -> std::io::Result<()> {
    match prediction {
        ComplexityPrediction::Predicted {
            label, confidence, ..
        } => writeln!(
            writer,
            "Complexity: {} {}",
            label.to_string().bold(),
            format!("({:.0}% confidence)", confidence * 100.0).dimmed()
        ),
        ComplexityPrediction::Unavailable { .. } => {
            writeln!(writer, "Complexity: {}", "unavailable".dimmed())
        }
    }
}

fn print_smells(writer: &mut impl Write, smells: &[Finding], verbose: bool) -> std::io::Result<()> {
    if smells.is_empty() {
        writeln!(writer, "{}", "[OK] No code smells found".green())?;
        return Ok(());
    }

    let mut headers = vec!["Code", "Type", "Message", "Line", "Severity"];
    if verbose {
        headers.push("Suggestion");
    }
    let mut table = create_table(headers);
    for finding in smells {
        let mut row = vec![
            Cell::new(rule_id(finding.kind)),
            Cell::new(finding.kind.as_str()).add_attribute(Attribute::Dim),
            Cell::new(&finding.message).add_attribute(Attribute::Bold),
            Cell::new(finding.line),
            Cell::new(finding.severity.as_str()).fg(severity_color(finding.severity)),
        ];
        if verbose {
            row.push(Cell::new(&finding.suggestion));
        }
        table.add_row(row);
    }
    writeln!(writer, "{table}")?;
    Ok(())
}

fn print_scores(writer: &mut impl Write, report: &AnalysisReport) -> std::io::Result<()> {
    let mut table = create_table(vec!["Quality", "Score", "Debt", "Score"]);
    let quality = [
        ("Maintainability", report.quality.maintainability),
        ("Readability", report.quality.readability),
        ("Complexity", report.quality.complexity),
        ("Documentation", report.quality.documentation),
        ("Overall", report.quality.overall),
    ];
    for ((q_name, q_score), (d_name, d_score)) in
        quality.iter().zip(report.debt.breakdown.entries())
    {
        table.add_row(vec![
            Cell::new(q_name),
            Cell::new(format!("{q_score:.1}")),
            Cell::new(d_name),
            Cell::new(format!("{d_score:.1}")),
        ]);
    }
    writeln!(writer, "{table}")?;
    Ok(())
}

fn print_patterns(writer: &mut impl Write, report: &PatternReport) -> std::io::Result<()> {
    let scores = report
        .category_scores
        .iter()
        .map(|(category, score)| format!("{category} {:.0}%", score * 100.0))
        .collect::<Vec<_>>()
        .join(", ");
    writeln!(
        writer,
        "Design pattern: {} {} | suggested: {} {}",
        report.predicted_category.to_string().bold(),
        format!("({scores})").dimmed(),
        report.suggested_pattern.name.cyan(),
        format!("({})", report.suggested_pattern.reason).dimmed(),
    )?;
    for pattern in &report.detected_patterns {
        writeln!(
            writer,
            "  {} {} {}",
            "•".cyan(),
            pattern.name.bold(),
            format!("{:.2}", pattern.confidence).dimmed()
        )?;
    }
    Ok(())
}

fn print_list(writer: &mut impl Write, title: &str, items: &[String]) -> std::io::Result<()> {
    if items.is_empty() {
        return Ok(());
    }
    writeln!(writer, "{}", title.bold())?;
    for item in items {
        writeln!(writer, "  - {item}")?;
    }
    Ok(())
}

/// Print totals across all analysed files.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_summary(writer: &mut impl Write, summary: &AnalysisSummary) -> std::io::Result<()> {
    writeln!(writer, "{}", "Summary".bold().underline())?;
    writeln!(
        writer,
        "{}",
        format!(
            "Analyzed {} files ({} lines), {} smells",
            summary.total_files.to_string().bold(),
            summary.total_lines.to_string().bold(),
            summary.total_smells.to_string().bold()
        )
        .dimmed()
    )?;
    print_severity_pills(writer, &summary.by_severity)?;
    writeln!(
        writer,
        "Average quality: {} | Average debt: {}",
        format!("{:.1}", summary.average_quality)
            .color(score_color(summary.average_quality))
            .bold(),
        format!("{:.1}", summary.average_debt).bold()
    )?;
    if let Some((file, score)) = &summary.worst_file {
        writeln!(writer, "Lowest quality: {} ({score:.1})", file.bold())?;
    }
    writeln!(writer)?;
    Ok(())
}

/// Print files that could not be analysed.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_failures(writer: &mut impl Write, failures: &[FileFailure]) -> std::io::Result<()> {
    if failures.is_empty() {
        return Ok(());
    }
    writeln!(writer, "\n{}", "Failed Files".bold().underline().red())?;
    let mut table = create_table(vec!["File", "Error"]);
    for failure in failures {
        table.add_row(vec![
            Cell::new(&failure.file).add_attribute(Attribute::Bold),
            Cell::new(&failure.error).fg(Color::Red),
        ]);
    }
    writeln!(writer, "{table}")?;
    Ok(())
}

/// Print the recognised extensions and the analysis each one gets.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_languages(writer: &mut impl Write) -> std::io::Result<()> {
    let mut table = create_table(vec!["Extension", "Language", "Structure"]);
    for language in Language::ALL {
        let structure = match language {
            Language::Python => "syntax tree",
            Language::Java => "regex",
            _ => "basic",
        };
        table.add_row(vec![
            Cell::new(format!(".{}", language.extension())).add_attribute(Attribute::Bold),
            Cell::new(language.display_name()),
            Cell::new(structure),
        ]);
    }
    writeln!(writer, "{table}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::Analyzer;
    use crate::source::SourceFile;

    fn render(report: &AnalysisReport, verbose: bool) -> String {
        colored::control::set_override(false);
        let mut buffer = Vec::new();
        print_report(&mut buffer, report, verbose).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_report_lists_smells() {
        let text = "def f(a, b, c, d, e, g):\n    return a\n";
        let report =
            Analyzer::default().analyze_source(&SourceFile::from_text(text, Some(Language::Python)));
        let out = render(&report, true);
        assert!(out.contains("<text>"));
        assert!(out.contains("long_parameter_list"));
        assert!(out.contains("SS-S004"));
        assert!(out.contains("Complexity: unavailable"));
        assert!(out.contains("Design pattern:"));
    }

    #[test]
    fn test_clean_report() {
        let report = Analyzer::default()
            .analyze_source(&SourceFile::from_text("x = 1\n", Some(Language::Python)));
        assert!(render(&report, false).contains("No code smells found"));
    }

    #[test]
    fn test_languages_table() {
        let mut buffer = Vec::new();
        print_languages(&mut buffer).unwrap();
        let out = String::from_utf8(buffer).unwrap();
        for ext in crate::language::SUPPORTED_EXTENSIONS {
            assert!(out.contains(&format!(".{ext}")));
        }
    }
}
