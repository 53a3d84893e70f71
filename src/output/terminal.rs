// Colored terminal output for scores, anchors, reports and probes.
//
// All terminal-specific formatting lives here; main.rs delegates to these
// functions after doing the work.

use colored::Colorize;

use crate::corpus::ImportSummary;
use crate::db::models::{LabelCounts, ScoredArticle};
use crate::engine::anchors::{Anchor, AnchorSet};
use crate::engine::polarity::PolarityLabel;
use crate::engine::ArticleScore;
use crate::error::Unscoreable;
use crate::keywords::KeywordTable;
use crate::pipeline::batch::BatchSummary;

/// Display the outcome of scoring a single article.
pub fn display_score(subject: &str, outcome: &Result<ArticleScore, Unscoreable>, threshold: f64) {
    println!("\n{}", format!("=== Polarity for \"{subject}\" ===").bold());

    match outcome {
        Ok(score) => {
            let r = &score.result;
            println!("  Label: {}", colorize_label(r.label));
            println!("  Bias score: {:+.4}  (threshold ±{threshold})", r.bias_score);
            println!("  Target similarity: {:.4}", r.target_similarity);
            println!("  Opposite similarity: {:.4}", r.opposite_similarity);
            println!("  Resolved subject: {}", score.resolved_subject);
            println!("  Tokens used: {}", score.tokens_used);
        }
        Err(reason) => {
            println!("  {} {}", "Unscoreable:".yellow().bold(), reason);
            println!("  Reason code: {}", reason.reason_code().dimmed());
        }
    }
}

/// Display the resolved anchor pair for every configured keyword.
pub fn display_anchors(keywords: &KeywordTable, anchors: &AnchorSet) {
    println!(
        "\n{}",
        format!(
            "=== Anchors ({} keywords, {} scoreable) ===",
            anchors.len(),
            anchors.scoreable_count()
        )
        .bold()
    );
    println!();

    println!(
        "  {:<24} {:<12} {:<8}  {}",
        "Keyword".dimmed(),
        "Category".dimmed(),
        "Target".dimmed(),
        "Opposite (resolved from)".dimmed(),
    );
    println!("  {}", "-".repeat(78).dimmed());

    for (keyword, pair) in anchors.iter() {
        let category = keywords
            .get(keyword)
            .map(|k| k.category.as_str())
            .unwrap_or("");
        let target = if pair.target.is_some() {
            "ok".green()
        } else {
            "missing".red()
        };
        let opposite = match &pair.opposite {
            Some(anchor) => super::truncate_chars(&anchor.resolved_subject(), 40).normal(),
            None => "missing".red(),
        };
        println!(
            "  {:<24} {:<12} {:<8}  {}",
            super::truncate_chars(keyword, 24),
            super::truncate_chars(category, 12),
            target,
            opposite,
        );
    }
    println!();
}

/// Display a free-form term's resolved anchor.
pub fn display_free_term(term: &str, anchor: Option<&Anchor>) {
    match anchor {
        Some(a) => println!("  \"{}\" resolved from: {}", term, a.resolved_subject()),
        None => println!("  \"{}\" has no in-vocabulary tokens", term.yellow()),
    }
}

/// Display the strongest article on each side of a keyword's axis.
pub fn display_report(keyword: &str, target: Option<&ScoredArticle>, opposite: Option<&ScoredArticle>) {
    println!("\n{}", format!("=== Report for \"{keyword}\" ===").bold());

    if target.is_none() && opposite.is_none() {
        println!("  No scored articles for this keyword yet. Run `slant batch` first.");
        return;
    }

    display_report_side(PolarityLabel::Target, target);
    display_report_side(PolarityLabel::Opposite, opposite);
}

fn display_report_side(label: PolarityLabel, row: Option<&ScoredArticle>) {
    println!("\n  Strongest {}:", colorize_label(label));
    let Some(row) = row else {
        println!("    {}", "none".dimmed());
        return;
    };

    let bias = row
        .score
        .as_ref()
        .and_then(|s| s.bias_score)
        .map(|b| format!("{b:+.4}"))
        .unwrap_or_default();
    println!("    [{}] {}", bias, super::truncate_chars(&row.article.title, 100));
    println!("    {}", row.article.link.dimmed());
    if !row.article.description.is_empty() {
        println!(
            "    {}",
            super::truncate_chars(&row.article.description, 140).dimmed()
        );
    }
}

/// Display the nearest vocabulary neighbours of a probe word.
pub fn display_neighbors(word: &str, neighbors: Option<&[(String, f64)]>) {
    println!("\n{}", format!("=== Nearest to \"{word}\" ===").bold());
    match neighbors {
        None => println!("  \"{}\" is not in the vocabulary", word.yellow()),
        Some([]) => println!("  No other vocabulary entries to compare against"),
        Some(list) => {
            for (i, (other, sim)) in list.iter().enumerate() {
                println!("  {:>3}. {:<30} {:.4}", i + 1, other, sim);
            }
        }
    }
}

pub fn display_batch_summary(summary: &BatchSummary) {
    println!("\n{}", "=== Batch complete ===".bold());
    println!("  Considered:  {}", summary.considered);
    println!("  Scored:      {}", summary.scored.to_string().green());
    println!("  Unscoreable: {}", summary.unscoreable.to_string().yellow());
    if summary.skipped > 0 {
        println!(
            "  Skipped:     {} {}",
            summary.skipped,
            "(no keyword assigned or detected)".dimmed()
        );
    }
}

pub fn display_import_summary(summary: &ImportSummary) {
    println!(
        "Imported {} articles ({} duplicates, {} rows without link or title)",
        summary.inserted.to_string().bold(),
        summary.duplicates,
        summary.skipped,
    );
}

pub fn display_label_counts(counts: &LabelCounts) {
    println!(
        "Articles: {} total: {} {}, {} {}, {} {}, {} unscoreable, {} not yet scored",
        counts.total(),
        counts.target,
        colorize_label(PolarityLabel::Target),
        counts.opposite,
        colorize_label(PolarityLabel::Opposite),
        counts.neutral,
        colorize_label(PolarityLabel::Neutral),
        counts.unscoreable,
        counts.unscored,
    );
}

fn colorize_label(label: PolarityLabel) -> colored::ColoredString {
    match label {
        PolarityLabel::Target => label.as_str().blue().bold(),
        PolarityLabel::Opposite => label.as_str().red().bold(),
        PolarityLabel::Neutral => label.as_str().dimmed(),
    }
}
