//! Terminal rendering utilities.

use console::style;
use kokosend_channels::{Aggregate, DeliveryOutcome, SendResult};
use kokosend_core::{Destination, HistoryEntry, HistoryStatus};

/// One status line for a destination.
pub fn outcome_line(destination: Destination, outcome: &DeliveryOutcome) -> String {
    let indicator = match outcome {
        DeliveryOutcome::Pending => style("~").yellow().to_string(),
        DeliveryOutcome::Success => style("*").green().to_string(),
        DeliveryOutcome::Error { .. } => style("x").red().to_string(),
        DeliveryOutcome::Skipped => style("-").dim().to_string(),
    };
    let detail = match outcome {
        DeliveryOutcome::Error { reason } => format!(" {}", style(reason).dim()),
        _ => String::new(),
    };
    format!(
        "  {} {} {}{}",
        indicator,
        style(destination.label()).bold(),
        outcome.name(),
        detail
    )
}

/// Short summary of an aggregate result.
pub fn aggregate_summary(aggregate: Option<Aggregate>) -> &'static str {
    match aggregate {
        Some(Aggregate::FullSuccess) => "Message sent",
        Some(Aggregate::PartialSuccess) => "Message partially sent",
        Some(Aggregate::FullFailure) => "Message not sent",
        None => "Nothing sent",
    }
}

/// Print the per-destination outcomes and a summary line.
pub fn render_result(result: &SendResult) {
    for (destination, outcome) in &result.outcomes {
        eprintln!("{}", outcome_line(*destination, outcome));
    }
    let summary = aggregate_summary(result.aggregate);
    let summary = match result.aggregate {
        Some(Aggregate::FullSuccess) => style(summary).green(),
        Some(Aggregate::PartialSuccess) => style(summary).yellow(),
        _ => style(summary).red(),
    };
    eprintln!("{}", summary.bold());
}

/// One line of history output.
pub fn history_line(entry: &HistoryEntry) -> String {
    let status = match entry.status {
        HistoryStatus::Success => style("success").green(),
        HistoryStatus::Partial => style("partial").yellow(),
    };
    let destinations: Vec<&str> = entry.destinations.iter().map(|d| d.as_str()).collect();
    format!(
        "{}  {:<8} {:<12} {}",
        style(entry.timestamp.format("%Y-%m-%d %H:%M")).dim(),
        status,
        destinations.join(","),
        preview(&entry.text, 60)
    )
}

/// First line of `text`, cut to `max` characters.
pub fn preview(text: &str, max: usize) -> String {
    let first = text.lines().next().unwrap_or_default();
    if first.chars().count() > max {
        let cut: String = first.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        first.to_string()
    }
}

/// Ask a yes/no question on stderr. Defaults to no.
pub fn confirm(question: &str) -> bool {
    eprint!("{} {} ", style("?").yellow().bold(), style(question).bold());
    eprint!("{} ", style("[y/N]").dim());

    let mut input = String::new();
    if std::io::stdin().read_line(&mut input).is_ok() {
        matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_line_includes_reason() {
        console::set_colors_enabled(false);
        let line = outcome_line(Destination::Bot, &DeliveryOutcome::error("HTTP 403"));
        assert_eq!(line, "  x Bot channel error HTTP 403");

        let line = outcome_line(Destination::Webhook, &DeliveryOutcome::Skipped);
        assert_eq!(line, "  - Webhook channel skipped");
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("first line\nsecond", 20), "first line");
        assert_eq!(preview("abcdefghijkl", 8), "abcde...");
        assert_eq!(preview("", 8), "");
    }

    #[test]
    fn test_aggregate_summary() {
        assert_eq!(aggregate_summary(Some(Aggregate::PartialSuccess)), "Message partially sent");
        assert_eq!(aggregate_summary(None), "Nothing sent");
    }
}
