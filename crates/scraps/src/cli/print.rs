use chrono::{DateTime, Duration, Utc};
use console::style;
use scrapsapp::api::{CmdMessage, MessageLevel};
use scrapsapp::commands::CmdResult;
use scrapsapp::error::Result;
use scrapsapp::index::DisplayScrap;
use scrapsapp::model::{BackendKind, ScrapRecord};
use serde::Serialize;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 80;
const TIME_WIDTH: usize = 14;
/// Changes more recent than this show no time label.
const RECENT_MINUTES: i64 = 5;

/// How a command's result is shown in text mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Render {
    List,
    Full,
    Messages,
    Backends,
}

#[derive(Serialize)]
struct JsonScrap<'a> {
    index: String,
    kind: BackendKind,
    #[serde(flatten)]
    record: &'a ScrapRecord,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    scraps: Vec<JsonScrap<'a>>,
    backends: &'a [BackendKind],
    messages: &'a [CmdMessage],
}

pub(super) fn print_result(result: &CmdResult, render: Render, json: bool) -> Result<()> {
    if json {
        println!("{}", render_json(result, render)?);
        return Ok(());
    }

    match render {
        Render::List => print_scraps(&result.listed_scraps),
        Render::Full => print_full_scraps(&result.listed_scraps),
        Render::Backends => print_backends(&result.backends),
        Render::Messages => {}
    }
    print_messages(&result.messages);
    Ok(())
}

fn render_json(result: &CmdResult, render: Render) -> Result<String> {
    let scraps = match render {
        Render::Messages => &result.affected_scraps,
        _ => &result.listed_scraps,
    };
    let output = JsonOutput {
        scraps: scraps
            .iter()
            .map(|ds| JsonScrap {
                index: ds.index.to_string(),
                kind: ds.item.kind,
                record: &ds.item.record,
            })
            .collect(),
        backends: &result.backends,
        messages: &result.messages,
    };
    Ok(serde_json::to_string_pretty(&output)?)
}

fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", style(&message.content).dim()),
            MessageLevel::Success => println!("{}", style(&message.content).green()),
            MessageLevel::Warning => println!("{}", style(&message.content).yellow()),
            MessageLevel::Error => println!("{}", style(&message.content).red()),
        }
    }
}

fn print_backends(backends: &[BackendKind]) {
    for kind in backends {
        println!(
            "{}  {:<12} {}",
            style(kind.prefix()).yellow(),
            kind.as_str(),
            style(kind.label()).dim()
        );
    }
}

fn print_full_scraps(scraps: &[DisplayScrap]) {
    for (i, ds) in scraps.iter().enumerate() {
        if i > 0 {
            println!("\n================================\n");
        }
        println!(
            "{} {}",
            style(ds.index.to_string()).yellow(),
            style(&ds.item.record.label).bold()
        );
        println!("--------------------------------");
        println!("{}", ds.item.record.content);
    }
}

fn print_scraps(scraps: &[DisplayScrap]) {
    if scraps.is_empty() {
        println!("No scraps found.");
        return;
    }

    let mut current_kind = None;
    for ds in scraps {
        if current_kind != Some(ds.item.kind) {
            if current_kind.is_some() {
                println!();
            }
            println!("{}", style(ds.item.kind.label()).bold());
            current_kind = Some(ds.item.kind);
        }
        println!("{}", format_row(ds, Utc::now()));
    }
}

fn format_row(ds: &DisplayScrap, now: DateTime<Utc>) -> String {
    let idx_str = format!("  {}. ", ds.index);
    let idx_width = idx_str.width();
    let available = LINE_WIDTH.saturating_sub(idx_width + TIME_WIDTH);

    let label = truncate_to_width(&ds.item.record.label, available);
    let padding = available.saturating_sub(label.width());
    let time_label = format!(
        "{:>width$}",
        time_label(ds.item.record.updated_at, now),
        width = TIME_WIDTH
    );

    format!(
        "{}{}{}{}",
        style(idx_str).yellow(),
        label,
        " ".repeat(padding),
        style(time_label).dim()
    )
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }
    result
}

/// Relative "last changed" label; blank for changes under five minutes old.
fn time_label(updated_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(updated_at);
    if elapsed < Duration::minutes(RECENT_MINUTES) {
        return String::new();
    }

    Formatter::new().convert(elapsed.to_std().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrapsapp::index::DisplayIndex;
    use scrapsapp::model::ScrapItem;

    fn display(label: &str) -> DisplayScrap {
        DisplayScrap {
            item: ScrapItem::new(BackendKind::WorkspaceFile, ScrapRecord::new(label, "{}")),
            index: DisplayIndex::new(BackendKind::WorkspaceFile, 2),
        }
    }

    #[test]
    fn time_label_blank_when_recent() {
        let now = Utc::now();
        assert_eq!(time_label(now, now), "");
        assert_eq!(time_label(now - Duration::minutes(4), now), "");
    }

    #[test]
    fn time_label_for_older_changes() {
        let now = Utc::now();
        assert_eq!(time_label(now - Duration::hours(3), now), "3 hours ago");
        assert_eq!(time_label(now - Duration::days(2), now), "2 days ago");
    }

    #[test]
    fn truncate_keeps_short_strings() {
        assert_eq!(truncate_to_width("short", 10), "short");
    }

    #[test]
    fn truncate_adds_ellipsis() {
        let truncated = truncate_to_width("a very long label indeed", 10);
        assert!(truncated.ends_with('…'));
        assert!(truncated.width() <= 10);
    }

    #[test]
    fn row_contains_index_and_label() {
        let row = format_row(&display("Groceries"), Utc::now());
        assert!(row.contains("w2. "));
        assert!(row.contains("Groceries"));
    }

    #[test]
    fn json_lists_affected_scraps_for_mutations() {
        let mut result = CmdResult::default();
        result.affected_scraps.push(display("Created"));
        result.add_message(CmdMessage::success("Scrap created: Created"));

        let json: serde_json::Value =
            serde_json::from_str(&render_json(&result, Render::Messages).unwrap()).unwrap();
        assert_eq!(json["scraps"][0]["index"], "w2");
        assert_eq!(json["scraps"][0]["kind"], "file");
        assert_eq!(json["scraps"][0]["label"], "Created");
        assert_eq!(json["messages"][0]["level"], "success");
    }
}
