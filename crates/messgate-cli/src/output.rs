//! Output formatting utilities.

use chrono::NaiveDateTime;
use messgate_core::{
    parse_instant, ActiveEvent, EntryRecord, EventStats, GateState, LiveEntries, ScanToken,
    ScheduleReport, Severity, TimeWindow,
};
use serde_json::{json, Value};

/// Pretty JSON for any value.
pub fn format_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Short marker for a severity.
pub fn severity_tag(severity: Severity) -> &'static str {
    match severity {
        Severity::Positive => "OK",
        Severity::Caution => "WARN",
        Severity::Negative => "ERROR",
        Severity::Neutral => "--",
    }
}

/// Display form of a naive instant.
pub fn format_instant(instant: NaiveDateTime) -> String {
    instant.format("%d %b %Y, %H:%M").to_string()
}

/// Display form of a raw service time; unparseable text is shown as is.
pub fn format_raw_time(raw: Option<&str>) -> String {
    match raw {
        Some(text) => parse_instant(text)
            .map(format_instant)
            .unwrap_or_else(|| text.to_string()),
        None => "-".to_string(),
    }
}

/// `start -> end`, with `?` for missing bounds.
pub fn format_window(window: &TimeWindow) -> String {
    let bound = |b: Option<NaiveDateTime>| b.map(format_instant).unwrap_or_else(|| "?".to_string());
    format!("{} -> {}", bound(window.start), bound(window.end))
}

/// Human-readable validation report.
pub fn format_report(report: &ScheduleReport) -> String {
    if report.can_submit() {
        return "Event form is valid.".to_string();
    }
    let mut lines = Vec::new();
    if !report.event.is_empty() {
        lines.push("Event:".to_string());
        lines.extend(report.event_messages().into_iter().map(|m| format!("  - {m}")));
    }
    if !report.slots.is_empty() {
        lines.push("Slots:".to_string());
        lines.extend(report.slot_messages().into_iter().map(|m| format!("  - {m}")));
    }
    lines.join("\n")
}

/// Validation report as JSON.
pub fn report_json(report: &ScheduleReport) -> Value {
    json!({
        "canSubmit": report.can_submit(),
        "event": report.event_messages(),
        "slots": report.slot_messages(),
    })
}

/// Gate banner for a verification state.
///
/// Answered attempts get an "Entry Allowed" or "Entry Blocked" heading with
/// the service message and any returned details beneath it.
pub fn format_gate_state(state: &GateState) -> String {
    let tag = severity_tag(state.severity());
    let (heading, outcome) = match state {
        GateState::Idle => return format!("[{tag}] IDLE"),
        GateState::Verifying { token_id } => return format!("[{tag}] Verifying {token_id}..."),
        GateState::Failed { message } => return format!("[{tag}] {message}"),
        GateState::Allowed { outcome } => ("Entry Allowed", outcome),
        GateState::Blocked { outcome, .. } => ("Entry Blocked", outcome),
    };

    let mut lines = vec![format!("[{tag}] {heading}")];
    if let Some(message) = state.message().filter(|m| !m.trim().is_empty()) {
        lines.push(format!("  {message}"));
    }
    if let Some(data) = &outcome.data {
        if !data.token_id.is_empty() {
            lines.push(format!("  Token:     {}", data.token_id));
        }
        if let Some(event) = data.event.as_ref().filter(|e| !e.title.is_empty()) {
            lines.push(format!("  Event:     {}", event.title));
        }
    }
    if let Some(entry) = outcome.entry_instant() {
        lines.push(format!("  Entry at:  {}", format_instant(entry)));
    }
    if let Some(student) = outcome.student() {
        lines.push(format!("  Name:      {}", student.name));
        lines.push(format!("  Register:  {}", student.register_number));
        lines.push(format!("  Degree:    {}", student.degree));
        if !student.semester.is_empty() {
            lines.push(format!("  Semester:  {}", student.semester));
        }
    }
    lines.join("\n")
}

/// Student-facing token summary.
pub fn format_token(token: &ScanToken) -> String {
    let badge = token.badge();
    let mut lines = vec![
        format!("Token:     {}", token.token_id),
        format!("Status:    {} [{}]", badge.label, severity_tag(badge.severity)),
    ];
    if let Some(slot) = &token.slot {
        lines.push(format!("Slot:      {}", format_window(&slot.window())));
    }
    if token.generated_at.is_some() {
        lines.push(format!(
            "Generated: {}",
            format_raw_time(token.generated_at.as_deref())
        ));
    }
    lines.join("\n")
}

/// Title line plus window for an event.
pub fn format_event(event: &ActiveEvent) -> String {
    format!("{}\n{}", event.title, format_window(&event.window()))
}

/// Prints the entries table header.
#[allow(clippy::print_literal)]
pub fn print_entries_header() {
    println!(
        "{:<20} {:<24} {:<14} {:<8} {}",
        "TOKEN", "NAME", "REGISTER", "DEGREE", "ENTRY_TIME"
    );
    println!("{}", "-".repeat(90));
}

/// One entries table row.
pub fn format_entry_row(entry: &EntryRecord) -> String {
    format!(
        "{:<20} {:<24} {:<14} {:<8} {}",
        truncate(&entry.token_id, 20),
        truncate(&entry.student.name, 24),
        truncate(&entry.student.register_number, 14),
        truncate(&entry.student.degree, 8),
        format_raw_time(entry.entry_time.as_deref())
    )
}

/// Prints a full live entries snapshot.
pub fn print_entries(feed: &LiveEntries) {
    println!("{} ({} entries)", feed.event.title, feed.total_entries);
    print_entries_header();
    for entry in &feed.entries {
        println!("{}", format_entry_row(entry));
    }
}

/// Stats block for the active event.
pub fn format_stats(stats: &EventStats) -> String {
    let counts = &stats.stats;
    [
        format_event(&stats.event),
        format!("Total:     {}", counts.total_tokens),
        format!("Used:      {}", counts.used_tokens),
        format!("Unused:    {}", counts.unused_tokens),
        format!("Expired:   {}", counts.expired_tokens),
    ]
    .join("\n")
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use messgate_core::{
        validate_schedule, EventDraft, EventRef, SlotDraft, StudentInfo, VerificationData,
        VerificationOutcome,
    };

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Ananya Krishnamurthy Iyer", 10), "Ananya ...");
        assert_eq!(truncate("ééééééééééééé", 6), "ééé...");
    }

    #[test]
    fn report_lists_sections() {
        let report = validate_schedule(&EventDraft::default(), &[SlotDraft::default()]);
        let text = format_report(&report);
        assert!(text.starts_with("Event:\n  - Event title is required."));
        assert!(text.contains("Slots:\n  - Slot 1: degree is required."));
        assert_eq!(report_json(&report)["canSubmit"], false);
    }

    #[test]
    fn entry_row_formats_time() {
        let entry = EntryRecord {
            token_id: "TKN-1".to_string(),
            entry_time: Some("2025-03-01T09:12:00".to_string()),
            student: StudentInfo {
                name: "Asha R".to_string(),
                register_number: "21BCE1042".to_string(),
                degree: "BTECH".to_string(),
                semester: "6".to_string(),
            },
        };
        let row = format_entry_row(&entry);
        assert!(row.starts_with("TKN-1"));
        assert!(row.ends_with("01 Mar 2025, 09:12"));
    }

    #[test]
    fn idle_banner() {
        assert_eq!(format_gate_state(&GateState::Idle), "[--] IDLE");
        let failed = GateState::Failed {
            message: "Verification failed".to_string(),
        };
        assert_eq!(format_gate_state(&failed), "[ERROR] Verification failed");
    }

    #[test]
    fn answered_banners_have_headings() {
        let blocked = GateState::Blocked {
            message: String::new(),
            outcome: VerificationOutcome::default(),
        };
        assert_eq!(format_gate_state(&blocked), "[WARN] Entry Blocked");

        let allowed = GateState::Allowed {
            outcome: VerificationOutcome {
                success: true,
                message: "Entry allowed".to_string(),
                data: Some(VerificationData {
                    token_id: "TKN-1".to_string(),
                    entry_time: Some("2025-03-01T09:12:00".to_string()),
                    event: Some(EventRef {
                        title: "Lunch".to_string(),
                    }),
                    student: None,
                }),
            },
        };
        let text = format_gate_state(&allowed);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "[OK] Entry Allowed");
        assert_eq!(lines[1], "  Entry allowed");
        assert_eq!(lines[2], "  Token:     TKN-1");
        assert_eq!(lines[3], "  Event:     Lunch");
        assert_eq!(lines[4], "  Entry at:  01 Mar 2025, 09:12");
    }
}
