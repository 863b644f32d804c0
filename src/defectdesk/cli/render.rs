use chrono::{DateTime, Utc};
use colored::Colorize;
use defectdesk::api::{CmdMessage, MessageLevel};
use defectdesk::evidence::EvidenceStanza;
use defectdesk::model::ReceptionRecord;
use defectdesk::roots::probe::ProbeReport;
use std::path::PathBuf;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const CODE_WIDTH: usize = 16;
const TIME_WIDTH: usize = 16;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub(super) fn print_paths(paths: &[PathBuf]) {
    for path in paths {
        println!("{}", path.display());
    }
}

pub(super) fn print_receptions(receptions: &[ReceptionRecord]) {
    if receptions.is_empty() {
        println!("No receptions found.");
        return;
    }

    for (i, record) in receptions.iter().enumerate() {
        let idx = format!("{:>3}. ", i + 1);
        let code = truncate_to_width(&record.manufacturer_code, CODE_WIDTH);
        let padding = CODE_WIDTH.saturating_sub(code.width());
        println!(
            "{}{}{}  {}  {}",
            idx,
            code.bold(),
            " ".repeat(padding),
            record.date,
            format_time_ago(record.created_at).dimmed()
        );
    }
}

pub(super) fn print_stanzas(stanzas: &[EvidenceStanza]) {
    for (i, stanza) in stanzas.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("[{}]", stanza.language.to_string().yellow());
        println!("  {}", stanza.article_code.bold());
        println!("  {}", stanza.reason);
        if !stanza.template.is_empty() {
            println!("  {}", stanza.template);
        }
        if !stanza.description.is_empty() {
            println!("  {}", stanza.description.dimmed());
        }
    }
}

pub(super) fn print_probe(report: &ProbeReport) {
    let chosen = report.chosen().map(|info| info.path.clone());
    for (info, test) in report.candidates.iter().zip(&report.write_tests) {
        let marker = if chosen.as_ref() == Some(&info.path) {
            "*".green().to_string()
        } else {
            " ".to_string()
        };
        let status = if test.success {
            "ok".green()
        } else {
            "fail".red()
        };
        let recommended = if info.recommended { "recommended" } else { "" };
        println!(
            "{} {:<14} {:<4} {:<11} {}",
            marker,
            info.kind.to_string(),
            status,
            recommended,
            info.path.display()
        );
        if let Some(detail) = &test.error_detail {
            println!("    {}", detail.dimmed());
        }
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
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

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let time_str = Formatter::new().convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
