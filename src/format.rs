use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::system::process::CpuUsage;

pub fn truncate_unicode(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width.saturating_sub(1) {
            result.push('\u{2026}');
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result
}

/// Pads (or truncates) to exactly `width` display columns.
pub fn pad_unicode(s: &str, width: usize) -> String {
    let text = truncate_unicode(s, width);
    let pad = width.saturating_sub(text.width());
    format!("{text}{}", " ".repeat(pad))
}

pub fn format_mb(mb: u64) -> String {
    format!("{mb} MB")
}

pub fn format_memory(mb: Option<u64>) -> String {
    mb.map_or_else(|| "-".to_string(), format_mb)
}

/// Estimates carry a `~` so they are never read as measurements.
pub fn format_cpu(cpu: CpuUsage) -> String {
    match cpu {
        CpuUsage::Estimate(v) => format!("~{v:.1}%"),
        CpuUsage::Unavailable => "n/a".to_string(),
    }
}
