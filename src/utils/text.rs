use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

/// Clip a display label to `max_width` terminal columns, appending an
/// ellipsis when anything was cut.
pub fn truncate_label(label: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(label) <= max_width {
        return label.to_string();
    }

    let target = max_width.saturating_sub(1);
    let mut width = 0;
    let mut out = String::new();

    for ch in label.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + ch_width > target {
            break;
        }
        width += ch_width;
        out.push(ch);
    }

    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_labels_pass_through() {
        assert_eq!(truncate_label("Bitcoin (BTCUSDT)", 40), "Bitcoin (BTCUSDT)");
    }

    #[test]
    fn long_labels_are_clipped_with_ellipsis() {
        let clipped = truncate_label("Basic Attention Token (BATUSDT)", 12);
        assert!(clipped.ends_with('…'));
        assert!(UnicodeWidthStr::width(clipped.as_str()) <= 12);
    }
}
