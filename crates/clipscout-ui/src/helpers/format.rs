// crates/clipscout-ui/src/helpers/format.rs
//
// UI-layer string utilities that don't belong in clipscout-core.
//
// Time and duration formatting lives in clipscout_core::helpers::time — use
// those for anything involving seconds/frames.  This module holds utilities
// that are purely about rendering strings in the UI.

/// Truncates `text` to fit within `max_px` using a per-character width
/// heuristic (11px proportional ≈ 6.5 px/char average). Appends "…" when
/// truncated. Avoids egui font measurement, which requires `&mut Fonts`.
///
/// Used by the preview header and the clip card so long filenames never
/// overflow their row.
pub fn fit_label(text: &str, max_px: f32) -> String {
    const AVG_CHAR_PX: f32 = 6.5;
    const ELLIPSIS: &str = "…";
    let max_chars = (max_px / AVG_CHAR_PX).max(0.0) as usize;
    let char_count = text.chars().count();
    if char_count <= max_chars {
        return text.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }
    // Reserve one slot for the ellipsis character itself.
    let keep = max_chars.saturating_sub(1);
    text.chars().take(keep).collect::<String>() + ELLIPSIS
}

/// Format a byte count as a compact human-readable size.
///
/// | Range      | Example   |
/// |------------|-----------|
/// | < 1 KB     | `512 B`   |
/// | < 1 MB     | `87.4 KB` |
/// | < 1 GB     | `12.6 MB` |
/// | ≥ 1 GB     | `1.2 GB`  |
pub fn format_bytes(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;
    let b = bytes as f64;
    if b >= GB {
        format!("{:.1} GB", b / GB)
    } else if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{bytes} B")
    }
}

#[cfg(test)]
mod fit_label_tests {
    use super::*;

    #[test]
    fn short_text_unchanged() {
        assert_eq!(fit_label("hello", 200.0), "hello");
    }

    #[test]
    fn zero_budget_returns_empty() {
        assert_eq!(fit_label("hello", 0.0), "");
    }

    #[test]
    fn truncated_text_has_ellipsis() {
        let result = fit_label("broadcast_game4_overtime.mp4", 30.0);
        assert!(result.ends_with('…'));
        assert!(result.len() < "broadcast_game4_overtime.mp4".len());
    }
}

#[cfg(test)]
mod format_bytes_tests {
    use super::*;

    #[test]
    fn sub_kilobyte_is_exact() {
        assert_eq!(format_bytes(0),   "0 B");
        assert_eq!(format_bytes(512), "512 B");
    }

    #[test]
    fn scales_through_units() {
        assert_eq!(format_bytes(1024),            "1.0 KB");
        assert_eq!(format_bytes(89_497),          "87.4 KB");
        assert_eq!(format_bytes(13_212_058),      "12.6 MB");
        assert_eq!(format_bytes(1_288_490_189),   "1.2 GB");
    }
}
