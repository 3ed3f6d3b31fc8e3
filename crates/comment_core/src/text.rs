pub const MAX_TITLE_CHARS: usize = 50;

// Strips codepoint ranges the dashboard font cannot render: emoji blocks,
// bare Hangul jamo, arrows, math operators, geometric shapes, and control
// characters other than tab/CR/LF. Composed Hangul syllables are kept.
pub fn sanitize_display_text(text: &str) -> String {
    let cleaned: String = text.chars().filter(|ch| !is_unsupported(*ch)).collect();
    cleaned.trim().to_string()
}

fn is_unsupported(ch: char) -> bool {
    if ch.is_control() && !matches!(ch, '\t' | '\n' | '\r') {
        return true;
    }
    matches!(
        ch as u32,
        0x1F300..=0x1F9FF
            | 0x1FA00..=0x1FAFF
            | 0x2600..=0x26FF
            | 0x2700..=0x27BF
            | 0x1100..=0x11FF
            | 0x3130..=0x318F
            | 0x2190..=0x21FF
            | 0x2200..=0x22FF
            | 0x25A0..=0x25FF
    )
}

pub fn truncate_display_text(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }
    let truncated: String = trimmed.chars().take(max_chars).collect();
    format!("{truncated}...")
}
