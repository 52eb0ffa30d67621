//! Text metrics for the standard Helvetica font
//!
//! Documents use the non-embedded base-14 Helvetica with WinAnsiEncoding, so
//! both layout (word wrap, centring) and the page writer work from the
//! Adobe AFM advance widths below, indexed by WinAnsi code.

/// Points per millimetre
pub const PT_PER_MM: f32 = 72.0 / 25.4;

/// Line spacing factor applied to the font size for multi-line text
pub const LINE_HEIGHT_FACTOR: f32 = 1.15;

/// Advance widths (1/1000 em) for WinAnsi codes 0x20..=0xFF
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 224] = [
    // 0x20
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0x30
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    // 0x40
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    // 0x50
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    // 0x60
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    // 0x70
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, 556,
    // 0x80
    556, 556, 222, 556, 333, 1000, 556, 556, 333, 1000, 667, 333, 1000, 556, 611, 556,
    // 0x90
    556, 222, 222, 333, 333, 350, 556, 1000, 333, 1000, 500, 333, 944, 556, 500, 667,
    // 0xA0
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    // 0xB0
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    // 0xC0
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    // 0xD0
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    // 0xE0
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
    // 0xF0
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
];

/// Map a character to its WinAnsi (CP1252) code
pub fn winansi_code(ch: char) -> Option<u8> {
    let code = ch as u32;
    match code {
        0x20..=0x7E | 0xA0..=0xFF => Some(code as u8),
        _ => match ch {
            '€' => Some(0x80),
            '‚' => Some(0x82),
            'ƒ' => Some(0x83),
            '„' => Some(0x84),
            '…' => Some(0x85),
            '†' => Some(0x86),
            '‡' => Some(0x87),
            'ˆ' => Some(0x88),
            '‰' => Some(0x89),
            'Š' => Some(0x8A),
            '‹' => Some(0x8B),
            'Œ' => Some(0x8C),
            'Ž' => Some(0x8E),
            '‘' => Some(0x91),
            '’' => Some(0x92),
            '“' => Some(0x93),
            '”' => Some(0x94),
            '•' => Some(0x95),
            '–' => Some(0x96),
            '—' => Some(0x97),
            '˜' => Some(0x98),
            '™' => Some(0x99),
            'š' => Some(0x9A),
            '›' => Some(0x9B),
            'œ' => Some(0x9C),
            'ž' => Some(0x9E),
            'Ÿ' => Some(0x9F),
            _ => None,
        },
    }
}

/// Encode text for a WinAnsi font; tabs become spaces, anything else
/// outside the code page becomes `?`
pub fn encode_winansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch {
            '\t' => b' ',
            _ => winansi_code(ch).unwrap_or(b'?'),
        })
        .collect()
}

fn code_width(code: u8) -> u16 {
    match code {
        0x20..=0xFF => HELVETICA_WIDTHS[(code - 0x20) as usize],
        _ => 0,
    }
}

/// Rendered width of `text` in millimetres at `size` points
pub fn text_width(text: &str, size: f32) -> f32 {
    let units: u32 = encode_winansi(text)
        .into_iter()
        .map(|code| code_width(code) as u32)
        .sum();
    units as f32 / 1000.0 * size / PT_PER_MM
}

/// Baseline-to-baseline distance in millimetres
pub fn line_height(size: f32) -> f32 {
    size * LINE_HEIGHT_FACTOR / PT_PER_MM
}

/// Greedy word wrap to `max_width` millimetres
///
/// Explicit newlines start a new line. A single word wider than the column
/// is broken between characters.
pub fn split_to_width(text: &str, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let space = text_width(" ", size);

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_width = 0.0;

        for word in paragraph.split(' ').filter(|word| !word.is_empty()) {
            let word_width = text_width(word, size);

            if word_width > max_width {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let mut pieces = break_word(word, size, max_width);
                // Last piece stays open so following words can join it
                current = pieces.pop().unwrap_or_default();
                current_width = text_width(&current, size);
                lines.extend(pieces);
                continue;
            }

            if current.is_empty() {
                current.push_str(word);
                current_width = word_width;
            } else if current_width + space + word_width <= max_width {
                current.push(' ');
                current.push_str(word);
                current_width += space + word_width;
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
                current_width = word_width;
            }
        }

        lines.push(current);
    }

    lines
}

fn break_word(word: &str, size: f32, max_width: f32) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    for ch in word.chars() {
        let mut candidate = piece.clone();
        candidate.push(ch);
        if !piece.is_empty() && text_width(&candidate, size) > max_width {
            pieces.push(std::mem::replace(&mut piece, ch.to_string()));
        } else {
            piece = candidate;
        }
    }
    pieces.push(piece);
    pieces
}

/// Keep at most `max_chars` characters, marking the cut with `...`
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let mut cut: String = text.chars().take(max_chars).collect();
        cut.push_str("...");
        cut
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_winansi_mapping() {
        assert_eq!(encode_winansi("Ação"), vec![b'A', 0xE7, 0xE3, b'o']);
        assert_eq!(encode_winansi("• –"), vec![0x95, b' ', 0x96]);
        assert_eq!(encode_winansi("✓"), vec![b'?']);
        assert_eq!(winansi_code('º'), Some(0xBA));
    }

    #[test]
    fn test_text_width() {
        // "H" is 722 units: 722/1000 * 10pt in mm
        let expected = 7.22 / PT_PER_MM;
        assert!((text_width("H", 10.0) - expected).abs() < 1e-4);
        assert_eq!(text_width("", 12.0), 0.0);
        // Accented letters use their own metrics
        assert_eq!(text_width("é", 10.0), text_width("e", 10.0));
    }

    #[test]
    fn test_split_to_width_respects_column() {
        let text = "DECLARO ter recebido pela Lei Federal o(s) Equipamento(s) de Proteção Individual";
        let lines = split_to_width(text, 7.0, 40.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, 7.0) <= 40.0 + 1e-3, "line too wide: {line}");
        }
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_split_to_width_keeps_paragraphs_and_breaks_long_words() {
        let lines = split_to_width("a\nb", 10.0, 100.0);
        assert_eq!(lines, vec!["a", "b"]);

        let long = "W".repeat(40);
        let lines = split_to_width(&long, 10.0, 20.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), long);
    }

    #[test]
    fn test_truncate_with_ellipsis() {
        assert_eq!(truncate_with_ellipsis("Luva", 15), "Luva");
        assert_eq!(
            truncate_with_ellipsis("Protetor Auricular Tipo Plug", 15),
            "Protetor Auricu..."
        );
        // Counted in characters, not bytes
        assert_eq!(truncate_with_ellipsis("Óculos de Proteção", 15), "Óculos de Prote...");
        assert_eq!(line_height(10.0), 10.0 * 1.15 / PT_PER_MM);
    }
}
