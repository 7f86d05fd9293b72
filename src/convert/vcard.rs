//! vCard 3.0 rendering.
//!
//! Each contact becomes a standalone card document. Text values are escaped
//! per RFC 2426 (backslash, semicolon, comma, newline) and content lines
//! longer than 75 octets are folded onto continuation lines that start with
//! a single space.

use crate::domain::ContactRecord;

const MAX_LINE_OCTETS: usize = 75;
const LINE_BREAK: &str = "\n";
const FOLD: &str = "\n ";

/// Render a single contact as a complete card document.
pub fn render_card(record: &ContactRecord) -> String {
    let lines = [
        "BEGIN:VCARD".to_string(),
        "VERSION:3.0".to_string(),
        fold_line(&format!("FN:{}", escape_text(record.name()))),
        fold_line(&format!(
            "TEL;TYPE=CELL:{}",
            escape_text(record.phone().as_str())
        )),
        "END:VCARD".to_string(),
    ];
    lines.join(LINE_BREAK)
}

/// Render several contacts as concatenated card documents.
pub fn render_cards<'a>(records: impl IntoIterator<Item = &'a ContactRecord>) -> String {
    records
        .into_iter()
        .map(render_card)
        .collect::<Vec<_>>()
        .join(LINE_BREAK)
}

fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            ',' => escaped.push_str("\\,"),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                escaped.push_str("\\n");
            }
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn fold_line(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return line.to_string();
    }

    let mut folded = String::with_capacity(line.len() + 2 * (line.len() / MAX_LINE_OCTETS));
    let mut width = 0;
    for ch in line.chars() {
        let octets = ch.len_utf8();
        if width + octets > MAX_LINE_OCTETS {
            folded.push_str(FOLD);
            // the leading space counts toward the continuation line
            width = 1;
        }
        folded.push(ch);
        width += octets;
    }
    folded
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, phone: &str) -> ContactRecord {
        ContactRecord::new(name, phone, "X").unwrap()
    }

    #[test]
    fn test_render_card_layout() {
        let card = render_card(&record("Ann", "9121112222"));
        assert_eq!(
            card,
            "BEGIN:VCARD\nVERSION:3.0\nFN:Ann\nTEL;TYPE=CELL:09121112222\nEND:VCARD"
        );
    }

    #[test]
    fn test_render_card_single_begin_end_pair() {
        let card = render_card(&record("Ann", "912"));
        assert_eq!(card.matches("BEGIN:VCARD").count(), 1);
        assert_eq!(card.matches("END:VCARD").count(), 1);
    }

    #[test]
    fn test_render_card_unconditional_prefix() {
        let card = render_card(&record("Intl", "+989129876543"));
        assert!(card.contains("TEL;TYPE=CELL:0+989129876543"));
    }

    #[test]
    fn test_render_cards_joined_by_single_newline() {
        let records = vec![record("Ann", "1"), record("Bob", "2")];
        let body = render_cards(&records);
        assert!(body.contains("END:VCARD\nBEGIN:VCARD"));
        assert_eq!(body.matches("BEGIN:VCARD").count(), 2);
        assert!(!body.ends_with('\n'));
    }

    #[test]
    fn test_escape_special_characters() {
        assert_eq!(escape_text("a;b,c\\d"), "a\\;b\\,c\\\\d");
        assert_eq!(escape_text("line1\nline2\r\nline3"), "line1\\nline2\\nline3");
        assert_eq!(escape_text("Dr: Ann"), "Dr: Ann");
    }

    #[test]
    fn test_multiline_name_stays_on_one_content_line() {
        let card = render_card(&record("Ann\nSmith", "1"));
        assert!(card.contains("FN:Ann\\nSmith\n"));
    }

    #[test]
    fn test_fold_long_line() {
        let name = "x".repeat(100);
        let line = format!("FN:{}", name);
        let folded = fold_line(&line);
        let parts: Vec<&str> = folded.split('\n').collect();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].len(), 75);
        assert!(parts[1].starts_with(' '));
        assert_eq!(folded.replace("\n ", ""), line);
    }

    #[test]
    fn test_fold_respects_utf8_boundaries() {
        // Two-byte characters must never be split across lines.
        let line = format!("FN:{}", "ж".repeat(60));
        let folded = fold_line(&line);
        for part in folded.split('\n') {
            assert!(part.len() <= MAX_LINE_OCTETS);
        }
        assert_eq!(folded.replace("\n ", ""), line);
    }

    #[test]
    fn test_short_line_not_folded() {
        assert_eq!(fold_line("FN:Ann"), "FN:Ann");
    }
}
