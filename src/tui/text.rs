//! Paragraph wrapping for page header text.

const INDENT: &str = "  ";

/// Word-wrap each paragraph to `width` columns. Continuation lines are
/// indented by two columns; an empty paragraph becomes exactly one empty
/// output line (a blank-line separator). Whitespace between words is kept
/// as-is while the words stay on one line (labels rely on column
/// alignment) and dropped at line breaks. Pure and deterministic.
///
/// `width < 1` is a caller contract violation.
pub fn wrap(paragraphs: &[String], width: usize) -> Vec<String> {
    debug_assert!(width >= 1, "wrap width must be at least 1");
    let mut lines = Vec::new();
    for paragraph in paragraphs {
        if paragraph.is_empty() {
            lines.push(String::new());
        } else {
            wrap_paragraph(paragraph, width, &mut lines);
        }
    }
    lines
}

fn wrap_paragraph(paragraph: &str, width: usize, lines: &mut Vec<String>) {
    let mut current = String::new();
    let mut first = true;
    let mut gap = "";
    let mut rest = paragraph.trim();

    let mut flush = |current: &mut String, first: &mut bool| {
        let mut line = String::new();
        if !*first {
            line.push_str(INDENT);
        }
        line.push_str(current);
        lines.push(line);
        current.clear();
        *first = false;
    };

    while !rest.is_empty() {
        let word_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let (mut word, tail) = rest.split_at(word_end);
        let gap_end = tail
            .find(|c: char| !c.is_whitespace())
            .unwrap_or(tail.len());
        let (next_gap, tail) = tail.split_at(gap_end);
        rest = tail;

        loop {
            let capacity = if first {
                width
            } else {
                width.saturating_sub(INDENT.len())
            }
            .max(1);
            let used = current.chars().count();
            let lead = if used == 0 { 0 } else { gap.chars().count() };
            let word_chars = word.chars().count();

            if used + lead + word_chars <= capacity {
                if used > 0 {
                    current.push_str(gap);
                }
                current.push_str(word);
                break;
            }

            if used == 0 {
                // The word alone exceeds a full line: hard-break it.
                let split = word
                    .char_indices()
                    .nth(capacity)
                    .map(|(i, _)| i)
                    .unwrap_or(word.len());
                current.push_str(&word[..split]);
                flush(&mut current, &mut first);
                word = &word[split..];
                if word.is_empty() {
                    break;
                }
                continue;
            }

            // Line is full; start a continuation line and retry the word.
            flush(&mut current, &mut first);
        }
        gap = next_gap;
    }

    if !current.is_empty() {
        flush(&mut current, &mut first);
    }
}
