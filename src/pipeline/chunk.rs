//! Byte-bounded, line-aligned chunking of page text.
//!
//! Completion APIs cap request sizes, so a page's text is split into chunks
//! before submission. Splitting mid-line would hand the model half a
//! sentence or half a table row, so chunk boundaries fall only on newline
//! positions: a chunk is a run of whole lines whose joined UTF-8 size stays
//! under the budget. Joining the chunks back with `"\n"` reproduces the page
//! text line-for-line, which is what lets the coverage gate compare the
//! assembled output against the full original.

/// Split `text` into chunks of at most `budget` UTF-8 bytes, cutting only at
/// line boundaries.
///
/// A single line whose own encoded length reaches the budget becomes its own
/// oversized chunk — it is never split further. Empty input yields no chunks.
pub fn split_chunks(text: &str, budget: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        // +1 for the joining newline that would precede `line`.
        if !current.is_empty() && current.len() + 1 + line.len() >= budget {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(line);
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejoin(chunks: &[String]) -> String {
        chunks.join("\n")
    }

    #[test]
    fn empty_input_yields_no_chunks() {
        assert!(split_chunks("", 4096).is_empty());
    }

    #[test]
    fn small_text_is_one_chunk() {
        let chunks = split_chunks("Hello\nWorld", 4096);
        assert_eq!(chunks, vec!["Hello\nWorld"]);
    }

    #[test]
    fn round_trip_reproduces_text() {
        let text = "alpha\nbeta\ngamma\ndelta\nepsilon";
        for budget in [8, 12, 17, 64, 4096] {
            let chunks = split_chunks(text, budget);
            assert_eq!(rejoin(&chunks), text, "budget={budget}");
        }
    }

    #[test]
    fn round_trip_preserves_blank_lines() {
        let text = "first\n\nsecond\n\n\nthird";
        let chunks = split_chunks(text, 10);
        assert_eq!(rejoin(&chunks), text);
    }

    #[test]
    fn chunks_respect_byte_budget() {
        let text = "aaaa\nbbbb\ncccc\ndddd\neeee";
        let budget = 12;
        for chunk in split_chunks(text, budget) {
            assert!(
                chunk.len() < budget,
                "chunk {:?} is {} bytes, budget {}",
                chunk,
                chunk.len(),
                budget
            );
        }
    }

    #[test]
    fn oversized_line_becomes_its_own_chunk() {
        let long = "x".repeat(100);
        let text = format!("short\n{long}\ntail");
        let chunks = split_chunks(&text, 20);
        assert!(chunks.contains(&long), "chunks: {chunks:?}");
        assert_eq!(rejoin(&chunks), text);
    }

    #[test]
    fn budget_counts_utf8_bytes_not_chars() {
        // Each line is 4 chars but 8 bytes; a 20-byte budget fits two lines
        // plus the joining newline (17 bytes), not three (26 bytes).
        let text = "éééé\néééé\néééé";
        let chunks = split_chunks(text, 20);
        assert_eq!(chunks.len(), 2);
        assert_eq!(rejoin(&chunks), text);
    }

    #[test]
    fn trailing_newline_is_the_only_loss() {
        let chunks = split_chunks("one\ntwo\n", 4096);
        assert_eq!(rejoin(&chunks), "one\ntwo");
    }
}
