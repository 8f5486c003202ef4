//! Scanner for the worklog-comment mini-language.
//!
//! A comment like `"Fix bug | review 30m | deploy"` describes one primary
//! segment plus timed follow-up segments. Segments are separated by `|` and
//! trimmed. A duration token is a standalone whitespace-delimited word of
//! the exact form `<integer>m`; the first such word in a segment wins, and
//! a segment without one defaults to [`DEFAULT_SEGMENT_MINUTES`].

/// Minutes assumed for a split segment that carries no duration token.
pub const DEFAULT_SEGMENT_MINUTES: u32 = 15;

/// One `|`-separated piece of a worklog comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// The trimmed segment text, duration token included.
    pub raw: String,
    /// The segment text with the duration token removed and the whitespace
    /// around the removal point collapsed.
    pub text: String,
    /// Minutes from the first duration token, if one was present.
    pub minutes: Option<u32>,
}

impl Segment {
    /// The minutes this segment accounts for, defaulted when untagged.
    pub fn minutes_or_default(&self) -> u32 {
        self.minutes.unwrap_or(DEFAULT_SEGMENT_MINUTES)
    }
}

/// Split a comment into trimmed segments. A comment without `|` yields a
/// single segment; empty pieces are kept so segment positions stay
/// meaningful.
pub fn parse_segments(comment: &str) -> Vec<Segment> {
    comment.split('|').map(parse_segment).collect()
}

fn parse_segment(piece: &str) -> Segment {
    let raw = piece.trim().to_string();
    match find_duration_word(&raw) {
        Some((start, end, minutes)) => {
            let before = raw[..start].trim_end();
            let after = raw[end..].trim_start();
            let text = if before.is_empty() || after.is_empty() {
                format!("{}{}", before, after)
            } else {
                format!("{} {}", before, after)
            };
            Segment {
                raw: raw.clone(),
                text,
                minutes: Some(minutes),
            }
        }
        None => Segment {
            text: raw.clone(),
            raw,
            minutes: None,
        },
    }
}

/// Find the first standalone `<integer>m` word in a segment. Returns its
/// byte range and the parsed minutes.
fn find_duration_word(segment: &str) -> Option<(usize, usize, u32)> {
    let mut search_from = 0;
    for word in segment.split_whitespace() {
        // Words only ever move forward, and the gap between them is pure
        // whitespace, so the next match is the word's true position.
        let Some(found) = segment[search_from..].find(word) else {
            break;
        };
        let start = search_from + found;
        let end = start + word.len();
        search_from = end;

        if let Some(minutes) = parse_duration_word(word) {
            return Some((start, end, minutes));
        }
    }
    None
}

/// Parse a word of the exact form `<integer>m`. Words like `30min` or `m30`
/// are plain text, as is an integer too large for `u32`.
fn parse_duration_word(word: &str) -> Option<u32> {
    let digits = word.strip_suffix('m')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(piece: &str) -> Segment {
        parse_segment(piece)
    }

    #[test]
    fn test_single_segment_comment() {
        let segments = parse_segments("Fix bug");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].raw, "Fix bug");
        assert_eq!(segments[0].minutes, None);
    }

    #[test]
    fn test_segments_are_trimmed() {
        let segments = parse_segments("Fix bug | review 30m |  deploy ");
        let raws: Vec<&str> = segments.iter().map(|s| s.raw.as_str()).collect();
        assert_eq!(raws, vec!["Fix bug", "review 30m", "deploy"]);
    }

    #[test]
    fn test_empty_pieces_are_kept() {
        let segments = parse_segments("a ||b");
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[1].raw, "");
        assert_eq!(segments[1].minutes, None);
    }

    #[test]
    fn test_duration_token_parsed_and_stripped() {
        let s = segment("review 30m");
        assert_eq!(s.minutes, Some(30));
        assert_eq!(s.text, "review");
    }

    #[test]
    fn test_token_in_the_middle_collapses_whitespace() {
        let s = segment("review 30m of the patch");
        assert_eq!(s.minutes, Some(30));
        assert_eq!(s.text, "review of the patch");
    }

    #[test]
    fn test_leading_token() {
        let s = segment("45m standup");
        assert_eq!(s.minutes, Some(45));
        assert_eq!(s.text, "standup");
    }

    #[test]
    fn test_first_token_wins() {
        let s = segment("pair 20m then 40m solo");
        assert_eq!(s.minutes, Some(20));
        assert_eq!(s.text, "pair then 40m solo");
    }

    #[test]
    fn test_missing_token_defaults() {
        let s = segment("deploy");
        assert_eq!(s.minutes, None);
        assert_eq!(s.minutes_or_default(), DEFAULT_SEGMENT_MINUTES);
    }

    #[test]
    fn test_attached_suffix_is_not_a_token() {
        // "30min" is a word, not a duration token
        let s = segment("waited 30min for CI");
        assert_eq!(s.minutes, None);
        assert_eq!(s.text, "waited 30min for CI");
    }

    #[test]
    fn test_bare_m_is_not_a_token() {
        let s = segment("m and more");
        assert_eq!(s.minutes, None);
    }

    #[test]
    fn test_uppercase_is_not_a_token() {
        let s = segment("review 30M");
        assert_eq!(s.minutes, None);
    }

    #[test]
    fn test_overflowing_integer_is_plain_text() {
        let s = segment("review 99999999999999999999m");
        assert_eq!(s.minutes, None);
        assert_eq!(s.text, "review 99999999999999999999m");
    }

    #[test]
    fn test_empty_comment_is_one_empty_segment() {
        let segments = parse_segments("");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].raw, "");
    }
}
