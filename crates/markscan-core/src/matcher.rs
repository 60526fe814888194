//! Pure line matcher for marker keywords.
//!
//! No I/O and no state: given a line and an ordered keyword list, find
//! the first matching keyword and extract the trailing text.

/// A keyword match within a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMatch {
    /// The keyword that matched
    pub kind: String,
    /// Text after the keyword, leading `: - ` run stripped
    pub text: String,
}

/// Match a line against an ordered list of keywords.
///
/// Keywords are literal substrings, tried in caller order; the first
/// keyword that occurs anywhere in the line wins, at its leftmost
/// occurrence. There is no word-boundary check, so `TODONOTHING`
/// matches `TODO` with text `NOTHING`; this is intentional.
pub fn match_line(line: &str, keywords: &[String]) -> Option<LineMatch> {
    for keyword in keywords {
        if keyword.is_empty() {
            continue;
        }
        if let Some(at) = line.find(keyword.as_str()) {
            let rest = &line[at + keyword.len()..];
            let text = rest.trim_start_matches([':', '-', ' ']);
            return Some(LineMatch {
                kind: keyword.clone(),
                text: text.to_string(),
            });
        }
    }
    None
}
