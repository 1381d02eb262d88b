//! DOP text → [`ScheduleSet`].
//!
//! The plan is a loosely structured text document. Data rows sit between a
//! `TIME(UTC)` header line and an `ABBREVIATIONS:` legend; each row is
//! tab-separated:
//!
//! ```text
//! HHMMSS-HHMMSS <TAB> <id><type> <TAB> <category> <TAB> <mode>
//! ```
//!
//! `type` is the last three characters of the second column (right-padded
//! with spaces for two-letter codes). `mode == "O"` marks an insertion.

use tracing::debug;

use crate::error::ParseError;
use crate::schedule::{ScheduleEntry, ScheduleSet};

const HEADER_MARKER: &str = "TIME(UTC)";
const LEGEND_MARKER: &str = "ABBREVIATIONS:";
/// Administrative message rows; never a real transmission.
const ADMIN_MESSAGE_CODE: &str = "EGMSG";
const TYPE_CODE_LEN: usize = 3;

/// Parse DOP lines, collapsing any structural problem into an empty set.
pub fn parse<S: AsRef<str>>(lines: &[S]) -> ScheduleSet {
    match try_parse(lines) {
        Ok(set) => set,
        Err(e) => {
            debug!("[dop] parse collapsed to empty set: {}", e);
            ScheduleSet::default()
        }
    }
}

/// Newline-delimited variant, used for the cached fallback document.
pub fn parse_text(text: &str) -> ScheduleSet {
    let lines: Vec<&str> = text.lines().collect();
    parse(&lines)
}

/// Parse DOP lines, reporting why nothing could be extracted.
pub fn try_parse<S: AsRef<str>>(lines: &[S]) -> Result<ScheduleSet, ParseError> {
    let header = find_marker(lines, HEADER_MARKER)
        .ok_or(ParseError::MissingMarker(HEADER_MARKER))?;
    let legend = find_marker(lines, LEGEND_MARKER)
        .ok_or(ParseError::MissingMarker(LEGEND_MARKER))?;

    // Rows run from just after the header to two lines above the legend; the
    // line directly above the legend is a separator, not data.
    let start = header + 1;
    let end = legend as isize - 2;
    if end < start as isize {
        return Err(ParseError::EmptyRange { start, end });
    }

    let mut entries = Vec::new();
    for (idx, line) in lines
        .iter()
        .enumerate()
        .take(end as usize + 1)
        .skip(start)
    {
        let (code, entry) = parse_row(line.as_ref()).map_err(|reason| ParseError::MalformedRow {
            line: idx,
            reason,
        })?;
        if code == ADMIN_MESSAGE_CODE {
            continue;
        }
        entries.push(entry);
    }

    Ok(ScheduleSet::new(entries))
}

fn find_marker<S: AsRef<str>>(lines: &[S], marker: &str) -> Option<usize> {
    lines
        .iter()
        .position(|l| l.as_ref().trim().starts_with(marker))
}

/// Returns the full trimmed code column alongside the entry so the caller
/// can filter administrative rows.
fn parse_row(line: &str) -> Result<(String, ScheduleEntry), String> {
    let fields: Vec<&str> = line.trim().split('\t').collect();
    if fields.len() < 4 {
        return Err(format!("expected 4 tab-separated fields, got {}", fields.len()));
    }

    let (start, end) = fields[0]
        .split_once('-')
        .ok_or_else(|| format!("time range {:?} has no '-'", fields[0]))?;
    let start = start.trim();
    let end = end.trim();
    if !is_hhmmss(start) || !is_hhmmss(end) {
        return Err(format!("time range {:?} is not HHMMSS-HHMMSS", fields[0]));
    }

    let code = fields[1];
    if code.chars().count() < TYPE_CODE_LEN || !code.is_ascii() {
        return Err(format!("code {:?} is shorter than a type code", code));
    }
    let split = code.len() - TYPE_CODE_LEN;
    let id = code[..split].trim().to_string();
    let kind = code[split..].trim().to_string();

    let entry = ScheduleEntry {
        start: start.to_string(),
        end: end.to_string(),
        kind,
        id,
        category: fields[2].trim().to_string(),
        insertion_flag: fields[3].trim() == "O",
    };
    Ok((code.trim().to_string(), entry))
}

fn is_hhmmss(s: &str) -> bool {
    s.len() == 6 && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a document the way the published plan lays it out: preamble,
    /// header, rows, a blank separator, then the legend.
    fn doc(rows: &[&str]) -> Vec<String> {
        let mut lines = vec![
            "GK-2A DAILY OPERATION PLAN".to_string(),
            "TIME(UTC)\tID\tTYPE\tMODE".to_string(),
        ];
        lines.extend(rows.iter().map(|r| r.to_string()));
        lines.push(String::new());
        lines.push("ABBREVIATIONS:".to_string());
        lines.push("FD : Full Disk".to_string());
        lines
    }

    #[test]
    fn test_single_row() {
        let set = parse(&doc(&["000000-001000\tABCFD \tFull Disk\tO"]));
        assert_eq!(set.len(), 1);
        let e = &set.entries()[0];
        assert_eq!(e.start, "000000");
        assert_eq!(e.end, "001000");
        assert_eq!(e.kind, "FD");
        assert_eq!(e.id, "ABC");
        assert_eq!(e.category, "Full Disk");
        assert!(e.insertion_flag);
    }

    #[test]
    fn test_three_letter_type_and_non_insertion() {
        let set = parse(&doc(&["001000-001500\tGK2AENH\tExtended NH\tN"]));
        let e = &set.entries()[0];
        assert_eq!(e.id, "GK2A");
        assert_eq!(e.kind, "ENH");
        assert!(!e.insertion_flag);
    }

    #[test]
    fn test_admin_message_rows_dropped() {
        let with = parse(&doc(&[
            "000000-001000\tABCFD \tFull Disk\tO",
            "001000-001100\tEGMSG\tMessage\tO",
            "001100-002000\tABCFD \tFull Disk\tN",
        ]));
        let without = parse(&doc(&[
            "000000-001000\tABCFD \tFull Disk\tO",
            "001100-002000\tABCFD \tFull Disk\tN",
        ]));
        assert_eq!(with.len(), 2);
        assert_eq!(with, without);
    }

    #[test]
    fn test_count_matches_range_minus_admin_rows() {
        let rows = [
            "000000-000900\tABCFD \tFull Disk\tN",
            "000900-001000\tEGMSG\tMessage\tO",
            "001000-001900\tABCFD \tFull Disk\tN",
            "001900-002000\tEGMSG\tMessage\tO",
            "002000-002900\tABCFD \tFull Disk\tN",
        ];
        let set = parse(&doc(&rows));
        assert_eq!(set.len(), rows.len() - 2);
    }

    #[test]
    fn test_source_order_kept() {
        let set = parse(&doc(&[
            "120000-121000\tABCFD \tFull Disk\tN",
            "000000-001000\tABCFD \tFull Disk\tN",
        ]));
        assert_eq!(set.entries()[0].start, "120000");
        assert_eq!(set.entries()[1].start, "000000");
    }

    #[test]
    fn test_deterministic() {
        let d = doc(&[
            "000000-001000\tABCFD \tFull Disk\tO",
            "001000-002000\tGK2AENH\tExtended NH\tN",
        ]);
        assert_eq!(parse(&d), parse(&d));
    }

    #[test]
    fn test_missing_header_is_empty() {
        let lines = vec!["000000-001000\tABCFD \tFull Disk\tO", "", "ABBREVIATIONS:"];
        assert_eq!(
            try_parse(&lines),
            Err(ParseError::MissingMarker("TIME(UTC)"))
        );
        assert!(parse(&lines).is_empty());
    }

    #[test]
    fn test_missing_legend_is_empty() {
        let lines = vec!["TIME(UTC)\tID\tTYPE\tMODE", "000000-001000\tABCFD \tFull Disk\tO"];
        assert_eq!(
            try_parse(&lines),
            Err(ParseError::MissingMarker("ABBREVIATIONS:"))
        );
        assert!(parse(&lines).is_empty());
    }

    #[test]
    fn test_legend_before_header_is_empty_range() {
        let lines = vec![
            "ABBREVIATIONS:",
            "FD : Full Disk",
            "TIME(UTC)\tID\tTYPE\tMODE",
            "000000-001000\tABCFD \tFull Disk\tO",
        ];
        assert!(matches!(
            try_parse(&lines),
            Err(ParseError::EmptyRange { .. })
        ));
        assert!(parse(&lines).is_empty());
    }

    #[test]
    fn test_legend_directly_after_header_is_empty_range() {
        // end = legend - 2 lands before start; must not wrap or walk backwards.
        let lines = vec!["TIME(UTC)\tID\tTYPE\tMODE", "ABBREVIATIONS:"];
        assert_eq!(
            try_parse(&lines),
            Err(ParseError::EmptyRange { start: 1, end: -1 })
        );
    }

    #[test]
    fn test_malformed_row_collapses() {
        let lines = doc(&[
            "000000-001000\tABCFD \tFull Disk\tO",
            "not a row",
        ]);
        assert!(matches!(
            try_parse(&lines),
            Err(ParseError::MalformedRow { line: 3, .. })
        ));
        assert!(parse(&lines).is_empty());
    }

    #[test]
    fn test_bad_time_width_rejected() {
        let lines = doc(&["00000-001000\tABCFD \tFull Disk\tO"]);
        assert!(matches!(
            try_parse(&lines),
            Err(ParseError::MalformedRow { .. })
        ));
    }

    #[test]
    fn test_markers_match_after_trim() {
        let lines = vec![
            "   TIME(UTC)\tID\tTYPE\tMODE",
            "000000-001000\tABCFD \tFull Disk\tO",
            "",
            "  ABBREVIATIONS: FD=Full Disk",
        ];
        assert_eq!(parse(&lines).len(), 1);
    }

    #[test]
    fn test_parse_text_splits_lines() {
        let text = doc(&["000000-001000\tABCFD \tFull Disk\tO"]).join("\r\n");
        assert_eq!(parse_text(&text).len(), 1);
    }

    #[test]
    fn test_every_time_is_six_digits() {
        let set = parse(&doc(&[
            "000000-001000\tABCFD \tFull Disk\tO",
            "235000-235959\tGK2AENH\tExtended NH\tN",
        ]));
        for e in set.iter() {
            assert!(is_hhmmss(&e.start) && is_hhmmss(&e.end));
            let shown = e.start_display();
            assert_eq!(shown.replace(':', ""), e.start);
        }
    }
}
