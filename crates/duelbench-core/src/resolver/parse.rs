//! Move extraction and selection

use regex::Regex;

/// First match of `pattern` in each sample, in sample order
///
/// Capture group 1 is the move; a pattern without groups yields the whole
/// match. Samples with no match contribute nothing.
#[must_use]
pub fn parse_moves(pattern: &Regex, samples: &[String]) -> Vec<String> {
    let has_group = pattern.captures_len() > 1;

    samples
        .iter()
        .filter_map(|sample| pattern.captures(sample))
        .map(|caps| {
            let group = if has_group { caps.get(1) } else { caps.get(0) };
            group.map_or_else(String::new, |m| m.as_str().to_string())
        })
        .collect()
}

/// Majority vote over parsed moves; ties go to the earliest
///
/// A single move is returned as is. `None` only for an empty slice.
#[must_use]
pub fn select_move(moves: &[String]) -> Option<&str> {
    let mut best: Option<(&str, usize)> = None;

    for (index, candidate) in moves.iter().enumerate() {
        if moves[..index].contains(candidate) {
            continue;
        }
        let votes = moves[index..].iter().filter(|m| *m == candidate).count();
        if best.is_none_or(|(_, leading)| votes > leading) {
            best = Some((candidate.as_str(), votes));
        }
    }

    best.map(|(chosen, _)| chosen)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_group_one_is_the_move() {
        let pattern = Regex::new(r"<(C\dR\d)>").unwrap();
        let moves = parse_moves(&pattern, &texts(&["I pick <C2R2> then <C1R1>", "no idea"]));
        assert_eq!(moves, vec!["C2R2"]);
    }

    #[test]
    fn test_whole_match_without_group() {
        let pattern = Regex::new(r"<C\dR\d>").unwrap();
        let moves = parse_moves(&pattern, &texts(&["<C3R1>"]));
        assert_eq!(moves, vec!["<C3R1>"]);
    }

    #[test]
    fn test_unparticipating_group_is_empty() {
        let pattern = Regex::new(r"<(C\d)?>").unwrap();
        let moves = parse_moves(&pattern, &texts(&["<>"]));
        assert_eq!(moves, vec![""]);
    }

    #[test]
    fn test_majority_vote() {
        let moves = texts(&["C1R1", "C2R2", "C2R2"]);
        assert_eq!(select_move(&moves), Some("C2R2"));
    }

    #[test]
    fn test_tie_goes_to_earliest() {
        let moves = texts(&["C3R3", "C1R1", "C1R1", "C3R3"]);
        assert_eq!(select_move(&moves), Some("C3R3"));
    }

    #[test]
    fn test_single_and_empty() {
        assert_eq!(select_move(&texts(&["C2R2"])), Some("C2R2"));
        assert_eq!(select_move(&[]), None);
    }
}
