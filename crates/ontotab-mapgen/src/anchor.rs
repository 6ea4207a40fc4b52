//! Template-anchor selection.
//!
//! A blank node groups repeated records; serializing it needs one column
//! whose values key the group instances. A column above the innermost repeat
//! is shared by every instance and cannot tell them apart, so the deepest
//! covered column is the only safe choice.

use ontotab_rep::ColumnPath;

/// Picks the anchor column for a blank node from the column paths it covers:
/// the path with the strictly greatest nesting depth, scanning in input
/// order, so ties keep the earliest-seen path. `None` when nothing is
/// covered.
pub fn select_template_anchor<'a, I>(covered: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(usize, &'a str)> = None;
    for column in covered {
        let depth = ColumnPath::parse(column).depth();
        let deeper = match best {
            None => true,
            Some((max_depth, _)) => depth > max_depth,
        };
        if deeper {
            best = Some((depth, column));
        }
    }
    if let Some((depth, anchor)) = best {
        tracing::debug!(anchor = %anchor, depth, "found template anchor");
    }
    best.map(|(_, anchor)| anchor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn deepest_path_wins() {
        assert_eq!(
            select_template_anchor(["name", "[a]", "[a,b]", "[a,b,c]"]),
            Some("[a,b,c]")
        );
    }

    #[test]
    fn first_seen_wins_ties() {
        assert_eq!(select_template_anchor(["x", "y"]), Some("x"));
        assert_eq!(select_template_anchor(["[a,b]", "[c,d]"]), Some("[a,b]"));
    }

    #[test]
    fn empty_input_has_no_anchor() {
        let empty: [&str; 0] = [];
        assert_eq!(select_template_anchor(empty), None);
    }

    #[test]
    fn bracketed_empty_counts_as_depth_zero() {
        // "[]" has no separators, so it ties with flat names instead of
        // being rejected.
        assert_eq!(select_template_anchor(["[]", "x"]), Some("[]"));
        assert_eq!(select_template_anchor(["x", "[]"]), Some("x"));
    }

    #[test]
    fn later_deeper_path_displaces_earlier_anchor() {
        assert_eq!(
            select_template_anchor(["[a,b]", "[a,b,c]", "[x,y,z]"]),
            Some("[a,b,c]")
        );
    }

    fn path_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            "[a-z][a-z0-9_]{0,6}",
            proptest::collection::vec("[a-z][a-z0-9_]{0,5}", 1..5)
                .prop_map(|segs| format!("[{}]", segs.join(","))),
        ]
    }

    proptest! {
        #[test]
        fn anchor_is_the_earliest_deepest_path(
            paths in proptest::collection::vec(path_strategy(), 1..12)
        ) {
            let refs: Vec<&str> = paths.iter().map(String::as_str).collect();
            let anchor = select_template_anchor(refs.iter().copied()).unwrap();

            let depths: Vec<usize> =
                refs.iter().map(|p| ColumnPath::parse(p).depth()).collect();
            let max = *depths.iter().max().unwrap();
            let first_max = depths.iter().position(|&d| d == max).unwrap();
            prop_assert_eq!(anchor, refs[first_max]);
            prop_assert_eq!(ColumnPath::parse(anchor).depth(), max);
        }
    }
}
