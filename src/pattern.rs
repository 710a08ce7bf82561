// nidaqmx/src/pattern.rs
//
// Copyright (c) 2021-2025, nidaqmx-rs contributors
//
// Licensed under the MIT license:
//   <LICENSE or http://opensource.org/licenses/MIT>
// This file may not be copied, modified, or distributed except according
// to those terms.
//
//!
//! Compact range/set notation for collections of channel names.
//!
//! Physical and virtual channel names are slash-delimited paths whose last
//! segment usually ends in a number (`Dev1/ao3`, `Dev2/port0/line1`).
//! [`compress_pattern`] folds a collection of such names into the shortest
//! equivalent notation, a contiguous run becoming `ao1:7` and divergent
//! branches an `{a,b}` group; [`expand_pattern`] parses the notation back
//! into the explicit list.

use std::collections::{BTreeMap, BTreeSet};

/// Compresses a collection of channel names into range/set notation.
///
/// Sibling names that differ only by a trailing number collapse into a
/// `start:end` range when the numbers form a contiguous run; names sharing
/// a leading segment are grouped behind it, with braces when the group has
/// several disjoint parts. The result is deterministic regardless of the
/// input order, and duplicates collapse.
///
/// ```
/// use nidaqmx::pattern::compress_pattern;
///
/// let names = ["Dev1/ao1", "Dev1/ao2", "Dev1/ao3", "Dev0/ai0"];
/// assert_eq!(compress_pattern(names), "Dev0/ai0,Dev1/ao1:3");
/// ```
///
/// When some branch cannot be expressed exactly (its numbers are not
/// contiguous, or a suffix is not numeric at all), the entire input is
/// returned as it was given, joined with commas, rather than a partially
/// compressed form.
///
/// Every call must be either all bare names (`"ao1"`) or all slash paths
/// (`"Dev1/ao1"`); mixing the two panics.
pub fn compress_pattern<I>(paths: I) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let paths: Vec<String> = paths
        .into_iter()
        .map(|p| p.as_ref().to_string())
        .collect();
    compress_level(paths.iter().map(String::as_str)).unwrap_or_else(|| paths.join(","))
}

// One grouping level. `None` means some branch was ambiguous; the top-level
// caller then falls back to the verbatim input.
fn compress_level<'a, I>(paths: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut groups: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    let mut bare = false;
    for raw in paths {
        let path = raw.strip_prefix('/').unwrap_or(raw);
        match path.split_once('/') {
            Some((head, rest)) => {
                assert!(
                    groups.is_empty() || !bare,
                    "cannot mix device paths with bare channel names: {:?}",
                    raw
                );
                groups
                    .entry(head.to_string())
                    .or_default()
                    .insert(rest.to_string());
            }
            None => {
                assert!(
                    groups.is_empty() || bare,
                    "cannot mix bare channel names with device paths: {:?}",
                    raw
                );
                bare = true;
                let digits = path
                    .find(|c: char| c.is_ascii_digit())
                    .unwrap_or(path.len());
                let (head, rest) = path.split_at(digits);
                groups
                    .entry(head.to_string())
                    .or_default()
                    .insert(rest.to_string());
            }
        }
    }

    let mut parts: Vec<String> = Vec::new();
    for (prefix, rest) in &groups {
        if rest.len() == 1 {
            if let Some(only) = rest.iter().next() {
                parts.push(join_segment(prefix, only, bare));
            }
        } else if !prefix.is_empty() {
            let mut sub = compress_level(rest.iter().map(String::as_str))?;
            if sub.contains(',') {
                sub = format!("{{{}}}", sub);
            }
            parts.push(join_segment(prefix, &sub, bare));
        } else {
            // Trailing numbers with nothing left in front of them.
            let mut nums = Vec::with_capacity(rest.len());
            for value in rest {
                nums.push(value.parse::<u64>().ok()?);
            }
            nums.sort_unstable();
            let (first, last) = (nums[0], nums[nums.len() - 1]);
            if last - first == nums.len() as u64 - 1 {
                parts.push(format!("{}:{}", first, last));
            } else {
                return None;
            }
        }
    }
    Some(parts.join(","))
}

fn join_segment(prefix: &str, rest: &str, bare: bool) -> String {
    if bare {
        format!("{}{}", prefix, rest)
    } else {
        format!("{}/{}", prefix, rest)
    }
}

/// Expands range/set notation back into the explicit list of names.
///
/// The inverse of [`compress_pattern`]: ranges count through their span
/// (`ao7:5` counts down), brace groups multiply out against their prefix,
/// and nesting is honored. A term that does not parse as a range or group
/// is passed through unchanged.
///
/// ```
/// use nidaqmx::pattern::expand_pattern;
///
/// assert_eq!(
///     expand_pattern("Dev1/{ai1:2,ao5}"),
///     vec!["Dev1/ai1", "Dev1/ai2", "Dev1/ao5"]
/// );
/// ```
pub fn expand_pattern(pattern: &str) -> Vec<String> {
    let mut names = Vec::new();
    if pattern.is_empty() {
        return names;
    }
    for term in split_outside_braces(pattern) {
        expand_term(term, &mut names);
    }
    names
}

// Splits on commas that are not inside a brace group.
fn split_outside_braces(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

fn expand_term(term: &str, out: &mut Vec<String>) {
    if let Some(open) = term.find('{') {
        let mut depth = 0usize;
        let mut close = None;
        for (i, c) in term[open..].char_indices() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        close = Some(open + i);
                        break;
                    }
                }
                _ => {}
            }
        }
        let Some(close) = close else {
            // Unbalanced braces; keep the term as it came.
            out.push(term.to_string());
            return;
        };
        let prefix = &term[..open];
        let tail = &term[close + 1..];
        for part in split_outside_braces(&term[open + 1..close]) {
            expand_term(&format!("{}{}{}", prefix, part, tail), out);
        }
    } else if term.contains(':') {
        expand_range(term, out);
    } else {
        out.push(term.to_string());
    }
}

fn expand_range(term: &str, out: &mut Vec<String>) {
    let Some((left, right)) = term.split_once(':') else {
        out.push(term.to_string());
        return;
    };
    let bytes = left.as_bytes();
    let mut at = bytes.len();
    while at > 0 && bytes[at - 1].is_ascii_digit() {
        at -= 1;
    }
    let (stem, start) = left.split_at(at);
    // The end may repeat the stem: "ao1:7" and "ao1:ao7" both count 1..=7.
    let end = right.strip_prefix(stem).unwrap_or(right);
    match (start.parse::<u64>(), end.parse::<u64>()) {
        (Ok(start), Ok(end)) => {
            if start <= end {
                for v in start..=end {
                    out.push(format!("{}{}", stem, v));
                }
            } else {
                for v in (end..=start).rev() {
                    out.push(format!("{}{}", stem, v));
                }
            }
        }
        _ => out.push(term.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The full channel set built up across the accumulation test below.
    fn kitchen_sink() -> Vec<String> {
        let mut paths: Vec<String> = (1..=7).map(|i| format!("Dev1/ao{}", i)).collect();
        paths.extend(["Dev0/ao1".to_string(), "Dev0/ao0".to_string()]);
        paths.extend((1..=3).map(|i| format!("Dev1/ai{}", i)));
        for port in 0..=1 {
            for line in 0..=1 {
                paths.push(format!("Dev2/port{}/line{}", port, line));
            }
        }
        paths
    }

    #[test]
    fn collapses_a_contiguous_run_into_a_range() {
        let paths: Vec<String> = (1..=7).map(|i| format!("Dev1/ao{}", i)).collect();
        assert_eq!(compress_pattern(&paths), "Dev1/ao1:7");
    }

    #[test]
    fn grows_the_pattern_as_channels_accumulate() {
        let mut paths: Vec<String> = (1..=7).map(|i| format!("Dev1/ao{}", i)).collect();

        paths.push("Dev0/ao1".into());
        assert_eq!(compress_pattern(&paths), "Dev0/ao1,Dev1/ao1:7");

        paths.push("Dev0/ao0".into());
        assert_eq!(compress_pattern(&paths), "Dev0/ao0:1,Dev1/ao1:7");

        paths.extend((1..=3).map(|i| format!("Dev1/ai{}", i)));
        assert_eq!(compress_pattern(&paths), "Dev0/ao0:1,Dev1/{ai1:3,ao1:7}");

        paths.push("Dev2/port0/line0".into());
        assert_eq!(
            compress_pattern(&paths),
            "Dev0/ao0:1,Dev1/{ai1:3,ao1:7},Dev2/port0/line0"
        );

        paths.push("Dev2/port0/line1".into());
        assert_eq!(
            compress_pattern(&paths),
            "Dev0/ao0:1,Dev1/{ai1:3,ao1:7},Dev2/port0/line0:1"
        );

        paths.push("Dev2/port1/line0".into());
        assert_eq!(
            compress_pattern(&paths),
            "Dev0/ao0:1,Dev1/{ai1:3,ao1:7},Dev2/{port0/line0:1,port1/line0}"
        );

        paths.push("Dev2/port1/line1".into());
        assert_eq!(
            compress_pattern(&paths),
            "Dev0/ao0:1,Dev1/{ai1:3,ao1:7},Dev2/{port0/line0:1,port1/line0:1}"
        );
    }

    #[test]
    fn bare_channel_names_join_without_separator() {
        assert_eq!(compress_pattern(["ao1", "ao2", "ao3"]), "ao1:3");
        assert_eq!(compress_pattern(["ao3"]), "ao3");
        assert_eq!(compress_pattern(["ai0", "ao0"]), "ai0,ao0");
    }

    #[test]
    fn result_is_independent_of_input_order() {
        let forward = compress_pattern(["Dev0/ao1", "Dev1/ao6", "Dev1/ao7"]);
        let shuffled = compress_pattern(["Dev1/ao7", "Dev0/ao1", "Dev1/ao6"]);
        assert_eq!(forward, "Dev0/ao1,Dev1/ao6:7");
        assert_eq!(forward, shuffled);
    }

    #[test]
    fn duplicate_names_collapse() {
        assert_eq!(
            compress_pattern(["Dev1/ao1", "Dev1/ao1", "Dev1/ao2"]),
            "Dev1/ao1:2"
        );
    }

    #[test]
    fn leading_slashes_are_stripped_when_compression_succeeds() {
        assert_eq!(compress_pattern(["/Dev1/ao1", "/Dev1/ao2"]), "Dev1/ao1:2");
    }

    // A single ambiguous branch aborts the whole call: even branches that
    // were compressible come back verbatim, leading slashes and all.
    #[test]
    fn ambiguous_branches_return_the_input_verbatim() {
        assert_eq!(
            compress_pattern(["Dev1/ao1", "Dev1/ao2", "Dev1/ao5"]),
            "Dev1/ao1,Dev1/ao2,Dev1/ao5"
        );
        assert_eq!(
            compress_pattern(["Dev1/ao1", "Dev1/ao2", "Dev2/ao1", "Dev2/ao9"]),
            "Dev1/ao1,Dev1/ao2,Dev2/ao1,Dev2/ao9"
        );
        assert_eq!(
            compress_pattern(["/Dev1/ao1", "/Dev1/ao5"]),
            "/Dev1/ao1,/Dev1/ao5"
        );
    }

    #[test]
    fn non_numeric_suffixes_fall_back_verbatim() {
        assert_eq!(compress_pattern(["a1", "a2b"]), "a1,a2b");
    }

    #[test]
    fn empty_input_gives_an_empty_pattern() {
        assert_eq!(compress_pattern(Vec::<String>::new()), "");
        assert!(expand_pattern("").is_empty());
    }

    #[test]
    #[should_panic(expected = "cannot mix")]
    fn mixing_bare_and_path_names_is_a_usage_error() {
        compress_pattern(["Dev1/ao1", "ao2"]);
    }

    #[test]
    fn expands_ranges_and_groups() {
        assert_eq!(
            expand_pattern("Dev1/ao1:3"),
            vec!["Dev1/ao1", "Dev1/ao2", "Dev1/ao3"]
        );
        assert_eq!(
            expand_pattern("Dev1/{ai1:2,ao5}"),
            vec!["Dev1/ai1", "Dev1/ai2", "Dev1/ao5"]
        );
        assert_eq!(expand_pattern("ao7:5"), vec!["ao7", "ao6", "ao5"]);
        assert_eq!(expand_pattern("ao1:ao3"), vec!["ao1", "ao2", "ao3"]);
        assert_eq!(
            expand_pattern("Dev2/port0/line0:1"),
            vec!["Dev2/port0/line0", "Dev2/port0/line1"]
        );
        // Not a range, just a name with a colon-less tail.
        assert_eq!(expand_pattern("Dev1/ao1"), vec!["Dev1/ao1"]);
    }

    #[test]
    fn expands_nested_groups() {
        assert_eq!(
            compress_pattern([
                "DevA/u0/x0/y0",
                "DevA/u0/x0/y1",
                "DevA/u0/x1/y0",
                "DevA/u1/x0/y0"
            ]),
            "DevA/{u0/{x0/y0:1,x1/y0},u1/x0/y0}"
        );
        assert_eq!(
            expand_pattern("DevA/{u0/{x0/y0:1,x1/y0},u1/x0/y0}"),
            vec![
                "DevA/u0/x0/y0",
                "DevA/u0/x0/y1",
                "DevA/u0/x1/y0",
                "DevA/u1/x0/y0"
            ]
        );
    }

    #[test]
    fn compression_round_trips_through_expansion() {
        let mut paths = kitchen_sink();
        let pattern = compress_pattern(&paths);
        assert_eq!(
            pattern,
            "Dev0/ao0:1,Dev1/{ai1:3,ao1:7},Dev2/{port0/line0:1,port1/line0:1}"
        );

        let mut expanded = expand_pattern(&pattern);
        assert_eq!(compress_pattern(&expanded), pattern);

        expanded.sort();
        paths.sort();
        paths.dedup();
        assert_eq!(expanded, paths);
    }
}
