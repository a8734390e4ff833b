// SPDX-FileCopyrightText: 2026 GSI Helmholtzzentrum f. Schwerionenforschung GmbH, Darmstadt, Germany
// SPDX-License-Identifier: LGPL-3.0-or-later

use std::sync::OnceLock;

use regex::Regex;

use crate::record::parser::split_tokens;

/// `prefix[body]`
static BRACKET_RE: OnceLock<Regex> = OnceLock::new();

fn bracket_re() -> &'static Regex {
    BRACKET_RE.get_or_init(|| Regex::new(r"^([^\[\]]+)\[([^\[\]]+)\]$").expect("bracket pattern is valid"))
}

/// Expand a Slurm nodelist to individual hostnames
///
/// Handles `name`, `prefix[1-3]`, `prefix[1,4,7]`, mixes such as
/// `prefix[1-3,7]` and comma-joined lists of those. Numbers are zero
/// padded to two digits, or to the width written in the list if wider.
/// Anything else is taken as a literal hostname.
pub fn expand_nodelist(nodelist: &str) -> Vec<String> {
    let nodelist = nodelist.trim();
    if nodelist.is_empty() || nodelist == "(null)" || nodelist == "None assigned" {
        return Vec::new();
    }

    let mut nodes: Vec<String> = Vec::new();
    for token in split_tokens(nodelist) {
        for node in expand_token(token) {
            if !nodes.contains(&node) {
                nodes.push(node);
            }
        }
    }
    nodes
}

fn expand_token(token: &str) -> Vec<String> {
    let Some(caps) = bracket_re().captures(token) else {
        return vec![token.to_string()];
    };
    let prefix = &caps[1];

    let mut nodes = Vec::new();
    for part in caps[2].split(',').map(str::trim) {
        let (low, high) = part.split_once('-').unwrap_or((part, part));
        match (low.parse::<u64>(), high.parse::<u64>()) {
            (Ok(first), Ok(last)) => {
                let width = low.len().max(2);
                for n in first..=last {
                    nodes.push(format!("{}{:0width$}", prefix, n, width = width));
                }
            }
            _ => return vec![token.to_string()],
        }
    }
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_range() {
        assert_eq!(expand_nodelist("pg-gpu[1-3]"), vec!["pg-gpu01", "pg-gpu02", "pg-gpu03"]);
    }

    #[test]
    fn test_expand_single_literal() {
        assert_eq!(expand_nodelist("pg-gpu5"), vec!["pg-gpu5"]);
    }

    #[test]
    fn test_expand_enumeration_and_mix() {
        assert_eq!(expand_nodelist("pg-gpu[1,4,12]"), vec!["pg-gpu01", "pg-gpu04", "pg-gpu12"]);
        assert_eq!(expand_nodelist("n[8-9,11]"), vec!["n08", "n09", "n11"]);
    }

    #[test]
    fn test_expand_keeps_wider_padding() {
        assert_eq!(expand_nodelist("node[001-003]"), vec!["node001", "node002", "node003"]);
    }

    #[test]
    fn test_expand_joined_lists_deduplicated() {
        assert_eq!(
            expand_nodelist("pg-gpu01,pg-gpu[1-2]"),
            vec!["pg-gpu01", "pg-gpu02"]
        );
    }

    #[test]
    fn test_expand_empty_and_null() {
        assert!(expand_nodelist("").is_empty());
        assert!(expand_nodelist("(null)").is_empty());
        assert!(expand_nodelist("None assigned").is_empty());
    }

    #[test]
    fn test_malformed_bracket_is_literal() {
        assert_eq!(expand_nodelist("gpu[a-b]"), vec!["gpu[a-b]"]);
    }
}
