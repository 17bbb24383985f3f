use crate::patterns::{PatternGroup, PatternSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupHit<'t> {
    pub start: usize,
    pub end: usize,
    pub snippet: &'t str,
}

/// Per-group flags OR-ed over several text fields. The snippet of a group is
/// taken from the first field that matched it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupMatches {
    pub flags: Vec<bool>,
    pub snippets: Vec<Option<String>>,
}

impl GroupMatches {
    pub fn empty(n_groups: usize) -> Self {
        Self {
            flags: vec![false; n_groups],
            snippets: vec![None; n_groups],
        }
    }

    pub fn any(&self) -> bool {
        self.flags.iter().any(|f| *f)
    }

    pub fn count(&self) -> usize {
        self.flags.iter().filter(|f| **f).count()
    }
}

pub fn match_text<'t>(
    set: &PatternSet,
    text: Option<&'t str>,
    radius: usize,
) -> Vec<Option<GroupHit<'t>>> {
    let Some(text) = text.filter(|t| !t.trim().is_empty()) else {
        return vec![None; set.len()];
    };
    set.groups
        .iter()
        .map(|group| {
            first_match(group, text).map(|(start, end)| GroupHit {
                start,
                end,
                snippet: window(text, start, end, radius),
            })
        })
        .collect()
}

pub fn match_fields<'t, I>(set: &PatternSet, fields: I, radius: usize) -> GroupMatches
where
    I: IntoIterator<Item = Option<&'t str>>,
{
    let mut out = GroupMatches::empty(set.len());
    for field in fields {
        if out.flags.iter().all(|f| *f) {
            break;
        }
        for (i, hit) in match_text(set, field, radius).into_iter().enumerate() {
            if out.flags[i] {
                continue;
            }
            if let Some(hit) = hit {
                out.flags[i] = true;
                out.snippets[i] = Some(collapse_whitespace(hit.snippet));
            }
        }
    }
    out
}

// Earliest start across the group's expressions; shortest match on ties.
fn first_match(group: &PatternGroup, text: &str) -> Option<(usize, usize)> {
    group
        .regexes()
        .iter()
        .filter_map(|re| re.find(text))
        .map(|m| (m.start(), m.end()))
        .min()
}

fn window(text: &str, start: usize, end: usize, radius: usize) -> &str {
    let lo = text[..start]
        .char_indices()
        .rev()
        .take(radius)
        .last()
        .map(|(i, _)| i)
        .unwrap_or(start);
    let hi = text[end..]
        .char_indices()
        .nth(radius)
        .map(|(i, _)| end + i)
        .unwrap_or(text.len());
    &text[lo..hi]
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
