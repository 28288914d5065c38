/// Inline completion for the dataset input: the full candidate and the part
/// still to be typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestMatch {
    pub value: String,
    pub placeholder: String,
}

/// Case-sensitive prefix completion. Among candidates starting with `query`
/// the shortest wins; ties keep candidate order.
pub fn best_match(query: &str, candidates: &[String]) -> Option<BestMatch> {
    if query.is_empty() {
        return None;
    }

    let mut best: Option<&String> = None;
    for candidate in candidates {
        if !candidate.starts_with(query) {
            continue;
        }
        match best {
            Some(current) if current.len() <= candidate.len() => {}
            _ => best = Some(candidate),
        }
    }

    best.map(|value| BestMatch {
        value: value.clone(),
        placeholder: value[query.len()..].to_string(),
    })
}

/// Candidates containing `query`, in candidate order. An empty query keeps
/// every candidate.
pub fn matching_results(query: &str, candidates: &[String]) -> Vec<String> {
    if query.is_empty() {
        return candidates.to_vec();
    }
    candidates
        .iter()
        .filter(|candidate| candidate.contains(query))
        .cloned()
        .collect()
}
