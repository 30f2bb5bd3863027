// ─── Dotted Version Comparison ───
// Segment-wise numeric comparison of strings like "1.20.5".

/// Returns `true` when `version` is greater than or equal to `minimum`.
///
/// Both strings are split on `.` and compared segment by segment as integers.
/// A missing or unparsable segment counts as `0`, so `"1.20"` equals
/// `"1.20.0"` and the function never fails. Ties return `true`: the
/// selection tables rely on an exact threshold satisfying the rule.
pub fn is_at_least(version: &str, minimum: &str) -> bool {
    let left: Vec<&str> = version.split('.').collect();
    let right: Vec<&str> = minimum.split('.').collect();
    let len = left.len().max(right.len());

    for i in 0..len {
        let l = segment(&left, i);
        let r = segment(&right, i);
        if l != r {
            return l > r;
        }
    }

    true
}

fn segment(parts: &[&str], index: usize) -> u64 {
    parts
        .get(index)
        .and_then(|part| part.trim().parse::<u64>().ok())
        .unwrap_or(0)
}
