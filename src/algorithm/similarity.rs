// Similitud entre códigos de asignatura para distinguir choque vs clase común.
use serde::{Deserialize, Serialize};

/// Normalised character-sequence similarity in `[0, 1]`:
/// `2 * matched / (len_a + len_b)`. Two empty strings are identical.
///
/// `matched` counts the characters of the Ratcliff/Obershelp matching blocks:
/// take the longest common substring, then repeat on the pieces left and right
/// of it. This is the `SequenceMatcher.ratio()` score without junk heuristics.
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]` as `(i, j, size)`.
/// Ties go to the block ending first in `a`, then first in `b`.
fn longest_match(a: &[char], b: &[char], alo: usize, ahi: usize, blo: usize, bhi: usize) -> (usize, usize, usize) {
    let mut best = (alo, blo, 0);
    // prev[j - blo + 1]: length of the match ending at a[i - 1], b[j]
    let mut prev = vec![0usize; bhi - blo + 1];
    let mut cur = vec![0usize; bhi - blo + 1];
    for i in alo..ahi {
        for j in blo..bhi {
            let k = if a[i] == b[j] { prev[j - blo] + 1 } else { 0 };
            cur[j - blo + 1] = k;
            if k > best.2 {
                best = (i + 1 - k, j + 1 - k, k);
            }
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    best
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        if alo >= ahi || blo >= bhi {
            continue;
        }
        let (i, j, k) = longest_match(a, b, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        matched += k;
        pending.push((alo, i, blo, j));
        pending.push((i + k, ahi, j + k, bhi));
    }
    matched
}

/// Rule deciding when two subjects on the same faculty/day/slot are one shared
/// lecture instead of a clash.
///
/// Presets: `admin` treats a ratio strictly above 0.80 as common and compares
/// case-sensitively; `checker` accepts 0.85 or more after lower-casing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommonSubjectPolicy {
    pub threshold: f64,
    /// `>=` when true, `>` otherwise.
    pub inclusive: bool,
    pub case_sensitive: bool,
}

impl CommonSubjectPolicy {
    pub const ADMIN_THRESHOLD: f64 = 0.80;
    pub const CHECKER_THRESHOLD: f64 = 0.85;

    pub fn admin() -> Self {
        CommonSubjectPolicy {
            threshold: Self::ADMIN_THRESHOLD,
            inclusive: false,
            case_sensitive: true,
        }
    }

    pub fn checker() -> Self {
        CommonSubjectPolicy {
            threshold: Self::CHECKER_THRESHOLD,
            inclusive: true,
            case_sensitive: false,
        }
    }

    /// `"admin"` or `"checker"`, case-insensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "admin" => Some(Self::admin()),
            "checker" => Some(Self::checker()),
            _ => None,
        }
    }

    pub fn with_threshold(self, threshold: f64) -> Self {
        CommonSubjectPolicy { threshold, ..self }
    }

    pub fn score(&self, a: &str, b: &str) -> f64 {
        if self.case_sensitive {
            sequence_ratio(a, b)
        } else {
            sequence_ratio(&a.to_lowercase(), &b.to_lowercase())
        }
    }

    pub fn accepts(&self, score: f64) -> bool {
        if self.inclusive {
            score >= self.threshold
        } else {
            score > self.threshold
        }
    }

    /// Returns `(is_common, score)`. Identical codes are always common.
    pub fn classify(&self, a: &str, b: &str) -> (bool, f64) {
        if a == b {
            return (true, 1.0);
        }
        let score = self.score(a, b);
        (self.accepts(score), score)
    }
}

impl Default for CommonSubjectPolicy {
    fn default() -> Self {
        Self::admin()
    }
}
