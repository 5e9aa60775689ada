//! Work-name normalization.
//!
//! The exported spreadsheet names the same activity in many ways:
//! `"套餐A_射箭比赛"`, `"射箭比赛（挑战版）"`, `"三年级上册-射箭比赛"`. The
//! functions here map each raw name onto a canonical project name so that
//! usage can be grouped by activity.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ReportError;

/// Difficulty labels appended to work names.
pub const DIFFICULTY_QUALIFIERS: &[&str] = &[
    "入门版", "基础版", "进阶版", "提高版", "挑战版", "拓展版", "初级版", "中级版", "高级版",
    "入门级", "挑战级",
];

/// ASCII `( … )` or full-width `（ … ）` annotation, shortest match.
static PAREN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(.*?\)|（.*?）").expect("valid paren regex"));

static SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[_·\-]").expect("valid separator regex"));

/// Grade + semester labels such as `三年级上册` or `五年级下学期`.
static GRADE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[一二三四五六七八九]年级[上下](?:学期|册)?").expect("valid grade regex")
});

/// Two or more contiguous CJK unified ideographs.
static CJK_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\x{4E00}-\x{9FFF}]{2,}").expect("valid cjk regex"));

/// Strategy used to derive canonical project names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameNormalizer {
    /// Keep everything after the first underscore.
    Basic,
    /// Strip annotations and qualifiers, keep the CJK content.
    #[default]
    Advanced,
}

impl NameNormalizer {
    pub fn normalize(&self, raw: &str) -> String {
        match self {
            NameNormalizer::Basic => normalize_basic(raw),
            NameNormalizer::Advanced => normalize_advanced(raw),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NameNormalizer::Basic => "basic",
            NameNormalizer::Advanced => "advanced",
        }
    }
}

impl fmt::Display for NameNormalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NameNormalizer {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(NameNormalizer::Basic),
            "advanced" => Ok(NameNormalizer::Advanced),
            other => Err(ReportError::Config(format!("unknown normalizer: {other}"))),
        }
    }
}

/// Return the part after the first `_`, or the name unchanged.
///
/// # Examples
///
/// ```
/// use report_core::normalize::normalize_basic;
///
/// assert_eq!(normalize_basic("套餐A_射箭比赛"), "射箭比赛");
/// assert_eq!(normalize_basic("射箭比赛"), "射箭比赛");
/// assert_eq!(normalize_basic("A_B_C"), "B_C");
/// ```
pub fn normalize_basic(raw: &str) -> String {
    match raw.split_once('_') {
        Some((_, rest)) => rest.to_string(),
        None => raw.to_string(),
    }
}

/// Reduce a raw work name to its CJK content.
///
/// Steps, in order:
///
/// 1. Drop `( … )` / `（ … ）` annotations.
/// 2. Turn `_`, `·` and `-` into spaces.
/// 3. Remove grade/semester labels and [`DIFFICULTY_QUALIFIERS`].
/// 4. Concatenate every run of two or more CJK ideographs; when there is
///    none, keep the text from step 3.
/// 5. Trim.
///
/// A name made only of qualifiers normalizes to `""`.
///
/// # Examples
///
/// ```
/// use report_core::normalize::normalize_advanced;
///
/// assert_eq!(normalize_advanced("射箭比赛(挑战版)"), "射箭比赛");
/// assert_eq!(normalize_advanced("A射箭B比赛C"), "射箭比赛");
/// assert_eq!(normalize_advanced("Scratch-Pong"), "Scratch Pong");
/// ```
pub fn normalize_advanced(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let without_parens = PAREN_RE.replace_all(raw, "");
    let spaced = SEPARATOR_RE.replace_all(&without_parens, " ");
    let mut stripped = GRADE_RE.replace_all(&spaced, "").into_owned();
    for qualifier in DIFFICULTY_QUALIFIERS {
        if stripped.contains(qualifier) {
            stripped = stripped.replace(qualifier, "");
        }
    }

    let runs: Vec<&str> = CJK_RUN_RE
        .find_iter(&stripped)
        .map(|m| m.as_str())
        .collect();

    if runs.is_empty() {
        stripped.trim().to_string()
    } else {
        runs.concat().trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── normalize_basic ────────────────────────────────────────────────────

    #[test]
    fn test_basic_splits_on_first_underscore() {
        assert_eq!(normalize_basic("套餐A_射箭比赛"), "射箭比赛");
    }

    #[test]
    fn test_basic_without_underscore_unchanged() {
        assert_eq!(normalize_basic("射箭比赛"), "射箭比赛");
    }

    #[test]
    fn test_basic_keeps_second_underscore() {
        assert_eq!(normalize_basic("套餐A_射箭_比赛"), "射箭_比赛");
    }

    #[test]
    fn test_basic_trailing_underscore_gives_empty() {
        assert_eq!(normalize_basic("套餐A_"), "");
    }

    #[test]
    fn test_basic_empty() {
        assert_eq!(normalize_basic(""), "");
    }

    #[test]
    fn test_basic_property_everything_after_first_underscore() {
        let names = ["a_b", "_lead", "x__y", "中_文_名", "no-underscore", "尾巴_"];
        for name in names {
            let out = normalize_basic(name);
            match name.find('_') {
                Some(idx) => assert_eq!(out, &name[idx + 1..], "input {name:?}"),
                None => assert_eq!(out, name, "input {name:?}"),
            }
        }
    }

    // ── normalize_advanced ─────────────────────────────────────────────────

    #[test]
    fn test_advanced_strips_ascii_paren_qualifier() {
        assert_eq!(normalize_advanced("射箭比赛(挑战版)"), "射箭比赛");
    }

    #[test]
    fn test_advanced_strips_fullwidth_paren() {
        assert_eq!(normalize_advanced("射箭比赛（第二课时）"), "射箭比赛");
    }

    #[test]
    fn test_advanced_paren_match_is_non_greedy() {
        // Text between two annotations survives.
        assert_eq!(normalize_advanced("(旧)射箭(新)比赛"), "射箭比赛");
        assert_eq!(normalize_advanced("(注)太空漫游(二)"), "太空漫游");
    }

    #[test]
    fn test_advanced_concatenates_cjk_runs() {
        assert_eq!(normalize_advanced("A射箭B比赛C"), "射箭比赛");
    }

    #[test]
    fn test_advanced_qualifier_anywhere() {
        assert_eq!(normalize_advanced("挑战版射箭比赛"), "射箭比赛");
        assert_eq!(normalize_advanced("射箭入门版比赛"), "射箭比赛");
        assert_eq!(normalize_advanced("射箭比赛 进阶版 进阶版"), "射箭比赛");
    }

    #[test]
    fn test_advanced_grade_semester_removed() {
        assert_eq!(normalize_advanced("三年级上册-射箭比赛"), "射箭比赛");
        assert_eq!(normalize_advanced("射箭比赛_五年级下学期"), "射箭比赛");
        assert_eq!(normalize_advanced("一年级上·射箭比赛"), "射箭比赛");
    }

    #[test]
    fn test_advanced_underscore_prefix_is_kept_as_cjk() {
        // Unlike the basic variant, a CJK prefix before `_` survives.
        assert_eq!(normalize_advanced("套餐A_射箭比赛"), "套餐射箭比赛");
    }

    #[test]
    fn test_advanced_single_cjk_chars_dropped() {
        assert_eq!(normalize_advanced("1号 射箭比赛"), "射箭比赛");
        assert_eq!(normalize_advanced("射箭比赛 B 组"), "射箭比赛");
    }

    #[test]
    fn test_advanced_falls_back_without_cjk_run() {
        assert_eq!(normalize_advanced("  Scratch_Pong  "), "Scratch Pong");
        assert_eq!(normalize_advanced("A射B"), "A射B");
    }

    #[test]
    fn test_advanced_only_qualifiers_gives_empty() {
        assert_eq!(normalize_advanced("挑战版"), "");
        assert_eq!(normalize_advanced("(入门)三年级上册"), "");
    }

    #[test]
    fn test_advanced_empty() {
        assert_eq!(normalize_advanced(""), "");
    }

    #[test]
    fn test_advanced_deterministic() {
        let raw = "套餐B_机械臂(挑战版)";
        assert_eq!(normalize_advanced(raw), normalize_advanced(raw));
    }

    #[test]
    fn test_advanced_qualifier_case_sensitive() {
        assert_eq!(normalize_advanced("Pong Level"), "Pong Level");
    }

    // ── NameNormalizer ─────────────────────────────────────────────────────

    #[test]
    fn test_normalizer_dispatch() {
        assert_eq!(NameNormalizer::Basic.normalize("A_射箭比赛"), "射箭比赛");
        assert_eq!(
            NameNormalizer::Advanced.normalize("射箭比赛(挑战版)"),
            "射箭比赛"
        );
    }

    #[test]
    fn test_normalizer_default_is_advanced() {
        assert_eq!(NameNormalizer::default(), NameNormalizer::Advanced);
    }

    #[test]
    fn test_normalizer_from_str() {
        assert_eq!(
            "basic".parse::<NameNormalizer>().unwrap(),
            NameNormalizer::Basic
        );
        assert_eq!(
            "ADVANCED".parse::<NameNormalizer>().unwrap(),
            NameNormalizer::Advanced
        );
        assert!("fuzzy".parse::<NameNormalizer>().is_err());
    }
}
