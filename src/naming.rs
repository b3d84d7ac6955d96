//! Output-name derivation: deterministic, filesystem-safe names from PDF
//! file names.
//!
//! ## Why sanitise at all?
//!
//! The outputs land on a web server and are referenced from URLs, so the
//! names must survive URL encoding, case-insensitive filesystems, and shell
//! quoting. Lower-casing plus collapsing everything outside `[a-z0-9]` to a
//! single hyphen gives `My Report (final).pdf` → `my-report-final`.
//!
//! Note that sanitisation is lossy: two distinct inputs can map to the same
//! output name (`My Report (final).pdf` and `my-report-final.pdf` collide).
//! The pipeline does not detect this — the skip-if-exists check in
//! [`crate::pipeline::job`] means whichever file is processed first wins and
//! the other reports as skipped.

use std::path::Path;

/// Sanitise a file stem into lowercase ASCII letters, digits, and hyphens.
///
/// Every run of one-or-more characters outside `[a-z0-9]` collapses to a
/// single hyphen; leading and trailing hyphens are stripped. A stem with no
/// usable characters at all falls back to `"untitled"` so the result is
/// never empty.
pub fn sanitize_stem(stem: &str) -> String {
    let mut out = String::with_capacity(stem.len());
    let mut gap = false;

    for ch in stem.chars() {
        let ch = ch.to_ascii_lowercase();
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if gap && !out.is_empty() {
                out.push('-');
            }
            gap = false;
            out.push(ch);
        } else {
            gap = true;
        }
    }

    if out.is_empty() {
        out.push_str("untitled");
    }
    out
}

/// Derive a deterministic output file name from an input file name.
///
/// The stem of `file_name` is sanitised via [`sanitize_stem`]; when
/// `parent_dir_name` is given (subdirectory mode) the sanitised parent is
/// prefixed with a hyphen to disambiguate same-named files from different
/// source folders. `suffix` is appended verbatim (e.g. `-thumb.jpg` or
/// `.png`).
///
/// Pure and total: identical arguments always yield identical output, and
/// there are no error conditions.
pub fn derive_name(file_name: &str, parent_dir_name: Option<&str>, suffix: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);

    let stem = sanitize_stem(stem);

    match parent_dir_name {
        Some(parent) => format!("{}-{}{}", sanitize_stem(parent), stem, suffix),
        None => format!("{}{}", stem, suffix),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_hyphenates() {
        assert_eq!(sanitize_stem("My Report (final)"), "my-report-final");
        assert_eq!(sanitize_stem("Conveyor Belt v2.1"), "conveyor-belt-v2-1");
    }

    #[test]
    fn collapses_runs_and_strips_edges() {
        assert_eq!(sanitize_stem("--Hello___World!!"), "hello-world");
        assert_eq!(sanitize_stem("  spaced  out  "), "spaced-out");
    }

    #[test]
    fn non_ascii_becomes_hyphen() {
        assert_eq!(sanitize_stem("café menu"), "caf-menu");
    }

    #[test]
    fn empty_after_sanitising_falls_back() {
        assert_eq!(sanitize_stem("###"), "untitled");
        assert_eq!(sanitize_stem(""), "untitled");
    }

    #[test]
    fn derive_name_is_deterministic() {
        let a = derive_name("My Report (final).pdf", None, "-thumb.jpg");
        let b = derive_name("My Report (final).pdf", None, "-thumb.jpg");
        assert_eq!(a, b);
        assert_eq!(a, "my-report-final-thumb.jpg");
    }

    #[test]
    fn derive_name_charset_invariant() {
        // Everything before the suffix must be [a-z0-9-] with no edge hyphens.
        for input in ["WEIRD  name!!.pdf", "123.pdf", "übung.pdf", "a b c.PDF"] {
            let name = derive_name(input, None, ".png");
            let stem = name.strip_suffix(".png").unwrap();
            assert!(
                stem.chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
                "bad chars in {stem:?} from {input:?}"
            );
            assert!(!stem.starts_with('-') && !stem.ends_with('-'), "edge hyphen in {stem:?}");
            assert!(!stem.is_empty());
        }
    }

    #[test]
    fn parent_dir_prefixes_the_stem() {
        assert_eq!(
            derive_name("spec.pdf", Some("Conveyor Project"), "-thumb.jpg"),
            "conveyor-project-spec-thumb.jpg"
        );
    }

    #[test]
    fn collision_case_maps_variants_to_same_name() {
        // Documented naming collision: case/punctuation variants sanitise
        // identically. The pipeline does not resolve this.
        let a = derive_name("My Report (final).pdf", None, ".png");
        let b = derive_name("my-report-final.pdf", None, ".png");
        assert_eq!(a, b);
    }
}
