//! Entry ordering and start-index slicing.
//!
//! All orderings are stable: entries with equal keys keep the order they
//! were listed in, whichever direction the sort runs.

use crate::loader::options::SortMethod;
use std::cmp::Reverse;
use std::ffi::OsString;
use std::fs;
use std::path::Path;
use std::time::SystemTime;

/// Sort key built from the first run of ASCII digits in a name.
///
/// Digit runs compare by numeric value at any length. Names without digits
/// get `Missing`, which sorts after every number.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum NumericKey {
    /// A digit run, compared by length then digits.
    Number {
        /// Digit count after stripping leading zeros
        magnitude: usize,
        /// The digits without leading zeros
        digits: String,
    },
    /// No digits in the name
    Missing,
}

/// Strip the final extension the way a path-extension split does: a dot
/// only counts if something other than dots precedes it.
pub fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if name[..idx].chars().any(|c| c != '.') => &name[..idx],
        _ => name,
    }
}

/// Key for numerical ordering: first digit run of the name without extension.
pub fn numeric_key(name: &str) -> NumericKey {
    let stem = strip_extension(name);
    let Some(start) = stem.find(|c: char| c.is_ascii_digit()) else {
        return NumericKey::Missing;
    };
    let run = &stem[start..];
    let end = run
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(run.len());
    let digits = run[..end].trim_start_matches('0');

    NumericKey::Number {
        magnitude: digits.len(),
        digits: digits.to_string(),
    }
}

/// Last-modified time, `None` when it cannot be read. `None` orders first.
fn modified_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Order entry names found in `base` according to `method`.
pub fn sort_entries(mut names: Vec<OsString>, base: &Path, method: SortMethod) -> Vec<OsString> {
    let lossy = |name: &OsString| name.to_string_lossy().into_owned();

    match method {
        SortMethod::None => {}
        SortMethod::AlphabeticalAsc => names.sort_by_cached_key(lossy),
        SortMethod::AlphabeticalDesc => names.sort_by_cached_key(|n| Reverse(lossy(n))),
        SortMethod::NumericalAsc => names.sort_by_cached_key(|n| numeric_key(&lossy(n))),
        SortMethod::NumericalDesc => {
            names.sort_by_cached_key(|n| Reverse(numeric_key(&lossy(n))))
        }
        SortMethod::DatetimeAsc => names.sort_by_cached_key(|n| modified_time(&base.join(n))),
        SortMethod::DatetimeDesc => {
            names.sort_by_cached_key(|n| Reverse(modified_time(&base.join(n))))
        }
    }

    names
}

/// Drop a prefix of `items`, or keep a suffix when `start_index` is negative.
///
/// Out-of-range indices clamp: too large yields nothing, too negative
/// keeps everything.
pub fn slice_from<T>(items: Vec<T>, start_index: i64) -> Vec<T> {
    let len = items.len() as i64;
    let start = if start_index < 0 {
        (len + start_index).max(0)
    } else {
        start_index.min(len)
    };
    items.into_iter().skip(start as usize).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::fs::File;
    use std::time::Duration;
    use tempfile::TempDir;

    fn os(names: &[&str]) -> Vec<OsString> {
        names.iter().map(OsString::from).collect()
    }

    fn sorted(names: &[&str], method: SortMethod) -> Vec<String> {
        sort_entries(os(names), Path::new("."), method)
            .into_iter()
            .map(|n| n.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_numerical_missing_digits_sort_last_ascending() {
        let names = ["img2.png", "img10.png", "img1.png", "cover.png"];
        assert_eq!(
            sorted(&names, SortMethod::NumericalAsc),
            vec!["img1.png", "img2.png", "img10.png", "cover.png"]
        );
    }

    #[test]
    fn test_numerical_missing_digits_sort_first_descending() {
        let names = ["img2.png", "img10.png", "img1.png", "cover.png"];
        assert_eq!(
            sorted(&names, SortMethod::NumericalDesc),
            vec!["cover.png", "img10.png", "img2.png", "img1.png"]
        );
    }

    #[test]
    fn test_numerical_ties_keep_listing_order() {
        let names = ["b7.png", "a07.png", "x.png", "c7.png", "y.png"];
        assert_eq!(
            sorted(&names, SortMethod::NumericalAsc),
            vec!["b7.png", "a07.png", "c7.png", "x.png", "y.png"]
        );
        assert_eq!(
            sorted(&names, SortMethod::NumericalDesc),
            vec!["x.png", "y.png", "b7.png", "a07.png", "c7.png"]
        );
    }

    #[test]
    fn test_numeric_key_ignores_extension_digits() {
        assert_eq!(numeric_key("photo.mp4.png"), numeric_key("photo4.png"));
        assert_eq!(numeric_key("cover.jp2"), NumericKey::Missing);
        assert_eq!(
            numeric_key("frame_0042_v3.png"),
            NumericKey::Number {
                magnitude: 2,
                digits: "42".to_string()
            }
        );
    }

    #[test]
    fn test_numeric_key_handles_huge_numbers() {
        let big = numeric_key("shot99999999999999999999999.png");
        let small = numeric_key("shot99999999999999999999998.png");
        assert!(small < big);
        assert!(big < NumericKey::Missing);
    }

    #[test]
    fn test_alphabetical() {
        let names = ["b.png", "a.png", "c.png"];
        assert_eq!(
            sorted(&names, SortMethod::AlphabeticalAsc),
            vec!["a.png", "b.png", "c.png"]
        );
        assert_eq!(
            sorted(&names, SortMethod::AlphabeticalDesc),
            vec!["c.png", "b.png", "a.png"]
        );
    }

    #[test]
    fn test_alphabetical_is_case_sensitive() {
        let names = ["b.png", "B.png", "a.png"];
        assert_eq!(
            sorted(&names, SortMethod::AlphabeticalAsc),
            vec!["B.png", "a.png", "b.png"]
        );
    }

    #[test]
    fn test_none_keeps_listing_order() {
        let names = ["z.png", "a.png", "m.png"];
        assert_eq!(sorted(&names, SortMethod::None), vec!["z.png", "a.png", "m.png"]);
    }

    #[test]
    fn test_datetime_orders_by_mtime_and_missing_first() {
        let dir = TempDir::new().unwrap();
        let base = SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000);
        for (name, offset) in [("new.png", 300), ("old.png", 100), ("mid.png", 200)] {
            let file = File::create(dir.path().join(name)).unwrap();
            file.set_modified(base + Duration::from_secs(offset)).unwrap();
        }

        let names = os(&["new.png", "gone.png", "old.png", "mid.png"]);
        let asc = sort_entries(names.clone(), dir.path(), SortMethod::DatetimeAsc);
        assert_eq!(asc, os(&["gone.png", "old.png", "mid.png", "new.png"]));

        let desc = sort_entries(names, dir.path(), SortMethod::DatetimeDesc);
        assert_eq!(desc, os(&["new.png", "mid.png", "old.png", "gone.png"]));
    }

    #[test]
    fn test_strip_extension() {
        assert_eq!(strip_extension("img.png"), "img");
        assert_eq!(strip_extension("archive.tar.png"), "archive.tar");
        assert_eq!(strip_extension(".png"), ".png");
        assert_eq!(strip_extension("..png"), "..png");
        assert_eq!(strip_extension("noext"), "noext");
    }

    #[test]
    fn test_slice_from() {
        let items = vec![1, 2, 3, 4, 5];
        assert_eq!(slice_from(items.clone(), 0), vec![1, 2, 3, 4, 5]);
        assert_eq!(slice_from(items.clone(), 2), vec![3, 4, 5]);
        assert_eq!(slice_from(items.clone(), -2), vec![4, 5]);
        assert_eq!(slice_from(items.clone(), 9), Vec::<i32>::new());
        assert_eq!(slice_from(items, -9), vec![1, 2, 3, 4, 5]);
    }

    proptest! {
        #[test]
        fn prop_slice_length(len in 0usize..40, start in -60i64..60) {
            let items: Vec<usize> = (0..len).collect();
            let sliced = slice_from(items.clone(), start);
            let expected = if start < 0 {
                (start.unsigned_abs() as usize).min(len)
            } else {
                len.saturating_sub(start as usize)
            };
            prop_assert_eq!(sliced.len(), expected);
            // Always a suffix of the input
            prop_assert_eq!(&items[len - sliced.len()..], &sliced[..]);
        }

        #[test]
        fn prop_sort_is_permutation(names in prop::collection::vec("[a-z]{0,4}[0-9]{0,3}\\.png", 0..20)) {
            for method in [SortMethod::AlphabeticalAsc, SortMethod::NumericalAsc, SortMethod::NumericalDesc] {
                let input: Vec<OsString> = names.iter().map(OsString::from).collect();
                let mut out = sort_entries(input.clone(), Path::new("."), method);
                let mut expected = input;
                out.sort();
                expected.sort();
                prop_assert_eq!(out, expected);
            }
        }
    }
}
