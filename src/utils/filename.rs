//! Filename-embedded metadata extraction.
//!
//! Recording start times and excerpt offset windows are carried in the
//! underscore-delimited components of audio and annotation filenames.
//! Both the log parser and the annotation loader resolve them through
//! this module so the two cannot drift apart.

use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::constants::filenames::{
    ANNOTATION_SUFFIX, AUDIO_EXTENSION, DATE_FORMAT, LOG_SUFFIX, MS_SUFFIX, TIME_FORMAT,
};
use crate::error::{Error, Result};

/// Resolve the recording start time embedded in a filename stem.
///
/// Scans underscore-delimited components left to right for the first
/// one that parses as a `YYYYMMDD` date; the immediately following
/// component must parse as `HHMMSS`. Anything else fails with
/// [`Error::MalformedFilename`].
pub fn recording_start_time(stem: &str) -> Result<NaiveDateTime> {
    let components: Vec<&str> = stem.split('_').collect();
    for (idx, component) in components.iter().enumerate() {
        let Ok(date) = NaiveDate::parse_from_str(component, DATE_FORMAT) else {
            continue;
        };
        let time = components
            .get(idx + 1)
            .and_then(|c| NaiveTime::parse_from_str(c, TIME_FORMAT).ok())
            .ok_or_else(|| Error::MalformedFilename {
                name: stem.to_string(),
            })?;
        return Ok(NaiveDateTime::new(date, time));
    }
    Err(Error::MalformedFilename {
        name: stem.to_string(),
    })
}

/// Extract the excerpt offset window from a multiclass filename stem.
///
/// The first underscore component has the shape
/// `<label>-<startMs>ms-<endMs>ms`; the millisecond values are returned
/// as seconds.
pub fn excerpt_offset(stem: &str) -> Result<(f64, f64)> {
    let malformed = || Error::MalformedExcerptOffset {
        name: stem.to_string(),
    };

    let first = stem.split('_').next().ok_or_else(malformed)?;
    let mut parts = first.split('-');
    let _label = parts.next().ok_or_else(malformed)?;
    let start = parse_offset_ms(parts.next().ok_or_else(malformed)?).ok_or_else(malformed)?;
    let end = parse_offset_ms(parts.next().ok_or_else(malformed)?).ok_or_else(malformed)?;
    Ok((start, end))
}

/// Parse one `<value>ms` token into seconds.
fn parse_offset_ms(token: &str) -> Option<f64> {
    let value: f64 = token.strip_suffix(MS_SUFFIX)?.parse().ok()?;
    Some(value / 1000.0)
}

/// Base name of a path with a known suffix removed.
fn stem_of(path: &Path, suffix: &str) -> String {
    let base = path
        .file_name()
        .map_or_else(String::new, |n| n.to_string_lossy().into_owned());
    match base.strip_suffix(suffix) {
        Some(stripped) => stripped.to_string(),
        None => base,
    }
}

/// Stem of a source audio file (`.wav` removed).
pub fn audio_stem(path: &Path) -> String {
    stem_of(path, AUDIO_EXTENSION)
}

/// Stem of an annotation table (selection table suffix removed).
pub fn annotation_stem(path: &Path) -> String {
    stem_of(path, ANNOTATION_SUFFIX)
}

/// Stem of a prediction log (detector log suffix removed).
pub fn log_stem(path: &Path) -> String {
    stem_of(path, LOG_SUFFIX)
}

/// Join the first `count` underscore components of a stem.
///
/// Used to associate annotation tables with the prediction logs of the
/// same recording.
pub fn leading_component(stem: &str, count: usize) -> String {
    stem.split('_').take(count).collect::<Vec<_>>().join("_")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_start_time_leading_components() {
        let dt = recording_start_time("N9_S00920_20220516_053000").unwrap();
        assert_eq!(dt.to_string(), "2022-05-16 05:30:00");
    }

    #[test]
    fn test_recording_start_time_offset_prefix() {
        let dt = recording_start_time("target-2000ms-5000ms_0_N9_S00920_20220516_053000").unwrap();
        assert_eq!(dt.to_string(), "2022-05-16 05:30:00");
    }

    #[test]
    fn test_recording_start_time_no_date_token() {
        let result = recording_start_time("N9_S00920_recording");
        assert!(matches!(result, Err(Error::MalformedFilename { .. })));
    }

    #[test]
    fn test_recording_start_time_date_without_time() {
        // A valid date followed by a non-time component must not resolve.
        let result = recording_start_time("N9_20220516_badtoken");
        assert!(matches!(result, Err(Error::MalformedFilename { .. })));
    }

    #[test]
    fn test_recording_start_time_skips_invalid_date_like_tokens() {
        // 20221301 is 8 digits but not a calendar date; the scan moves on.
        let dt = recording_start_time("20221301_20220516_053000").unwrap();
        assert_eq!(dt.to_string(), "2022-05-16 05:30:00");
    }

    #[test]
    fn test_excerpt_offset() {
        let (start, end) = excerpt_offset("target-2000ms-5500ms_0_N9_20220516_053000").unwrap();
        assert_eq!(start, 2.0);
        assert_eq!(end, 5.5);
    }

    #[test]
    fn test_excerpt_offset_missing_token() {
        let result = excerpt_offset("N9_S00920_20220516_053000");
        assert!(matches!(result, Err(Error::MalformedExcerptOffset { .. })));
    }

    #[test]
    fn test_stems() {
        assert_eq!(
            audio_stem(Path::new("/data/N9_20220516_053000.wav")),
            "N9_20220516_053000"
        );
        assert_eq!(
            annotation_stem(Path::new(
                "/gt/N9_S00920_20220516_053000.Table.1.selections.FINAL.txt"
            )),
            "N9_S00920_20220516_053000"
        );
        assert_eq!(
            log_stem(Path::new("/p1/N9_20220516_053000_predict_output.log")),
            "N9_20220516_053000"
        );
    }

    #[test]
    fn test_leading_component() {
        assert_eq!(
            leading_component("N9_S00920_20220516_053000", 3),
            "N9_S00920_20220516"
        );
        assert_eq!(leading_component("short", 3), "short");
    }
}
