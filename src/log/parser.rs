//! Prediction log parsing.
//!
//! Detector logs are semi-structured text: a header line naming the
//! source audio file, then a mix of uninteresting lines and frame
//! lines, where multiclass frame lines are followed by a class score
//! block. Parsing runs as a small state machine over the line
//! iterator so truncated or malformed files fail with typed errors
//! instead of index panics.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use chrono::NaiveDateTime;

use crate::constants::log_format::{
    FIELD_SEPARATOR, FRAME_MARKER, NEGATIVE_LABEL, OUTPUT_LAYER_MARKER, POSITIVE_LABEL,
};
use crate::error::{Error, Result};
use crate::log::frame::{LogMode, ParseOptions, PredictionFrame, PredictionLog};
use crate::utils::filename;

/// Parser states.
enum State {
    /// Waiting for the header line with the source audio path.
    ExpectHeader,
    /// Waiting for the next frame line (non-matching lines are skipped).
    ExpectFrame,
    /// Inside a multiclass class score block.
    ExpectClassLine {
        /// Frame awaiting its class scores.
        pending: PredictionFrame,
        /// Whether the optional `output_layer` marker may still appear.
        at_block_start: bool,
    },
    /// Input consumed.
    Done,
}

/// Header metadata resolved from the log's first line.
struct Header {
    source_audio_path: String,
    recording_start_time: NaiveDateTime,
    excerpt_offset: Option<(f64, f64)>,
}

/// Parse one detector log file.
///
/// Total and deterministic for well-formed input: every line matching
/// the frame pattern yields exactly one frame, in file order.
///
/// # Errors
///
/// - [`Error::MalformedFilename`] / [`Error::MalformedExcerptOffset`]
///   when the source audio filename carries no usable date/time or
///   offset token.
/// - [`Error::TruncatedLog`] when a frame field or class block is
///   missing or unparseable where the format requires one.
pub fn parse_log(path: &Path, options: ParseOptions) -> Result<PredictionLog> {
    let file = File::open(path).map_err(|e| Error::LogRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let reader = BufReader::new(file);

    let mut header: Option<Header> = None;
    let mut frames: Vec<PredictionFrame> = Vec::new();
    let mut state = State::ExpectHeader;

    let mut lines = reader.lines().enumerate();
    while !matches!(state, State::Done) {
        let Some((idx, line)) = lines.next() else {
            // End of input: only states with nothing pending may finish.
            state = match state {
                State::ExpectHeader => {
                    return Err(Error::TruncatedLog {
                        path: path.to_path_buf(),
                        message: "empty log, expected header line".to_string(),
                    });
                }
                State::ExpectClassLine { .. } => {
                    return Err(Error::TruncatedLog {
                        path: path.to_path_buf(),
                        message: "class score block not terminated by a blank line".to_string(),
                    });
                }
                State::ExpectFrame | State::Done => State::Done,
            };
            continue;
        };
        let line = line.map_err(|e| Error::LogRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        state = match state {
            State::ExpectHeader => {
                header = Some(parse_header(&line, options)?);
                State::ExpectFrame
            }
            State::ExpectFrame => {
                if line.contains(FRAME_MARKER) {
                    let frame = parse_frame_line(&line, idx, options, path)?;
                    if options.mode == LogMode::Multiclass {
                        State::ExpectClassLine {
                            pending: frame,
                            at_block_start: true,
                        }
                    } else {
                        frames.push(frame);
                        State::ExpectFrame
                    }
                } else {
                    State::ExpectFrame
                }
            }
            State::ExpectClassLine {
                mut pending,
                at_block_start,
            } => {
                if at_block_start && line.contains(OUTPUT_LAYER_MARKER) {
                    State::ExpectClassLine {
                        pending,
                        at_block_start: false,
                    }
                } else if line.trim().is_empty() {
                    frames.push(pending);
                    State::ExpectFrame
                } else {
                    let (class, score) = parse_class_line(&line, idx, path)?;
                    pending.class_scores.push((class, score));
                    State::ExpectClassLine {
                        pending,
                        at_block_start: false,
                    }
                }
            }
            State::Done => State::Done,
        };
    }

    let header = header.ok_or_else(|| Error::TruncatedLog {
        path: path.to_path_buf(),
        message: "missing header line".to_string(),
    })?;

    Ok(PredictionLog {
        file_path: path.to_path_buf(),
        source_audio_path: header.source_audio_path,
        mode: options.mode,
        recording_start_time: header.recording_start_time,
        excerpt_offset: header.excerpt_offset,
        frames,
    })
}

/// Extract the payload after the final `|` delimiter.
fn line_content(line: &str) -> &str {
    line.rsplit('|').next().unwrap_or(line)
}

/// Split one `key=value` pair, returning the trimmed value.
fn key_value(pair: &str) -> Option<(&str, &str)> {
    let (key, value) = pair.split_once('=')?;
    Some((key, value.trim_end()))
}

/// Parse the header line: source audio path plus the metadata embedded
/// in its filename.
fn parse_header(line: &str, options: ParseOptions) -> Result<Header> {
    let source_audio_path = line_content(line).trim().to_string();

    let stem = filename::audio_stem(Path::new(&source_audio_path));
    let recording_start_time = filename::recording_start_time(&stem)?;
    let excerpt_offset = if options.mode == LogMode::Multiclass {
        Some(filename::excerpt_offset(&stem)?)
    } else {
        None
    };

    Ok(Header {
        source_audio_path,
        recording_start_time,
        excerpt_offset,
    })
}

/// Parse one frame line into a [`PredictionFrame`].
fn parse_frame_line(
    line: &str,
    idx: usize,
    options: ParseOptions,
    path: &Path,
) -> Result<PredictionFrame> {
    let truncated = |message: String| Error::TruncatedLog {
        path: path.to_path_buf(),
        message: format!("line {}: {message}", idx + 1),
    };

    let content = line_content(line);
    let fields: Vec<&str> = content.split(FIELD_SEPARATOR).collect();

    let (_, time) = fields
        .first()
        .and_then(|f| key_value(f))
        .ok_or_else(|| truncated("missing time field".to_string()))?;
    let (start_t, end_t) = parse_time_span(time)
        .ok_or_else(|| truncated(format!("unparseable time span '{time}'")))?;
    if start_t > end_t {
        return Err(truncated(format!(
            "frame start {start_t} is after frame end {end_t}"
        )));
    }

    let decision: i64 = fields
        .get(1)
        .and_then(|f| key_value(f))
        .and_then(|(_, v)| v.parse().ok())
        .ok_or_else(|| truncated("missing or unparseable decision field".to_string()))?;

    let (class_label, probability) = match options.mode {
        LogMode::Binary => {
            let prob = parse_probability(fields.get(2))
                .ok_or_else(|| truncated("missing or unparseable probability field".to_string()))?;
            let label = if options.positivity.is_positive(prob, decision) {
                POSITIVE_LABEL
            } else {
                NEGATIVE_LABEL
            };
            (label.to_string(), prob)
        }
        LogMode::Multiclass => {
            let (_, label) = fields
                .get(2)
                .and_then(|f| key_value(f))
                .ok_or_else(|| truncated("missing class field".to_string()))?;
            let prob = parse_probability(fields.get(3))
                .ok_or_else(|| truncated("missing or unparseable probability field".to_string()))?;
            (label.to_string(), prob)
        }
    };

    Ok(PredictionFrame {
        start_t,
        end_t,
        predicted_positive: options.positivity.is_positive(probability, decision),
        class_label,
        probability,
        class_scores: Vec::new(),
    })
}

/// Parse a `prob=<float>` field, tolerating a trailing semicolon.
fn parse_probability(field: Option<&&str>) -> Option<f64> {
    let (_, value) = key_value(field?)?;
    value.trim_end_matches(';').parse().ok()
}

/// Parse a `<start>-<end>` time span.
fn parse_time_span(value: &str) -> Option<(f64, f64)> {
    let (start, end) = value.split_once('-')?;
    Some((start.parse().ok()?, end.parse().ok()?))
}

/// Parse one `<class>=<prob>;` line of a class score block.
fn parse_class_line(line: &str, idx: usize, path: &Path) -> Result<(String, f64)> {
    let truncated = |message: String| Error::TruncatedLog {
        path: path.to_path_buf(),
        message: format!("line {}: {message}", idx + 1),
    };

    let (class, value) = line
        .split_once('=')
        .ok_or_else(|| truncated(format!("expected class=probability, got '{line}'")))?;
    let score: f64 = value
        .trim_end()
        .trim_end_matches(';')
        .parse()
        .map_err(|_| truncated(format!("unparseable class probability '{value}'")))?;
    Ok((class.trim().to_string(), score))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::log::frame::Positivity;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_log(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    const BINARY_LOG: &str = "\
2022-12-05 10:01:22|INFO|audio_file|/data/N9_S00920_20220516_053000.wav
2022-12-05 10:01:22|INFO|time=0.0-1.0, pred=1, prob=0.97
2022-12-05 10:01:22|INFO|time=0.5-1.5, pred=0, prob=0.12
some unrelated progress line
2022-12-05 10:01:23|INFO|time=1.0-2.0, pred=1, prob=0.85
";

    #[test]
    fn test_parse_binary_log() {
        let file = write_log(BINARY_LOG);
        let log = parse_log(file.path(), ParseOptions::binary(None)).unwrap();

        assert_eq!(log.frames.len(), 3);
        assert_eq!(log.source_audio_path, "/data/N9_S00920_20220516_053000.wav");
        assert_eq!(log.recording_start_time.to_string(), "2022-05-16 05:30:00");
        assert!(log.excerpt_offset.is_none());

        assert_eq!(log.frames[0].start_t, 0.0);
        assert_eq!(log.frames[0].end_t, 1.0);
        assert!(log.frames[0].predicted_positive);
        assert_eq!(log.frames[0].class_label, "target");
        assert_eq!(log.frames[0].probability, 0.97);
        assert!(log.frames[0].class_scores.is_empty());

        assert!(!log.frames[1].predicted_positive);
        assert_eq!(log.frames[1].class_label, "noise");
    }

    #[test]
    fn test_frames_preserve_file_order() {
        let file = write_log(BINARY_LOG);
        let log = parse_log(file.path(), ParseOptions::binary(None)).unwrap();
        let starts: Vec<f64> = log.frames.iter().map(|f| f.start_t).collect();
        assert_eq!(starts, vec![0.0, 0.5, 1.0]);
        for frame in &log.frames {
            assert!(frame.start_t <= frame.end_t);
        }
    }

    #[test]
    fn test_binary_threshold_overrides_raw_flag() {
        let file = write_log(BINARY_LOG);
        let options = ParseOptions {
            mode: LogMode::Binary,
            positivity: Positivity::Threshold(0.9),
        };
        let log = parse_log(file.path(), options).unwrap();

        // 0.97 > 0.9; 0.12 and 0.85 are not, whatever the raw flag says.
        assert!(log.frames[0].predicted_positive);
        assert!(!log.frames[1].predicted_positive);
        assert!(!log.frames[2].predicted_positive);
        assert_eq!(log.frames[2].class_label, "noise");
    }

    const MULTICLASS_LOG: &str = "\
2022-12-05 10:04:01|INFO|audio_file|/data/target-2000ms-5000ms_0_N9_S00920_20220516_053000.wav
2022-12-05 10:04:01|INFO|time=0.0-0.4, pred=1, class=female, prob=0.81
prediction scores for output_layer:
female=0.81;
male=0.12;
noise=0.07;

2022-12-05 10:04:01|INFO|time=0.2-0.6, pred=1, class=male, prob=0.55

";

    #[test]
    fn test_parse_multiclass_log() {
        let file = write_log(MULTICLASS_LOG);
        let log = parse_log(file.path(), ParseOptions::multiclass()).unwrap();

        assert_eq!(log.frames.len(), 2);
        assert_eq!(log.excerpt_offset, Some((2.0, 5.0)));

        let first = &log.frames[0];
        assert_eq!(first.class_label, "female");
        assert_eq!(first.probability, 0.81);
        assert_eq!(
            first.class_scores,
            vec![
                ("female".to_string(), 0.81),
                ("male".to_string(), 0.12),
                ("noise".to_string(), 0.07)
            ]
        );

        // A frame with an immediately blank block keeps empty scores.
        assert!(log.frames[1].class_scores.is_empty());
    }

    #[test]
    fn test_unterminated_class_block_is_truncated() {
        let contents = "\
header|audio_file|/data/target-0ms-3000ms_0_N9_20220516_053000.wav
x|time=0.0-0.4, pred=1, class=female, prob=0.81
female=0.81;";
        let file = write_log(contents);
        let result = parse_log(file.path(), ParseOptions::multiclass());
        assert!(matches!(result, Err(Error::TruncatedLog { .. })));
    }

    #[test]
    fn test_missing_probability_field_is_truncated() {
        let contents = "\
header|audio_file|/data/N9_20220516_053000.wav
x|time=0.0-1.0, pred=1
";
        let file = write_log(contents);
        let result = parse_log(file.path(), ParseOptions::binary(None));
        assert!(matches!(result, Err(Error::TruncatedLog { .. })));
    }

    #[test]
    fn test_malformed_audio_filename() {
        let contents = "header|audio_file|/data/no-date-here.wav\n";
        let file = write_log(contents);
        let result = parse_log(file.path(), ParseOptions::binary(None));
        assert!(matches!(result, Err(Error::MalformedFilename { .. })));
    }

    #[test]
    fn test_multiclass_filename_without_offset_token() {
        let contents = "header|audio_file|/data/N9_S00920_20220516_053000.wav\n";
        let file = write_log(contents);
        let result = parse_log(file.path(), ParseOptions::multiclass());
        assert!(matches!(result, Err(Error::MalformedExcerptOffset { .. })));
    }

    #[test]
    fn test_empty_log_is_truncated() {
        let file = write_log("");
        let result = parse_log(file.path(), ParseOptions::binary(None));
        assert!(matches!(result, Err(Error::TruncatedLog { .. })));
    }
}
