use crate::error::{ProcessingError, Result};
use crate::readers::format::{format_timestamp, parse_timestamp};
use crate::readers::text::read_lossy;
use crate::utils::constants::{CSV_EXTENSION, SANGVOR_SKIP_LINES};
use crate::utils::filename::{is_offset_output, offset_output_path};
use chrono::TimeDelta;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

const OFFSET_UNITS: [&str; 4] = ["d", "h", "min", "sec"];

/// Parse an offset such as `438d 3h 29min 29sec`.
///
/// Whitespace is ignored. Each unit is optional but they must appear in the
/// order d, h, min, sec, and at least one must be present.
///
/// # Examples
/// ```
/// use groundtemp_processor::processors::time_offset::parse_offset;
///
/// let offset = parse_offset("1d 2h").unwrap();
/// assert_eq!(offset.num_hours(), 26);
/// ```
pub fn parse_offset(offset_str: &str) -> Result<TimeDelta> {
    let compact: String = offset_str.chars().filter(|c| !c.is_whitespace()).collect();
    let invalid = |reason: &str| {
        ProcessingError::InvalidOffset(format!("'{}' ({})", offset_str, reason))
    };

    if compact.is_empty() {
        return Err(invalid("empty"));
    }

    let mut total = TimeDelta::zero();
    let mut next_unit = 0;
    let mut rest = compact.as_str();

    while !rest.is_empty() {
        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| invalid("number without unit"))?;
        if digits_end == 0 {
            return Err(invalid("expected a number"));
        }
        let value: i64 = rest[..digits_end]
            .parse()
            .map_err(|_| invalid("number too large"))?;
        rest = &rest[digits_end..];

        let unit_end = rest
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(rest.len());
        let unit = &rest[..unit_end];
        rest = &rest[unit_end..];

        let position = OFFSET_UNITS
            .iter()
            .position(|u| *u == unit)
            .ok_or_else(|| invalid("unknown unit"))?;
        if position < next_unit {
            return Err(invalid("units must be ordered d, h, min, sec"));
        }
        next_unit = position + 1;

        let component = match position {
            0 => TimeDelta::try_days(value),
            1 => TimeDelta::try_hours(value),
            2 => TimeDelta::try_minutes(value),
            _ => TimeDelta::try_seconds(value),
        }
        .ok_or_else(|| invalid("offset out of range"))?;

        total = total
            .checked_add(&component)
            .ok_or_else(|| invalid("offset out of range"))?;
    }

    Ok(total)
}

/// Shifts timestamps of sangvor exports by a fixed offset
pub struct OffsetRewriter {
    offset: TimeDelta,
    skip_lines: usize,
}

impl OffsetRewriter {
    pub fn new(offset: TimeDelta) -> Self {
        Self {
            offset,
            skip_lines: SANGVOR_SKIP_LINES,
        }
    }

    pub fn with_skip_lines(mut self, skip_lines: usize) -> Self {
        self.skip_lines = skip_lines;
        self
    }

    /// Rewrite one data line (without its newline). Lines that do not start
    /// with a parsable timestamp come back unchanged.
    pub fn rewrite_line(&self, line: &str) -> String {
        let Some((first, rest)) = line.split_once(';') else {
            return line.to_string();
        };

        parse_timestamp(first)
            .and_then(|dt| dt.checked_add_signed(self.offset))
            .map(|shifted| format!("{};{}", format_timestamp(&shifted), rest))
            .unwrap_or_else(|| line.to_string())
    }

    /// Header lines copied byte for byte; every later line rewritten and
    /// terminated with `\n`. Files read through [`read_lossy`] already have
    /// `\n` endings.
    pub fn rewrite_content(&self, content: &str) -> String {
        let mut output = String::with_capacity(content.len());

        for (index, line) in content.split_inclusive('\n').enumerate() {
            if index < self.skip_lines {
                output.push_str(line);
                continue;
            }

            let body = line.strip_suffix('\n').unwrap_or(line);
            output.push_str(&self.rewrite_line(body));
            output.push('\n');
        }

        output
    }

    /// Write `{stem}_offset{suffix}` next to the input and return its path
    pub fn rewrite_file(&self, path: &Path) -> Result<PathBuf> {
        let content = read_lossy(path)?;
        let output_path = offset_output_path(path);

        let mut writer = BufWriter::new(File::create(&output_path)?);
        writer.write_all(self.rewrite_content(&content).as_bytes())?;
        writer.flush()?;

        Ok(output_path)
    }

    /// Rewrite every `*.csv` directly inside `dir`, skipping earlier outputs
    pub fn rewrite_dir(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path
                        .extension()
                        .map(|ext| ext == CSV_EXTENSION)
                        .unwrap_or(false)
            })
            .collect();
        files.sort();

        info!(
            "Processing {} files in {} with offset {}",
            files.len(),
            dir.display(),
            self.offset
        );

        let mut written = Vec::new();
        for path in files {
            if is_offset_output(&path) {
                info!("  Skipping {} (already offset)", path.display());
                continue;
            }

            let name = path.file_name().map(|f| f.to_string_lossy()).unwrap_or_default();
            info!("  Processing {}", name);
            written.push(self.rewrite_file(&path)?);
        }

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_parse_offset() {
        let full = parse_offset("438d 3h 29min 29sec").unwrap();
        assert_eq!(full.num_seconds(), 438 * 86_400 + 3 * 3_600 + 29 * 60 + 29);

        assert_eq!(parse_offset("1d 2h").unwrap().num_hours(), 26);
        assert_eq!(parse_offset("90min").unwrap().num_minutes(), 90);
        assert_eq!(parse_offset(" 45 sec ").unwrap().num_seconds(), 45);
        assert_eq!(parse_offset("0d").unwrap(), TimeDelta::zero());
    }

    #[test]
    fn test_parse_offset_rejects_malformed() {
        for bad in ["", "   ", "garbage", "5", "d", "3h 1d", "1d 1d", "2w", "1.5h", "-1d", "1d x"] {
            assert!(parse_offset(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_rewrite_line() {
        let rewriter = OffsetRewriter::new(parse_offset("1d 2h").unwrap());

        assert_eq!(
            rewriter.rewrite_line("01.01.2020 00:00:00;5.0"),
            "02.01.2020 02:00:00;5.0"
        );
        assert_eq!(
            rewriter.rewrite_line("31.12.2020 23:00:00;-1.5;87"),
            "02.01.2021 01:00:00;-1.5;87"
        );
        // Unparsable lines pass through untouched
        assert_eq!(rewriter.rewrite_line("Date;Temp"), "Date;Temp");
        assert_eq!(rewriter.rewrite_line("no separator"), "no separator");
        assert_eq!(rewriter.rewrite_line(""), "");
    }

    #[test]
    fn test_header_lines_copied_verbatim() {
        let rewriter = OffsetRewriter::new(parse_offset("1d 2h").unwrap()).with_skip_lines(2);
        let content = "01.01.2020 00:00:00;1.0\r\nSerial;X\n01.01.2020 00:00:00;5.0\nbad;row\n";

        assert_eq!(
            rewriter.rewrite_content(content),
            "01.01.2020 00:00:00;1.0\r\nSerial;X\n02.01.2020 02:00:00;5.0\nbad;row\n"
        );
    }

    #[test]
    fn test_data_lines_get_newline() {
        let rewriter = OffsetRewriter::new(parse_offset("1h").unwrap()).with_skip_lines(0);
        assert_eq!(
            rewriter.rewrite_content("01.01.2020 00:00:00;5.0"),
            "01.01.2020 01:00:00;5.0\n"
        );
    }

    #[test]
    fn test_rewrite_dir() -> Result<()> {
        let dir = TempDir::new()?;
        let mut content = String::new();
        for i in 0..22 {
            content.push_str(&format!("header {}\n", i));
        }
        content.push_str("01.01.2020 00:00:00;5.0\n");
        std::fs::write(dir.path().join("2005-0070_20220907_0332.csv"), &content)?;
        std::fs::write(dir.path().join("notes.txt"), "ignored")?;

        let rewriter = OffsetRewriter::new(parse_offset("1d 2h")?);
        let written = rewriter.rewrite_dir(dir.path())?;
        assert_eq!(written.len(), 1);

        let output = std::fs::read_to_string(&written[0])?;
        assert!(output.starts_with("header 0\n"));
        assert!(output.ends_with("header 21\n02.01.2020 02:00:00;5.0\n"));
        assert_eq!(
            written[0].file_name().unwrap().to_string_lossy(),
            "2005-0070_20220907_0332_offset.csv"
        );

        // A second run leaves existing outputs alone
        let again = rewriter.rewrite_dir(dir.path())?;
        assert_eq!(again, written);

        Ok(())
    }

    #[test]
    fn test_rewrite_file_with_carriage_returns() -> Result<()> {
        let dir = TempDir::new()?;
        let input = dir.path().join("2005-0070_20220907_0332.csv");
        std::fs::write(&input, "Serial;X\rDate;Temp\r01.01.2020 00:00:00;5.0\r")?;

        let rewriter = OffsetRewriter::new(parse_offset("1d 2h")?).with_skip_lines(2);
        let output = std::fs::read_to_string(rewriter.rewrite_file(&input)?)?;
        assert_eq!(output, "Serial;X\nDate;Temp\n02.01.2020 02:00:00;5.0\n");

        Ok(())
    }
}
