//! Zero-allocation BEDPE field parsing.
//!
//! These functions work on raw byte slices so ingestion does not allocate
//! per field; only chromosome names are copied into the final record.

use memchr::memchr;

/// Number of tab-separated fields in a PET row.
pub const BEDPE_FIELDS: usize = 7;

/// Fast i64 parsing - no allocation, no error formatting.
///
/// Accepts an optional leading `-`. Returns None if the input is empty,
/// contains non-digit characters, or overflows.
#[inline(always)]
pub fn parse_i64_fast(bytes: &[u8]) -> Option<i64> {
    let (negative, digits) = match bytes.split_first() {
        Some((b'-', rest)) => (true, rest),
        Some(_) => (false, bytes),
        None => return None,
    };
    if digits.is_empty() {
        return None;
    }
    let mut n: i64 = 0;
    for &b in digits {
        let d = b.wrapping_sub(b'0');
        if d > 9 {
            return None;
        }
        n = n.checked_mul(10)?;
        n = if negative {
            n.checked_sub(d as i64)?
        } else {
            n.checked_add(d as i64)?
        };
    }
    Some(n)
}

/// Split a line into exactly seven tab-separated fields using memchr.
///
/// On a field-count mismatch returns `Err` with the number of fields found.
#[inline]
pub fn split_bedpe_fields(line: &[u8]) -> Result<[&[u8]; BEDPE_FIELDS], usize> {
    let mut fields: [&[u8]; BEDPE_FIELDS] = [&[]; BEDPE_FIELDS];
    let mut rest = line;
    let mut found = 0;

    loop {
        let (field, next) = match memchr(b'\t', rest) {
            Some(tab) => (&rest[..tab], Some(&rest[tab + 1..])),
            None => (rest, None),
        };
        if found < BEDPE_FIELDS {
            fields[found] = field;
        }
        found += 1;
        match next {
            Some(next) => rest = next,
            None => break,
        }
    }

    if found == BEDPE_FIELDS {
        Ok(fields)
    } else {
        Err(found)
    }
}

/// Strip a trailing carriage return.
#[inline(always)]
pub fn trim_line_end(line: &[u8]) -> &[u8] {
    match line.split_last() {
        Some((b'\r', rest)) => rest,
        _ => line,
    }
}

/// Check if a line should be skipped (blank or comment).
#[inline(always)]
pub fn should_skip_line(line: &[u8]) -> bool {
    line.iter().all(|b| b.is_ascii_whitespace()) || line[0] == b'#'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_i64_fast() {
        assert_eq!(parse_i64_fast(b"12345"), Some(12345));
        assert_eq!(parse_i64_fast(b"0"), Some(0));
        assert_eq!(parse_i64_fast(b"-42"), Some(-42));
        assert_eq!(parse_i64_fast(b""), None);
        assert_eq!(parse_i64_fast(b"-"), None);
        assert_eq!(parse_i64_fast(b"abc"), None);
        assert_eq!(parse_i64_fast(b"123abc"), None);
        assert_eq!(parse_i64_fast(b"9223372036854775807"), Some(i64::MAX));
        assert_eq!(parse_i64_fast(b"-9223372036854775808"), Some(i64::MIN));
        assert_eq!(parse_i64_fast(b"9223372036854775808"), None);
    }

    #[test]
    fn test_split_bedpe_fields() {
        let fields = split_bedpe_fields(b"chr1\t100\t200\tchr1\t5000\t5100\t3").unwrap();
        assert_eq!(fields[0], b"chr1");
        assert_eq!(fields[4], b"5000");
        assert_eq!(fields[6], b"3");

        assert_eq!(split_bedpe_fields(b"chr1\t100\t200").unwrap_err(), 3);
        assert_eq!(
            split_bedpe_fields(b"chr1\t1\t2\tchr1\t3\t4\t5\textra").unwrap_err(),
            8
        );
    }

    #[test]
    fn test_trim_line_end() {
        assert_eq!(trim_line_end(b"abc\r"), b"abc");
        assert_eq!(trim_line_end(b"abc"), b"abc");
        assert_eq!(trim_line_end(b""), b"");
    }

    #[test]
    fn test_should_skip_line() {
        assert!(should_skip_line(b""));
        assert!(should_skip_line(b"   "));
        assert!(should_skip_line(b"#comment"));
        assert!(!should_skip_line(b"chr1\t100\t200\tchr1\t5000\t5100\t3"));
    }
}
