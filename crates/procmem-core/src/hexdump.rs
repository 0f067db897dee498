//! Hexdump rendering with zero-row compression.
//!
//! # Output Format
//!
//! ```text
//! 00007ffd4a1e0000  48 65 6c 6c 6f 20 57 6f  72 6c 64 00 00 00 00 00  |Hello.World.....|
//!   -- skipped zeroes: 3
//! 00007ffd4a1e0040  01 00 00 00 00 00 00 00  00 00 00 00 00 00 00 00  |................|
//! ```
//!
//! Rows made only of zero bytes are not printed; a run of them is replaced
//! by a single `skipped zeroes` line.

use std::io::{self, Write};

use crate::config::hexdump::CLUSTER_SIZE;

/// Write the hexdump of `buf` to `out` row by row, numbering rows from `offset`.
///
/// Fails with `InvalidInput` when `width` is zero.
pub fn write_hex<W: Write>(out: &mut W, buf: &[u8], offset: u64, width: usize) -> io::Result<()> {
    if width == 0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "hexdump width must be at least 1",
        ));
    }

    let mut skipped_zeroes = 0usize;

    for (i, row) in buf.chunks(width).enumerate() {
        if row.iter().all(|&b| b == 0) {
            skipped_zeroes += 1;
            continue;
        }
        if skipped_zeroes != 0 {
            writeln!(out, "{}", skipped_line(skipped_zeroes))?;
            skipped_zeroes = 0;
        }

        let addr = offset.wrapping_add((i * width) as u64);
        writeln!(out, "{}", format_row(addr, row, width))?;
    }

    if skipped_zeroes != 0 {
        writeln!(out, "{}", skipped_line(skipped_zeroes))?;
    }

    Ok(())
}

/// Collect the hexdump of `buf` as lines.
pub fn render(buf: &[u8], offset: u64, width: usize) -> io::Result<Vec<String>> {
    let mut out = Vec::new();
    write_hex(&mut out, buf, offset, width)?;
    Ok(String::from_utf8_lossy(&out).lines().map(str::to_string).collect())
}

fn skipped_line(count: usize) -> String {
    format!("  -- skipped zeroes: {}", count)
}

/// Width in characters of the byte column of a full row.
fn column_width(width: usize) -> usize {
    let clusters = width.div_ceil(CLUSTER_SIZE);
    width * 3 - 1 + (clusters - 1)
}

fn format_row(addr: u64, row: &[u8], width: usize) -> String {
    let column = row
        .chunks(CLUSTER_SIZE)
        .map(|cluster| {
            cluster
                .iter()
                .map(|b| format!("{:02x}", b))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("  ");

    let gutter: String = row
        .iter()
        .map(|&b| if b.is_ascii_graphic() { b as char } else { '.' })
        .collect();

    format!(
        "{:016x}  {:<cw$}  |{:<gw$}|",
        addr,
        column,
        gutter,
        cw = column_width(width),
        gw = width
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_zero_buffer() {
        let lines = render(&[0u8; 32], 0, 16).unwrap();
        assert_eq!(lines, vec!["  -- skipped zeroes: 2".to_string()]);
    }

    #[test]
    fn test_zero_rows_between_data() {
        let mut buf = vec![0x41u8; 16];
        buf.extend([0u8; 16]);
        buf.extend([0x42u8; 16]);

        let lines = render(&buf, 0x1000, 16).unwrap();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("0000000000001000  41 41"));
        assert!(lines[0].ends_with("|AAAAAAAAAAAAAAAA|"));
        assert_eq!(lines[1], "  -- skipped zeroes: 1");
        assert!(lines[2].starts_with("0000000000001020  42 42"));
        assert!(lines[2].ends_with("|BBBBBBBBBBBBBBBB|"));
    }

    #[test]
    fn test_full_row_layout() {
        let lines = render(b"Hello World!\x00\x01\x7f\xff", 0x10, 16).unwrap();
        assert_eq!(
            lines,
            vec![
                "0000000000000010  48 65 6c 6c 6f 20 57 6f  72 6c 64 21 00 01 7f ff  |Hello.World!....|"
                    .to_string()
            ]
        );
    }

    #[test]
    fn test_short_row_is_padded() {
        let full = render(&[0x41u8; 16], 0, 16).unwrap();
        let short = render(&[0x41u8; 3], 0, 16).unwrap();
        assert_eq!(short[0].len(), full[0].len());
        assert!(short[0].ends_with(&format!("|AAA{}|", " ".repeat(13))));
        assert!(short[0].starts_with("0000000000000000  41 41 41   "));
    }

    #[test]
    fn test_trailing_zero_rows_flushed() {
        let mut buf = vec![1u8; 8];
        buf.extend([0u8; 24]);
        let lines = render(&buf, 0, 8).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "  -- skipped zeroes: 3");
    }

    #[test]
    fn test_other_widths() {
        let lines = render(&[0x30u8; 4], 0, 4).unwrap();
        assert_eq!(lines, vec!["0000000000000000  30 30 30 30  |0000|".to_string()]);

        let lines = render(&[0x31u8; 32], 0, 32).unwrap();
        assert_eq!(lines.len(), 1);
        // one separator after the address plus three between clusters
        assert_eq!(lines[0].matches("  31").count(), 4);
    }

    #[test]
    fn test_empty_buffer() {
        assert!(render(&[], 0, 16).unwrap().is_empty());
    }

    #[test]
    fn test_zero_width_rejected() {
        let err = write_hex(&mut Vec::new(), b"abc", 0, 0).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert!(render(b"abc", 0, 0).is_err());
    }

    #[test]
    fn test_large_buffer_streams_to_sink() {
        let mut buf = vec![0x41u8; 1 << 20];
        buf[1 << 18..1 << 19].fill(0);
        write_hex(&mut io::sink(), &buf, 0, 16).unwrap();

        // a writer that stops accepting data aborts the dump at that row
        let mut limited = [0u8; 100];
        let err = write_hex(&mut &mut limited[..], &buf, 0, 16).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WriteZero);
        assert!(limited.starts_with(b"0000000000000000  41 41"));
    }

    #[test]
    fn test_write_hex() {
        let mut out = Vec::new();
        write_hex(&mut out, &[0x41; 2], 0, 16).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with(&format!("|AA{}|\n", " ".repeat(14))));
    }
}
