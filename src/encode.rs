//! Centering, byte wrapping and rendering of the PROGMEM table.

use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Command, ViewBox};

/// Number of header bytes (width, height, line count).
pub const HEADER_LEN: usize = 3;

/// Number of bytes per encoded line segment.
pub const SEGMENT_LEN: usize = 4;

/// Truncate `value` towards zero and keep the low 8 bits of the result
/// (two's complement, so `-1.0` becomes `0xFF`).
///
/// Non-finite values encode as `0x00`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn encode_byte(value: f64) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    value.trunc().rem_euclid(256.0) as u8
}

/// Round to the nearest integer, halves towards positive infinity.
#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn round_half_up(value: f64) -> i64 {
    let rounded = value.round();
    if rounded - value == -0.5 {
        (rounded + 1.0) as i64
    } else {
        rounded as i64
    }
}

/// A line segment relative to the center of the view box.
///
/// `x1`/`y1` is the end point of the line, `x2`/`y2` its start point.
#[derive(Debug, PartialEq, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Segment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Segment {
    /// Center a line command on the view box.
    pub fn centered(command: &Command, view_box: &ViewBox) -> Self {
        let (cx, cy) = view_box.center();
        Self {
            x1: command.to.x - cx,
            y1: command.to.y - cy,
            x2: command.from.x - cx,
            y2: command.from.y - cy,
        }
    }

    /// The four wrapped bytes in table order.
    pub fn bytes(&self) -> [u8; SEGMENT_LEN] {
        [
            encode_byte(self.x1),
            encode_byte(self.y1),
            encode_byte(self.x2),
            encode_byte(self.y2),
        ]
    }

    /// The rounded offsets shown in the row comment.
    fn rounded(&self) -> [i64; SEGMENT_LEN] {
        [
            round_half_up(self.x1),
            round_half_up(self.y1),
            round_half_up(self.x2),
            round_half_up(self.y2),
        ]
    }
}

/// One row of the table body.
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct Row {
    pub segment: Segment,
    /// Whether the row is followed by a comma. False only when the line is
    /// the very last command of the path.
    pub continued: bool,
}

/// The encoded table, ready to be rendered.
#[derive(Debug, PartialEq, Clone)]
pub struct Encoded {
    pub view_box: ViewBox,
    pub rows: Vec<Row>,
}

impl Encoded {
    /// Number of encoded line segments.
    pub fn line_count(&self) -> usize {
        self.rows.len()
    }

    /// Total table size in bytes, header included.
    pub fn byte_count(&self) -> usize {
        self.line_count() * SEGMENT_LEN + HEADER_LEN
    }

    /// The header bytes: width, height and line count.
    #[allow(clippy::cast_possible_truncation)]
    pub fn header(&self) -> [u8; HEADER_LEN] {
        [
            encode_byte(self.view_box.width),
            encode_byte(self.view_box.height),
            (self.line_count() % 256) as u8,
        ]
    }

    /// The raw table, header first.
    pub fn bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.byte_count());
        bytes.extend_from_slice(&self.header());
        for row in &self.rows {
            bytes.extend_from_slice(&row.segment.bytes());
        }
        bytes
    }

    /// Render the table as a `const PROGMEM uint8_t` array named `var_name`.
    ///
    /// `source` is only used in the leading comment.
    pub fn render(&self, source: &str, var_name: &str) -> String {
        let [width, height, lines] = self.header();
        let mut out = String::with_capacity(160 + self.rows.len() * 72);

        out.push_str(&format!(
            "\n// SVG Graphic source: {}\n// Number bytes {}\nconst PROGMEM uint8_t {}[] = {{\n",
            source,
            self.byte_count(),
            var_name
        ));
        out.push_str(&format!("\t0x{:02X},\t// Width ({} px)\n", width, self.view_box.width_text));
        out.push_str(&format!("\t0x{:02X},\t// Height ({} px)\n", height, self.view_box.height_text));
        out.push_str(&format!(
            "\t0x{:02X},\t// Number of rows of coords ({})\n",
            lines,
            self.line_count()
        ));

        for row in &self.rows {
            let [b1, b2, b3, b4] = row.segment.bytes();
            let [x1, y1, x2, y2] = row.segment.rounded();
            let sep = if row.continued { "," } else { "" };
            out.push_str(&format!(
                "\t0x{:02X},\t0x{:02X},\t0x{:02X},\t0x{:02X}{}\t\t// x1:{}, y1:{}, x2:{}, y2:{}",
                b1, b2, b3, b4, sep, x1, y1, x2, y2
            ));
            if row.continued {
                out.push_str(",\n");
            }
        }

        out.push_str("\n};");
        out
    }
}

/// Encode the line commands of `commands` against `view_box`.
///
/// Other commands are skipped, but still count when deciding whether a row
/// is the last one of the path.
pub fn encode(commands: &[Command], view_box: &ViewBox, axis_lines: bool) -> Encoded {
    let last = commands.len().saturating_sub(1);
    let rows: Vec<Row> = commands
        .iter()
        .enumerate()
        .filter(|(_, command)| command.kind.is_line(axis_lines))
        .map(|(index, command)| Row {
            segment: Segment::centered(command, view_box),
            continued: index != last,
        })
        .collect();
    debug!(
        "encode: {} of {} commands are lines",
        rows.len(),
        commands.len()
    );
    Encoded {
        view_box: view_box.clone(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_path;

    fn view_box(width: f64, height: f64) -> ViewBox {
        ViewBox::parse(&format!("0 0 {} {}", width, height)).unwrap()
    }

    #[test]
    fn test_encode_byte() {
        assert_eq!(encode_byte(-1.0), 0xFF);
        assert_eq!(encode_byte(256.0), 0x00);
        assert_eq!(encode_byte(127.9), 0x7F);
        assert_eq!(encode_byte(-128.0), 0x80);
        assert_eq!(encode_byte(-0.5), 0x00);
        assert_eq!(encode_byte(-1.9), 0xFF);
        assert_eq!(encode_byte(300.2), 0x2C);
        assert_eq!(encode_byte(f64::NAN), 0x00);
        assert_eq!(encode_byte(f64::INFINITY), 0x00);
    }

    #[test]
    fn test_encode_byte_periodic() {
        for &value in &[-130.0, -16.0, -1.0, 0.0, 3.0, 99.0, 255.0] {
            for k in -3..=3 {
                let shifted = value + 256.0 * f64::from(k);
                assert_eq!(encode_byte(value), encode_byte(shifted), "{} vs {}", value, shifted);
            }
        }
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-2.6), -3);
        assert_eq!(round_half_up(-0.2), 0);
        assert_eq!(round_half_up(7.49), 7);
    }

    #[test]
    fn test_square() {
        let _ = env_logger::try_init();
        let commands = parse_path("M0,0 L64,0 L64,32 L0,32 Z").unwrap();
        let encoded = encode(&commands, &view_box(64.0, 32.0), false);
        assert_eq!(encoded.line_count(), 3);
        assert_eq!(encoded.byte_count(), 15);
        assert_eq!(encoded.header(), [0x40, 0x20, 0x03]);
        assert_eq!(encoded.rows[0].segment.bytes(), [0x20, 0xF0, 0xE0, 0xF0]);
        assert_eq!(
            encoded.bytes(),
            vec![
                0x40, 0x20, 0x03, //
                0x20, 0xF0, 0xE0, 0xF0, //
                0x20, 0x10, 0x20, 0xF0, //
                0xE0, 0x10, 0x20, 0x10,
            ]
        );
        // The trailing Z keeps a comma on every row.
        assert!(encoded.rows.iter().all(|row| row.continued));
    }

    #[test]
    fn test_render_square() {
        let commands = parse_path("M0,0 L64,0 L64,32 L0,32 Z").unwrap();
        let encoded = encode(&commands, &view_box(64.0, 32.0), false);
        let expected = "
// SVG Graphic source: square.svg
// Number bytes 15
const PROGMEM uint8_t square[] = {
\t0x40,\t// Width (64 px)
\t0x20,\t// Height (32 px)
\t0x03,\t// Number of rows of coords (3)
\t0x20,\t0xF0,\t0xE0,\t0xF0,\t\t// x1:32, y1:-16, x2:-32, y2:-16,
\t0x20,\t0x10,\t0x20,\t0xF0,\t\t// x1:32, y1:16, x2:32, y2:-16,
\t0xE0,\t0x10,\t0x20,\t0x10,\t\t// x1:-32, y1:16, x2:32, y2:16,

};";
        assert_eq!(encoded.render("square.svg", "square"), expected);
    }

    #[test]
    fn test_render_open_path() {
        let commands = parse_path("M0,0 L10,0 L10,10").unwrap();
        let encoded = encode(&commands, &view_box(20.0, 20.0), false);
        let expected = "
// SVG Graphic source: open.svg
// Number bytes 11
const PROGMEM uint8_t open[] = {
\t0x14,\t// Width (20 px)
\t0x14,\t// Height (20 px)
\t0x02,\t// Number of rows of coords (2)
\t0x00,\t0xF6,\t0xF6,\t0xF6,\t\t// x1:0, y1:-10, x2:-10, y2:-10,
\t0x00,\t0x00,\t0x00,\t0xF6\t\t// x1:0, y1:0, x2:0, y2:-10
};";
        assert_eq!(encoded.render("open.svg", "open"), expected);
    }

    #[test]
    fn test_line_count_ignores_other_kinds() {
        let commands = parse_path("M0,0 L1,1 C 2 2 3 3 4 4 H 9 L 5,5 Q 1 1 2 2 V 3 L 0,0").unwrap();
        let encoded = encode(&commands, &view_box(16.0, 16.0), false);
        assert_eq!(encoded.line_count(), 3);
        assert_eq!(encoded.header()[2], 3);
        assert_eq!(encoded.byte_count(), 3 * 4 + 3);
        assert!(!encoded.rows[2].continued);

        let encoded = encode(&commands, &view_box(16.0, 16.0), true);
        assert_eq!(encoded.line_count(), 5);
        assert_eq!(encoded.byte_count(), 23);
    }

    #[test]
    fn test_no_lines() {
        let commands = parse_path("M0,0 C 1 1 2 2 3 3 Z").unwrap();
        let encoded = encode(&commands, &view_box(8.0, 8.0), false);
        assert_eq!(encoded.line_count(), 0);
        assert_eq!(encoded.bytes(), vec![0x08, 0x08, 0x00]);
        let rendered = encoded.render("empty.svg", "empty");
        assert!(rendered.contains("// Number bytes 3\n"));
        assert!(rendered.ends_with("\t0x00,\t// Number of rows of coords (0)\n\n};"));
    }

    #[test]
    fn test_fractional_center() {
        let commands = parse_path("M0,0 L3,3").unwrap();
        let encoded = encode(&commands, &view_box(5.0, 5.0), false);
        let segment = encoded.rows[0].segment;
        assert_eq!(segment, Segment { x1: 0.5, y1: 0.5, x2: -2.5, y2: -2.5 });
        assert_eq!(segment.bytes(), [0x00, 0x00, 0xFE, 0xFE]);
        assert_eq!(segment.rounded(), [1, 1, -2, -2]);
    }

    #[test]
    fn test_line_count_wraps_in_header() {
        let mut d = String::from("M0,0");
        for i in 0..300 {
            d.push_str(&format!(" L{},0", i % 10));
        }
        let commands = parse_path(&d).unwrap();
        let encoded = encode(&commands, &view_box(10.0, 10.0), false);
        assert_eq!(encoded.line_count(), 300);
        assert_eq!(encoded.header()[2], 44);
        assert_eq!(encoded.byte_count(), 1203);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde() {
        let segment = Segment { x1: 1.0, y1: -2.0, x2: 3.5, y2: 0.0 };
        let json = serde_json::to_string(&segment).unwrap();
        let segment2: Segment = serde_json::from_str(&json).unwrap();
        assert_eq!(segment, segment2);
    }
}
