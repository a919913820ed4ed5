//! Convert the straight line segments of an SVG path into a compact byte
//! table for firmware, e.g. a `PROGMEM` array driving a small display.
//!
//! The path is read from one element of the document, every line command is
//! centered on the `viewBox` and each coordinate is wrapped into a byte:
//!
//! ```text
//! width, height, line count,
//! x1, y1, x2, y2,   // one row per line, end point first
//! ...
//! ```
//!
//! Curves, arcs and move commands are skipped. Offsets outside of
//! `-128..=127` wrap around silently.
//!
//! You can optionally get serde 1 support by enabling the `serde` feature.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

use std::convert;

use log::{debug, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

mod document;
mod encode;
mod error;
mod path;

pub use crate::document::{parse_document, Element, PathSelector};
pub use crate::encode::{encode, encode_byte, Encoded, Row, Segment, HEADER_LEN, SEGMENT_LEN};
pub use crate::error::Error;
pub use crate::path::{parse_path, Command, CommandKind};

/// The prefix a `viewBox` must start with. Only the size is used.
const VIEW_BOX_ORIGIN: &str = "0 0 ";

/// A `CoordinatePair` consists of an x and y coordinate.
#[derive(Debug, PartialEq, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CoordinatePair {
    pub x: f64,
    pub y: f64,
}

impl CoordinatePair {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl convert::From<(f64, f64)> for CoordinatePair {
    fn from(val: (f64, f64)) -> Self {
        Self { x: val.0, y: val.1 }
    }
}

/// Width and height of the graphic, from a `viewBox="0 0 <w> <h>"`.
///
/// The tokens are also kept as written, for the table comments.
#[derive(Debug, PartialEq, Clone)]
pub struct ViewBox {
    pub width: f64,
    pub height: f64,
    pub width_text: String,
    pub height_text: String,
}

impl ViewBox {
    pub fn parse(attr: &str) -> Result<Self, Error> {
        let size = attr.trim_start().strip_prefix(VIEW_BOX_ORIGIN).ok_or_else(|| {
            Error::ViewBox(format!("\"{}\" does not start with \"{}\"", attr, VIEW_BOX_ORIGIN.trim_end()))
        })?;
        let tokens: Vec<&str> = size.split_whitespace().collect();
        match tokens.as_slice() {
            [width, height] => Ok(Self {
                width: Self::parse_dimension(width)?,
                height: Self::parse_dimension(height)?,
                width_text: (*width).to_string(),
                height_text: (*height).to_string(),
            }),
            _ => Err(Error::ViewBox(format!(
                "expected width and height after the origin in \"{}\", found {} values",
                attr,
                tokens.len()
            ))),
        }
    }

    fn parse_dimension(token: &str) -> Result<f64, Error> {
        match token.parse::<f64>() {
            Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
            _ => Err(Error::ViewBox(format!("\"{}\" is not a valid dimension", token))),
        }
    }

    /// Half the width and half the height.
    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }
}

/// Conversion settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    /// Which element holds the path.
    pub selector: PathSelector,
    /// Encode `H` and `V` commands as lines too.
    pub axis_lines: bool,
}

/// The parts of an SVG document that get encoded.
#[derive(Debug, PartialEq, Clone)]
pub struct Graphic {
    pub view_box: ViewBox,
    pub commands: Vec<Command>,
}

impl Graphic {
    pub fn encode(&self, options: &Options) -> Encoded {
        encode(&self.commands, &self.view_box, options.axis_lines)
    }
}

/// Parse an SVG string into its view box and the commands of the selected
/// path.
pub fn parse(svg: &str, options: &Options) -> Result<Graphic, Error> {
    trace!("parse");

    let root = parse_document(svg)?;
    let view_box = ViewBox::parse(root.require_attribute("viewBox")?)?;
    debug!("parse: View box {} x {}", view_box.width, view_box.height);

    let target = options.selector.locate(&root)?;
    let commands = parse_path(target.require_attribute("d")?)?;
    debug!("parse: Found {} commands at {}", commands.len(), options.selector);

    Ok(Graphic { view_box, commands })
}

/// Convert an SVG string into the text of a `PROGMEM` array named
/// `var_name`. `source` names the input in the leading comment.
pub fn convert(svg: &str, options: &Options, source: &str, var_name: &str) -> Result<String, Error> {
    let graphic = parse(svg, options)?;
    Ok(graphic.encode(options).render(source, var_name))
}
