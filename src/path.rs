//! Turn a path expression into a flat list of absolute drawing commands.

use log::trace;
use svgtypes::{PathParser, PathSegment};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{CoordinatePair, Error};

/// The kind of a drawing command, regardless of absolute / relative form.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CommandKind {
    MoveTo,
    LineTo,
    HorizontalLineTo,
    VerticalLineTo,
    CurveTo,
    SmoothCurveTo,
    Quadratic,
    SmoothQuadratic,
    EllipticalArc,
    ClosePath,
}

impl CommandKind {
    /// Whether the command draws a straight segment.
    ///
    /// Only `L` counts unless `axis_lines` is set, in which case `H` and `V`
    /// count as well.
    pub fn is_line(self, axis_lines: bool) -> bool {
        match self {
            CommandKind::LineTo => true,
            CommandKind::HorizontalLineTo | CommandKind::VerticalLineTo => axis_lines,
            _ => false,
        }
    }
}

/// A drawing command in absolute coordinates.
#[derive(Debug, PartialEq, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Command {
    pub kind: CommandKind,
    /// End point of the command.
    pub to: CoordinatePair,
    /// Pen position before the command.
    pub from: CoordinatePair,
}

/// Tracks the pen while walking the path.
#[derive(Debug, PartialEq)]
struct Pen {
    current: CoordinatePair,
    subpath_start: CoordinatePair,
}

impl Pen {
    fn new() -> Self {
        Self {
            current: CoordinatePair::new(0.0, 0.0),
            subpath_start: CoordinatePair::new(0.0, 0.0),
        }
    }

    /// Resolve a possibly relative point against the current position.
    fn resolve(&self, abs: bool, x: f64, y: f64) -> CoordinatePair {
        if abs {
            CoordinatePair::new(x, y)
        } else {
            CoordinatePair::new(self.current.x + x, self.current.y + y)
        }
    }

    /// Apply one segment, returning the resulting absolute command.
    fn advance(&mut self, segment: &PathSegment) -> Command {
        let from = self.current;
        let (kind, to) = match *segment {
            PathSegment::MoveTo { abs, x, y } => {
                let to = self.resolve(abs, x, y);
                self.subpath_start = to;
                (CommandKind::MoveTo, to)
            }
            PathSegment::LineTo { abs, x, y } => (CommandKind::LineTo, self.resolve(abs, x, y)),
            PathSegment::HorizontalLineTo { abs, x } => {
                let x = if abs { x } else { from.x + x };
                (CommandKind::HorizontalLineTo, CoordinatePair::new(x, from.y))
            }
            PathSegment::VerticalLineTo { abs, y } => {
                let y = if abs { y } else { from.y + y };
                (CommandKind::VerticalLineTo, CoordinatePair::new(from.x, y))
            }
            PathSegment::CurveTo { abs, x, y, .. } => {
                (CommandKind::CurveTo, self.resolve(abs, x, y))
            }
            PathSegment::SmoothCurveTo { abs, x, y, .. } => {
                (CommandKind::SmoothCurveTo, self.resolve(abs, x, y))
            }
            PathSegment::Quadratic { abs, x, y, .. } => {
                (CommandKind::Quadratic, self.resolve(abs, x, y))
            }
            PathSegment::SmoothQuadratic { abs, x, y } => {
                (CommandKind::SmoothQuadratic, self.resolve(abs, x, y))
            }
            PathSegment::EllipticalArc { abs, x, y, .. } => {
                (CommandKind::EllipticalArc, self.resolve(abs, x, y))
            }
            PathSegment::ClosePath { .. } => (CommandKind::ClosePath, self.subpath_start),
        };
        self.current = to;
        Command { kind, to, from }
    }
}

/// Parse a path expression (the `d` attribute) into absolute commands.
pub fn parse_path(expr: &str) -> Result<Vec<Command>, Error> {
    trace!("parse_path");
    let mut pen = Pen::new();
    let mut commands = Vec::new();
    for segment in PathParser::from(expr) {
        let segment =
            segment.map_err(|e| Error::PathParse(format!("Could not parse path segment: {}", e)))?;
        let command = pen.advance(&segment);
        trace!("parse_path: {:?}", command);
        commands.push(command);
    }
    trace!("parse_path: Return {} commands", commands.len());
    Ok(commands)
}
