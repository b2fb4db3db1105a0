// Copyright 2025 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! SVG path representation.

use alloc::string::String;
use core::fmt::{self, Write};

use crate::{BezPath, PathEl};

impl BezPath {
    /// Convert the path to an SVG path string representation.
    ///
    /// Commands are separated by a single space and numbers use Rust's
    /// shortest round-tripping float formatting. `Mark` elements are skipped.
    /// The current implementation doesn't take any special care to produce a
    /// short string (reducing precision, using relative movement).
    ///
    /// # Examples
    ///
    /// ```
    /// use rspline::BezPath;
    ///
    /// let mut path = BezPath::new();
    /// path.move_to((0.0, 0.0));
    /// path.mark(0);
    /// path.curve_to((1.0, 2.0), (3.0, 2.0), (4.0, 0.5));
    /// path.close_path();
    /// assert_eq!(path.to_svg(), "M0 0 C1 2 3 2 4 0.5 Z");
    /// ```
    pub fn to_svg(&self) -> String {
        let mut result = String::new();
        // Writing to a String cannot fail.
        let _ = self.write_svg(&mut result);
        result
    }

    /// Write the SVG representation of this path to the provided writer.
    pub fn write_svg<W: Write>(&self, mut writer: W) -> fmt::Result {
        let mut first = true;
        for el in self.elements() {
            if matches!(el, PathEl::Mark(_)) {
                continue;
            }
            if !first {
                writer.write_char(' ')?;
            }
            first = false;
            match *el {
                PathEl::MoveTo(p) => write!(writer, "M{} {}", p.x, p.y)?,
                PathEl::LineTo(p) => write!(writer, "L{} {}", p.x, p.y)?,
                PathEl::CurveTo(p1, p2, p3) => write!(
                    writer,
                    "C{} {} {} {} {} {}",
                    p1.x, p1.y, p2.x, p2.y, p3.x, p3.y
                )?,
                PathEl::ClosePath => writer.write_char('Z')?,
                PathEl::Mark(_) => {}
            }
        }
        Ok(())
    }
}
