// Copyright 2025 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A curvature-continuous interpolating spline.
//!
//! The rspline library turns a sequence of control points into a smooth
//! curve that passes through every point. Each point is either smooth or a
//! corner, and may have its tangent direction pinned. Between corners the
//! curve is solved so that tangent and curvature are continuous, then each
//! segment is rendered as cubic Bézier curves.
//!
//! # Examples
//!
//! An open curve with a corner:
//! ```
//! use rspline::{ControlPoint, PathEl, Point, Spline};
//!
//! let mut spline = Spline::new(
//!     [
//!         ControlPoint::smooth((0.0, 0.0)),
//!         ControlPoint::smooth((1.0, 1.0)),
//!         ControlPoint::corner((2.0, 0.0)),
//!         ControlPoint::smooth((3.0, 0.5)),
//!     ],
//!     false,
//! );
//! spline.solve();
//! spline.compute_curvature_blending();
//!
//! let path = spline.render();
//! // Segments end exactly on their control points.
//! match path.elements().last() {
//!     Some(PathEl::CurveTo(_, _, end)) => assert_eq!(*end, Point::new(3.0, 0.5)),
//!     el => panic!("unexpected {el:?}"),
//! }
//!
//! // Find which segment a click landed on.
//! let hit = path.hit_test((1.0, 1.1).into());
//! assert!(hit.best_mark == Some(0) || hit.best_mark == Some(1));
//! ```
//!
//! Working with a single smooth run directly:
//! ```
//! use rspline::{MyCurve, Point, TwoParamSpline};
//!
//! let pts = [(0.0, 0.0), (1.0, 0.5), (2.0, 0.6), (3.0, 0.2)].map(Point::from);
//! let mut run = TwoParamSpline::new(pts);
//! run.solve(&MyCurve);
//! assert!(run.continuity_errors(&MyCurve).iter().all(|e| e.abs() < 1e-3));
//! ```
//!
//! # Features
//!
//! This crate either uses the standard library or the [`libm`] crate for
//! math functionality. The `std` feature is enabled by default, but can be
//! disabled, as long as the `libm` feature is enabled. This is useful for
//! `no_std` environments. However, note that the `libm` crate is not as
//! efficient as the standard library, and that this crate still uses the
//! `alloc` crate regardless.
//!
//! - `serde`: Implement `serde::Deserialize` and `serde::Serialize` on
//!   points, vectors and control points. Solver output is not serialized.
//! - `mint`: Enable `From`/`Into` conversion with [mint][] types.
//! - `schemars`: Add support for using [`Point`] in JSON schemas.
//!
//! Diagnostics are emitted through [tracing][]; no subscriber is installed.
//!
//! [`libm`]: https://docs.rs/libm
//! [mint]: https://docs.rs/mint
//! [tracing]: https://docs.rs/tracing

// LINEBENDER LINT SET - lib.rs - v1
// See https://linebender.org/wiki/canonical-lints/
// These lints aren't included in Cargo.toml because they
// shouldn't apply to examples and tests
#![warn(unused_crate_dependencies)]
#![warn(clippy::print_stdout, clippy::print_stderr)]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]
#![allow(
    clippy::unreadable_literal,
    clippy::many_single_char_names,
    clippy::excessive_precision
)]
// The following lints are part of the Linebender standard set,
// but resolving them has been deferred for now.
#![allow(
    clippy::use_self,
    clippy::cast_possible_truncation,
    clippy::missing_assert_message,
    clippy::missing_panics_doc,
    clippy::exhaustive_enums,
    clippy::unseparated_literal_suffix,
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason
)]

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("rspline requires either the `std` or `libm` feature");

// Suppress the unused_crate_dependencies lint when both std and libm are specified.
#[cfg(all(feature = "std", feature = "libm"))]
use libm as _;

extern crate alloc;

mod bezpath;
pub mod common;
mod cubicbez;
mod curve;
mod point;
mod poly;
mod spline;
mod svg;
mod two_param_spline;
mod vec2;

pub use crate::bezpath::*;
pub use crate::cubicbez::*;
pub use crate::curve::*;
pub use crate::point::*;
pub use crate::poly::*;
pub use crate::spline::*;
pub use crate::two_param_spline::*;
pub use crate::vec2::*;
