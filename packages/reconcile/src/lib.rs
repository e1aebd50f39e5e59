#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! The reconciliation core: joins kecamatan boundary polygons with RTH
//! metrics by normalized name and turns the result into a styled map
//! description.
//!
//! Everything in this crate is pure — no I/O, no mutation of inputs. The
//! server fetches both collections, calls [`engine::reconcile`] /
//! [`map::build_map_view`], and serializes the result. Fetch failures are
//! handled by the caller; the engine never runs on partial data.

pub mod engine;
pub mod map;
pub mod markers;
pub mod matcher;
pub mod normalize;
pub mod style;
