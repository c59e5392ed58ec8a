// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Native built-ins for the sable compiler.
//!
//! Each module registers its handlers through a signature stub written in
//! the stylesheet language; see `sable_parser::builtin::register`.

pub mod colors;
pub mod files;
pub mod numbers;

use std::sync::Once;

static INSTALL: Once = Once::new();

/// Install the default built-in library. Safe to call more than once;
/// registration happens exactly once per process.
pub fn register_defaults() {
    INSTALL.call_once(|| {
        colors::register();
        numbers::register();
        files::register();
    });
}
