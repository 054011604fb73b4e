//! # mau
//!
//! A compiler front-end for the Mau markup language.
//!
//! Source text goes in, a validated AST comes out, ready to be handed to an external
//! renderer. See the [mau module](mau) for the layout of the pipeline.
//!
//! For testing helpers, see the [testing module](mau::testing).

#![allow(rustdoc::invalid_html_tags)]

pub mod mau;
