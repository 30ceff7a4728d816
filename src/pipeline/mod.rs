//! Pipeline stages for Markdown conversion.
//!
//! Each submodule implements exactly one step, so the factory and the
//! executor can be tested with a stand-in [`Engine`](crate::engine::Engine)
//! instead of a real Markdown backend.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ factory ──▶ execute ──▶ bytes (+ timing)
//! (file/stdin) (renderer)  (buffers, render, copy-out)
//! ```
//!
//! 1. [`input`]   reads the raw source from a file or standard input
//! 2. [`factory`] turns the renderer variant into a renderer handle and
//!    the optional HTML augmentation payload
//! 3. [`execute`] owns the buffers, the document and the handle for one
//!    run, times the render call and copies the result out
//! 4. [`buffer`]  is the unit-sized byte storage used by step 3

pub mod buffer;
pub mod execute;
pub mod factory;
pub mod input;
