// This file is the module declaration file for the `core` module.
// In Rust, a `mod.rs` file within a directory (e.g., `src/core/`)
// serves two main purposes:
//
// 1. It declares the submodules contained within that directory.
// 2. It exposes these submodules to the parent module, making them
//    accessible to the entire crate.

// The `pub mod manifest;` declaration tells the Rust compiler to look for
// a file named `manifest.rs` within the same directory.
//
// `manifest` module:
// This module is responsible for reading the project manifest. It defines
// the deserialization structs for the pyproject-style document, the
// `ManifestSource` trait for abstracting where the document comes from, the
// optional `[tool.requirements-gen]` settings table, and the manifest
// error kinds (a missing dependency declaration is a config error, not an
// I/O error).
pub mod manifest;

// `engine` module:
// This module owns a loaded manifest and an output sink and orchestrates
// the operations on top of them: generate, preview (dry run), check and
// status collection.
pub mod engine;
