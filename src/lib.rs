// Library surface of requirements-gen. The binary in `main.rs` and the
// integration tests under `tests/` drive the same modules through these
// declarations.

// `core` module:
// Manifest access and the engine that orchestrates a run.
pub mod core;

// `builders` module:
// The domain pieces a run is built from: specifiers, nightly synthesis, the
// section-preserving writer, validation and status reporting.
pub mod builders;

// `utils` module:
// Thin wrappers that turn parsed command-line options into engine calls and
// console output.
pub mod utils;
