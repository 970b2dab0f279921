// This file is the module declaration file for the `builders` module.
// It declares and makes public all the sub-modules within the `src/builders`
// directory. These modules encapsulate the domain pieces a run is built from.

// The `pub mod specifier;` declaration exposes the `specifier` module.
//
// `specifier` module:
// This is a fundamental module that defines the `Specifier` type, a single
// dependency declaration carried verbatim from the manifest after trimming
// of whitespace and one pair of enclosing quotes. It also extracts leading
// package names for the validator.
pub mod specifier;

// The `pub mod nightly;` declaration exposes the `nightly` module.
//
// `nightly` module:
// This module builds the nightly variant of a dependency list. It defines
// `OverrideToken` (a bare repo name or an org/repo pair), the interpreter
// version used for the prebuilt scipp wheel tag, and the filter-and-append
// transformation itself.
pub mod nightly;

// The `pub mod writer;` declaration exposes the `writer` module.
//
// `writer` module:
// This module owns the generated-file format: the separator between the
// hand-maintained and the auto-generated section, the split/render helpers,
// and the `OutputSink` trait with its file-backed and in-memory
// implementations.
pub mod writer;

// The `pub mod validator;` declaration exposes the `validator` module.
//
// `validator` module:
// This module is dedicated to linting the configuration. It defines the
// `ConfigValidator` trait and a `StandardValidator` implementation that
// checks override tokens and dependency entries for common mistakes, such
// as a token that prefix-matches a differently-named package.
pub mod validator;

// The `pub mod reporter;` declaration exposes the `reporter` module.
//
// `reporter` module:
// This module is responsible for generating human-readable status output.
// It defines a `StatusReporter` trait and its `ConsoleReporter`
// implementation, which summarizes the state of each generated file.
pub mod reporter;
