//! Behavioral tests for the dashboard
//!
//! BDD-style tests using given-when-then naming. They exercise the pure
//! parts of each page without a DOM. `browser_behaviors` needs a browser
//! and only builds for wasm32.
