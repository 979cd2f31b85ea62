//! Cross-module scenario tests for batch processing.
//!
//! Unit tests live next to each module; the suites here exercise whole
//! batches end to end: completeness and isolation, concurrency bounds and
//! throughput, and deadline behavior.

mod deadline;
