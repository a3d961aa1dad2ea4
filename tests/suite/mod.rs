//! End-to-end suites over synthetic evidence files.

mod determinism;
mod dispatch;
mod end_to_end;
