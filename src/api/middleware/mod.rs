//! API middleware stack.
//!
//! Execution order (outermost → innermost):
//! 1. CORS
//! 2. Audit logger

pub mod audit;
