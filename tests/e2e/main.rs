//! End-to-end tests for the `annotatron` binary.
//!
//! Each test runs the real binary as a subprocess with its own app directory
//! (`ANNOTATRON_HOME`) and, where a server is needed, an in-process mock of
//! the Annotatron API.
//!
//! # Running
//!
//! ```sh
//! cargo test --test e2e
//! ```

mod harness;

mod cli;
mod errors;
mod login;
