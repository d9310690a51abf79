//! # GNU Gama interface
//!
//! The least-squares adjustment itself is done by the external `gama-local` program. This
//! module covers the file-based protocol around it:
//!
//! 1. [`artifacts`] – Deterministic names of the input, result and report files.
//! 2. [`input_writer`] – Serialization of fixed points, free points and height differences into
//!    the `gama-local` XML input.
//! 3. [`invoker`] – Running the program with an optional timeout, and classifying its outcome
//!    ([`AdjustmentOutcome`](crate::gama::invoker::AdjustmentOutcome)).
//! 4. [`output_reader`] – Parsing the XML result into adjusted heights and variances.
//!
//! ## Process contract
//!
//! ```text
//! gama-local <project>.xml --xml <project>-resultat.xml --html <project>-resultat-<phase>.html
//! ```
//!
//! Exit code `0` means success. A non-zero exit code with a result file is a soft failure (the
//! report must be checked by hand); without a result file it is a hard failure, typically a
//! disconnected network or a sub-network without a fixed point.
pub mod artifacts;
pub mod input_writer;
pub mod invoker;
pub mod output_reader;
