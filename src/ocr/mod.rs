//! Text recognition of screenshots through the Tesseract command line tool.

pub mod engine;
pub mod preprocess;
pub mod recognizer;
pub mod setup;

pub use recognizer::{recognize_directory, RecognizeSummary, TesseractRecognizer};
pub use setup::ensure_tesseract;
