//! Transcript export.

use std::io;

/// The file name the transcript is exported under.
pub const EXPORT_FILE_NAME: &str = "chat-history.txt";

/// A sink that persists an exported transcript.
///
/// Implementations decide what "save" means: a file next to the
/// binary, a download, a test buffer. The controller only hands over
/// bytes and never reads them back.
pub trait ExportSink: Send + Sync + 'static {
    /// Saves the given contents under the given file name.
    fn save(&self, file_name: &str, contents: &[u8]) -> io::Result<()>;
}
