use std::fs;
use std::io;
use std::path::PathBuf;

use banter_core::export::ExportSink;

/// An export sink that writes the transcript to a local file, the
/// terminal counterpart of a browser download.
#[derive(Clone, Debug, Default)]
pub struct FileExportSink {
    directory: Option<PathBuf>,
}

impl FileExportSink {
    /// Creates a sink that writes into the given directory instead of
    /// the working directory.
    pub fn with_directory<P: Into<PathBuf>>(directory: P) -> Self {
        Self {
            directory: Some(directory.into()),
        }
    }
}

impl ExportSink for FileExportSink {
    fn save(&self, file_name: &str, contents: &[u8]) -> io::Result<()> {
        let path = match &self.directory {
            Some(directory) => directory.join(file_name),
            None => PathBuf::from(file_name),
        };
        fs::write(path, contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_writes_the_file() {
        let directory = std::env::temp_dir();
        let file_name = format!("banter-export-{}.txt", std::process::id());

        let sink = FileExportSink::with_directory(&directory);
        sink.save(&file_name, b"You: hi\nGemini: hello").unwrap();

        let path = directory.join(&file_name);
        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "You: hi\nGemini: hello");
        fs::remove_file(path).unwrap();
    }
}
