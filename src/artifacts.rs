// Generated-artifact persistence
//
// Model output often arrives wrapped in markdown fences; strip them
// before writing the code and test files for a run.

use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;

/// Paths of the files written for one run
#[derive(Debug, Clone)]
pub struct WrittenArtifacts {
    pub code_file: PathBuf,
    pub test_file: PathBuf,
}

/// Remove a surrounding markdown code fence, if present.
///
/// Handles a ```python fence, a bare ``` fence, or no fence at all.
pub fn strip_code_fences(text: &str) -> String {
    let fenced = |tag: &str| -> Option<String> {
        let (_, rest) = text.split_once(tag)?;
        let (body, _) = rest.split_once("```")?;
        Some(body.trim().to_string())
    };

    fenced("```python")
        .or_else(|| fenced("```"))
        .unwrap_or_else(|| text.to_string())
}

/// Writes cleaned code and tests under the configured output directory
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    output_dir: PathBuf,
}

impl ArtifactWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write the code and test files for one run, creating the output
    /// directory if needed. File names carry a millisecond timestamp so
    /// successive runs never collide.
    pub fn write(&self, code: &str, tests: &str) -> io::Result<WrittenArtifacts> {
        std::fs::create_dir_all(&self.output_dir)?;

        let stamp = Utc::now().timestamp_millis();
        let code_file = self.output_dir.join(format!("generated_code_{stamp}.py"));
        let test_file = self.output_dir.join(format!("test_code_{stamp}.py"));

        std::fs::write(&code_file, code)?;
        std::fs::write(&test_file, tests)?;

        tracing::info!(
            code_file = %code_file.display(),
            test_file = %test_file.display(),
            "artifacts written"
        );

        Ok(WrittenArtifacts {
            code_file,
            test_file,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_python_fence() {
        let text = "Here you go:\n```python\nprint('hi')\n```\nEnjoy!";
        assert_eq!(strip_code_fences(text), "print('hi')");
    }

    #[test]
    fn strips_bare_fence() {
        let text = "```\nx = 1\n```";
        assert_eq!(strip_code_fences(text), "x = 1");
    }

    #[test]
    fn passes_unfenced_text_through() {
        let text = "def add(a, b):\n    return a + b";
        assert_eq!(strip_code_fences(text), text);
    }

    #[test]
    fn writes_code_and_test_files() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ArtifactWriter::new(dir.path().join("out"));

        let written = writer.write("print('code')", "print('tests')").unwrap();

        assert_eq!(
            std::fs::read_to_string(&written.code_file).unwrap(),
            "print('code')"
        );
        assert_eq!(
            std::fs::read_to_string(&written.test_file).unwrap(),
            "print('tests')"
        );
        assert!(written
            .code_file
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("generated_code_"));
        assert!(written
            .test_file
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("test_code_"));
    }
}
