use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Result;
use ropey::Rope;

/// The host-owned raw text buffer.
///
/// Holds whatever the user loaded; the viewer never edits it directly.
/// Accepted mutations come back from the document layer as a full canonical
/// serialization and replace the contents wholesale.
pub struct Buffer {
    rope: Rope,
    path: Option<PathBuf>,
    modified: bool,
}

impl Buffer {
    pub fn new() -> Self {
        Self {
            rope: Rope::new(),
            path: None,
            modified: false,
        }
    }

    pub fn load_file(&mut self, path: &str) -> Result<()> {
        self.rope = Rope::from_reader(BufReader::new(File::open(path)?))?;
        self.path = Some(PathBuf::from(path));
        self.modified = false;
        Ok(())
    }

    /// Replace the whole buffer (document write-back).
    pub fn set_text(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        self.modified = true;
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    pub fn get_line(&self, line_idx: usize) -> String {
        if line_idx >= self.rope.len_lines() {
            return String::new();
        }
        self.rope.line(line_idx).to_string()
    }

    /// Window of lines for the raw view, newline-joined.
    pub fn get_visible_lines(&self, start_line: usize, count: usize) -> String {
        let mut result = String::new();
        let max_line = self.line_count();
        for i in 0..count {
            let line_idx = start_line + i;
            if line_idx >= max_line {
                break;
            }
            result.push_str(&self.get_line(line_idx));
        }
        result
    }

    pub fn file_size(&self) -> usize {
        self.rope.len_bytes()
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn clear(&mut self) {
        self.rope = Rope::new();
        self.modified = false;
    }

    pub fn save(&mut self) -> Result<()> {
        let path = self
            .path
            .clone()
            .ok_or_else(|| anyhow::anyhow!("no file name (use :w <path>)"))?;
        self.write_to(&path)?;
        Ok(())
    }

    pub fn save_as(&mut self, path: &str) -> Result<()> {
        let path = PathBuf::from(path);
        self.write_to(&path)?;
        self.path = Some(path);
        Ok(())
    }

    fn write_to(&mut self, path: &Path) -> Result<()> {
        std::fs::write(path, self.rope.to_string())?;
        self.modified = false;
        Ok(())
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}
