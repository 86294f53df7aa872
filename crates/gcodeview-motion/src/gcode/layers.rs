//! Splits a G-code file into preamble, per-layer blocks and tail.

use gcodeview_core::{GcodeError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Line that opens a layer block
pub const LAYER_MARKER: &str = ";LAYER:";
/// Line that opens the tail block after the last layer
pub const END_MARKER: &str = ";End of Gcode";

/// A G-code file cut into the blocks the reconstructor consumes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlicedGcode {
    prefix: String,
    layers: Vec<String>,
    tail: String,
}

impl SlicedGcode {
    /// Wrap blocks that were already split by the caller
    pub fn new(prefix: impl Into<String>, layers: Vec<String>, tail: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            layers,
            tail: tail.into(),
        }
    }

    /// Read and split a G-code file. The file must be UTF-8 text.
    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let text = String::from_utf8(bytes).map_err(|e| GcodeError::FileError {
            reason: format!(
                "{} is not UTF-8 text (invalid byte at offset {})",
                path.display(),
                e.utf8_error().valid_up_to()
            ),
        })?;
        let sliced = Self::from_text(&text);
        debug!(
            "Read {}: {} layers, {} bytes",
            path.display(),
            sliced.layer_count(),
            text.len()
        );
        Ok(sliced)
    }

    /// Split a whole file.
    ///
    /// Each `;LAYER:` line starts a new layer block. `;End of Gcode` after the
    /// last layer starts the tail. A file without layer markers becomes one
    /// unmarked layer starting at the first motion command.
    pub fn from_text(text: &str) -> Self {
        let mut prefix = String::new();
        let mut layers: Vec<String> = Vec::new();
        let mut tail = String::new();
        let mut in_tail = false;

        for line in text.lines() {
            let trimmed = line.trim_start();
            if trimmed.starts_with(LAYER_MARKER) {
                in_tail = false;
                layers.push(String::new());
            } else if !layers.is_empty() && trimmed.starts_with(END_MARKER) {
                in_tail = true;
            }

            let block = if in_tail {
                &mut tail
            } else {
                match layers.last_mut() {
                    Some(layer) => layer,
                    None => &mut prefix,
                }
            };
            block.push_str(line);
            block.push('\n');
        }

        if layers.is_empty() {
            return Self::split_unmarked(text);
        }

        Self { prefix, layers, tail }
    }

    fn split_unmarked(text: &str) -> Self {
        let mut prefix = String::new();
        let mut body = String::new();
        for line in text.lines() {
            if body.is_empty() && !starts_motion(line) {
                prefix.push_str(line);
                prefix.push('\n');
            } else {
                body.push_str(line);
                body.push('\n');
            }
        }

        let layers = if body.is_empty() { Vec::new() } else { vec![body] };
        Self {
            prefix,
            layers,
            tail: String::new(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn tail(&self) -> &str {
        &self.tail
    }

    pub fn layers(&self) -> &[String] {
        &self.layers
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Text of layer `index`, empty when out of range
    pub fn layer(&self, index: usize) -> &str {
        self.layers.get(index).map(String::as_str).unwrap_or("")
    }
}

fn starts_motion(line: &str) -> bool {
    let mut words = line.split_whitespace();
    matches!(
        words.next(),
        Some("G0" | "G1" | "G2" | "G3" | "G00" | "G01" | "G02" | "G03")
    )
}
