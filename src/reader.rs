use encoding_rs::Encoding;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

// Candidate encodings, tried in order. The Latin-family labels both resolve
// to windows-1252 under the Encoding Standard, which accepts any byte
// sequence, so decoding only ever fails on an unreadable file.
const ENCODING_LABELS: [&str; 3] = ["utf-8", "iso-8859-1", "latin1"];

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("Failed to open input file {path:?}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No supported encoding could decode {path:?}")]
    NoEncodingMatched { path: PathBuf },
}

#[derive(Debug)]
pub struct DecodedInput {
    /// Canonical name of the encoding that decoded the file.
    pub encoding: &'static str,
    pub lines: Vec<String>,
}

/// Read the input file, trying each candidate encoding in order and keeping
/// the first clean decode. Only trimmed lines containing `@` are retained.
pub fn read_email_lines(path: &Path) -> Result<DecodedInput, ReadError> {
    let bytes = fs::read(path).map_err(|source| ReadError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    for label in ENCODING_LABELS {
        let Some(encoding) = Encoding::for_label(label.as_bytes()) else {
            continue;
        };

        let (text, had_errors) = encoding.decode_without_bom_handling(&bytes);
        if had_errors {
            continue;
        }

        let lines: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|line| line.contains('@'))
            .map(str::to_owned)
            .collect();

        info!(
            input_path = ?path,
            encoding = encoding.name(),
            line_count = lines.len(),
            "Decoded input file"
        );
        return Ok(DecodedInput {
            encoding: encoding.name(),
            lines,
        });
    }

    Err(ReadError::NoEncodingMatched {
        path: path.to_path_buf(),
    })
}
