//! Optional SVG to bitmap step.
//!
//! The server hands the composed SVG to a [`Rasterizer`] before replying.
//! The default passes the SVG through untouched; [`CommandRasterizer`]
//! pipes it through an external converter such as `rsvg-convert`.

use std::io::{Read, Write};
use std::process::{Command, Stdio};
use std::thread;

use thiserror::Error;

/// Content type of an unrasterized reply.
pub const SVG_CONTENT_TYPE: &str = "image/svg+xml";

/// Errors raised while rasterizing.
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("{program} failed to read its input: {reason}")]
    Input { program: String, reason: String },

    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },
}

/// Converts a composed SVG document into the bytes sent to the client.
pub trait Rasterizer: Send + Sync {
    /// MIME type of the produced bytes.
    fn content_type(&self) -> &str;

    fn rasterize(&self, svg: &str) -> Result<Vec<u8>, RasterError>;
}

/// Replies with the SVG itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgPassthrough;

impl Rasterizer for SvgPassthrough {
    fn content_type(&self) -> &str {
        SVG_CONTENT_TYPE
    }

    fn rasterize(&self, svg: &str) -> Result<Vec<u8>, RasterError> {
        Ok(svg.as_bytes().to_vec())
    }
}

/// Runs an external program that reads SVG on stdin and writes the bitmap
/// to stdout.
#[derive(Debug, Clone)]
pub struct CommandRasterizer {
    program: String,
    args: Vec<String>,
    content_type: String,
}

impl CommandRasterizer {
    pub fn new(program: impl Into<String>, args: Vec<String>, content_type: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args,
            content_type: content_type.into(),
        }
    }

    /// Splits a command line on whitespace into program and arguments.
    /// Returns `None` for a blank command line.
    pub fn from_command_line(command_line: &str, content_type: impl Into<String>) -> Option<Self> {
        let mut words = command_line.split_whitespace().map(str::to_string);
        let program = words.next()?;
        Some(Self::new(program, words.collect(), content_type))
    }
}

impl Rasterizer for CommandRasterizer {
    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn rasterize(&self, svg: &str) -> Result<Vec<u8>, RasterError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| RasterError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        // The converter may fill stdout before it has read all of stdin.
        let mut stdin = child.stdin.take();
        let input = svg.as_bytes().to_vec();
        let writer = thread::spawn(move || match stdin.as_mut() {
            Some(pipe) => pipe.write_all(&input),
            None => Ok(()),
        });

        let mut stdout = Vec::new();
        if let Some(mut pipe) = child.stdout.take() {
            pipe.read_to_end(&mut stdout).map_err(|e| RasterError::Input {
                program: self.program.clone(),
                reason: e.to_string(),
            })?;
        }
        let output = child.wait_with_output().map_err(|source| RasterError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        let written = writer.join();
        if !output.status.success() {
            return Err(RasterError::Failed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        match written {
            Ok(Ok(())) => Ok(stdout),
            Ok(Err(e)) => Err(RasterError::Input {
                program: self.program.clone(),
                reason: e.to_string(),
            }),
            Err(_) => Err(RasterError::Input {
                program: self.program.clone(),
                reason: "stdin writer panicked".to_string(),
            }),
        }
    }
}
