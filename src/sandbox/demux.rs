// Output stream demultiplexer
//
// The runtime delivers stdout and stderr over one attached connection as
// tagged frames. Frames are routed by tag into separate byte buffers, each
// capped at the configured size. Decoding to text happens once, after the
// stream ends, so multi-byte characters split across frames survive.

use bollard::container::LogOutput;
use tracing::warn;

/// Stream tag carried by each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Stdin,
    Stdout,
    Stderr,
}

/// Routes frames into per-stream buffers
#[derive(Debug)]
pub struct OutputDemux {
    stdout: Vec<u8>,
    stderr: Vec<u8>,
    limit: usize,
    dropped: usize,
}

impl OutputDemux {
    pub fn new(limit: usize) -> Self {
        Self {
            stdout: Vec::new(),
            stderr: Vec::new(),
            limit,
            dropped: 0,
        }
    }

    /// Append a frame payload to the buffer of its stream
    pub fn push(&mut self, kind: StreamKind, payload: &[u8]) {
        let buf = match kind {
            StreamKind::Stdout => &mut self.stdout,
            StreamKind::Stderr => &mut self.stderr,
            StreamKind::Stdin => return,
        };
        let room = self.limit.saturating_sub(buf.len());
        let take = room.min(payload.len());
        buf.extend_from_slice(&payload[..take]);
        self.dropped += payload.len() - take;
    }

    /// Route one frame decoded by the Docker client
    pub fn push_frame(&mut self, frame: LogOutput) {
        match frame {
            LogOutput::StdOut { message } | LogOutput::Console { message } => {
                self.push(StreamKind::Stdout, &message)
            }
            LogOutput::StdErr { message } => self.push(StreamKind::Stderr, &message),
            LogOutput::StdIn { message } => self.push(StreamKind::Stdin, &message),
        }
    }

    /// Bytes discarded because a stream hit its cap
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn finish(self) -> (Vec<u8>, Vec<u8>) {
        if self.dropped > 0 {
            warn!(
                dropped_bytes = self.dropped,
                limit = self.limit,
                "output truncated at capture limit"
            );
        }
        (self.stdout, self.stderr)
    }
}
