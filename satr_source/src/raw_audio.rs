//! Raw interleaved 16-bit PCM source, read from a file or a spawned
//! subprocess's standard output.
//!
//! Mirrors `src_rawaudio.c`: the subprocess case is the Rust equivalent of
//! `popen(filename, "r")`, and both cases drain through the same internal
//! chunk buffer, refilled [`CHUNK_FRAMES`] frames at a time (0.1s at the
//! 32 kHz FM intermediate rate) rather than one sample at a time.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::process::{Child, Command, Stdio};

use crate::AudioSource;
use crate::error::{Result, SourceError};

/// Frames buffered per refill (0.1s at 32 kHz).
const CHUNK_FRAMES: usize = 3200;

pub struct RawAudioSource {
    reader: Box<dyn Read + Send>,
    channels: u8,
    sample_rate: u32,
    chunk: VecDeque<i16>,
    eof: bool,
    // Kept alive so the child isn't reaped (and its stdout pipe closed)
    // while this source is still being read from.
    _child: Option<Child>,
}

impl RawAudioSource {
    /// Opens `path` as a raw interleaved PCM file.
    pub fn open_file(path: impl AsRef<Path>, channels: u8, sample_rate: u32) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| SourceError::Open(path.display().to_string(), e))?;
        Ok(Self::from_reader(Box::new(BufReader::new(file)), channels, sample_rate, None))
    }

    /// Spawns `command` through the shell and reads its standard output as
    /// raw interleaved PCM, matching `exec = true` in the channel config.
    pub fn spawn(command: &str, channels: u8, sample_rate: u32) -> Result<Self> {
        let mut child = Command::new("/bin/sh")
            .arg("-c")
            .arg(command)
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|e| SourceError::Spawn(command.to_string(), e))?;
        let stdout = child.stdout.take().expect("child spawned with piped stdout");
        Ok(Self::from_reader(Box::new(stdout), channels, sample_rate, Some(child)))
    }

    fn from_reader(reader: Box<dyn Read + Send>, channels: u8, sample_rate: u32, child: Option<Child>) -> Self {
        RawAudioSource {
            reader,
            channels,
            sample_rate,
            chunk: VecDeque::with_capacity(CHUNK_FRAMES * channels as usize),
            eof: false,
            _child: child,
        }
    }

    fn refill(&mut self) {
        if self.eof {
            return;
        }

        let want_bytes = CHUNK_FRAMES * self.channels as usize * 2;
        let mut buf = vec![0u8; want_bytes];
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) => {
                    log::warn!("raw audio source read failed: {e}");
                    break;
                }
            }
        }

        if filled < buf.len() {
            self.eof = true;
        }

        for pair in buf[..filled - filled % 2].chunks_exact(2) {
            self.chunk.push_back(i16::from_le_bytes([pair[0], pair[1]]));
        }
    }
}

impl AudioSource for RawAudioSource {
    fn channels(&self) -> u8 {
        self.channels
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn read(&mut self, out: &mut [i16]) -> usize {
        let mut n = 0;
        while n < out.len() {
            if self.chunk.is_empty() {
                self.refill();
                if self.chunk.is_empty() {
                    break;
                }
            }
            out[n] = self.chunk.pop_front().expect("just checked non-empty");
            n += 1;
        }
        n
    }

    fn eof(&self) -> bool {
        self.eof && self.chunk.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_a_file_fully_then_reports_eof() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        let samples: [i16; 4] = [1, -2, 3, -4];
        for s in samples {
            tmp.write_all(&s.to_le_bytes()).unwrap();
        }
        tmp.flush().unwrap();

        let mut source = RawAudioSource::open_file(tmp.path(), 1, 32_000).unwrap();
        let mut out = [0i16; 4];
        let n = source.read(&mut out);
        assert_eq!(n, 4);
        assert_eq!(out, samples);
        assert!(!source.eof());

        let n = source.read(&mut out);
        assert_eq!(n, 0);
        assert!(source.eof());
    }

    #[test]
    fn a_short_read_still_returns_the_samples_it_got() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(&1i16.to_le_bytes()).unwrap();
        tmp.flush().unwrap();

        let mut source = RawAudioSource::open_file(tmp.path(), 1, 32_000).unwrap();
        let mut out = [0i16; 10];
        let n = source.read(&mut out);
        assert_eq!(n, 1);
        assert_eq!(out[0], 1);
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let err = RawAudioSource::open_file("/nonexistent/path.pcm", 1, 32_000).unwrap_err();
        assert!(matches!(err, SourceError::Open(_, _)));
    }

    #[test]
    fn spawned_command_output_is_read_as_pcm() {
        let mut source = RawAudioSource::spawn(r#"printf '\001\000\002\000'"#, 1, 32_000).unwrap();
        let mut out = [0i16; 2];
        let n = source.read(&mut out);
        assert_eq!(n, 2);
        assert_eq!(out, [1, 2]);
    }
}
