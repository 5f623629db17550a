use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info};
use traffic_core::{Transport, TransportError};

use super::{DeliverySender, Emitter, HostTransport, SessionTask, TransportEvent};

/// Pacing of a replayed recording.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplayOptions {
    /// Delay between lines that carry no timestamp.
    pub line_interval: Duration,
    /// Playback speed; 2.0 replays twice as fast.
    pub speed: f64,
    /// Start over at the end instead of reporting end of stream.
    pub repeat: bool,
}

impl Default for ReplayOptions {
    fn default() -> Self {
        Self {
            line_interval: Duration::from_millis(100),
            speed: 1.0,
            repeat: false,
        }
    }
}

impl ReplayOptions {
    /// Wait before sending `line`, given the line sent before it.
    #[must_use]
    pub fn delay(&self, previous: Option<&RecordedLine>, line: &RecordedLine) -> Duration {
        let Some(previous) = previous else {
            return Duration::ZERO;
        };
        let recorded = match (previous.at, line.at) {
            (Some(a), Some(b)) => b.saturating_sub(a),
            _ => self.line_interval,
        };
        self.scale(recorded)
    }

    fn scale(&self, duration: Duration) -> Duration {
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return duration;
        }
        // Float to integer casts saturate.
        Duration::from_nanos((duration.as_nanos() as f64 / self.speed).round() as u64)
    }
}

/// One line of a recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedLine {
    /// Offset from the start of the recording, if the line was stamped.
    pub at: Option<Duration>,
    /// Raw line bytes, passed to the tokenizer unchanged.
    pub sentence: Vec<u8>,
}

/// Parse a recording.
///
/// Each line holds one sentence, optionally preceded by a millisecond
/// offset and whitespace (`1500 $PFLAU,...`). Blank lines and lines
/// starting with `#` are skipped. Lines are not required to be UTF-8:
/// serial captures carry line noise, which the tokenizer discards.
#[must_use]
pub fn parse_recording(data: &[u8]) -> Vec<RecordedLine> {
    data.split(|&b| b == b'\n')
        .map(<[u8]>::trim_ascii)
        .filter(|line| !line.is_empty() && !line.starts_with(b"#"))
        .map(|line| match split_stamp(line) {
            Some((millis, sentence)) => RecordedLine {
                at: Some(Duration::from_millis(millis)),
                sentence: sentence.to_vec(),
            },
            None => RecordedLine {
                at: None,
                sentence: line.to_vec(),
            },
        })
        .collect()
}

/// Split `1500 $PFLAU,...` into the offset and the rest of the line.
fn split_stamp(line: &[u8]) -> Option<(u64, &[u8])> {
    let end = line.iter().position(u8::is_ascii_whitespace)?;
    let (stamp, rest) = line.split_at(end);
    if stamp.is_empty() || !stamp.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let millis = std::str::from_utf8(stamp).ok()?.parse().ok()?;
    Some((millis, rest.trim_ascii_start()))
}

/// Replays a recorded FLARM data stream from a file.
///
/// Used for demos and to test against simulator output without hardware.
#[derive(Debug)]
pub struct FileReplayTransport {
    path: PathBuf,
    name: String,
    options: ReplayOptions,
    task: SessionTask,
}

impl FileReplayTransport {
    pub fn new(path: PathBuf, options: ReplayOptions, tx: DeliverySender) -> Self {
        let name = path.display().to_string();
        Self {
            path,
            name,
            options,
            task: SessionTask::new(tx),
        }
    }

    #[inline]
    #[must_use]
    pub fn options(&self) -> &ReplayOptions {
        &self.options
    }
}

impl Transport for FileReplayTransport {
    fn open(&mut self) {
        let path = self.path.clone();
        let options = self.options;
        self.task.spawn(move |emitter| async move {
            run(path, options, emitter).await;
        });
    }

    fn close(&mut self) {
        self.task.abort();
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}

impl HostTransport for FileReplayTransport {
    fn session(&self) -> u64 {
        self.task.session()
    }
}

async fn run(path: PathBuf, options: ReplayOptions, emitter: Emitter) {
    let data = match tokio::fs::read(&path).await {
        Ok(data) => data,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "cannot read recording");
            emitter.fail(e.into());
            return;
        }
    };
    let lines = parse_recording(&data);
    info!(path = %path.display(), lines = lines.len(), "replaying recording");
    if !emitter.send(TransportEvent::Connected) {
        return;
    }

    loop {
        let mut previous = None;
        for line in &lines {
            let delay = options.delay(previous, line);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let mut bytes = Vec::with_capacity(line.sentence.len() + 2);
            bytes.extend_from_slice(&line.sentence);
            bytes.extend_from_slice(b"\r\n");
            if !emitter.send(TransportEvent::Data(bytes)) {
                return;
            }
            previous = Some(line);
        }
        if !options.repeat || lines.is_empty() {
            break;
        }
        debug!(path = %path.display(), "restarting recording");
        tokio::time::sleep(options.scale(options.line_interval)).await;
    }
    emitter.fail(TransportError::EndOfStream);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_recording() {
        let text = b"# recorded on the ground\r\n\
                    $PFLAU,0,1,1,1,0,,0,,*63\r\n\
                    \r\n\
                    1500 $PGRMZ,246,F,2*3A\n\
                    2000\t$PFLAV,A,2.00,7.20,*0B\n";
        let lines = parse_recording(text);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].at, None);
        assert_eq!(lines[0].sentence, b"$PFLAU,0,1,1,1,0,,0,,*63");
        assert_eq!(lines[1].at, Some(Duration::from_millis(1500)));
        assert_eq!(lines[1].sentence, b"$PGRMZ,246,F,2*3A");
        assert_eq!(lines[2].at, Some(Duration::from_millis(2000)));
    }

    #[test]
    fn test_parse_recording_keeps_invalid_utf8() {
        let data = b"0 $PFLAU,0,1,1,1,0,,0,,*63\n\xff\xfe noise\n10 $PGRMZ,246,F,2*3A\n";
        let lines = parse_recording(data);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].at, None);
        assert_eq!(lines[1].sentence, b"\xff\xfe noise");
        assert_eq!(lines[2].at, Some(Duration::from_millis(10)));
        assert_eq!(lines[2].sentence, b"$PGRMZ,246,F,2*3A");
    }

    #[test]
    fn test_delay_uses_timestamps_and_speed() {
        let options = ReplayOptions {
            line_interval: Duration::from_millis(100),
            speed: 2.0,
            repeat: false,
        };
        let a = RecordedLine {
            at: Some(Duration::from_millis(1000)),
            sentence: Vec::new(),
        };
        let b = RecordedLine {
            at: Some(Duration::from_millis(1600)),
            sentence: Vec::new(),
        };
        let c = RecordedLine {
            at: None,
            sentence: Vec::new(),
        };
        assert_eq!(options.delay(None, &a), Duration::ZERO);
        assert_eq!(options.delay(Some(&a), &b), Duration::from_millis(300));
        assert_eq!(options.delay(Some(&b), &c), Duration::from_millis(50));
        // Out-of-order stamps do not go negative.
        assert_eq!(options.delay(Some(&b), &a), Duration::ZERO);
    }
}
