use super::{parse_phrase, VoiceSender};
use crate::config::{SpeechConfig, ENV_SPEECH_API_KEY, ENV_SPEECH_REGION};
use std::io::{self, BufRead, BufReader, Read};
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};

#[derive(Debug, thiserror::Error)]
pub enum VoiceError {
    #[error("failed to start speech recognizer '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("speech recognizer '{0}' has no stdout")]
    NoOutput(String),

    #[error("failed to start recognizer reader thread: {0}")]
    Thread(#[source] io::Error),
}

/// The external speech-to-text process and the thread forwarding its phrases.
///
/// The recognizer prints one recognized phrase per line on stdout. The child
/// runs in its own process group, which is killed as a whole when this is shut
/// down or dropped.
#[derive(Debug)]
pub struct Recognizer {
    child: Option<Child>,

    /// Ends by itself once every process holding the pipe is gone
    reader: Option<JoinHandle<()>>,
}

impl Recognizer {
    pub fn spawn(config: &SpeechConfig, sender: VoiceSender) -> Result<Self, VoiceError> {
        let mut command = Command::new(&config.command);
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());

        #[cfg(unix)]
        std::os::unix::process::CommandExt::process_group(&mut command, 0);

        if let Some(ref key) = config.api_key {
            command.env(ENV_SPEECH_API_KEY, key);
        }
        if let Some(ref region) = config.region {
            command.env(ENV_SPEECH_REGION, region);
        }

        let mut child = command.spawn().map_err(|source| VoiceError::Spawn {
            command: config.command.clone(),
            source,
        })?;

        let Some(stdout) = child.stdout.take() else {
            let _ = child.kill();
            return Err(VoiceError::NoOutput(config.command.clone()));
        };

        let reader = match forward_phrases(stdout, sender) {
            Ok(reader) => reader,
            Err(e) => {
                let _ = child.kill();
                return Err(e);
            }
        };

        tracing::info!(command = %config.command, pid = child.id(), "speech recognizer started");

        Ok(Self {
            child: Some(child),
            reader: Some(reader),
        })
    }

    /// Kill the recognizer with everything it started. Never waits on the
    /// reader thread.
    pub fn shutdown(&mut self) {
        if let Some(mut child) = self.child.take() {
            kill_group(&child);
            if let Err(e) = child.kill() {
                tracing::debug!("recognizer already gone: {e}");
            }
            let _ = child.wait();
            tracing::info!("speech recognizer stopped");
        }

        // Detached, it finishes on EOF
        self.reader.take();
    }
}

impl Drop for Recognizer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(unix)]
fn kill_group(child: &Child) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    let Ok(pid) = i32::try_from(child.id()) else {
        return;
    };

    if let Err(e) = killpg(Pid::from_raw(pid), Signal::SIGKILL) {
        tracing::debug!("recognizer process group already gone: {e}");
    }
}

#[cfg(not(unix))]
fn kill_group(_child: &Child) {}

/// Read phrases line by line from `source` on a new thread and push the
/// resulting tokens. The thread ends when `source` closes.
pub fn forward_phrases<R>(source: R, sender: VoiceSender) -> Result<JoinHandle<()>, VoiceError>
where
    R: Read + Send + 'static,
{
    thread::Builder::new()
        .name("speech-reader".to_string())
        .spawn(move || {
            for line in BufReader::new(source).lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        tracing::warn!("speech recognizer output unreadable: {e}");
                        break;
                    }
                };

                let phrase = line.trim();
                if phrase.is_empty() {
                    continue;
                }

                tracing::info!("Recognized: {phrase}");

                for token in parse_phrase(phrase) {
                    tracing::info!(%token, "voice command");
                    sender.push(token);
                }
            }
        })
        .map_err(VoiceError::Thread)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voice::{channel, VoiceToken};
    use std::io::Cursor;

    #[test]
    fn forwards_parsed_lines() {
        let (tx, mut rx) = channel(8);
        let input = Cursor::new("Jump!\n\nhello world\nset name: Ada\n");

        forward_phrases(input, tx).unwrap().join().unwrap();

        assert_eq!(rx.try_take(), Some(VoiceToken::Jump));
        assert_eq!(rx.try_take(), Some(VoiceToken::SetName("Ada".to_string())));
        assert_eq!(rx.try_take(), None);
    }

    #[cfg(unix)]
    #[test]
    fn shutdown_kills_processes_started_by_a_wrapper() {
        use std::os::unix::fs::PermissionsExt;
        use std::time::{Duration, Instant};

        let tmp = tempfile::TempDir::new().unwrap();
        let script = tmp.path().join("speech-recognizer");
        std::fs::write(&script, "#!/bin/sh\necho jump\nsleep 20\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let (tx, mut rx) = channel(8);
        let config = SpeechConfig {
            api_key: Some("key".to_string()),
            region: None,
            command: script.display().to_string(),
        };
        let mut recognizer = Recognizer::spawn(&config, tx).unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while rx.is_empty() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(rx.try_take(), Some(VoiceToken::Jump));

        let started = Instant::now();
        recognizer.shutdown();
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn missing_command_fails_to_spawn() {
        let (tx, _rx) = channel(1);
        let config = SpeechConfig {
            api_key: Some("key".to_string()),
            region: None,
            command: "/definitely/not/a/recognizer".to_string(),
        };

        let err = Recognizer::spawn(&config, tx).unwrap_err();
        assert!(matches!(err, VoiceError::Spawn { .. }));
    }
}
