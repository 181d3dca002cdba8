use std::process::{Command, Stdio};

use crate::config::{BackendConfig, Chord};

/// Best-effort key injection. Implementations report success and never retry.
pub trait CommandSink {
    fn send_key(&mut self, key: &str) -> bool;
    fn send_combo(&mut self, keys: &[String]) -> bool;
}

/// Logs instead of pressing anything.
#[derive(Debug, Default)]
pub struct DryRunSink;

impl CommandSink for DryRunSink {
    fn send_key(&mut self, key: &str) -> bool {
        log::info!("[dry-run] key {key}");
        true
    }

    fn send_combo(&mut self, keys: &[String]) -> bool {
        log::info!("[dry-run] combo {}", keys.join("+"));
        true
    }
}

/// Runs an external tool such as `xdotool key <keys>`; combos are joined with `+`.
#[derive(Debug, Clone)]
pub struct ProcessSink {
    program: String,
    args: Vec<String>,
}

impl ProcessSink {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    fn run(&self, keys: &str) -> bool {
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(keys)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .status();
        match status {
            Ok(status) if status.success() => true,
            Ok(status) => {
                log::warn!("{} exited with {status} for {keys}", self.program);
                false
            }
            Err(err) => {
                log::warn!("failed to run {}: {err}", self.program);
                false
            }
        }
    }
}

impl CommandSink for ProcessSink {
    fn send_key(&mut self, key: &str) -> bool {
        self.run(key)
    }

    fn send_combo(&mut self, keys: &[String]) -> bool {
        self.run(&keys.join("+"))
    }
}

/// Tries each backend in order until one accepts the keys.
#[derive(Default)]
pub struct FallbackSink {
    sinks: Vec<Box<dyn CommandSink>>,
}

impl FallbackSink {
    pub fn new(sinks: Vec<Box<dyn CommandSink>>) -> Self {
        Self { sinks }
    }

    pub fn from_config(backends: &[BackendConfig]) -> Self {
        let sinks = backends
            .iter()
            .map(|backend| -> Box<dyn CommandSink> {
                match backend {
                    BackendConfig::DryRun => Box::new(DryRunSink),
                    BackendConfig::Process { program, args } => {
                        Box::new(ProcessSink::new(program.clone(), args.clone()))
                    }
                }
            })
            .collect();
        Self::new(sinks)
    }
}

impl CommandSink for FallbackSink {
    fn send_key(&mut self, key: &str) -> bool {
        self.sinks.iter_mut().any(|sink| sink.send_key(key))
    }

    fn send_combo(&mut self, keys: &[String]) -> bool {
        self.sinks.iter_mut().any(|sink| sink.send_combo(keys))
    }
}

/// Sends the first chord that goes through. Single names are plain key
/// presses, longer chords are combinations.
pub fn deliver(sink: &mut dyn CommandSink, chords: &[Chord]) -> bool {
    chords.iter().any(|chord| match chord.as_slice() {
        [] => false,
        [key] => sink.send_key(key),
        keys => sink.send_combo(keys),
    })
}
