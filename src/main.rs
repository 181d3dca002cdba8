mod config;
mod dispatch;
mod gesture;
mod pipeline;
mod scrub;
mod session;
mod smoothing;
mod tap;
mod types;
mod vote;

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::PathBuf,
    thread,
};

use anyhow::{Context, Result, bail};
use crossbeam_channel::{Receiver, bounded};

use config::{BackendConfig, Config, DEFAULT_CONFIG_PATH};
use pipeline::{CommandSink, FallbackSink, FpsMeter, LandmarkSource, ReplaySource, StatusLine};
use session::Session;

const USAGE: &str = "usage: gesture-media [--config PATH] [--replay PATH|-] [--dry-run]";

struct Args {
    config_path: PathBuf,
    replay: Option<String>,
    dry_run: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        replay: None,
        dry_run: false,
    };

    let mut argv = std::env::args().skip(1);
    while let Some(arg) = argv.next() {
        match arg.as_str() {
            "--config" => {
                args.config_path = argv.next().map(PathBuf::from).context(USAGE)?;
            }
            "--replay" => args.replay = Some(argv.next().context(USAGE)?),
            "--dry-run" => args.dry_run = true,
            "-h" | "--help" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            other => bail!("unknown argument {other:?}\n{USAGE}"),
        }
    }
    Ok(args)
}

fn open_source(args: &Args, config: &Config) -> Result<Box<dyn LandmarkSource>> {
    let min_score = config.detector.min_score;
    match args.replay.as_deref() {
        Some("-") => {
            log::info!("replaying landmarks from stdin");
            Ok(Box::new(ReplaySource::new(io::stdin().lock(), min_score)))
        }
        Some(path) => {
            let file = File::open(path).with_context(|| format!("failed to open replay file {path}"))?;
            log::info!("replaying landmarks from {path}");
            Ok(Box::new(ReplaySource::new(BufReader::new(file), min_score)))
        }
        None => open_camera(config),
    }
}

#[cfg(feature = "camera-nokhwa")]
fn open_camera(config: &Config) -> Result<Box<dyn LandmarkSource>> {
    let source = pipeline::CameraSource::open(config).context(
        "could not start camera capture; try changing camera_source in config.json",
    )?;
    Ok(Box::new(source))
}

#[cfg(not(feature = "camera-nokhwa"))]
fn open_camera(_config: &Config) -> Result<Box<dyn LandmarkSource>> {
    bail!("built without camera support; pass --replay")
}

/// Watches the terminal for `q`. Dropping the sender on EOF is not a quit.
fn spawn_quit_watcher() -> Receiver<()> {
    let (tx, rx) = bounded(1);
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if line.trim().eq_ignore_ascii_case("q") {
                let _ = tx.try_send(());
                break;
            }
        }
    });
    rx
}

fn run(
    source: &mut dyn LandmarkSource,
    session: &mut Session,
    sink: &mut dyn CommandSink,
    quit_rx: Option<&Receiver<()>>,
) {
    let mut fps = FpsMeter::new();
    let mut last_command = String::new();
    let mut last_status: Option<StatusLine> = None;

    loop {
        if quit_rx.is_some_and(|rx| rx.try_recv().is_ok()) {
            log::info!("quit requested");
            break;
        }

        let frame = match source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                log::info!("landmark stream ended");
                break;
            }
            Err(err) => {
                log::error!("frame source failed: {err}");
                break;
            }
        };

        let report = session.process(&frame, sink);
        if let Some(dispatched) = report.dispatched.last() {
            last_command = dispatched.status_text();
        }

        let status = StatusLine::new(&report, fps.tick(frame.timestamp), &last_command);
        if last_status.as_ref().is_none_or(|prev| status.differs_from(prev)) {
            log::info!("{status}");
        } else {
            log::debug!("{status}");
        }
        last_status = Some(status);
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = parse_args()?;
    let mut config = Config::load_or_default(&args.config_path);
    if args.dry_run {
        config.backends = vec![BackendConfig::DryRun];
    }

    log::info!(
        "starting with camera source {:?} ({}x{})",
        config.camera_source,
        config.frame_width,
        config.frame_height
    );

    let mut source = open_source(&args, &config)?;
    let quit_rx = if args.replay.as_deref() == Some("-") {
        None
    } else {
        log::info!("type q + Enter to quit");
        Some(spawn_quit_watcher())
    };

    let mut session = Session::new(&config);
    let mut sink = FallbackSink::from_config(&config.backends);
    run(source.as_mut(), &mut session, &mut sink, quit_rx.as_ref());

    Ok(())
}
