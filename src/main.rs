// SPDX-License-Identifier: MPL-2.0
use clip_player::application::port::audio::AudioEngine;
use clip_player::config::{self, Config};
use clip_player::infrastructure::{
    AudioPacing, Framebuffer, ScriptedInput, SimulatedAudio, TestPatternDecoder,
};
use clip_player::video_player::{PlaybackInput, VideoClip, VideoPlayer};
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

const CLIP_NAME: &str = "demo.duk";

struct Flags {
    frames: i64,
    fps: u32,
    synced: bool,
    width: i32,
    height: i32,
    x: i32,
    y: i32,
    config_path: Option<PathBuf>,
}

fn parse_flags() -> Result<Flags, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();
    Ok(Flags {
        frames: args.opt_value_from_str("--frames")?.unwrap_or(75),
        fps: args.opt_value_from_str("--fps")?.unwrap_or(25),
        synced: args.contains("--synced"),
        width: args.opt_value_from_str("--width")?.unwrap_or(160),
        height: args.opt_value_from_str("--height")?.unwrap_or(120),
        x: args.opt_value_from_str("--x")?.unwrap_or(80),
        y: args.opt_value_from_str("--y")?.unwrap_or(60),
        config_path: args.opt_value_from_str("--config")?,
    })
}

fn main() -> ExitCode {
    let flags = match parse_flags() {
        Ok(flags) => flags,
        Err(err) => {
            eprintln!("invalid arguments: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let config = match &flags.config_path {
        Some(path) => config::load_from_path(path),
        None => config::load(),
    }
    .unwrap_or_else(|err| {
        eprintln!("using default settings: {}", err);
        Config::default()
    });

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.filter.as_str()),
    )
    .init();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_time()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            error!("cannot start runtime: {}", err);
            return ExitCode::FAILURE;
        }
    };

    if runtime.block_on(run(&flags, &config)) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

async fn run(flags: &Flags, config: &Config) -> bool {
    let frame_interval = Duration::from_secs(1) / flags.fps.max(1);
    let runtime = tokio::runtime::Handle::current();

    let (framebuffer, screen) = Framebuffer::shared(config.screen.extent());
    let audio = Arc::new(SimulatedAudio::paced(
        runtime.clone(),
        AudioPacing {
            frame_interval,
            frame_count: flags.frames,
            latency_buffers: 2,
        },
    ));
    audio.add_track(CLIP_NAME);
    let engine: Arc<dyn AudioEngine> = audio;
    let player = VideoPlayer::new(runtime, engine, screen, config);

    let decoder = TestPatternDecoder::new(CLIP_NAME, flags.frames)
        .with_extent(flags.width, flags.height)
        .with_frame_interval(frame_interval)
        .audio_synced(flags.synced);
    let probe = decoder.probe();
    let mut clip = VideoClip::new(Box::new(decoder));

    player.fade_clear_screen().await;
    if !player.play(&mut clip, flags.x, flags.y) {
        error!("clip '{}' could not be started", CLIP_NAME);
        return false;
    }

    let outcome = PlaybackInput::new(&config.input)
        .run(&player, &mut clip, &mut ScriptedInput::idle())
        .await;
    player.stop(&mut clip).await;

    let fb = Framebuffer::inspect(&framebuffer);
    info!(
        "{:?}: decoded {} frames, presented {}, {} seeks",
        outcome,
        probe.decoded(),
        fb.blits().len(),
        probe.seeks().len()
    );
    true
}
