// SPDX-License-Identifier: MPL-2.0
//! Input handling while a clip plays.

use crate::application::port::input::{InputSource, SeekDirection};
use crate::config::InputConfig;
use crate::domain::video::SeekStep;
use crate::video_player::clip::VideoClip;
use crate::video_player::player::VideoPlayer;
use log::debug;
use std::time::Duration;

/// How the input loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// The clip stopped playing on its own; the caller still owns the stop.
    Finished,
    /// A select/cancel/special gesture aborted and stopped the clip.
    Aborted,
}

/// Polls `input` once per tick until `clip` stops playing.
pub struct PlaybackInput {
    poll_interval: Duration,
    seek_back: SeekStep,
    seek_forward: SeekStep,
}

impl PlaybackInput {
    pub fn new(settings: &InputConfig) -> Self {
        Self {
            poll_interval: settings.poll_interval(),
            seek_back: settings.seek_back(),
            seek_forward: settings.seek_forward(),
        }
    }

    /// Seek target for a directional gesture, clamped at the start.
    #[must_use]
    pub fn seek_target(&self, position: Duration, direction: SeekDirection) -> Duration {
        match direction {
            SeekDirection::Back => position.saturating_sub(self.seek_back.as_duration()),
            SeekDirection::Forward => position + self.seek_forward.as_duration(),
        }
    }

    pub async fn run(
        &self,
        player: &VideoPlayer,
        clip: &mut VideoClip,
        input: &mut dyn InputSource,
    ) -> InputOutcome {
        while clip.is_playing() {
            let gesture = input.poll();

            if gesture.wants_abort() {
                debug!("clip '{}' aborted by input", clip.filename());
                player.stop(clip).await;
                return InputOutcome::Aborted;
            }

            if let Some(direction) = gesture.seek_direction() {
                // Unsynced clips cannot seek.
                if clip.is_audio_synced() {
                    let target = self.seek_target(clip.shared().position(), direction);
                    player.seek_audio(clip, target);
                    tokio::task::yield_now().await;
                }
            }

            tokio::time::sleep(self.poll_interval).await;
        }
        InputOutcome::Finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::port::input::MenuInput;
    use crate::infrastructure::input::ScriptedInput;
    use crate::test_utils::{fixture, synced_clip, timed_clip};

    fn settings() -> PlaybackInput {
        PlaybackInput::new(&InputConfig::default())
    }

    #[test]
    fn backward_seek_clamps_at_zero() {
        let input = settings();
        assert_eq!(
            input.seek_target(Duration::from_millis(1_500), SeekDirection::Back),
            Duration::ZERO
        );
        assert_eq!(
            input.seek_target(Duration::from_secs(5), SeekDirection::Back),
            Duration::from_secs(3)
        );
        assert_eq!(
            input.seek_target(Duration::from_secs(5), SeekDirection::Forward),
            Duration::from_secs(6)
        );
    }

    #[test]
    fn nan_seek_setting_does_not_break_seeking() {
        let settings = InputConfig {
            seek_back_secs: f64::NAN,
            ..InputConfig::default()
        };
        let input = PlaybackInput::new(&settings);
        assert_eq!(
            input.seek_target(Duration::from_secs(3), SeekDirection::Back),
            Duration::from_secs(1)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_gesture_stops_the_clip() {
        let fx = fixture();
        let mut clip = timed_clip(100, 40);
        fx.player.start(&mut clip, 0, 0).expect("clip should start");

        let mut input = ScriptedInput::new([
            MenuInput::default(),
            MenuInput {
                cancel: true,
                ..MenuInput::default()
            },
        ]);
        let outcome = settings().run(&fx.player, &mut clip, &mut input).await;

        assert_eq!(outcome, InputOutcome::Aborted);
        assert!(!clip.is_playing());
        assert!(clip.has_decoder());
    }

    #[tokio::test(start_paused = true)]
    async fn clip_end_finishes_the_loop() {
        let fx = fixture();
        let mut clip = timed_clip(3, 40);
        fx.player.start(&mut clip, 0, 0).expect("clip should start");

        let mut input = ScriptedInput::idle();
        let outcome = settings().run(&fx.player, &mut clip, &mut input).await;

        assert_eq!(outcome, InputOutcome::Finished);
        fx.player.stop(&mut clip).await;
    }

    #[tokio::test(start_paused = true)]
    async fn directional_input_seeks_synced_soundtrack() {
        let fx = fixture();
        fx.audio.add_track("synced.duk");
        let mut clip = synced_clip(100, 40);
        fx.player.start(&mut clip, 0, 0).expect("clip should start");
        clip.shared().set_position(Duration::from_secs(3));

        let mut input = ScriptedInput::new([
            MenuInput {
                left: true,
                ..MenuInput::default()
            },
            MenuInput {
                select: true,
                ..MenuInput::default()
            },
        ]);
        settings().run(&fx.player, &mut clip, &mut input).await;

        assert_eq!(fx.audio.seeks().first(), Some(&Duration::from_secs(1)));
    }

    #[tokio::test(start_paused = true)]
    async fn directional_input_ignored_for_timed_clip() {
        let fx = fixture();
        let mut clip = timed_clip(100, 40);
        fx.player.start(&mut clip, 0, 0).expect("clip should start");

        let mut input = ScriptedInput::new([
            MenuInput {
                right: true,
                ..MenuInput::default()
            },
            MenuInput {
                special: true,
                ..MenuInput::default()
            },
        ]);
        settings().run(&fx.player, &mut clip, &mut input).await;

        assert!(fx.audio.seeks().is_empty());
    }
}
