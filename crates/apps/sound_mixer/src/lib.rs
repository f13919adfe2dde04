//! Ambient sound-mixer window engine.
//!
//! Logical state only: which of the three fixed channels play and at what
//! volume. Actual audio output belongs to the renderer.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use serde::{Deserialize, Serialize};

/// One of the fixed ambient channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundChannel {
    /// Rain ambience.
    Rain,
    /// Cafe ambience.
    Cafe,
    /// Forest ambience.
    Forest,
}

impl SoundChannel {
    /// Parses a channel token off the wire.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "rain" => Some(Self::Rain),
            "cafe" => Some(Self::Cafe),
            "forest" => Some(Self::Forest),
            _ => None,
        }
    }
}

/// Playback state of one channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelState {
    /// Whether the channel is audible.
    pub playing: bool,
    /// Channel volume, nominally `0.0..=1.0`.
    pub volume: f64,
}

impl Default for ChannelState {
    fn default() -> Self {
        Self {
            playing: false,
            volume: 0.5,
        }
    }
}

/// Sound-mixer window state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SoundMixerState {
    /// Per-channel states keyed by channel name.
    pub sounds: Sounds,
}

/// The fixed channel set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sounds {
    /// Rain channel.
    pub rain: ChannelState,
    /// Cafe channel.
    pub cafe: ChannelState,
    /// Forest channel.
    pub forest: ChannelState,
}

impl SoundMixerState {
    fn channel_mut(&mut self, channel: SoundChannel) -> &mut ChannelState {
        match channel {
            SoundChannel::Rain => &mut self.sounds.rain,
            SoundChannel::Cafe => &mut self.sounds.cafe,
            SoundChannel::Forest => &mut self.sounds.forest,
        }
    }

    /// Immutable channel access.
    pub fn channel(&self, channel: SoundChannel) -> &ChannelState {
        match channel {
            SoundChannel::Rain => &self.sounds.rain,
            SoundChannel::Cafe => &self.sounds.cafe,
            SoundChannel::Forest => &self.sounds.forest,
        }
    }

    /// Flips a channel between playing and stopped.
    pub fn toggle(&mut self, channel: SoundChannel) {
        let state = self.channel_mut(channel);
        state.playing = !state.playing;
    }

    /// Sets a channel's volume.
    pub fn set_volume(&mut self, channel: SoundChannel, volume: f64) {
        self.channel_mut(channel).volume = volume;
    }
}
