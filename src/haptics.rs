use serde::Serialize;

use crate::proximity::Collision;

pub const MAX_INTENSITY: f64 = 100.0;

/// Linear falloff from 100 at the curve to 0 at the touch threshold.
pub fn touch_intensity(distance: f64, thickness: f64) -> f64 {
    if thickness <= 0.0 {
        return 0.0;
    }
    (MAX_INTENSITY * (1.0 - distance / thickness)).clamp(0.0, MAX_INTENSITY)
}

/// Assigns touched curves to output channels, nearest curve to channel 0.
///
/// `collisions` must already be sorted nearest first. Channels without a
/// touch get 0; intensities are never summed onto one channel.
pub fn distribute_intensities(collisions: &[Collision], channel_count: usize) -> Vec<f64> {
    (0..channel_count)
        .map(|ch| {
            collisions
                .get(ch)
                .map_or(0.0, |c| touch_intensity(c.distance, c.thickness))
        })
        .collect()
}

/// Receives one intensity command per channel per frame (0..=100).
pub trait ActuatorSink {
    fn set_intensity(&mut self, channel: usize, intensity: f64);
}

/// Stand-in for motor hardware: records and logs every command.
#[derive(Debug, Default)]
pub struct SimulatedSink {
    pub commands: Vec<(usize, f64)>,
}

impl SimulatedSink {
    pub fn new() -> SimulatedSink {
        SimulatedSink::default()
    }
}

impl ActuatorSink for SimulatedSink {
    fn set_intensity(&mut self, channel: usize, intensity: f64) {
        log::debug!("[SIM] channel {} intensity {:.1}%", channel, intensity);
        self.commands.push((channel, intensity));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ChannelState {
    #[default]
    Idle,
    Active { intensity: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum HapticEvent {
    Started { channel: usize, intensity: f64 },
    Stopped { channel: usize },
    /// Intensity changed while the channel stayed active.
    Updated { channel: usize, intensity: f64 },
}

/// Per-channel Idle/Active edge detection in front of an [`ActuatorSink`].
#[derive(Debug, Clone)]
pub struct HapticController {
    channels: Vec<ChannelState>,
}

impl HapticController {
    pub fn new(channel_count: usize) -> HapticController {
        HapticController {
            channels: vec![ChannelState::Idle; channel_count],
        }
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn state(&self, channel: usize) -> Option<ChannelState> {
        self.channels.get(channel).copied()
    }

    /// Applies one frame of intensities; missing entries count as 0.
    ///
    /// Sends exactly one command per channel and returns the transitions.
    pub fn update(&mut self, intensities: &[f64], sink: &mut dyn ActuatorSink) -> Vec<HapticEvent> {
        let mut events = Vec::new();
        for (channel, state) in self.channels.iter_mut().enumerate() {
            let intensity = intensities
                .get(channel)
                .copied()
                .unwrap_or(0.0)
                .clamp(0.0, MAX_INTENSITY);
            let event = match (*state, intensity > 0.0) {
                (ChannelState::Idle, true) => {
                    log::info!("channel {} start at {:.1}%", channel, intensity);
                    Some(HapticEvent::Started { channel, intensity })
                }
                (ChannelState::Active { .. }, false) => {
                    log::info!("channel {} stop", channel);
                    Some(HapticEvent::Stopped { channel })
                }
                (ChannelState::Active { intensity: prev }, true) if prev != intensity => {
                    Some(HapticEvent::Updated { channel, intensity })
                }
                _ => None,
            };
            *state = if intensity > 0.0 {
                ChannelState::Active { intensity }
            } else {
                ChannelState::Idle
            };
            sink.set_intensity(channel, intensity);
            events.extend(event);
        }
        events
    }

    /// Forces every channel idle, e.g. on shutdown.
    pub fn stop_all(&mut self, sink: &mut dyn ActuatorSink) -> Vec<HapticEvent> {
        self.update(&[], sink)
    }
}
