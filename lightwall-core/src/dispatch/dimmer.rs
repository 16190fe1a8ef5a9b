//! Channel commands for the light and laser boards: `SET`, `BLINK`

use lightwall_protocol::{Command, ErrorCode, Reply};

use super::{CommandHandler, MAX_DURATION_MS};
use crate::config::BoardProfile;
use crate::dimmer::BLINK_MS;
use crate::scheduler::DeviceState;
use crate::sync::SharedState;

pub struct DimmerHandler<'a, S, const C: usize> {
    state: &'a S,
    profile: BoardProfile,
}

impl<'a, S, const C: usize> DimmerHandler<'a, S, C>
where
    S: SharedState<DeviceState<C>>,
{
    pub fn new(state: &'a S, profile: BoardProfile) -> Self {
        Self { state, profile }
    }

    /// Number of channels this board actually drives
    pub fn channel_count(&self) -> usize {
        self.profile.channels.min(C)
    }

    fn channel_index(&self, channel: u32) -> Result<usize, ErrorCode> {
        usize::try_from(channel)
            .ok()
            .filter(|&index| index < self.channel_count())
            .ok_or(ErrorCode::UnknownDevice)
    }

    fn set(&self, channel: u32, brightness: u32, duration_ms: u32) -> Result<Reply, ErrorCode> {
        let index = self.channel_index(channel)?;
        let brightness = brightness.min(u32::from(u8::MAX)) as u8;
        let duration_ms = duration_ms.min(MAX_DURATION_MS);

        self.state
            .with_mut(|device| device.channels[index].set(brightness, duration_ms as u16));

        Ok(Reply::Channel {
            channel: index as u8,
            brightness,
            duration_ms,
        })
    }

    fn blink(&self, channel: u32) -> Result<Reply, ErrorCode> {
        let index = self.channel_index(channel)?;
        let level = self
            .state
            .with_mut(|device| device.channels[index].blink(BLINK_MS));

        Ok(Reply::Channel {
            channel: index as u8,
            brightness: level,
            duration_ms: u32::from(BLINK_MS),
        })
    }
}

impl<'a, S, const C: usize> CommandHandler for DimmerHandler<'a, S, C>
where
    S: SharedState<DeviceState<C>>,
{
    fn handle(&mut self, command: Command, _now_ms: u32) -> Reply {
        let result = match command {
            Command::Set {
                channel,
                brightness,
                duration_ms,
            } => self.set(channel, brightness, duration_ms),
            Command::Blink { channel } => self.blink(channel),
            _ => Err(ErrorCode::UnknownAction),
        };

        result.unwrap_or_else(Reply::Error)
    }
}
