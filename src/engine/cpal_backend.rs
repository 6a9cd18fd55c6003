use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SampleFormat, SizedSample, Stream, StreamConfig};
use rtrb::{Consumer, Producer, RingBuffer};

use crate::{
    engine::{backend::OutputBackend, EngineSettings},
    error::{PlaygroundError, Result},
    synth::{bank::VoiceBank, message::VoiceCommand},
    MAX_BLOCK_SIZE,
};

/// Real output through the default cpal device.
///
/// The [`VoiceBank`] moves into the device callback; commands reach it
/// through a wait-free SPSC ring, so the control thread never blocks on the
/// audio thread and per-voice writes stay in order.
pub struct CpalBackend {
    stream: Stream,
    tx: Producer<VoiceCommand>,
    sample_rate: f32,
}

impl CpalBackend {
    /// Open the default output device and start streaming silence.
    pub fn open(settings: &EngineSettings) -> Result<Self> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or_else(|| {
            PlaygroundError::DeviceUnavailable("no default output device available".into())
        })?;
        let supported = device
            .default_output_config()
            .map_err(|e| PlaygroundError::StreamConfig(e.to_string()))?;
        let format = supported.sample_format();

        let config: StreamConfig = supported.config();
        let sample_rate = config.sample_rate.0 as f32;

        let (tx, rx) = RingBuffer::<VoiceCommand>::new(settings.command_capacity);
        let bank = VoiceBank::new(sample_rate, settings.voice_capacity);

        let stream = match format {
            SampleFormat::F32 => build_output_stream::<f32>(&device, &config, bank, rx)?,
            SampleFormat::I16 => build_output_stream::<i16>(&device, &config, bank, rx)?,
            SampleFormat::U16 => build_output_stream::<u16>(&device, &config, bank, rx)?,
            other => {
                return Err(PlaygroundError::StreamConfig(format!(
                    "unsupported sample format {other:?}"
                )))
            }
        };

        stream
            .play()
            .map_err(|e| PlaygroundError::Stream(e.to_string()))?;

        log::debug!(
            "cpal output open: {sample_rate} Hz, {} channel(s), {format:?}",
            config.channels
        );

        Ok(Self {
            stream,
            tx,
            sample_rate,
        })
    }
}

fn build_output_stream<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    mut bank: VoiceBank,
    mut rx: Consumer<VoiceCommand>,
) -> Result<Stream>
where
    T: SizedSample + FromSample<f32>,
{
    let channels = config.channels as usize;
    let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];

    device
        .build_output_stream::<T, _, _>(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                bank.drain(&mut rx);
                write_interleaved(data, channels, &mut bank, &mut render_buf);
            },
            |err| log::error!("output stream error: {err}"),
            None,
        )
        .map_err(|e| PlaygroundError::Stream(e.to_string()))
}

/// Render the bank into an interleaved device buffer, duplicating the mono
/// mix to every channel and converting to the device's sample type.
fn write_interleaved<T>(data: &mut [T], channels: usize, bank: &mut VoiceBank, render_buf: &mut [f32])
where
    T: SizedSample + FromSample<f32>,
{
    let channels = channels.max(1);
    let total_frames = data.len() / channels;
    let mut frames_written = 0;
    while frames_written < total_frames {
        let frames_to_render = (total_frames - frames_written)
            .min(render_buf.len())
            .min(MAX_BLOCK_SIZE);
        let block = &mut render_buf[..frames_to_render];
        bank.render_block(block);

        let out_off = frames_written * channels;
        let out = &mut data[out_off..out_off + frames_to_render * channels];
        for (frame, &s) in out.chunks_exact_mut(channels).zip(block.iter()) {
            frame.fill(T::from_sample(s));
        }
        frames_written += frames_to_render;
    }
}

impl OutputBackend for CpalBackend {
    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn send(&mut self, cmd: VoiceCommand) -> bool {
        self.tx.push(cmd).is_ok()
    }

    fn resume(&mut self) -> Result<()> {
        self.stream
            .play()
            .map_err(|e| PlaygroundError::Stream(e.to_string()))
    }

    fn suspend(&mut self) -> Result<()> {
        self.stream
            .pause()
            .map_err(|e| PlaygroundError::Stream(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dsp::Waveform,
        synth::message::VoiceId,
    };

    fn square_bank(gain: f32) -> VoiceBank {
        let mut bank = VoiceBank::new(1_000.0, 2);
        bank.apply(VoiceCommand::Start {
            id: VoiceId(1),
            waveform: Waveform::Square,
            frequency: 10.0,
            gain,
        });
        bank
    }

    #[test]
    fn converts_to_i16_and_fills_every_channel() {
        let mut bank = square_bank(0.5);
        let mut scratch = vec![0.0f32; MAX_BLOCK_SIZE];
        let mut data = [0i16; 64];
        write_interleaved(&mut data, 2, &mut bank, &mut scratch);

        for frame in data.chunks_exact(2) {
            assert_eq!(frame[0], frame[1]);
            assert_eq!(frame[0].unsigned_abs(), 16_384);
        }
    }

    #[test]
    fn silence_maps_to_the_midpoint_for_unsigned_output() {
        let mut bank = VoiceBank::new(1_000.0, 2);
        let mut scratch = vec![0.0f32; MAX_BLOCK_SIZE];
        let mut data = [0u16; 8];
        write_interleaved(&mut data, 1, &mut bank, &mut scratch);
        assert!(data.iter().all(|&s| s == 32_768));
    }

    #[test]
    fn small_scratch_still_fills_the_whole_buffer() {
        let mut bank = square_bank(1.0);
        let mut scratch = vec![0.0f32; 3];
        let mut data = [0.0f32; 20];
        write_interleaved(&mut data, 2, &mut bank, &mut scratch);
        assert!(data.iter().all(|s| s.abs() == 1.0));
    }
}
