use std::f32::consts::TAU;

use everyday_core::SoundOutputBuffer;

/// Peak amplitude of the tone
pub const TONE_VOLUME: f32 = 3000.0;

/// Write `sound.sample_count` stereo frames of a sine at `tone_hz`.
///
/// Continues from `sound.phase` and leaves the advanced phase there, wrapped
/// to `[0, 2π)`. A non-positive tone, or one above the sample rate, is
/// written as silence.
pub fn output_sine(sound: &mut SoundOutputBuffer<'_>, tone_hz: i32) {
    let wave_period = u32::try_from(tone_hz)
        .ok()
        .filter(|&hz| hz > 0)
        .map(|hz| sound.samples_per_second / hz)
        .filter(|&period| period > 0);

    let Some(wave_period) = wave_period else {
        sound.samples.fill(0);
        return;
    };

    let step = TAU / wave_period as f32;
    let mut phase = sound.phase;
    for frame in sound.samples.chunks_exact_mut(2).take(sound.sample_count) {
        let value = (phase.sin() * TONE_VOLUME) as i16;
        frame[0] = value;
        frame[1] = value;
        phase = (phase + step).rem_euclid(TAU);
    }
    sound.phase = phase;
}
