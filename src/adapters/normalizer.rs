use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use tracing::debug;

use crate::domain::DomainError;

/// Peak-normalize a WAV file in place to a target dBFS level.
///
/// Linear, single-pass, channel-uniform gain: after rescaling, the true peak
/// equals `10^(target_db/20)` within floating-point rounding. Silent input is
/// left byte-identical, which also avoids a division by zero. The file is
/// rewritten as 32-bit float at the original sample rate and channel count.
pub fn normalize_wav(path: &Path, target_db: f64) -> Result<(), DomainError> {
    let reader = WavReader::open(path).map_err(|e| DomainError::Normalization(e.to_string()))?;
    let spec = reader.spec();
    let samples = decode(reader, &spec)?;

    let peak = samples.iter().fold(0.0f32, |max, s| max.max(s.abs()));
    if peak == 0.0 {
        debug!(path = ?path, "Silent input, skipping normalization");
        return Ok(());
    }

    let gain = (10f64.powf(target_db / 20.0) / peak as f64) as f32;
    let out_spec = WavSpec {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer =
        WavWriter::create(path, out_spec).map_err(|e| DomainError::Normalization(e.to_string()))?;
    for sample in samples {
        writer
            .write_sample(sample * gain)
            .map_err(|e| DomainError::Normalization(e.to_string()))?;
    }
    writer
        .finalize()
        .map_err(|e| DomainError::Normalization(e.to_string()))?;
    debug!(path = ?path, peak = peak, gain = gain, "Normalized waveform");
    Ok(())
}

/// Decode interleaved samples to f32 regardless of the stored format.
fn decode<R: std::io::Read>(
    mut reader: WavReader<R>,
    spec: &WavSpec,
) -> Result<Vec<f32>, DomainError> {
    match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DomainError::Normalization(e.to_string())),
        SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| DomainError::Normalization(e.to_string()))
        }
    }
}
