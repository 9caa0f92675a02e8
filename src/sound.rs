/// Plays the notification tone without blocking the caller.
#[cfg(feature = "sound")]
pub fn play_tone() {
    std::thread::spawn(|| {
        if let Err(e) = tone::play_blocking() {
            tracing::warn!("Unable to play notification tone: {e}");
        }
    });
}

/// Rings the terminal bell. Build with the `sound` feature for a real tone.
#[cfg(not(feature = "sound"))]
pub fn play_tone() {
    use std::io::Write;

    let mut stderr = std::io::stderr();
    if let Err(e) = stderr.write_all(b"\x07").and_then(|()| stderr.flush()) {
        tracing::debug!("Unable to ring terminal bell: {e}");
    }
}

#[cfg(feature = "sound")]
mod tone {
    use std::{error::Error, time::Duration};

    use rodio::{source::SineWave, OutputStream, Sink, Source};

    // A4, one second, half volume
    const FREQUENCY_HZ: f32 = 440.0;
    const LENGTH: Duration = Duration::from_secs(1);
    const GAIN: f32 = 0.5;

    pub fn play_blocking() -> Result<(), Box<dyn Error>> {
        let (_stream, stream_handle) = OutputStream::try_default()?;
        let sink = Sink::try_new(&stream_handle)?;

        sink.append(
            SineWave::new(FREQUENCY_HZ)
                .take_duration(LENGTH)
                .amplify(GAIN),
        );
        sink.sleep_until_end();

        Ok(())
    }
}
