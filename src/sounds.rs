use crate::telemetry::AudioCue;
use rodio::{Sample, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{mpsc, Arc};
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{error, warn};

#[derive(Clone, Debug)]
pub enum SoundMsg {
    Engine(AudioCue),
    Stop,
}

pub struct EngineSound {
    thread: Option<JoinHandle<()>>,
    sender: Sender<SoundMsg>,
}

impl EngineSound {
    pub fn new(sample: PathBuf) -> EngineSound {
        let (tx, rx) = mpsc::channel();

        let t = thread::spawn(move || {
            let device = match rodio::default_output_device() {
                Some(device) => device,
                None => {
                    warn!("no audio output device, engine sound disabled");
                    return;
                }
            };

            let file = match File::open(&sample) {
                Ok(file) => file,
                Err(e) => {
                    error!(path = %sample.display(), "cannot open engine sample: {}", e);
                    return;
                }
            };
            let source = match rodio::Decoder::new(BufReader::new(file)) {
                Ok(source) => source.buffered().repeat_infinite(),
                Err(e) => {
                    error!(path = %sample.display(), "cannot decode engine sample: {}", e);
                    return;
                }
            };
            let source = AdjustableSpeed {
                input: source,
                factor: Arc::new(AtomicI32::new(10000)),
            };
            let engine_speed = source.factor.clone();
            let engine_sink = Sink::new(&device);
            engine_sink.append(source);
            engine_sink.set_volume(0.0);

            let mut running = true;
            while running {
                match rx.recv() {
                    Ok(msg) => match msg {
                        SoundMsg::Stop => {
                            running = false;
                        }
                        SoundMsg::Engine(cue) => {
                            engine_speed.store((cue.rate * 10000.0) as i32, Ordering::SeqCst);
                            engine_sink.set_volume(cue.volume);
                        }
                    },
                    Err(e) => {
                        warn!("sound thread died: {:?}", e);
                        running = false;
                    }
                }
            }
        });

        EngineSound {
            thread: Some(t),
            sender: tx,
        }
    }

    pub fn update(&self, cue: AudioCue) {
        self.sender.send(SoundMsg::Engine(cue)).unwrap_or_default();
    }
}

impl Drop for EngineSound {
    fn drop(&mut self) {
        self.sender.send(SoundMsg::Stop).unwrap_or_default();
        self.thread.take().map(JoinHandle::join);
    }
}

#[derive(Clone, Debug)]
pub struct AdjustableSpeed<I> {
    input: I,
    factor: Arc<AtomicI32>,
}

impl<I> Iterator for AdjustableSpeed<I>
where
    I: Source,
    I::Item: Sample,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        self.input.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.input.size_hint()
    }
}

impl<I> Source for AdjustableSpeed<I>
where
    I: Source,
    I::Item: Sample,
{
    fn current_frame_len(&self) -> Option<usize> {
        self.input.current_frame_len()
    }

    fn channels(&self) -> u16 {
        self.input.channels()
    }

    fn sample_rate(&self) -> u32 {
        let f = self.factor.load(Ordering::SeqCst) as f32 / 10000.0;
        (self.input.sample_rate() as f32 * f) as u32
    }

    #[inline]
    fn total_duration(&self) -> Option<Duration> {
        let f = self.factor.load(Ordering::SeqCst) as f32 / 10000.0;
        if f <= 0.0 {
            return None;
        }
        self.input
            .total_duration()
            .map(|d| Duration::from_secs_f32(d.as_secs_f32() / f))
    }
}
