//! Destinations for the per-step trajectory of the bodies.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use crate::{body::BodyState, error::Error};

/// Name of the human-readable trace file.
pub const TEXT_FILE: &str = "output.txt";

/// Name of the structured trace file.
pub const CSV_FILE: &str = "output";

/// Append-only sink receiving the trajectory of a run.
///
/// Calls arrive as one [`header`](Trace::header), then for every step one
/// [`cycle`](Trace::cycle) followed by one [`body`](Trace::body) per body in index order.
pub trait Trace {
    /// Starts the trace of a system of `bodies` bodies.
    fn header(&mut self, bodies: usize);

    /// Starts the block of step `step`, counted from 1.
    fn cycle(&mut self, step: usize);

    /// Records the state of body `index` at the end of the current step.
    fn body(&mut self, index: usize, state: &BodyState);
}

/// [`Trace`] writing a text and a comma-separated trace.
///
/// The first I/O error is kept and every later write is skipped; it is returned by
/// [`finish`](TraceWriter::finish).
#[derive(Debug)]
pub struct TraceWriter<W> {
    text: W,
    csv: W,
    error: Option<io::Error>,
}

impl<W: Write> TraceWriter<W> {
    /// Creates a new writer over the two destinations.
    #[inline]
    pub fn new(text: W, csv: W) -> Self {
        Self {
            text,
            csv,
            error: None,
        }
    }

    /// Flushes both destinations and returns them, or the first error met while writing.
    pub fn finish(mut self) -> Result<(W, W), Error> {
        if self.error.is_none() {
            let flushed = self.text.flush().and_then(|_| self.csv.flush());
            self.latch(flushed);
        }

        match self.error {
            Some(error) => Err(Error::Trace(error)),
            None => Ok((self.text, self.csv)),
        }
    }

    #[inline]
    fn write<F>(&mut self, f: F)
    where
        F: FnOnce(&mut W, &mut W) -> io::Result<()>,
    {
        if self.error.is_none() {
            let written = f(&mut self.text, &mut self.csv);
            self.latch(written);
        }
    }

    #[inline]
    fn latch(&mut self, result: io::Result<()>) {
        if let Err(error) = result {
            log::error!("trace write failed: {error}");
            self.error = Some(error);
        }
    }
}

impl TraceWriter<BufWriter<File>> {
    /// Creates (or truncates) the trace files in `directory`.
    pub fn create(directory: impl AsRef<Path>) -> Result<Self, Error> {
        let directory = directory.as_ref();
        let text = File::create(directory.join(TEXT_FILE))?;
        let csv = File::create(directory.join(CSV_FILE))?;
        log::info!("writing trace to {}", directory.display());

        Ok(Self::new(BufWriter::new(text), BufWriter::new(csv)))
    }
}

impl<W: Write> Trace for TraceWriter<W> {
    fn header(&mut self, bodies: usize) {
        self.write(|text, csv| {
            writeln!(
                text,
                "Body   :     x              y           vx              vy   "
            )?;
            write!(csv, "t")?;
            for n in 1..=bodies {
                write!(csv, ",x{n},y{n}")?;
            }
            Ok(())
        });
    }

    fn cycle(&mut self, step: usize) {
        self.write(|text, csv| {
            write!(text, "\nCycle {step}\n")?;
            write!(csv, "\n{step}")
        });
    }

    fn body(&mut self, index: usize, state: &BodyState) {
        let BodyState {
            position,
            velocity,
            ..
        } = state;

        self.write(|text, csv| {
            writeln!(
                text,
                "Body {} : {:.6}\t{:.6}\t{:.6}\t{:.6}",
                index + 1,
                position.x,
                position.y,
                velocity.x,
                velocity.y
            )?;
            write!(csv, ",{:.6},{:.6}", position.x, position.y)
        });
    }
}

/// A single call received by a [`Recording`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// [`Trace::header`].
    Header(usize),
    /// [`Trace::cycle`].
    Cycle(usize),
    /// [`Trace::body`].
    Body(usize, BodyState),
}

/// [`Trace`] keeping every call in memory, with full precision.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Recording {
    /// Calls in the order they were received.
    pub events: Vec<Event>,
}

impl Recording {
    /// Creates an empty recording.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// States of the bodies at the end of every step, grouped by step.
    pub fn frames(&self) -> Vec<Vec<BodyState>> {
        let mut frames = Vec::new();
        for event in &self.events {
            match *event {
                Event::Header(_) => {}
                Event::Cycle(_) => frames.push(Vec::new()),
                Event::Body(_, state) => {
                    if let Some(frame) = frames.last_mut() {
                        frame.push(state);
                    }
                }
            }
        }

        frames
    }
}

impl Trace for Recording {
    #[inline]
    fn header(&mut self, bodies: usize) {
        self.events.push(Event::Header(bodies));
    }

    #[inline]
    fn cycle(&mut self, step: usize) {
        self.events.push(Event::Cycle(step));
    }

    #[inline]
    fn body(&mut self, index: usize, state: &BodyState) {
        self.events.push(Event::Body(index, *state));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Vector;

    fn state(x: f64, y: f64, vx: f64, vy: f64) -> BodyState {
        BodyState {
            position: Vector::new(x, y),
            velocity: Vector::new(vx, vy),
            acceleration: Vector::ZERO,
        }
    }

    #[test]
    fn writes_text_and_csv() {
        let mut writer = TraceWriter::new(Vec::new(), Vec::new());

        writer.header(2);
        writer.cycle(1);
        writer.body(0, &state(0.0, 1.5, -2.0, 0.125));
        writer.body(1, &state(1e3, -0.0000004, 0.0, 3.0));

        let (text, csv) = writer.finish().unwrap();
        assert_eq!(
            String::from_utf8(text).unwrap(),
            "Body   :     x              y           vx              vy   \n\
             \n\
             Cycle 1\n\
             Body 1 : 0.000000\t1.500000\t-2.000000\t0.125000\n\
             Body 2 : 1000.000000\t-0.000000\t0.000000\t3.000000\n"
        );
        assert_eq!(
            String::from_utf8(csv).unwrap(),
            "t,x1,y1,x2,y2\n1,0.000000,1.500000,1000.000000,-0.000000"
        );
    }

    #[derive(Debug)]
    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn keeps_first_error() {
        let mut writer = TraceWriter::new(Broken, Broken);

        writer.header(1);
        writer.cycle(1);
        writer.body(0, &BodyState::default());

        match writer.finish() {
            Err(Error::Trace(error)) => assert_eq!(error.to_string(), "disk full"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn recording_groups_frames() {
        let mut recording = Recording::new();

        recording.header(1);
        recording.cycle(1);
        recording.body(0, &state(1.0, 0.0, 0.0, 0.0));
        recording.cycle(2);
        recording.body(0, &state(2.0, 0.0, 0.0, 0.0));

        let frames = recording.frames();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1][0].position, Vector::new(2.0, 0.0));
    }
}
