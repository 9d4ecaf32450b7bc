use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{bail, Context as AnyhowContext, Result};
use log::warn;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::Deserialize;

use crate::detection::{Detection, Rect};
use crate::image::Image;
use crate::my_types::ImageShape;

/// One frame of scenario input: a synthesized frame buffer plus the
/// detections the external detector reported for it.
pub struct ScenarioFrame {
    pub time: f64,
    pub image: Image,
    pub detections: Vec<Detection>,
}

#[derive(Deserialize)]
struct DetectionRecord {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    #[serde(default = "full_confidence")]
    confidence: f64,
}

fn full_confidence() -> f64 {
    1.
}

#[derive(Deserialize)]
struct FrameRecord {
    time: f64,
    #[serde(default)]
    detections: Vec<DetectionRecord>,
}

/// Streams a recorded scenario from a JSONL file, one frame per line:
/// `{"time": 1.25, "detections": [{"x":.., "y":.., "width":.., "height":.., "confidence":..}]}`
pub struct Dataset {
    reader: BufReader<File>,
    line: String,
    shape: ImageShape,
    pub length: u64,
}

impl Dataset {
    pub fn new(path: &Path, shape: ImageShape) -> Result<Dataset> {
        let count = BufReader::new(
            File::open(path).with_context(|| format!("cannot open scenario {}", path.display()))?,
        )
        .lines()
        .count();
        let file = File::open(path)?;
        Ok(Dataset {
            reader: BufReader::new(file),
            line: String::new(),
            shape,
            length: count as u64,
        })
    }

    pub fn next(&mut self) -> Result<Option<ScenarioFrame>> {
        loop {
            self.line.clear();
            match self.reader.read_line(&mut self.line) {
                Ok(0) => return Ok(None),
                Err(err) => bail!("failed to read scenario line: {}", err),
                _ => {}
            }
            if self.line.trim().is_empty() {
                continue;
            }

            let record: FrameRecord = match serde_json::from_str(&self.line) {
                Ok(record) => record,
                Err(err) => {
                    warn!("skipping unrecognized scenario line ({})", err);
                    continue;
                }
            };

            let detections = record
                .detections
                .iter()
                .map(|d| Detection::new(Rect::new(d.x, d.y, d.width, d.height), d.confidence))
                .collect();

            return Ok(Some(ScenarioFrame {
                time: record.time,
                image: Image::filled(self.shape, 16),
                detections,
            }));
        }
    }
}

const WALKER_COUNT: usize = 3;
const FRAME_INTERVAL: f64 = 1. / 30.;

/// Deterministic stand-in for recorded data: a few walkers crossing the
/// frame with seeded jitter. Same seed, same scenario.
pub struct SyntheticScenario {
    rng: Xoshiro256PlusPlus,
    shape: ImageShape,
    walkers: Vec<Walker>,
    step: usize,
    pub length: u64,
}

struct Walker {
    rect: Rect,
    velocity: f64,
}

impl SyntheticScenario {
    pub fn new(seed: u64, shape: ImageShape, length: usize) -> Self {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let walkers = (0..WALKER_COUNT).map(|_| Walker::spawn(&mut rng, shape)).collect();
        SyntheticScenario {
            rng,
            shape,
            walkers,
            step: 0,
            length: length as u64,
        }
    }

    pub fn next(&mut self) -> Result<Option<ScenarioFrame>> {
        if self.step as u64 >= self.length {
            return Ok(None);
        }
        let time = self.step as f64 * FRAME_INTERVAL;
        self.step += 1;

        let mut detections = vec![];
        for walker in self.walkers.iter_mut() {
            walker.rect.x += walker.velocity + self.rng.gen_range(-0.5..0.5);
            if walker.rect.x < 0. || walker.rect.x + walker.rect.width > self.shape.0 as f64 {
                *walker = Walker::spawn(&mut self.rng, self.shape);
            }
            // the detector misses occasionally
            if self.rng.gen_bool(0.9) {
                detections.push(Detection::new(
                    walker.rect,
                    self.rng.gen_range(0.5..1.0),
                ));
            }
        }

        Ok(Some(ScenarioFrame {
            time,
            image: Image::filled(self.shape, 16),
            detections,
        }))
    }
}

impl Walker {
    fn spawn(rng: &mut Xoshiro256PlusPlus, shape: ImageShape) -> Walker {
        let width = rng.gen_range(40.0..90.0);
        let height = rng.gen_range(120.0..220.0_f64.min(shape.1 as f64 * 0.4));
        let x = rng.gen_range(0.0..shape.0 as f64 - width);
        // feet below the horizon row so the ground-plane model stays sane
        let y = rng.gen_range(shape.1 as f64 * 0.55..shape.1 as f64 - height);
        Walker {
            rect: Rect::new(x, y, width, height),
            velocity: rng.gen_range(-3.0..3.0),
        }
    }
}

/// Either input mode behind one cursor for the frame loop.
pub enum ScenarioSource {
    Recorded(Dataset),
    Synthetic(SyntheticScenario),
}

impl ScenarioSource {
    pub fn next(&mut self) -> Result<Option<ScenarioFrame>> {
        match self {
            ScenarioSource::Recorded(dataset) => dataset.next(),
            ScenarioSource::Synthetic(scenario) => scenario.next(),
        }
    }

    pub fn length(&self) -> u64 {
        match self {
            ScenarioSource::Recorded(dataset) => dataset.length,
            ScenarioSource::Synthetic(scenario) => scenario.length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_is_deterministic() {
        let mut a = SyntheticScenario::new(7, (1280, 720), 20);
        let mut b = SyntheticScenario::new(7, (1280, 720), 20);
        loop {
            match (a.next().unwrap(), b.next().unwrap()) {
                (None, None) => break,
                (Some(fa), Some(fb)) => {
                    assert_eq!(fa.detections.len(), fb.detections.len());
                    for (da, db) in fa.detections.iter().zip(fb.detections.iter()) {
                        assert_eq!(da.bounding_box, db.bounding_box);
                        assert!((da.confidence - db.confidence).abs() < 1e-12);
                    }
                }
                _ => panic!("scenarios ended at different steps"),
            }
        }
    }

    #[test]
    fn test_synthetic_boxes_fit_the_frame() {
        let mut scenario = SyntheticScenario::new(0, (1280, 720), 50);
        while let Some(frame) = scenario.next().unwrap() {
            for detection in &frame.detections {
                assert!(detection.validate().is_ok());
                assert!(detection.bounding_box.x >= 0.);
                assert!(detection.bounding_box.x + detection.bounding_box.width <= 1280.);
                assert!(detection.bounding_box.y + detection.bounding_box.height <= 720.);
            }
        }
    }
}
