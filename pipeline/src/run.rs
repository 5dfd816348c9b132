use std::error::Error;
use std::fs;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use nalgebra::Vector3;

use serde_derive::*;

use field::{Color, ParticleField, TickContext};
use gestures::{classify, SnapshotPublisher};
use morpho_scene::{load_replay, Configuration, ReplayFeed};

/// Frame timing source for the loop. Injectable so offline runs and tests
/// take exact fixed steps while interactive runs measure the wall clock.
pub trait Clock {
    /// Seconds elapsed since the previous frame.
    fn delta(&mut self) -> f32;
}

pub struct FixedClock {
    step: f32,
}

impl FixedClock {
    pub fn new(step: f32) -> FixedClock {
        FixedClock { step }
    }
}

impl Clock for FixedClock {
    fn delta(&mut self) -> f32 {
        self.step
    }
}

pub struct WallClock {
    last: Instant,
}

impl WallClock {
    pub fn new() -> WallClock {
        WallClock {
            last: Instant::now(),
        }
    }
}

impl Clock for WallClock {
    fn delta(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now.duration_since(self.last).as_secs_f32();
        self.last = now;

        delta
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RunStats {
    pub frames: usize,
    pub simulated: f32,
}

#[derive(Serialize)]
struct FrameDump<'a> {
    time: f32,
    point_size: f32,
    color: Color,
    positions: &'a [Vector3<f32>],
}

fn dump_frame(field: &ParticleField, dump_folder: &Path, idx: usize) -> Result<(), Box<dyn Error>> {
    let path = dump_folder.join(format!("{:08}.frame.json", idx));
    let file = BufWriter::new(File::create(path)?);

    serde_json::to_writer(
        file,
        &FrameDump {
            time: field.elapsed(),
            point_size: field.point_size(),
            color: field.color(),
            positions: field.positions(),
        },
    )?;

    Ok(())
}

/// Drives the whole system headlessly, one tick per frame: recorded frames
/// go through the classifier into the snapshot publisher, the shape schedule
/// regenerates the template on change, and the field advances. The cancel
/// flag is checked every iteration so a stop lands within one frame.
pub fn pipeline_run(
    config: &Configuration,
    dump_folder: Option<&Path>,
    clock: &mut dyn Clock,
    cancel: &AtomicBool,
) -> Result<RunStats, Box<dyn Error>> {
    if let Some(folder) = dump_folder {
        fs::create_dir_all(folder)?;
    }

    let mut rng = config.rng();
    let (mut field, mut template) = config.build(&mut rng);

    let mut feed = match &config.replay {
        Some(path) => Some(ReplayFeed::new(load_replay(path)?)),
        None => None,
    };

    let publisher = SnapshotPublisher::new();

    info!(
        "running {} particles for {}s at {} fps",
        field.len(),
        config.max_time,
        config.fps
    );

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed}] [{per_sec}] {bar:40.cyan/blue} {pos:>3}/{len:3} {msg}"),
    );

    let perc = |time: f32| ((time / config.max_time) * 100.).min(100.) as u64;

    let mut total_time = 0.0;
    let mut frames = 0;

    while total_time < config.max_time && !cancel.load(Ordering::Relaxed) {
        let dt = clock.delta();

        // detector cadence: one recorded frame per tick; an exhausted feed
        // behaves like a stopped camera
        if let Some(feed) = feed.as_mut() {
            match feed.advance() {
                Some(frame) => publisher.publish(classify(&frame.hands)),
                None => publisher.clear(),
            }
        }

        template.regenerate(config.shape_at(total_time), &mut rng);

        let snapshot = publisher.latest();
        field.tick(
            dt,
            &TickContext {
                theme: &config.theme,
                gestures: &*snapshot,
                template: &template,
                interaction: config.interaction,
            },
        );

        if let Some(folder) = dump_folder {
            dump_frame(&field, folder, frames)?;
        }

        let old = perc(total_time);
        total_time += dt;
        frames += 1;

        let new = perc(total_time);
        if new > old {
            pb.set_message(
                format!(
                    "shape: {}, size: {:.3}",
                    template.kind().name(),
                    field.point_size()
                )
                .as_str(),
            );
            pb.inc(new - old);
        }
    }

    pb.finish_with_message("run done");

    Ok(RunStats {
        frames,
        simulated: total_time,
    })
}
