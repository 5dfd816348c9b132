use std::error::Error;
use std::path::Path;
use std::sync::atomic::AtomicBool;

use clap::ArgMatches;
use log::info;

use pipeline::{Clock, FixedClock, WallClock};

pub fn main_run(args: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let scene_file = args.value_of("scene").unwrap();
    let dump_folder = args.value_of("output_directory").map(Path::new);

    let config = morpho_scene::load_scene(scene_file)?;
    info!(
        "loaded scene `{}`: {} particles, {:.0} fps",
        scene_file, config.particle_count, config.fps
    );

    let mut clock: Box<dyn Clock> = if args.is_present("realtime") {
        Box::new(WallClock::new())
    } else {
        Box::new(FixedClock::new(1. / config.fps))
    };

    let cancel = AtomicBool::new(false);
    let stats = pipeline::pipeline_run(&config, dump_folder, &mut *clock, &cancel)?;

    println!(
        "simulated {:.2}s over {} frames",
        stats.simulated, stats.frames
    );

    Ok(())
}
