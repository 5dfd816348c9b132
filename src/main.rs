#[macro_use]
extern crate clap;

use clap::App;

mod run;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let cli = load_yaml!("cli.yml");
    let matches = App::from_yaml(cli).get_matches();

    run::main_run(&matches)
}
