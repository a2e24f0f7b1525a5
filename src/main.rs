use lanyard::Simulation;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut sim = Simulation::new();
    if let Some(path) = std::env::args().nth(1) {
        sim = sim.with_config_file(path);
    }

    if let Err(e) = sim.run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
