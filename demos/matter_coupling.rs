use clap::Parser;
use log::{error, info, LevelFilter};
use simple_logger::SimpleLogger;
use radhydro::boundary::Boundary;
use radhydro::config::{IntegratorConfig, NewtonConfig, RadiationConstants};
use radhydro::integrator::Integrator;
use radhydro::mesh::Mesh;
use radhydro::radiation::{Material, SuOlson, GAS_ENERGY};
use radhydro::solvers::RadiationSystem;

const RHO: f64 = 1e-7;
const ERAD: f64 = 1e12;
const EGAS: f64 = 1e2;




/**
 * Su & Olson (1997) radiation-matter coupling: a uniform, periodic medium
 * whose gas and radiation energies relax toward equilibrium. The gas
 * temperature is compared against the analytic solution.
 */
#[derive(Debug, Parser)]
#[clap(version = "1.0", author = "J. Zrake <jzrake@clemson.edu>")]
struct Opts {
    #[clap(short = 'n', long, default_value = "10000")]
    num_steps: usize,

    #[clap(long, default_value = "1e-8")]
    dt: f64,

    #[clap(short = 'z', long, default_value = "4")]
    num_zones: i64,

    #[clap(long, default_value = "1000")]
    fold: usize,

    #[clap(short = 'o', long, default_value = "matter_coupling.cbor")]
    output: String,
}




#[derive(serde::Serialize)]


/**
 * Run output: the configuration and the temperature history
 */
struct Output {
    config: IntegratorConfig,
    constants: RadiationConstants,
    time: Vec<f64>,
    tgas: Vec<f64>,
    tgas_exact: Vec<f64>,
    relative_l1_error: f64,
}




// ============================================================================
fn run(opts: &Opts) -> Result<Output, radhydro::Error> {
    let constants = RadiationConstants::default();
    let config = IntegratorConfig::default();
    let material = SuOlson { constants: constants.clone() };
    let system = RadiationSystem::new(material, NewtonConfig::default());
    let mut integrator = Integrator::new(system, Boundary::periodic(), Mesh::line(0.0, 1.0, opts.num_zones), config.clone())?;
    let mut state = integrator.state_from_function(|_, s| {
        s.copy_from_slice(&[RHO, 0.0, 0.0, 0.0, EGAS, ERAD, 0.0, 0.0, 0.0])
    });

    let zone = (0, 0, 0);
    let mut time = Vec::with_capacity(opts.num_steps);
    let mut tgas = Vec::with_capacity(opts.num_steps);
    let mut tgas_exact = Vec::with_capacity(opts.num_steps);
    let start = std::time::Instant::now();

    for _ in 0..opts.num_steps {
        integrator.advance_timestep(&mut state, opts.dt)?;

        let material = &integrator.system.material;
        time.push(integrator.time);
        tgas.push(material.tgas_from_egas(RHO, state.get(zone, GAS_ENERGY)));
        tgas_exact.push(material.exact_temperature(RHO, EGAS, ERAD, integrator.time));

        if integrator.cycle as usize % opts.fold == 0 {
            info!("[{:06}] t={:.4e} dt={:.4e} T={:.6e}", integrator.cycle, integrator.time, integrator.dt, tgas[tgas.len() - 1]);
        }
    }
    let elapsed = start.elapsed().as_secs_f64();
    let zone_updates = (opts.num_steps as i64 * integrator.mesh.total_zones()) as f64;
    info!("{:.3} us / zone update", 1e6 * elapsed / zone_updates);

    let err_norm: f64 = tgas.iter().zip(&tgas_exact).map(|(t, e)| (t - e).abs()).sum();
    let sol_norm: f64 = tgas_exact.iter().map(|e| e.abs()).sum();
    let relative_l1_error = err_norm / sol_norm;
    info!("relative L1 error in the gas temperature: {:.4e}", relative_l1_error);

    Ok(Output {
        config,
        constants,
        time,
        tgas,
        tgas_exact,
        relative_l1_error,
    })
}




// ============================================================================
fn main() {
    let opts = Opts::parse();
    SimpleLogger::new().with_level(LevelFilter::Info).init().ok();
    info!("{:?}", opts);

    let output = match run(&opts) {
        Ok(output) => output,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1)
        }
    };

    let written = std::fs::File::create(&opts.output)
        .map(std::io::BufWriter::new)
        .map_err(|e| e.to_string())
        .and_then(|mut buffer| ciborium::ser::into_writer(&output, &mut buffer).map_err(|e| e.to_string()));

    match written {
        Ok(()) => info!("write {}", opts.output),
        Err(e) => {
            error!("{}: {}", opts.output, e);
            std::process::exit(1)
        }
    }
}
