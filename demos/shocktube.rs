use clap::Parser;
use log::{error, info, LevelFilter};
use simple_logger::SimpleLogger;
use radhydro::boundary::Boundary;
use radhydro::config::{HydroFloors, IntegratorConfig, TimeIntegrator};
use radhydro::hydro::euler::{Conserved, Primitive};
use radhydro::integrator::Integrator;
use radhydro::mesh::Mesh;
use radhydro::patch::Patch;
use radhydro::reconstruct::Reconstruction;
use radhydro::solvers::HydroSystem;

const GAMMA: f64 = 1.4;




/**
 * One-dimensional hydrodynamic shock tube, with a dense, high-pressure
 * region on the left half of the unit interval.
 */
#[derive(Debug, Parser)]
#[clap(version = "1.0", author = "J. Zrake <jzrake@clemson.edu>")]
struct Opts {
    #[clap(short = 'n', long, default_value = "400")]
    num_zones: i64,

    #[clap(short = 't', long, default_value = "0.1")]
    tfinal: f64,

    #[clap(long, default_value = "0.3")]
    cfl: f64,

    #[clap(long)]
    plm: bool,

    #[clap(long)]
    sdc: bool,

    #[clap(short = 'o', long, default_value = "shocktube.cbor")]
    output: String,
}




#[derive(serde::Serialize)]


/**
 * The final state, with the primitive variables at each zone center
 */
struct Output {
    config: IntegratorConfig,
    time: f64,
    cycle: u64,
    x: Vec<f64>,
    primitive: Vec<[f64; 5]>,
    state: Patch,
}




// ============================================================================
fn initial_state(x: (f64, f64, f64), s: &mut [f64]) {
    let p = if x.0 < 0.5 {
        Primitive(10.0, 0.0, 0.0, 0.0, 100.0)
    } else {
        Primitive(1.0, 0.0, 0.0, 0.0, 1.0)
    };
    p.to_conserved(GAMMA).write_to_slice(s)
}




// ============================================================================
fn run(opts: &Opts) -> Result<Output, radhydro::Error> {
    let config = IntegratorConfig {
        cfl_number: opts.cfl,
        reconstruction: if opts.plm || opts.sdc { Reconstruction::Linear } else { Reconstruction::Parabolic },
        time_integrator: if opts.sdc { TimeIntegrator::Sdc2 } else { TimeIntegrator::Rk2 },
        ..Default::default()
    };
    let system = HydroSystem::new(GAMMA, HydroFloors::default());
    let mut integrator = Integrator::new(system, Boundary::default(), Mesh::line(0.0, 1.0, opts.num_zones), config.clone())?;
    let mut state = integrator.state_from_function(initial_state);
    let start = std::time::Instant::now();

    while integrator.time < opts.tfinal {
        let dt = integrator.compute_timestep(&state, opts.tfinal - integrator.time);
        integrator.advance_timestep(&mut state, dt)?;
        info!("[{:05}] t={:.4} dt={:.3e}", integrator.cycle, integrator.time, integrator.dt);
    }
    let zone_updates = (integrator.cycle as i64 * integrator.mesh.total_zones()) as f64;
    info!("{:.3} us / zone update", 1e6 * start.elapsed().as_secs_f64() / zone_updates);

    let valid = integrator.valid_space();
    let x = valid.iter().map(|index| integrator.mesh.cell_center(index).0).collect();
    let primitive = valid
        .iter()
        .map(|index| -> Result<[f64; 5], radhydro::Error> {
            let p = Conserved::from_slice(state.get_slice(index)).to_primitive(GAMMA, index)?;
            Ok([p.0, p.1, p.2, p.3, p.4])
        })
        .collect::<Result<_, _>>()?;

    Ok(Output {
        config,
        time: integrator.time,
        cycle: integrator.cycle,
        x,
        primitive,
        state,
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
