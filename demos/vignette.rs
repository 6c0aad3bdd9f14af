//! Evaluates the reference sampling line and prints its efficiencies.
//!
//! Run with `cargo run --example vignette`.

use twine_aerosol::models::aerosol::transport::{
    SamplingLine,
    core::{
        BendMethod, CutDiameterConfig, DistributionConfig, ElementRow, FlowConditions,
        Orientation, ParticleClass, SystemParameters, cut_diameter, discrete_summaries,
        mass_loss_breakdown, total_efficiency,
    },
};
use twine_core::Model;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*};
use uom::si::{
    length::micrometer,
    ratio::{percent, ratio},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(LevelFilter::INFO)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let rows = [
        ElementRow::probe(1, Orientation::Down),
        ElementRow::tube(2, 111.76, 0.0),
        ElementRow::bend(3, 90.0, 12.7),
        ElementRow::tube(4, 111.76, 90.0),
    ];
    let line = SamplingLine::from_rows(DistributionConfig::default(), &rows, BendMethod::McFarland)?;

    let conditions = FlowConditions::default();
    let system = SystemParameters::compute(conditions)?;
    let table = line.call(&conditions)?;

    println!(
        "Re = {:.0} ({:?})",
        system.reynolds().get::<ratio>(),
        system.regime()
    );

    for summary in discrete_summaries(&table, &system) {
        if let ParticleClass::Discrete(d) = summary.class {
            println!(
                "{:>6.1} µm: {:6.2} %",
                d.get::<micrometer>(),
                summary.efficiency.get::<percent>()
            );
        }
    }

    let mass = total_efficiency(&table, &system, ParticleClass::Continuous)?;
    let breakdown = mass_loss_breakdown(&table)?;
    println!(
        "mass-weighted efficiency: {:.2} % ({:.2} % of ambient mass lost)",
        mass.efficiency.get::<percent>(),
        100.0 * breakdown.total_frac_lost
    );

    let cut = cut_diameter(&system, &line.elements, &CutDiameterConfig::default())?;
    println!("50 % cut diameter: {:.2} µm", cut.diameter.get::<micrometer>());

    Ok(())
}
