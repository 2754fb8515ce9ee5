//! Seeded grid generation: noise-classified tiles seeded with template blocs.

use rand::Rng;
use tracing::debug;

use electorate_types::{IdeologyVector, IndustryType, PopulationDensity};

use crate::error::WorldError;
use crate::grid::DistrictGrid;
use crate::noise::ValueNoise;
use crate::tile::DistrictTile;

/// Base frequency of the density field.
pub const DENSITY_FREQUENCY: f64 = 0.07;
/// Base frequency of the industry field.
pub const INDUSTRY_FREQUENCY: f64 = 0.09;
/// Relative population jitter applied to every template bloc.
pub const POPULATION_VARIANCE: f64 = 0.25;
/// Smallest population a generated bloc may have.
pub const MIN_BLOC_POPULATION: u32 = 300;

/// A bloc seeded into generated tiles.
#[derive(Debug, Clone, Copy)]
pub struct BlocTemplate {
    /// Bloc name.
    pub name: &'static str,
    /// Population before jitter.
    pub population: u32,
    /// Ideology before jitter, in axis order.
    pub ideology: [f64; 4],
    /// Uniform per-axis ideology jitter.
    pub jitter: f64,
}

const fn template(name: &'static str, population: u32, ideology: [f64; 4], jitter: f64) -> BlocTemplate {
    BlocTemplate {
        name,
        population,
        ideology,
        jitter,
    }
}

const RURAL_BLOCS: [BlocTemplate; 3] = [
    template("Farmers", 2200, [0.15, -0.70, 0.35, -0.60], 0.14),
    template("Small Business", 1700, [0.55, -0.30, 0.10, -0.25], 0.15),
    template("Retirees", 1800, [-0.15, -0.75, 0.45, -0.35], 0.10),
];

const URBAN_BLOCS: [BlocTemplate; 3] = [
    template("Industrial Workers", 2600, [-0.55, -0.10, 0.10, -0.10], 0.16),
    template("Service Workers", 2400, [-0.20, 0.10, -0.10, 0.05], 0.15),
    template("Managers", 1800, [0.45, 0.25, 0.00, 0.25], 0.15),
];

const METRO_BLOCS: [BlocTemplate; 3] = [
    template("Students", 2500, [-0.25, 0.85, -0.55, 0.35], 0.14),
    template("Knowledge Class", 2300, [0.40, 0.65, -0.30, 0.65], 0.14),
    template("Service Precariat", 2900, [-0.35, 0.45, -0.15, 0.30], 0.16),
];

/// Blocs seeded for a density tier.
pub const fn density_blocs(density: PopulationDensity) -> &'static [BlocTemplate] {
    match density {
        PopulationDensity::Rural => &RURAL_BLOCS,
        PopulationDensity::Urban => &URBAN_BLOCS,
        PopulationDensity::Metro => &METRO_BLOCS,
    }
}

/// The extra bloc seeded for a dominant industry.
pub const fn industry_bloc(industry: IndustryType) -> BlocTemplate {
    match industry {
        IndustryType::Agriculture => template("Agrarian Labour", 1200, [-0.45, -0.40, 0.20, -0.50], 0.12),
        IndustryType::HeavyIndustry => template("Union Trades", 1300, [-0.70, -0.20, 0.25, -0.15], 0.12),
        IndustryType::Services => template("Retail Workers", 1250, [-0.20, 0.20, -0.10, 0.15], 0.12),
        IndustryType::Tech => template("Tech Professionals", 1400, [0.55, 0.65, -0.40, 0.70], 0.12),
    }
}

/// Map a density noise sample to a tier.
pub fn classify_density(sample: f64) -> PopulationDensity {
    if sample >= 0.35 {
        PopulationDensity::Metro
    } else if sample >= -0.15 {
        PopulationDensity::Urban
    } else {
        PopulationDensity::Rural
    }
}

/// Map an industry noise sample to an industry.
pub fn classify_industry(sample: f64) -> IndustryType {
    if sample < -0.35 {
        IndustryType::Agriculture
    } else if sample < -0.05 {
        IndustryType::HeavyIndustry
    } else if sample < 0.35 {
        IndustryType::Services
    } else {
        IndustryType::Tech
    }
}

/// Generate a seeded `width x height` grid.
///
/// Density and industry come from two value-noise fields derived from
/// `seed`; bloc populations and ideologies are jittered with `rng`.
///
/// # Errors
///
/// Returns [`WorldError::EmptyGrid`] when either dimension is zero.
pub fn generate_grid(
    width: u32,
    height: u32,
    seed: u64,
    rng: &mut impl Rng,
) -> Result<DistrictGrid, WorldError> {
    let density_noise = ValueNoise::new(seed, DENSITY_FREQUENCY);
    let industry_noise = ValueNoise::new(seed.wrapping_mul(31).wrapping_add(17), INDUSTRY_FREQUENCY);

    let grid = DistrictGrid::build(width, height, |x, y| {
        let (fx, fy) = (f64::from(x), f64::from(y));
        let density = classify_density(density_noise.sample(fx, fy));
        let industry = classify_industry(industry_noise.sample(fx, fy));
        let mut tile = DistrictTile::new(x, y, density, industry);
        seed_blocs(&mut tile, rng);
        tile
    })?;

    debug!(
        width,
        height,
        seed,
        population = grid.total_population(),
        "Generated district grid"
    );
    Ok(grid)
}

/// Seed a tile with its density blocs followed by its industry bloc.
pub fn seed_blocs(tile: &mut DistrictTile, rng: &mut impl Rng) {
    for bloc in density_blocs(tile.density) {
        add_jittered(tile, bloc, rng);
    }
    add_jittered(tile, &industry_bloc(tile.dominant_industry), rng);
}

fn add_jittered(tile: &mut DistrictTile, template: &BlocTemplate, rng: &mut impl Rng) {
    let population = jitter_population(template.population, rng);
    let [e, s, a, d] = template.ideology;
    let j = template.jitter;
    let ideology = IdeologyVector::new(
        e + rng.random_range(-j..=j),
        s + rng.random_range(-j..=j),
        a + rng.random_range(-j..=j),
        d + rng.random_range(-j..=j),
    );
    tile.add_bloc(template.name, population, ideology);
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn jitter_population(baseline: u32, rng: &mut impl Rng) -> u32 {
    let factor = 1.0 + rng.random_range(-POPULATION_VARIANCE..=POPULATION_VARIANCE);
    let scaled = (f64::from(baseline) * factor).round().max(f64::from(MIN_BLOC_POPULATION));
    scaled.min(f64::from(u32::MAX)) as u32
}
