//! Parties: platforms, opportunistic drift, and spawning of new parties
//! from disaffected voters.

use rand::Rng;
use tracing::info;

use electorate_types::math::clamp_unit;
use electorate_types::{IdeologyVector, MAX_DISTANCE, PartyDefinition};
use electorate_world::DistrictGrid;

/// Default base platform drift toward the national center per turn.
pub const DEFAULT_DRIFT_PER_TURN: f64 = 0.035;

// ---------------------------------------------------------------------------
// Party
// ---------------------------------------------------------------------------

/// A contesting party.
#[derive(Debug, Clone, PartialEq)]
pub struct Party {
    /// Unique display name.
    pub name: String,
    /// Display color, `#rrggbb`.
    pub color: String,
    /// Current platform.
    pub platform: IdeologyVector,
    /// Willingness to chase the electorate, `[0, 1]`.
    pub opportunism: f64,
}

impl Party {
    /// Build a party, clamping opportunism.
    pub fn new(name: &str, color: &str, platform: IdeologyVector, opportunism: f64) -> Self {
        Self {
            name: name.to_owned(),
            color: color.to_owned(),
            platform,
            opportunism: clamp_unit(opportunism),
        }
    }

    /// Party from a configuration record; `None` for a blank name.
    pub fn from_definition(definition: &PartyDefinition) -> Option<Self> {
        let name = definition.name.trim();
        if name.is_empty() {
            return None;
        }
        let color = if definition.color.trim().is_empty() {
            "#ffffff"
        } else {
            definition.color.trim()
        };
        Some(Self::new(name, color, definition.platform, definition.opportunism))
    }

    /// Record form for snapshots.
    pub fn to_definition(&self) -> PartyDefinition {
        PartyDefinition {
            name: self.name.clone(),
            color: self.color.clone(),
            platform: self.platform,
            opportunism: self.opportunism,
        }
    }

    /// How well an ideology matches this platform: `1 - distance / 4`.
    pub fn alignment_score(&self, ideology: &IdeologyVector) -> f64 {
        clamp_unit(1.0 - self.platform.distance_to(ideology) / MAX_DISTANCE)
    }

    /// Move the platform toward `target`; opportunistic parties move faster.
    pub fn drift_toward(&mut self, target: &IdeologyVector, base_amount: f64) {
        let amount = clamp_unit(base_amount * self.opportunism.mul_add(0.8, 0.2));
        self.platform = self.platform.blend_toward(target, amount);
    }
}

// ---------------------------------------------------------------------------
// Spawning
// ---------------------------------------------------------------------------

/// Thresholds controlling when a new party forms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnParams {
    /// Normalized distance to the closest party at which a bloc is
    /// disaffected.
    pub distance_threshold: f64,
    /// Share of total population that must be disaffected.
    pub population_share: f64,
    /// No party spawns once this many exist.
    pub max_parties: usize,
}

impl Default for SpawnParams {
    fn default() -> Self {
        Self {
            distance_threshold: 0.58,
            population_share: 0.08,
            max_parties: 8,
        }
    }
}

/// Distance from `ideology` to the closest platform, or [`MAX_DISTANCE`]
/// with no parties.
pub fn distance_to_closest_party(parties: &[Party], ideology: &IdeologyVector) -> f64 {
    parties
        .iter()
        .map(|p| ideology.distance_to(&p.platform))
        .fold(MAX_DISTANCE, f64::min)
}

/// Form a new party on the disaffected population's mean platform when
/// enough voters are far from every existing party.
pub fn try_spawn_party(
    parties: &[Party],
    grid: &DistrictGrid,
    params: &SpawnParams,
    rng: &mut impl Rng,
) -> Option<Party> {
    if parties.len() >= params.max_parties {
        return None;
    }

    let mut total = 0.0;
    let mut disaffected = 0.0;
    let mut axes = [0.0_f64; 4];
    for bloc in grid.blocs() {
        let population = f64::from(bloc.population);
        total += population;
        let distance = distance_to_closest_party(parties, &bloc.ideology) / MAX_DISTANCE;
        if distance < params.distance_threshold {
            continue;
        }
        disaffected += population;
        for (slot, axis) in axes.iter_mut().zip(electorate_types::CompassAxis::ALL) {
            *slot += bloc.ideology.axis(axis) * population;
        }
    }

    if total <= 0.0 || disaffected <= 0.0 || disaffected < total * params.population_share {
        return None;
    }

    let [e, s, a, d] = axes;
    let platform = IdeologyVector::new(e / disaffected, s / disaffected, a / disaffected, d / disaffected);
    let name = spawned_party_name(&platform, parties);
    let color = hsv_to_hex(rng.random::<f64>(), 0.65, 0.95);
    let opportunism = rng.random_range(0.35..=0.85);

    info!(
        party = %name,
        disaffected_share = disaffected / total,
        "New party spawned"
    );
    Some(Party::new(&name, &color, platform, opportunism))
}

/// `{social} {economic} {authority}` name for a platform, suffixed with
/// ` 2`, ` 3`, ... when already taken.
pub fn spawned_party_name(platform: &IdeologyVector, parties: &[Party]) -> String {
    let economic = if platform.economic() < -0.20 {
        "Labor"
    } else if platform.economic() > 0.20 {
        "Market"
    } else {
        "Civic"
    };
    let social = if platform.societal() < -0.20 {
        "Tradition"
    } else if platform.societal() > 0.20 {
        "Progress"
    } else {
        "Center"
    };
    let authority = if platform.authority() > 0.25 {
        "Order"
    } else if platform.authority() < -0.25 {
        "Liberty"
    } else {
        "Forum"
    };

    let base = format!("{social} {economic} {authority}");
    let taken = |candidate: &str| parties.iter().any(|p| p.name == candidate);
    if !taken(&base) {
        return base;
    }
    let mut suffix = 2_u32;
    loop {
        let candidate = format!("{base} {suffix}");
        if !taken(&candidate) {
            return candidate;
        }
        suffix = suffix.saturating_add(1);
    }
}

/// `#rrggbb` for a hue/saturation/value triple, each in `[0, 1]`.
pub fn hsv_to_hex(hue: f64, saturation: f64, value: f64) -> String {
    let h = clamp_unit(hue) * 6.0;
    let s = clamp_unit(saturation);
    let v = clamp_unit(value);
    let sector = h.floor();
    let f = h - sector;
    let p = v * (1.0 - s);
    let q = v * s.mul_add(-f, 1.0);
    let t = v * s.mul_add(-(1.0 - f), 1.0);

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let sector = (sector as u32).checked_rem(6).unwrap_or(0);
    let (r, g, b) = match sector {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    format!("#{:02x}{:02x}{:02x}", channel(r), channel(g), channel(b))
}

fn channel(value: f64) -> u8 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let byte = (clamp_unit(value) * 255.0).round() as u8;
    byte
}
