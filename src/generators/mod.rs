//! Parametric generators that compose primitives into the square's structures.
//!
//! Every generator is a plain function returning `Result<SceneNode>`:
//!
//! | Generator | Produces |
//! |-----------|----------|
//! | [`building`] / [`front_building`] | Body, window grid, door, and for historic buildings a roof and balconies |
//! | [`window`] | Recess, frame, and biased glass pane |
//! | [`street_lamp`] | Base, pole, and radially arranged lit arms |
//! | [`tree`] | Trunk and a fixed canopy of foliage spheres |
//! | [`monument`] | The elephant fountain and obelisk |
//! | [`cathedral`] | Facade, columns, stairs, doors, dome, and window groups |
//! | [`courtyard`] | An arcade wing with potted plants |
//! | [`piazza_ground`] / [`piazza_pattern`] | The paved disc and its inlay |
//!
//! Generators only allocate nodes and materials. The single stochastic choice,
//! whether a building window cell is left blank, goes through a [`SkipSource`]
//! so callers decide between true randomness, a seeded sequence, or a script.
//!
//! # Example
//!
//! ```
//! use piazza::generators::{building, BuildingParams, BuildingStyle, RandomSkips};
//!
//! let params = BuildingParams::new(30.0, 20.0, 20.0)
//!     .at(45.0, 30.0)
//!     .style(BuildingStyle::Historic);
//! let mut skips = RandomSkips::seeded(7);
//! let palazzo = building(&params, &mut skips)?;
//!
//! let (rows, cols) = params.window_grid();
//! assert!(palazzo.find_all("window").len() <= (rows * cols) as usize);
//! # Ok::<(), piazza::SceneError>(())
//! ```

mod building;
mod cathedral;
mod courtyard;
mod lamp;
mod monument;
mod piazza;
mod tree;
mod window;

pub use building::{BuildingParams, BuildingStyle, building, front_building};
pub use cathedral::cathedral;
pub use courtyard::{CourtyardSide, courtyard};
pub use lamp::{DEFAULT_LAMP_ARMS, street_lamp};
pub use monument::{TRUNK_SEGMENTS, monument, trunk_segment_pose};
pub use self::piazza::{GROUND_RADIUS, piazza_ground, piazza_pattern};
pub use tree::{FOLIAGE, tree};
pub use window::window;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// How much ornament the landmark generators add.
///
/// `Simplified` drops small parts that barely register at a distance
/// (eyes, tusks, ear rims, roof statues, bump-mapped variants, side doors).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailLevel {
    #[default]
    Full,
    Simplified,
}

impl DetailLevel {
    pub fn is_full(self) -> bool {
        self == DetailLevel::Full
    }
}

/// Decides whether a window cell is left blank.
pub trait SkipSource {
    /// Called once per candidate cell; `true` omits the window.
    fn skip(&mut self, probability: f32) -> bool;
}

/// Skips cells at random from any [`Rng`].
#[derive(Debug, Clone)]
pub struct RandomSkips<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomSkips<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomSkips<ChaCha8Rng> {
    /// Reproducible sequence for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }

    /// A different sequence every run.
    pub fn from_entropy() -> Self {
        Self::new(ChaCha8Rng::from_entropy())
    }
}

impl<R: Rng> SkipSource for RandomSkips<R> {
    fn skip(&mut self, probability: f32) -> bool {
        self.rng.r#gen::<f32>() < probability
    }
}

/// Never skips; every grid cell gets a window.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverSkip;

impl SkipSource for NeverSkip {
    fn skip(&mut self, _probability: f32) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_skips_repeat() {
        let mut a = RandomSkips::seeded(42);
        let mut b = RandomSkips::seeded(42);
        let left: Vec<bool> = (0..64).map(|_| a.skip(0.3)).collect();
        let right: Vec<bool> = (0..64).map(|_| b.skip(0.3)).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn probability_bounds_are_respected() {
        let mut skips = RandomSkips::seeded(1);
        assert!((0..100).all(|_| !skips.skip(0.0)));
        assert!((0..100).all(|_| skips.skip(1.0)));
    }
}
