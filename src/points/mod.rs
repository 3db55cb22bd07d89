use std::collections::HashMap;

/// Hand-tuned points for podium-adjacent finishes.
pub const TOP_TEN_POINTS: [i64; 10] = [1000, 961, 943, 926, 911, 896, 883, 870, 857, 846];

const TAIL_FLOOR: i64 = 500;
const TAIL_DECAY: f64 = 0.985;

/// Converts a finishing position into a point value. Pure and total for
/// every position >= 1.
///
/// Lookup order: explicit override table, the top-ten table, then the decay
/// formula `max(500, floor(1000 * 0.985^(p-1)))`. The formula briefly rises
/// above the position-10 table value (859 at p=11), so the tail is clamped to
/// the table minimum to keep the curve non-increasing.
#[derive(Debug, Clone, Default)]
pub struct PointsSystem {
    overrides: HashMap<u32, i64>,
}

impl PointsSystem {
    pub fn new(overrides: HashMap<u32, i64>) -> Self {
        Self { overrides }
    }

    pub fn points_for_position(&self, position: u32) -> i64 {
        let position = position.max(1);

        if let Some(&points) = self.overrides.get(&position) {
            return points;
        }

        if (position as usize) <= TOP_TEN_POINTS.len() {
            return TOP_TEN_POINTS[position as usize - 1];
        }

        // Exponent computed in f64: `position - 1` does not fit i32 for
        // positions near u32::MAX, and the decay must stay monotonic there.
        let decayed = (1000.0 * TAIL_DECAY.powf(f64::from(position - 1))).floor() as i64;
        decayed.clamp(TAIL_FLOOR, TOP_TEN_POINTS[TOP_TEN_POINTS.len() - 1])
    }
}
