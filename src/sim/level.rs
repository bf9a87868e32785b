//! Procedural level extension
//!
//! The world grows rightward in fixed-width chunks. Generation is gated by a
//! monotonic cursor: a chunk is emitted only once the caller's threshold gets
//! within one chunk width of it, so per-tick cost is bounded to one chunk per
//! `CHUNK_W` of player advance and calls below the threshold are no-ops.

use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{Block, BlockKind, Rect};
use crate::consts::*;

/// Chunk-relative candidate, pre overlap filter
struct Template {
    rect: Rect,
    kind: BlockKind,
}

#[derive(Debug, Clone)]
pub struct ChunkGenerator {
    last_generated_x: f32,
    ground_y: f32,
}

impl ChunkGenerator {
    pub fn new(ground_y: f32) -> Self {
        Self {
            last_generated_x: 0.0,
            ground_y,
        }
    }

    pub fn last_generated_x(&self) -> f32 {
        self.last_generated_x
    }

    /// Extend the world if `threshold_x` has advanced close enough to the
    /// cursor. Returns the new blocks (empty below threshold).
    pub fn extend(&mut self, threshold_x: f32, rng: &mut Pcg32) -> Vec<Block> {
        if threshold_x + CHUNK_W <= self.last_generated_x {
            return Vec::new();
        }

        let start_x = self.last_generated_x;
        let mut blocks = Vec::new();

        // Contiguous ground row across the whole chunk
        let tiles = (CHUNK_W / TILE) as usize;
        for i in 0..tiles {
            blocks.push(Block {
                rect: Rect::new(start_x + i as f32 * TILE, self.ground_y, TILE, TILE),
                kind: BlockKind::Ground,
            });
        }

        for template in Self::filter_overlapping(self.roll_templates(rng)) {
            let mut rect = template.rect;
            rect.x += start_x;
            blocks.push(Block {
                rect,
                kind: template.kind,
            });
        }

        self.last_generated_x = start_x + CHUNK_W;
        blocks
    }

    /// Roll the elevated features of one chunk, in chunk-relative x.
    fn roll_templates(&self, rng: &mut Pcg32) -> Vec<Template> {
        let mut templates = Vec::new();

        // Platform clusters, 1-3 tiles long, in a band above the ground
        let platform_count = rng.random_range(2..=4);
        for _ in 0..platform_count {
            let len = rng.random_range(1..=3);
            let x = rng.random_range(0.0..CHUNK_W - len as f32 * TILE);
            let y = self.ground_y - 100.0 - rng.random_range(0.0..150.0);
            for j in 0..len {
                templates.push(Template {
                    rect: Rect::new(x + j as f32 * TILE, y, TILE, TILE),
                    kind: BlockKind::Platform,
                });
            }
        }

        // Pipes seated on the ground line
        let pipe_count = rng.random_range(1..=2);
        for _ in 0..pipe_count {
            let x = rng.random_range(0.0..CHUNK_W - 64.0);
            let h = 64.0 + rng.random_range(0.0..64.0);
            templates.push(Template {
                rect: Rect::new(x, self.ground_y - h, 64.0, h),
                kind: BlockKind::Pipe,
            });
        }

        // Bonus markers in a narrower band than platforms
        let bonus_count = rng.random_range(2..=4);
        for _ in 0..bonus_count {
            templates.push(Template {
                rect: Rect::new(
                    rng.random_range(0.0..CHUNK_W - TILE),
                    self.ground_y - 150.0 + rng.random_range(0.0..50.0),
                    TILE,
                    TILE,
                ),
                kind: BlockKind::Bonus,
            });
        }

        templates
    }

    /// First-accepted-wins overlap filter: drop a candidate whose center is
    /// closer than the sum of half-extents, on both axes, to any already
    /// accepted one. O(n^2) over a per-chunk candidate set of ~20.
    fn filter_overlapping(templates: Vec<Template>) -> Vec<Template> {
        let mut accepted: Vec<Template> = Vec::with_capacity(templates.len());
        for t in templates {
            let tc = t.rect.center();
            let clear = accepted.iter().all(|a| {
                let ac = a.rect.center();
                let x_overlap = (tc.x - ac.x).abs() < (t.rect.w + a.rect.w) / 2.0;
                let y_overlap = (tc.y - ac.y).abs() < (t.rect.h + a.rect.h) / 2.0;
                !(x_overlap && y_overlap)
            });
            if clear {
                accepted.push(t);
            }
        }
        accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    #[test]
    fn test_extend_below_threshold_is_noop() {
        let mut generator = ChunkGenerator::new(GROUND_Y);
        let mut rng = Pcg32::seed_from_u64(7);

        let first = generator.extend(0.0, &mut rng);
        assert!(!first.is_empty());
        assert_eq!(generator.last_generated_x(), CHUNK_W);

        // Threshold has not crossed the next boundary
        let second = generator.extend(0.0, &mut rng);
        assert!(second.is_empty());
        assert_eq!(generator.last_generated_x(), CHUNK_W);

        // One step past the boundary triggers exactly one more chunk
        let third = generator.extend(1.0, &mut rng);
        assert!(!third.is_empty());
        assert_eq!(generator.last_generated_x(), 2.0 * CHUNK_W);
    }

    #[test]
    fn test_ground_row_tiles_full_chunk() {
        let mut generator = ChunkGenerator::new(GROUND_Y);
        let mut rng = Pcg32::seed_from_u64(11);

        let blocks = generator.extend(0.0, &mut rng);
        let mut ground: Vec<_> = blocks
            .iter()
            .filter(|b| b.kind == BlockKind::Ground)
            .collect();
        ground.sort_by(|a, b| a.rect.x.total_cmp(&b.rect.x));

        assert_eq!(ground.len(), (CHUNK_W / TILE) as usize);
        for (i, b) in ground.iter().enumerate() {
            assert_eq!(b.rect.x, i as f32 * TILE);
            assert_eq!(b.rect.y, GROUND_Y);
        }
    }

    #[test]
    fn test_elevated_features_stay_in_chunk() {
        let mut generator = ChunkGenerator::new(GROUND_Y);
        let mut rng = Pcg32::seed_from_u64(13);

        // Skip ahead a few chunks to exercise the offset math
        for threshold in [0.0, 1.0, 801.0, 1601.0] {
            let blocks = generator.extend(threshold, &mut rng);
            let start = generator.last_generated_x() - CHUNK_W;
            for b in &blocks {
                assert!(b.rect.x >= start && b.rect.right() <= start + CHUNK_W);
                assert!(b.rect.w > 0.0 && b.rect.h > 0.0);
            }
        }
    }

    proptest! {
        #[test]
        fn prop_non_ground_blocks_never_overlap(seed in any::<u64>()) {
            let mut generator = ChunkGenerator::new(GROUND_Y);
            let mut rng = Pcg32::seed_from_u64(seed);

            let blocks = generator.extend(0.0, &mut rng);
            let elevated: Vec<_> = blocks
                .iter()
                .filter(|b| b.kind != BlockKind::Ground)
                .collect();
            for (i, a) in elevated.iter().enumerate() {
                for b in &elevated[i + 1..] {
                    prop_assert!(!a.rect.overlaps(&b.rect));
                }
            }
        }
    }
}
