//! Axis-separated collision resolution
//!
//! Both the player and adversaries move the same way: tentatively apply one
//! velocity axis, then test against every block (brute force, no spatial
//! index). The vertical pass classifies each contact by the sign of the
//! vertical velocity and the body's *previous* edge position relative to the
//! block, never by overlap depth - a fast mover that crosses a block top
//! within one tick still counts as a landing.

use super::state::{Block, Body, Rect};
use crate::consts::CONTACT_TOLERANCE;

/// Outcome of a vertical sweep
#[derive(Debug, Clone, Copy, Default)]
pub struct VerticalHit {
    /// Fell onto a block top: snapped, vy zeroed
    pub landed: bool,
    /// Rose into a block underside: snapped, vy zeroed
    pub hit_ceiling: bool,
    /// Lateral contact while airborne and still descending
    pub falling_contact: bool,
}

/// Tentatively move along x; any block contact is a solid wall that reverts
/// the move entirely (no partial sliding). Returns whether a wall was hit.
pub fn sweep_horizontal(body: &mut Body, blocks: &[Block]) -> bool {
    let prev_x = body.rect.x;
    body.rect.x += body.vel.x;

    let mut hit = false;
    for block in blocks {
        if body.rect.overlaps(&block.rect) {
            body.rect.x = prev_x;
            hit = true;
        }
    }
    hit
}

/// Tentatively move along y and resolve every contact.
///
/// Classification order is the contract: landing, then ceiling, then
/// lateral. `CONTACT_TOLERANCE` absorbs sub-pixel rounding at the edges.
pub fn sweep_vertical(body: &mut Body, blocks: &[Block]) -> VerticalHit {
    let prev_y = body.rect.y;
    let prev_bottom = prev_y + body.rect.h;
    body.rect.y += body.vel.y;

    let mut out = VerticalHit::default();
    for block in blocks {
        if !body.rect.overlaps(&block.rect) {
            continue;
        }
        if body.vel.y > 0.0 && prev_bottom <= block.rect.y + CONTACT_TOLERANCE {
            // Falling onto the top
            body.rect.y = block.rect.y - body.rect.h;
            body.vel.y = 0.0;
            out.landed = true;
        } else if body.vel.y < 0.0 && prev_y >= block.rect.bottom() - CONTACT_TOLERANCE {
            // Rising into the underside
            body.rect.y = block.rect.bottom();
            body.vel.y = 0.0;
            out.hit_ceiling = true;
        } else {
            // Side contact while airborne
            body.rect.y = prev_y;
            if body.vel.y > 0.0 {
                out.falling_contact = true;
            }
        }
    }
    out
}

/// Probe for ground just beyond the leading edge, below the feet. Used by
/// adversaries to turn before walking off a ledge.
pub fn ground_ahead(body: &Body, blocks: &[Block]) -> bool {
    let dx = if body.vel.x > 0.0 {
        body.rect.w
    } else {
        -body.rect.w
    };
    let probe = Rect::new(
        body.rect.x + dx,
        body.rect.bottom() + CONTACT_TOLERANCE,
        1.0,
        1.0,
    );
    blocks.iter().any(|b| probe.overlaps(&b.rect))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::BlockKind;
    use glam::Vec2;
    use proptest::prelude::*;

    fn block(x: f32, y: f32, w: f32, h: f32) -> Block {
        Block {
            rect: Rect::new(x, y, w, h),
            kind: BlockKind::Ground,
        }
    }

    fn body(x: f32, y: f32, vx: f32, vy: f32) -> Body {
        Body {
            rect: Rect::new(x, y, 32.0, 32.0),
            vel: Vec2::new(vx, vy),
        }
    }

    #[test]
    fn test_landing_snaps_to_block_top() {
        // Descending fast from 3px above the top, within tolerance
        let blocks = [block(0.0, 100.0, 64.0, 32.0)];
        let mut b = body(10.0, 65.0, 0.0, 5.0);

        let out = sweep_vertical(&mut b, &blocks);
        assert!(out.landed);
        assert_eq!(b.vel.y, 0.0);
        assert_eq!(b.rect.bottom(), 100.0);
    }

    #[test]
    fn test_landing_no_tunneling_at_high_speed() {
        // One-tick displacement that crosses the block top entirely
        let blocks = [block(0.0, 100.0, 64.0, 32.0)];
        for vy in [2.0, 5.0, 10.0, 20.0, 30.0] {
            let mut b = body(10.0, 100.0 - 32.0 - 1.0, 0.0, vy);
            let out = sweep_vertical(&mut b, &blocks);
            assert!(out.landed, "vy={vy}");
            assert_eq!(b.vel.y, 0.0);
            assert_eq!(b.rect.bottom(), 100.0);
        }
    }

    #[test]
    fn test_rising_snaps_below_block() {
        let blocks = [block(0.0, 100.0, 64.0, 32.0)];
        let mut b = body(10.0, 135.0, 0.0, -6.0);

        let out = sweep_vertical(&mut b, &blocks);
        assert!(out.hit_ceiling);
        assert_eq!(b.vel.y, 0.0);
        assert_eq!(b.rect.y, 132.0);
    }

    #[test]
    fn test_lateral_contact_reverts_y() {
        // Body alongside a tall block, previous bottom well below the top:
        // neither landing nor ceiling applies
        let blocks = [block(40.0, 60.0, 32.0, 96.0)];
        let mut b = body(50.0, 100.0, 0.0, 4.0);

        let out = sweep_vertical(&mut b, &blocks);
        assert!(!out.landed && !out.hit_ceiling);
        assert!(out.falling_contact);
        assert_eq!(b.rect.y, 100.0);
    }

    #[test]
    fn test_wall_reverts_horizontal_move() {
        let blocks = [block(64.0, 0.0, 32.0, 128.0)];
        let mut b = body(30.0, 40.0, 5.0, 0.0);

        assert!(sweep_horizontal(&mut b, &blocks));
        assert_eq!(b.rect.x, 30.0);

        // No contact: move goes through
        let mut free = body(0.0, 40.0, 5.0, 0.0);
        assert!(!sweep_horizontal(&mut free, &blocks));
        assert_eq!(free.rect.x, 5.0);
    }

    #[test]
    fn test_ground_probe() {
        // Platform under the body but nothing past its right edge
        let blocks = [block(0.0, 132.0, 64.0, 32.0)];
        let on_platform = body(20.0, 100.0, 2.0, 0.0);
        assert!(ground_ahead(&on_platform, &blocks));

        let at_edge = body(60.0, 100.0, 2.0, 0.0);
        assert!(!ground_ahead(&at_edge, &blocks));

        // Walking the other way the probe finds the platform again
        let turned = body(60.0, 100.0, -2.0, 0.0);
        assert!(ground_ahead(&turned, &blocks));
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0,
            aw in 1.0f32..100.0, ah in 1.0f32..100.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0,
            bw in 1.0f32..100.0, bh in 1.0f32..100.0,
        ) {
            let a = Rect::new(ax, ay, aw, ah);
            let b = Rect::new(bx, by, bw, bh);
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }

        #[test]
        fn prop_landing_always_zeroes_vy(extra in 0.5f32..25.0, gap in 0.0f32..4.0) {
            // Starting within tolerance above the top, any descent that
            // crosses the edge lands
            let blocks = [block(0.0, 200.0, 64.0, 32.0)];
            let vy = gap + extra;
            let mut b = body(10.0, 200.0 - 32.0 - gap, 0.0, vy);
            let out = sweep_vertical(&mut b, &blocks);
            prop_assert!(out.landed);
            prop_assert_eq!(b.vel.y, 0.0);
            prop_assert_eq!(b.rect.bottom(), 200.0);
        }
    }
}
