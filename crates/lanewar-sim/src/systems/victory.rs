//! Win-condition check.

use lanewar_core::enums::{Lane, Side};

use crate::economy::Ledger;

/// First structure at or below zero hit points, scanning player lanes 0..2
/// then opponent lanes 0..2. Later structures are not considered.
pub fn first_destroyed(ledger: &Ledger) -> Option<(Side, Lane)> {
    for side in Side::ALL {
        for lane in Lane::ALL {
            if ledger.side(side).structures[lane.index()] <= 0.0 {
                return Some((side, lane));
            }
        }
    }
    None
}
