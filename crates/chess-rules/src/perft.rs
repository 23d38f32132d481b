//! Perft (performance test) for validating the rules.
//!
//! Perft counts the leaf nodes of the legal move tree at a given depth, which
//! can be compared against published values. Promotions count once per
//! (from, to) pair, so only positions without promotions inside the search
//! horizon match the published numbers.

use crate::execute::commit;
use crate::scan::legal_moves;
use crate::{BoardState, InvariantViolation, RuleError};
use chess_core::{Piece, Square};

/// Counts the leaf nodes at the given depth.
pub fn perft(state: &BoardState, depth: u32) -> Result<u64, InvariantViolation> {
    if depth == 0 {
        return Ok(1);
    }

    let moves = legal_moves(state)?;

    if depth == 1 {
        return Ok(moves.len() as u64);
    }

    let mut nodes = 0u64;
    for (from, to) in moves {
        let mut child = state.clone();
        play(&mut child, from, to)?;
        nodes += perft(&child, depth - 1)?;
    }
    Ok(nodes)
}

/// Perft with divide: node count below each root move, sorted by move.
/// Useful for locating the move whose subtree disagrees with a reference.
pub fn perft_divide(state: &BoardState, depth: u32) -> Result<Vec<(String, u64)>, InvariantViolation> {
    let moves = legal_moves(state)?;
    let mut results = Vec::with_capacity(moves.len());

    for (from, to) in moves {
        let nodes = if depth > 1 {
            let mut child = state.clone();
            play(&mut child, from, to)?;
            perft(&child, depth - 1)?
        } else {
            1
        };
        results.push((format!("{}{}", from, to), nodes));
    }

    results.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(results)
}

fn play(state: &mut BoardState, from: Square, to: Square) -> Result<(), InvariantViolation> {
    match commit(state, from, to, Piece::Queen) {
        Ok(_) => Ok(()),
        Err(RuleError::Corrupt(violation)) => Err(violation),
        // Enumerated moves were validated against this exact state.
        Err(RuleError::Rejected(_)) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    const POSITION_3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";

    #[test]
    fn perft_startpos_depth_1() {
        assert_eq!(perft(&BoardState::new(), 1), Ok(20));
    }

    #[test]
    fn perft_startpos_depth_2() {
        assert_eq!(perft(&BoardState::new(), 2), Ok(400));
    }

    #[test]
    fn perft_startpos_depth_3() {
        assert_eq!(perft(&BoardState::new(), 3), Ok(8902));
    }

    // Slow without optimisations
    #[test]
    #[ignore]
    fn perft_startpos_depth_4() {
        assert_eq!(perft(&BoardState::new(), 4), Ok(197281));
    }

    // Position 3: check evasion, en passant, pins along the rank
    #[test]
    fn perft_position3_depth_1() {
        let state = BoardState::from_fen(POSITION_3).unwrap();
        assert_eq!(perft(&state, 1), Ok(14));
    }

    #[test]
    fn perft_position3_depth_2() {
        let state = BoardState::from_fen(POSITION_3).unwrap();
        assert_eq!(perft(&state, 2), Ok(191));
    }

    #[test]
    fn perft_position3_depth_3() {
        let state = BoardState::from_fen(POSITION_3).unwrap();
        assert_eq!(perft(&state, 3), Ok(2812));
    }

    // Kiwipete: castling both ways, en passant, many captures
    #[test]
    fn perft_kiwipete_depth_1() {
        let state = BoardState::from_fen(KIWIPETE).unwrap();
        assert_eq!(perft(&state, 1), Ok(48));
    }

    #[test]
    fn perft_kiwipete_depth_2() {
        let state = BoardState::from_fen(KIWIPETE).unwrap();
        assert_eq!(perft(&state, 2), Ok(2039));
    }

    #[test]
    fn perft_divide_works() {
        let results = perft_divide(&BoardState::new(), 2).unwrap();
        assert_eq!(results.len(), 20);
        let total: u64 = results.iter().map(|(_, n)| n).sum();
        assert_eq!(total, 400);
        assert!(results.iter().any(|(m, n)| m == "e2e4" && *n == 20));
    }
}
