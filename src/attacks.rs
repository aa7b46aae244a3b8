//! Precomputed attack tables.
//!
//! Leaper pieces (pawn, knight, king) use one bitboard per square built from
//! shift formulas with file-wrap masks. Sliding pieces use "magic bitboards":
//! the relevant blocker bits of the occupancy are multiplied by a per-square
//! magic number and the top bits of the product index a dense attack table.
//!
//! Magic numbers are found once at construction with a seeded sparse-random
//! search and every candidate is verified against the ray walker over all
//! blocker subsets, so the resulting tables are collision-free by construction.

use crate::bitboard::{
    count_bits, file_of, rank_of, Bitboard, FILE_A, FILE_H, NOT_FILE_A, NOT_FILE_AB, NOT_FILE_GH,
    NOT_FILE_H, RANK_1, RANK_8,
};
use crate::types::Color;

const ROOK_DIRS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const BISHOP_DIRS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Seeds per rank for the magic search, one seed per rank keeps the search short.
const MAGIC_SEEDS: [u64; 8] = [728, 10316, 55013, 32803, 12281, 15100, 16645, 255];

/// Magic entry for a single square
#[derive(Clone, Copy, Default)]
struct MagicEntry {
    mask: Bitboard, // Relevant occupancy mask (excludes edges)
    magic: u64,
    shift: u8,     // 64 - relevant bits
    offset: usize, // Offset into the attack table
}

impl MagicEntry {
    #[inline]
    fn index(&self, occ: Bitboard) -> usize {
        self.offset + (((occ & self.mask).wrapping_mul(self.magic)) >> self.shift) as usize
    }
}

/// Attack lookup tables for every piece type.
pub struct AttackTables {
    pawn: [[Bitboard; 64]; 2],
    knight: [Bitboard; 64],
    king: [Bitboard; 64],
    rook_entries: [MagicEntry; 64],
    bishop_entries: [MagicEntry; 64],
    rook_attacks: Vec<Bitboard>,
    bishop_attacks: Vec<Bitboard>,
}

impl AttackTables {
    pub fn new() -> Self {
        let mut pawn = [[0; 64]; 2];
        let mut knight = [0; 64];
        let mut king = [0; 64];
        for sq in 0..64 {
            pawn[Color::White.index()][sq] = pawn_attacks_from(sq, Color::White);
            pawn[Color::Black.index()][sq] = pawn_attacks_from(sq, Color::Black);
            knight[sq] = knight_attacks_from(sq);
            king[sq] = king_attacks_from(sq);
        }

        let (rook_entries, rook_attacks) = build_slider(&ROOK_DIRS);
        let (bishop_entries, bishop_attacks) = build_slider(&BISHOP_DIRS);

        tracing::debug!(
            rook_entries = rook_attacks.len(),
            bishop_entries = bishop_attacks.len(),
            "attack tables built"
        );

        Self {
            pawn,
            knight,
            king,
            rook_entries,
            bishop_entries,
            rook_attacks,
            bishop_attacks,
        }
    }

    /// Squares attacked by a pawn of `color` standing on `sq`.
    #[inline]
    pub fn pawn(&self, color: Color, sq: usize) -> Bitboard {
        self.pawn[color.index()][sq]
    }

    #[inline]
    pub fn knight(&self, sq: usize) -> Bitboard {
        self.knight[sq]
    }

    #[inline]
    pub fn king(&self, sq: usize) -> Bitboard {
        self.king[sq]
    }

    #[inline]
    pub fn rook(&self, sq: usize, occ: Bitboard) -> Bitboard {
        self.rook_attacks[self.rook_entries[sq].index(occ)]
    }

    #[inline]
    pub fn bishop(&self, sq: usize, occ: Bitboard) -> Bitboard {
        self.bishop_attacks[self.bishop_entries[sq].index(occ)]
    }

    #[inline]
    pub fn queen(&self, sq: usize, occ: Bitboard) -> Bitboard {
        self.rook(sq, occ) | self.bishop(sq, occ)
    }
}

impl Default for AttackTables {
    fn default() -> Self {
        Self::new()
    }
}

fn pawn_attacks_from(sq: usize, color: Color) -> Bitboard {
    let bb = 1u64 << sq;
    match color {
        Color::White => ((bb << 9) & NOT_FILE_A) | ((bb << 7) & NOT_FILE_H),
        Color::Black => ((bb >> 7) & NOT_FILE_A) | ((bb >> 9) & NOT_FILE_H),
    }
}

fn knight_attacks_from(sq: usize) -> Bitboard {
    let bb = 1u64 << sq;
    ((bb << 17) & NOT_FILE_A)
        | ((bb << 15) & NOT_FILE_H)
        | ((bb << 10) & NOT_FILE_AB)
        | ((bb << 6) & NOT_FILE_GH)
        | ((bb >> 17) & NOT_FILE_H)
        | ((bb >> 15) & NOT_FILE_A)
        | ((bb >> 10) & NOT_FILE_GH)
        | ((bb >> 6) & NOT_FILE_AB)
}

fn king_attacks_from(sq: usize) -> Bitboard {
    let bb = 1u64 << sq;
    (bb << 8)
        | (bb >> 8)
        | ((bb << 1) & NOT_FILE_A)
        | ((bb >> 1) & NOT_FILE_H)
        | ((bb << 9) & NOT_FILE_A)
        | ((bb << 7) & NOT_FILE_H)
        | ((bb >> 7) & NOT_FILE_A)
        | ((bb >> 9) & NOT_FILE_H)
}

/// Rook attacks by walking rays; slow, used to fill and verify the magic tables.
pub fn rook_attacks_ray(sq: usize, occ: Bitboard) -> Bitboard {
    ray_attacks(sq, occ, &ROOK_DIRS)
}

/// Bishop attacks by walking rays; slow, used to fill and verify the magic tables.
pub fn bishop_attacks_ray(sq: usize, occ: Bitboard) -> Bitboard {
    ray_attacks(sq, occ, &BISHOP_DIRS)
}

fn ray_attacks(sq: usize, occ: Bitboard, dirs: &[(i8, i8); 4]) -> Bitboard {
    let mut attacks = 0u64;
    for &(dr, df) in dirs {
        let mut r = rank_of(sq) as i8 + dr;
        let mut f = file_of(sq) as i8 + df;
        while (0..8).contains(&r) && (0..8).contains(&f) {
            let bit = 1u64 << (r as usize * 8 + f as usize);
            attacks |= bit;
            if occ & bit != 0 {
                break;
            }
            r += dr;
            f += df;
        }
    }
    attacks
}

/// Relevant blocker mask: the empty-board rays without the board edges
/// that do not contain the square itself.
fn relevant_mask(sq: usize, dirs: &[(i8, i8); 4]) -> Bitboard {
    let rank_bb = RANK_1 << (8 * rank_of(sq));
    let file_bb = FILE_A << file_of(sq);
    let edges = ((RANK_1 | RANK_8) & !rank_bb) | ((FILE_A | FILE_H) & !file_bb);
    ray_attacks(sq, 0, dirs) & !edges
}

/// xorshift64* generator; deterministic so every run builds identical tables.
struct Prng(u64);

impl Prng {
    fn next(&mut self) -> u64 {
        self.0 ^= self.0 >> 12;
        self.0 ^= self.0 << 25;
        self.0 ^= self.0 >> 27;
        self.0.wrapping_mul(2685821657736338717)
    }

    fn sparse(&mut self) -> u64 {
        self.next() & self.next() & self.next()
    }
}

fn build_slider(dirs: &[(i8, i8); 4]) -> ([MagicEntry; 64], Vec<Bitboard>) {
    let mut entries = [MagicEntry::default(); 64];
    let mut table = Vec::new();

    let mut occupancies = Vec::with_capacity(4096);
    let mut references = Vec::with_capacity(4096);
    let mut epoch = vec![0u32; 4096];
    let mut scratch = vec![0u64; 4096];
    let mut attempt = 0u32;

    for sq in 0..64 {
        let mask = relevant_mask(sq, dirs);
        let bits = count_bits(mask);
        let shift = (64 - bits) as u8;
        let size = 1usize << bits;

        // Carry-Rippler enumeration of every blocker subset of the mask
        occupancies.clear();
        references.clear();
        let mut subset = 0u64;
        loop {
            occupancies.push(subset);
            references.push(ray_attacks(sq, subset, dirs));
            subset = subset.wrapping_sub(mask) & mask;
            if subset == 0 {
                break;
            }
        }

        let mut rng = Prng(MAGIC_SEEDS[rank_of(sq)]);
        let magic = loop {
            let candidate = rng.sparse();
            if count_bits(mask.wrapping_mul(candidate) >> 56) < 6 {
                continue;
            }
            attempt += 1;
            let mut ok = true;
            for (occ, &attacks) in occupancies.iter().zip(references.iter()) {
                let idx = (occ.wrapping_mul(candidate) >> shift) as usize;
                if epoch[idx] < attempt {
                    epoch[idx] = attempt;
                    scratch[idx] = attacks;
                } else if scratch[idx] != attacks {
                    ok = false;
                    break;
                }
            }
            if ok {
                break candidate;
            }
        };

        let offset = table.len();
        table.resize(offset + size, 0);
        for (occ, &attacks) in occupancies.iter().zip(references.iter()) {
            let idx = (occ.wrapping_mul(magic) >> shift) as usize;
            table[offset + idx] = attacks;
        }
        entries[sq] = MagicEntry {
            mask,
            magic,
            shift,
            offset,
        };
    }

    (entries, table)
}
