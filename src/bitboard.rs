// Bitboard masks, bit primitives and square helpers
//
// Square mapping is little-endian rank-file: A1=0, B1=1, ..., H8=63.

pub type Bitboard = u64;

// File masks (A is column 0, H column 7)
pub const FILE_A: Bitboard = 0x0101010101010101;
pub const FILE_B: Bitboard = 0x0202020202020202;
pub const FILE_G: Bitboard = 0x4040404040404040;
pub const FILE_H: Bitboard = 0x8080808080808080;

pub const NOT_FILE_A: Bitboard = !FILE_A;
pub const NOT_FILE_H: Bitboard = !FILE_H;
pub const NOT_FILE_AB: Bitboard = !(FILE_A | FILE_B);
pub const NOT_FILE_GH: Bitboard = !(FILE_G | FILE_H);

// Rank masks
pub const RANK_1: Bitboard = 0x00000000000000FF;
pub const RANK_2: Bitboard = 0x000000000000FF00;
pub const RANK_3: Bitboard = 0x0000000000FF0000;
pub const RANK_6: Bitboard = 0x0000FF0000000000;
pub const RANK_7: Bitboard = 0x00FF000000000000;
pub const RANK_8: Bitboard = 0xFF00000000000000;

pub const LIGHT_SQUARES: Bitboard = 0x55AA55AA55AA55AA;
pub const DARK_SQUARES: Bitboard = !LIGHT_SQUARES;

#[inline]
pub const fn square_bb(sq: usize) -> Bitboard {
    1u64 << sq
}

#[inline]
pub fn set_bit(bb: &mut Bitboard, sq: usize) {
    *bb |= 1u64 << sq;
}

#[inline]
pub fn clear_bit(bb: &mut Bitboard, sq: usize) {
    *bb &= !(1u64 << sq);
}

#[inline]
pub const fn get_bit(bb: Bitboard, sq: usize) -> bool {
    bb & (1u64 << sq) != 0
}

/// Removes the least significant set bit and returns its index.
#[inline]
pub fn pop_lsb(bb: &mut Bitboard) -> Option<usize> {
    if *bb == 0 {
        return None;
    }
    let lsb = bb.trailing_zeros() as usize;
    *bb &= *bb - 1;
    Some(lsb)
}

#[inline]
pub fn lsb_index(bb: Bitboard) -> Option<usize> {
    if bb == 0 {
        None
    } else {
        Some(bb.trailing_zeros() as usize)
    }
}

#[inline]
pub fn msb_index(bb: Bitboard) -> Option<usize> {
    if bb == 0 {
        None
    } else {
        Some(63 - bb.leading_zeros() as usize)
    }
}

#[inline]
pub fn count_bits(bb: Bitboard) -> u32 {
    bb.count_ones()
}

pub struct BitIter {
    bb: Bitboard,
}

impl Iterator for BitIter {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        pop_lsb(&mut self.bb)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.bb.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for BitIter {}

#[inline]
pub fn iter_bits(bb: Bitboard) -> BitIter {
    BitIter { bb }
}

#[inline]
pub const fn rank_of(sq: usize) -> usize {
    sq / 8
}

#[inline]
pub const fn file_of(sq: usize) -> usize {
    sq % 8
}

#[inline]
pub const fn make_square(rank: usize, file: usize) -> usize {
    rank * 8 + file
}

/// Vertical flip; maps a square to the one seen from the other side of the board.
#[inline]
pub const fn mirror(sq: usize) -> usize {
    sq ^ 56
}

/// Convert a square index (0-63) to coordinate notation (e.g. 0 -> "a1", 63 -> "h8")
pub fn square_name(sq: usize) -> String {
    let file = (b'a' + file_of(sq) as u8) as char;
    let rank = (b'1' + rank_of(sq) as u8) as char;
    format!("{}{}", file, rank)
}

/// Parse coordinate notation ("e4") into a square index.
pub fn parse_square(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    if bytes.len() != 2 {
        return None;
    }
    let (file, rank) = (bytes[0], bytes[1]);
    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return None;
    }
    Some(make_square((rank - b'1') as usize, (file - b'a') as usize))
}
