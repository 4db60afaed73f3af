//! Board module - tubes, move validation and transfers
//!
//! A board is an ordered list of tubes. Each tube is a stack stored bottom-first:
//! index 0 is the bottom piece, the last element is the top. Tubes use fixed inline
//! storage (`ArrayVec`) sized to `TUBE_CAPACITY`, so moves never allocate.
//!
//! The per-board `capacity` may be smaller than `TUBE_CAPACITY` (hand-built test
//! boards use 4) but never larger.

use arrayvec::ArrayVec;

use crate::types::{Hint, MoveRecord, MoveRejection, Piece, TUBE_CAPACITY};

/// Errors from building a board out of raw tube contents.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("capacity {capacity} exceeds the tube storage limit {limit}")]
    CapacityTooLarge { capacity: usize, limit: usize },

    #[error("tube {tube} holds {len} pieces but capacity is {capacity}")]
    TubeOverCapacity {
        tube: usize,
        len: usize,
        capacity: usize,
    },
}

/// A single stack of pieces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Tube {
    pieces: ArrayVec<Piece, TUBE_CAPACITY>,
}

impl Tube {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Pieces bottom-first.
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn top(&self) -> Option<&Piece> {
        self.pieces.last()
    }

    /// Number of consecutive same-colored pieces counted down from the top.
    pub fn top_run_len(&self) -> usize {
        let Some(top) = self.top() else {
            return 0;
        };
        self.pieces
            .iter()
            .rev()
            .take_while(|p| p.same_color(top))
            .count()
    }

    /// True when every piece shares one color (an empty tube counts).
    pub fn is_monochrome(&self) -> bool {
        match self.pieces.first() {
            Some(first) => self.pieces.iter().all(|p| p.same_color(first)),
            None => true,
        }
    }

    /// Push a piece. Returns false when the inline storage is full.
    pub(crate) fn push(&mut self, piece: Piece) -> bool {
        self.pieces.try_push(piece).is_ok()
    }

    /// Colors bottom-first (for hashing and compact display).
    pub fn colors(&self) -> impl Iterator<Item = u8> + '_ {
        self.pieces.iter().map(|p| p.color_index)
    }
}

/// The set of tubes for one level
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    tubes: Vec<Tube>,
    capacity: usize,
}

impl Board {
    /// Create a board of `tube_count` empty tubes.
    pub fn new(tube_count: usize, capacity: usize) -> Result<Self, BoardError> {
        if capacity > TUBE_CAPACITY {
            return Err(BoardError::CapacityTooLarge {
                capacity,
                limit: TUBE_CAPACITY,
            });
        }
        Ok(Self {
            tubes: vec![Tube::new(); tube_count],
            capacity,
        })
    }

    /// Build a board from explicit tube contents (bottom-first).
    pub fn from_tubes(tubes: Vec<Vec<Piece>>, capacity: usize) -> Result<Self, BoardError> {
        let mut board = Self::new(0, capacity)?;
        for (index, pieces) in tubes.into_iter().enumerate() {
            if pieces.len() > capacity {
                return Err(BoardError::TubeOverCapacity {
                    tube: index,
                    len: pieces.len(),
                    capacity,
                });
            }
            let mut tube = Tube::new();
            for piece in pieces {
                tube.push(piece);
            }
            board.tubes.push(tube);
        }
        Ok(board)
    }

    /// Assemble from tubes that already respect `capacity <= TUBE_CAPACITY`.
    pub(crate) fn from_parts(tubes: Vec<Tube>, capacity: usize) -> Self {
        Self { tubes, capacity }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn tube_count(&self) -> usize {
        self.tubes.len()
    }

    pub fn tubes(&self) -> &[Tube] {
        &self.tubes
    }

    pub fn tube(&self, index: usize) -> Option<&Tube> {
        self.tubes.get(index)
    }

    pub(crate) fn tube_mut(&mut self, index: usize) -> Option<&mut Tube> {
        self.tubes.get_mut(index)
    }

    /// Total pieces across all tubes.
    pub fn piece_count(&self) -> usize {
        self.tubes.iter().map(Tube::len).sum()
    }

    /// Pieces per color, indexed by color.
    pub fn color_histogram(&self) -> Vec<usize> {
        let mut counts = Vec::new();
        for color in self.tubes.iter().flat_map(Tube::colors) {
            let idx = color as usize;
            if counts.len() <= idx {
                counts.resize(idx + 1, 0);
            }
            counts[idx] += 1;
        }
        counts
    }

    /// Check whether the top run of `from` may be poured into `to`.
    pub fn check_move(&self, from: usize, to: usize) -> Result<(), MoveRejection> {
        if from == to {
            return Err(MoveRejection::SameTube);
        }
        let (Some(src), Some(dst)) = (self.tubes.get(from), self.tubes.get(to)) else {
            return Err(MoveRejection::NoSuchTube);
        };
        let Some(src_top) = src.top() else {
            return Err(MoveRejection::SourceEmpty);
        };
        if dst.len() >= self.capacity {
            return Err(MoveRejection::DestinationFull);
        }
        match dst.top() {
            None => Ok(()),
            Some(dst_top) if dst_top.same_color(src_top) => Ok(()),
            Some(_) => Err(MoveRejection::ColorMismatch),
        }
    }

    pub fn is_valid_move(&self, from: usize, to: usize) -> bool {
        self.check_move(from, to).is_ok()
    }

    /// Pieces a valid move from `from` to `to` would transfer.
    pub fn transfer_count(&self, from: usize, to: usize) -> usize {
        match (self.tubes.get(from), self.tubes.get(to)) {
            (Some(src), Some(dst)) => src
                .top_run_len()
                .min(self.capacity.saturating_sub(dst.len())),
            _ => 0,
        }
    }

    /// Apply a move: pour the top run of `from` into `to`, limited by free space.
    ///
    /// Order is preserved, so the piece on top of `from` ends on top of `to`.
    pub fn apply_move(&mut self, from: usize, to: usize) -> Result<MoveRecord, MoveRejection> {
        self.check_move(from, to)?;
        let count = self.transfer_count(from, to);
        self.shift(from, to, count);
        Ok(MoveRecord { from, to, count })
    }

    /// Reverse a previously applied move.
    ///
    /// Returns false (and leaves the board untouched) when the record cannot apply.
    pub fn undo_move(&mut self, record: MoveRecord) -> bool {
        let (Some(src), Some(dst)) = (self.tubes.get(record.to), self.tubes.get(record.from))
        else {
            return false;
        };
        if record.from == record.to || src.len() < record.count {
            return false;
        }
        if dst.len() + record.count > self.capacity {
            return false;
        }
        self.shift(record.to, record.from, record.count);
        true
    }

    /// Move the top `count` pieces of `from` onto `to`, keeping their order.
    fn shift(&mut self, from: usize, to: usize, count: usize) {
        let mut moved: ArrayVec<Piece, TUBE_CAPACITY> = ArrayVec::new();
        if let Some(src) = self.tube_mut(from) {
            let start = src.pieces.len() - count;
            moved.extend(src.pieces.drain(start..));
        }
        if let Some(dst) = self.tube_mut(to) {
            for piece in moved {
                dst.push(piece);
            }
        }
    }

    /// Solved: every tube is empty, or single-colored and either full or
    /// holding every piece of its color.
    ///
    /// The second form lets generated boards (capacity 6, four pieces per color)
    /// finish; on boards where capacity equals the per-color count both agree.
    pub fn is_complete(&self) -> bool {
        let histogram = self.color_histogram();
        self.tubes.iter().all(|t| {
            let Some(top) = t.top() else {
                return true;
            };
            if !t.is_monochrome() {
                return false;
            }
            t.len() == self.capacity || histogram[top.color_index as usize] == t.len()
        })
    }

    /// First legal move in (from, to) scan order.
    pub fn first_valid_move(&self) -> Option<Hint> {
        self.valid_moves().next()
    }

    /// All legal moves in (from, to) scan order.
    pub fn valid_moves(&self) -> impl Iterator<Item = Hint> + '_ {
        let n = self.tubes.len();
        (0..n)
            .flat_map(move |from| (0..n).map(move |to| (from, to)))
            .filter(|&(from, to)| self.is_valid_move(from, to))
            .map(|(from, to)| Hint { from, to })
    }
}

impl Default for Board {
    /// No tubes, full-size capacity.
    fn default() -> Self {
        Self {
            tubes: Vec::new(),
            capacity: TUBE_CAPACITY,
        }
    }
}
