//! Game state, move legality, and the two input entry points

use crate::board::{far_row, Pos, NUM_CELLS};
use crate::error::{ContractViolation, SetupError};
use crate::pieces::PieceKind;
use crate::setup::Setup;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

// ============================================================================
// CORE TYPES
// ============================================================================

/// Player side
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Player {
    Top = 0,
    Bottom = 1,
}

impl Player {
    pub const ALL: [Player; 2] = [Player::Top, Player::Bottom];

    pub fn opponent(self) -> Self {
        match self {
            Player::Top => Player::Bottom,
            Player::Bottom => Player::Top,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// How a game was won
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinReason {
    /// The opponent's king was captured
    KingCaptured,
    /// The winner's king reached the opponent's back row
    Try,
}

/// Game status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    InProgress,
    Finished { winner: Player, reason: WinReason },
}

/// Stable handle into the piece arena
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceId(pub u8);

impl PieceId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A piece. Lives in the arena for the whole game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub owner: Player,
}

/// What the current player has picked up. One variant at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    #[default]
    None,
    Cell(Pos),
    Reserve(PieceId),
}

/// A legal action
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Move { piece: PieceId, from: Pos, to: Pos },
    Drop { piece: PieceId, to: Pos },
}

/// Notification emitted after a state change
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    SelectionChanged(Selection),
    PieceMoved {
        piece: PieceId,
        from: Pos,
        to: Pos,
        captured: Option<PieceId>,
        promoted: bool,
    },
    PieceDropped { piece: PieceId, to: Pos },
    TurnChanged(Player),
    GameFinished { winner: Player, reason: WinReason },
}

/// Receives every event the engine emits, in order
pub trait GameObserver {
    fn on_event(&mut self, event: &Event);
}

impl<F: FnMut(&Event)> GameObserver for F {
    fn on_event(&mut self, event: &Event) {
        self(event)
    }
}

// ============================================================================
// GEOMETRY
// ============================================================================

/// Every in-bounds cell the piece's offsets reach from `pos`, ignoring
/// occupancy. Offsets are negated for Top.
pub fn compute_destinations(pos: Pos, piece: &Piece) -> FxHashSet<Pos> {
    let sign = match piece.owner {
        Player::Bottom => 1,
        Player::Top => -1,
    };
    piece
        .kind
        .offsets()
        .iter()
        .filter_map(|&(dx, dy)| pos.offset(dx * sign, dy * sign))
        .collect()
}

// ============================================================================
// ENGINE
// ============================================================================

/// One game in progress
pub struct Engine {
    /// Piece arena, indexed by PieceId
    pieces: Vec<Piece>,

    /// Row-major cells
    board: [Option<PieceId>; NUM_CELLS],

    /// Captured pieces per player, in capture order
    reserves: [Vec<PieceId>; 2],

    /// King taken on the final move. Out of play, never transferred.
    captured_king: Option<PieceId>,

    current_player: Player,
    selection: Selection,
    status: GameStatus,
    observers: Vec<Box<dyn GameObserver>>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("pieces", &self.pieces)
            .field("board", &self.board)
            .field("reserves", &self.reserves)
            .field("captured_king", &self.captured_king)
            .field("current_player", &self.current_player)
            .field("selection", &self.selection)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

impl Engine {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Create a game from a placement list
    pub fn new(setup: &Setup) -> Result<Self, SetupError> {
        setup.validate()?;

        let mut pieces = Vec::with_capacity(setup.placements.len());
        let mut board = [None; NUM_CELLS];
        for placement in &setup.placements {
            let id = PieceId(pieces.len() as u8);
            pieces.push(Piece {
                kind: placement.kind,
                owner: placement.owner,
            });
            board[placement.pos.index()] = Some(id);
        }

        tracing::debug!(
            setup = %setup.name,
            pieces = pieces.len(),
            first = ?setup.first_player,
            "new game"
        );

        Ok(Self {
            pieces,
            board,
            reserves: [Vec::new(), Vec::new()],
            captured_king: None,
            current_player: setup.first_player,
            selection: Selection::None,
            status: GameStatus::InProgress,
            observers: Vec::new(),
        })
    }

    /// Create a game from the standard opening
    pub fn standard() -> Self {
        Self::new(&Setup::standard()).expect("standard setup is valid")
    }

    /// Register an observer for all future events
    pub fn subscribe(&mut self, observer: impl GameObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status != GameStatus::InProgress
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id.index())
    }

    /// Piece occupying a cell
    pub fn piece_at(&self, pos: Pos) -> Option<(PieceId, Piece)> {
        if !pos.is_valid() {
            return None;
        }
        self.board[pos.index()].map(|id| (id, self.pieces[id.index()]))
    }

    /// Iterate occupied cells in row-major order
    pub fn board_pieces(&self) -> impl Iterator<Item = (Pos, PieceId, Piece)> + '_ {
        Pos::all().filter_map(|pos| self.piece_at(pos).map(|(id, piece)| (pos, id, piece)))
    }

    /// A player's reserve, in capture order
    pub fn reserve(&self, player: Player) -> &[PieceId] {
        &self.reserves[player.index()]
    }

    /// King removed from play by the winning capture, if any
    pub fn captured_king(&self) -> Option<PieceId> {
        self.captured_king
    }

    /// Pieces on the board, in both reserves, and a captured king
    pub fn piece_count(&self) -> usize {
        self.board.iter().flatten().count()
            + self.reserves.iter().map(Vec::len).sum::<usize>()
            + usize::from(self.captured_king.is_some())
    }

    pub fn king_position(&self, player: Player) -> Option<Pos> {
        self.board_pieces()
            .find(|(_, _, piece)| piece.kind.is_king() && piece.owner == player)
            .map(|(pos, _, _)| pos)
    }

    /// Cells to highlight for the current selection
    pub fn selection_hints(&self) -> FxHashSet<Pos> {
        match self.selection {
            Selection::None => FxHashSet::default(),
            Selection::Cell(pos) => match self.piece_at(pos) {
                Some((_, piece)) => self.compute_movable_cells(pos, &piece),
                None => FxHashSet::default(),
            },
            Selection::Reserve(_) => self.empty_cells().collect(),
        }
    }

    fn empty_cells(&self) -> impl Iterator<Item = Pos> + '_ {
        Pos::all().filter(|pos| self.board[pos.index()].is_none())
    }

    fn in_reserve(&self, player: Player, piece: PieceId) -> bool {
        self.reserves[player.index()].contains(&piece)
    }

    // ========================================================================
    // LEGALITY
    // ========================================================================

    /// Destinations that are empty or hold an opponent piece
    pub fn compute_movable_cells(&self, pos: Pos, piece: &Piece) -> FxHashSet<Pos> {
        compute_destinations(pos, piece)
            .into_iter()
            .filter(|&dest| match self.board[dest.index()] {
                Some(id) => self.pieces[id.index()].owner != piece.owner,
                None => true,
            })
            .collect()
    }

    /// True if the current player may move `piece` from `from` to `to`
    pub fn is_legal_move(&self, piece: PieceId, from: Pos, to: Pos) -> bool {
        if self.is_finished() || !from.is_valid() || !to.is_valid() {
            return false;
        }
        if self.board[from.index()] != Some(piece) {
            return false;
        }
        let moving = self.pieces[piece.index()];
        moving.owner == self.current_player && self.compute_movable_cells(from, &moving).contains(&to)
    }

    /// Every legal move and drop for the current player
    pub fn legal_actions(&self) -> Vec<Action> {
        if self.is_finished() {
            return vec![];
        }

        let mut actions = Vec::new();
        for (from, piece, p) in self.board_pieces() {
            if p.owner != self.current_player {
                continue;
            }
            let mut targets: Vec<Pos> = self.compute_movable_cells(from, &p).into_iter().collect();
            targets.sort();
            actions.extend(targets.into_iter().map(|to| Action::Move { piece, from, to }));
        }

        for &piece in self.reserve(self.current_player) {
            actions.extend(self.empty_cells().map(|to| Action::Drop { piece, to }));
        }

        actions
    }

    // ========================================================================
    // EXECUTION
    // ========================================================================

    /// Move a piece, capturing and promoting as needed.
    /// Fails without touching state if any precondition is unmet.
    pub fn execute_move(
        &mut self,
        piece: PieceId,
        from: Pos,
        to: Pos,
    ) -> Result<Vec<Event>, ContractViolation> {
        self.check_in_progress()?;
        let moving = *self.piece(piece).ok_or(ContractViolation::UnknownPiece(piece))?;
        for pos in [from, to] {
            if !pos.is_valid() {
                return Err(ContractViolation::OutOfBounds(pos));
            }
        }
        if self.board[from.index()] != Some(piece) {
            return Err(ContractViolation::PieceNotAt { piece, pos: from });
        }
        if moving.owner != self.current_player {
            return Err(ContractViolation::NotCurrentPlayer {
                piece,
                owner: moving.owner,
                current: self.current_player,
            });
        }
        if !self.compute_movable_cells(from, &moving).contains(&to) {
            return Err(ContractViolation::IllegalMove { from, to });
        }

        let mover = self.current_player;

        // Capture: flip owner, demote, append to mover's reserve.
        // A king keeps its owner and leaves play.
        let captured = self.board[to.index()].take();
        let mut captured_king = false;
        if let Some(id) = captured {
            let victim = &mut self.pieces[id.index()];
            if victim.kind.is_king() {
                captured_king = true;
                self.captured_king = Some(id);
            } else {
                victim.owner = mover;
                victim.kind = victim.kind.demoted();
                self.reserves[mover.index()].push(id);
            }
        }

        self.board[from.index()] = None;
        self.board[to.index()] = Some(piece);

        let mut promoted = false;
        let moved = &mut self.pieces[piece.index()];
        if moved.kind == PieceKind::Forward && to.y == far_row(mover) {
            moved.kind = moved.kind.promoted();
            promoted = true;
        }

        tracing::debug!(player = ?mover, %from, %to, ?captured, promoted, "piece moved");

        self.selection = Selection::None;
        let mut events = vec![Event::PieceMoved {
            piece,
            from,
            to,
            captured,
            promoted,
        }];

        if captured_king {
            events.push(self.finish(mover, WinReason::KingCaptured));
        } else if self.king_on_far_row(mover) {
            events.push(self.finish(mover, WinReason::Try));
        } else {
            events.push(self.end_turn());
        }

        self.emit(&events);
        Ok(events)
    }

    /// Place a reserve piece on an empty cell. Never promotes.
    pub fn execute_drop(&mut self, piece: PieceId, to: Pos) -> Result<Vec<Event>, ContractViolation> {
        self.check_in_progress()?;
        if self.piece(piece).is_none() {
            return Err(ContractViolation::UnknownPiece(piece));
        }
        if !to.is_valid() {
            return Err(ContractViolation::OutOfBounds(to));
        }
        if !self.in_reserve(self.current_player, piece) {
            return Err(ContractViolation::NotInReserve(piece));
        }
        if self.board[to.index()].is_some() {
            return Err(ContractViolation::CellOccupied(to));
        }

        self.reserves[self.current_player.index()].retain(|&id| id != piece);
        self.board[to.index()] = Some(piece);

        tracing::debug!(player = ?self.current_player, %to, ?piece, "piece dropped");

        self.selection = Selection::None;
        let events = vec![Event::PieceDropped { piece, to }, self.end_turn()];

        self.emit(&events);
        Ok(events)
    }

    /// Execute a move or drop
    pub fn apply(&mut self, action: Action) -> Result<Vec<Event>, ContractViolation> {
        match action {
            Action::Move { piece, from, to } => self.execute_move(piece, from, to),
            Action::Drop { piece, to } => self.execute_drop(piece, to),
        }
    }

    fn check_in_progress(&self) -> Result<(), ContractViolation> {
        if self.is_finished() {
            return Err(ContractViolation::GameFinished);
        }
        Ok(())
    }

    fn king_on_far_row(&self, player: Player) -> bool {
        self.king_position(player)
            .is_some_and(|pos| pos.y == far_row(player))
    }

    fn finish(&mut self, winner: Player, reason: WinReason) -> Event {
        tracing::debug!(?winner, ?reason, "game finished");
        self.status = GameStatus::Finished { winner, reason };
        Event::GameFinished { winner, reason }
    }

    fn end_turn(&mut self) -> Event {
        self.current_player = self.current_player.opponent();
        Event::TurnChanged(self.current_player)
    }

    fn emit(&mut self, events: &[Event]) {
        for observer in &mut self.observers {
            for event in events {
                observer.on_event(event);
            }
        }
    }

    // ========================================================================
    // SELECTION
    // ========================================================================

    /// Select one of the current player's board pieces
    pub fn select_board_piece(&mut self, pos: Pos) -> bool {
        if self.is_finished() {
            return false;
        }
        match self.piece_at(pos) {
            Some((_, piece)) if piece.owner == self.current_player => {
                self.selection = Selection::Cell(pos);
                true
            }
            _ => false,
        }
    }

    /// Select a piece from the current player's reserve
    pub fn select_reserve_piece(&mut self, piece: PieceId) -> bool {
        if self.is_finished() || !self.in_reserve(self.current_player, piece) {
            return false;
        }
        self.selection = Selection::Reserve(piece);
        true
    }

    // ========================================================================
    // INPUT ENTRY POINTS
    // ========================================================================

    /// A cell was clicked. Selects, moves, drops, or does nothing.
    /// Returns the events emitted; empty means the input was ignored.
    pub fn on_cell_activated(&mut self, pos: Pos) -> Vec<Event> {
        if self.is_finished() || !pos.is_valid() {
            tracing::trace!(%pos, "cell input ignored");
            return vec![];
        }

        if self.select_board_piece(pos) {
            return self.selection_changed();
        }

        let action = match self.selection {
            Selection::Cell(from) => self.board[from.index()]
                .filter(|&piece| self.is_legal_move(piece, from, pos))
                .map(|piece| Action::Move { piece, from, to: pos }),
            Selection::Reserve(piece) if self.board[pos.index()].is_none() => {
                Some(Action::Drop { piece, to: pos })
            }
            _ => None,
        };

        match action {
            Some(action) => self.apply(action).unwrap_or_else(|err| {
                tracing::error!(%err, ?action, "validated action was rejected");
                vec![]
            }),
            None => {
                tracing::trace!(%pos, selection = ?self.selection, "cell input ignored");
                vec![]
            }
        }
    }

    /// A reserve piece was clicked. Selects it if it is the current player's.
    pub fn on_reserve_piece_activated(&mut self, piece: PieceId) -> Vec<Event> {
        if self.select_reserve_piece(piece) {
            return self.selection_changed();
        }
        tracing::trace!(?piece, "reserve input ignored");
        vec![]
    }

    fn selection_changed(&mut self) -> Vec<Event> {
        let events = vec![Event::SelectionChanged(self.selection)];
        self.emit(&events);
        events
    }

    // ========================================================================
    // SNAPSHOT
    // ========================================================================

    /// Serializable view of everything a presentation layer reads
    pub fn snapshot(&self) -> Snapshot {
        let reserve_view = |player: Player| -> Vec<ReserveEntry> {
            self.reserve(player)
                .iter()
                .map(|&id| ReserveEntry {
                    piece: id,
                    kind: self.pieces[id.index()].kind,
                })
                .collect()
        };

        let mut hints: Vec<Pos> = self.selection_hints().into_iter().collect();
        hints.sort();

        Snapshot {
            cells: self
                .board_pieces()
                .map(|(pos, piece, p)| CellView {
                    pos,
                    piece,
                    kind: p.kind,
                    owner: p.owner,
                })
                .collect(),
            top_reserve: reserve_view(Player::Top),
            bottom_reserve: reserve_view(Player::Bottom),
            current_player: self.current_player,
            status: self.status,
            selection: self.selection,
            hints,
        }
    }
}

/// An occupied cell
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    pub pos: Pos,
    pub piece: PieceId,
    pub kind: PieceKind,
    pub owner: Player,
}

/// A reserve slot
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveEntry {
    pub piece: PieceId,
    pub kind: PieceKind,
}

/// Read-only copy of the engine state
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub cells: Vec<CellView>,
    pub top_reserve: Vec<ReserveEntry>,
    pub bottom_reserve: Vec<ReserveEntry>,
    pub current_player: Player,
    pub status: GameStatus,
    pub selection: Selection,
    pub hints: Vec<Pos>,
}

// ============================================================================
// TESTS
// ============================================================================
