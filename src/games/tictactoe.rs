//! Tic-Tac-Toe: two roles, alternating, deterministic.

use serde::{Deserialize, Serialize};
use smallvec::smallvec;

use crate::core::{ActiveRoles, Game, GameError, Haps, JointAction, Role, RoleMap};

const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

const XS: Role = Role::new(0);
const OS: Role = Role::new(1);

/// A 3x3 board. Squares are numbered 0-8, row by row.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    cells: [Option<Role>; 9],
}

impl Board {
    /// Owner of a square.
    #[must_use]
    pub fn cell(&self, square: usize) -> Option<Role> {
        self.cells[square]
    }

    /// Role to move: Xs moves first.
    #[must_use]
    pub fn to_move(&self) -> Role {
        let xs = self.cells.iter().filter(|c| **c == Some(XS)).count();
        let os = self.cells.iter().filter(|c| **c == Some(OS)).count();
        if xs > os {
            OS
        } else {
            XS
        }
    }

    /// Role with three in a row, if any.
    #[must_use]
    pub fn winner(&self) -> Option<Role> {
        LINES.iter().find_map(|line| {
            let first = self.cells[line[0]]?;
            line.iter()
                .all(|&sq| self.cells[sq] == Some(first))
                .then_some(first)
        })
    }

    /// Check if every square is taken.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Empty squares, ascending.
    pub fn empty_squares(&self) -> impl Iterator<Item = u8> + '_ {
        (0..9u8).filter(|&sq| self.cells[sq as usize].is_none())
    }

    /// Lines still winnable by `role` (no opposing mark on them).
    #[must_use]
    pub fn open_lines(&self, role: Role) -> usize {
        LINES
            .iter()
            .filter(|line| line.iter().all(|&sq| self.cells[sq].map_or(true, |r| r == role)))
            .count()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for cell in &self.cells {
            let c = match cell {
                Some(r) if *r == XS => 'X',
                Some(_) => 'O',
                None => '_',
            };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

/// Tic-Tac-Toe rules. Roles are "Xs" and "Os"; actions are square indices.
#[derive(Clone, Copy, Debug, Default)]
pub struct TicTacToe;

impl TicTacToe {
    /// Create the game.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parse a 9-character board, `X`, `O` or anything else for empty.
    ///
    /// ```
    /// use ludorum::games::TicTacToe;
    ///
    /// let board = TicTacToe::board_from("XX_OO____");
    /// assert_eq!(board.to_string(), "XX_OO____");
    /// ```
    #[must_use]
    pub fn board_from(text: &str) -> Board {
        let mut board = Board::default();
        for (i, c) in text.chars().take(9).enumerate() {
            board.cells[i] = match c {
                'X' | 'x' => Some(XS),
                'O' | 'o' => Some(OS),
                _ => None,
            };
        }
        board
    }

    /// Heuristic: difference in open lines between `role` and its opponent,
    /// scaled into `[-1, 1]`.
    pub fn line_heuristic(_game: &TicTacToe, board: &Board, role: Role) -> f64 {
        let opponent = role.next(2);
        (board.open_lines(role) as f64 - board.open_lines(opponent) as f64) / LINES.len() as f64
    }
}

impl Game for TicTacToe {
    type State = Board;
    type Action = u8;

    fn name(&self) -> &str {
        "TicTacToe"
    }

    fn role_count(&self) -> usize {
        2
    }

    fn role_name(&self, role: Role) -> String {
        let name = if role == XS { "Xs" } else { "Os" };
        name.to_string()
    }

    fn initial_state(&self) -> Board {
        Board::default()
    }

    fn active_roles(&self, board: &Board) -> ActiveRoles {
        if board.winner().is_some() || board.is_full() {
            ActiveRoles::new()
        } else {
            smallvec![board.to_move()]
        }
    }

    fn actions(&self, board: &Board, role: Role) -> Vec<u8> {
        if role == board.to_move() && board.winner().is_none() {
            board.empty_squares().collect()
        } else {
            Vec::new()
        }
    }

    fn result(&self, board: &Board) -> Option<RoleMap<f64>> {
        match board.winner() {
            Some(winner) => Some(RoleMap::new(2, |r| if r == winner { 1.0 } else { -1.0 })),
            None if board.is_full() => Some(RoleMap::with_value(2, 0.0)),
            None => None,
        }
    }

    fn next(&self, board: &Board, actions: &JointAction<u8>, _haps: &Haps) -> Result<Board, GameError> {
        let role = board.to_move();
        let square = *actions.get(role).ok_or(GameError::MissingAction { role })?;
        if square >= 9 || board.cells[square as usize].is_some() {
            return Err(GameError::IllegalAction { role });
        }

        let mut next = board.clone();
        next.cells[square as usize] = Some(role);
        Ok(next)
    }
}
