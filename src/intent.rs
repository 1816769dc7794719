//! Editor state and the intents a rendering surface emits.
//!
//! The surface never mutates the board or the selection itself. It reports
//! what the user asked for as an [`Intent`], and [`reduce`] returns the next
//! [`EditorState`] after applying it to the board.

use serde::{Deserialize, Serialize};

use crate::blurb::BlurbEdit;
use crate::board::Board;
use crate::error::BoardError;
use crate::id::BlurbId;

/// Which blurb the editor is showing, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorState {
    pub selected: Option<BlurbId>,
    pub editing: bool,
}

impl EditorState {
    pub fn is_selected(&self, id: &BlurbId) -> bool {
        self.selected.as_ref() == Some(id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Intent {
    /// A tile was clicked; open the editor on it.
    Select(BlurbId),
    /// The editor was dismissed.
    CloseEditor,
    Add,
    Remove(BlurbId),
    MoveUp(BlurbId),
    MoveDown(BlurbId),
    MoveTo { id: BlurbId, rank: usize },
    SetCount(usize),
    Edit(BlurbId, BlurbEdit),
}

/// Apply `intent` to `board` and return the next editor state. On error
/// the board is left as the failing operation left it and the caller keeps
/// its previous state.
pub fn reduce(board: &mut Board, state: EditorState, intent: Intent) -> Result<EditorState, BoardError> {
    match intent {
        Intent::Select(id) => {
            if board.get(&id).is_none() {
                return Err(BoardError::UnknownBlurb { id });
            }
            Ok(EditorState {
                selected: Some(id),
                editing: true,
            })
        }
        Intent::CloseEditor => Ok(EditorState::default()),
        Intent::Add => {
            let id = board.add()?.id.clone();
            Ok(EditorState {
                selected: Some(id),
                editing: true,
            })
        }
        Intent::Remove(id) => {
            board.remove(&id)?;
            if state.is_selected(&id) {
                Ok(EditorState::default())
            } else {
                Ok(state)
            }
        }
        Intent::MoveUp(id) => {
            board.move_up(&id)?;
            Ok(state)
        }
        Intent::MoveDown(id) => {
            board.move_down(&id)?;
            Ok(state)
        }
        Intent::MoveTo { id, rank } => {
            board.move_to(&id, rank)?;
            Ok(state)
        }
        Intent::SetCount(count) => {
            let dropped = board.resize(count)?;
            if dropped.iter().any(|blurb| state.is_selected(&blurb.id)) {
                Ok(EditorState::default())
            } else {
                Ok(state)
            }
        }
        Intent::Edit(id, edit) => {
            board.edit(&id, edit)?;
            Ok(state)
        }
    }
}
