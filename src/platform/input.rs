//! Keyboard input
//!
//! Key events arrive between frames; the latch buffers them and hands the
//! simulation one `TickInput` per step.

use std::collections::VecDeque;

use crate::sim::{Direction, TickInput};

/// Key presses buffered beyond this are dropped
const MAX_QUEUED_MOVES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Move(Direction),
    Start,
    Restart,
    NewGame,
    ToggleIdle,
}

/// Map a browser `KeyboardEvent.key` value to a command
pub fn map_key(key: &str) -> Option<KeyCommand> {
    match key {
        "ArrowUp" => Some(KeyCommand::Move(Direction::Up)),
        "ArrowDown" => Some(KeyCommand::Move(Direction::Down)),
        "ArrowLeft" => Some(KeyCommand::Move(Direction::Left)),
        "ArrowRight" => Some(KeyCommand::Move(Direction::Right)),
        " " | "Enter" => Some(KeyCommand::Start),
        "r" | "R" => Some(KeyCommand::Restart),
        "n" | "N" => Some(KeyCommand::NewGame),
        "i" | "I" => Some(KeyCommand::ToggleIdle),
        _ => None,
    }
}

/// Buffered input between frames
#[derive(Debug, Clone, Default)]
pub struct InputLatch {
    moves: VecDeque<Direction>,
    start: bool,
    restart: bool,
    new_game: bool,
    pub idle_mode: bool,
}

impl InputLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, command: KeyCommand) {
        match command {
            KeyCommand::Move(direction) => {
                if self.moves.len() < MAX_QUEUED_MOVES {
                    self.moves.push_back(direction);
                }
            }
            KeyCommand::Start => self.start = true,
            KeyCommand::Restart => self.restart = true,
            KeyCommand::NewGame => self.new_game = true,
            KeyCommand::ToggleIdle => {
                self.idle_mode = !self.idle_mode;
                log::info!("Idle mode: {}", self.idle_mode);
            }
        }
    }

    /// Input for the next step; one-shot actions and one queued move are consumed
    pub fn next_input(&mut self) -> TickInput {
        let input = TickInput {
            direction: self.moves.pop_front(),
            start: self.start,
            restart: self.restart,
            new_game: self.new_game,
            idle_mode: self.idle_mode,
        };
        self.start = false;
        self.restart = false;
        self.new_game = false;
        input
    }

    /// Forget buffered presses (e.g. when the window loses focus)
    pub fn clear(&mut self) {
        self.moves.clear();
        self.start = false;
        self.restart = false;
        self.new_game = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(map_key("ArrowUp"), Some(KeyCommand::Move(Direction::Up)));
        assert_eq!(map_key("ArrowRight"), Some(KeyCommand::Move(Direction::Right)));
        assert_eq!(map_key("Enter"), Some(KeyCommand::Start));
        assert_eq!(map_key(" "), Some(KeyCommand::Start));
        assert_eq!(map_key("R"), Some(KeyCommand::Restart));
        assert_eq!(map_key("n"), Some(KeyCommand::NewGame));
        assert_eq!(map_key("Escape"), None);
    }

    #[test]
    fn test_one_shots_clear_after_a_step() {
        let mut latch = InputLatch::new();
        latch.press(KeyCommand::Start);
        latch.press(KeyCommand::Move(Direction::Down));
        latch.press(KeyCommand::Move(Direction::Down));

        let first = latch.next_input();
        assert!(first.start);
        assert_eq!(first.direction, Some(Direction::Down));

        let second = latch.next_input();
        assert!(!second.start);
        assert_eq!(second.direction, Some(Direction::Down));

        assert_eq!(latch.next_input(), TickInput::default());
    }

    #[test]
    fn test_idle_mode_persists() {
        let mut latch = InputLatch::new();
        latch.press(KeyCommand::ToggleIdle);
        assert!(latch.next_input().idle_mode);
        assert!(latch.next_input().idle_mode);
        latch.press(KeyCommand::ToggleIdle);
        assert!(!latch.next_input().idle_mode);
    }

    #[test]
    fn test_move_queue_is_bounded() {
        let mut latch = InputLatch::new();
        for _ in 0..10 {
            latch.press(KeyCommand::Move(Direction::Left));
        }
        latch.clear();
        assert_eq!(latch.next_input().direction, None);

        for _ in 0..10 {
            latch.press(KeyCommand::Move(Direction::Left));
        }
        let moves = (0..10)
            .filter(|_| latch.next_input().direction.is_some())
            .count();
        assert_eq!(moves, MAX_QUEUED_MOVES);
    }
}
