//! Modal menu shown whenever no game is running

use crate::difficulty::Difficulty;
use crate::game::GameStatus;

/// What the modal offers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    /// Cycles through the difficulties with left/right
    Difficulty,
    /// Only offered while paused
    Resume,
    NewGame,
    Quit,
}

impl MenuItem {
    pub fn label(&self) -> &'static str {
        match self {
            MenuItem::Difficulty => "Difficulty",
            MenuItem::Resume => "Resume",
            MenuItem::NewGame => "New game",
            MenuItem::Quit => "Quit",
        }
    }
}

/// Action selected from the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    SetDifficulty(Difficulty),
    Resume,
    NewGame,
    Quit,
}

/// Menu state
#[derive(Debug, Clone)]
pub struct Menu {
    pub items: Vec<MenuItem>,
    pub selected: usize,
    pub difficulty: Difficulty,
}

impl Menu {
    /// Build the menu for the current game status
    pub fn for_status(status: GameStatus, difficulty: Difficulty) -> Self {
        let mut items = vec![MenuItem::Difficulty];
        if status == GameStatus::Paused {
            items.push(MenuItem::Resume);
        }
        items.push(MenuItem::NewGame);
        items.push(MenuItem::Quit);

        // Start on the primary action
        let selected = items
            .iter()
            .position(|item| matches!(item, MenuItem::Resume | MenuItem::NewGame))
            .unwrap_or(0);

        Self {
            items,
            selected,
            difficulty,
        }
    }

    pub fn selected_item(&self) -> Option<MenuItem> {
        self.items.get(self.selected).copied()
    }

    pub fn move_up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        } else {
            self.selected = self.items.len().saturating_sub(1);
        }
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 < self.items.len() {
            self.selected += 1;
        } else {
            self.selected = 0;
        }
    }

    /// Handle left/right; only the difficulty row reacts
    pub fn adjust(&mut self, forward: bool) -> Option<MenuAction> {
        if self.selected_item() != Some(MenuItem::Difficulty) {
            return None;
        }
        self.difficulty = self.difficulty.cycled(forward);
        Some(MenuAction::SetDifficulty(self.difficulty))
    }

    /// Get the action for the current selection
    pub fn select(&self) -> Option<MenuAction> {
        match self.selected_item()? {
            MenuItem::Difficulty => None,
            MenuItem::Resume => Some(MenuAction::Resume),
            MenuItem::NewGame => Some(MenuAction::NewGame),
            MenuItem::Quit => Some(MenuAction::Quit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resume_only_when_paused() {
        let idle = Menu::for_status(GameStatus::Idle, Difficulty::Normal);
        assert!(!idle.items.contains(&MenuItem::Resume));
        assert_eq!(idle.select(), Some(MenuAction::NewGame));

        let finished = Menu::for_status(GameStatus::Finished, Difficulty::Normal);
        assert!(!finished.items.contains(&MenuItem::Resume));

        let paused = Menu::for_status(GameStatus::Paused, Difficulty::Normal);
        assert_eq!(paused.select(), Some(MenuAction::Resume));
    }

    #[test]
    fn test_navigation_wraps() {
        let mut menu = Menu::for_status(GameStatus::Idle, Difficulty::Normal);
        menu.move_down();
        assert_eq!(menu.select(), Some(MenuAction::Quit));
        menu.move_down();
        assert_eq!(menu.selected_item(), Some(MenuItem::Difficulty));
        menu.move_up();
        assert_eq!(menu.selected_item(), Some(MenuItem::Quit));
    }

    #[test]
    fn test_adjust_difficulty() {
        let mut menu = Menu::for_status(GameStatus::Idle, Difficulty::Normal);
        assert_eq!(menu.adjust(true), None);

        menu.move_up();
        assert_eq!(menu.adjust(true), Some(MenuAction::SetDifficulty(Difficulty::Hard)));
        assert_eq!(menu.adjust(false), Some(MenuAction::SetDifficulty(Difficulty::Normal)));
        assert_eq!(menu.select(), None);
    }
}
