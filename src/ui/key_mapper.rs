// Maps terminal input events to actions

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::collections::HashMap;

use crate::ui::actions::{Action, NavigateAction, SortDirection};

/// Maps keyboard input to actions
pub struct KeyMapper {
    mappings: HashMap<(KeyCode, KeyModifiers), Action>,

    /// Vim-style count buffer for motions
    count_buffer: String,
}

impl KeyMapper {
    pub fn new(vim_mode: bool) -> Self {
        let mut mapper = Self {
            mappings: HashMap::new(),
            count_buffer: String::new(),
        };

        mapper.init_mappings();
        if vim_mode {
            mapper.init_vim_mappings();
        }
        mapper
    }

    fn init_mappings(&mut self) {
        use KeyCode::*;
        use KeyModifiers as Mod;

        let m = &mut self.mappings;

        // Basic navigation
        m.insert((Up, Mod::NONE), Action::Navigate(NavigateAction::Up(1)));
        m.insert((Down, Mod::NONE), Action::Navigate(NavigateAction::Down(1)));
        m.insert((Left, Mod::NONE), Action::Navigate(NavigateAction::Left(1)));
        m.insert((Right, Mod::NONE), Action::Navigate(NavigateAction::Right(1)));

        m.insert((PageUp, Mod::NONE), Action::Navigate(NavigateAction::PageUp));
        m.insert((PageDown, Mod::NONE), Action::Navigate(NavigateAction::PageDown));
        m.insert((Home, Mod::NONE), Action::Navigate(NavigateAction::FirstRow));
        m.insert((End, Mod::NONE), Action::Navigate(NavigateAction::LastRow));

        // Half-page jumps
        m.insert((Char('n'), Mod::CONTROL), Action::Navigate(NavigateAction::PageDown));
        m.insert((Char('f'), Mod::CONTROL), Action::Navigate(NavigateAction::PageDown));
        m.insert((Char('u'), Mod::CONTROL), Action::Navigate(NavigateAction::PageUp));
        m.insert((Char('h'), Mod::CONTROL), Action::Navigate(NavigateAction::PageLeft));
        // Most terminals deliver Ctrl-H as Backspace
        m.insert((Backspace, Mod::NONE), Action::Navigate(NavigateAction::PageLeft));
        m.insert((Char('l'), Mod::CONTROL), Action::Navigate(NavigateAction::PageRight));

        // Row jumps
        m.insert((Char('G'), Mod::NONE), Action::Navigate(NavigateAction::LastRow));
        m.insert((Char('U'), Mod::NONE), Action::Navigate(NavigateAction::FirstRow));

        // Column operations
        m.insert((Char(' '), Mod::NONE), Action::ToggleColumnVisibility);
        m.insert((Char('i'), Mod::CONTROL), Action::ConvertColumnToInteger);
        // Ctrl-I and Tab share a key code
        m.insert((Tab, Mod::NONE), Action::ConvertColumnToInteger);
        m.insert((Char('k'), Mod::CONTROL), Action::ConvertAllToText);

        // Data operations
        m.insert((Char('a'), Mod::CONTROL), Action::FeedAll);
        m.insert((Char('s'), Mod::NONE), Action::Sort(SortDirection::Ascending));
        m.insert((Char('S'), Mod::NONE), Action::Sort(SortDirection::Descending));

        // View
        m.insert((Char('n'), Mod::NONE), Action::ToggleHeader);

        // Quit
        m.insert((Char('q'), Mod::NONE), Action::Quit);
        m.insert((Esc, Mod::NONE), Action::Quit);
        m.insert((Char('c'), Mod::CONTROL), Action::Quit);
    }

    fn init_vim_mappings(&mut self) {
        use KeyCode::*;
        use KeyModifiers as Mod;

        let m = &mut self.mappings;
        m.insert((Char('h'), Mod::NONE), Action::Navigate(NavigateAction::Left(1)));
        m.insert((Char('j'), Mod::NONE), Action::Navigate(NavigateAction::Down(1)));
        m.insert((Char('k'), Mod::NONE), Action::Navigate(NavigateAction::Up(1)));
        m.insert((Char('l'), Mod::NONE), Action::Navigate(NavigateAction::Right(1)));
        m.insert((Char('g'), Mod::NONE), Action::Navigate(NavigateAction::FirstRow));
    }

    /// Map any terminal event. Resizes always map; key releases never do.
    pub fn map_event(&mut self, event: &Event) -> Option<Action> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.map_key(*key),
            Event::Resize(width, height) => Some(Action::Resize(*width, *height)),
            _ => None,
        }
    }

    /// Map a key event to an action
    pub fn map_key(&mut self, key: KeyEvent) -> Option<Action> {
        // Handle vim-style counts (e.g., "5j" for moving down 5 lines)
        if let KeyCode::Char(c) = key.code {
            // A leading zero is not a count
            let starts_count = c != '0' || !self.count_buffer.is_empty();
            if c.is_ascii_digit() && key.modifiers.is_empty() && starts_count {
                self.count_buffer.push(c);
                return None; // Collecting count, no action yet
            }
        }

        let action = self.map_key_internal(key);

        if !self.count_buffer.is_empty() {
            let count = self.count_buffer.parse::<usize>().ok();
            self.count_buffer.clear();
            if let (Some(action), Some(count)) = (action.clone(), count) {
                return Some(Self::apply_count_to_action(action, count));
            }
        }

        action
    }

    /// Internal key mapping without count handling
    fn map_key_internal(&self, key: KeyEvent) -> Option<Action> {
        // Shift is implied by the character itself
        let modifiers = match key.code {
            KeyCode::Char(_) => key.modifiers.difference(KeyModifiers::SHIFT),
            _ => key.modifiers,
        };
        let code = match (key.code, modifiers.contains(KeyModifiers::CONTROL)) {
            (KeyCode::Char(c), true) => KeyCode::Char(c.to_ascii_lowercase()),
            (code, _) => code,
        };
        self.mappings.get(&(code, modifiers)).cloned()
    }

    /// Apply a count to an action (for vim-style motions)
    fn apply_count_to_action(action: Action, count: usize) -> Action {
        // Moves are applied as signed deltas
        let count = count.min(isize::MAX as usize);
        match action {
            Action::Navigate(NavigateAction::Up(_)) => Action::Navigate(NavigateAction::Up(count)),
            Action::Navigate(NavigateAction::Down(_)) => {
                Action::Navigate(NavigateAction::Down(count))
            }
            Action::Navigate(NavigateAction::Left(_)) => {
                Action::Navigate(NavigateAction::Left(count))
            }
            Action::Navigate(NavigateAction::Right(_)) => {
                Action::Navigate(NavigateAction::Right(count))
            }
            // Other actions don't support counts
            _ => action,
        }
    }

    /// Get the current count buffer for display
    pub fn get_count_buffer(&self) -> &str {
        &self.count_buffer
    }
}

impl Default for KeyMapper {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_basic_navigation_mapping() {
        let mut mapper = KeyMapper::default();
        assert_eq!(
            mapper.map_key(key(KeyCode::Down)),
            Some(Action::Navigate(NavigateAction::Down(1)))
        );
        assert_eq!(
            mapper.map_key(key(KeyCode::Char('j'))),
            Some(Action::Navigate(NavigateAction::Down(1)))
        );
        assert_eq!(
            mapper.map_key(key(KeyCode::Char('h'))),
            Some(Action::Navigate(NavigateAction::Left(1)))
        );
    }

    #[test]
    fn test_vim_count_motion() {
        let mut mapper = KeyMapper::default();
        assert_eq!(mapper.map_key(key(KeyCode::Char('1'))), None);
        assert_eq!(mapper.map_key(key(KeyCode::Char('2'))), None);
        assert_eq!(mapper.get_count_buffer(), "12");
        assert_eq!(
            mapper.map_key(key(KeyCode::Char('l'))),
            Some(Action::Navigate(NavigateAction::Right(12)))
        );
        assert_eq!(mapper.get_count_buffer(), "");
    }

    #[test]
    fn test_huge_count_is_capped() {
        let mut mapper = KeyMapper::default();
        for c in "18446744073709551615".chars() {
            assert_eq!(mapper.map_key(key(KeyCode::Char(c))), None);
        }
        assert_eq!(
            mapper.map_key(key(KeyCode::Char('j'))),
            Some(Action::Navigate(NavigateAction::Down(isize::MAX as usize)))
        );

        // too large for usize: the count is dropped, the motion still applies
        for c in "99999999999999999999999".chars() {
            mapper.map_key(key(KeyCode::Char(c)));
        }
        assert_eq!(
            mapper.map_key(key(KeyCode::Char('h'))),
            Some(Action::Navigate(NavigateAction::Left(1)))
        );
    }

    #[test]
    fn test_count_is_dropped_for_other_actions() {
        let mut mapper = KeyMapper::default();
        mapper.map_key(key(KeyCode::Char('3')));
        assert_eq!(mapper.map_key(key(KeyCode::Char('n'))), Some(Action::ToggleHeader));
        assert_eq!(mapper.get_count_buffer(), "");
    }

    #[test]
    fn test_shifted_letters() {
        let mut mapper = KeyMapper::default();
        let shifted = KeyEvent::new(KeyCode::Char('S'), KeyModifiers::SHIFT);
        assert_eq!(
            mapper.map_key(shifted),
            Some(Action::Sort(SortDirection::Descending))
        );
        assert_eq!(
            mapper.map_key(key(KeyCode::Char('s'))),
            Some(Action::Sort(SortDirection::Ascending))
        );
        let g = KeyEvent::new(KeyCode::Char('G'), KeyModifiers::SHIFT);
        assert_eq!(
            mapper.map_key(g),
            Some(Action::Navigate(NavigateAction::LastRow))
        );
    }

    #[test]
    fn test_control_keys() {
        let mut mapper = KeyMapper::default();
        assert_eq!(mapper.map_key(ctrl('a')), Some(Action::FeedAll));
        assert_eq!(mapper.map_key(ctrl('k')), Some(Action::ConvertAllToText));
        assert_eq!(mapper.map_key(ctrl('i')), Some(Action::ConvertColumnToInteger));
        assert_eq!(
            mapper.map_key(key(KeyCode::Tab)),
            Some(Action::ConvertColumnToInteger)
        );
        assert_eq!(mapper.map_key(ctrl('c')), Some(Action::Quit));
        assert_eq!(
            mapper.map_key(ctrl('u')),
            Some(Action::Navigate(NavigateAction::PageUp))
        );
    }

    #[test]
    fn test_vim_keys_disabled() {
        let mut mapper = KeyMapper::new(false);
        assert_eq!(mapper.map_key(key(KeyCode::Char('j'))), None);
        assert_eq!(
            mapper.map_key(key(KeyCode::Up)),
            Some(Action::Navigate(NavigateAction::Up(1)))
        );
    }

    #[test]
    fn test_events() {
        let mut mapper = KeyMapper::default();
        assert_eq!(
            mapper.map_event(&Event::Resize(120, 40)),
            Some(Action::Resize(120, 40))
        );
        let mut release = key(KeyCode::Char('q'));
        release.kind = KeyEventKind::Release;
        assert_eq!(mapper.map_event(&Event::Key(release)), None);
        assert_eq!(
            mapper.map_event(&Event::Key(key(KeyCode::Char('q')))),
            Some(Action::Quit)
        );
    }
}
