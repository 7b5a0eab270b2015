/// Keystroke → engine command.
///
/// One key per tick: the loop polls a single press and maps it here.
/// Anything unmapped is ignored.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::entity::{Command, MoveDir};

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Char('q'), KeyCode::Char('Q'), KeyCode::Esc];

pub fn map_key(key: &KeyEvent) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('C') => Some(Command::Quit),
            _ => None,
        };
    }

    let code = &key.code;
    if KEYS_QUIT.contains(code) {
        Some(Command::Quit)
    } else if KEYS_LEFT.contains(code) {
        Some(Command::Move(MoveDir::Left))
    } else if KEYS_RIGHT.contains(code) {
        Some(Command::Move(MoveDir::Right))
    } else if KEYS_UP.contains(code) {
        Some(Command::Move(MoveDir::Up))
    } else if KEYS_DOWN.contains(code) {
        Some(Command::Move(MoveDir::Down))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::key;

    fn cmd(code: KeyCode) -> Option<Command> {
        map_key(&KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn wasd_in_either_case_and_arrows_move() {
        for (c, dir) in [('w', MoveDir::Up), ('a', MoveDir::Left), ('s', MoveDir::Down), ('d', MoveDir::Right)] {
            assert_eq!(map_key(&key(c)), Some(Command::Move(dir)));
            assert_eq!(map_key(&key(c.to_ascii_uppercase())), Some(Command::Move(dir)));
        }
        assert_eq!(cmd(KeyCode::Up), Some(Command::Move(MoveDir::Up)));
        assert_eq!(cmd(KeyCode::Down), Some(Command::Move(MoveDir::Down)));
        assert_eq!(cmd(KeyCode::Left), Some(Command::Move(MoveDir::Left)));
        assert_eq!(cmd(KeyCode::Right), Some(Command::Move(MoveDir::Right)));
    }

    #[test]
    fn quit_keys() {
        assert_eq!(map_key(&key('q')), Some(Command::Quit));
        assert_eq!(map_key(&key('Q')), Some(Command::Quit));
        assert_eq!(cmd(KeyCode::Esc), Some(Command::Quit));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(&ctrl_c), Some(Command::Quit));
    }

    #[test]
    fn other_keys_are_ignored() {
        assert_eq!(map_key(&key('x')), None);
        assert_eq!(map_key(&key(' ')), None);
        assert_eq!(cmd(KeyCode::Enter), None);
        // Ctrl+W is not a move.
        assert_eq!(map_key(&KeyEvent::new(KeyCode::Char('w'), KeyModifiers::CONTROL)), None);
    }

    #[test]
    fn releases_are_ignored() {
        let mut ev = key('d');
        ev.kind = KeyEventKind::Release;
        assert_eq!(map_key(&ev), None);
    }
}
