//! Discrete commands and input mapping
//!
//! Keyboard and wheel input is translated into [`Command`]s, which a
//! [`Navigator`] then applies. Holding shift swaps the axes.

use crate::tree::NodeId;
use crate::{NavError, Navigator};

/// Navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Focal branch deeper by n levels
    MoveIn(usize),
    /// Focal branch toward the root by n levels
    MoveOut(usize),
    /// Focal node toward the last sibling by n
    MoveForward(usize),
    /// Focal node toward the first sibling by n
    MoveBack(usize),
    /// Focal branch to an absolute level
    SetFocalLevel(usize),
    /// Make a node focal
    JumpTo(NodeId),
    /// Tap on a node
    Tap(NodeId),
    /// Change the active child of a node
    SetActiveChild {
        /// Node whose active child changes
        parent: NodeId,
        /// New active child index
        index: usize,
    },
    /// Start inspecting the focal node
    EnterInspectMode,
    /// Stop inspecting
    ExitInspectMode,
    /// Flip inspect mode
    ToggleInspectMode,
}

/// Keys the navigator responds to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Up arrow
    ArrowUp,
    /// Down arrow
    ArrowDown,
    /// Left arrow
    ArrowLeft,
    /// Right arrow
    ArrowRight,
    /// Space bar
    Space,
    /// Page up
    PageUp,
    /// Page down
    PageDown,
    /// Home
    Home,
    /// End
    End,
    /// Enter, toggles inspect mode
    Enter,
}

/// Key press with modifier state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    /// Pressed key
    pub key: Key,
    /// Shift held
    pub shift: bool,
}

/// Steps taken by the paging keys
const PAGE_STEPS: usize = 3;

impl KeyInput {
    /// Plain key press
    pub fn new(key: Key) -> Self {
        Self { key, shift: false }
    }

    /// Key press with shift held
    pub fn shifted(key: Key) -> Self {
        Self { key, shift: true }
    }

    /// Command bound to this key press
    pub fn command(self) -> Command {
        use Command::*;

        match (self.key, self.shift) {
            (Key::Enter, _) => ToggleInspectMode,
            (Key::ArrowDown, _) => MoveForward(1),
            (Key::ArrowUp, _) => MoveBack(1),
            (Key::ArrowLeft, _) => MoveOut(1),
            (Key::ArrowRight, _) => MoveIn(1),
            (Key::Space, false) | (Key::PageDown, false) => MoveForward(PAGE_STEPS),
            (Key::Space, true) | (Key::PageUp, false) => MoveBack(PAGE_STEPS),
            (Key::PageDown, true) => MoveIn(PAGE_STEPS),
            (Key::PageUp, true) => MoveOut(PAGE_STEPS),
            (Key::Home, false) => MoveBack(usize::MAX),
            (Key::Home, true) => MoveOut(usize::MAX),
            (Key::End, false) => MoveForward(usize::MAX),
            (Key::End, true) => MoveIn(usize::MAX),
        }
    }
}

/// Command for one wheel event, or `None` if it carries no movement
///
/// The dominant axis wins. Vertical scroll moves between siblings and
/// horizontal scroll between levels, swapped while shift is held.
pub fn wheel_command(delta_x: f64, delta_y: f64, shift: bool) -> Option<Command> {
    let vertical = delta_y.abs() > delta_x.abs();
    let delta = if vertical { delta_y } else { delta_x };
    if delta == 0.0 || delta.is_nan() {
        return None;
    }

    let forward = delta > 0.0;
    let along_branch = vertical != shift;
    Some(match (along_branch, forward) {
        (true, true) => Command::MoveForward(1),
        (true, false) => Command::MoveBack(1),
        (false, true) => Command::MoveIn(1),
        (false, false) => Command::MoveOut(1),
    })
}

impl Navigator {
    /// Apply a command
    pub fn apply(&mut self, command: Command) -> Result<(), NavError> {
        match command {
            Command::MoveIn(n) => self.move_in(n),
            Command::MoveOut(n) => self.move_out(n),
            Command::MoveForward(n) => self.move_forward(n),
            Command::MoveBack(n) => self.move_back(n),
            Command::SetFocalLevel(level) => self.set_focal_level(level),
            Command::JumpTo(node) => return self.jump_to(node),
            Command::Tap(node) => return self.tap(node),
            Command::SetActiveChild { parent, index } => {
                return self.set_active_child(parent, index)
            }
            Command::EnterInspectMode => self.enter_inspect_mode(),
            Command::ExitInspectMode => self.exit_inspect_mode(),
            Command::ToggleInspectMode => self.toggle_inspect_mode(),
        }
        Ok(())
    }

    /// Handle a key press, returning whether it was acted on
    pub fn handle_key(&mut self, input: KeyInput) -> bool {
        let allowed = if input.key == Key::Enter {
            self.config.use_inspect_mode_key
        } else {
            self.config.use_key_navigation && !self.is_in_inspect_mode()
        };
        if !allowed {
            return false;
        }
        self.apply(input.command()).is_ok()
    }

    /// Handle a wheel event, returning whether it was acted on
    pub fn handle_wheel(&mut self, delta_x: f64, delta_y: f64, shift: bool) -> bool {
        if !self.config.use_wheel_navigation || self.is_in_inspect_mode() {
            return false;
        }
        match wheel_command(delta_x, delta_y, shift) {
            Some(command) => self.apply(command).is_ok(),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(KeyInput::new(Key::ArrowDown) => Command::MoveForward(1); "down")]
    #[test_case(KeyInput::new(Key::ArrowLeft) => Command::MoveOut(1); "left")]
    #[test_case(KeyInput::shifted(Key::Space) => Command::MoveBack(3); "shift space")]
    #[test_case(KeyInput::shifted(Key::PageDown) => Command::MoveIn(3); "shift page down")]
    #[test_case(KeyInput::new(Key::Home) => Command::MoveBack(usize::MAX); "home")]
    #[test_case(KeyInput::shifted(Key::End) => Command::MoveIn(usize::MAX); "shift end")]
    #[test_case(KeyInput::new(Key::Enter) => Command::ToggleInspectMode; "enter")]
    fn test_key_binding(input: KeyInput) -> Command {
        input.command()
    }

    #[test_case(0.0, 4.0, false => Some(Command::MoveForward(1)); "scroll down")]
    #[test_case(0.0, -4.0, true => Some(Command::MoveOut(1)); "shift scroll up")]
    #[test_case(6.0, 1.0, false => Some(Command::MoveIn(1)); "scroll right")]
    #[test_case(-6.0, 1.0, true => Some(Command::MoveBack(1)); "shift scroll left")]
    #[test_case(0.0, 0.0, false => None; "no movement")]
    fn test_wheel_mapping(dx: f64, dy: f64, shift: bool) -> Option<Command> {
        wheel_command(dx, dy, shift)
    }
}
