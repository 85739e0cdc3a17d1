// SPDX-License-Identifier: MPL-2.0
//! Menu input port definition.

/// Snapshot of the menu gestures pressed during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MenuInput {
    pub select: bool,
    pub cancel: bool,
    pub special: bool,
    pub left: bool,
    pub right: bool,
}

impl MenuInput {
    /// Any gesture that aborts a clip.
    #[must_use]
    pub fn wants_abort(&self) -> bool {
        self.select || self.cancel || self.special
    }

    /// A horizontal gesture; left wins when both are held.
    #[must_use]
    pub fn seek_direction(&self) -> Option<SeekDirection> {
        if self.left {
            Some(SeekDirection::Back)
        } else if self.right {
            Some(SeekDirection::Forward)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekDirection {
    Back,
    Forward,
}

/// Port polled once per tick for the current gestures.
pub trait InputSource: Send {
    fn poll(&mut self) -> MenuInput;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abort_gestures() {
        let cancel = MenuInput {
            cancel: true,
            ..MenuInput::default()
        };
        assert!(cancel.wants_abort());
        assert!(!MenuInput::default().wants_abort());
    }

    #[test]
    fn left_takes_priority() {
        let both = MenuInput {
            left: true,
            right: true,
            ..MenuInput::default()
        };
        assert_eq!(both.seek_direction(), Some(SeekDirection::Back));
        assert_eq!(MenuInput::default().seek_direction(), None);
    }
}
