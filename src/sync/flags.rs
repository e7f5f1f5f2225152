//! Directional single-shot suppression flags.
//!
//! The two sides of the synchronizer notify each other synchronously, on
//! the same call stack, so comparing before/after values cannot tell an
//! external stimulus from the echo of our own correction. Each direction
//! instead gets one single-shot flag: armed immediately before the action
//! that will provoke the echo, consumed by the first notification that
//! arrives. A flag never survives past one echo.

use std::cell::Cell;

#[derive(Debug, Default)]
pub(crate) struct SuppressionFlags {
    incoming: Cell<bool>,
    outgoing: Cell<bool>,
}

impl SuppressionFlags {
    /// Arm before a history update we issue ourselves: the next location
    /// notification is our echo.
    pub fn arm_incoming(&self) {
        self.incoming.set(true);
    }

    /// Consume the incoming flag. Returns whether it was armed.
    pub fn consume_incoming(&self) -> bool {
        self.incoming.replace(false)
    }

    /// Arm before a forced send: the next machine notification is the
    /// echo of a location sync.
    pub fn arm_outgoing(&self) {
        self.outgoing.set(true);
    }

    /// Consume the outgoing flag. Returns whether it was armed.
    pub fn consume_outgoing(&self) -> bool {
        self.outgoing.replace(false)
    }

    /// Disarm the outgoing flag without consuming an echo, for the case
    /// where the send that armed it turned out not to notify.
    pub fn disarm_outgoing(&self) {
        self.outgoing.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_start_disarmed() {
        let flags = SuppressionFlags::default();
        assert!(!flags.consume_incoming());
        assert!(!flags.consume_outgoing());
    }

    #[test]
    fn consume_is_single_shot() {
        let flags = SuppressionFlags::default();
        flags.arm_incoming();

        assert!(flags.consume_incoming());
        assert!(!flags.consume_incoming());
    }

    #[test]
    fn directions_are_independent() {
        let flags = SuppressionFlags::default();
        flags.arm_incoming();

        assert!(!flags.consume_outgoing());
        assert!(flags.consume_incoming());

        flags.arm_outgoing();
        assert!(!flags.consume_incoming());
        assert!(flags.consume_outgoing());
    }

    #[test]
    fn disarm_clears_without_consuming() {
        let flags = SuppressionFlags::default();
        flags.arm_outgoing();
        flags.disarm_outgoing();

        assert!(!flags.consume_outgoing());
    }
}
