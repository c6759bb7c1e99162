//! Balance disclosure state machine.
//!
//! DESIGN
//! ======
//! ```text
//! Idle --begin--> Loading --record+complete--> Revealed <--toggle--> Hidden
//!                    \
//!                     `--eject--> Ejected
//! ```
//! A machine is created fresh for every dashboard mount. Only `Idle` may
//! start a fetch, so one machine issues at most one balance request. `Hidden`
//! keeps the amount; toggling never needs the network. `Ejected` is terminal.

#[cfg(test)]
#[path = "disclosure_test.rs"]
mod disclosure_test;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisclosureStatus {
    #[default]
    Idle,
    Loading,
    Revealed,
    Hidden,
    /// Auth failure ended the machine; the user has been sent to login.
    Ejected,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BalanceDisclosure {
    pub status: DisclosureStatus,
    pub amount: Option<f64>,
}

impl BalanceDisclosure {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `Idle -> Loading`. Returns `false` (and changes nothing) from any other
    /// status, which is how re-entrant reveals are suppressed.
    pub fn begin(&mut self) -> bool {
        if self.status != DisclosureStatus::Idle {
            return false;
        }
        self.status = DisclosureStatus::Loading;
        true
    }

    /// Hold the fetched amount while still `Loading`.
    pub fn record(&mut self, amount: f64) {
        if self.status == DisclosureStatus::Loading {
            self.amount = Some(amount);
        }
    }

    /// `Loading -> Revealed`, once an amount is recorded.
    pub fn complete(&mut self) -> bool {
        if self.status != DisclosureStatus::Loading || self.amount.is_none() {
            return false;
        }
        self.status = DisclosureStatus::Revealed;
        true
    }

    /// `Revealed <-> Hidden`. No-op elsewhere.
    pub fn toggle(&mut self) -> bool {
        self.status = match self.status {
            DisclosureStatus::Revealed => DisclosureStatus::Hidden,
            DisclosureStatus::Hidden => DisclosureStatus::Revealed,
            _ => return false,
        };
        true
    }

    /// Terminate after an auth failure.
    pub fn eject(&mut self) {
        self.status = DisclosureStatus::Ejected;
        self.amount = None;
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.status == DisclosureStatus::Loading
    }

    /// Amount, only while it may be shown.
    #[must_use]
    pub fn visible_amount(&self) -> Option<f64> {
        match self.status {
            DisclosureStatus::Revealed => self.amount,
            _ => None,
        }
    }
}
