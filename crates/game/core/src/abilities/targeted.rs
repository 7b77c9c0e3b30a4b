//! Generic controller components for targeted abilities.
//!
//! Attack and kick differ only in their effect; the selection logic (pick a
//! candidate along a cardinal ray, cycle on re-trigger, confirm to commit)
//! is identical, so both bind one of these components parameterized by
//! kind.

use crate::ability::{Ability, AbilityKind, ControllerComponent, ControllerVariant};
use crate::engine::WorldView;
use crate::env::{InputKey, Occupant};
use crate::state::CardinalDirection;
use crate::targeting::{TargetingState, acquire_target};

fn trigger_key(kind: AbilityKind) -> Option<InputKey> {
    match kind {
        AbilityKind::Attack => Some(InputKey::Attack),
        AbilityKind::Kick => Some(InputKey::Kick),
        _ => None,
    }
}

/// Player selection: the ability's binding acquires (or cycles) a target,
/// `Confirm` commits it.
pub struct PlayerTargetedComponent {
    kind: AbilityKind,
    confirmed: bool,
}

impl PlayerTargetedComponent {
    pub fn new(kind: AbilityKind) -> Self {
        Self {
            kind,
            confirmed: false,
        }
    }
}

impl ControllerComponent for PlayerTargetedComponent {
    fn ability_kind(&self) -> AbilityKind {
        self.kind
    }

    fn variant(&self) -> ControllerVariant {
        ControllerVariant::Player
    }

    fn update_input(
        &mut self,
        view: &WorldView<'_>,
        ability: &dyn Ability,
        targeting: &mut TargetingState,
    ) {
        self.confirmed = false;
        let Some(trigger) = trigger_key(self.kind) else {
            return;
        };

        if view.key_active(trigger) {
            // Re-triggering while already selecting cycles past the current
            // direction instead of re-finding the same candidate.
            let start_after = (targeting.active() == Some(self.kind))
                .then(|| targeting.selection().map(|(_, direction)| direction))
                .flatten();
            targeting.set_active(self.kind);
            let this = &*self;
            match acquire_target(view, ability, start_after, |view, target, direction| {
                this.wants_perform_on(view, target, direction)
            }) {
                Some((target, direction)) => targeting.set_selection(target, direction),
                None => targeting.clear_selection(),
            }
        }

        if targeting.active() != Some(self.kind) {
            return;
        }
        if let Some((target, _)) = targeting.selection() {
            if !view.is_valid_candidate(target) {
                targeting.clear_selection();
                return;
            }
            if view.key_active(InputKey::Confirm) {
                self.confirmed = true;
            }
        }
    }

    fn wants_to_act(&self, targeting: &TargetingState) -> bool {
        self.confirmed
            && targeting.active() == Some(self.kind)
            && targeting.selection().is_some()
    }

    fn target(&self, targeting: &TargetingState) -> Option<Occupant> {
        (targeting.active() == Some(self.kind))
            .then(|| targeting.selection().map(|(target, _)| target))
            .flatten()
    }

    fn direction(&self, targeting: &TargetingState) -> Option<CardinalDirection> {
        (targeting.active() == Some(self.kind))
            .then(|| targeting.selection().map(|(_, direction)| direction))
            .flatten()
    }

    fn notify_performed(&mut self, targeting: &mut TargetingState) {
        self.confirmed = false;
        targeting.clear_selection();
        targeting.clear_active();
    }

    fn on_turn_begin(&mut self) {
        self.confirmed = false;
    }
}

/// AI selection: takes the first candidate the search proposes, every tick.
pub struct AiTargetedComponent {
    kind: AbilityKind,
    want: bool,
}

impl AiTargetedComponent {
    pub fn new(kind: AbilityKind) -> Self {
        Self { kind, want: false }
    }
}

impl ControllerComponent for AiTargetedComponent {
    fn ability_kind(&self) -> AbilityKind {
        self.kind
    }

    fn variant(&self) -> ControllerVariant {
        ControllerVariant::Ai
    }

    fn update_input(
        &mut self,
        view: &WorldView<'_>,
        ability: &dyn Ability,
        targeting: &mut TargetingState,
    ) {
        let this = &*self;
        match acquire_target(view, ability, None, |view, target, direction| {
            this.wants_perform_on(view, target, direction)
        }) {
            Some((target, direction)) => {
                targeting.set_active(self.kind);
                targeting.set_selection(target, direction);
                self.want = true;
            }
            None => {
                if targeting.active() == Some(self.kind) {
                    targeting.clear_selection();
                    targeting.clear_active();
                }
                self.want = false;
            }
        }
    }

    fn wants_to_act(&self, targeting: &TargetingState) -> bool {
        self.want && targeting.selection().is_some()
    }

    fn target(&self, targeting: &TargetingState) -> Option<Occupant> {
        (targeting.active() == Some(self.kind))
            .then(|| targeting.selection().map(|(target, _)| target))
            .flatten()
    }

    fn direction(&self, targeting: &TargetingState) -> Option<CardinalDirection> {
        (targeting.active() == Some(self.kind))
            .then(|| targeting.selection().map(|(_, direction)| direction))
            .flatten()
    }

    fn notify_performed(&mut self, targeting: &mut TargetingState) {
        self.want = false;
        targeting.clear_selection();
        targeting.clear_active();
    }

    fn on_turn_begin(&mut self) {
        self.want = false;
    }
}
