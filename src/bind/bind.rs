//! Bind struct: a named combo with per-tick press state and event subscribers

use std::fmt;

use super::control::ControlRegistry;
use super::event::{BindEvent, Subscribers, Subscription};
use super::types::{BindId, Combo, ControlId};

/// A single logical binding owned by a [`BindGroup`](super::BindGroup).
///
/// The state flags are recomputed once per tick by the owning group. Combo
/// edits go through the group so conflicts can be checked first.
pub struct Bind {
    name: String,
    index: BindId,
    combo: Combo,
    /// True if any control in the current combo is analog
    analog: bool,

    pressed: bool,
    new_pressed: bool,
    pressed_and_held: bool,
    released: bool,

    pressed_last_tick: bool,
    /// Tick on which the current continuous press started
    held_since: Option<u64>,

    on_new_press: Subscribers,
    on_press_and_held: Subscribers,
    on_release: Subscribers,
}

impl Bind {
    pub(crate) fn new(name: String, index: BindId, combo: Combo, analog: bool) -> Self {
        Self {
            name,
            index,
            combo,
            analog,
            pressed: false,
            new_pressed: false,
            pressed_and_held: false,
            released: false,
            pressed_last_tick: false,
            held_since: None,
            on_new_press: Subscribers::default(),
            on_press_and_held: Subscribers::default(),
            on_release: Subscribers::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> BindId {
        self.index
    }

    /// The current combo, in the order it was set
    pub fn combo(&self) -> &[ControlId] {
        &self.combo
    }

    /// True if the bind has no controls and can never be pressed
    pub fn is_unbound(&self) -> bool {
        self.combo.is_empty()
    }

    /// True if any control in the combo is analog. For these binds
    /// `is_new_pressed() == is_pressed()`.
    pub fn is_analog(&self) -> bool {
        self.analog
    }

    /// True while every control in the combo is active
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// True on the first tick of a press
    pub fn is_new_pressed(&self) -> bool {
        self.new_pressed
    }

    /// True on new press, then every tick once held past the hold threshold
    pub fn is_pressed_and_held(&self) -> bool {
        self.pressed_and_held
    }

    /// True on the tick after the combo stops being active
    pub fn is_released(&self) -> bool {
        self.released
    }

    pub fn subscribe(&mut self, event: BindEvent, callback: impl FnMut() + 'static) -> Subscription {
        self.subscribers_mut(event).subscribe(event, callback)
    }

    pub fn on_new_press(&mut self, callback: impl FnMut() + 'static) -> Subscription {
        self.subscribe(BindEvent::NewPress, callback)
    }

    pub fn on_press_and_held(&mut self, callback: impl FnMut() + 'static) -> Subscription {
        self.subscribe(BindEvent::PressAndHeld, callback)
    }

    pub fn on_release(&mut self, callback: impl FnMut() + 'static) -> Subscription {
        self.subscribe(BindEvent::Release, callback)
    }

    /// Remove a subscriber. Returns false if the handle belongs to another bind.
    pub fn unsubscribe(&mut self, subscription: &Subscription) -> bool {
        self.subscribers_mut(subscription.event())
            .unsubscribe(subscription)
    }

    /// Number of live subscribers for an event
    pub fn subscriber_count(&self, event: BindEvent) -> usize {
        match event {
            BindEvent::NewPress => self.on_new_press.len(),
            BindEvent::PressAndHeld => self.on_press_and_held.len(),
            BindEvent::Release => self.on_release.len(),
        }
    }

    /// Drop every subscriber of every event
    pub fn clear_subscribers(&mut self) {
        self.on_new_press.clear();
        self.on_press_and_held.clear();
        self.on_release.clear();
    }

    fn subscribers_mut(&mut self, event: BindEvent) -> &mut Subscribers {
        match event {
            BindEvent::NewPress => &mut self.on_new_press,
            BindEvent::PressAndHeld => &mut self.on_press_and_held,
            BindEvent::Release => &mut self.on_release,
        }
    }

    /// Replace the combo. Callers have already validated it.
    ///
    /// Press state carries over untouched; the next tick sees the new combo.
    pub(crate) fn replace_combo(&mut self, combo: Combo, analog: bool) {
        self.combo = combo;
        self.analog = analog;
    }

    pub(crate) fn clear_combo(&mut self) {
        self.combo.clear();
        self.analog = false;
    }

    /// Recompute the press state for `tick` and fire events.
    ///
    /// `hold_ticks` is the number of ticks a press must last before
    /// `is_pressed_and_held` turns on again after the initial press tick.
    pub(crate) fn update(&mut self, tick: u64, hold_ticks: u64, controls: &ControlRegistry) {
        let (active, analog) = controls.poll_combo(&self.combo);
        self.analog = analog;

        if active {
            if !self.pressed_last_tick {
                self.held_since = Some(tick);
            }
        } else {
            self.held_since = None;
        }

        let held_long_enough = self
            .held_since
            .is_some_and(|since| tick.saturating_sub(since) >= hold_ticks);

        self.pressed = active;
        self.new_pressed = active && (analog || !self.pressed_last_tick);
        self.pressed_and_held = self.new_pressed || (active && held_long_enough);
        self.released = self.pressed_last_tick && !active;
        self.pressed_last_tick = active;

        if self.new_pressed {
            self.on_new_press.dispatch(&self.name, BindEvent::NewPress);
        }
        if self.pressed_and_held {
            self.on_press_and_held
                .dispatch(&self.name, BindEvent::PressAndHeld);
        }
        if self.released {
            self.on_release.dispatch(&self.name, BindEvent::Release);
        }
    }
}

impl fmt::Debug for Bind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bind")
            .field("name", &self.name)
            .field("index", &self.index)
            .field("combo", &self.combo)
            .field("analog", &self.analog)
            .field("pressed", &self.pressed)
            .field("held_since", &self.held_since)
            .finish_non_exhaustive()
    }
}
