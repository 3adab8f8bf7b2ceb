//! Clock-driven ritual scheduling.
//!
//! `RitualScheduler` owns the countdown timer and the ritual state and
//! turns ticks into events: countdown progress, the once-per-day chime,
//! and panel open/close around the evening checklist. Like the timer it
//! has no thread of its own; the caller ticks it.

use chrono::NaiveDateTime;

use super::engine::CountdownTimer;
use crate::calendar;
use crate::events::Event;
use crate::ritual::{Mode, RitualState, WindDownChecklist, WindDownLog};

pub struct RitualScheduler {
    state: RitualState,
    timer: CountdownTimer,
    panel_open: bool,
}

impl RitualScheduler {
    pub fn new(state: RitualState, action_secs: u64) -> Self {
        Self {
            state,
            timer: CountdownTimer::new(action_secs),
            panel_open: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &RitualState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut RitualState {
        &mut self.state
    }

    pub fn timer(&self) -> &CountdownTimer {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut CountdownTimer {
        &mut self.timer
    }

    pub fn panel_open(&self) -> bool {
        self.panel_open
    }

    /// Whether the display should be in night mode at `now`.
    ///
    /// Day and Night force their answer; Auto follows the wind-down
    /// window.
    pub fn is_night(&self, now: NaiveDateTime) -> bool {
        match self.state.mode {
            Mode::Day => false,
            Mode::Night => true,
            Mode::Auto => calendar::is_after_wind_down(now.time(), self.state.wind_down_time),
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self, now: NaiveDateTime) -> Event {
        Event::StateSnapshot {
            timer: self.timer.state(),
            remaining_ms: self.timer.remaining_ms(),
            mode: self.state.mode,
            night: self.is_night(now),
            panel_open: self.panel_open,
            at: now,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Advance the clock. Emits countdown events plus the chime when the
    /// wind-down window opens for the first time on `now`'s date.
    ///
    /// The chime only fires in Auto mode. A forced Day or Night mode
    /// means the user took over, so the scheduler stays quiet.
    pub fn tick(&mut self, now: NaiveDateTime) -> Vec<Event> {
        let mut events = Vec::new();
        if let Some(event) = self.timer.tick(now) {
            events.push(event);
        }

        let today = now.date();
        if self.state.mode == Mode::Auto
            && calendar::is_after_wind_down(now.time(), self.state.wind_down_time)
            && !self.state.chimed_on(today)
        {
            self.state.mark_chimed(today);
            events.push(Event::ChimeFired {
                date: today,
                at: now,
            });
            if let Some(event) = self.open_panel(now) {
                events.push(event);
            }
        }
        events
    }

    pub fn open_panel(&mut self, now: NaiveDateTime) -> Option<Event> {
        if self.panel_open {
            return None;
        }
        self.panel_open = true;
        Some(Event::PanelOpened { at: now })
    }

    pub fn close_panel(&mut self, now: NaiveDateTime) -> Option<Event> {
        if !self.panel_open {
            return None;
        }
        self.panel_open = false;
        Some(Event::PanelClosed { at: now })
    }

    /// Advance the mode cycle and report the new mode.
    pub fn cycle_mode(&mut self, now: NaiveDateTime) -> Event {
        let mode = self.state.cycle_mode();
        Event::ModeChanged { mode, at: now }
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.state.set_mode(mode);
    }

    /// Save a wind-down checklist into the ritual history and close the
    /// panel. A blank note is dropped.
    pub fn save_wind_down(
        &mut self,
        checklist: WindDownChecklist,
        note: Option<String>,
        now: NaiveDateTime,
    ) -> Vec<Event> {
        let note = note.and_then(|n| {
            let trimmed = n.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        });
        self.state.append_log(WindDownLog {
            ts: now,
            checklist,
            note,
        });

        let mut events = vec![Event::WindDownLogged { at: now }];
        if let Some(event) = self.close_panel(now) {
            events.push(event);
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 8, day)
            .unwrap()
            .and_hms_opt(hour, min, 0)
            .unwrap()
    }

    fn scheduler() -> RitualScheduler {
        RitualScheduler::new(RitualState::default(), 120)
    }

    #[test]
    fn chime_fires_once_per_day_and_opens_panel() {
        let mut sched = scheduler();

        assert!(sched.tick(at(26, 12, 0)).is_empty());

        let events = sched.tick(at(26, 21, 0));
        assert!(matches!(events[0], Event::ChimeFired { .. }));
        assert!(matches!(events[1], Event::PanelOpened { .. }));
        assert!(sched.panel_open());

        // Same day stays quiet, even across more ticks
        assert!(sched.tick(at(26, 21, 1)).is_empty());
        assert!(sched.tick(at(26, 23, 59)).is_empty());

        // Next evening chimes again
        let events = sched.tick(at(27, 20, 30));
        assert!(matches!(events[0], Event::ChimeFired { .. }));
    }

    #[test]
    fn window_wrap_chimes_again_after_midnight() {
        let mut sched = scheduler();
        sched.tick(at(26, 21, 0));
        // 00:30 is inside the wrapped window and a new calendar day
        let events = sched.tick(at(27, 0, 30));
        assert!(matches!(events[0], Event::ChimeFired { date, .. }
            if date == at(27, 0, 30).date()));
    }

    #[test]
    fn forced_modes_suppress_the_chime() {
        let mut sched = scheduler();
        sched.set_mode(Mode::Night);
        assert!(sched.tick(at(26, 21, 0)).is_empty());
        assert!(sched.is_night(at(26, 12, 0)));

        sched.set_mode(Mode::Day);
        assert!(sched.tick(at(26, 22, 0)).is_empty());
        assert!(!sched.is_night(at(26, 22, 0)));
    }

    #[test]
    fn mode_cycle_reports_new_mode() {
        let mut sched = scheduler();
        let event = sched.cycle_mode(at(26, 12, 0));
        assert!(matches!(event, Event::ModeChanged { mode: Mode::Day, .. }));
    }

    #[test]
    fn save_wind_down_logs_and_closes_panel() {
        let mut sched = scheduler();
        sched.tick(at(26, 21, 0));
        assert!(sched.panel_open());

        let checklist = WindDownChecklist {
            devices_off: true,
            tidy_up: false,
            plan_tomorrow: true,
        };
        let events = sched.save_wind_down(checklist, Some("   ".into()), at(26, 21, 5));
        assert!(matches!(events[0], Event::WindDownLogged { .. }));
        assert!(matches!(events[1], Event::PanelClosed { .. }));
        assert!(!sched.panel_open());

        let log = &sched.state().logs[0];
        assert_eq!(log.note, None);
        assert!(log.checklist.devices_off);
    }

    #[test]
    fn countdown_events_flow_through_tick() {
        let mut sched = scheduler();
        let start = at(26, 12, 0);
        sched
            .timer_mut()
            .start(crate::timer::TimerPurpose::WindDown, 120, start);
        let events = sched.tick(start + chrono::Duration::seconds(30));
        assert!(events.is_empty());
        let events = sched.tick(start + chrono::Duration::seconds(121));
        assert!(matches!(events[0], Event::TimerElapsed { .. }));
    }
}
