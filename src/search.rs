use crate::github::Profile;
use std::time::{Duration, Instant};

pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// A lookup the controller wants issued, tagged with the generation it
/// belongs to so late responses can be matched back up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
    pub generation: u64,
    pub username: String,
}

/// Settled result of one lookup. Fetch failures are already collapsed to
/// `None` by the caller; the controller only cares about presence.
#[derive(Debug)]
pub struct Outcome {
    pub generation: u64,
    pub profile: Option<Profile>,
}

/// The four mutually exclusive things the screen can show.
#[derive(Debug, PartialEq)]
pub enum View<'a> {
    Idle,
    Loading,
    Found(&'a Profile),
    NotFound,
}

/// Debounced search state: query text, a single owned quiet-window
/// deadline, and the current lookup generation.
///
/// No I/O lives here. The event loop feeds it keystrokes and `Instant`s,
/// issues the `Lookup`s it emits, and hands back `Outcome`s.
pub struct SearchController {
    query: String,
    cursor: usize,
    debounce: Duration,
    deadline: Option<Instant>,
    generation: u64,
    in_flight: bool,
    profile: Option<Profile>,
}

impl SearchController {
    pub fn new(debounce: Duration) -> Self {
        Self {
            query: String::new(),
            cursor: 0,
            debounce,
            deadline: None,
            generation: 0,
            in_flight: false,
            profile: None,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Byte offset of the previous char boundary before the cursor.
    fn prev_boundary(&self) -> usize {
        self.query[..self.cursor]
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    pub fn insert_char(&mut self, c: char, now: Instant) {
        self.query.insert(self.cursor, c);
        self.cursor += c.len_utf8();
        self.text_changed(now);
    }

    pub fn backspace(&mut self, now: Instant) {
        if self.cursor > 0 {
            let prev = self.prev_boundary();
            self.query.remove(prev);
            self.cursor = prev;
            self.text_changed(now);
        }
    }

    pub fn delete(&mut self, now: Instant) {
        if self.cursor < self.query.len() {
            self.query.remove(self.cursor);
            self.text_changed(now);
        }
    }

    pub fn clear(&mut self, now: Instant) {
        if !self.query.is_empty() {
            self.query.clear();
            self.cursor = 0;
            self.text_changed(now);
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor = self.prev_boundary();
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.query.len() {
            self.cursor = self.query[self.cursor..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor + i)
                .unwrap_or(self.query.len());
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.query.len();
    }

    /// Re-arm the quiet window for a non-empty query: any previously armed
    /// window is replaced, which is what cancels the older pending lookup.
    ///
    /// A query that became empty or whitespace-only clears the displayed
    /// record right away instead of arming anything, so erasing the text
    /// hides a stale card immediately.
    fn text_changed(&mut self, now: Instant) {
        if self.query.trim().is_empty() {
            // Bumping the generation drops any response still in flight.
            self.generation += 1;
            self.in_flight = false;
            self.profile = None;
            self.deadline = None;
        } else {
            self.deadline = Some(now + self.debounce);
        }
    }

    /// Check whether the quiet window has elapsed and, if so, start a
    /// lookup for the settled text.
    pub fn poll_due(&mut self, now: Instant) -> Option<Lookup> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.begin_lookup()
            }
            _ => None,
        }
    }

    /// Explicit submit: skip the quiet window entirely.
    pub fn submit(&mut self) -> Option<Lookup> {
        self.deadline = None;
        if self.query.trim().is_empty() {
            return None;
        }
        self.begin_lookup()
    }

    fn begin_lookup(&mut self) -> Option<Lookup> {
        // Only armed (and therefore non-empty) queries get here, but a
        // window that somehow fires on emptied text must stay a no-op.
        if self.query.trim().is_empty() {
            return None;
        }

        // Superseding the generation invalidates anything still in flight.
        self.generation += 1;
        self.in_flight = true;
        Some(Lookup {
            generation: self.generation,
            username: self.query.trim().to_string(),
        })
    }

    /// Fold a settled lookup back in. Outcomes from superseded generations
    /// are dropped so a slow response for an old query can never overwrite
    /// the result of a newer one.
    pub fn apply(&mut self, outcome: Outcome) {
        if outcome.generation != self.generation {
            return;
        }
        self.in_flight = false;
        self.profile = outcome.profile;
    }

    pub fn view(&self) -> View<'_> {
        if self.in_flight {
            View::Loading
        } else if let Some(ref profile) = self.profile {
            View::Found(profile)
        } else if !self.query.trim().is_empty() {
            View::NotFound
        } else {
            View::Idle
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEBOUNCE: Duration = Duration::from_millis(500);

    fn controller() -> SearchController {
        SearchController::new(DEBOUNCE)
    }

    fn type_str(c: &mut SearchController, s: &str, now: Instant) {
        for ch in s.chars() {
            c.insert_char(ch, now);
        }
    }

    fn found_profile(login: &str) -> Profile {
        serde_json::from_str(&format!(r#"{{"login": "{login}"}}"#)).unwrap()
    }

    #[test]
    fn test_empty_query_never_looks_up() {
        let mut c = controller();
        let t0 = Instant::now();

        type_str(&mut c, "   ", t0);
        assert_eq!(c.poll_due(t0 + Duration::from_millis(600)), None);
        assert_ne!(c.view(), View::Loading);
        assert_eq!(c.submit(), None);
    }

    #[test]
    fn test_quiet_window_fires_once_for_latest_text() {
        let mut c = controller();
        let t0 = Instant::now();

        // Type "a", then "ab" 100ms later, then stay quiet.
        type_str(&mut c, "a", t0);
        assert_eq!(c.poll_due(t0 + Duration::from_millis(100)), None);
        type_str(&mut c, "b", t0 + Duration::from_millis(100));

        // "a"'s window would have ended at t0+500; it was canceled.
        assert_eq!(c.poll_due(t0 + Duration::from_millis(550)), None);

        let lookup = c.poll_due(t0 + Duration::from_millis(700)).unwrap();
        assert_eq!(lookup.username, "ab");
        assert_eq!(c.view(), View::Loading);

        // The window is consumed: no second lookup.
        assert_eq!(c.poll_due(t0 + Duration::from_millis(1300)), None);
    }

    #[test]
    fn test_successful_outcome_renders_found() {
        let mut c = controller();
        let t0 = Instant::now();

        type_str(&mut c, "octocat", t0);
        let lookup = c.poll_due(t0 + DEBOUNCE).unwrap();

        c.apply(Outcome {
            generation: lookup.generation,
            profile: Some(found_profile("octocat")),
        });

        match c.view() {
            View::Found(profile) => assert_eq!(profile.login, "octocat"),
            other => panic!("expected Found, got {other:?}"),
        }
    }

    #[test]
    fn test_failed_outcome_renders_not_found() {
        let mut c = controller();
        let t0 = Instant::now();

        type_str(&mut c, "no-such-user", t0);
        let lookup = c.poll_due(t0 + DEBOUNCE).unwrap();

        c.apply(Outcome {
            generation: lookup.generation,
            profile: None,
        });

        assert_eq!(c.view(), View::NotFound);
    }

    #[test]
    fn test_stale_response_discarded() {
        // Two overlapping lookups: the response for the older query lands
        // last but loses anyway. The original widget let whichever response
        // resolved last win; generation tagging fixes that.
        let mut c = controller();
        let t0 = Instant::now();

        type_str(&mut c, "octocat", t0);
        let first = c.submit().unwrap();

        c.clear(t0);
        type_str(&mut c, "torvalds", t0);
        let second = c.submit().unwrap();

        c.apply(Outcome {
            generation: second.generation,
            profile: Some(found_profile("torvalds")),
        });
        c.apply(Outcome {
            generation: first.generation,
            profile: Some(found_profile("octocat")),
        });

        match c.view() {
            View::Found(profile) => assert_eq!(profile.login, "torvalds"),
            other => panic!("expected Found, got {other:?}"),
        }
    }

    #[test]
    fn test_submit_bypasses_quiet_window() {
        let mut c = controller();
        let t0 = Instant::now();

        type_str(&mut c, "octocat", t0);
        let lookup = c.submit().unwrap();
        assert_eq!(lookup.username, "octocat");
        assert_eq!(c.view(), View::Loading);
    }

    #[test]
    fn test_clearing_text_hides_stale_record() {
        let mut c = controller();
        let t0 = Instant::now();

        type_str(&mut c, "octocat", t0);
        let lookup = c.submit().unwrap();
        c.apply(Outcome {
            generation: lookup.generation,
            profile: Some(found_profile("octocat")),
        });

        // The stale card disappears as soon as the text is gone, without
        // waiting out a quiet window.
        c.clear(t0);
        assert_eq!(c.view(), View::Idle);
        assert_eq!(c.poll_due(t0 + DEBOUNCE), None);
    }

    #[test]
    fn test_clearing_text_invalidates_in_flight_lookup() {
        let mut c = controller();
        let t0 = Instant::now();

        type_str(&mut c, "octocat", t0);
        let lookup = c.submit().unwrap();

        c.clear(t0);
        assert_eq!(c.poll_due(t0 + DEBOUNCE), None);

        c.apply(Outcome {
            generation: lookup.generation,
            profile: Some(found_profile("octocat")),
        });
        assert_eq!(c.view(), View::Idle);
    }

    #[test]
    fn test_lookup_text_is_trimmed() {
        let mut c = controller();
        let t0 = Instant::now();

        type_str(&mut c, "  octocat ", t0);
        let lookup = c.submit().unwrap();
        assert_eq!(lookup.username, "octocat");
    }

    #[test]
    fn test_cursor_editing_is_boundary_safe() {
        let mut c = controller();
        let t0 = Instant::now();

        type_str(&mut c, "héllo", t0);
        c.move_home();
        c.move_right();
        c.move_right();
        c.backspace(t0);
        assert_eq!(c.query(), "hllo");

        c.move_end();
        c.backspace(t0);
        assert_eq!(c.query(), "hll");
        c.delete(t0);
        assert_eq!(c.query(), "hll");
    }
}
