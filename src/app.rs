use crate::config::Config;
use crate::github::{GithubClient, ProfileSource};
use crate::search::{Lookup, Outcome, SearchController, View};
use crate::ui;
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::debug;
use ratatui::prelude::*;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub struct App {
    pub search: SearchController,
    source: Arc<dyn ProfileSource>,
    runtime: tokio::runtime::Handle,
    outcome_tx: Sender<Outcome>,
    outcome_rx: Receiver<Outcome>,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: &Config, runtime: tokio::runtime::Handle) -> Result<Self> {
        let client = GithubClient::new(
            config.api_base.clone(),
            Duration::from_secs(config.timeout_secs),
        )?;
        let (outcome_tx, outcome_rx) = channel();

        Ok(Self {
            search: SearchController::new(Duration::from_millis(config.debounce_ms)),
            source: Arc::new(client),
            runtime,
            outcome_tx,
            outcome_rx,
            should_quit: false,
        })
    }

    /// Pre-fill the query from the command line and look it up right away.
    pub fn seed(&mut self, username: &str) {
        let now = Instant::now();
        for c in username.chars() {
            self.search.insert_char(c, now);
        }
        if let Some(lookup) = self.search.submit() {
            self.spawn_lookup(lookup);
        }
    }

    pub fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> Result<()> {
        let tick_rate = Duration::from_millis(50);

        loop {
            terminal.draw(|frame| ui::draw(frame, self))?;

            self.drain_outcomes();

            if let Some(lookup) = self.search.poll_due(Instant::now()) {
                self.spawn_lookup(lookup);
            }

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }

            if self.should_quit {
                return Ok(());
            }
        }
    }

    /// Run one lookup on the background runtime. Failures collapse to an
    /// empty outcome; the raw error only goes to the log.
    fn spawn_lookup(&self, lookup: Lookup) {
        let source = Arc::clone(&self.source);
        let tx = self.outcome_tx.clone();

        self.runtime.spawn(async move {
            let profile = match source.lookup(&lookup.username).await {
                Ok(profile) => Some(profile),
                Err(err) => {
                    debug!("lookup for {:?} failed: {err:#}", lookup.username);
                    None
                }
            };
            let _ = tx.send(Outcome {
                generation: lookup.generation,
                profile,
            });
        });
    }

    fn drain_outcomes(&mut self) {
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.search.apply(outcome);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let now = Instant::now();
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') if ctrl => self.should_quit = true,
            KeyCode::Esc => {
                if self.search.query().is_empty() {
                    self.should_quit = true;
                } else {
                    self.search.clear(now);
                }
            }
            KeyCode::Enter => {
                if let Some(lookup) = self.search.submit() {
                    self.spawn_lookup(lookup);
                }
            }
            KeyCode::Char('u') if ctrl => self.search.clear(now),
            KeyCode::Char('o') if ctrl => self.open_link(LinkKind::Profile),
            KeyCode::Char('b') if ctrl => self.open_link(LinkKind::Blog),
            KeyCode::Char('t') if ctrl => self.open_link(LinkKind::Twitter),
            KeyCode::Char(c) if !ctrl => self.search.insert_char(c, now),
            KeyCode::Backspace => self.search.backspace(now),
            KeyCode::Delete => self.search.delete(now),
            KeyCode::Left => self.search.move_left(),
            KeyCode::Right => self.search.move_right(),
            KeyCode::Home => self.search.move_home(),
            KeyCode::End => self.search.move_end(),
            _ => {}
        }
    }

    fn open_link(&self, kind: LinkKind) {
        let View::Found(profile) = self.search.view() else {
            return;
        };

        let url = match kind {
            LinkKind::Profile => profile.html_url.clone(),
            LinkKind::Blog => ui::present(profile.blog.as_deref()).map(ui::blog_url),
            LinkKind::Twitter => ui::present(profile.twitter_username.as_deref())
                .map(ui::twitter_url),
        };

        if let Some(url) = url {
            if let Err(err) = open::that(&url) {
                debug!("failed to open {url}: {err}");
            }
        }
    }
}

enum LinkKind {
    Profile,
    Blog,
    Twitter,
}
