//! App: the scripture dashboard wired onto the widget framework.
//!
//! [`App`] builds the screen (header window, reading frame, search entry),
//! feeds it input events, and turns what the screen could not handle into
//! commands through the [`KeyBindingRegistry`]. Content comes from any
//! [`ContentSource`], and the surface is generic, so the whole dashboard runs
//! headless in tests.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crate::api::{ApiError, ContentSource, Lookup, Passage};
use crate::config::Config;
use crate::event::binding::{BindingAction, KeyBindingRegistry};
use crate::event::input::{EventSource, InputEvent};
use crate::geometry::{Region, Size};
use crate::render::surface::Surface;
use crate::screen::{Dispatch, Fill, Screen, WidgetId, Window};
use crate::widget::traits::Completion;
use crate::widgets::{Entry, ScrollableFrame};

pub const APP_TITLE: &str = "Scripture";

/// Rows taken by the header window (it holds the three-row search entry).
pub const HEADER_HEIGHT: i32 = 5;

const SEARCH_WIDTH: i32 = 24;
const SEARCH_PROMPT: &str = "i.e. John 3";

/// How long the loop waits for input before checking again.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

// ---------------------------------------------------------------------------
// AppError
// ---------------------------------------------------------------------------

/// Failures that end the application.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("terminal input failed: {0}")]
    Input(#[from] io::Error),
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// The dashboard.
pub struct App<S: Surface, C: ContentSource> {
    screen: Screen<S>,
    content: C,
    bindings: KeyBindingRegistry,
    config: Config,
    config_path: Option<PathBuf>,
    frame: WidgetId,
    search: WidgetId,
    running: bool,
}

impl<S: Surface, C: ContentSource> App<S, C> {
    /// Build the screen on `surface`. Nothing is fetched until [`App::start`].
    ///
    /// With a `config_path`, the reading position is saved there after each
    /// successful navigation and on quit.
    pub fn new(surface: S, content: C, config: Config, config_path: Option<PathBuf>) -> Self {
        let size = surface.size();
        let mut screen = Screen::new(surface);

        let header = Window::new(Region::new(0, 0, size.width, HEADER_HEIGHT))
            .with_title(format!("{APP_TITLE} ({})", config.translation.to_uppercase()));
        screen.add_window(header, Fill::HORIZONTAL);

        // Registered first so it holds focus at startup.
        let frame = screen.add_widget(ScrollableFrame::new(
            0,
            HEADER_HEIGHT,
            size.width,
            (size.height - HEADER_HEIGHT).max(0),
        ));
        let search = screen.add_widget(Entry::new(2, 1, SEARCH_WIDTH, "Search", SEARCH_PROMPT));

        Self {
            screen,
            content,
            bindings: KeyBindingRegistry::with_defaults(),
            config,
            config_path,
            frame,
            search,
            running: true,
        }
    }

    pub fn screen(&self) -> &Screen<S> {
        &self.screen
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn bindings_mut(&mut self) -> &mut KeyBindingRegistry {
        &mut self.bindings
    }

    pub fn content(&self) -> &C {
        &self.content
    }

    pub fn frame_id(&self) -> WidgetId {
        self.frame
    }

    pub fn search_id(&self) -> WidgetId {
        self.search
    }

    pub fn frame(&self) -> Option<&ScrollableFrame> {
        self.screen.widget::<ScrollableFrame>(self.frame)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn into_surface(self) -> S {
        self.screen.into_surface()
    }

    // -----------------------------------------------------------------------
    // Loop
    // -----------------------------------------------------------------------

    /// Open the configured chapter and draw the first frame.
    pub fn start(&mut self) {
        let Config { translation, book, chapter } = self.config.clone();
        let result = self.content.chapter(&translation, &book, chapter);
        self.show_passage(result);
        self.screen.update();
    }

    /// Poll `events` until a quit command.
    pub fn run<E: EventSource>(&mut self, events: &mut E) -> Result<(), AppError> {
        while self.running {
            if let Some(event) = events.poll(POLL_INTERVAL)? {
                self.handle_input(event);
            }
        }
        Ok(())
    }

    /// Route one event through the screen, act on what came back, then
    /// render once.
    pub fn handle_input(&mut self, event: InputEvent) {
        match self.screen.route(event) {
            Dispatch::Resized(size) => self.layout(size),
            Dispatch::Completed {
                widget,
                completion: Completion::Submitted(query),
            } if widget == self.search => {
                if !query.is_empty() {
                    self.lookup(&query);
                }
            }
            Dispatch::Unhandled(key) => {
                if let Some(action) = self.bindings.resolve(&key) {
                    log::debug!("key {key:?} -> {action:?}");
                    self.perform(action);
                }
            }
            _ => {}
        }
        self.screen.update();
    }

    fn perform(&mut self, action: BindingAction) {
        match action {
            BindingAction::Quit => self.quit(),
            BindingAction::Find => {
                if let Err(err) = self.screen.focus_to(self.search) {
                    log::warn!("cannot focus search: {err}");
                }
            }
            BindingAction::NextChapter => self.step_chapter(1),
            BindingAction::PreviousChapter => self.step_chapter(-1),
            BindingAction::RandomVerse => self.random_verse(),
        }
    }

    fn quit(&mut self) {
        log::info!("quitting at {} {}", self.config.book, self.config.chapter);
        self.persist();
        self.running = false;
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    fn step_chapter(&mut self, step: i32) {
        let Config { translation, book, chapter } = self.config.clone();
        let result = self
            .content
            .adjacent_chapter(&translation, &book, chapter, step);
        self.show_passage(result);
    }

    fn lookup(&mut self, query: &str) {
        let translation = self.config.translation.clone();
        match self.content.lookup(&translation, query) {
            Ok(lookup) => {
                let title = match &lookup {
                    Lookup::Passage(passage) => passage.reference.clone(),
                    Lookup::Book(_) => query.to_owned(),
                };
                let position = lookup
                    .position()
                    .map(|(book, chapter)| (book.to_owned(), chapter));
                self.show(lookup.to_lines(true), title, position);
            }
            Err(err) => self.fail(&format!("lookup {query:?}"), err),
        }
    }

    fn random_verse(&mut self) {
        let translation = self.config.translation.clone();
        match self.content.random_verse(&translation) {
            Ok(verse) => {
                let title = format!("{} {}:{}", verse.book, verse.chapter, verse.verse);
                let position = Some((verse.book_id.clone(), verse.chapter));
                self.show(verse.to_lines(true), title, position);
            }
            Err(err) => self.fail("random verse", err),
        }
    }

    fn show_passage(&mut self, result: Result<Passage, ApiError>) {
        match result {
            Ok(passage) => {
                let position = passage
                    .position()
                    .map(|(book, chapter)| (book.to_owned(), chapter));
                self.show(passage.to_lines(true), passage.reference.clone(), position);
            }
            Err(err) => {
                let what = format!("{} {}", self.config.book, self.config.chapter);
                self.fail(&what, err);
            }
        }
    }

    fn show(&mut self, lines: Vec<String>, title: String, position: Option<(String, u32)>) {
        log::info!("showing {title}");
        if let Some(frame) = self.screen.widget_mut::<ScrollableFrame>(self.frame) {
            frame.set_lines(lines);
            frame.set_title(title);
        }
        if let Some((book, chapter)) = position {
            self.config.set_position(&book, chapter);
            self.persist();
        }
    }

    /// Leave the display as it is and ring the bell.
    fn fail(&mut self, what: &str, err: ApiError) {
        log::warn!("{what} failed: {err}");
        self.screen.bell();
    }

    fn persist(&self) {
        if let Some(path) = &self.config_path {
            if let Err(err) = self.config.save(path) {
                log::warn!("{err}");
            }
        }
    }

    // -----------------------------------------------------------------------
    // Layout
    // -----------------------------------------------------------------------

    /// The reading frame fills everything below the header.
    fn layout(&mut self, size: Size) {
        if let Some(frame) = self.screen.widget_mut::<ScrollableFrame>(self.frame) {
            frame.resize(size.width, (size.height - HEADER_HEIGHT).max(0));
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
