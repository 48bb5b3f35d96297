//! The application shell.

use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use celadon_bridge::{Bridge, ContentSession};
use celadon_common::{AppEvent, EventBus, WindowError, WindowId};
use celadon_content::ContentService;
use celadon_window::{WindowCommand, WindowOptions, WindowRegistry};
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::dispatch::{self, ActionQueue, WindowAction};

type ReadyCallback = Box<dyn FnOnce(&mut App)>;

/// Owns the bridge, windows, sessions, and content service, and drives
/// their scheduling turns from the host loop.
///
/// One `App` per process; it lives on the host main thread.
pub struct App {
    config: AppConfig,
    bridge: Arc<Bridge>,
    windows: WindowRegistry,
    sessions: HashMap<WindowId, Rc<ContentSession>>,
    content: ContentService,
    events: EventBus,
    actions: ActionQueue,
    ready_callbacks: Vec<ReadyCallback>,
    started: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let bridge = Bridge::new();
        let actions: ActionQueue = Arc::new(Mutex::new(VecDeque::new()));
        // The shell's built-in channel; registration on a fresh bridge
        // cannot collide.
        dispatch::register_window_actions(&bridge, Arc::clone(&actions))
            .expect("window action channel name is non-empty");
        Self {
            config,
            bridge,
            windows: WindowRegistry::new(),
            sessions: HashMap::new(),
            content: ContentService::new(),
            events: EventBus::new(64),
            actions,
            ready_callbacks: Vec::new(),
            started: false,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(AppConfig::default())
    }

    // ==================== Accessors ====================

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn bridge(&self) -> &Arc<Bridge> {
        &self.bridge
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn content(&self) -> &ContentService {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut ContentService {
        &mut self.content
    }

    pub fn window(&self, id: WindowId) -> Option<&celadon_window::Window> {
        self.windows.get(id)
    }

    pub fn window_mut(&mut self, id: WindowId) -> Option<&mut celadon_window::Window> {
        self.windows.get_mut(id)
    }

    pub fn session(&self, id: WindowId) -> Option<Rc<ContentSession>> {
        self.sessions.get(&id).cloned()
    }

    pub fn window_count(&self) -> usize {
        self.windows.count()
    }

    // ==================== Lifecycle ====================

    /// Register a callback run once when the shell starts. Registered
    /// after start, it runs immediately.
    pub fn on_ready<F>(&mut self, callback: F)
    where
        F: FnOnce(&mut App) + 'static,
    {
        if self.started {
            callback(self);
        } else {
            self.ready_callbacks.push(Box::new(callback));
        }
    }

    /// Start the shell: apply configured mounts, run ready callbacks,
    /// announce readiness.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        for mount in self.config.mounts.clone() {
            if let Err(e) = self.content.mount(&mount.name, &mount.dir) {
                warn!(mount = %mount.name, "content mount skipped: {e}");
            }
        }
        self.started = true;

        let callbacks = std::mem::take(&mut self.ready_callbacks);
        for callback in callbacks {
            callback(self);
        }

        self.events.publish(AppEvent::Ready);
        info!("shell ready");
    }

    /// Announce shutdown and close everything.
    pub fn shutdown(&mut self) {
        self.events.publish(AppEvent::BeforeQuit);
        for id in self.windows.ids() {
            self.close_window(id);
        }
        debug!("shutdown complete");
    }

    // ==================== Windows & sessions ====================

    /// Create a window (options applied atomically) and open its content
    /// session on the bridge.
    pub fn create_window(&mut self, options: WindowOptions) -> Result<WindowId, WindowError> {
        let id = self.windows.create(options)?;
        let session = self.bridge.open_session(id);
        self.sessions.insert(id, session);
        self.events.publish(AppEvent::WindowCreated(id));
        Ok(id)
    }

    /// Create a window from the configured window defaults.
    pub fn create_default_window(&mut self) -> Result<WindowId, WindowError> {
        self.create_window(self.config.window.clone())
    }

    /// Close a window, its session, and everything scoped to them.
    pub fn close_window(&mut self, id: WindowId) -> bool {
        let existed = self.windows.close(id);
        // Dropping the session handle releases its bridge registration;
        // queued deliveries die with it.
        self.sessions.remove(&id);
        if existed {
            self.events.publish(AppEvent::WindowClosed(id));
            if self.windows.is_empty() {
                self.events.publish(AppEvent::WindowAllClosed);
            }
        }
        existed
    }

    // ==================== Host loop ====================

    /// Run one host loop turn: the bridge's host turn, every session's
    /// content turn, then content-requested window actions. Returns the
    /// amount of work done.
    pub fn tick(&mut self) -> usize {
        let mut work = self.bridge.pump();
        for session in self.sessions.values() {
            work += session.pump();
        }
        work += self.apply_window_actions();
        work
    }

    /// Tick until a full turn does no work.
    pub fn run_until_idle(&mut self) -> usize {
        let mut total = 0;
        loop {
            let work = self.tick();
            if work == 0 {
                return total;
            }
            total += work;
        }
    }

    /// Queued window commands for the embedder to apply against the
    /// native layer.
    pub fn drain_window_commands(&mut self) -> Vec<(WindowId, WindowCommand)> {
        self.windows.drain_commands()
    }

    fn apply_window_actions(&mut self) -> usize {
        let drained: Vec<(WindowId, WindowAction)> = {
            let mut queue = self.actions.lock().unwrap();
            queue.drain(..).collect()
        };
        let count = drained.len();

        for (id, action) in drained {
            let result = match action {
                WindowAction::Close => {
                    self.close_window(id);
                    Ok(())
                }
                WindowAction::Minimize => self.with_window(id, |w| w.minimize()),
                WindowAction::Maximize => self.with_window(id, |w| w.maximize()),
                WindowAction::Focus => self.with_window(id, |w| w.focus()),
            };
            if let Err(e) = result {
                warn!(window = %id, ?action, "window action failed: {e}");
            }
        }

        count
    }

    fn with_window<F>(&mut self, id: WindowId, op: F) -> Result<(), WindowError>
    where
        F: FnOnce(&mut celadon_window::Window) -> Result<(), WindowError>,
    {
        match self.windows.get_mut(id) {
            Some(window) => op(window),
            None => {
                debug!(window = %id, "window action dropped: no such window");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::WINDOW_ACTION_CHANNEL;
    use std::cell::RefCell;

    fn app() -> App {
        App::with_defaults()
    }

    #[test]
    fn ready_callbacks_run_once_at_start() {
        let mut app = app();
        let ran = Rc::new(RefCell::new(0u32));
        let ran2 = Rc::clone(&ran);
        app.on_ready(move |_| *ran2.borrow_mut() += 1);

        app.start();
        app.start();
        assert_eq!(*ran.borrow(), 1);
    }

    #[test]
    fn on_ready_after_start_runs_immediately() {
        let mut app = app();
        app.start();
        let ran = Rc::new(RefCell::new(false));
        let ran2 = Rc::clone(&ran);
        app.on_ready(move |_| *ran2.borrow_mut() = true);
        assert!(*ran.borrow());
    }

    #[test]
    fn start_publishes_ready() {
        let mut app = app();
        let mut rx = app.events().subscribe();
        app.start();
        assert!(matches!(rx.try_recv().unwrap(), AppEvent::Ready));
    }

    #[test]
    fn create_window_opens_session_and_publishes() {
        let mut app = app();
        let mut rx = app.events().subscribe();

        let id = app.create_window(WindowOptions::default()).unwrap();
        assert!(app.window(id).is_some());
        assert!(app.session(id).is_some());
        assert_eq!(app.bridge().session_count(), 1);
        assert!(matches!(
            rx.try_recv().unwrap(),
            AppEvent::WindowCreated(w) if w == id
        ));
    }

    #[test]
    fn close_last_window_publishes_all_closed() {
        let mut app = app();
        let id = app.create_window(WindowOptions::default()).unwrap();
        let mut rx = app.events().subscribe();

        assert!(app.close_window(id));
        assert!(matches!(
            rx.try_recv().unwrap(),
            AppEvent::WindowClosed(w) if w == id
        ));
        assert!(matches!(rx.try_recv().unwrap(), AppEvent::WindowAllClosed));
        assert_eq!(app.bridge().session_count(), 0);
    }

    #[test]
    fn bridge_round_trip_through_the_app_loop() {
        let mut app = app();
        app.bridge()
            .on("api:getUser", |_, _| {
                Some(r#"{"name":"A","email":"a@x.com"}"#.into())
            })
            .unwrap();

        let id = app.create_window(WindowOptions::default()).unwrap();
        let session = app.session(id).unwrap();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen2 = Rc::clone(&seen);
        session
            .subscribe("api:getUser:response", move |d| {
                seen2.borrow_mut().push(d.payload().to_string());
            })
            .unwrap();
        session.invoke("api:getUser", "").unwrap();

        app.run_until_idle();
        assert_eq!(
            seen.borrow().as_slice(),
            [r#"{"name":"A","email":"a@x.com"}"#]
        );
    }

    #[test]
    fn content_can_minimize_its_window() {
        let mut app = app();
        let id = app.create_window(WindowOptions::default()).unwrap();
        let session = app.session(id).unwrap();

        session.notify(WINDOW_ACTION_CHANNEL, "minimize").unwrap();
        app.run_until_idle();

        assert!(app.window(id).unwrap().is_minimized());
        let commands = app.drain_window_commands();
        assert_eq!(commands, [(id, WindowCommand::Minimize)]);
    }

    #[test]
    fn content_can_close_its_window() {
        let mut app = app();
        let id = app.create_window(WindowOptions::default()).unwrap();
        let session = app.session(id).unwrap();
        let mut rx = app.events().subscribe();

        session.notify(WINDOW_ACTION_CHANNEL, "close").unwrap();
        app.run_until_idle();

        assert!(app.window(id).is_none());
        assert!(matches!(
            rx.try_recv().unwrap(),
            AppEvent::WindowClosed(w) if w == id
        ));
    }

    #[test]
    fn unknown_window_action_is_rejected_not_applied() {
        let mut app = app();
        let id = app.create_window(WindowOptions::default()).unwrap();
        let session = app.session(id).unwrap();

        session.notify(WINDOW_ACTION_CHANNEL, "explode").unwrap();
        app.run_until_idle();

        assert!(app.window(id).is_some());
        assert!(app.drain_window_commands().is_empty());
    }

    #[test]
    fn action_for_closed_window_is_dropped() {
        let mut app = app();
        let id = app.create_window(WindowOptions::default()).unwrap();
        let session = app.session(id).unwrap();

        session.notify(WINDOW_ACTION_CHANNEL, "minimize").unwrap();
        app.close_window(id);
        // The session is gone but its queued envelope still reaches the
        // host turn; applying it finds no window and drops it.
        app.run_until_idle();
        assert_eq!(app.window_count(), 0);
    }

    #[test]
    fn shutdown_publishes_before_quit_then_closes() {
        let mut app = app();
        app.create_window(WindowOptions::default()).unwrap();
        let mut rx = app.events().subscribe();

        app.shutdown();
        assert!(matches!(rx.try_recv().unwrap(), AppEvent::BeforeQuit));
        assert!(matches!(rx.try_recv().unwrap(), AppEvent::WindowClosed(_)));
        assert!(matches!(rx.try_recv().unwrap(), AppEvent::WindowAllClosed));
        assert_eq!(app.window_count(), 0);
    }

    #[tokio::test]
    async fn events_are_observable_from_async_contexts() {
        let mut app = app();
        let mut rx = app.events().subscribe();
        app.start();
        let event = rx.recv().await.unwrap();
        assert!(matches!(event, AppEvent::Ready));
    }

    #[test]
    fn configured_mounts_are_applied_at_start() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html></html>").unwrap();

        let mut config = AppConfig::default();
        config.mounts.push(crate::config::MountConfig {
            name: "app".into(),
            dir: dir.path().to_path_buf(),
        });
        let mut app = App::new(config);
        app.start();

        assert_eq!(app.content().mount_count(), 1);
        assert!(app.content().resolve("app/index.html").is_some());
    }

    #[test]
    fn missing_configured_mount_is_skipped_not_fatal() {
        let mut config = AppConfig::default();
        config.mounts.push(crate::config::MountConfig {
            name: "ghost".into(),
            dir: "/definitely/not/here".into(),
        });
        let mut app = App::new(config);
        app.start();
        assert_eq!(app.content().mount_count(), 0);
    }
}
