use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use chrono::{Days, NaiveDate};
use fitlog_core::{
    Dashboard, DashboardUseCase, EntryService, FileEntryRepository, LoadGeneration, LoadTicket,
    MonthCursor, Preferences,
};
use tracing::{debug, warn};

struct Loaded {
    ticket: LoadTicket,
    result: Result<Dashboard, String>,
}

pub struct App {
    repo: FileEntryRepository,
    pub prefs: Preferences,
    pub today: NaiveDate,
    /// Day shown in the detail card; the week chart is the week around it.
    pub selected: NaiveDate,
    pub cursor: MonthCursor,
    pub dashboard: Option<Dashboard>,
    pub loading: bool,
    pub error: Option<String>,
    generation: LoadGeneration,
    tx: Sender<Loaded>,
    rx: Receiver<Loaded>,
}

impl App {
    pub fn new(repo: FileEntryRepository, prefs: Preferences, today: NaiveDate) -> App {
        let (tx, rx) = mpsc::channel();
        App {
            repo,
            prefs,
            today,
            selected: today,
            cursor: MonthCursor::containing(today),
            dashboard: None,
            loading: false,
            error: None,
            generation: LoadGeneration::default(),
            tx,
            rx,
        }
    }

    /// Starts a background load for the current selection. Anything still in
    /// flight is superseded.
    pub fn reload(&mut self) {
        self.spawn_load();
    }

    fn spawn_load(&mut self) -> JoinHandle<()> {
        let ticket = self.generation.begin();
        let repo = self.repo.clone();
        let prefs = self.prefs.clone();
        let (date, cursor) = (self.selected, self.cursor.as_tuple());
        let tx = self.tx.clone();
        self.loading = true;
        debug!(%date, ?cursor, "dashboard load started");

        thread::spawn(move || {
            let service = EntryService::new(repo);
            let result = DashboardUseCase::new(&service, &prefs)
                .dashboard(date, cursor)
                .map_err(|e| format!("{:#}", e));
            // Receiver is gone once the dashboard closed.
            let _ = tx.send(Loaded { ticket, result });
        })
    }

    /// Applies finished loads; stale ones are dropped.
    pub fn poll_loads(&mut self) {
        while let Ok(loaded) = self.rx.try_recv() {
            let Some(result) = self.generation.accept(loaded.ticket, loaded.result) else {
                continue;
            };
            self.loading = false;
            match result {
                Ok(dashboard) => {
                    self.dashboard = Some(dashboard);
                    self.error = None;
                }
                Err(err) => {
                    warn!(error = %err, "dashboard load failed");
                    self.error = Some(err);
                }
            }
        }
    }

    pub fn shutdown(&mut self) {
        self.generation.invalidate();
    }

    pub fn next_day(&mut self) {
        self.move_days(1);
    }

    pub fn previous_day(&mut self) {
        self.move_days(-1);
    }

    pub fn next_week(&mut self) {
        self.move_days(7);
    }

    pub fn previous_week(&mut self) {
        self.move_days(-7);
    }

    fn move_days(&mut self, delta: i64) {
        let moved = if delta >= 0 {
            self.selected.checked_add_days(Days::new(delta as u64))
        } else {
            self.selected.checked_sub_days(Days::new(delta.unsigned_abs()))
        };
        if let Some(date) = moved {
            self.selected = date;
            self.cursor = MonthCursor::containing(date);
            self.reload();
        }
    }

    pub fn next_month(&mut self) {
        self.cursor = self.cursor.shift(1);
        self.reload();
    }

    pub fn previous_month(&mut self) {
        self.cursor = self.cursor.shift(-1);
        self.reload();
    }

    pub fn jump_to_today(&mut self) {
        self.selected = self.today;
        self.cursor = MonthCursor::containing(self.today);
        self.reload();
    }
}
