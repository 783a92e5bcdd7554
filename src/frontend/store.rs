//! App-wide state shared through context.
//!
//! The patients query lives here rather than in the page so that search, sort
//! and page survive navigating to the edit form and back.

use std::time::Duration;

use leptos::prelude::*;
use patients_care::models::{Patient, UserProfile};
use patients_care::notice::Notice;
use patients_care::query::{ListQuery, ListState};
use patients_care::session::is_authenticated;

use crate::session::BrowserTokenStore;

const NOTICE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone, Copy)]
pub struct AppStore {
    pub patients: RwSignal<ListState<Patient>>,
    pub user: RwSignal<Option<UserProfile>>,
    pub notices: RwSignal<Vec<(u64, Notice)>>,
    pub authenticated: RwSignal<bool>,
    next_notice: StoredValue<u64>,
}

impl AppStore {
    pub fn new() -> Self {
        Self {
            patients: RwSignal::new(ListState::default()),
            user: RwSignal::new(None),
            notices: RwSignal::new(Vec::new()),
            authenticated: RwSignal::new(is_authenticated(&BrowserTokenStore)),
            next_notice: StoredValue::new(0),
        }
    }

    /// Shows a notice. Non-sticky notices dismiss themselves.
    pub fn notify(&self, notice: Notice) {
        let id = self.next_notice.get_value();
        self.next_notice.set_value(id + 1);
        let sticky = notice.sticky;
        self.notices.update(|notices| notices.push((id, notice)));

        if !sticky {
            let store = *self;
            set_timeout(move || store.dismiss(id), NOTICE_TIMEOUT);
        }
    }

    pub fn dismiss(&self, id: u64) {
        self.notices.update(|notices| notices.retain(|(n, _)| *n != id));
    }

    pub fn signed_in(&self) {
        self.authenticated.set(true);
    }

    /// Forgets everything tied to the previous user.
    pub fn signed_out(&self) {
        self.authenticated.set(false);
        self.user.set(None);
        self.patients.update(|state| state.reset(ListQuery::default()));
    }
}

pub fn provide_store() -> AppStore {
    let store = AppStore::new();
    provide_context(store);
    store
}

pub fn use_store() -> AppStore {
    expect_context::<AppStore>()
}
